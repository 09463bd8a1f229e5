//! Fan-out change notifications over `mpsc` channels.
//!
//! Each state container owns a `Broadcast` and hands out receivers. Subscribers
//! that dropped their receiver are pruned on the next emit.

use std::sync::mpsc;

pub struct Broadcast<E> {
    subscribers: Vec<mpsc::Sender<E>>,
}

impl<E: Clone> Broadcast<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<E> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: &E) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E: Clone> Default for Broadcast<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let mut broadcast = Broadcast::new();
        let first = broadcast.subscribe();
        let second = broadcast.subscribe();

        broadcast.emit(&7u32);

        assert_eq!(first.try_recv().unwrap(), 7);
        assert_eq!(second.try_recv().unwrap(), 7);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut broadcast = Broadcast::new();
        let kept = broadcast.subscribe();
        drop(broadcast.subscribe());

        broadcast.emit(&"hello".to_string());

        assert_eq!(broadcast.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), "hello");
    }
}
