//! Trim range bounds checking.
//!
//! These checks are pure: they only answer whether a proposed edit keeps
//! `0 <= start < end <= duration`. Callers decide what to do with a rejection
//! (the session silently keeps the previous value).

/// Whether `candidate` may become the new start of the range.
pub fn accept_start(candidate: f64, current_end: f64, duration: f64) -> bool {
    candidate >= 0.0 && candidate < current_end && candidate <= duration
}

/// Whether `candidate` may become the new end of the range.
pub fn accept_end(candidate: f64, current_start: f64, duration: f64) -> bool {
    candidate > current_start && candidate <= duration
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    /// The full-length range of a file, used as the baseline after selection.
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration,
        }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}
