//! Main application state and control flow for the terminal player.
//!
//! The app is a thin shell around a [`PlaybackController`]: each tick it drains
//! the engine's events, redraws, and turns key presses into controller calls.
//! Engine faults stay on screen until the user asks for a repair.

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io, time::Duration};

use trim_studio::playback::{EngineFactory, PlaybackController};

use super::ui;

const SEEK_STEP: Duration = Duration::from_secs(5);
const SEEK_JUMP_FRACTION: f64 = 0.2;

pub struct App<F: EngineFactory> {
    pub should_quit: bool,
    pub playback: PlaybackController<F>,
}

impl<F: EngineFactory> App<F> {
    pub fn new(playback: PlaybackController<F>) -> Self {
        Self {
            should_quit: false,
            playback,
        }
    }

    /// Pull in whatever the engine reported since the last tick.
    pub fn tick(&mut self) {
        self.playback.process_events();
    }

    pub fn seek_relative(&mut self, offset: Duration, forward: bool) {
        let position = self.playback.state().position;
        let target = if forward {
            position.saturating_add(offset)
        } else {
            position.saturating_sub(offset)
        };
        self.playback.seek_to(target);
    }

    pub fn seek_fraction_relative(&mut self, delta: f64) {
        let current = self.playback.state().progress_percent();
        self.playback.seek_by_percentage(current + delta);
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let shifted = modifiers.contains(KeyModifiers::SHIFT);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.playback.toggle_play(),
            KeyCode::Left if shifted => self.seek_fraction_relative(-SEEK_JUMP_FRACTION),
            KeyCode::Right if shifted => self.seek_fraction_relative(SEEK_JUMP_FRACTION),
            KeyCode::Left => self.seek_relative(SEEK_STEP, false),
            KeyCode::Right => self.seek_relative(SEEK_STEP, true),
            KeyCode::Char(c @ '0'..='9') => {
                let tenth = f64::from(c as u8 - b'0') / 10.0;
                self.playback.seek_by_percentage(tenth);
            }
            KeyCode::Char('r') => {
                if !self.playback.repair() {
                    info!("Repair did not bring the engine back");
                }
            }
            _ => {}
        }
    }
}

/// Run the player UI until the user quits. The controller is expected to have
/// a file loaded already, or to carry the error that prevented it.
pub fn run<F: EngineFactory>(playback: PlaybackController<F>) -> Result<(), Box<dyn Error>> {
    info!("Starting trim-studio player");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(playback);
    let res = run_app(&mut terminal, &mut app);

    // Always restore the terminal, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.playback.dispose();
    res
}

fn run_app<B: ratatui::backend::Backend, F: EngineFactory>(
    terminal: &mut Terminal<B>,
    app: &mut App<F>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.tick();

        terminal.draw(|f| ui::draw(f, app.playback.state()))?;

        // Poll for events with a short timeout to allow continuous rendering
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code, key.modifiers);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
