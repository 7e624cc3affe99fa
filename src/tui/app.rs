//! Terminal player loop.
//!
//! Owns the terminal while playing. Each turn of the loop runs the due
//! player tasks, redraws, then waits for a key until the next task or
//! frame is due.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use super::input::{map_key, KeyAction, VOLUME_STEP};
use super::render;
use crate::playback::Playback;
use crate::player::PlaybackMachine;
use crate::surface::OverlaySurface;

/// Longest wait between redraws, so the progress bar keeps moving.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Whether the loop goes on after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Play until the viewer quits.
#[cfg(not(tarpaulin_include))]
pub fn run<P: Playback>(mut machine: PlaybackMachine<P, OverlaySurface>) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut machine);
    ratatui::restore();
    result
}

#[cfg(not(tarpaulin_include))]
fn event_loop<P: Playback>(
    terminal: &mut DefaultTerminal,
    machine: &mut PlaybackMachine<P, OverlaySurface>,
) -> Result<()> {
    // A failed start is already on screen as a notice
    let _ = machine.start(Instant::now());

    loop {
        machine.tick(Instant::now());
        terminal
            .draw(|frame| render::draw(frame, &*machine))
            .context("Failed to draw player")?;

        let timeout = machine
            .next_due()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(FRAME_INTERVAL)
            .min(FRAME_INTERVAL);

        if !event::poll(timeout).context("Failed to poll terminal events")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
            let Some(action) = map_key(key) else {
                continue;
            };
            if apply_action(machine, action, Instant::now()) == Flow::Quit {
                tracing::info!("viewer quit");
                return Ok(());
            }
        }
    }
}

/// Apply one key action to the player.
pub fn apply_action<P: Playback>(
    machine: &mut PlaybackMachine<P, OverlaySurface>,
    action: KeyAction,
    now: Instant,
) -> Flow {
    match action {
        KeyAction::Quit => {
            machine.shutdown();
            return Flow::Quit;
        }
        KeyAction::Choose(n) => match machine.surface().select_offered(n) {
            Some(selection) => {
                let _ = machine.select(&selection, now);
            }
            None => tracing::debug!(n, "no choice at this position"),
        },
        KeyAction::ChooseTemporary(n) => match machine.surface().select_interrupt(n) {
            Some(selection) => {
                let _ = machine.select(&selection, now);
            }
            None => tracing::debug!(n, "no temporary choice at this position"),
        },
        KeyAction::Skip => {
            let _ = machine.skip(now);
        }
        KeyAction::TogglePause => machine.toggle_pause(),
        KeyAction::Seek(offset_ms) => machine.seek_relative(offset_ms),
        KeyAction::VolumeUp => {
            let volume = machine.playback().volume().saturating_add(VOLUME_STEP);
            machine.set_volume(volume);
        }
        KeyAction::VolumeDown => {
            let volume = machine.playback().volume().saturating_sub(VOLUME_STEP);
            machine.set_volume(volume);
        }
        KeyAction::ToggleMute => machine.toggle_mute(),
        KeyAction::DismissNotices => machine.surface_mut().dismiss_notices(),
    }
    Flow::Continue
}
