//! Playback capability.
//!
//! The player drives video through the [`Playback`] trait and never
//! decodes anything itself. Completion is reported through
//! [`Playback::poll_event`], which the player calls from its own loop; a
//! backend that learns about completion on another thread queues the event
//! and hands it over there.
//!
//! # Module Structure
//!
//! - `clock` - time sources (`SystemClock`, `ManualClock`)
//! - `simulated` - `SimulatedPlayer`, a clock-driven stand-in for a video player

mod clock;
mod simulated;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use simulated::SimulatedPlayer;

/// Loudest volume level; levels run from 0 to this.
pub const MAX_VOLUME: u8 = 100;

/// Identifies one `play` call; completion events carry it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipToken(pub u64);

/// Something the backend observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The clip started by this token reached its end
    Ended(ClipToken),
}

/// Errors raised by a playback backend.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Media not found: {}", path.display())]
    MediaNotFound { path: PathBuf },

    #[error("Playback backend failed: {0}")]
    Backend(String),
}

/// Video playback capability.
pub trait Playback {
    /// Load and start a clip, replacing the current one.
    fn play(&mut self, asset: &Path) -> Result<ClipToken, PlaybackError>;

    /// Pause the current clip.
    fn pause(&mut self);

    /// Continue a paused clip.
    fn resume(&mut self);

    /// Unload the current clip.
    fn stop(&mut self);

    /// Seek within the current clip.
    fn set_position(&mut self, position: Duration);

    /// Current position within the clip.
    fn position(&self) -> Duration;

    /// Length of the current clip, if known.
    fn duration(&self) -> Option<Duration>;

    /// Whether a clip is loaded, not paused and not at its end.
    fn is_playing(&self) -> bool;

    /// Set the volume level (clamped to [`MAX_VOLUME`]). Applies to later clips too.
    fn set_volume(&mut self, volume: u8);

    /// Current volume level, whether or not muted.
    fn volume(&self) -> u8;

    /// Mute or unmute; the volume level is kept.
    fn toggle_mute(&mut self);

    fn is_muted(&self) -> bool;

    /// Next pending event. `Ended` is reported once per clip.
    fn poll_event(&mut self) -> Option<PlaybackEvent>;
}
