//! Player tunables.

use std::time::Duration;

/// Timing knobs for the player loop and the simulated backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSettings {
    /// Delay between an interruption's clip ending and the resume
    pub resume_grace: Duration,
    /// Delay between a main scene's clip ending and its auto-advance
    pub auto_advance_grace: Duration,
    /// How often the playback capability is polled for completion
    pub poll_interval: Duration,
    /// How often overlays are re-evaluated and repositioned
    pub reposition_interval: Duration,
    /// Length of every clip played by the simulated backend
    pub clip_length: Duration,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            resume_grace: Duration::from_millis(500),
            auto_advance_grace: Duration::from_millis(500),
            poll_interval: Duration::from_millis(250),
            reposition_interval: Duration::from_secs(1),
            clip_length: Duration::from_secs(10),
        }
    }
}
