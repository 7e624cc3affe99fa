//! Player error taxonomy.
//!
//! None of these are fatal: each one is caught where it originates and
//! turned into a no-op or a visible, degraded state.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::scene::SceneId;

/// Errors produced by the scene graph and the playback state machine.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Video for scene '{scene}' not found: {}", path.display())]
    AssetNotFound { scene: SceneId, path: PathBuf },

    #[error("Scene '{0}' has no video")]
    MissingVideo(SceneId),

    #[error(
        "Choice '{label}' on scene '{scene}' has no valid target{}",
        quoted_target(target)
    )]
    UnknownTransition {
        scene: SceneId,
        label: String,
        target: Option<SceneId>,
    },

    #[error("Discarded stale signal for scene '{scene}' (generation {generation})")]
    StaleSignal { scene: SceneId, generation: u64 },

    #[error("Scene not found: {0}")]
    SceneNotFound(SceneId),

    #[error("Playback failed for scene '{scene}': {message}")]
    Playback { scene: SceneId, message: String },
}

impl PlayerError {
    /// Whether this error should be surfaced to the viewer.
    ///
    /// Stale signals and unknown transitions only go to the log.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. }
                | Self::MissingVideo(_)
                | Self::Playback { .. }
                | Self::Config(_)
        )
    }
}

/// ` ('target')`, or nothing for a choice without one.
fn quoted_target(target: &Option<SceneId>) -> String {
    target
        .as_ref()
        .map(|t| format!(" ('{}')", t))
        .unwrap_or_default()
}
