//! End-of-clip dispatch.
//!
//! Turns a completion signal into the next UI action. Signals are checked
//! against the clip that is playing now; anything else is stale.

use crate::error::PlayerError;
use crate::player::state::{OverlayKind, PlayerState};
use crate::player::timer::Generation;
use crate::scene::{AutoAdvance, SceneGraph, SceneId, SceneType};

/// "The clip for `scene`, loaded as `generation`, has ended."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSignal {
    pub scene: SceneId,
    pub generation: Generation,
}

/// What to do after a clip ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOfClipAction {
    /// Return to the interrupted scene (after the resume grace delay)
    Resume,
    /// Overlay with the scene's regular choices (`continue` / `question`)
    ShowOverlay {
        scene: SceneId,
        overlay: OverlayKind,
    },
    /// Persistent panel of a `main` scene, optionally advancing by itself
    ShowMainPanel {
        scene: SceneId,
        auto_advance: Option<SceneId>,
    },
    /// Generic choice panel for any other scene
    ShowGeneric { scene: SceneId },
}

impl EndOfClipAction {
    /// The state the player enters for this action (`None` for `Resume`).
    pub fn pending_state(&self) -> Option<PlayerState> {
        match self {
            Self::Resume => None,
            Self::ShowOverlay { scene, overlay } => Some(PlayerState::PendingChoice {
                scene: scene.clone(),
                overlay: *overlay,
            }),
            Self::ShowMainPanel { scene, .. } => Some(PlayerState::PendingChoice {
                scene: scene.clone(),
                overlay: OverlayKind::MainPanel,
            }),
            Self::ShowGeneric { scene } => Some(PlayerState::PendingChoice {
                scene: scene.clone(),
                overlay: OverlayKind::Generic,
            }),
        }
    }
}

/// Accepts each clip's completion once and picks the follow-up.
#[derive(Debug, Default)]
pub struct EndOfClipDispatcher {
    last_handled: Option<Generation>,
}

impl EndOfClipDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what follows the completion described by `signal`.
    ///
    /// `current` is the generation of the clip that is loaded now. A signal
    /// for another scene or generation, or a repeat for an already handled
    /// clip, is a `StaleSignal`.
    pub fn dispatch(
        &mut self,
        signal: &CompletionSignal,
        state: &PlayerState,
        current: Generation,
        graph: &SceneGraph,
    ) -> Result<EndOfClipAction, PlayerError> {
        let stale = || PlayerError::StaleSignal {
            scene: signal.scene.clone(),
            generation: signal.generation.value(),
        };

        if signal.generation != current
            || state.current_scene() != Some(&signal.scene)
            || self.last_handled == Some(current)
        {
            return Err(stale());
        }

        let action = match state {
            PlayerState::Idle => return Err(stale()),
            PlayerState::Interrupted { .. } => EndOfClipAction::Resume,
            PlayerState::Playing { scene } | PlayerState::PendingChoice { scene, .. } => {
                let details = graph.scene(scene)?;
                match details.scene_type {
                    SceneType::Continue | SceneType::Question => EndOfClipAction::ShowOverlay {
                        scene: scene.clone(),
                        overlay: OverlayKind::for_scene_type(details.scene_type),
                    },
                    SceneType::Main => EndOfClipAction::ShowMainPanel {
                        scene: scene.clone(),
                        auto_advance: match &details.auto_advance {
                            AutoAdvance::OnCompletion(target) => Some(target.clone()),
                            AutoAdvance::AfterDelay(..) | AutoAdvance::Never => None,
                        },
                    },
                    SceneType::Other => EndOfClipAction::ShowGeneric {
                        scene: scene.clone(),
                    },
                }
            }
        };

        self.last_handled = Some(current);
        tracing::debug!(
            scene = %signal.scene,
            generation = current.value(),
            action = ?action,
            "clip ended"
        );
        Ok(action)
    }
}
