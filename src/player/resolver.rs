//! Transition resolver
//!
//! Pure functions from (state, input) to the next state. No playback or
//! presentation capability is involved; the machine applies the result.

use std::time::Duration;

use crate::error::PlayerError;
use crate::player::state::PlayerState;
use crate::scene::{Choice, SceneGraph, SceneId};

/// A resolved transition: the state to enter and where to seek once the clip loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: PlayerState,
    pub seek_to: Option<Duration>,
}

impl Transition {
    fn play(scene: SceneId) -> Self {
        Self {
            next: PlayerState::Playing { scene },
            seek_to: None,
        }
    }
}

/// Resolve a selected choice.
///
/// `position` is the playback position at selection time; it becomes the
/// resume position when the choice starts an interruption.
///
/// - no target, or a target outside the graph: `UnknownTransition`
/// - non-temporary: play the target, dropping any pending interruption
/// - temporary, not interrupted: interrupt the current scene at `position`
/// - temporary, interrupted: switch the active scene, keep the first resume point
pub fn resolve(
    state: &PlayerState,
    choice: &Choice,
    position: Duration,
    graph: &SceneGraph,
) -> Result<Transition, PlayerError> {
    let from = state
        .current_scene()
        .cloned()
        .unwrap_or_else(|| SceneId::from(""));

    let target = match &choice.next {
        Some(target) if graph.contains(target) => target.clone(),
        other => {
            return Err(PlayerError::UnknownTransition {
                scene: from,
                label: choice.label.clone(),
                target: other.clone(),
            })
        }
    };

    if !choice.temporary {
        return Ok(Transition::play(target));
    }

    let next = match state {
        PlayerState::Interrupted {
            base,
            resume_position,
            ..
        } => PlayerState::Interrupted {
            base: base.clone(),
            resume_position: *resume_position,
            active: target,
        },
        PlayerState::Playing { scene } | PlayerState::PendingChoice { scene, .. } => {
            PlayerState::Interrupted {
                base: scene.clone(),
                resume_position: position,
                active: target,
            }
        }
        // Nothing to come back to
        PlayerState::Idle => PlayerState::Playing { scene: target },
    };

    Ok(Transition {
        next,
        seek_to: None,
    })
}

/// Resolve a skip: return to the interrupted scene at its resume position.
///
/// `None` when nothing is interrupted.
pub fn resolve_skip(state: &PlayerState) -> Option<Transition> {
    match state {
        PlayerState::Interrupted {
            base,
            resume_position,
            ..
        } => Some(Transition {
            next: PlayerState::Playing {
                scene: base.clone(),
            },
            seek_to: Some(*resume_position),
        }),
        _ => None,
    }
}

/// Resolve an automatic advance to `target` (a scene's default next scene).
pub fn advance_to(
    state: &PlayerState,
    target: &SceneId,
    graph: &SceneGraph,
) -> Result<Transition, PlayerError> {
    if graph.contains(target) {
        Ok(Transition::play(target.clone()))
    } else {
        Err(PlayerError::UnknownTransition {
            scene: state
                .current_scene()
                .cloned()
                .unwrap_or_else(|| SceneId::from("")),
            label: "default_next_scene".to_string(),
            target: Some(target.clone()),
        })
    }
}
