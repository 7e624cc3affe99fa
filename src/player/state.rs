//! Player state
//!
//! The single mutable state of the player as an explicit tagged union,
//! plus the flat snapshot view used for display and assertions.

use std::fmt;
use std::time::Duration;

use crate::scene::{SceneId, SceneType};

/// Kind of choice overlay on the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// End-of-clip overlay of a `continue` scene
    Continue,
    /// End-of-clip overlay of a `question` scene
    Question,
    /// Persistent choice panel of a `main` scene
    MainPanel,
    /// Generic choice panel of any other scene
    Generic,
    /// Temporary choices and skip control shown during playback
    Interrupt,
}

impl OverlayKind {
    /// Kinds that carry end-of-clip choices (everything except the interrupt panel).
    pub const CHOICE_KINDS: [OverlayKind; 4] = [
        OverlayKind::Continue,
        OverlayKind::Question,
        OverlayKind::MainPanel,
        OverlayKind::Generic,
    ];

    /// The end-of-clip overlay used for a scene type.
    pub fn for_scene_type(scene_type: SceneType) -> Self {
        match scene_type {
            SceneType::Continue => Self::Continue,
            SceneType::Question => Self::Question,
            SceneType::Main => Self::MainPanel,
            SceneType::Other => Self::Generic,
        }
    }
}

/// The playback state machine's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// No scene: the graph is empty or has no valid start scene
    Idle,
    /// A scene's clip is playing
    Playing { scene: SceneId },
    /// A clip ended and its choices are on screen
    PendingChoice {
        scene: SceneId,
        overlay: OverlayKind,
    },
    /// A temporary choice interrupted `base` at `resume_position`; `active` plays now
    Interrupted {
        base: SceneId,
        resume_position: Duration,
        active: SceneId,
    },
}

impl PlayerState {
    /// Initial state for a start scene (or `Idle` without one).
    pub fn initial(start: Option<&SceneId>) -> Self {
        match start {
            Some(scene) => Self::Playing {
                scene: scene.clone(),
            },
            None => Self::Idle,
        }
    }

    /// The scene whose clip is loaded.
    pub fn current_scene(&self) -> Option<&SceneId> {
        match self {
            Self::Idle => None,
            Self::Playing { scene } | Self::PendingChoice { scene, .. } => Some(scene),
            Self::Interrupted { active, .. } => Some(active),
        }
    }

    /// The scene whose temporary choices drive the interrupt affordance.
    ///
    /// The interrupted scene while interrupted, the current scene otherwise.
    pub fn base_scene(&self) -> Option<&SceneId> {
        match self {
            Self::Interrupted { base, .. } => Some(base),
            other => other.current_scene(),
        }
    }

    /// The pending resume point, if interrupted.
    pub fn resume_point(&self) -> Option<(&SceneId, Duration)> {
        match self {
            Self::Interrupted {
                base,
                resume_position,
                ..
            } => Some((base, *resume_position)),
            _ => None,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }

    /// Flat view of the state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let resume = self.resume_point();
        PlaybackSnapshot {
            current_scene_id: self.current_scene().cloned(),
            resume_scene_id: resume.map(|(scene, _)| scene.clone()),
            resume_position: resume.map(|(_, position)| position),
        }
    }
}

/// Flat view of [`PlayerState`]: current scene plus resume fields.
///
/// `resume_scene_id` and `resume_position` are both set or both unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub current_scene_id: Option<SceneId>,
    pub resume_scene_id: Option<SceneId>,
    pub resume_position: Option<Duration>,
}

impl PlaybackSnapshot {
    /// Resume position, zero when nothing is pending.
    pub fn resume_position_or_zero(&self) -> Duration {
        self.resume_position.unwrap_or(Duration::ZERO)
    }
}

impl fmt::Display for PlaybackSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self
            .current_scene_id
            .as_ref()
            .map(SceneId::as_str)
            .unwrap_or("-");
        write!(f, "current={}", current)?;
        match (&self.resume_scene_id, self.resume_position) {
            (Some(scene), Some(position)) => {
                write!(f, " resume={}@{}ms", scene, position.as_millis())
            }
            _ => write!(f, " resume=-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SceneId {
        SceneId::from(s)
    }

    #[test]
    fn initial_state_plays_start_scene() {
        assert_eq!(
            PlayerState::initial(Some(&id("s1"))),
            PlayerState::Playing { scene: id("s1") }
        );
        assert_eq!(PlayerState::initial(None), PlayerState::Idle);
    }

    #[test]
    fn interrupted_reports_active_as_current_and_base_for_affordance() {
        let state = PlayerState::Interrupted {
            base: id("s1"),
            resume_position: Duration::from_millis(12_000),
            active: id("s1b"),
        };
        assert_eq!(state.current_scene(), Some(&id("s1b")));
        assert_eq!(state.base_scene(), Some(&id("s1")));
        assert!(state.is_interrupted());
    }

    #[test]
    fn snapshot_keeps_resume_fields_paired() {
        let playing = PlayerState::Playing { scene: id("s2") }.snapshot();
        assert_eq!(playing.resume_scene_id, None);
        assert_eq!(playing.resume_position, None);
        assert_eq!(playing.resume_position_or_zero(), Duration::ZERO);

        let interrupted = PlayerState::Interrupted {
            base: id("s1"),
            resume_position: Duration::from_millis(500),
            active: id("x"),
        }
        .snapshot();
        assert_eq!(interrupted.resume_scene_id, Some(id("s1")));
        assert_eq!(
            interrupted.resume_position,
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn idle_has_no_scenes() {
        let idle = PlayerState::Idle;
        assert!(idle.current_scene().is_none());
        assert!(idle.base_scene().is_none());
        assert_eq!(idle.snapshot().to_string(), "current=- resume=-");
    }

    #[test]
    fn snapshot_display_shows_resume_point() {
        let state = PlayerState::Interrupted {
            base: id("s1"),
            resume_position: Duration::from_millis(12_000),
            active: id("s1c"),
        };
        assert_eq!(
            state.snapshot().to_string(),
            "current=s1c resume=s1@12000ms"
        );
    }

    #[test]
    fn overlay_kind_follows_scene_type() {
        assert_eq!(
            OverlayKind::for_scene_type(SceneType::Question),
            OverlayKind::Question
        );
        assert_eq!(
            OverlayKind::for_scene_type(SceneType::Main),
            OverlayKind::MainPanel
        );
        assert_eq!(
            OverlayKind::for_scene_type(SceneType::Other),
            OverlayKind::Generic
        );
    }
}
