//! Scene graph store.
//!
//! Immutable scene and choice data derived from the configuration. The
//! graph is built once at startup and only read afterwards. Building it
//! never fails: a missing or malformed configuration yields an empty graph
//! in which every lookup is a [`PlayerError::SceneNotFound`].

mod validate;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{AutoAdvanceMode, Config, SceneOptions};
use crate::error::PlayerError;

pub use validate::{GraphIssue, Severity};

/// Identifier of a scene (the key used in the configuration).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SceneId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scene classification; governs headings and end-of-clip behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneType {
    /// Overlay with the "continue" heading at clip end
    Continue,
    /// Overlay with the "question" heading at clip end
    Question,
    /// Persistent choice panel, optional auto-advance
    Main,
    /// Generic choice panel at clip end
    #[default]
    Other,
}

impl SceneType {
    /// Parse a configuration label. Case-insensitive; unknown labels are `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "continue" => Self::Continue,
            "question" => Self::Question,
            "main" => Self::Main,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Question => "question",
            Self::Main => "main",
            Self::Other => "other",
        }
    }
}

/// Heading variants of a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headings {
    pub generic: Option<String>,
    pub continue_heading: Option<String>,
    pub question_heading: Option<String>,
    pub interrupt: Option<String>,
}

impl Headings {
    /// Heading for the end-of-clip choices of a scene of the given type.
    pub fn for_scene_type(&self, scene_type: SceneType) -> Option<&str> {
        match scene_type {
            SceneType::Continue => self.continue_heading.as_deref(),
            SceneType::Question => self.question_heading.as_deref(),
            SceneType::Main | SceneType::Other => self.generic.as_deref(),
        }
    }
}

/// When a scene moves on to its default next scene by itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoAdvance {
    Never,
    /// Shortly after the clip completes
    OnCompletion(SceneId),
    /// A fixed delay after the clip starts
    AfterDelay(SceneId, Duration),
}

impl AutoAdvance {
    pub fn target(&self) -> Option<&SceneId> {
        match self {
            Self::Never => None,
            Self::OnCompletion(target) | Self::AfterDelay(target, _) => Some(target),
        }
    }
}

/// A labeled option that leads to another scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub next: Option<SceneId>,
    pub temporary: bool,
    pub image: Option<PathBuf>,
}

/// A node of the branching graph: one clip and its choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub id: SceneId,
    pub video: Option<PathBuf>,
    pub scene_type: SceneType,
    pub headings: Headings,
    pub default_next_scene: Option<SceneId>,
    pub auto_advance: AutoAdvance,
    pub choices: Vec<Choice>,
}

impl Scene {
    /// Choices shown at clip end, with their index into `choices`.
    pub fn regular_choices(&self) -> impl Iterator<Item = (usize, &Choice)> {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.temporary)
    }

    /// Choices offered during playback, with their index into `choices`.
    pub fn temporary_choices(&self) -> impl Iterator<Item = (usize, &Choice)> {
        self.choices.iter().enumerate().filter(|(_, c)| c.temporary)
    }

    pub fn has_temporary_choices(&self) -> bool {
        self.choices.iter().any(|c| c.temporary)
    }

    fn from_options(id: SceneId, video: Option<PathBuf>, options: Option<&SceneOptions>) -> Self {
        let Some(options) = options else {
            return Self {
                id,
                video,
                scene_type: SceneType::Other,
                headings: Headings::default(),
                default_next_scene: None,
                auto_advance: AutoAdvance::Never,
                choices: Vec::new(),
            };
        };

        let scene_type = options
            .scene_type
            .as_deref()
            .map(SceneType::from_label)
            .unwrap_or_default();
        let default_next_scene = options.default_next_scene.as_deref().map(SceneId::from);
        let auto_advance = auto_advance_policy(&id, default_next_scene.as_ref(), options);

        let choices = options
            .choices
            .iter()
            .map(|(label, choice)| Choice {
                label: label.clone(),
                next: choice
                    .next
                    .as_deref()
                    .filter(|next| !next.is_empty())
                    .map(SceneId::from),
                temporary: choice.temporary,
                image: choice.image.clone(),
            })
            .collect();

        Self {
            id,
            video,
            scene_type,
            headings: Headings {
                generic: options.heading.clone(),
                continue_heading: options.continue_heading.clone(),
                question_heading: options.question_heading.clone(),
                interrupt: options.interrupt_heading.clone(),
            },
            default_next_scene,
            auto_advance,
            choices,
        }
    }
}

fn auto_advance_policy(
    id: &SceneId,
    default_next: Option<&SceneId>,
    options: &SceneOptions,
) -> AutoAdvance {
    let Some(target) = default_next.cloned() else {
        return AutoAdvance::Never;
    };

    match options.auto_advance.unwrap_or(AutoAdvanceMode::OnCompletion) {
        AutoAdvanceMode::OnCompletion => AutoAdvance::OnCompletion(target),
        AutoAdvanceMode::Never => AutoAdvance::Never,
        AutoAdvanceMode::AfterDelay => match options.auto_advance_delay_ms {
            Some(ms) => AutoAdvance::AfterDelay(target, Duration::from_millis(ms)),
            None => {
                tracing::warn!(
                    scene = %id,
                    "auto_advance = \"after_delay\" without auto_advance_delay_ms, advancing on completion"
                );
                AutoAdvance::OnCompletion(target)
            }
        },
    }
}

/// The validated, read-only scene graph.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    start: Option<SceneId>,
    scenes: BTreeMap<SceneId, Scene>,
}

impl SceneGraph {
    /// A graph without scenes; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the graph from a parsed configuration.
    ///
    /// Scenes are the union of the `videos` and `options` keys.
    pub fn from_config(config: &Config) -> Self {
        let mut scenes = BTreeMap::new();

        let ids = config.videos.keys().chain(config.options.keys());
        for id in ids {
            if scenes.contains_key(id.as_str()) {
                continue;
            }
            let scene_id = SceneId::from(id.as_str());
            let scene = Scene::from_options(
                scene_id.clone(),
                config.videos.get(id).cloned(),
                config.options.get(id),
            );
            scenes.insert(scene_id, scene);
        }

        let start = config
            .start
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(SceneId::from);

        tracing::debug!(scenes = scenes.len(), start = ?start, "built scene graph");
        Self { start, scenes }
    }

    /// Load the graph from a configuration file, degrading to an empty graph.
    ///
    /// Configuration errors are logged, never returned.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(graph) => graph,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "configuration unavailable, starting with an empty scene graph"
                );
                Self::empty()
            }
        }
    }

    /// Load the graph from a configuration file, reporting configuration errors.
    pub fn try_load(path: &Path) -> Result<Self, PlayerError> {
        let config = Config::load(path)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(Self::from_config(&config))
    }

    /// The configured start scene, whether or not it exists.
    pub fn start(&self) -> Option<&SceneId> {
        self.start.as_ref()
    }

    /// The start scene if it exists in the graph.
    pub fn initial_scene(&self) -> Option<&SceneId> {
        self.start.as_ref().filter(|id| self.contains(id))
    }

    pub fn scene(&self, id: &str) -> Result<&Scene, PlayerError> {
        self.scenes
            .get(id)
            .ok_or_else(|| PlayerError::SceneNotFound(SceneId::from(id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// Choices of a scene in display order (empty for unknown scenes).
    pub fn choices(&self, id: &str) -> &[Choice] {
        self.scenes
            .get(id)
            .map(|scene| scene.choices.as_slice())
            .unwrap_or(&[])
    }

    /// Whether at least one choice of the scene is temporary.
    pub fn has_temporary_choices(&self, id: &str) -> bool {
        self.scenes
            .get(id)
            .is_some_and(|scene| scene.has_temporary_choices())
    }

    /// All scenes ordered by id.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
