//! Consistency report for a scene graph.
//!
//! Validation never rejects a graph. Broken references only turn into
//! logged no-ops at runtime; this report lets authors find them up front.

use std::fmt;

use super::{SceneGraph, SceneId, SceneType};

/// How bad an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found in the scene graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// No `start` key
    MissingStart,
    /// `start` names a scene that does not exist
    UnknownStart(SceneId),
    /// A scene with no `videos` entry
    MissingVideo { scene: SceneId },
    /// A choice without `next`
    ChoiceWithoutTarget { scene: SceneId, label: String },
    /// A choice whose `next` does not exist
    UnknownChoiceTarget {
        scene: SceneId,
        label: String,
        target: SceneId,
    },
    /// `default_next_scene` does not exist
    UnknownDefaultNext { scene: SceneId, target: SceneId },
    /// `default_next_scene` on a scene that is not `main`
    DefaultNextIgnored { scene: SceneId },
}

impl GraphIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingStart
            | Self::UnknownStart(_)
            | Self::UnknownChoiceTarget { .. }
            | Self::UnknownDefaultNext { .. } => Severity::Error,
            Self::MissingVideo { .. }
            | Self::ChoiceWithoutTarget { .. }
            | Self::DefaultNextIgnored { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "no start scene configured"),
            Self::UnknownStart(id) => write!(f, "start scene '{}' does not exist", id),
            Self::MissingVideo { scene } => write!(f, "scene '{}' has no video", scene),
            Self::ChoiceWithoutTarget { scene, label } => {
                write!(f, "choice '{label}' on scene '{scene}' has no next scene")
            }
            Self::UnknownChoiceTarget {
                scene,
                label,
                target,
            } => write!(
                f,
                "choice '{}' on scene '{}' leads to unknown scene '{}'",
                label, scene, target
            ),
            Self::UnknownDefaultNext { scene, target } => write!(
                f,
                "default_next_scene of '{}' is unknown scene '{}'",
                scene, target
            ),
            Self::DefaultNextIgnored { scene } => write!(
                f,
                "default_next_scene of '{}' is ignored (scene is not 'main')",
                scene
            ),
        }
    }
}

impl SceneGraph {
    /// Report dangling references and incomplete scenes.
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();

        match self.start() {
            None => issues.push(GraphIssue::MissingStart),
            Some(start) if !self.contains(start) => {
                issues.push(GraphIssue::UnknownStart(start.clone()))
            }
            Some(_) => {}
        }

        for scene in self.scenes() {
            if scene.video.is_none() {
                issues.push(GraphIssue::MissingVideo {
                    scene: scene.id.clone(),
                });
            }

            for choice in &scene.choices {
                match &choice.next {
                    None => issues.push(GraphIssue::ChoiceWithoutTarget {
                        scene: scene.id.clone(),
                        label: choice.label.clone(),
                    }),
                    Some(target) if !self.contains(target) => {
                        issues.push(GraphIssue::UnknownChoiceTarget {
                            scene: scene.id.clone(),
                            label: choice.label.clone(),
                            target: target.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            if let Some(target) = &scene.default_next_scene {
                if !self.contains(target) {
                    issues.push(GraphIssue::UnknownDefaultNext {
                        scene: scene.id.clone(),
                        target: target.clone(),
                    });
                }
                if scene.scene_type != SceneType::Main {
                    issues.push(GraphIssue::DefaultNextIgnored {
                        scene: scene.id.clone(),
                    });
                }
            }
        }

        issues
    }
}
