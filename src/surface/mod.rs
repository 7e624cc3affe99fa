//! Presentation surface capability.
//!
//! The player never draws anything itself. It tells a [`Surface`] which
//! overlays to show or hide and where they belong; the surface decides how
//! that looks. Viewer selections come back to the player as [`Selection`]s.
//!
//! # Module Structure
//!
//! - [`model`] - `OverlaySurface`, an in-memory surface the TUI renders from

pub mod model;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::assets::AssetResolver;
use crate::player::OverlayKind;
use crate::scene::{Choice, SceneId};

pub use model::OverlaySurface;

/// One choice as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    /// Index into the owning scene's choices
    pub index: usize,
    pub label: String,
    pub temporary: bool,
    /// Resolved image path, only set if the file exists
    pub image: Option<PathBuf>,
}

/// End-of-clip choices (overlay or panel) for one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOffer {
    pub kind: OverlayKind,
    pub scene: SceneId,
    pub heading: Option<String>,
    pub choices: Vec<ChoiceView>,
}

/// Temporary choices offered during playback, plus the skip control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptPanel {
    /// Scene the temporary choices belong to (the interrupted scene, if any)
    pub scene: SceneId,
    pub heading: Option<String>,
    pub choices: Vec<ChoiceView>,
    /// Shown only while an interruption is pending
    pub skip_visible: bool,
}

/// Where an overlay sits, relative to the video area (0.0..=1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryHint {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl GeometryHint {
    /// Default placement per overlay kind.
    ///
    /// End-of-clip overlays are centered 60% down, the main panel is a left
    /// sidebar and the interrupt panel hugs the right edge.
    pub fn for_overlay(kind: OverlayKind) -> Self {
        match kind {
            OverlayKind::Continue | OverlayKind::Question | OverlayKind::Generic => Self {
                x: 0.2,
                y: 0.6,
                width: 0.6,
                height: 0.3,
            },
            OverlayKind::MainPanel => Self {
                x: 0.0,
                y: 0.0,
                width: 0.25,
                height: 1.0,
            },
            OverlayKind::Interrupt => Self {
                x: 0.75,
                y: 0.1,
                width: 0.2,
                height: 0.8,
            },
        }
    }
}

/// Severity of a viewer-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the viewer (missing clip, missing image, empty story).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A viewer's pick: choice `index` of `scene`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub scene: SceneId,
    pub index: usize,
}

/// Presentation capability consumed by the player.
pub trait Surface {
    /// Show an end-of-clip overlay or panel, replacing any other one.
    fn show_choices(&mut self, offer: ChoiceOffer);

    /// Show or update the interrupt panel.
    fn show_interrupt_panel(&mut self, panel: InterruptPanel);

    /// Hide an overlay. Hiding a hidden overlay does nothing.
    fn clear_overlay(&mut self, kind: OverlayKind);

    /// Hide every overlay.
    fn clear_all(&mut self) {
        for kind in OverlayKind::CHOICE_KINDS {
            self.clear_overlay(kind);
        }
        self.clear_overlay(OverlayKind::Interrupt);
    }

    /// Move an overlay to the given placement.
    fn reposition(&mut self, kind: OverlayKind, hint: GeometryHint);

    /// Show a notice to the viewer.
    fn notify(&mut self, notice: Notice);
}

/// Choice images already reported missing.
///
/// An offer is rebuilt each time it is presented, and a scene can be
/// presented many times in one session.
#[derive(Debug, Default)]
pub struct MissingImages {
    reported: HashSet<PathBuf>,
}

impl MissingImages {
    /// Record `path`; true the first time it is seen.
    fn first_report(&mut self, path: &Path) -> bool {
        self.reported.insert(path.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }
}

/// Build display entries for a subset of a scene's choices.
///
/// Images are resolved against the asset base directory. A missing image
/// is dropped from the entry and reported on the surface once per path;
/// the choice itself stays selectable.
pub fn choice_views<'a, S>(
    choices: impl Iterator<Item = (usize, &'a Choice)>,
    assets: &AssetResolver,
    missing: &mut MissingImages,
    surface: &mut S,
) -> Vec<ChoiceView>
where
    S: Surface + ?Sized,
{
    choices
        .map(|(index, choice)| ChoiceView {
            index,
            label: choice.label.clone(),
            temporary: choice.temporary,
            image: choice.image.as_deref().and_then(|image| {
                locate_image(image, &choice.label, assets, missing, surface)
            }),
        })
        .collect()
}

fn locate_image<S>(
    image: &Path,
    label: &str,
    assets: &AssetResolver,
    missing: &mut MissingImages,
    surface: &mut S,
) -> Option<PathBuf>
where
    S: Surface + ?Sized,
{
    let resolved = assets.resolve(image);
    if resolved.exists() {
        return Some(resolved);
    }
    if missing.first_report(&resolved) {
        tracing::warn!(choice = label, path = %resolved.display(), "choice image not found");
        surface.notify(Notice::warning(format!(
            "Image not found: {}",
            resolved.display()
        )));
    }
    None
}
