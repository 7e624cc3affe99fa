//! Interrupt affordance scheduling.
//!
//! The interrupt panel (temporary choices plus the skip control) is visible
//! exactly when the base scene, the interrupted scene or else the current
//! one, has temporary choices. The skip control appears only while an
//! interruption is pending. Show and hide calls are only issued on change.

use crate::assets::AssetResolver;
use crate::player::state::{OverlayKind, PlayerState};
use crate::scene::{SceneGraph, SceneId};
use crate::surface::{self, GeometryHint, InterruptPanel, MissingImages, Surface};

/// What the scheduler last put on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    Hidden,
    Visible { scene: SceneId, skip: bool },
}

/// Keeps the interrupt panel in line with the player state.
#[derive(Debug)]
pub struct InterruptScheduler {
    affordance: Affordance,
}

impl Default for InterruptScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptScheduler {
    pub fn new() -> Self {
        Self {
            affordance: Affordance::Hidden,
        }
    }

    pub fn affordance(&self) -> &Affordance {
        &self.affordance
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.affordance, Affordance::Visible { .. })
    }

    /// Whether the panel currently offers temporary choices of `scene`.
    pub fn offers(&self, scene: &SceneId) -> bool {
        matches!(&self.affordance, Affordance::Visible { scene: shown, .. } if shown == scene)
    }

    /// The surface was cleared wholesale; the panel is gone.
    pub fn forget(&mut self) {
        self.affordance = Affordance::Hidden;
    }

    /// Show, update or hide the panel to match `state`.
    ///
    /// Returns whether anything was sent to the surface.
    pub fn evaluate<S>(
        &mut self,
        state: &PlayerState,
        graph: &SceneGraph,
        assets: &AssetResolver,
        missing: &mut MissingImages,
        surface: &mut S,
    ) -> bool
    where
        S: Surface + ?Sized,
    {
        let wanted = match state.base_scene() {
            Some(base) if graph.has_temporary_choices(base) => Affordance::Visible {
                scene: base.clone(),
                skip: state.is_interrupted(),
            },
            _ => Affordance::Hidden,
        };

        if wanted == self.affordance {
            return false;
        }

        match &wanted {
            Affordance::Hidden => {
                tracing::debug!("hiding interrupt panel");
                surface.clear_overlay(OverlayKind::Interrupt);
            }
            Affordance::Visible { scene, skip } => {
                let Ok(base) = graph.scene(scene) else {
                    return false;
                };
                let choices =
                    surface::choice_views(base.temporary_choices(), assets, missing, surface);
                tracing::debug!(
                    scene = %scene,
                    skip,
                    choices = choices.len(),
                    "showing interrupt panel"
                );
                surface.show_interrupt_panel(InterruptPanel {
                    scene: scene.clone(),
                    heading: base.headings.interrupt.clone(),
                    choices,
                    skip_visible: *skip,
                });
                surface.reposition(
                    OverlayKind::Interrupt,
                    GeometryHint::for_overlay(OverlayKind::Interrupt),
                );
            }
        }

        self.affordance = wanted;
        true
    }

    /// Re-apply the panel's placement. Never touches the player state.
    pub fn reposition<S>(&self, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        if self.is_visible() {
            surface.reposition(
                OverlayKind::Interrupt,
                GeometryHint::for_overlay(OverlayKind::Interrupt),
            );
        }
    }
}
