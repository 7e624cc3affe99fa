//! In-memory presentation surface.
//!
//! Keeps what should be on screen (one choice overlay, the interrupt panel,
//! overlay placements and notices) without drawing anything. The terminal
//! front end renders from it; tests inspect it directly.

use std::collections::HashMap;

use super::{ChoiceOffer, GeometryHint, InterruptPanel, Notice, Selection, Surface};
use crate::player::OverlayKind;

/// Maximum number of notices kept around.
const MAX_NOTICES: usize = 16;

/// Overlay state the renderer draws from.
#[derive(Debug, Default)]
pub struct OverlaySurface {
    choices: Option<ChoiceOffer>,
    interrupt: Option<InterruptPanel>,
    geometry: HashMap<OverlayKind, GeometryHint>,
    notices: Vec<Notice>,
    revision: u64,
}

impl OverlaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible end-of-clip overlay or panel.
    pub fn choice_offer(&self) -> Option<&ChoiceOffer> {
        self.choices.as_ref()
    }

    /// The visible interrupt panel.
    pub fn interrupt_panel(&self) -> Option<&InterruptPanel> {
        self.interrupt.as_ref()
    }

    /// Last placement received for an overlay kind.
    pub fn geometry(&self, kind: OverlayKind) -> GeometryHint {
        self.geometry
            .get(&kind)
            .copied()
            .unwrap_or_else(|| GeometryHint::for_overlay(kind))
    }

    /// Notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Drop all notices (the viewer dismissed them).
    pub fn dismiss_notices(&mut self) {
        if !self.notices.is_empty() {
            self.notices.clear();
            self.revision += 1;
        }
    }

    /// Bumped on every observable change; equal revisions mean nothing changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Selection for the `n`th (0-based) entry of the visible choice overlay.
    pub fn select_offered(&self, n: usize) -> Option<Selection> {
        let offer = self.choices.as_ref()?;
        offer.choices.get(n).map(|view| Selection {
            scene: offer.scene.clone(),
            index: view.index,
        })
    }

    /// Selection for the `n`th (0-based) entry of the visible interrupt panel.
    pub fn select_interrupt(&self, n: usize) -> Option<Selection> {
        let panel = self.interrupt.as_ref()?;
        panel.choices.get(n).map(|view| Selection {
            scene: panel.scene.clone(),
            index: view.index,
        })
    }

    /// Selection for a visible choice by label (interrupt panel first).
    pub fn select_label(&self, label: &str) -> Option<Selection> {
        let in_panel = self.interrupt.as_ref().and_then(|panel| {
            panel
                .choices
                .iter()
                .find(|view| view.label == label)
                .map(|view| Selection {
                    scene: panel.scene.clone(),
                    index: view.index,
                })
        });

        in_panel.or_else(|| {
            let offer = self.choices.as_ref()?;
            offer
                .choices
                .iter()
                .find(|view| view.label == label)
                .map(|view| Selection {
                    scene: offer.scene.clone(),
                    index: view.index,
                })
        })
    }
}

impl Surface for OverlaySurface {
    fn show_choices(&mut self, offer: ChoiceOffer) {
        if self.choices.as_ref() == Some(&offer) {
            return;
        }
        tracing::debug!(
            kind = ?offer.kind,
            scene = %offer.scene,
            choices = offer.choices.len(),
            "showing choices"
        );
        self.choices = Some(offer);
        self.revision += 1;
    }

    fn show_interrupt_panel(&mut self, panel: InterruptPanel) {
        if self.interrupt.as_ref() == Some(&panel) {
            return;
        }
        tracing::debug!(scene = %panel.scene, skip = panel.skip_visible, "showing interrupt panel");
        self.interrupt = Some(panel);
        self.revision += 1;
    }

    fn clear_overlay(&mut self, kind: OverlayKind) {
        let cleared = match kind {
            OverlayKind::Interrupt => self.interrupt.take().is_some(),
            _ => {
                let shown = self.choices.as_ref().map(|offer| offer.kind);
                if shown == Some(kind) {
                    self.choices = None;
                    true
                } else {
                    false
                }
            }
        };
        if cleared {
            self.revision += 1;
        }
    }

    fn reposition(&mut self, kind: OverlayKind, hint: GeometryHint) {
        if self.geometry.get(&kind) != Some(&hint) {
            self.geometry.insert(kind, hint);
            self.revision += 1;
        }
    }

    fn notify(&mut self, notice: Notice) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(notice);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneId;
    use crate::surface::ChoiceView;

    fn view(index: usize, label: &str, temporary: bool) -> ChoiceView {
        ChoiceView {
            index,
            label: label.to_string(),
            temporary,
            image: None,
        }
    }

    fn offer() -> ChoiceOffer {
        ChoiceOffer {
            kind: OverlayKind::Continue,
            scene: SceneId::from("s1"),
            heading: Some("Next?".to_string()),
            choices: vec![view(0, "Go", false), view(2, "Stay", false)],
        }
    }

    fn panel() -> InterruptPanel {
        InterruptPanel {
            scene: SceneId::from("s1"),
            heading: None,
            choices: vec![view(1, "Peek", true)],
            skip_visible: false,
        }
    }

    #[test]
    fn showing_same_offer_twice_is_a_no_op() {
        let mut surface = OverlaySurface::new();
        surface.show_choices(offer());
        let revision = surface.revision();
        surface.show_choices(offer());
        assert_eq!(surface.revision(), revision);
    }

    #[test]
    fn showing_same_panel_twice_is_a_no_op() {
        let mut surface = OverlaySurface::new();
        surface.show_interrupt_panel(panel());
        let revision = surface.revision();
        surface.show_interrupt_panel(panel());
        assert_eq!(surface.revision(), revision);
    }

    #[test]
    fn clearing_hidden_overlay_is_a_no_op() {
        let mut surface = OverlaySurface::new();
        surface.clear_all();
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn clear_only_hits_matching_kind() {
        let mut surface = OverlaySurface::new();
        surface.show_choices(offer());
        surface.show_interrupt_panel(panel());

        surface.clear_overlay(OverlayKind::Question);
        assert!(surface.choice_offer().is_some());

        surface.clear_overlay(OverlayKind::Continue);
        assert!(surface.choice_offer().is_none());
        assert!(surface.interrupt_panel().is_some());

        surface.clear_all();
        assert!(surface.interrupt_panel().is_none());
    }

    #[test]
    fn selections_map_to_scene_choice_indices() {
        let mut surface = OverlaySurface::new();
        surface.show_choices(offer());
        surface.show_interrupt_panel(panel());

        assert_eq!(
            surface.select_offered(1),
            Some(Selection {
                scene: SceneId::from("s1"),
                index: 2
            })
        );
        assert_eq!(surface.select_offered(5), None);
        assert_eq!(surface.select_interrupt(0).map(|s| s.index), Some(1));
        assert_eq!(surface.select_label("Peek").map(|s| s.index), Some(1));
        assert_eq!(surface.select_label("Go").map(|s| s.index), Some(0));
        assert_eq!(surface.select_label("Nope"), None);
    }

    #[test]
    fn notices_are_bounded() {
        let mut surface = OverlaySurface::new();
        for i in 0..(MAX_NOTICES + 4) {
            surface.notify(Notice::info(format!("n{i}")));
        }
        assert_eq!(surface.notices().len(), MAX_NOTICES);
        assert_eq!(
            surface.latest_notice().map(|n| n.message.as_str()),
            Some("n19")
        );
        surface.dismiss_notices();
        assert!(surface.notices().is_empty());
    }

    #[test]
    fn reposition_only_changes_on_new_geometry() {
        let mut surface = OverlaySurface::new();
        let hint = GeometryHint::for_overlay(OverlayKind::Interrupt);
        surface.reposition(OverlayKind::Interrupt, hint);
        let revision = surface.revision();
        surface.reposition(OverlayKind::Interrupt, hint);
        assert_eq!(surface.revision(), revision);
        assert_eq!(surface.geometry(OverlayKind::Interrupt), hint);
    }
}
