//! Playback state machine.
//!
//! Owns the player state and is the only place it changes. Inputs arrive
//! one at a time from the owning loop: viewer selections, skips, pause and
//! seek controls, and timer ticks (which poll the playback capability for
//! clip completion and run deferred tasks).
//!
//! Every scene change clears the surface once and starts one clip. Each
//! clip start bumps the generation; completions and deferred tasks from an
//! older generation are discarded.

use std::time::{Duration, Instant};

use crate::assets::AssetResolver;
use crate::error::PlayerError;
use crate::player::dispatcher::{CompletionSignal, EndOfClipAction, EndOfClipDispatcher};
use crate::player::interrupt::InterruptScheduler;
use crate::player::resolver::{self, Transition};
use crate::player::state::{OverlayKind, PlaybackSnapshot, PlayerState};
use crate::player::timer::{Generation, Task, TimerQueue};
use crate::playback::{ClipToken, Playback, PlaybackError, PlaybackEvent};
use crate::scene::{AutoAdvance, SceneGraph, SceneId, SceneType};
use crate::settings::PlayerSettings;
use crate::surface::{self, ChoiceOffer, GeometryHint, MissingImages, Notice, Selection, Surface};

/// The branching player.
pub struct PlaybackMachine<P: Playback, S: Surface> {
    graph: SceneGraph,
    assets: AssetResolver,
    settings: PlayerSettings,
    playback: P,
    surface: S,
    state: PlayerState,
    generation: Generation,
    clip: Option<ClipToken>,
    timers: TimerQueue,
    interrupt: InterruptScheduler,
    dispatcher: EndOfClipDispatcher,
    missing_images: MissingImages,
    /// End-of-clip overlay or panel currently on the surface
    offer: Option<OverlayKind>,
}

impl<P: Playback, S: Surface> PlaybackMachine<P, S> {
    pub fn new(
        graph: SceneGraph,
        assets: AssetResolver,
        settings: PlayerSettings,
        playback: P,
        surface: S,
    ) -> Self {
        let state = PlayerState::initial(graph.initial_scene());
        if let (Some(start), PlayerState::Idle) = (graph.start(), &state) {
            tracing::warn!(start = %start, "start scene is not part of the scene graph");
        }

        Self {
            graph,
            assets,
            settings,
            playback,
            surface,
            state,
            generation: Generation::default(),
            clip: None,
            timers: TimerQueue::new(),
            interrupt: InterruptScheduler::new(),
            dispatcher: EndOfClipDispatcher::new(),
            missing_images: MissingImages::default(),
            offer: None,
        }
    }

    /// Arm the polling and reposition ticks and start the initial scene.
    pub fn start(&mut self, now: Instant) -> Result<(), PlayerError> {
        self.timers
            .schedule_every(now, self.settings.poll_interval, Task::PollPlayback);
        self.timers
            .schedule_every(now, self.settings.reposition_interval, Task::Reposition);

        let Some(scene) = self.state.current_scene().cloned() else {
            let message = if self.graph.is_empty() {
                "No scenes configured"
            } else {
                "No valid start scene configured"
            };
            tracing::info!("{}", message);
            self.surface.notify(Notice::info(message));
            return Ok(());
        };

        tracing::info!(scene = %scene, scenes = self.graph.len(), "starting playback");
        if let Err(err) = self.load_clip(&scene) {
            self.report(&err);
            self.present();
            return Err(err);
        }
        self.arm_clip_timers(now);
        self.present();
        Ok(())
    }

    /// Apply a viewer's choice.
    ///
    /// The selection must name the current or the base scene and a valid
    /// choice index; anything else is a stale signal.
    pub fn select(&mut self, selection: &Selection, now: Instant) -> Result<(), PlayerError> {
        let result = self.try_select(selection, now);
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    fn try_select(&mut self, selection: &Selection, now: Instant) -> Result<(), PlayerError> {
        let stale = || PlayerError::StaleSignal {
            scene: selection.scene.clone(),
            generation: self.generation.value(),
        };

        let offered = self.state.current_scene() == Some(&selection.scene)
            || self.state.base_scene() == Some(&selection.scene);
        if !offered {
            return Err(stale());
        }

        let choice = self
            .graph
            .choices(&selection.scene)
            .get(selection.index)
            .cloned()
            .ok_or_else(stale)?;

        let position = self.playback.position();
        tracing::info!(
            scene = %selection.scene,
            choice = %choice.label,
            temporary = choice.temporary,
            position_ms = position.as_millis() as u64,
            "choice selected"
        );
        let transition = resolver::resolve(&self.state, &choice, position, &self.graph)?;
        self.enter(transition, now)
    }

    /// Return from an interruption to the resume point right away.
    ///
    /// Does nothing unless interrupted.
    pub fn skip(&mut self, now: Instant) -> Result<(), PlayerError> {
        let Some(transition) = resolver::resolve_skip(&self.state) else {
            tracing::debug!(state = %self.state.snapshot(), "skip ignored, nothing to resume");
            return Ok(());
        };
        tracing::info!(state = %self.state.snapshot(), "skipping back to resume point");
        let result = self.enter(transition, now);
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    /// Pause or continue the current clip. The player state is untouched.
    pub fn toggle_pause(&mut self) {
        if self.playback.is_playing() {
            self.playback.pause();
            tracing::debug!("paused");
        } else {
            self.playback.resume();
            tracing::debug!("resumed");
        }
    }

    /// Seek within the current clip by a signed offset in milliseconds.
    pub fn seek_relative(&mut self, offset_ms: i64) {
        let Some(duration) = self.playback.duration() else {
            return;
        };
        let current = self.playback.position();
        let delta = Duration::from_millis(offset_ms.unsigned_abs());
        let target = if offset_ms < 0 {
            current.saturating_sub(delta)
        } else {
            (current + delta).min(duration)
        };
        tracing::debug!(
            from_ms = current.as_millis() as u64,
            to_ms = target.as_millis() as u64,
            "seek"
        );
        self.playback.set_position(target);
    }

    /// Set the volume level. The player state is untouched.
    pub fn set_volume(&mut self, volume: u8) {
        self.playback.set_volume(volume);
        tracing::debug!(volume = self.playback.volume(), "volume");
    }

    /// Mute or unmute. The player state is untouched.
    pub fn toggle_mute(&mut self) {
        self.playback.toggle_mute();
        tracing::debug!(muted = self.playback.is_muted(), "mute toggled");
    }

    /// Jump to the end of the current clip and handle its completion now.
    pub fn finish_clip(&mut self, now: Instant) {
        if let Some(duration) = self.playback.duration() {
            self.playback.set_position(duration);
        }
        self.poll_playback(now);
    }

    /// Stop the clip and drop every pending task. The state stays readable.
    pub fn shutdown(&mut self) {
        self.playback.stop();
        self.clip = None;
        self.timers = TimerQueue::new();
        tracing::debug!(state = %self.state.snapshot(), "player shut down");
    }

    /// Run every task that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(task) = self.timers.pop_due(now, self.generation) {
            match task {
                Task::PollPlayback => self.poll_playback(now),
                Task::Reposition => self.reposition(),
                Task::Resume => {
                    if let Err(err) = self.skip(now) {
                        tracing::debug!(error = %err, "resume failed");
                    }
                }
                Task::AutoAdvance { target } => self.auto_advance(&target, now),
            }
        }
    }

    /// When the next deferred or repeating task falls due.
    pub fn next_due(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.snapshot()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Log an error at the level its kind deserves and tell the viewer if needed.
    pub fn report(&mut self, err: &PlayerError) {
        match err {
            PlayerError::StaleSignal { .. } => tracing::debug!(error = %err, "discarded"),
            PlayerError::UnknownTransition { .. } | PlayerError::SceneNotFound(_) => {
                tracing::warn!(error = %err, "transition ignored")
            }
            _ => tracing::error!(error = %err, "playback problem"),
        }
        if err.is_user_visible() {
            self.surface.notify(Notice::error(err.to_string()));
        }
    }

    /// Drain completion events from the playback capability.
    fn poll_playback(&mut self, now: Instant) {
        while let Some(event) = self.playback.poll_event() {
            match event {
                PlaybackEvent::Ended(token) if Some(token) == self.clip => {
                    let Some(scene) = self.state.current_scene().cloned() else {
                        continue;
                    };
                    let signal = CompletionSignal {
                        scene,
                        generation: self.generation,
                    };
                    self.on_completion(&signal, now);
                }
                PlaybackEvent::Ended(token) => {
                    tracing::debug!(token = token.0, "ignoring completion of a replaced clip");
                }
            }
        }
    }

    fn on_completion(&mut self, signal: &CompletionSignal, now: Instant) {
        let dispatched = self
            .dispatcher
            .dispatch(signal, &self.state, self.generation, &self.graph);
        let action = match dispatched {
            Ok(action) => action,
            Err(err) => {
                self.report(&err);
                return;
            }
        };

        if let EndOfClipAction::Resume = action {
            tracing::debug!(
                delay_ms = self.settings.resume_grace.as_millis() as u64,
                "resume scheduled"
            );
            self.timers.schedule_once(
                now,
                self.settings.resume_grace,
                self.generation,
                Task::Resume,
            );
            return;
        }

        if let Some(pending) = action.pending_state() {
            self.state = pending;
        }
        self.present();

        if let EndOfClipAction::ShowMainPanel {
            auto_advance: Some(target),
            ..
        } = action
        {
            tracing::debug!(target = %target, "auto-advance scheduled");
            self.timers.schedule_once(
                now,
                self.settings.auto_advance_grace,
                self.generation,
                Task::AutoAdvance { target },
            );
        }
    }

    fn auto_advance(&mut self, target: &SceneId, now: Instant) {
        tracing::info!(target = %target, "auto-advancing");
        let result = resolver::advance_to(&self.state, target, &self.graph)
            .and_then(|transition| self.enter(transition, now));
        if let Err(err) = result {
            self.report(&err);
        }
    }

    /// Move to `transition.next`, loading its clip if the scene changes.
    fn enter(&mut self, transition: Transition, now: Instant) -> Result<(), PlayerError> {
        let Some(scene) = transition.next.current_scene().cloned() else {
            self.state = transition.next;
            self.present();
            return Ok(());
        };

        if let Err(err) = self.load_clip(&scene) {
            // The old clip keeps its state; put its overlays back
            self.present();
            return Err(err);
        }

        tracing::info!(
            from = %self.state.snapshot(),
            to = %transition.next.snapshot(),
            "transition"
        );
        self.state = transition.next;
        if let Some(position) = transition.seek_to {
            self.playback.set_position(position);
        }
        self.arm_clip_timers(now);
        self.present();
        Ok(())
    }

    /// Clear the surface once and start the scene's clip.
    fn load_clip(&mut self, scene: &SceneId) -> Result<(), PlayerError> {
        let details = self.graph.scene(scene)?;
        let video = details
            .video
            .as_deref()
            .ok_or_else(|| PlayerError::MissingVideo(scene.clone()))?;
        let path = self.assets.resolve(video);

        self.surface.clear_all();
        self.interrupt.forget();
        self.offer = None;

        match self.playback.play(&path) {
            Ok(token) => {
                self.clip = Some(token);
                self.generation = self.generation.next();
                tracing::debug!(
                    scene = %scene,
                    generation = self.generation.value(),
                    "clip loaded"
                );
                Ok(())
            }
            Err(PlaybackError::MediaNotFound { path }) => Err(PlayerError::AssetNotFound {
                scene: scene.clone(),
                path,
            }),
            Err(err) => Err(PlayerError::Playback {
                scene: scene.clone(),
                message: err.to_string(),
            }),
        }
    }

    /// Timers that start with a clip: delayed auto-advance of main scenes.
    fn arm_clip_timers(&mut self, now: Instant) {
        let Some(scene) = self.state.current_scene() else {
            return;
        };
        let Ok(details) = self.graph.scene(scene) else {
            return;
        };
        if let (SceneType::Main, AutoAdvance::AfterDelay(target, delay)) =
            (details.scene_type, &details.auto_advance)
        {
            // Counted from the clip start, so a resumed clip only waits out the rest
            let remaining = delay.saturating_sub(self.playback.position());
            tracing::debug!(
                target = %target,
                remaining_ms = remaining.as_millis() as u64,
                "auto-advance armed"
            );
            self.timers.schedule_once(
                now,
                remaining,
                self.generation,
                Task::AutoAdvance {
                    target: target.clone(),
                },
            );
        }
    }

    /// Put the overlays that belong to the current state on the surface.
    fn present(&mut self) {
        let offer = match &self.state {
            PlayerState::PendingChoice { scene, overlay } => Some((scene.clone(), *overlay)),
            PlayerState::Playing { scene } | PlayerState::Interrupted { active: scene, .. } => self
                .graph
                .scene(scene)
                .ok()
                .filter(|details| details.scene_type == SceneType::Main)
                .map(|_| (scene.clone(), OverlayKind::MainPanel)),
            PlayerState::Idle => None,
        };

        if let Some((scene, kind)) = offer {
            self.show_offer(&scene, kind);
        }

        self.interrupt.evaluate(
            &self.state,
            &self.graph,
            &self.assets,
            &mut self.missing_images,
            &mut self.surface,
        );
    }

    fn show_offer(&mut self, scene: &SceneId, kind: OverlayKind) {
        let Ok(details) = self.graph.scene(scene) else {
            return;
        };
        let choices = surface::choice_views(
            details.regular_choices(),
            &self.assets,
            &mut self.missing_images,
            &mut self.surface,
        );
        let heading = details
            .headings
            .for_scene_type(details.scene_type)
            .map(str::to_string);

        if let Some(previous) = self.offer.filter(|previous| *previous != kind) {
            self.surface.clear_overlay(previous);
        }
        self.surface.show_choices(ChoiceOffer {
            kind,
            scene: scene.clone(),
            heading,
            choices,
        });
        self.surface.reposition(kind, GeometryHint::for_overlay(kind));
        self.offer = Some(kind);
    }

    /// Periodic tick: keep the interrupt panel current and re-place overlays.
    fn reposition(&mut self) {
        self.interrupt.evaluate(
            &self.state,
            &self.graph,
            &self.assets,
            &mut self.missing_images,
            &mut self.surface,
        );
        if let Some(kind) = self.offer {
            self.surface.reposition(kind, GeometryHint::for_overlay(kind));
        }
        self.interrupt.reposition(&mut self.surface);
    }
}
