//! Clock-driven playback backend.
//!
//! Stands in for a real video player: every clip lasts a fixed length, the
//! position follows the clock, pausing freezes it and seeking clamps it to
//! the clip. Files are checked for existence but never opened.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{ClipToken, Clock, Playback, PlaybackError, PlaybackEvent, MAX_VOLUME};

#[derive(Debug)]
struct Clip {
    token: ClipToken,
    asset: PathBuf,
    /// Position at `anchor` (or the frozen position while paused)
    offset: Duration,
    /// Instant playback last (re)started; `None` while paused
    anchor: Option<Instant>,
    ended_reported: bool,
}

/// Simulated video player.
#[derive(Debug)]
pub struct SimulatedPlayer<C: Clock> {
    clock: C,
    clip_length: Duration,
    check_files: bool,
    next_token: u64,
    clip: Option<Clip>,
    volume: u8,
    muted: bool,
}

impl<C: Clock> SimulatedPlayer<C> {
    pub fn new(clock: C, clip_length: Duration) -> Self {
        Self {
            clock,
            clip_length,
            check_files: true,
            next_token: 0,
            clip: None,
            volume: MAX_VOLUME,
            muted: false,
        }
    }

    /// Skip the file existence check in `play`.
    pub fn without_file_check(mut self) -> Self {
        self.check_files = false;
        self
    }

    /// Path of the loaded clip.
    pub fn current_asset(&self) -> Option<&Path> {
        self.clip.as_ref().map(|clip| clip.asset.as_path())
    }

    pub fn is_paused(&self) -> bool {
        self.clip.as_ref().is_some_and(|clip| clip.anchor.is_none())
    }

    fn position_of(&self, clip: &Clip) -> Duration {
        let elapsed = clip
            .anchor
            .map(|anchor| self.clock.now().saturating_duration_since(anchor))
            .unwrap_or_default();
        (clip.offset + elapsed).min(self.clip_length)
    }
}

impl<C: Clock> Playback for SimulatedPlayer<C> {
    fn play(&mut self, asset: &Path) -> Result<ClipToken, PlaybackError> {
        if self.check_files && !asset.is_file() {
            return Err(PlaybackError::MediaNotFound {
                path: asset.to_path_buf(),
            });
        }

        let token = ClipToken(self.next_token);
        self.next_token += 1;
        self.clip = Some(Clip {
            token,
            asset: asset.to_path_buf(),
            offset: Duration::ZERO,
            anchor: Some(self.clock.now()),
            ended_reported: false,
        });
        tracing::debug!(
            asset = %asset.display(),
            token = token.0,
            volume = self.volume,
            muted = self.muted,
            "simulated clip started"
        );
        Ok(token)
    }

    fn pause(&mut self) {
        let now = self.clock.now();
        let position = self.clip.as_ref().map(|clip| self.position_of(clip));
        if let (Some(clip), Some(position)) = (self.clip.as_mut(), position) {
            if clip.anchor.is_some() {
                clip.offset = position;
                clip.anchor = None;
                tracing::debug!(position_ms = position.as_millis() as u64, at = ?now, "paused");
            }
        }
    }

    fn resume(&mut self) {
        let now = self.clock.now();
        if let Some(clip) = self.clip.as_mut() {
            if clip.anchor.is_none() {
                clip.anchor = Some(now);
            }
        }
    }

    fn stop(&mut self) {
        self.clip = None;
    }

    fn set_position(&mut self, position: Duration) {
        let now = self.clock.now();
        let target = position.min(self.clip_length);
        let clip_length = self.clip_length;
        if let Some(clip) = self.clip.as_mut() {
            clip.offset = target;
            if clip.anchor.is_some() {
                clip.anchor = Some(now);
            }
            if target < clip_length {
                clip.ended_reported = false;
            }
        }
    }

    fn position(&self) -> Duration {
        self.clip
            .as_ref()
            .map(|clip| self.position_of(clip))
            .unwrap_or_default()
    }

    fn duration(&self) -> Option<Duration> {
        self.clip.as_ref().map(|_| self.clip_length)
    }

    fn is_playing(&self) -> bool {
        self.clip
            .as_ref()
            .is_some_and(|clip| clip.anchor.is_some() && self.position_of(clip) < self.clip_length)
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        let position = self.position();
        let clip = self.clip.as_mut()?;
        if clip.ended_reported || position < self.clip_length {
            return None;
        }
        clip.ended_reported = true;
        Some(PlaybackEvent::Ended(clip.token))
    }
}
