//! Deferred and repeating tasks for the player loop.
//!
//! One queue holds every timed task. The owner pops due tasks one at a
//! time and runs each before taking the next; nothing runs concurrently. A
//! repeating entry is re-armed only when it is taken, so runs never overlap.
//!
//! There is no cancellation. One-shot tasks capture the scene generation
//! at schedule time and are dropped when taken under a newer generation.

use std::time::{Duration, Instant};

use crate::scene::SceneId;

/// Counter bumped on every scene load; identifies "the clip that was playing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Work the player defers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Poll the playback capability for completion
    PollPlayback,
    /// Re-apply overlay geometry
    Reposition,
    /// Return from an interruption after its clip ended
    Resume,
    /// Move on to a scene's default next scene
    AutoAdvance { target: SceneId },
}

#[derive(Debug)]
struct Entry {
    due: Instant,
    task: Task,
    guard: Option<Generation>,
    every: Option<Duration>,
}

/// Shortest repeat interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Time-ordered task queue.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once at `now + delay`, unless the generation moved on by then.
    pub fn schedule_once(
        &mut self,
        now: Instant,
        delay: Duration,
        generation: Generation,
        task: Task,
    ) {
        self.entries.push(Entry {
            due: now + delay,
            task,
            guard: Some(generation),
            every: None,
        });
    }

    /// Run `task` every `interval`, starting one interval from `now`.
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it; a zero
    /// interval would be due again the moment it is re-armed.
    pub fn schedule_every(&mut self, now: Instant, interval: Duration, task: Task) {
        let interval = interval.max(MIN_INTERVAL);
        self.entries.push(Entry {
            due: now + interval,
            task,
            guard: None,
            every: Some(interval),
        });
    }

    /// Take the earliest task due at `now`.
    ///
    /// One-shot tasks guarded by a generation other than `current` are
    /// discarded on the way. A repeating task is re-armed one interval after
    /// `now` as it is taken, so it comes out at most once per call site loop.
    pub fn pop_due(&mut self, now: Instant, current: Generation) -> Option<Task> {
        loop {
            let index = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.due <= now)
                .min_by_key(|(_, entry)| entry.due)
                .map(|(index, _)| index)?;
            let entry = self.entries.swap_remove(index);

            if let Some(interval) = entry.every {
                self.entries.push(Entry {
                    due: now + interval,
                    task: entry.task.clone(),
                    guard: None,
                    every: Some(interval),
                });
                return Some(entry.task);
            }

            match entry.guard {
                Some(generation) if generation != current => {
                    tracing::debug!(
                        task = ?entry.task,
                        scheduled = generation.value(),
                        current = current.value(),
                        "dropping stale deferred task"
                    );
                }
                _ => return Some(entry.task),
            }
        }
    }

    /// When the next task falls due.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Number of armed tasks (one-shot and repeating).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
