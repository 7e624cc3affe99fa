//! Branching playback core
//!
//! Decides which clip plays, which choices are on screen and where the
//! viewer returns after a detour. Video decoding and drawing stay behind
//! the [`Playback`](crate::playback::Playback) and
//! [`Surface`](crate::surface::Surface) capabilities.
//!
//! # Architecture
//!
//! The player is organized into submodules:
//! - `state`: `PlayerState` tagged union and the flat `PlaybackSnapshot`
//! - `resolver`: pure transition rules for choices, skips and auto-advance
//! - `dispatcher`: end-of-clip handling, once per clip
//! - `interrupt`: visibility of the temporary-choice panel
//! - `timer`: one queue for repeating ticks and generation-guarded deferred tasks
//! - `machine`: `PlaybackMachine`, which owns the state and applies all of the above
//!
//! # Usage
//!
//! ```no_run
//! use branchplay::assets::AssetResolver;
//! use branchplay::playback::{SimulatedPlayer, SystemClock};
//! use branchplay::player::PlaybackMachine;
//! use branchplay::scene::SceneGraph;
//! use branchplay::settings::PlayerSettings;
//! use branchplay::surface::OverlaySurface;
//! use std::path::Path;
//! use std::time::Instant;
//!
//! let graph = SceneGraph::load(Path::new("story.toml"));
//! let settings = PlayerSettings::default();
//! let player = SimulatedPlayer::new(SystemClock, settings.clip_length);
//! let mut machine = PlaybackMachine::new(
//!     graph,
//!     AssetResolver::new("."),
//!     settings,
//!     player,
//!     OverlaySurface::new(),
//! );
//! let _ = machine.start(Instant::now());
//! machine.tick(Instant::now());
//! println!("{}", machine.snapshot());
//! ```

pub mod dispatcher;
pub mod interrupt;
mod machine;
pub mod resolver;
pub mod state;
pub mod timer;

pub use dispatcher::{CompletionSignal, EndOfClipAction, EndOfClipDispatcher};
pub use interrupt::{Affordance, InterruptScheduler};
pub use machine::PlaybackMachine;
pub use resolver::Transition;
pub use state::{OverlayKind, PlaybackSnapshot, PlayerState};
pub use timer::{Generation, Task, TimerQueue};
