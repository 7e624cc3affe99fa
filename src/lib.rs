//! branchplay - interactive branching-video player
//!
//! A story is a graph of scenes. Each scene plays one clip and offers
//! labeled choices leading to other scenes. Temporary choices are side
//! trips: when their clip ends (or the viewer skips), playback returns to
//! the interrupted scene where it left off.
//!
//! # Module Structure
//!
//! - [`config`] - configuration document (TOML or JSON)
//! - [`scene`] - the read-only scene graph and its validation
//! - [`player`] - state machine, transition rules, end-of-clip dispatch, timers
//! - [`playback`] - playback capability and the simulated backend
//! - [`surface`] - presentation capability and the in-memory overlay model
//! - [`tui`] - terminal front end
//! - [`cli`] - command line definitions

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod playback;
pub mod player;
pub mod scene;
pub mod settings;
pub mod surface;
pub mod tui;

pub use config::Config;
pub use error::PlayerError;
pub use player::{PlaybackMachine, PlaybackSnapshot, PlayerState};
pub use scene::SceneGraph;
