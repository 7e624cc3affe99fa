//! Terminal front end for branchplay
//!
//! Renders the player with ratatui/crossterm from the in-memory
//! [`OverlaySurface`](crate::surface::OverlaySurface) and turns key presses
//! into player commands. The theme is shared with the CLI output.

pub mod app;
pub mod input;
pub mod render;
pub mod theme;

pub use app::run;
pub use theme::{current_theme, stdout_theme, Role, Theme};
