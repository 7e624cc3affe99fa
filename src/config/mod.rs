//! Scene configuration document.
//!
//! The configuration names the start scene, maps scene ids to video assets,
//! and describes each scene's choices. It is read once at startup; the
//! [`SceneGraph`](crate::scene::SceneGraph) is built from it and nothing
//! reads the document afterwards.
//!
//! TOML is the default format. Files with a `.json` extension are parsed as
//! JSON. Choice order always follows document order.

mod choices;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use choices::ChoiceList;

/// Errors raised while reading or parsing a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`.json` is JSON, anything else TOML).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// The whole configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Scene the player starts with
    #[serde(default)]
    pub start: Option<String>,
    /// Scene id -> video asset path (relative to the base directory)
    #[serde(default)]
    pub videos: BTreeMap<String, PathBuf>,
    /// Scene id -> scene options
    #[serde(default)]
    pub options: BTreeMap<String, SceneOptions>,
}

/// Per-scene options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// `continue`, `question`, `main` or anything else (case-insensitive)
    pub scene_type: Option<String>,
    /// Generic heading
    pub heading: Option<String>,
    /// Heading for `continue` scenes
    pub continue_heading: Option<String>,
    /// Heading for `question` scenes
    pub question_heading: Option<String>,
    /// Heading for the interrupt panel
    pub interrupt_heading: Option<String>,
    /// Choices in display order
    pub choices: ChoiceList,
    /// Scene a `main` scene advances to when nobody picks anything
    pub default_next_scene: Option<String>,
    /// When a `main` scene advances to its default
    pub auto_advance: Option<AutoAdvanceMode>,
    /// Delay for `auto_advance = "after_delay"`, counted from clip start
    pub auto_advance_delay_ms: Option<u64>,
}

/// Auto-advance trigger for scenes with a `default_next_scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoAdvanceMode {
    /// Advance shortly after the clip completes
    OnCompletion,
    /// Advance a fixed delay after the clip starts
    AfterDelay,
    /// Never advance automatically
    Never,
}

/// A single choice entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChoiceOptions {
    /// Target scene id
    pub next: Option<String>,
    /// Offered during playback; returns to the interrupted scene afterwards
    pub temporary: bool,
    /// Optional image shown with the choice
    pub image: Option<PathBuf>,
}

impl Config {
    /// Load a configuration document from disk.
    ///
    /// The format is picked from the file extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&content, ConfigFormat::from_path(path), path)
    }

    /// Parse a configuration document.
    ///
    /// `origin` is only used for error messages.
    pub fn parse(content: &str, format: ConfigFormat, origin: &Path) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|source| ConfigError::Toml {
                path: origin.to_path_buf(),
                source,
            }),
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|source| ConfigError::Json {
                    path: origin.to_path_buf(),
                    source,
                })
            }
        }
    }
}
