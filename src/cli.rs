//! CLI definitions for branchplay
//!
//! Lives in the library so `xtask` can build the man page from the same
//! definitions the binary parses.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::settings::PlayerSettings;

#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

/// Interactive branching-video player
#[derive(Debug, Parser)]
#[command(name = "branchplay", version = VERSION)]
#[command(about = "Interactive branching-video player")]
#[command(
    long_about = "Plays a story made of video clips linked by viewer choices.\n\n\
    Scenes, clips and choices come from a TOML (or JSON) configuration file.\n\
    Clips are played by a simulated clock-driven backend; the terminal shows\n\
    the current scene, its progress and the choices on offer.\n\n\
    Set BRANCHPLAY_LOG to control log output (e.g. BRANCHPLAY_LOG=debug)."
)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a story in the terminal
    #[command(long_about = "Play a story in the terminal.\n\n\
        Keys: 1-9 pick a choice, a-h pick a temporary choice, s skip back,\n\
        space pause, left/right seek 5s, q quit.")]
    Play(PlayArgs),

    /// Validate a story configuration and list its scenes
    #[command(long_about = "Validate a story configuration and list its scenes.\n\n\
        Exits with status 1 if the configuration cannot be read or has errors\n\
        (unknown start scene, choices pointing at unknown scenes).")]
    Check(CheckArgs),

    /// Run a story headless with scripted steps
    #[command(long_about = "Run a story headless with scripted steps.\n\n\
        Steps run in order; the player state is printed after each one.\n\n\
        EXAMPLE:\n    \
        branchplay simulate story.toml --step wait:4000 --step select:Peek --step skip")]
    Simulate(SimulateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by commands that run the player.
#[derive(Debug, Clone, Args)]
pub struct PlayerArgs {
    /// Story configuration (TOML, or JSON with a .json extension)
    pub config: PathBuf,

    /// Directory video and image paths are relative to [default: the config file's directory]
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Length of every simulated clip in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub clip_length: u64,

    /// Wait after an interruption's clip ends before resuming, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub resume_grace_ms: u64,

    /// Wait after a main scene's clip ends before auto-advancing, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub auto_advance_grace_ms: u64,

    /// How often playback is checked for the end of a clip, in milliseconds
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 250,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_ms: u64,

    /// How often overlays are re-evaluated and repositioned, in milliseconds
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 1_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub reposition_interval_ms: u64,
}

impl PlayerArgs {
    /// The base directory for asset paths.
    pub fn resolved_base_dir(&self) -> PathBuf {
        base_dir_for(&self.config, self.base_dir.as_deref())
    }

    /// Player timings from the command line.
    pub fn settings(&self) -> PlayerSettings {
        PlayerSettings {
            resume_grace: Duration::from_millis(self.resume_grace_ms),
            auto_advance_grace: Duration::from_millis(self.auto_advance_grace_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            reposition_interval: Duration::from_millis(self.reposition_interval_ms),
            clip_length: Duration::from_millis(self.clip_length),
        }
    }
}

/// `base_dir` if given, else the directory holding `config`.
pub fn base_dir_for(config: &Path, base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => config
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub player: PlayerArgs,

    /// Write logs here while the player owns the terminal [default: <cache dir>/branchplay/branchplay.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Story configuration to check
    pub config: PathBuf,

    /// Directory video and image paths are relative to [default: the config file's directory]
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
}

impl CheckArgs {
    /// The base directory for asset paths.
    pub fn resolved_base_dir(&self) -> PathBuf {
        base_dir_for(&self.config, self.base_dir.as_deref())
    }
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub player: PlayerArgs,

    /// Step to run: complete, wait:<ms>, select:<label> or skip (repeatable)
    #[arg(long = "step", value_name = "STEP")]
    pub steps: Vec<Step>,
}

/// One scripted input of `simulate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Jump to the end of the current clip
    Complete,
    /// Let time pass
    Wait(Duration),
    /// Pick the visible choice with this label
    Select(String),
    /// Return from an interruption
    Skip,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "complete" => Ok(Self::Complete),
            None if s == "skip" => Ok(Self::Skip),
            Some(("wait", ms)) => ms
                .trim()
                .parse::<u64>()
                .map(|ms| Self::Wait(Duration::from_millis(ms)))
                .map_err(|_| format!("invalid wait time '{}', expected milliseconds", ms)),
            Some(("select", label)) if !label.is_empty() => Ok(Self::Select(label.to_string())),
            _ => Err(format!(
                "unknown step '{}', expected complete, wait:<ms>, select:<label> or skip",
                s
            )),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Wait(duration) => write!(f, "wait:{}", duration.as_millis()),
            Self::Select(label) => write!(f, "select:{}", label),
            Self::Skip => write!(f, "skip"),
        }
    }
}
