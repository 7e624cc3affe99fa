//! Shared fixtures for the integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tempfile::TempDir;

use branchplay::assets::AssetResolver;
use branchplay::playback::{Clock, ManualClock, SimulatedPlayer};
use branchplay::settings::PlayerSettings;
use branchplay::surface::OverlaySurface;
use branchplay::{PlaybackMachine, SceneGraph};

/// Three scenes around `s1`, which has one regular, two temporary and one dead-end choice.
pub const STORY: &str = r#"
start = "s1"

[videos]
s1 = "s1.mp4"
s1b = "s1b.mp4"
s1c = "s1c.mp4"
s2 = "s2.mp4"

[options.s1]
scene_type = "continue"
[options.s1.choices.Go]
next = "s2"
[options.s1.choices.Peek]
next = "s1b"
temporary = true
[options.s1.choices.Peek2]
next = "s1c"
temporary = true
[options.s1.choices.Nowhere]
"#;

pub type Machine = PlaybackMachine<SimulatedPlayer<ManualClock>, OverlaySurface>;

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Write `contents` to `name` in a fresh temp dir and create every listed asset.
pub fn story_dir(name: &str, contents: &str, assets: &[&str]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = dir.path().join(name);
    fs::write(&config, contents).expect("Failed to write config");
    for asset in assets {
        touch(dir.path(), asset);
    }
    (dir, config)
}

/// The standard story with all of its videos present.
pub fn story() -> (TempDir, PathBuf) {
    story_dir(
        "story.toml",
        STORY,
        &["s1.mp4", "s1b.mp4", "s1c.mp4", "s2.mp4"],
    )
}

pub fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").expect("Failed to create asset");
}

/// A started machine for the config at `path`, on a manual clock.
pub fn start_machine(path: &Path, clip_length: Duration) -> (Machine, ManualClock) {
    let clock = ManualClock::new();
    let base_dir = path.parent().unwrap_or(Path::new("."));
    let settings = PlayerSettings {
        clip_length,
        ..PlayerSettings::default()
    };
    let player = SimulatedPlayer::new(clock.clone(), clip_length);
    let mut machine = PlaybackMachine::new(
        SceneGraph::load(path),
        AssetResolver::new(base_dir),
        settings,
        player,
        OverlaySurface::new(),
    );
    let _ = machine.start(clock.now());
    (machine, clock)
}

/// Move the clock forward, firing every timer that falls due on the way.
pub fn advance(machine: &mut Machine, clock: &ManualClock, by: Duration) {
    let deadline = clock.now() + by;
    while let Some(due) = machine.next_due().filter(|due| *due <= deadline) {
        clock.advance(due.saturating_duration_since(clock.now()));
        machine.tick(clock.now());
    }
    clock.advance(deadline.saturating_duration_since(clock.now()));
    machine.tick(clock.now());
}

/// Run the branchplay binary with the given arguments.
/// Returns (stdout, stderr, exit_code).
pub fn run_branchplay(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_branchplay"))
        .args(args)
        .env("BRANCHPLAY_LOG", "off")
        .output()
        .expect("Failed to execute branchplay");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}
