//! Integration tests for the command line interface

use assert_cmd::Command;
use predicates::prelude::*;

use super::helpers::{run_branchplay, story, story_dir};

// ============================================================================
// Help and completions
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let (stdout, _stderr, code) = run_branchplay(&["--help"]);

    assert_eq!(code, 0);
    for sub in ["play", "check", "simulate", "completions"] {
        assert!(stdout.contains(sub), "missing {sub} in:\n{stdout}");
    }
}

#[test]
fn version_names_the_binary() {
    Command::cargo_bin("branchplay")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("branchplay "));
}

#[test]
fn play_needs_a_terminal() {
    let (dir, config) = story();

    Command::cargo_bin("branchplay")
        .unwrap()
        .arg("play")
        .arg(&config)
        .arg("--log-file")
        .arg(dir.path().join("play.log"))
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

#[test]
fn completions_are_generated_for_bash() {
    let (stdout, _stderr, code) = run_branchplay(&["completions", "bash"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("branchplay"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_summarizes_valid_story() {
    let (dir, config) = story();
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&["check", &config]);

    assert_eq!(code, 0, "stdout:\n{stdout}");
    assert!(stdout.contains("Start: s1"));
    assert!(stdout.contains("Scenes: 4"));
    assert!(stdout.contains("warning: choice 'Nowhere' on scene 's1' has no next scene"));
    assert!(stdout.contains("0 error(s), 1 warning(s)"));
    drop(dir);
}

#[test]
fn check_fails_on_dangling_references() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "intro"
[videos]
intro = "intro.mp4"
[options.intro.choices.Onward]
next = "outro"
"#,
        &[],
    );
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&["check", &config]);

    assert_eq!(code, 1);
    let dangling = "error: choice 'Onward' on scene 'intro' leads to unknown scene 'outro'";
    assert!(stdout.contains(dangling));
    assert!(stdout.contains("warning: video of scene 'intro' not found: intro.mp4"));
}

#[test]
fn check_fails_on_unreadable_config() {
    let (stdout, stderr, code) = run_branchplay(&["check", "/nonexistent/story.toml"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to load"), "stderr:\n{stderr}");
}

// ============================================================================
// simulate
// ============================================================================

#[test]
fn simulate_interrupt_and_skip() {
    let (_dir, config) = story();
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&[
        "simulate",
        &config,
        "--clip-length",
        "30000",
        "--step",
        "wait:12000",
        "--step",
        "select:Peek",
        "--step",
        "select:Peek2",
        "--step",
        "skip",
    ]);

    assert_eq!(code, 0);
    insta::with_settings!({ prepend_module_to_snapshot => false }, {
        insta::assert_snapshot!("simulate_interrupt_and_skip", stdout);
    });
}

#[test]
fn simulate_reaches_next_scene_after_completion() {
    let (_dir, config) = story();
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&[
        "simulate",
        &config,
        "--step",
        "complete",
        "--step",
        "select:Go",
    ]);

    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "stdout:\n{stdout}");
    assert!(lines[1].contains("choosing"));
    assert!(lines[1].contains("choices: Go, Nowhere"));
    assert!(lines[2].contains("current=s2 resume=-"));
}

#[test]
fn simulate_reports_missing_video() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "s1"
[videos]
s1 = "s1.mp4"
"#,
        &[],
    );
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&["simulate", &config]);

    assert_eq!(code, 0);
    assert!(
        stdout.contains("  ! Video for scene 's1' not found"),
        "stdout:\n{stdout}"
    );
}

#[test]
fn simulate_warns_about_invisible_choice() {
    let (_dir, config) = story();
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&["simulate", &config, "--step", "select:Go"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("  ! no visible choice labelled 'Go'"));
    let last = stdout.lines().last().unwrap_or_default();
    assert!(last.contains("current=s1"));
}

#[test]
fn simulate_rejects_unknown_step() {
    let (_stdout, stderr, code) = run_branchplay(&["simulate", "story.toml", "--step", "dance"]);

    assert_eq!(code, 2);
    assert!(stderr.contains("dance"));
}

#[test]
fn simulate_rejects_zero_poll_interval() {
    let (_stdout, stderr, code) =
        run_branchplay(&["simulate", "story.toml", "--poll-interval-ms", "0"]);

    assert_eq!(code, 2);
    assert!(stderr.contains("--poll-interval-ms"), "stderr:\n{stderr}");
}

#[test]
fn simulate_uses_a_shorter_resume_grace() {
    let (_dir, config) = story();
    let config = config.to_string_lossy().to_string();

    let (stdout, _stderr, code) = run_branchplay(&[
        "simulate",
        &config,
        "--resume-grace-ms",
        "100",
        "--step",
        "wait:2000",
        "--step",
        "select:Peek",
        "--step",
        "complete",
        "--step",
        "wait:150",
    ]);

    assert_eq!(code, 0);
    let last = stdout.lines().last().unwrap_or_default();
    assert!(last.contains("current=s1 resume=-"), "stdout:\n{stdout}");
}
