//! End-to-end playback scenarios driven through the library API

use std::path::Path;

use branchplay::player::OverlayKind;
use branchplay::playback::{Clock, Playback};
use branchplay::surface::Selection;
use branchplay::{PlayerError, PlayerState, SceneGraph};

use super::helpers::{advance, ms, start_machine, story, story_dir, Machine};

fn select(machine: &mut Machine, now: std::time::Instant, label: &str) -> Result<(), PlayerError> {
    let selection = machine
        .surface()
        .select_label(label)
        .unwrap_or_else(|| panic!("choice {label} is not on screen"));
    machine.select(&selection, now)
}

fn current(machine: &Machine) -> Option<String> {
    machine
        .snapshot()
        .current_scene_id
        .map(|id| id.as_str().to_string())
}

fn assert_asset(machine: &Machine, name: &str) {
    let playback = machine.playback();
    let asset = playback.current_asset().expect("a clip is loaded");
    assert_eq!(asset.file_name(), Some(Path::new(name).as_os_str()));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn continue_overlay_leads_to_next_scene() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "s1"
[videos]
s1 = "s1.mp4"
s2 = "s2.mp4"
[options.s1]
scene_type = "continue"
[options.s1.choices.Go]
next = "s2"
"#,
        &["s1.mp4", "s2.mp4"],
    );
    let (mut machine, clock) = start_machine(&config, ms(10_000));

    advance(&mut machine, &clock, ms(10_000));

    let offer = machine.surface().choice_offer().expect("overlay is shown");
    assert_eq!(offer.kind, OverlayKind::Continue);
    let labels: Vec<&str> = offer.choices.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["Go"]);

    select(&mut machine, clock.now(), "Go").unwrap();

    let snapshot = machine.snapshot();
    assert_eq!(current(&machine).as_deref(), Some("s2"));
    assert_eq!(snapshot.resume_scene_id, None);
    assert_eq!(snapshot.resume_position, None);
    assert!(machine.surface().choice_offer().is_none());
    assert_asset(&machine, "s2.mp4");
}

#[test]
fn temporary_choice_captures_resume_point() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(30_000));

    advance(&mut machine, &clock, ms(12_000));
    select(&mut machine, clock.now(), "Peek").unwrap();

    let snapshot = machine.snapshot();
    assert_eq!(current(&machine).as_deref(), Some("s1b"));
    assert_eq!(
        snapshot.resume_scene_id.as_ref().map(|s| s.as_str()),
        Some("s1")
    );
    assert_eq!(snapshot.resume_position, Some(ms(12_000)));
    assert_asset(&machine, "s1b.mp4");

    let panel = machine.surface().interrupt_panel().expect("panel stays up");
    assert!(panel.skip_visible);
}

#[test]
fn second_temporary_choice_keeps_first_resume_point() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(30_000));

    advance(&mut machine, &clock, ms(12_000));
    select(&mut machine, clock.now(), "Peek").unwrap();
    advance(&mut machine, &clock, ms(4_000));
    select(&mut machine, clock.now(), "Peek2").unwrap();

    let snapshot = machine.snapshot();
    assert_eq!(current(&machine).as_deref(), Some("s1c"));
    assert_eq!(
        snapshot.resume_scene_id.as_ref().map(|s| s.as_str()),
        Some("s1")
    );
    assert_eq!(snapshot.resume_position, Some(ms(12_000)));
}

#[test]
fn skip_returns_to_resume_point() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(30_000));

    advance(&mut machine, &clock, ms(12_000));
    select(&mut machine, clock.now(), "Peek").unwrap();
    select(&mut machine, clock.now(), "Peek2").unwrap();
    machine.skip(clock.now()).unwrap();

    let snapshot = machine.snapshot();
    assert_eq!(current(&machine).as_deref(), Some("s1"));
    assert_eq!(snapshot.resume_scene_id, None);
    assert_eq!(snapshot.resume_position, None);
    assert_eq!(machine.playback().position(), ms(12_000));
    assert_asset(&machine, "s1.mp4");

    let panel = machine.surface().interrupt_panel().expect("panel is back");
    assert!(!panel.skip_visible);
}

#[test]
fn choice_without_target_changes_nothing() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(10_000));
    advance(&mut machine, &clock, ms(10_000));
    let before = machine.state().clone();
    let generation = machine.generation();

    let err = select(&mut machine, clock.now(), "Nowhere").unwrap_err();

    assert!(matches!(err, PlayerError::UnknownTransition { .. }));
    assert_eq!(machine.state(), &before);
    assert_eq!(machine.generation(), generation);
    assert!(machine.surface().choice_offer().is_some());
}

// ============================================================================
// Interruption lifecycle
// ============================================================================

#[test]
fn finished_interruption_resumes_after_grace() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(10_000));

    advance(&mut machine, &clock, ms(7_000));
    select(&mut machine, clock.now(), "Peek").unwrap();
    advance(&mut machine, &clock, ms(10_000));
    assert!(
        machine.state().is_interrupted(),
        "still within the grace delay"
    );

    advance(&mut machine, &clock, ms(600));

    assert_eq!(
        machine.state(),
        &PlayerState::Playing {
            scene: "s1".into()
        }
    );
    assert_asset(&machine, "s1.mp4");
    // Resumed at the captured position, then the clock kept running
    assert!(machine.playback().position() >= ms(7_000));
    assert!(machine.playback().position() < ms(8_000));
}

#[test]
fn old_clip_completion_does_not_reach_new_scene() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(10_000));

    advance(&mut machine, &clock, ms(9_900));
    select(&mut machine, clock.now(), "Peek").unwrap();
    // The s1 clip would have ended here; s1b only started 200ms ago
    advance(&mut machine, &clock, ms(200));

    assert_eq!(current(&machine).as_deref(), Some("s1b"));
    assert!(machine.state().is_interrupted());
    assert!(machine.surface().choice_offer().is_none());
}

#[test]
fn selection_of_unshown_scene_is_ignored() {
    let (_dir, config) = story();
    let (mut machine, clock) = start_machine(&config, ms(10_000));
    let before = machine.state().clone();

    let stale = Selection {
        scene: "s2".into(),
        index: 0,
    };
    let err = machine.select(&stale, clock.now()).unwrap_err();

    assert!(matches!(err, PlayerError::StaleSignal { .. }));
    assert_eq!(machine.state(), &before);
}

// ============================================================================
// Main scenes and missing media
// ============================================================================

#[test]
fn main_scene_advances_to_default_after_completion() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "hub"
[videos]
hub = "hub.mp4"
s2 = "s2.mp4"
[options.hub]
scene_type = "MAIN"
heading = "Where to?"
default_next_scene = "s2"
[options.hub.choices.Stay]
next = "hub"
"#,
        &["hub.mp4", "s2.mp4"],
    );
    let (mut machine, clock) = start_machine(&config, ms(5_000));

    let panel = machine
        .surface()
        .choice_offer()
        .expect("main panel while playing");
    assert_eq!(panel.kind, OverlayKind::MainPanel);
    assert_eq!(panel.heading.as_deref(), Some("Where to?"));

    advance(&mut machine, &clock, ms(5_000));
    assert!(matches!(
        machine.state(),
        PlayerState::PendingChoice {
            overlay: OverlayKind::MainPanel,
            ..
        }
    ));

    advance(&mut machine, &clock, ms(600));
    assert_eq!(current(&machine).as_deref(), Some("s2"));
}

#[test]
fn missing_video_is_reported_and_state_kept() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "s1"
[videos]
s1 = "s1.mp4"
s2 = "gone.mp4"
[options.s1]
scene_type = "question"
[options.s1.choices.Next]
next = "s2"
"#,
        &["s1.mp4"],
    );
    let (mut machine, clock) = start_machine(&config, ms(1_000));
    advance(&mut machine, &clock, ms(1_000));
    let before = machine.state().clone();

    let err = select(&mut machine, clock.now(), "Next").unwrap_err();

    assert!(matches!(err, PlayerError::AssetNotFound { .. }));
    assert_eq!(machine.state(), &before);
    let notice = machine.surface().latest_notice().expect("viewer is told");
    assert!(notice.message.contains("gone.mp4"), "{}", notice.message);
}

#[test]
fn unreadable_config_starts_idle() {
    let (dir, _config) = story();
    let missing = dir.path().join("nope.toml");

    assert!(SceneGraph::load(&missing).is_empty());

    let (machine, _clock) = start_machine(&missing, ms(1_000));
    assert_eq!(machine.state(), &PlayerState::Idle);
    assert!(machine.playback().current_asset().is_none());
    assert!(machine.surface().latest_notice().is_some());
}
