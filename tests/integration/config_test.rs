//! Integration tests for loading scene configurations from disk

use branchplay::scene::{AutoAdvance, SceneType};
use branchplay::{PlayerError, SceneGraph};

use super::helpers::{ms, story_dir};

fn labels(graph: &SceneGraph, scene: &str) -> Vec<String> {
    graph
        .choices(scene)
        .iter()
        .map(|c| c.label.clone())
        .collect()
}

#[test]
fn json_choices_keep_document_order() {
    let (_dir, config) = story_dir(
        "story.json",
        r#"{
  "start": "intro",
  "videos": { "intro": "intro.mp4", "a": "a.mp4", "b": "b.mp4" },
  "options": {
    "intro": {
      "scene_type": "Question",
      "question_heading": "Pick one",
      "choices": {
        "Zebra": { "next": "a" },
        "Apple": { "next": "b", "temporary": true },
        "Mango": { "next": "a", "image": "mango.png" }
      }
    }
  }
}"#,
        &[],
    );

    let graph = SceneGraph::try_load(&config).unwrap();

    assert_eq!(labels(&graph, "intro"), ["Zebra", "Apple", "Mango"]);
    let intro = graph.scene("intro").unwrap();
    assert_eq!(intro.scene_type, SceneType::Question);
    assert_eq!(intro.headings.question_heading.as_deref(), Some("Pick one"));
    assert!(intro.choices[1].temporary);
    assert!(intro.choices[2].image.is_some());
}

#[test]
fn toml_choices_keep_document_order() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "intro"
[videos]
intro = "intro.mp4"
[options.intro.choices.Zebra]
next = "intro"
[options.intro.choices.Apple]
next = "intro"
[options.intro.choices.Mango]
next = "intro"
"#,
        &[],
    );

    let graph = SceneGraph::try_load(&config).unwrap();

    assert_eq!(labels(&graph, "intro"), ["Zebra", "Apple", "Mango"]);
    // No scene_type means "other"
    assert_eq!(graph.scene("intro").unwrap().scene_type, SceneType::Other);
}

#[test]
fn malformed_config_degrades_to_empty_graph() {
    let (_dir, config) = story_dir("story.toml", "start = [unclosed", &[]);

    assert!(matches!(
        SceneGraph::try_load(&config),
        Err(PlayerError::Config(_))
    ));
    let graph = SceneGraph::load(&config);
    assert!(graph.is_empty());
    assert!(graph.initial_scene().is_none());
}

#[test]
fn malformed_json_degrades_to_empty_graph() {
    let (_dir, config) = story_dir("story.json", "{ \"start\": ", &[]);

    assert!(SceneGraph::load(&config).is_empty());
}

#[test]
fn unknown_start_scene_has_no_initial_scene() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "missing"
[videos]
intro = "intro.mp4"
"#,
        &[],
    );

    let graph = SceneGraph::load(&config);

    assert_eq!(graph.len(), 1);
    assert_eq!(graph.start().map(|s| s.as_str()), Some("missing"));
    assert!(graph.initial_scene().is_none());
}

#[test]
fn auto_advance_policies_are_read_per_scene() {
    let (_dir, config) = story_dir(
        "story.toml",
        r#"
start = "hub"
[videos]
hub = "hub.mp4"
timed = "timed.mp4"
still = "still.mp4"
end = "end.mp4"

[options.hub]
scene_type = "main"
default_next_scene = "end"

[options.timed]
scene_type = "main"
default_next_scene = "end"
auto_advance = "after_delay"
auto_advance_delay_ms = 2500

[options.still]
scene_type = "main"
default_next_scene = "end"
auto_advance = "never"
"#,
        &[],
    );

    let graph = SceneGraph::try_load(&config).unwrap();

    assert_eq!(
        graph.scene("hub").unwrap().auto_advance,
        AutoAdvance::OnCompletion("end".into())
    );
    assert_eq!(
        graph.scene("timed").unwrap().auto_advance,
        AutoAdvance::AfterDelay("end".into(), ms(2_500))
    );
    assert_eq!(
        graph.scene("still").unwrap().auto_advance,
        AutoAdvance::Never
    );
}
