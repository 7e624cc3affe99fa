//! Check command handler

use anyhow::{Context, Result};

use branchplay::assets::AssetResolver;
use branchplay::cli::CheckArgs;
use branchplay::scene::{Scene, Severity};
use branchplay::tui::{stdout_theme, Role, Theme};
use branchplay::SceneGraph;

/// Print a summary of the story and every problem found.
///
/// Returns `false` if any problem is an error.
pub fn handle(args: &CheckArgs) -> Result<bool> {
    let theme = stdout_theme();
    let graph = SceneGraph::try_load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let base_dir = args.resolved_base_dir();
    let assets = AssetResolver::new(&base_dir);

    println!(
        "{}",
        theme.paint(Role::Text, &format!("Story: {}", args.config.display()))
    );
    println!(
        "{}",
        theme.paint(Role::Text, &format!(
            "Start: {}",
            graph.start().map(|s| s.as_str()).unwrap_or("-")
        ))
    );
    println!(
        "{}",
        theme.paint(Role::Text, &format!("Scenes: {}", graph.len()))
    );
    println!();

    let id_width = graph.scenes().map(|s| s.id.len()).max().unwrap_or(0);
    for scene in graph.scenes() {
        println!("  {}", scene_line(scene, id_width, &theme));
    }
    if !graph.is_empty() {
        println!();
    }

    let mut errors = 0;
    let mut warnings = 0;

    for issue in graph.validate() {
        match issue.severity() {
            Severity::Error => {
                errors += 1;
                let line = format!("error: {}", issue);
                println!("{}", theme.paint(Role::Error, &line));
            }
            Severity::Warning => {
                warnings += 1;
                let line = format!("warning: {}", issue);
                println!("{}", theme.paint(Role::Warning, &line));
            }
        }
    }

    for missing in assets.missing_assets(&graph) {
        warnings += 1;
        let shown = missing
            .path
            .strip_prefix(&base_dir)
            .unwrap_or(&missing.path)
            .display()
            .to_string();
        let message = match &missing.choice {
            Some(label) => format!(
                "warning: image of choice '{}' on scene '{}' not found: {}",
                label, missing.scene, shown
            ),
            None => format!(
                "warning: video of scene '{}' not found: {}",
                missing.scene, shown
            ),
        };
        println!("{}", theme.paint(Role::Warning, &message));
    }

    if errors == 0 && warnings == 0 {
        println!("{}", theme.paint(Role::Ok, "No issues found."));
    } else {
        println!();
        let totals = format!("{} error(s), {} warning(s)", errors, warnings);
        println!("{}", theme.paint(Role::Muted, &totals));
    }

    Ok(errors == 0)
}

fn scene_line(scene: &Scene, id_width: usize, theme: &Theme) -> String {
    let temporary = scene.temporary_choices().count();
    let choices = match (scene.choices.len(), temporary) {
        (0, _) => "no choices".to_string(),
        (1, 0) => "1 choice".to_string(),
        (n, 0) => format!("{} choices", n),
        (n, t) => format!("{} choice(s), {} temporary", n, t),
    };
    let video = scene
        .video
        .as_ref()
        .map(|v| v.display().to_string())
        .unwrap_or_else(|| "-".to_string());

    let id = format!("{:<width$}", scene.id.as_str(), width = id_width);
    format!(
        "{} {:<8} {:<28} {}",
        theme.paint(Role::Key, &id),
        scene.scene_type.label(),
        choices,
        theme.paint(Role::Muted, &video)
    )
}
