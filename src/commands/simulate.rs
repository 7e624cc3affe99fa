//! Simulate command handler
//!
//! Runs the player headless on a manual clock. Time only moves on `wait`
//! steps, so every run of the same script prints the same lines.

use anyhow::Result;

use branchplay::cli::{SimulateArgs, Step};
use branchplay::playback::{Clock, ManualClock, SimulatedPlayer};
use branchplay::surface::{NoticeLevel, OverlaySurface};
use branchplay::tui::render::state_label;
use branchplay::tui::{stdout_theme, Role, Theme};
use branchplay::PlaybackMachine;

use super::load_session;

type Machine = PlaybackMachine<SimulatedPlayer<ManualClock>, OverlaySurface>;

/// Run the scripted steps, printing the player state after each.
pub fn handle(args: &SimulateArgs) -> Result<()> {
    let theme = stdout_theme();
    let (graph, assets, settings) = load_session(&args.player);
    let clock = ManualClock::new();
    let player = SimulatedPlayer::new(clock.clone(), settings.clip_length);
    let mut machine = PlaybackMachine::new(graph, assets, settings, player, OverlaySurface::new());

    // Failures are already notices on the surface
    let _ = machine.start(clock.now());
    print_state(&mut machine, "start", &theme);

    for step in &args.steps {
        run_step(&mut machine, &clock, step, &theme);
        print_state(&mut machine, &step.to_string(), &theme);
    }

    Ok(())
}

fn run_step(machine: &mut Machine, clock: &ManualClock, step: &Step, theme: &Theme) {
    match step {
        Step::Complete => machine.finish_clip(clock.now()),
        Step::Wait(duration) => {
            let deadline = clock.now() + *duration;
            while let Some(due) = machine.next_due().filter(|due| *due <= deadline) {
                clock.advance(due.saturating_duration_since(clock.now()));
                machine.tick(clock.now());
            }
            clock.advance(deadline.saturating_duration_since(clock.now()));
            machine.tick(clock.now());
        }
        Step::Select(label) => match machine.surface().select_label(label) {
            Some(selection) => {
                let _ = machine.select(&selection, clock.now());
            }
            None => {
                let warning = format!("  ! no visible choice labelled '{}'", label);
                println!("{}", theme.paint(Role::Warning, &warning));
            }
        },
        Step::Skip => {
            let _ = machine.skip(clock.now());
        }
    }
}

fn print_state(machine: &mut Machine, step: &str, theme: &Theme) {
    let mut line = format!(
        "{} {:<10} {}",
        theme.paint(Role::Key, &format!("{:<16}", step)),
        state_label(machine.state()),
        theme.paint(Role::Text, &machine.snapshot().to_string())
    );

    let surface = machine.surface();
    if let Some(offer) = surface.choice_offer() {
        let labels: Vec<&str> = offer.choices.iter().map(|c| c.label.as_str()).collect();
        line.push_str(&format!(" | choices: {}", labels.join(", ")));
    }
    if let Some(panel) = surface.interrupt_panel() {
        let labels: Vec<&str> = panel.choices.iter().map(|c| c.label.as_str()).collect();
        line.push_str(&format!(" | temporary: {}", labels.join(", ")));
        if panel.skip_visible {
            line.push_str(" [skip]");
        }
    }
    println!("{}", line);

    for notice in surface.notices() {
        let text = format!("  ! {}", notice.message);
        let text = match notice.level {
            NoticeLevel::Info => theme.paint(Role::Muted, &text),
            NoticeLevel::Warning => theme.paint(Role::Warning, &text),
            NoticeLevel::Error => theme.paint(Role::Error, &text),
        };
        println!("{}", text);
    }
    machine.surface_mut().dismiss_notices();
}
