//! Play command handler

use anyhow::{bail, Result};

use branchplay::cli::PlayArgs;
use branchplay::playback::{SimulatedPlayer, SystemClock};
use branchplay::surface::OverlaySurface;
use branchplay::tui;
use branchplay::PlaybackMachine;

use super::load_session;

/// Play the story in the terminal until the viewer quits.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &PlayArgs) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) || !atty::is(atty::Stream::Stdout) {
        bail!("The player needs an interactive terminal (try `branchplay simulate` instead)");
    }

    let (graph, assets, settings) = load_session(&args.player);
    tracing::info!(
        config = %args.player.config.display(),
        base_dir = %assets.base_dir().display(),
        scenes = graph.len(),
        "starting player"
    );
    let player = SimulatedPlayer::new(SystemClock, settings.clip_length);
    let machine = PlaybackMachine::new(graph, assets, settings, player, OverlaySurface::new());
    tui::run(machine)
}
