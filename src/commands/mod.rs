//! Command handlers for the branchplay binary

pub mod check;
pub mod completions;
pub mod play;
pub mod simulate;

use branchplay::assets::AssetResolver;
use branchplay::cli::PlayerArgs;
use branchplay::settings::PlayerSettings;
use branchplay::SceneGraph;

/// Everything a player needs, loaded from the command line arguments.
///
/// A missing or broken configuration yields an empty graph; the player
/// then shows a notice instead of failing.
pub fn load_session(args: &PlayerArgs) -> (SceneGraph, AssetResolver, PlayerSettings) {
    let graph = SceneGraph::load(&args.config);
    let assets = AssetResolver::new(args.resolved_base_dir());
    (graph, assets, args.settings())
}
