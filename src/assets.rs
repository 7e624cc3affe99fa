//! Asset path resolution.
//!
//! Video and image paths in the configuration are relative to an
//! application base directory supplied by the caller.

use std::path::{Path, PathBuf};

use crate::scene::{SceneGraph, SceneId};

/// Resolves configured asset paths against a base directory.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    base_dir: PathBuf,
}

/// A configured asset that is not on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    pub scene: SceneId,
    /// Choice label for images, `None` for the scene video
    pub choice: Option<String>,
    pub path: PathBuf,
}

impl AssetResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute paths pass through; relative ones join the base directory.
    pub fn resolve(&self, asset: &Path) -> PathBuf {
        if asset.is_absolute() {
            asset.to_path_buf()
        } else {
            self.base_dir.join(asset)
        }
    }

    /// Every video and image of the graph that does not exist on disk.
    pub fn missing_assets(&self, graph: &SceneGraph) -> Vec<MissingAsset> {
        let mut missing = Vec::new();
        for scene in graph.scenes() {
            if let Some(video) = &scene.video {
                let path = self.resolve(video);
                if !path.exists() {
                    missing.push(MissingAsset {
                        scene: scene.id.clone(),
                        choice: None,
                        path,
                    });
                }
            }
            for choice in &scene.choices {
                if let Some(image) = &choice.image {
                    let path = self.resolve(image);
                    if !path.exists() {
                        missing.push(MissingAsset {
                            scene: scene.id.clone(),
                            choice: Some(choice.label.clone()),
                            path,
                        });
                    }
                }
            }
        }
        missing
    }
}
