//! Numbered PNG export of rendered frames.

use std::path::PathBuf;

use anyhow::{Context, Result};
use image::RgbImage;

/// Writes frames as `<dir>/<n>.png`.
pub struct FrameExporter {
    dir: PathBuf,
    exported: u32,
}

impl FrameExporter {
    /// Create the exporter, creating `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create frame directory {}", dir.display()))?;
        log::info!("Exporting frames to {}", dir.display());
        Ok(Self { dir, exported: 0 })
    }

    pub fn frame_path(&self, number: u32) -> PathBuf {
        self.dir.join(format!("{number}.png"))
    }

    /// Number of frames written successfully.
    pub fn exported(&self) -> u32 {
        self.exported
    }

    /// Save frame `number`. Failures are logged and the frame is skipped.
    pub fn save(&mut self, number: u32, image: &RgbImage) {
        let path = self.frame_path(number);
        match image.save(&path) {
            Ok(()) => {
                self.exported += 1;
                log::debug!("Saved {}", path.display());
            }
            Err(err) => log::error!("Failed to save {}: {}", path.display(), err),
        }
    }
}
