use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glint_scene::RenderSettings;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// JSON settings file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Render without opening a window
    #[arg(long)]
    pub headless: bool,

    /// Rendering backend to use
    #[arg(long, value_enum, default_value_t = BackendArg::Gpu)]
    pub backend: BackendArg,

    /// Render width in pixels
    #[arg(long, short = 'W')]
    pub width: Option<u32>,

    /// Render height in pixels
    #[arg(long, short = 'H')]
    pub height: Option<u32>,

    /// Number of frames to render (default: video_fps * video_seconds)
    #[arg(long)]
    pub frames: Option<u32>,

    /// Disable PNG frame export
    #[arg(long)]
    pub no_export: bool,

    /// Skip running the video encoder
    #[arg(long)]
    pub no_encode: bool,

    /// Load WGSL shaders from this directory instead of the built-in copies
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Gpu,
    Cpu,
}

impl Args {
    /// Settings from `--config` (or the defaults) with the flags applied.
    pub fn settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.config {
            Some(path) => RenderSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => RenderSettings::default(),
        };
        self.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    fn apply(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if self.no_export {
            settings.export_frames = false;
        }
        if self.no_encode {
            settings.encode = false;
        }
        if let Some(dir) = &self.shader_dir {
            settings.shader_dir = Some(dir.clone());
        }
    }

    /// Frames to render before stopping.
    pub fn frame_budget(&self, settings: &RenderSettings) -> u32 {
        self.frames.unwrap_or_else(|| settings.max_frames())
    }
}
