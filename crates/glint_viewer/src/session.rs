//! The render loop shared by the windowed and headless modes.

use std::time::Instant;

use anyhow::Result;
use glint_gpu::GpuRenderer;
use glint_scene::{FrameState, RenderSettings};
use glint_tracer::CpuRenderer;
use image::RgbImage;

use crate::encode::encode_video;
use crate::export::FrameExporter;

pub enum Backend {
    Gpu(GpuRenderer),
    Cpu(CpuRenderer),
}

/// Renders frames until the budget is spent, exporting each one.
pub struct Session {
    settings: RenderSettings,
    backend: Backend,
    exporter: Option<FrameExporter>,
    /// Frames rendered so far
    frame: u32,
    budget: u32,
    started: Option<Instant>,
}

impl Session {
    pub fn new(settings: RenderSettings, backend: Backend, budget: u32) -> Self {
        let exporter = if settings.export_frames {
            match FrameExporter::new(&settings.frames_dir) {
                Ok(exporter) => Some(exporter),
                Err(err) => {
                    log::error!("{:#}, frames will not be exported", err);
                    None
                }
            }
        } else {
            None
        };

        Self {
            settings,
            backend,
            exporter,
            frame: 0,
            budget,
            started: None,
        }
    }

    pub fn frames_rendered(&self) -> u32 {
        self.frame
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.budget
    }

    pub fn gpu_mut(&mut self) -> Option<&mut GpuRenderer> {
        match &mut self.backend {
            Backend::Gpu(renderer) => Some(renderer),
            Backend::Cpu(_) => None,
        }
    }

    /// Render the next frame, optionally present it, and export it.
    pub fn render_next(&mut self, present: bool) -> Result<()> {
        let started = *self.started.get_or_insert_with(Instant::now);
        let time = self
            .settings
            .clock
            .time(self.frame, self.settings.video_fps, started.elapsed());
        let frame = FrameState::at(time, self.settings.aspect());
        let capture = self.exporter.is_some();

        let image: Option<RgbImage> = match &mut self.backend {
            Backend::Gpu(renderer) => {
                renderer.render_frame(&frame)?;
                if present {
                    renderer.present()?;
                }
                if capture {
                    Some(renderer.capture()?)
                } else {
                    if !present {
                        renderer.wait_idle();
                    }
                    None
                }
            }
            Backend::Cpu(renderer) => Some(renderer.render_frame(&frame)?),
        };

        self.frame += 1;
        if let (Some(exporter), Some(image)) = (self.exporter.as_mut(), image) {
            exporter.save(self.frame, &image);
        }
        Ok(())
    }

    /// Run the encoder over the exported frames, if enabled.
    pub fn finish(self) {
        let exported = self.exporter.as_ref().map_or(0, FrameExporter::exported);
        log::info!("Rendered {} frames, exported {}", self.frame, exported);

        if !self.settings.encode {
            return;
        }
        if exported == 0 {
            log::warn!("No frames were exported, skipping video encoding");
            return;
        }
        if let Err(err) = encode_video(&self.settings) {
            log::error!("{:#}", err);
        }
    }
}
