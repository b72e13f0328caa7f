use anyhow::{bail, ensure, Result};
use glint_scene::{FrameState, RenderSettings, Scene, TraceParams};
use image::RgbImage;

use crate::buffers::SceneBuffers;
use crate::capture::FrameCapture;
use crate::context::GpuContext;
use crate::present_pass::PresentPass;
use crate::shaders::{ShaderKind, ShaderLibrary};
use crate::trace_pass::TracePass;
use crate::transform_pass::TransformPass;

/// Owns the GPU passes for one scene.
///
/// Frames are traced at the configured render size whatever the window
/// size. Presenting stretches the traced image over the surface.
pub struct GpuRenderer {
    context: GpuContext,
    scene: Scene,
    params: TraceParams,
    buffers: SceneBuffers,
    transform_pass: TransformPass,
    trace_pass: TracePass,
    present_pass: Option<PresentPass>,
    capture: FrameCapture,
}

impl GpuRenderer {
    pub fn new(context: GpuContext, scene: &Scene, settings: &RenderSettings) -> Result<Self> {
        let device = &context.device;
        check_render_size(
            settings.width,
            settings.height,
            device.limits().max_texture_dimension_2d,
        )?;
        let shaders = ShaderLibrary::new(settings.shader_dir.clone());

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let buffers = SceneBuffers::new(device, scene);
        let capture = FrameCapture::new(device, settings.width, settings.height);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            bail!("Failed to allocate scene buffers: {err}");
        }

        let transform_pass = shaders.build(device, ShaderKind::Transform, |shader| {
            TransformPass::new(device, shader, &buffers)
        })?;
        let trace_pass = shaders.build(device, ShaderKind::Trace, |shader| {
            TracePass::new(device, shader, &buffers, settings.width, settings.height)
        })?;
        let present_pass = match &context.surface {
            Some(surface) => Some(shaders.build(device, ShaderKind::Present, |shader| {
                PresentPass::new(device, shader, trace_pass.target_view(), surface.format())
            })?),
            None => None,
        };

        log::info!(
            "GPU renderer ready on {}: {}x{}, {} bounces",
            context.adapter_name(),
            settings.width,
            settings.height,
            settings.max_bounces
        );

        Ok(Self {
            scene: scene.clone(),
            params: settings.trace_params(),
            buffers,
            transform_pass,
            trace_pass,
            present_pass,
            capture,
            context,
        })
    }

    /// Upload the frame, transform the meshes and trace the image into the
    /// offscreen target.
    pub fn render_frame(&mut self, frame: &FrameState) -> Result<()> {
        self.scene.check_transforms(&frame.transforms)?;
        self.buffers.upload(&self.context.queue, frame, &self.params)?;

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Storage writes of the compute pass are visible to the render pass
        // that follows in the same submission
        self.transform_pass.record(&mut encoder);
        self.trace_pass.record(&mut encoder);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Show the last traced frame on the window surface.
    pub fn present(&self) -> Result<()> {
        let (Some(surface), Some(present_pass)) = (&self.context.surface, &self.present_pass) else {
            anyhow::bail!("Renderer has no window surface to present to");
        };

        let output = match surface.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                surface.reconfigure(&self.context.device);
                return Ok(());
            }
            Err(err) if surface_error_is_fatal(&err) => return Err(err.into()),
            Err(err) => {
                log::warn!("Skipping present: {err}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });
        present_pass.record(&mut encoder, &view);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Read the last traced frame back as an RGB image.
    pub fn capture(&self) -> Result<RgbImage> {
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        self.capture.record_copy(&mut encoder, self.trace_pass.target());
        self.context.queue.submit(std::iter::once(encoder.finish()));

        Ok(self.capture.read(&self.context.device)?)
    }

    /// Block until submitted work has finished.
    pub fn wait_idle(&self) {
        self.context.device.poll(wgpu::Maintain::Wait);
    }

    /// Handle window resize. Only the surface follows the window.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if let Some(surface) = self.context.surface.as_mut() {
            surface.resize(&self.context.device, new_size);
        }
    }
}

/// Only running out of memory ends the session. Timeouts and lost surfaces
/// skip a present and the next frame tries again.
fn surface_error_is_fatal(err: &wgpu::SurfaceError) -> bool {
    matches!(err, wgpu::SurfaceError::OutOfMemory)
}

/// The trace target and its readback are sized to the render settings.
fn check_render_size(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    ensure!(
        width <= max_dimension && height <= max_dimension,
        "Render size {width}x{height} exceeds the device limit of {max_dimension} pixels per side"
    );
    Ok(())
}
