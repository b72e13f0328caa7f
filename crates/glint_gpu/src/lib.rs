//! Glint GPU - the wgpu side of the ray tracer.
//!
//! A frame is two passes over shared scene buffers:
//!
//! 1. [`TransformPass`]: a compute shader writes world-space triangles from
//!    the object-space meshes and the frame's mesh transforms
//! 2. [`TracePass`]: a full-target triangle strip whose fragment shader
//!    intersects, shades and reflects one primary ray per pixel
//!
//! The traced image lives in an offscreen `Rgba8Unorm` texture.
//! [`PresentPass`] stretches it onto a window surface and [`FrameCapture`]
//! reads it back into an `image::RgbImage`.

mod buffers;
mod capture;
mod context;
mod present_pass;
mod renderer;
pub mod shaders;
mod trace_pass;
mod transform_pass;

pub use buffers::SceneBuffers;
pub use capture::{padded_bytes_per_row, unpad_rows, CaptureError, FrameCapture};
pub use context::{GpuContext, WindowSurface};
pub use present_pass::PresentPass;
pub use renderer::GpuRenderer;
pub use shaders::{ShaderKind, ShaderLibrary};
pub use trace_pass::{TracePass, OFFSCREEN_FORMAT};
pub use transform_pass::{workgroup_count, TransformPass, WORKGROUP_SIZE};
