//! Glint CPU tracer - a reference for the GPU passes.
//!
//! Brute-force, single-threaded Whitted-style tracing over the world-space
//! triangle list. Each function here mirrors a function in the WGSL
//! shaders of `glint_gpu`, so the shader behaviour can be tested without a
//! GPU, and frames can still be rendered on machines without one.

mod hit;
mod renderer;
mod shading;
mod transform;
mod triangle;

pub use hit::{closest_hit, occluded, Hit};
pub use renderer::{color_to_rgb, render, trace, CpuRenderer, ImageBuffer};
pub use shading::{reflect, shade};
pub use transform::{transform_mesh, transform_meshes};
pub use triangle::intersect;

/// Color type alias (RGB values typically 0-1)
pub type Color = glint_math::Vec3;

/// Offset used to push secondary ray origins off the surface, and the
/// smallest accepted hit distance.
pub const EPSILON: f32 = 1e-4;
