//! Glint Scene - the fixed demo scene and everything that describes a frame.
//!
//! This crate provides:
//!
//! - **GPU records**: `GpuTriangle`, `GpuMesh`, `GpuLight`, `GpuMeshTransform`
//!   and `FrameUniform`, laid out to match the WGSL structs byte for byte
//! - **Scene types**: `Triangle`, `Mesh`, `Light`, `Scene` and the hardcoded
//!   floor + cube demo scene
//! - **Animation**: per-frame mesh transforms, light positions and camera
//! - **Settings**: `RenderSettings`, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use glint_scene::{FrameState, RenderSettings, Scene};
//!
//! let scene = Scene::demo()?;
//! let settings = RenderSettings::default();
//! let frame = FrameState::at(0.5, settings.aspect());
//! scene.check_transforms(&frame.transforms)?;
//! ```

pub mod animation;
pub mod layout;
pub mod light;
pub mod mesh;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use animation::{AnimationClock, FrameState};
pub use layout::{FrameUniform, GpuLight, GpuMesh, GpuMeshTransform, GpuTriangle, MAX_MESH_TRIANGLES};
pub use light::Light;
pub use mesh::{Mesh, Triangle};
pub use scene::{Scene, SceneError};
pub use settings::{RenderSettings, SettingsError, TraceParams};
