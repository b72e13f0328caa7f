//! The scene: an ordered list of meshes.
//!
//! Mesh order matters. Transform `i` applies to mesh `i`, and world-space
//! triangles are laid out mesh by mesh in this order.

use glint_math::{Mat4, Vec3};
use thiserror::Error;

use crate::layout::GpuMesh;
use crate::mesh::{Mesh, Triangle};

/// Errors raised while assembling a scene or pairing it with a frame.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Mesh '{0}' has no triangles")]
    EmptyMesh(String),

    #[error("Mesh '{mesh}' has {count} triangles, at most {max} are supported")]
    TooManyTriangles {
        mesh: String,
        count: usize,
        max: usize,
    },

    #[error("Scene has {expected} meshes but {actual} transforms were supplied")]
    TransformCountMismatch { expected: usize, actual: usize },
}

/// Number of point lights the demo animates.
const DEMO_LIGHT_COUNT: usize = 2;

const FLOOR_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const CUBE_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.1);

#[derive(Clone, Debug)]
pub struct Scene {
    meshes: Vec<Mesh>,
    light_count: usize,
}

impl Scene {
    pub fn new(meshes: Vec<Mesh>, light_count: usize) -> Self {
        Self { meshes, light_count }
    }

    /// The demo scene: a 10x10 floor quad and a unit cube, lit by two
    /// point lights.
    pub fn demo() -> Result<Self, SceneError> {
        Ok(Self::new(vec![demo_floor()?, demo_cube()?], DEMO_LIGHT_COUNT))
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Number of lights every frame of this scene carries.
    pub fn light_count(&self) -> usize {
        self.light_count
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total number of world-space triangles one frame produces.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    pub fn to_gpu_meshes(&self) -> Vec<GpuMesh> {
        self.meshes.iter().map(Mesh::to_gpu).collect()
    }

    /// Every mesh needs exactly one transform.
    pub fn check_transforms(&self, transforms: &[Mat4]) -> Result<(), SceneError> {
        if transforms.len() != self.meshes.len() {
            return Err(SceneError::TransformCountMismatch {
                expected: self.meshes.len(),
                actual: transforms.len(),
            });
        }
        Ok(())
    }
}

fn demo_floor() -> Result<Mesh, SceneError> {
    let up = Vec3::Y;
    let tri = |a: [f32; 3], b: [f32; 3], c: [f32; 3]| {
        Triangle::new(a.into(), b.into(), c.into(), up, FLOOR_COLOR)
    };

    Mesh::new(
        "floor",
        vec![
            tri([-5.0, 0.0, 5.0], [-5.0, 0.0, -5.0], [5.0, 0.0, -5.0]),
            tri([-5.0, 0.0, 5.0], [5.0, 0.0, -5.0], [5.0, 0.0, 5.0]),
        ],
    )
}

fn demo_cube() -> Result<Mesh, SceneError> {
    let tri = |a: [f32; 3], b: [f32; 3], c: [f32; 3], normal: Vec3| {
        Triangle::new(a.into(), b.into(), c.into(), normal, CUBE_COLOR)
    };
    let h = 0.5;

    Mesh::new(
        "cube",
        vec![
            // -Z
            tri([-h, -h, -h], [h, -h, -h], [-h, h, -h], Vec3::NEG_Z),
            tri([h, -h, -h], [h, h, -h], [-h, h, -h], Vec3::NEG_Z),
            // +Z
            tri([-h, -h, h], [-h, h, h], [h, h, h], Vec3::Z),
            tri([-h, -h, h], [h, h, h], [h, -h, h], Vec3::Z),
            // +X
            tri([h, -h, h], [h, h, h], [h, h, -h], Vec3::X),
            tri([h, -h, h], [h, h, -h], [h, -h, -h], Vec3::X),
            // -X
            tri([-h, -h, -h], [-h, h, -h], [-h, h, h], Vec3::NEG_X),
            tri([-h, -h, -h], [-h, h, h], [-h, -h, h], Vec3::NEG_X),
            // +Y
            tri([-h, h, h], [-h, h, -h], [h, h, -h], Vec3::Y),
            tri([-h, h, h], [h, h, -h], [h, h, h], Vec3::Y),
            // -Y
            tri([-h, -h, h], [-h, -h, -h], [h, -h, -h], Vec3::NEG_Y),
            tri([-h, -h, h], [h, -h, -h], [h, -h, h], Vec3::NEG_Y),
        ],
    )
}
