//! Object-space triangle meshes.

use glint_math::Vec3;

use crate::layout::{point4, vector4, GpuMesh, GpuTriangle, MAX_MESH_TRIANGLES};
use crate::scene::SceneError;

/// A flat-shaded triangle in object space.
///
/// The normal is authored rather than derived from the winding, so it is
/// kept as given and only transformed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self {
            a,
            b,
            c,
            normal,
            color,
        }
    }

    pub fn to_gpu(&self) -> GpuTriangle {
        GpuTriangle {
            a: point4(self.a),
            b: point4(self.b),
            c: point4(self.c),
            normal: vector4(self.normal),
            color: vector4(self.color),
        }
    }
}

/// A named list of at most `MAX_MESH_TRIANGLES` triangles.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a mesh, rejecting empty meshes and meshes over capacity.
    pub fn new(name: impl Into<String>, triangles: Vec<Triangle>) -> Result<Self, SceneError> {
        let name = name.into();
        if triangles.is_empty() {
            return Err(SceneError::EmptyMesh(name));
        }
        if triangles.len() > MAX_MESH_TRIANGLES {
            return Err(SceneError::TooManyTriangles {
                mesh: name,
                count: triangles.len(),
                max: MAX_MESH_TRIANGLES,
            });
        }
        Ok(Self { name, triangles })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Pack into the fixed-size GPU record; unused slots stay zeroed.
    pub fn to_gpu(&self) -> GpuMesh {
        let mut record = GpuMesh {
            triangle_count: self.triangles.len() as u32,
            ..Default::default()
        };
        for (slot, triangle) in record.triangles.iter_mut().zip(&self.triangles) {
            *slot = triangle.to_gpu();
        }
        record
    }
}
