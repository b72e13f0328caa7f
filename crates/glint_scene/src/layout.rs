//! Plain-old-data records shared with the WGSL shaders.
//!
//! Every struct here mirrors a struct in `transform.wgsl` / `trace.wgsl`
//! under std430 (storage) or std140 (uniform) rules. Only `vec4`-sized
//! members and explicit padding are used so that both layouts agree.

use bytemuck::{Pod, Zeroable};
use glint_math::{Mat4, Vec3};

/// Fixed triangle capacity of one mesh record.
pub const MAX_MESH_TRIANGLES: usize = 12;

/// One triangle as stored on the GPU (object or world space).
///
/// `w` of the vertices is 1, `w` of the normal and colour is unused.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    pub a: [f32; 4],
    pub b: [f32; 4],
    pub c: [f32; 4],
    pub normal: [f32; 4],
    pub color: [f32; 4],
}

impl GpuTriangle {
    pub fn vertices(&self) -> [Vec3; 3] {
        [
            Vec3::from_slice(&self.a[..3]),
            Vec3::from_slice(&self.b[..3]),
            Vec3::from_slice(&self.c[..3]),
        ]
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_slice(&self.normal[..3])
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_slice(&self.color[..3])
    }
}

/// A mesh record: a triangle count followed by a fixed-size triangle array.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuMesh {
    pub triangle_count: u32,
    pub _padding: [u32; 3],
    pub triangles: [GpuTriangle; MAX_MESH_TRIANGLES],
}

impl GpuMesh {
    /// The populated prefix of the triangle array.
    pub fn active_triangles(&self) -> &[GpuTriangle] {
        let count = (self.triangle_count as usize).min(MAX_MESH_TRIANGLES);
        &self.triangles[..count]
    }
}

/// Per-mesh transform: the model matrix and the matrix for its normals.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuMeshTransform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl GpuMeshTransform {
    pub fn new(model: Mat4, normal: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    pub fn normal(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.normal)
    }
}

/// A point light as stored on the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub radius: f32,
    pub brightness: f32,
    pub _padding: [f32; 2],
}

/// Per-frame uniform for the trace pass: camera corner rays and shading knobs.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub eye: [f32; 4],
    pub ray00: [f32; 4],
    pub ray01: [f32; 4],
    pub ray10: [f32; 4],
    pub ray11: [f32; 4],
    pub background: [f32; 4],
    pub max_bounces: u32,
    pub reflectivity: f32,
    pub ambient: f32,
    pub shininess: f32,
    pub _padding: [u32; 4],
}

/// Extend a point to homogeneous coordinates (w = 1).
pub fn point4(v: Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 1.0]
}

/// Extend a direction or colour with w = 0.
pub fn vector4(v: Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn test_record_sizes_match_wgsl() {
        assert_eq!(size_of::<GpuTriangle>(), 80);
        assert_eq!(size_of::<GpuMesh>(), 16 + 80 * MAX_MESH_TRIANGLES);
        assert_eq!(size_of::<GpuMeshTransform>(), 128);
        assert_eq!(size_of::<GpuLight>(), 48);
        assert_eq!(size_of::<FrameUniform>(), 128);
    }

    #[test]
    fn test_records_are_16_byte_multiples() {
        // Array strides in WGSL round up to 16 for these structs
        for size in [
            size_of::<GpuTriangle>(),
            size_of::<GpuMesh>(),
            size_of::<GpuMeshTransform>(),
            size_of::<GpuLight>(),
            size_of::<FrameUniform>(),
        ] {
            assert_eq!(size % 16, 0);
        }
        assert_eq!(align_of::<GpuMesh>(), 4);
    }

    #[test]
    fn test_triangle_accessors() {
        let tri = GpuTriangle {
            a: point4(Vec3::new(1.0, 2.0, 3.0)),
            b: point4(Vec3::X),
            c: point4(Vec3::Y),
            normal: vector4(Vec3::Z),
            color: vector4(Vec3::new(1.0, 0.5, 0.1)),
        };

        assert_eq!(tri.vertices()[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(tri.normal(), Vec3::Z);
        assert_eq!(tri.color(), Vec3::new(1.0, 0.5, 0.1));
    }

    #[test]
    fn test_active_triangles_clamps_count() {
        let mut mesh = GpuMesh::default();
        mesh.triangle_count = 99;
        assert_eq!(mesh.active_triangles().len(), MAX_MESH_TRIANGLES);

        mesh.triangle_count = 2;
        assert_eq!(mesh.active_triangles().len(), 2);
    }

    #[test]
    fn test_mesh_transform_round_trips_matrices() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let record = GpuMeshTransform::new(model, Mat4::IDENTITY);

        assert_eq!(record.model(), model);
        assert_eq!(record.normal(), Mat4::IDENTITY);
    }
}
