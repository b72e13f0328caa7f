//! Object space to world space, the CPU side of `transform.wgsl`.

use glint_math::{Mat4, Vec3};
use glint_scene::layout::{point4, vector4};
use glint_scene::{GpuMesh, GpuMeshTransform, GpuTriangle};

/// Transform one mesh's active triangles.
///
/// Vertices go through the model matrix (w = 1), the normal through the
/// normal matrix (w = 0) and is renormalised. Colour is copied.
pub fn transform_mesh(mesh: &GpuMesh, transform: &GpuMeshTransform) -> Vec<GpuTriangle> {
    let model = transform.model();
    let normal_matrix = transform.normal();

    mesh.active_triangles()
        .iter()
        .map(|tri| transform_triangle(tri, model, normal_matrix))
        .collect()
}

/// Transform every mesh with its matching transform, mesh by mesh.
///
/// The output order is the order the compute pass writes in: all of mesh 0,
/// then all of mesh 1, and so on. Meshes without a transform are skipped.
pub fn transform_meshes(meshes: &[GpuMesh], transforms: &[GpuMeshTransform]) -> Vec<GpuTriangle> {
    meshes
        .iter()
        .zip(transforms)
        .flat_map(|(mesh, transform)| transform_mesh(mesh, transform))
        .collect()
}

fn transform_triangle(tri: &GpuTriangle, model: Mat4, normal_matrix: Mat4) -> GpuTriangle {
    let [a, b, c] = tri.vertices().map(|v| model.transform_point3(v));
    let normal = normal_matrix
        .transform_vector3(tri.normal())
        .try_normalize()
        .unwrap_or(Vec3::ZERO);

    GpuTriangle {
        a: point4(a),
        b: point4(b),
        c: point4(c),
        normal: vector4(normal),
        color: tri.color,
    }
}
