//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm. Triangles are two-sided.

use glint_math::{Interval, Ray};
use glint_scene::GpuTriangle;

/// Determinant magnitude below which the ray is treated as parallel to the
/// triangle's plane (this also rejects degenerate, zero-area triangles).
const PARALLEL_EPSILON: f32 = 1e-7;

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns the ray parameter of the hit if it lies strictly inside `ray_t`.
pub fn intersect(ray: &Ray, tri: &GpuTriangle, ray_t: Interval) -> Option<f32> {
    let [v0, v1, v2] = tri.vertices();
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Check if intersection is outside triangle (u parameter)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Check if intersection is outside triangle (v parameter)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    ray_t.surrounds(t).then_some(t)
}
