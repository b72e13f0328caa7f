//! Direct lighting: ambient, Lambert diffuse and Phong specular with
//! hard shadows.

use glint_math::Vec3;
use glint_scene::{GpuTriangle, Light, TraceParams};

use crate::hit::{occluded, Hit};
use crate::{Color, EPSILON};

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Direct colour at a hit point, seen from `view_dir` (unit, pointing back
/// towards the viewer).
pub fn shade(
    hit: &Hit,
    view_dir: Vec3,
    lights: &[Light],
    triangles: &[GpuTriangle],
    params: &TraceParams,
) -> Color {
    let mut color = params.ambient * hit.color;
    let shadow_origin = hit.point + hit.normal * EPSILON;

    for light in lights {
        let to_light = light.position - hit.point;
        let distance = to_light.length();
        if distance <= EPSILON {
            continue;
        }
        let l = to_light / distance;

        let n_dot_l = hit.normal.dot(l);
        if n_dot_l <= 0.0 {
            continue;
        }

        let attenuation = light.attenuation(distance);
        if attenuation <= 0.0 {
            continue;
        }

        if occluded(shadow_origin, l, distance, triangles) {
            continue;
        }

        let diffuse = n_dot_l * hit.color * light.color;
        let highlight = reflect(-l, hit.normal).dot(view_dir).max(0.0);
        let specular = highlight.powf(params.shininess) * light.color;

        color += attenuation * (diffuse + specular);
    }

    color
}
