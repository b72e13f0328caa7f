//! Closest-hit and shadow queries over a flat triangle list.

use glint_math::{Interval, Ray, Vec3};
use glint_scene::GpuTriangle;

use crate::triangle::intersect;
use crate::{Color, EPSILON};

/// Record of a ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    pub color: Color,
    /// Index of the triangle in the list that was searched
    pub index: usize,
}

/// Find the nearest triangle hit by `ray` inside `ray_t`.
///
/// Every triangle is tested. On equal distances the earlier triangle wins.
pub fn closest_hit(ray: &Ray, triangles: &[GpuTriangle], ray_t: Interval) -> Option<Hit> {
    let mut closest_so_far = ray_t.max;
    let mut nearest = None;

    for (index, tri) in triangles.iter().enumerate() {
        if let Some(t) = intersect(ray, tri, ray_t.with_max(closest_so_far)) {
            closest_so_far = t;
            nearest = Some((index, t));
        }
    }

    let (index, t) = nearest?;
    let tri = &triangles[index];
    let outward = tri.normal();
    let normal = if ray.direction.dot(outward) > 0.0 {
        -outward
    } else {
        outward
    };

    Some(Hit {
        t,
        point: ray.at(t),
        normal,
        color: tri.color(),
        index,
    })
}

/// Whether anything blocks the segment from `origin` along unit `direction`
/// up to `distance`.
pub fn occluded(origin: Vec3, direction: Vec3, distance: f32, triangles: &[GpuTriangle]) -> bool {
    let ray = Ray::new(origin, direction);
    let ray_t = Interval::new(EPSILON, distance);
    triangles.iter().any(|tri| intersect(&ray, tri, ray_t).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_scene::layout::{point4, vector4};

    /// A unit-ish triangle facing +Z at depth `z`.
    fn wall(z: f32, color: Vec3) -> GpuTriangle {
        GpuTriangle {
            a: point4(Vec3::new(-1.0, -1.0, z)),
            b: point4(Vec3::new(1.0, -1.0, z)),
            c: point4(Vec3::new(0.0, 1.0, z)),
            normal: vector4(Vec3::Z),
            color: vector4(color),
        }
    }

    fn forward() -> Interval {
        Interval::new(EPSILON, f32::INFINITY)
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let triangles = [wall(-5.0, Vec3::X), wall(-2.0, Vec3::Y), wall(-8.0, Vec3::Z)];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = closest_hit(&ray, &triangles, forward()).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.color, Vec3::Y);
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_closest_hit_tie_keeps_first() {
        let triangles = [wall(-3.0, Vec3::X), wall(-3.0, Vec3::Y)];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = closest_hit(&ray, &triangles, forward()).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.color, Vec3::X);
    }

    #[test]
    fn test_closest_hit_miss() {
        let triangles = [wall(-3.0, Vec3::X)];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(closest_hit(&ray, &triangles, forward()).is_none());
        assert!(closest_hit(&ray, &[], forward()).is_none());
    }

    #[test]
    fn test_normal_faces_the_ray() {
        let triangles = [wall(-3.0, Vec3::ONE)];

        let front = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = closest_hit(&front, &triangles, forward()).unwrap();
        assert_eq!(hit.normal, Vec3::Z);

        let back = Ray::new(Vec3::new(0.0, 0.0, -6.0), Vec3::Z);
        let hit = closest_hit(&back, &triangles, forward()).unwrap();
        assert_eq!(hit.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_occluded_between_points() {
        let triangles = [wall(-3.0, Vec3::ONE)];

        // Blocker at 3, light at 5
        assert!(occluded(Vec3::ZERO, Vec3::NEG_Z, 5.0, &triangles));
        // Light in front of the blocker
        assert!(!occluded(Vec3::ZERO, Vec3::NEG_Z, 2.0, &triangles));
        // Looking the other way
        assert!(!occluded(Vec3::ZERO, Vec3::Z, 5.0, &triangles));
    }

    #[test]
    fn test_surface_does_not_shadow_itself() {
        let triangles = [wall(-3.0, Vec3::ONE)];
        let origin = Vec3::new(0.0, 0.0, -3.0) + Vec3::Z * EPSILON;
        assert!(!occluded(origin, Vec3::Z, 10.0, &triangles));
    }
}
