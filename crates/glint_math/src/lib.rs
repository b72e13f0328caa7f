// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod camera;
mod interval;
mod ray;
mod transform;

pub use camera::CornerRays;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_reexports_compose() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit_range = Interval::new(0.0, 10.0);
        assert!(hit_range.surrounds(ray.at(2.0).length()));
    }
}
