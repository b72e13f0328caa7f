use glam::{Quat, Vec3};

/// The four corner rays of a pinhole camera's view.
///
/// The fragment pass bilinearly interpolates these per pixel instead of
/// unprojecting through a view-projection matrix. `ray00` is bottom-left,
/// `ray01` top-left, `ray10` bottom-right and `ray11` top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRays {
    pub eye: Vec3,
    pub ray00: Vec3,
    pub ray01: Vec3,
    pub ray10: Vec3,
    pub ray11: Vec3,
}

impl CornerRays {
    /// Build corner rays from look-at parameters.
    ///
    /// `fov_y` is the vertical field of view in degrees and `aspect` is
    /// width / height. The forward ray is yawed about the camera's up axis by
    /// half the horizontal angle, then pitched by half the vertical angle
    /// about the right axis as rotated by that same yaw.
    pub fn from_look_at(eye: Vec3, center: Vec3, up: Vec3, fov_y: f32, aspect: f32) -> Self {
        let forward = center - eye;

        // w points back at the eye, u to the right, v up (all camera-relative)
        let w = -forward;
        let u = up.cross(w).try_normalize().unwrap_or(Vec3::X);
        let v = w.cross(u).try_normalize().unwrap_or(Vec3::Y);

        let half_y = (fov_y / 2.0).to_radians();
        let half_x = (fov_y * aspect / 2.0).to_radians();

        // Positive yaw about v turns towards the left
        let yaw_left = Quat::from_axis_angle(v, half_x);
        let yaw_right = Quat::from_axis_angle(v, -half_x);
        let u_left = yaw_left * u;
        let u_right = yaw_right * u;

        let corner = |yaw: Quat, axis: Vec3, pitch: f32| {
            Quat::from_axis_angle(axis, pitch) * (yaw * forward)
        };

        Self {
            eye,
            ray00: corner(yaw_left, u_left, -half_y),
            ray01: corner(yaw_left, u_left, half_y),
            ray10: corner(yaw_right, u_right, -half_y),
            ray11: corner(yaw_right, u_right, half_y),
        }
    }

    /// Bilinear interpolation of the corners.
    ///
    /// `x` runs left to right and `y` bottom to top, both in [0, 1].
    pub fn interpolate(&self, x: f32, y: f32) -> Vec3 {
        let left = self.ray00.lerp(self.ray01, y);
        let right = self.ray10.lerp(self.ray11, y);
        left.lerp(right, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_ahead() -> CornerRays {
        CornerRays::from_look_at(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0, 1.0)
    }

    #[test]
    fn test_corner_quadrants() {
        let rays = straight_ahead();

        assert!(rays.ray00.x < 0.0 && rays.ray00.y < 0.0);
        assert!(rays.ray01.x < 0.0 && rays.ray01.y > 0.0);
        assert!(rays.ray10.x > 0.0 && rays.ray10.y < 0.0);
        assert!(rays.ray11.x > 0.0 && rays.ray11.y > 0.0);

        for ray in [rays.ray00, rays.ray01, rays.ray10, rays.ray11] {
            assert!(ray.z < 0.0);
        }
    }

    #[test]
    fn test_corner_values_for_square_90_degrees() {
        let rays = straight_ahead();

        // Yaw 45 degrees left, then pitch 45 degrees down
        let expected = Vec3::new(-0.5, -std::f32::consts::FRAC_1_SQRT_2, -0.5);
        assert!((rays.ray00 - expected).length() < 1e-5);
    }

    #[test]
    fn test_corners_keep_forward_length() {
        let eye = Vec3::new(0.0, 8.0, 8.0);
        let center = Vec3::new(0.0, 0.5, 0.0);
        let rays = CornerRays::from_look_at(eye, center, Vec3::Y, 45.0, 16.0 / 9.0);
        let length = (center - eye).length();

        for ray in [rays.ray00, rays.ray01, rays.ray10, rays.ray11] {
            assert!((ray.length() - length).abs() < 1e-4);
        }
    }

    #[test]
    fn test_corners_are_mirror_symmetric() {
        let rays = straight_ahead();

        assert!((rays.ray00.x + rays.ray10.x).abs() < 1e-5);
        assert!((rays.ray00.y - rays.ray10.y).abs() < 1e-5);
        assert!((rays.ray01.y + rays.ray00.y).abs() < 1e-5);
    }

    #[test]
    fn test_interpolate_center_looks_forward() {
        let eye = Vec3::new(0.0, 8.0, 8.0);
        let center = Vec3::new(0.0, 0.5, 0.0);
        let rays = CornerRays::from_look_at(eye, center, Vec3::Y, 45.0, 1.0);

        let dir = rays.interpolate(0.5, 0.5).normalize();
        let forward = (center - eye).normalize();
        assert!(dir.dot(forward) > 0.999);
    }

    #[test]
    fn test_interpolate_hits_corners() {
        let rays = straight_ahead();

        assert!((rays.interpolate(0.0, 0.0) - rays.ray00).length() < 1e-6);
        assert!((rays.interpolate(0.0, 1.0) - rays.ray01).length() < 1e-6);
        assert!((rays.interpolate(1.0, 0.0) - rays.ray10).length() < 1e-6);
        assert!((rays.interpolate(1.0, 1.0) - rays.ray11).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_up_has_no_nan() {
        // Looking straight down the up axis
        let rays = CornerRays::from_look_at(Vec3::Y, Vec3::ZERO, Vec3::Y, 45.0, 1.0);

        for ray in [rays.ray00, rays.ray01, rays.ray10, rays.ray11] {
            assert!(ray.is_finite());
        }
    }
}
