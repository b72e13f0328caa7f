// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and
// inverse(); this adds what the triangle transform step needs on top.

use glam::Mat4;

/// Determinant magnitude below which a model matrix is treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Matrix that carries surface normals through this transform
    /// (the inverse-transpose).
    ///
    /// A singular matrix collapses geometry to a plane, line or point, which
    /// can never be hit, so the identity is returned instead of NaNs.
    fn normal_matrix(&self) -> Mat4;

    /// True when the matrix has a usable inverse.
    fn is_invertible(&self) -> bool;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat4 {
        if !self.is_invertible() {
            return Mat4::IDENTITY;
        }
        self.inverse().transpose()
    }

    fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() >= SINGULAR_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_normal_matrix_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let normal = mat.normal_matrix().transform_vector3(Vec3::Y);

        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_follows_rotation() {
        use std::f32::consts::FRAC_PI_2;

        // 90 degree rotation around Z turns +X into +Y
        let mat = Mat4::from_rotation_z(FRAC_PI_2);
        let normal = mat.normal_matrix().transform_vector3(Vec3::X);

        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_non_uniform_scale() {
        // A 45 degree slope squashed along Y must tilt its normal towards Y,
        // which the plain model matrix would get wrong.
        let mat = Mat4::from_scale(Vec3::new(1.0, 0.5, 1.0));
        let slope_normal = Vec3::new(-1.0, 1.0, 0.0).normalize();

        let transformed = mat.normal_matrix().transform_vector3(slope_normal).normalize();
        let tangent = mat.transform_vector3(Vec3::new(1.0, 1.0, 0.0));

        assert!(transformed.dot(tangent).abs() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_singular_is_identity() {
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::ZERO,
            Quat::from_rotation_y(0.3),
            Vec3::new(1.0, 1.5, 0.0),
        );

        assert!(!mat.is_invertible());
        assert_eq!(mat.normal_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_is_invertible_uniform_scale() {
        assert!(Mat4::from_scale(Vec3::splat(2.0)).is_invertible());
        assert!(Mat4::IDENTITY.is_invertible());
    }
}
