//! Point lights with a finite radius of influence.

use glint_math::Vec3;

use crate::layout::{point4, vector4, GpuLight};

/// A point light.
///
/// Its contribution falls off to zero at `radius` and is scaled by
/// `brightness`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub radius: f32,
    pub brightness: f32,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3, radius: f32, brightness: f32) -> Self {
        Self {
            position,
            color,
            radius,
            brightness,
        }
    }

    /// Attenuation at `distance`: `brightness * (1 - d/r)^2`, zero from the
    /// radius outwards.
    pub fn attenuation(&self, distance: f32) -> f32 {
        if self.radius <= 0.0 || distance >= self.radius {
            return 0.0;
        }
        let falloff = 1.0 - distance / self.radius;
        self.brightness * falloff * falloff
    }

    pub fn to_gpu(&self) -> GpuLight {
        GpuLight {
            position: point4(self.position),
            color: vector4(self.color),
            radius: self.radius,
            brightness: self.brightness,
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuation_falloff() {
        let light = Light::new(Vec3::ZERO, Vec3::ONE, 4.0, 2.0);

        assert_eq!(light.attenuation(0.0), 2.0);
        assert!((light.attenuation(2.0) - 0.5).abs() < 1e-6);
        assert_eq!(light.attenuation(4.0), 0.0);
        assert_eq!(light.attenuation(10.0), 0.0);
    }

    #[test]
    fn test_zero_radius_is_dark() {
        let light = Light::new(Vec3::ZERO, Vec3::ONE, 0.0, 5.0);
        assert_eq!(light.attenuation(0.0), 0.0);
    }

    #[test]
    fn test_to_gpu() {
        let light = Light::new(Vec3::new(1.0, 4.0, 2.0), Vec3::X, 7.0, 1.0);
        let gpu = light.to_gpu();

        assert_eq!(gpu.position, [1.0, 4.0, 2.0, 1.0]);
        assert_eq!(gpu.color, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(gpu.radius, 7.0);
        assert_eq!(gpu.brightness, 1.0);
    }
}
