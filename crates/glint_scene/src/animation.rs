//! Per-frame animation of the demo scene.
//!
//! Everything that moves is a pure function of a single time value, so a
//! frame can be reproduced exactly from its number.

use std::time::Duration;

use glint_math::{CornerRays, Mat4, Mat4Ext, Quat, Vec3};
use serde::Deserialize;

use crate::layout::{point4, vector4, FrameUniform, GpuLight, GpuMeshTransform};
use crate::light::Light;
use crate::settings::TraceParams;

pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 8.0, 8.0);
pub const CAMERA_CENTER: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const CAMERA_FOV_Y: f32 = 45.0;

/// Where animation time comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationClock {
    /// Frame number divided by the video frame rate. Motion in the exported
    /// video is correct no matter how slowly frames render.
    #[default]
    Video,
    /// Wall-clock time since the first frame, for real-time previews.
    Program,
}

impl AnimationClock {
    /// Animation time in seconds for `frame` (0-based).
    pub fn time(self, frame: u32, video_fps: u32, elapsed: Duration) -> f32 {
        match self {
            AnimationClock::Video => frame as f32 / video_fps.max(1) as f32,
            AnimationClock::Program => elapsed.as_secs_f32(),
        }
    }
}

/// Everything that changes from one frame to the next.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub time: f32,
    /// One model matrix per scene mesh, in mesh order.
    pub transforms: Vec<Mat4>,
    pub lights: Vec<Light>,
    pub camera: CornerRays,
}

impl FrameState {
    /// Animate the demo scene at `time` seconds for a view of `aspect`.
    pub fn at(time: f32, aspect: f32) -> Self {
        let (sin, cos) = time.sin_cos();

        let floor = Mat4::from_scale(Vec3::splat((sin + 6.0) / 3.0));

        // Translate, then spin about Y, then scale (applied right to left)
        let cube = Mat4::from_translation(Vec3::new(2.0 * cos, 1.5, 2.0 * sin))
            * Mat4::from_quat(Quat::from_rotation_y(-time))
            * Mat4::from_scale(Vec3::splat((1.0 + sin) / 2.0));

        let white = Light::new(Vec3::new(2.0 * sin, 4.0, 2.0 * cos), Vec3::ONE, 7.0, 1.0);
        let red = Light::new(Vec3::new(4.0 * cos, 1.0, 4.0), Vec3::X, 2.0, 2.0);

        Self {
            time,
            transforms: vec![floor, cube],
            lights: vec![white, red],
            camera: CornerRays::from_look_at(CAMERA_EYE, CAMERA_CENTER, Vec3::Y, CAMERA_FOV_Y, aspect),
        }
    }

    pub fn gpu_transforms(&self) -> Vec<GpuMeshTransform> {
        self.transforms
            .iter()
            .map(|model| GpuMeshTransform::new(*model, model.normal_matrix()))
            .collect()
    }

    pub fn gpu_lights(&self) -> Vec<GpuLight> {
        self.lights.iter().map(Light::to_gpu).collect()
    }

    pub fn frame_uniform(&self, params: &TraceParams) -> FrameUniform {
        FrameUniform {
            eye: point4(self.camera.eye),
            ray00: vector4(self.camera.ray00),
            ray01: vector4(self.camera.ray01),
            ray10: vector4(self.camera.ray10),
            ray11: vector4(self.camera.ray11),
            background: vector4(params.background),
            max_bounces: params.max_bounces,
            reflectivity: params.reflectivity,
            ambient: params.ambient,
            shininess: params.shininess,
            _padding: [0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_clock_uses_frame_rate() {
        let clock = AnimationClock::Video;
        assert_eq!(clock.time(0, 60, Duration::from_secs(99)), 0.0);
        assert_eq!(clock.time(30, 60, Duration::ZERO), 0.5);
        assert_eq!(clock.time(120, 60, Duration::ZERO), 2.0);
    }

    #[test]
    fn test_video_clock_zero_fps_does_not_divide_by_zero() {
        assert_eq!(AnimationClock::Video.time(3, 0, Duration::ZERO), 3.0);
    }

    #[test]
    fn test_program_clock_uses_elapsed() {
        let clock = AnimationClock::Program;
        assert_eq!(clock.time(500, 60, Duration::from_millis(1500)), 1.5);
    }

    #[test]
    fn test_frame_at_time_zero() {
        let frame = FrameState::at(0.0, 16.0 / 9.0);

        // Floor scale is (0 + 6) / 3 = 2
        let corner = frame.transforms[0].transform_point3(Vec3::new(5.0, 0.0, 5.0));
        assert!((corner - Vec3::new(10.0, 0.0, 10.0)).length() < 1e-5);

        // Cube sits at (2, 1.5, 0) with half scale
        let center = frame.transforms[1].transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(2.0, 1.5, 0.0)).length() < 1e-5);
        let top = frame.transforms[1].transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!((top - Vec3::new(2.0, 1.75, 0.0)).length() < 1e-5);

        assert_eq!(frame.lights[0].position, Vec3::new(0.0, 4.0, 2.0));
        assert_eq!(frame.lights[1].position, Vec3::new(4.0, 1.0, 4.0));
        assert_eq!(frame.lights[1].color, Vec3::X);
    }

    #[test]
    fn test_cube_rotates_backwards_about_y() {
        let t = std::f32::consts::FRAC_PI_2;
        let frame = FrameState::at(t, 1.0);
        let cube = frame.transforms[1];

        // sin = 1: scale 1, centre at (0, 1.5, 2), rotated by -90 degrees
        let center = cube.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 1.5, 2.0)).length() < 1e-5);

        let x_axis = cube.transform_vector3(Vec3::X);
        assert!((x_axis - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_collapsed_cube_has_identity_normal_matrix() {
        // sin = -1 scales the cube to nothing
        let frame = FrameState::at(-std::f32::consts::FRAC_PI_2, 1.0);
        let transforms = frame.gpu_transforms();

        assert_eq!(transforms[1].normal(), Mat4::IDENTITY);
        for column in transforms[1].normal {
            for value in column {
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn test_frame_uniform_carries_camera_and_params() {
        let frame = FrameState::at(1.0, 1.5);
        let params = TraceParams::default();
        let uniform = frame.frame_uniform(&params);

        assert_eq!(uniform.eye, [0.0, 8.0, 8.0, 1.0]);
        assert_eq!(uniform.ray00[..3], frame.camera.ray00.to_array());
        assert_eq!(uniform.max_bounces, params.max_bounces);
        assert_eq!(uniform.reflectivity, params.reflectivity);
    }

    #[test]
    fn test_clock_deserializes_lowercase() {
        let clock: AnimationClock = serde_json::from_str("\"program\"").unwrap();
        assert_eq!(clock, AnimationClock::Program);
    }
}
