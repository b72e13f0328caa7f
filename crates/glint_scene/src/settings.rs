//! Render settings, loadable from a JSON file.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "width": 640, "height": 360, "video_seconds": 2, "clock": "program" }
//! ```

use std::path::{Path, PathBuf};

use glint_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::animation::AnimationClock;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Shading parameters shared by the GPU trace pass and the CPU tracer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceParams {
    /// Mirror bounces traced after the primary hit
    pub max_bounces: u32,
    /// Weight of the reflected colour against the direct colour
    pub reflectivity: f32,
    pub ambient: f32,
    /// Phong specular exponent
    pub shininess: f32,
    /// Colour returned by rays that leave the scene
    pub background: Vec3,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            max_bounces: 3,
            reflectivity: 0.3,
            ambient: 0.1,
            shininess: 32.0,
            background: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub video_fps: u32,
    pub video_seconds: u32,
    pub max_bounces: u32,
    pub reflectivity: f32,
    pub ambient: f32,
    pub shininess: f32,
    pub background: [f32; 3],
    pub clock: AnimationClock,
    pub frames_dir: PathBuf,
    pub video_path: PathBuf,
    pub encoder: String,
    pub encode: bool,
    pub export_frames: bool,
    /// Directory to read WGSL sources from instead of the embedded copies
    pub shader_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let trace = TraceParams::default();
        Self {
            width: 1280,
            height: 720,
            video_fps: 60,
            video_seconds: 10,
            max_bounces: trace.max_bounces,
            reflectivity: trace.reflectivity,
            ambient: trace.ambient,
            shininess: trace.shininess,
            background: trace.background.to_array(),
            clock: AnimationClock::Video,
            frames_dir: PathBuf::from("exportedFrames"),
            video_path: PathBuf::from("test.avi"),
            encoder: "ffmpeg".to_string(),
            encode: true,
            export_frames: true,
            shader_dir: None,
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&raw)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from a JSON string and validate them.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason: &str| {
            Err(SettingsError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.width == 0 || self.height == 0 {
            return invalid("width/height", "render size must be positive");
        }
        if self.video_fps == 0 {
            return invalid("video_fps", "must be at least 1");
        }
        if self.video_seconds == 0 {
            return invalid("video_seconds", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.reflectivity) {
            return invalid("reflectivity", "must be within [0, 1]");
        }
        if self.shininess.is_nan() || self.shininess <= 0.0 {
            return invalid("shininess", "must be positive");
        }
        if self.encode && self.encoder.trim().is_empty() {
            return invalid("encoder", "must name a program when encoding is enabled");
        }
        Ok(())
    }

    /// Number of frames in the exported video.
    pub fn max_frames(&self) -> u32 {
        self.video_fps.saturating_mul(self.video_seconds)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn trace_params(&self) -> TraceParams {
        TraceParams {
            max_bounces: self.max_bounces,
            reflectivity: self.reflectivity,
            ambient: self.ambient,
            shininess: self.shininess,
            background: Vec3::from_array(self.background),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo() {
        let settings = RenderSettings::default();

        assert_eq!((settings.width, settings.height), (1280, 720));
        assert_eq!(settings.max_frames(), 600);
        assert_eq!(settings.frames_dir, PathBuf::from("exportedFrames"));
        assert_eq!(settings.clock, AnimationClock::Video);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            RenderSettings::from_json(r#"{ "width": 320, "height": 240, "clock": "program" }"#)
                .unwrap();

        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 240);
        assert_eq!(settings.clock, AnimationClock::Program);
        assert_eq!(settings.video_fps, 60);
        assert_eq!(settings.encoder, "ffmpeg");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RenderSettings::from_json(r#"{ "widht": 320 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            r#"{ "width": 0 }"#,
            r#"{ "video_fps": 0 }"#,
            r#"{ "video_seconds": 0 }"#,
            r#"{ "reflectivity": 1.5 }"#,
            r#"{ "shininess": 0.0 }"#,
            r#"{ "encoder": "  " }"#,
        ];

        for raw in cases {
            let err = RenderSettings::from_json(raw).unwrap_err();
            assert!(matches!(err, SettingsError::Invalid { .. }), "{raw} should be invalid");
        }
    }

    #[test]
    fn test_blank_encoder_allowed_when_not_encoding() {
        let settings = RenderSettings::from_json(r#"{ "encoder": "", "encode": false }"#);
        assert!(settings.is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_trace_params_from_settings() {
        let settings =
            RenderSettings::from_json(r#"{ "max_bounces": 0, "background": [0.1, 0.2, 0.3] }"#)
                .unwrap();
        let params = settings.trace_params();

        assert_eq!(params.max_bounces, 0);
        assert_eq!(params.background, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(params.reflectivity, 0.3);
    }

    #[test]
    fn test_aspect() {
        let settings = RenderSettings::default();
        assert!((settings.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }
}
