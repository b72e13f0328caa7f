//! Hands the exported frames to an external video encoder.

use std::ffi::OsString;
use std::process::Command;

use anyhow::{bail, Context, Result};
use glint_scene::RenderSettings;

/// Arguments for an ffmpeg-compatible encoder reading `<frames_dir>/%d.png`
/// from frame 1.
pub fn encoder_args(settings: &RenderSettings) -> Vec<OsString> {
    vec![
        "-r".into(),
        settings.video_fps.to_string().into(),
        "-start_number".into(),
        "1".into(),
        "-i".into(),
        settings.frames_dir.join("%d.png").into_os_string(),
        "-q".into(),
        "0".into(),
        settings.video_path.clone().into_os_string(),
    ]
}

/// Run the encoder and wait for it.
pub fn encode_video(settings: &RenderSettings) -> Result<()> {
    let args = encoder_args(settings);
    log::info!(
        "Encoding {} with {} {}",
        settings.video_path.display(),
        settings.encoder,
        args.iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let status = Command::new(&settings.encoder)
        .args(&args)
        .status()
        .with_context(|| format!("Failed to run encoder `{}`", settings.encoder))?;

    if !status.success() {
        bail!("Encoder `{}` exited with {}", settings.encoder, status);
    }

    log::info!("Wrote {}", settings.video_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_encoder_args() {
        let settings = RenderSettings::default();
        let args = encoder_args(&settings);
        let expected: Vec<OsString> = [
            "-r",
            "60",
            "-start_number",
            "1",
            "-i",
            "exportedFrames/%d.png",
            "-q",
            "0",
            "test.avi",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_encoder_args_follow_settings() {
        let settings = RenderSettings {
            video_fps: 24,
            frames_dir: PathBuf::from("out/frames"),
            video_path: PathBuf::from("out/demo.mp4"),
            ..RenderSettings::default()
        };
        let args = encoder_args(&settings);
        assert_eq!(args[1], "24");
        assert_eq!(PathBuf::from(&args[5]), PathBuf::from("out/frames").join("%d.png"));
        assert_eq!(args[8], "out/demo.mp4");
    }

    #[test]
    fn test_missing_encoder_is_an_error() {
        let settings = RenderSettings {
            encoder: "glint-no-such-encoder".to_string(),
            ..RenderSettings::default()
        };
        let err = encode_video(&settings).unwrap_err();
        assert!(format!("{err:#}").contains("glint-no-such-encoder"));
    }
}
