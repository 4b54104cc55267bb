use std::path::Path;
use std::process::Command;

use crate::error::{MediaFfmpegError, Result};
use crate::probe::probe_media;

/// An extracted video frame in RGBA format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Extracts a single video frame near the requested timestamp.
///
/// Seeking uses `-ss` input seeking, which lands on the nearest keyframe
/// at-or-before the target. That is the right trade-off for thumbnail
/// strips: extraction stays cheap even for long assets, at the cost of
/// sub-second accuracy.
///
/// When `target_height` is given and smaller than the source, the frame is
/// downscaled preserving aspect ratio (width rounded to an even pixel
/// count).
///
/// # Example
/// ```no_run
/// use media_ffmpeg::extract_rgba_frame;
///
/// let frame = extract_rgba_frame("sample.mp4", 12.0, Some(64))
///     .expect("extraction should succeed");
/// assert_eq!(frame.height, 64);
/// ```
pub fn extract_rgba_frame(
    path: impl AsRef<Path>,
    at_seconds: f64,
    target_height: Option<u32>,
) -> Result<ExtractedFrame> {
    if !at_seconds.is_finite() || at_seconds < 0.0 {
        return Err(MediaFfmpegError::InvalidTimestampSeconds(at_seconds));
    }

    let path = path.as_ref();
    let media = probe_media(path)?;
    let video = media
        .first_video()
        .ok_or_else(|| MediaFfmpegError::MissingVideoStream(path.to_path_buf()))?;
    let source_width = video
        .width
        .ok_or_else(|| MediaFfmpegError::MissingVideoDimensions(path.to_path_buf()))?;
    let source_height = video
        .height
        .ok_or_else(|| MediaFfmpegError::MissingVideoDimensions(path.to_path_buf()))?;

    let (width, height) = output_dimensions(source_width, source_height, target_height);
    let rgba = run_extract_command(path, at_seconds, width, height)?;

    let expected_size = width as usize * height as usize * 4;
    if rgba.len() != expected_size {
        return Err(MediaFfmpegError::Parse {
            context: "extracted rgba size",
            value: format!("expected {expected_size} bytes, got {}", rgba.len()),
        });
    }

    Ok(ExtractedFrame {
        width,
        height,
        rgba,
    })
}

fn output_dimensions(
    source_width: u32,
    source_height: u32,
    target_height: Option<u32>,
) -> (u32, u32) {
    let Some(height) = target_height else {
        return (source_width, source_height);
    };
    if height == 0 || height >= source_height || source_height == 0 {
        return (source_width, source_height);
    }

    let scaled = (u64::from(source_width) * u64::from(height) + u64::from(source_height) / 2)
        / u64::from(source_height);
    // rawvideo itself has no alignment needs, but even widths keep the
    // scaler happy for any source pixel format.
    let width = ((scaled as u32) & !1).max(2);
    (width, height)
}

fn run_extract_command(path: &Path, at_seconds: f64, width: u32, height: u32) -> Result<Vec<u8>> {
    let filter = format!("scale={width}:{height}");
    let output = Command::new("ffmpeg")
        .arg("-hide_banner")
        .arg("-v")
        .arg("error")
        .arg("-ss")
        .arg(format!("{at_seconds:.6}"))
        .arg("-i")
        .arg(path)
        .arg("-frames:v")
        .arg("1")
        .arg("-vf")
        .arg(&filter)
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-")
        .output()
        .map_err(|source| MediaFfmpegError::Io {
            context: "run ffmpeg extract frame",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaFfmpegError::CommandFailed {
            command: format!("ffmpeg extract frame {}", path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output.stdout)
}
