use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Pixel format of thumbnail bitmaps handed to the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
}

/// Immutable thumbnail bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub bytes: Arc<[u8]>,
}

/// One sampled preview frame: a bitmap plus the sample index and playback
/// timestamp that located it along the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub index: usize,
    pub timestamp_tl: i64,
    pub image: ThumbnailImage,
}

/// Per-frame extraction collaborator consumed by the sampler.
///
/// Each call is blocking and may fail independently; a failed sample is
/// skipped, not retried.
pub trait FrameExtractor {
    fn extract_frame(&self, asset: &Path, at_seconds: f64) -> Result<ThumbnailImage>;
}

/// Player collaborator consumed by the controller.
///
/// The controller only issues seek commands and never reads player
/// internals; the player serializes its own seek handling.
pub trait Player {
    /// Loads `asset` as the current playback item.
    fn attach_asset(&self, asset: &Path) -> Result<()>;

    /// Unloads the current playback item, if any.
    fn detach_asset(&self);

    /// Duration of the currently loaded asset in playback ticks, `None`
    /// when no asset is loaded or the duration could not be determined.
    fn current_asset_duration(&self) -> Result<Option<i64>>;

    /// Fire-and-forget seek with explicit keyframe tolerances in ticks.
    fn seek(&self, to_tl: i64, tolerance_before_tl: i64, tolerance_after_tl: i64);
}

/// FFmpeg CLI-backed frame extractor used by production wiring.
///
/// Thumbnails are extracted downscaled to the strip height so a 100-sample
/// strip does not hold full-resolution frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegFrameExtractor {
    target_height: Option<u32>,
}

impl FfmpegFrameExtractor {
    pub fn new(target_height: Option<u32>) -> Self {
        Self { target_height }
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn extract_frame(&self, asset: &Path, at_seconds: f64) -> Result<ThumbnailImage> {
        let frame = media_ffmpeg::extract_rgba_frame(asset, at_seconds, self.target_height)?;
        Ok(ThumbnailImage {
            width: frame.width,
            height: frame.height,
            format: PixelFormat::Rgba8,
            bytes: frame.rgba.into(),
        })
    }
}
