use std::path::Path;

use tracing::{debug, warn};

use crate::config::ScrubConfig;
use crate::loader::CancelToken;
use crate::media::{FrameExtractor, Thumbnail};
use crate::time::{seconds_to_ticks, ticks_to_seconds};

/// Number of thumbnails to sample for an asset of the given duration.
///
/// One sample per `seconds_per_sample` of footage, clamped between
/// `min_sample_count` and `max_thumbnails`. Zero-duration assets sample
/// nothing at all; the clamp only applies once there is footage to show.
///
/// # Example
/// ```
/// use scrub::config::ScrubConfig;
/// use scrub::sampler::sample_count;
///
/// let config = ScrubConfig::default();
/// assert_eq!(sample_count(40.0, &config), 20);
/// assert_eq!(sample_count(3.0, &config), 10);
/// assert_eq!(sample_count(0.0, &config), 0);
/// ```
pub fn sample_count(duration_seconds: f64, config: &ScrubConfig) -> usize {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return 0;
    }

    let estimated = if config.seconds_per_sample > 0.0 {
        (duration_seconds / config.seconds_per_sample).floor() as usize
    } else {
        0
    };
    config
        .min_sample_count
        .max(config.max_thumbnails.min(estimated))
}

/// Timestamp in seconds of sample `index` out of `frame_count` evenly
/// spaced samples. A single sample sits at the start of the asset.
pub fn sample_seconds(index: usize, frame_count: usize, duration_seconds: f64) -> f64 {
    if frame_count <= 1 {
        return 0.0;
    }

    let progress = index as f64 / (frame_count - 1) as f64;
    progress * duration_seconds
}

/// Samples an asset into an ordered sequence of thumbnails.
///
/// The result is strictly ascending by sample index and source timestamp.
/// Per-frame extraction failures skip that sample, so the sequence may be
/// shorter than [`sample_count`]; a total failure yields an empty sequence
/// and is a recoverable "no preview available" condition, not an error.
///
/// `cancel` is checked between extraction calls so a detached widget stops
/// paying for frames nobody will see.
pub fn generate<E>(
    extractor: &E,
    asset: &Path,
    duration_tl: i64,
    config: &ScrubConfig,
    cancel: &CancelToken,
) -> Vec<Thumbnail>
where
    E: FrameExtractor + ?Sized,
{
    if duration_tl <= 0 {
        debug!(asset = ?asset, "no duration available, skipping thumbnail generation");
        return Vec::new();
    }

    let duration_seconds = ticks_to_seconds(duration_tl);
    let frame_count = sample_count(duration_seconds, config);
    let mut thumbnails = Vec::with_capacity(frame_count);

    for index in 0..frame_count {
        if cancel.is_cancelled() {
            debug!(index, frame_count, "thumbnail generation cancelled");
            break;
        }

        let at_seconds = sample_seconds(index, frame_count, duration_seconds);
        match extractor.extract_frame(asset, at_seconds) {
            Ok(image) => thumbnails.push(Thumbnail {
                index,
                timestamp_tl: seconds_to_ticks(at_seconds),
                image,
            }),
            Err(error) => {
                debug!(index, at_seconds, %error, "skipping failed thumbnail sample");
            }
        }
    }

    if thumbnails.is_empty() && frame_count > 0 && !cancel.is_cancelled() {
        warn!(asset = ?asset, frame_count, "thumbnail generation produced no frames");
    }
    thumbnails
}
