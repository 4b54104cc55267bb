use std::time::Duration;

/// Tunable options recognized by the scrub controller and sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrubConfig {
    /// Minimum interval between two seek commands issued to the player.
    pub seek_throttle_interval: Duration,
    /// Upper bound on the number of thumbnails sampled per asset.
    pub max_thumbnails: usize,
    /// Lower bound on the number of thumbnails sampled per asset.
    pub min_sample_count: usize,
    /// Seconds of footage represented by one thumbnail sample.
    pub seconds_per_sample: f64,
    /// Thumbnail width used when generation produced no thumbnails.
    pub default_thumb_width: f64,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            seek_throttle_interval: Duration::from_millis(100),
            max_thumbnails: 100,
            min_sample_count: 10,
            seconds_per_sample: 2.0,
            default_thumb_width: 60.0,
        }
    }
}

/// Layout metrics supplied by the host UI on attach.
///
/// Passing these explicitly keeps the engine free of ambient display-size
/// lookups; the host owns its viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripLayout {
    /// Height of the thumbnail strip in logical pixels.
    pub height: f64,
}
