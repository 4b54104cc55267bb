use std::fmt::{Display, Formatter};

/// Result type used by the scrub engine crate.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Errors produced by scrub controller commands.
///
/// Everything else in this crate degrades instead of failing: duration and
/// extraction problems reduce to an empty thumbnail strip and are logged,
/// never propagated.
#[derive(Debug)]
pub enum ScrubError {
    AlreadyAttached,
    InvalidLayout {
        height: f64,
    },
    Media(media_ffmpeg::MediaFfmpegError),
}

impl Display for ScrubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyAttached => {
                write!(f, "controller is already attached to an asset")
            }
            Self::InvalidLayout { height } => {
                write!(f, "strip layout height must be positive: {height}")
            }
            Self::Media(err) => write!(f, "media backend error: {err}"),
        }
    }
}

impl std::error::Error for ScrubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<media_ffmpeg::MediaFfmpegError> for ScrubError {
    fn from(value: media_ffmpeg::MediaFfmpegError) -> Self {
        Self::Media(value)
    }
}
