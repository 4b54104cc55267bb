mod error;
mod extract;
mod probe;
mod time;

pub use error::{MediaFfmpegError, Result};
pub use extract::{ExtractedFrame, extract_rgba_frame};
pub use probe::{MediaInfo, StreamInfo, StreamKind, probe_media};
pub use time::Rational;
