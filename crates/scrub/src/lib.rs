//! UI-agnostic timeline scrub engine.
//!
//! The engine turns continuous scroll offsets from a host UI into a
//! thumbnail filmstrip, a selected playback time, and throttled seek
//! requests against a [`media::Player`] collaborator. Host UIs drive it
//! exclusively through [`controller::Command`] values and react to the
//! [`controller::Event`]s it returns; nothing in this crate depends on a
//! particular UI toolkit or media framework.

pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod media;
pub mod sampler;
pub mod throttle;
pub mod time;

pub use config::{ScrubConfig, StripLayout};
pub use controller::{
    Command, Event, Phase, ScrubController, ScrubErrorEvent, ScrubErrorKind, ScrubSnapshot,
    StripSnapshot,
};
pub use error::{Result, ScrubError};
pub use loader::{CancelToken, LoadOutcome, spawn_load};
pub use media::{
    FfmpegFrameExtractor, FrameExtractor, PixelFormat, Player, Thumbnail, ThumbnailImage,
};
pub use throttle::{SeekCommand, SeekThrottle};
pub use time::{TICKS_PER_SECOND, seconds_to_ticks, ticks_to_seconds};
