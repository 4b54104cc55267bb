use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{debug, warn};

use crate::config::ScrubConfig;
use crate::media::{FrameExtractor, Player, Thumbnail};
use crate::sampler;

/// Cooperative cancellation flag tied to a widget lifetime.
///
/// Cancelling never blocks on the worker; the load simply stops at its
/// next checkpoint and its result is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one load: the asset duration plus the sampled thumbnails,
/// tagged with the controller ticket that requested it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub ticket: u64,
    pub duration_tl: i64,
    pub thumbnails: Vec<Thumbnail>,
}

/// Spawns the load worker for one attach.
///
/// The worker fetches the asset duration from the player collaborator
/// (failure or an unknown duration degrades to `0`, which in turn degrades
/// generation to an empty strip), samples thumbnails, and hands the
/// outcome to `deliver` — unless the token was cancelled, in which case
/// the partial result is dropped and `deliver` is never called.
pub fn spawn_load<P, E, F>(
    player: Arc<P>,
    extractor: Arc<E>,
    asset: PathBuf,
    ticket: u64,
    config: ScrubConfig,
    cancel: CancelToken,
    deliver: F,
) -> thread::JoinHandle<()>
where
    P: Player + Send + Sync + 'static,
    E: FrameExtractor + Send + Sync + 'static,
    F: FnOnce(LoadOutcome) + Send + 'static,
{
    thread::spawn(move || {
        let duration_tl = match player.current_asset_duration() {
            Ok(Some(duration_tl)) if duration_tl > 0 => duration_tl,
            Ok(_) => {
                warn!(ticket, asset = ?asset, "asset duration unavailable");
                0
            }
            Err(error) => {
                warn!(ticket, asset = ?asset, %error, "duration fetch failed");
                0
            }
        };

        let thumbnails = sampler::generate(extractor.as_ref(), &asset, duration_tl, &config, &cancel);

        if cancel.is_cancelled() {
            debug!(ticket, "discarding cancelled load");
            return;
        }

        debug!(
            ticket,
            duration_tl,
            thumbnail_count = thumbnails.len(),
            "load finished"
        );
        deliver(LoadOutcome {
            ticket,
            duration_tl,
            thumbnails,
        });
    })
}
