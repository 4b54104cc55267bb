use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, SyncSender, channel};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use scrub::{Player, PixelFormat, ThumbnailImage, seconds_to_ticks, ticks_to_seconds};
use tracing::{debug, warn};

/// Decoded frame published for the preview area after a seek lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub t_tl: i64,
    pub image: ThumbnailImage,
}

struct CurrentAsset {
    path: PathBuf,
    duration_tl: Option<i64>,
}

struct SeekRequest {
    path: PathBuf,
    to_tl: i64,
}

/// FFmpeg-backed player collaborator.
///
/// Seeks are fire-and-forget: each one is queued to a decode thread that
/// drains the queue to the most recent request before decoding, so a burst
/// of scrubbing only pays for the latest frame. Decoded frames come back
/// through the preview channel handed to [`MediaPlayer::spawn`].
pub struct MediaPlayer {
    current: Mutex<Option<CurrentAsset>>,
    seek_tx: Sender<SeekRequest>,
}

impl MediaPlayer {
    pub fn spawn(preview_tx: SyncSender<PreviewFrame>) -> Arc<Self> {
        let (seek_tx, seek_rx) = channel::<SeekRequest>();
        thread::spawn(move || decode_worker(seek_rx, preview_tx));

        Arc::new(Self {
            current: Mutex::new(None),
            seek_tx,
        })
    }

    fn current_lock(&self) -> std::sync::MutexGuard<'_, Option<CurrentAsset>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Player for MediaPlayer {
    fn attach_asset(&self, asset: &Path) -> scrub::Result<()> {
        let info = media_ffmpeg::probe_media(asset)?;
        let duration_tl = info
            .best_duration_seconds()
            .map(seconds_to_ticks)
            .filter(|ticks| *ticks > 0);
        debug!(asset = ?asset, ?duration_tl, "player loaded asset");

        *self.current_lock() = Some(CurrentAsset {
            path: asset.to_path_buf(),
            duration_tl,
        });
        Ok(())
    }

    fn detach_asset(&self) {
        *self.current_lock() = None;
    }

    fn current_asset_duration(&self) -> scrub::Result<Option<i64>> {
        Ok(self.current_lock().as_ref().and_then(|asset| asset.duration_tl))
    }

    // Tolerances are accepted for the seam but the CLI extractor always
    // decodes at the exact requested timestamp.
    fn seek(&self, to_tl: i64, _tolerance_before_tl: i64, _tolerance_after_tl: i64) {
        let Some(path) = self.current_lock().as_ref().map(|asset| asset.path.clone()) else {
            debug!(to_tl, "seek ignored, no asset loaded");
            return;
        };
        let _ = self.seek_tx.send(SeekRequest { path, to_tl });
    }
}

fn decode_worker(seek_rx: Receiver<SeekRequest>, preview_tx: SyncSender<PreviewFrame>) {
    while let Ok(request) = seek_rx.recv() {
        let request = drain_to_latest(&seek_rx, request);
        let at_seconds = ticks_to_seconds(request.to_tl);

        match media_ffmpeg::extract_rgba_frame(&request.path, at_seconds, None) {
            Ok(frame) => {
                let preview = PreviewFrame {
                    t_tl: request.to_tl,
                    image: ThumbnailImage {
                        width: frame.width,
                        height: frame.height,
                        format: PixelFormat::Rgba8,
                        bytes: frame.rgba.into(),
                    },
                };
                if preview_tx.send(preview).is_err() {
                    return;
                }
            }
            Err(error) => {
                warn!(at_seconds, %error, "preview decode failed");
            }
        }
    }
}

/// Discards every queued request except the newest one.
fn drain_to_latest(seek_rx: &Receiver<SeekRequest>, mut request: SeekRequest) -> SeekRequest {
    while let Ok(newer) = seek_rx.try_recv() {
        request = newer;
    }
    request
}
