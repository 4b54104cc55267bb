use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use iced::futures::{SinkExt, StreamExt, channel::mpsc as futures_mpsc, executor};
use iced::{Subscription, stream};
use scrub::{
    CancelToken, Command, Event, FfmpegFrameExtractor, FrameExtractor, Player, ScrubConfig,
    ScrubController, ScrubErrorEvent, StripLayout,
};

use crate::player::{MediaPlayer, PreviewFrame};

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const FEED_CHANNEL_CAPACITY: usize = 32;
const PREVIEW_CHANNEL_CAPACITY: usize = 4;
const SUBSCRIPTION_CHANNEL_CAPACITY: usize = 32;

/// Thumbnails are decoded at twice the strip height for crisp hidpi cells.
const THUMBNAIL_DECODE_HEIGHT: u32 = 120;

/// Sender used by the UI thread to dispatch commands to the scrub thread.
pub type ScrubCommandSender = mpsc::SyncSender<Command>;

/// Receiver used by the UI thread to read the scrub thread's output.
pub type ScrubFeedReceiver = mpsc::Receiver<BridgeFeed>;

/// One item of scrub thread output: a controller event or a decoded
/// preview frame.
#[derive(Debug, Clone)]
pub enum BridgeFeed {
    Scrub(Event),
    Preview(PreviewFrame),
}

/// Messages emitted by the scrub bridge subscription.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Ready(ScrubCommandSender),
    Event(Event),
    Preview(PreviewFrame),
    Disconnected,
}

/// Builds a subscription that starts the scrub bridge and forwards its feed.
pub fn scrub_subscription() -> Subscription<BridgeEvent> {
    Subscription::run(bridge_worker_stream)
}

fn bridge_worker_stream() -> impl iced::futures::Stream<Item = BridgeEvent> {
    bridge_worker_stream_with(spawn_ffmpeg_bridge)
}

fn bridge_worker_stream_with(
    spawn_bridge: fn() -> (ScrubCommandSender, ScrubFeedReceiver),
) -> impl iced::futures::Stream<Item = BridgeEvent> {
    stream::channel(
        SUBSCRIPTION_CHANNEL_CAPACITY,
        move |mut output| async move {
            let (command_tx, feed_rx) = spawn_bridge();
            let _ = output.send(BridgeEvent::Ready(command_tx)).await;

            let (forward_tx, mut forward_rx) =
                futures_mpsc::channel::<BridgeEvent>(SUBSCRIPTION_CHANNEL_CAPACITY);

            thread::spawn(move || {
                let mut forward_tx = forward_tx;
                while let Ok(feed) = feed_rx.recv() {
                    let event = match feed {
                        BridgeFeed::Scrub(event) => BridgeEvent::Event(event),
                        BridgeFeed::Preview(frame) => BridgeEvent::Preview(frame),
                    };
                    if executor::block_on(forward_tx.send(event)).is_err() {
                        return;
                    }
                }
                let _ = executor::block_on(forward_tx.send(BridgeEvent::Disconnected));
            });

            while let Some(event) = forward_rx.next().await {
                if output.send(event).await.is_err() {
                    break;
                }
            }
        },
    )
}

/// Spawns the production bridge wired to the FFmpeg player and extractor.
pub fn spawn_ffmpeg_bridge() -> (ScrubCommandSender, ScrubFeedReceiver) {
    let (preview_tx, preview_rx) = mpsc::sync_channel::<PreviewFrame>(PREVIEW_CHANNEL_CAPACITY);
    let player = MediaPlayer::spawn(preview_tx);
    let extractor = Arc::new(FfmpegFrameExtractor::new(Some(THUMBNAIL_DECODE_HEIGHT)));
    spawn_scrub_bridge(player, extractor, ScrubConfig::default(), preview_rx)
}

/// Spawns a bridge around any player and extractor pair.
///
/// The worker thread owns the controller. It reacts to `LoadRequested` by
/// spawning the load worker, whose outcome re-enters the command channel as
/// `LoadFinished`; a `Detach` or a replacing load cancels the in-flight
/// token so a stale load can neither run to completion nor be applied.
pub fn spawn_scrub_bridge<P, E>(
    player: Arc<P>,
    extractor: Arc<E>,
    config: ScrubConfig,
    preview_rx: mpsc::Receiver<PreviewFrame>,
) -> (ScrubCommandSender, ScrubFeedReceiver)
where
    P: Player + Send + Sync + 'static,
    E: FrameExtractor + Send + Sync + 'static,
{
    let (command_tx, command_rx) = mpsc::sync_channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    let (feed_tx, feed_rx) = mpsc::sync_channel::<BridgeFeed>(FEED_CHANNEL_CAPACITY);

    let preview_feed_tx = feed_tx.clone();
    thread::spawn(move || {
        while let Ok(frame) = preview_rx.recv() {
            if preview_feed_tx.send(BridgeFeed::Preview(frame)).is_err() {
                return;
            }
        }
    });

    let loader_tx = command_tx.clone();
    thread::spawn(move || {
        let mut controller = ScrubController::new(Arc::clone(&player), config.clone());
        let mut active_load: Option<CancelToken> = None;

        while let Ok(command) = command_rx.recv() {
            if matches!(command, Command::Detach) {
                if let Some(token) = active_load.take() {
                    token.cancel();
                }
            }

            match controller.handle_command(command) {
                Ok(events) => {
                    for event in events {
                        if let Event::LoadRequested { asset, ticket } = &event {
                            if let Some(token) = active_load.take() {
                                token.cancel();
                            }
                            active_load = Some(start_load(
                                Arc::clone(&player),
                                Arc::clone(&extractor),
                                asset.clone(),
                                *ticket,
                                config.clone(),
                                loader_tx.clone(),
                            ));
                        }
                        if feed_tx.send(BridgeFeed::Scrub(event)).is_err() {
                            return;
                        }
                    }
                }
                Err(error) => {
                    let event = Event::Error(ScrubErrorEvent::from_error(&error));
                    if feed_tx.send(BridgeFeed::Scrub(event)).is_err() {
                        return;
                    }
                }
            }
        }
    });

    (command_tx, feed_rx)
}

fn start_load<P, E>(
    player: Arc<P>,
    extractor: Arc<E>,
    asset: PathBuf,
    ticket: u64,
    config: ScrubConfig,
    loader_tx: ScrubCommandSender,
) -> CancelToken
where
    P: Player + Send + Sync + 'static,
    E: FrameExtractor + Send + Sync + 'static,
{
    let cancel = CancelToken::new();
    let _ = scrub::spawn_load(
        player,
        extractor,
        asset,
        ticket,
        config,
        cancel.clone(),
        move |outcome| {
            let _ = loader_tx.send(Command::LoadFinished {
                ticket: outcome.ticket,
                duration_tl: outcome.duration_tl,
                thumbnails: outcome.thumbnails,
            });
        },
    );
    cancel
}

/// Strip height shared by the widget and the attach command.
pub const STRIP_HEIGHT: f32 = 60.0;

pub fn attach_command(asset: PathBuf) -> Command {
    Command::Attach {
        asset,
        layout: StripLayout {
            height: f64::from(STRIP_HEIGHT),
        },
    }
}
