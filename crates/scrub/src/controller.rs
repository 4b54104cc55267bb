use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::config::{ScrubConfig, StripLayout};
use crate::error::{Result, ScrubError};
use crate::mapper;
use crate::media::{Player, Thumbnail};
use crate::throttle::SeekThrottle;

/// Lifecycle phase of one widget attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
}

/// Commands accepted by the scrub controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Attaches the widget to an asset and starts the load lifecycle.
    ///
    /// Valid only in `Idle`; there is a single load per widget lifetime.
    Attach {
        asset: PathBuf,
        layout: StripLayout,
    },
    /// Delivers the load outcome back onto the controller's thread.
    ///
    /// Deliveries whose `ticket` does not match the current attachment are
    /// discarded; a detached lifetime can never mutate the new state.
    LoadFinished {
        ticket: u64,
        duration_tl: i64,
        thumbnails: Vec<Thumbnail>,
    },
    /// Continuous scroll offset from the host UI: how far the strip has
    /// scrolled past its center marker, stamped at enqueue time.
    ScrollOffset {
        x: f64,
        now: Instant,
    },
    /// Host signal that scrubbing is currently disallowed.
    SetSelectionGuard {
        active: bool,
    },
    Detach,
}

/// Events emitted by the scrub controller, published on change.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The runtime must start a load for this attachment (host UIs can
    /// ignore this; the bridge reacts to it).
    LoadRequested { asset: PathBuf, ticket: u64 },
    PhaseChanged { phase: Phase },
    StripChanged(StripSnapshot),
    SelectedTimeChanged { t_tl: i64 },
    /// A scroll arrived while the selection guard was active; emitted
    /// exactly once per guarded scroll event.
    ScrubBlocked,
    Error(ScrubErrorEvent),
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubErrorKind {
    AlreadyAttached,
    InvalidLayout,
    Other,
}

impl From<&ScrubError> for ScrubErrorKind {
    fn from(value: &ScrubError) -> Self {
        match value {
            ScrubError::AlreadyAttached => Self::AlreadyAttached,
            ScrubError::InvalidLayout { .. } => Self::InvalidLayout,
            ScrubError::Media(_) => Self::Other,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubErrorEvent {
    pub kind: ScrubErrorKind,
    pub message: String,
}

impl ScrubErrorEvent {
    pub fn from_error(error: &ScrubError) -> Self {
        Self {
            kind: ScrubErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

/// Immutable strip state consumed by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub struct StripSnapshot {
    pub thumbnails: Vec<Thumbnail>,
    pub thumb_width: f64,
    pub duration_tl: i64,
}

/// Full observable state for pull-style reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrubSnapshot {
    pub phase: Phase,
    pub thumbnails: Vec<Thumbnail>,
    pub thumb_width: f64,
    pub duration_tl: i64,
    pub selected_time_tl: i64,
}

/// Scrub controller: maps scroll offsets to playback time and issues
/// throttled, zero-tolerance seeks to the player collaborator.
///
/// The controller is a synchronous state machine; asynchronous work
/// (duration fetch, thumbnail generation) happens in [`crate::loader`]
/// and re-enters through [`Command::LoadFinished`]. All scroll handling
/// before `Ready` is inert.
#[derive(Debug)]
pub struct ScrubController<P> {
    player: Arc<P>,
    config: ScrubConfig,
    phase: Phase,
    ticket: u64,
    layout: StripLayout,
    duration_tl: i64,
    thumbnails: Vec<Thumbnail>,
    thumb_width: f64,
    selected_time_tl: i64,
    throttle: SeekThrottle,
    guard_active: bool,
}

impl<P> ScrubController<P>
where
    P: Player,
{
    pub fn new(player: Arc<P>, config: ScrubConfig) -> Self {
        let throttle = SeekThrottle::new(config.seek_throttle_interval);
        Self {
            player,
            config,
            phase: Phase::Idle,
            ticket: 0,
            layout: StripLayout { height: 0.0 },
            duration_tl: 0,
            thumbnails: Vec::new(),
            thumb_width: 0.0,
            selected_time_tl: 0,
            throttle,
            guard_active: false,
        }
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::Attach { asset, layout } => self.attach(asset, layout),
            Command::LoadFinished {
                ticket,
                duration_tl,
                thumbnails,
            } => Ok(self.load_finished(ticket, duration_tl, thumbnails)),
            Command::ScrollOffset { x, now } => Ok(self.scroll_offset(x, now)),
            Command::SetSelectionGuard { active } => {
                self.guard_active = active;
                Ok(Vec::new())
            }
            Command::Detach => Ok(self.detach()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_time_tl(&self) -> i64 {
        self.selected_time_tl
    }

    pub fn snapshot(&self) -> ScrubSnapshot {
        ScrubSnapshot {
            phase: self.phase,
            thumbnails: self.thumbnails.clone(),
            thumb_width: self.thumb_width,
            duration_tl: self.duration_tl,
            selected_time_tl: self.selected_time_tl,
        }
    }

    fn attach(&mut self, asset: PathBuf, layout: StripLayout) -> Result<Vec<Event>> {
        if self.phase != Phase::Idle {
            return Err(ScrubError::AlreadyAttached);
        }
        if !(layout.height > 0.0) {
            return Err(ScrubError::InvalidLayout {
                height: layout.height,
            });
        }
        self.player.attach_asset(&asset)?;

        self.ticket += 1;
        self.layout = layout;
        self.phase = Phase::Loading;
        info!(asset = ?asset, ticket = self.ticket, "scrubber attached, loading");

        Ok(vec![
            Event::LoadRequested {
                asset,
                ticket: self.ticket,
            },
            Event::PhaseChanged {
                phase: Phase::Loading,
            },
        ])
    }

    fn load_finished(
        &mut self,
        ticket: u64,
        duration_tl: i64,
        thumbnails: Vec<Thumbnail>,
    ) -> Vec<Event> {
        if self.phase != Phase::Loading || ticket != self.ticket {
            debug!(
                ticket,
                current_ticket = self.ticket,
                phase = ?self.phase,
                "discarding stale load result"
            );
            return Vec::new();
        }

        self.duration_tl = duration_tl.max(0);
        self.thumb_width = thumb_width_for(&thumbnails, self.layout.height)
            .unwrap_or(self.config.default_thumb_width);
        self.thumbnails = thumbnails;
        self.phase = Phase::Ready;
        info!(
            ticket,
            duration_tl = self.duration_tl,
            thumbnail_count = self.thumbnails.len(),
            thumb_width = self.thumb_width,
            "scrubber ready"
        );

        vec![
            Event::StripChanged(StripSnapshot {
                thumbnails: self.thumbnails.clone(),
                thumb_width: self.thumb_width,
                duration_tl: self.duration_tl,
            }),
            Event::PhaseChanged {
                phase: Phase::Ready,
            },
        ]
    }

    fn scroll_offset(&mut self, x: f64, now: Instant) -> Vec<Event> {
        if self.phase != Phase::Ready {
            trace!(x, phase = ?self.phase, "ignoring scroll before ready");
            return Vec::new();
        }
        if self.guard_active {
            return vec![Event::ScrubBlocked];
        }
        // Structural guard: an empty or zero-duration strip cannot map
        // offsets to time, so scrolling it stays inert.
        if self.duration_tl <= 0 || self.thumbnails.is_empty() || self.thumb_width <= 0.0 {
            trace!(x, "ignoring scroll on empty strip");
            return Vec::new();
        }

        let progress = mapper::offset_to_progress(x, self.thumbnails.len(), self.thumb_width);
        let candidate_tl = mapper::progress_to_ticks(progress, self.duration_tl);

        let mut events = Vec::new();
        if candidate_tl != self.selected_time_tl {
            self.selected_time_tl = candidate_tl;
            events.push(Event::SelectedTimeChanged { t_tl: candidate_tl });
        }

        if let Some(seek) = self.throttle.maybe_seek(candidate_tl, now) {
            debug!(to_tl = seek.to_tl, "issuing seek");
            self.player.seek(seek.to_tl, 0, 0);
        }

        events
    }

    fn detach(&mut self) -> Vec<Event> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }

        self.player.detach_asset();

        // Bumping the ticket orphans any in-flight load delivery.
        self.ticket += 1;
        self.phase = Phase::Idle;
        self.duration_tl = 0;
        self.thumbnails = Vec::new();
        self.thumb_width = 0.0;
        self.selected_time_tl = 0;
        self.guard_active = false;
        self.throttle.reset();
        info!(ticket = self.ticket, "scrubber detached");

        vec![Event::PhaseChanged { phase: Phase::Idle }]
    }
}

/// Width of one strip cell: the first thumbnail's aspect ratio scaled to
/// the strip height. `None` when there is no usable first thumbnail.
fn thumb_width_for(thumbnails: &[Thumbnail], strip_height: f64) -> Option<f64> {
    let first = thumbnails.first()?;
    if first.image.height == 0 {
        return None;
    }

    let ratio = f64::from(first.image.width) / f64::from(first.image.height);
    let width = strip_height * ratio;
    (width > 0.0).then_some(width)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::{Command, Event, Phase, ScrubController};
    use crate::config::{ScrubConfig, StripLayout};
    use crate::error::ScrubError;
    use crate::media::{PixelFormat, Player, Thumbnail, ThumbnailImage};
    use crate::time::seconds_to_ticks;

    const STRIP_HEIGHT: f64 = 60.0;

    #[test]
    fn attach_requests_load_and_enters_loading() {
        let (mut controller, _player) = controller_with_player();

        let events = controller
            .handle_command(attach_command())
            .expect("attach should succeed");

        assert_eq!(events.len(), 2);
        let Event::LoadRequested { asset, ticket } = &events[0] else {
            panic!("first event must be LoadRequested");
        };
        assert_eq!(asset, &PathBuf::from("demo.mp4"));
        assert_eq!(*ticket, 1);
        assert_eq!(
            events[1],
            Event::PhaseChanged {
                phase: Phase::Loading
            }
        );
        assert_eq!(controller.phase(), Phase::Loading);
    }

    #[test]
    fn attach_loads_asset_into_player_and_detach_unloads_it() {
        let (mut controller, player) = controller_with_player();
        controller
            .handle_command(attach_command())
            .expect("attach should succeed");
        assert_eq!(
            player.attached.lock().expect("lock attached").as_slice(),
            &[PathBuf::from("demo.mp4")]
        );

        controller
            .handle_command(Command::Detach)
            .expect("detach should succeed");
        assert!(player.attached.lock().expect("lock attached").is_empty());
    }

    #[test]
    fn attach_while_attached_is_rejected() {
        let (mut controller, _player) = controller_with_player();
        controller
            .handle_command(attach_command())
            .expect("first attach should succeed");

        let result = controller.handle_command(attach_command());
        assert!(matches!(result, Err(ScrubError::AlreadyAttached)));
    }

    #[test]
    fn attach_rejects_non_positive_strip_height() {
        let (mut controller, _player) = controller_with_player();

        let result = controller.handle_command(Command::Attach {
            asset: PathBuf::from("demo.mp4"),
            layout: StripLayout { height: 0.0 },
        });

        assert!(matches!(
            result,
            Err(ScrubError::InvalidLayout { height }) if height == 0.0
        ));
    }

    #[test]
    fn load_finished_computes_thumb_width_from_first_aspect_ratio() {
        let (mut controller, _player) = controller_with_player();
        let ticket = attach(&mut controller);

        let events = controller
            .handle_command(Command::LoadFinished {
                ticket,
                duration_tl: seconds_to_ticks(40.0),
                thumbnails: sample_thumbnails(20),
            })
            .expect("load finished should succeed");

        let Event::StripChanged(snapshot) = &events[0] else {
            panic!("first event must be StripChanged");
        };
        // 106x60 source at strip height 60 keeps a 106px cell.
        assert_eq!(snapshot.thumb_width, 106.0);
        assert_eq!(snapshot.thumbnails.len(), 20);
        assert_eq!(snapshot.duration_tl, seconds_to_ticks(40.0));
        assert_eq!(
            events[1],
            Event::PhaseChanged {
                phase: Phase::Ready
            }
        );
    }

    #[test]
    fn empty_load_still_reaches_ready_with_fallback_width() {
        let (mut controller, _player) = controller_with_player();
        let ticket = attach(&mut controller);

        let events = controller
            .handle_command(Command::LoadFinished {
                ticket,
                duration_tl: 0,
                thumbnails: Vec::new(),
            })
            .expect("load finished should succeed");

        assert_eq!(controller.phase(), Phase::Ready);
        let Event::StripChanged(snapshot) = &events[0] else {
            panic!("first event must be StripChanged");
        };
        assert_eq!(snapshot.thumb_width, ScrubConfig::default().default_thumb_width);
        assert!(snapshot.thumbnails.is_empty());
    }

    #[test]
    fn scrolling_an_empty_strip_is_inert() {
        let (mut controller, player) = controller_with_player();
        let ticket = attach(&mut controller);
        controller
            .handle_command(Command::LoadFinished {
                ticket,
                duration_tl: 0,
                thumbnails: Vec::new(),
            })
            .expect("load finished should succeed");

        let events = controller
            .handle_command(Command::ScrollOffset {
                x: 600.0,
                now: Instant::now(),
            })
            .expect("scroll should succeed");

        assert!(events.is_empty());
        assert!(player.seeks.lock().expect("lock seeks").is_empty());
        assert_eq!(controller.selected_time_tl(), 0);
    }

    #[test]
    fn scroll_before_ready_is_inert() {
        let (mut controller, player) = controller_with_player();
        attach(&mut controller);

        let events = controller
            .handle_command(Command::ScrollOffset {
                x: 600.0,
                now: Instant::now(),
            })
            .expect("scroll should succeed");

        assert!(events.is_empty());
        assert!(player.seeks.lock().expect("lock seeks").is_empty());
    }

    #[test]
    fn scroll_maps_offset_to_time_and_seeks_with_zero_tolerance() {
        let (mut controller, player) = ready_controller(20, 40.0);

        // 20 cells x 106px = 2120px visible; half way = 20s.
        let events = controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: Instant::now(),
            })
            .expect("scroll should succeed");

        assert_eq!(
            events,
            vec![Event::SelectedTimeChanged {
                t_tl: seconds_to_ticks(20.0)
            }]
        );
        let seeks = player.seeks.lock().expect("lock seeks");
        assert_eq!(seeks.as_slice(), &[(seconds_to_ticks(20.0), 0, 0)]);
    }

    #[test]
    fn seeks_are_throttled_but_selected_time_tracks_latest_scroll() {
        let (mut controller, player) = ready_controller(20, 40.0);
        let start = Instant::now();

        controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: start,
            })
            .expect("first scroll should succeed");
        let events = controller
            .handle_command(Command::ScrollOffset {
                x: 1_166.0,
                now: start + Duration::from_millis(50),
            })
            .expect("second scroll should succeed");

        // The second sample is dropped by the throttle but still moves the
        // selected time.
        assert_eq!(
            events,
            vec![Event::SelectedTimeChanged {
                t_tl: seconds_to_ticks(22.0)
            }]
        );
        assert_eq!(controller.selected_time_tl(), seconds_to_ticks(22.0));

        let seeks = player.seeks.lock().expect("lock seeks");
        assert_eq!(seeks.len(), 1);
        assert_eq!(seeks[0].0, seconds_to_ticks(20.0));
    }

    #[test]
    fn guard_blocks_scrubbing_and_reports_once_per_event() {
        let (mut controller, player) = ready_controller(20, 40.0);
        controller
            .handle_command(Command::SetSelectionGuard { active: true })
            .expect("guard should succeed");

        let events = controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: Instant::now(),
            })
            .expect("scroll should succeed");

        assert_eq!(events, vec![Event::ScrubBlocked]);
        assert_eq!(controller.selected_time_tl(), 0);
        assert!(player.seeks.lock().expect("lock seeks").is_empty());
    }

    #[test]
    fn clearing_the_guard_restores_scrubbing() {
        let (mut controller, player) = ready_controller(20, 40.0);
        controller
            .handle_command(Command::SetSelectionGuard { active: true })
            .expect("guard on should succeed");
        controller
            .handle_command(Command::SetSelectionGuard { active: false })
            .expect("guard off should succeed");

        controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: Instant::now(),
            })
            .expect("scroll should succeed");

        assert_eq!(player.seeks.lock().expect("lock seeks").len(), 1);
    }

    #[test]
    fn repeated_offset_does_not_republish_selected_time() {
        let (mut controller, _player) = ready_controller(20, 40.0);
        let start = Instant::now();

        controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: start,
            })
            .expect("first scroll should succeed");
        let events = controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: start + Duration::from_millis(200),
            })
            .expect("second scroll should succeed");

        assert!(events.is_empty());
    }

    #[test]
    fn detach_resets_state_and_returns_to_idle() {
        let (mut controller, _player) = ready_controller(20, 40.0);
        controller
            .handle_command(Command::ScrollOffset {
                x: 1_060.0,
                now: Instant::now(),
            })
            .expect("scroll should succeed");

        let events = controller
            .handle_command(Command::Detach)
            .expect("detach should succeed");

        assert_eq!(events, vec![Event::PhaseChanged { phase: Phase::Idle }]);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.selected_time_tl(), 0);
        assert!(controller.snapshot().thumbnails.is_empty());
    }

    #[test]
    fn stale_load_after_detach_is_discarded() {
        let (mut controller, _player) = controller_with_player();
        let ticket = attach(&mut controller);
        controller
            .handle_command(Command::Detach)
            .expect("detach should succeed");

        let events = controller
            .handle_command(Command::LoadFinished {
                ticket,
                duration_tl: seconds_to_ticks(40.0),
                thumbnails: sample_thumbnails(20),
            })
            .expect("stale load must not fail");

        assert!(events.is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.snapshot().thumbnails.is_empty());
    }

    #[test]
    fn detach_in_idle_is_a_no_op() {
        let (mut controller, _player) = controller_with_player();

        let events = controller
            .handle_command(Command::Detach)
            .expect("detach should succeed");

        assert!(events.is_empty());
    }

    fn controller_with_player() -> (ScrubController<MockPlayer>, Arc<MockPlayer>) {
        let player = Arc::new(MockPlayer::default());
        let controller = ScrubController::new(Arc::clone(&player), ScrubConfig::default());
        (controller, player)
    }

    fn ready_controller(
        thumbnail_count: usize,
        duration_seconds: f64,
    ) -> (ScrubController<MockPlayer>, Arc<MockPlayer>) {
        let (mut controller, player) = controller_with_player();
        let ticket = attach(&mut controller);
        controller
            .handle_command(Command::LoadFinished {
                ticket,
                duration_tl: seconds_to_ticks(duration_seconds),
                thumbnails: sample_thumbnails(thumbnail_count),
            })
            .expect("load finished should succeed");
        (controller, player)
    }

    fn attach(controller: &mut ScrubController<MockPlayer>) -> u64 {
        let events = controller
            .handle_command(attach_command())
            .expect("attach should succeed");
        let Event::LoadRequested { ticket, .. } = &events[0] else {
            panic!("attach must request a load");
        };
        *ticket
    }

    fn attach_command() -> Command {
        Command::Attach {
            asset: PathBuf::from("demo.mp4"),
            layout: StripLayout {
                height: STRIP_HEIGHT,
            },
        }
    }

    fn sample_thumbnails(count: usize) -> Vec<Thumbnail> {
        (0..count)
            .map(|index| Thumbnail {
                index,
                timestamp_tl: index as i64 * 1_000_000,
                image: ThumbnailImage {
                    width: 106,
                    height: 60,
                    format: PixelFormat::Rgba8,
                    bytes: Arc::from(vec![0_u8; 106 * 60 * 4]),
                },
            })
            .collect()
    }

    #[derive(Default)]
    struct MockPlayer {
        attached: Mutex<Vec<PathBuf>>,
        seeks: Mutex<Vec<(i64, i64, i64)>>,
    }

    impl Player for MockPlayer {
        fn attach_asset(&self, asset: &std::path::Path) -> crate::Result<()> {
            self.attached
                .lock()
                .expect("lock attached")
                .push(asset.to_path_buf());
            Ok(())
        }

        fn detach_asset(&self) {
            self.attached.lock().expect("lock attached").clear();
        }

        fn current_asset_duration(&self) -> crate::Result<Option<i64>> {
            Ok(None)
        }

        fn seek(&self, to_tl: i64, tolerance_before_tl: i64, tolerance_after_tl: i64) {
            self.seeks
                .lock()
                .expect("lock seeks")
                .push((to_tl, tolerance_before_tl, tolerance_after_tl));
        }
    }
}
