use std::time::{Duration, Instant};

/// Seek request the controller forwards to the player collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekCommand {
    pub to_tl: i64,
}

/// Lossy leading-edge rate limiter for outgoing seeks.
///
/// Candidates arriving inside the throttle window are dropped, not queued;
/// only a sample landing after the window re-opens is forwarded. There is
/// deliberately no trailing-edge flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekThrottle {
    min_interval: Duration,
    last_seek: Option<Instant>,
}

impl SeekThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_seek: None,
        }
    }

    /// Emits a seek command for `candidate_tl` when the throttle window is
    /// open, recording `now` as the new window start; otherwise drops the
    /// candidate and returns `None`.
    pub fn maybe_seek(&mut self, candidate_tl: i64, now: Instant) -> Option<SeekCommand> {
        if let Some(last) = self.last_seek {
            if now.saturating_duration_since(last) <= self.min_interval {
                return None;
            }
        }

        self.last_seek = Some(now);
        Some(SeekCommand { to_tl: candidate_tl })
    }

    /// Forgets the last seek instant so the next candidate passes.
    pub fn reset(&mut self) {
        self.last_seek = None;
    }
}
