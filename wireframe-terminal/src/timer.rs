/// Frame pacing for the terminal event loop
use std::time::{Duration, Instant};
use wireframe_core::FrameTimer;

/// Holds at most one deadline; the event loop polls it instead of sleeping
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    next_id: u64,
    pending: Option<(u64, Instant)>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the pending frame is due, if one is scheduled
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    /// Time left until the pending frame, or `idle` when nothing is scheduled
    pub fn time_left(&self, now: Instant, idle: Duration) -> Duration {
        self.deadline()
            .map_or(idle, |at| at.saturating_duration_since(now))
    }

    /// Consume the pending frame if it is due at `now`
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some((_, at)) if at <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl FrameTimer for DeadlineTimer {
    type Handle = u64;

    fn schedule(&mut self, delay: Duration) -> u64 {
        self.next_id += 1;
        self.pending = Some((self.next_id, Instant::now() + delay));
        self.next_id
    }

    fn cancel(&mut self, handle: u64) {
        if matches!(self.pending, Some((id, _)) if id == handle) {
            self.pending = None;
        }
    }
}
