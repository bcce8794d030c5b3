use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Fixed-rate schedule anchored to absolute deadlines.
///
/// Each deadline is the previous one plus the interval, so time spent
/// handling a tick does not push later ticks back. While waiting, the
/// schedule sleeps in steps no longer than `granularity` and checks
/// cancellation between steps.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    next: Instant,
    interval: Duration,
    granularity: Duration,
}

impl TickSchedule {
    /// Schedule whose first tick is due immediately.
    pub fn new(interval: Duration, granularity: Duration) -> Self {
        Self::starting_at(Instant::now(), interval, granularity)
    }

    pub fn starting_at(start: Instant, interval: Duration, granularity: Duration) -> Self {
        Self {
            next: start,
            interval,
            granularity: granularity.max(Duration::from_millis(1)),
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next deadline and advance the schedule.
    ///
    /// Returns `false` if `cancel` fired before the deadline.
    pub async fn tick(&mut self, cancel: &CancellationToken) -> bool {
        loop {
            if cancel.is_cancelled() {
                return false;
            }

            let now = Instant::now();
            if now >= self.next {
                self.next += self.interval;
                return true;
            }

            let step = (self.next - now).min(self.granularity);
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = sleep(step) => {}
            }
        }
    }
}
