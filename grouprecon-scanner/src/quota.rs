use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Self-imposed request budget per time window.
///
/// The archive provider documents a hard hourly limit; we stop short of it and
/// sleep out the remainder of the window instead of waiting for a 429.
#[derive(Debug)]
pub struct HourlyQuota {
    ceiling: u32,
    window: Duration,
    used: u32,
    window_start: Instant,
}

impl HourlyQuota {
    pub fn new(ceiling: u32, window: Duration) -> Self {
        Self {
            ceiling: ceiling.max(1),
            window,
            used: 0,
            window_start: Instant::now(),
        }
    }

    /// Waits until another request fits in the budget, then counts it.
    pub async fn admit(&mut self) {
        if self.used >= self.ceiling {
            let elapsed = self.window_start.elapsed();
            if elapsed < self.window {
                let wait = self.window - elapsed;
                warn!(
                    "Reached request ceiling ({} per {:?}). Waiting {:?} before continuing",
                    self.ceiling, self.window, wait
                );
                sleep(wait).await;
            }
            debug!("Quota window reset");
            self.used = 0;
            self.window_start = Instant::now();
        }
        self.used += 1;
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }
}
