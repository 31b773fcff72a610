use std::future::Future;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// 5 probes per second.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(200);

/// Gate consulted before every outbound probe.
///
/// One throttle is shared by the whole run, so the rate is global rather
/// than per domain.
pub trait Throttle {
    fn acquire(&mut self) -> impl Future<Output = ()> + Send;
}

/// Admits one caller per period. The first acquire returns immediately.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct IntervalThrottle {
    interval: Interval,
}

impl IntervalThrottle {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

impl Default for IntervalThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_INTERVAL)
    }
}

impl Throttle for IntervalThrottle {
    async fn acquire(&mut self) {
        self.interval.tick().await;
    }
}

/// Admits everything immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

impl Throttle for Unthrottled {
    async fn acquire(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_interval_spaces_acquisitions() {
        let mut throttle = IntervalThrottle::default();
        let start = Instant::now();

        throttle.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        throttle.acquire().await;
        throttle.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_callers_are_not_delayed_further() {
        let mut throttle = IntervalThrottle::new(Duration::from_millis(200));
        throttle.acquire().await;

        tokio::time::advance(Duration::from_millis(500)).await;
        let before = Instant::now();
        throttle.acquire().await;

        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let throttle = IntervalThrottle::new(Duration::ZERO);
        assert_eq!(throttle.period(), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unthrottled_never_waits() {
        let mut throttle = Unthrottled;
        let start = Instant::now();
        for _ in 0..100 {
            throttle.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
