//! Time sources used by producers between emissions.
//!
//! Producers never call `tokio::time` directly. They ask a [`Clock`] for a
//! delay, which lets tests swap in a [`ManualClock`] and release emissions one
//! at a time.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio::sync::Semaphore;

/// Boxed delay future returned by a [`Clock`].
pub type Sleep = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A source of delays between two emissions.
pub trait Clock: Send + Sync {
    /// Returns a future that resolves once `period` has elapsed according to
    /// this clock.
    fn sleep(&self, period: Duration) -> Sleep;
}

/// Clock backed by the Tokio timer.
///
/// Works with paused time (`tokio::time::pause`) as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, period: Duration) -> Sleep {
        Box::pin(tokio::time::sleep(period))
    }
}

/// Clock that only moves when told to.
///
/// Every call to [`advance`](ManualClock::advance) releases that many pending
/// delays, regardless of their period. Releases issued while nothing waits are
/// kept and consumed by the next delays.
#[derive(Debug, Clone)]
pub struct ManualClock {
    permits: Arc<Semaphore>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        ManualClock {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Releases `ticks` pending delays.
    ///
    /// Banked releases are capped at [`Semaphore::MAX_PERMITS`]; anything above
    /// the cap is dropped.
    pub fn advance(&self, ticks: usize) {
        let room = Semaphore::MAX_PERMITS.saturating_sub(self.permits.available_permits());
        self.permits.add_permits(ticks.min(room));
    }

    /// Releases exactly one pending delay.
    pub fn tick(&self) {
        self.advance(1);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, _period: Duration) -> Sleep {
        let permits = Arc::clone(&self.permits);
        Box::pin(async move {
            // Acquire only fails on a closed semaphore, and this one never closes.
            if let Ok(permit) = permits.acquire().await {
                permit.forget();
            }
        })
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::{Clock, ManualClock, TokioClock};

    #[tokio::test]
    async fn manual_clock_waits_for_tick() {
        let clock = ManualClock::new();

        let pending = timeout(Duration::from_millis(20), clock.sleep(Duration::ZERO)).await;
        assert!(pending.is_err());

        clock.tick();
        let released = timeout(Duration::from_millis(20), clock.sleep(Duration::ZERO)).await;
        assert!(released.is_ok());
    }

    #[tokio::test]
    async fn manual_clock_keeps_early_ticks() {
        let clock = ManualClock::new();
        clock.advance(2);

        clock.sleep(Duration::from_secs(100)).await;
        clock.sleep(Duration::from_secs(100)).await;

        let pending = timeout(Duration::from_millis(20), clock.sleep(Duration::ZERO)).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn manual_clock_caps_banked_ticks() {
        let clock = ManualClock::new();
        clock.advance(usize::MAX);
        clock.advance(usize::MAX);

        let released = timeout(Duration::from_millis(20), clock.sleep(Duration::ZERO)).await;
        assert!(released.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_time() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_secs(3)).await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
