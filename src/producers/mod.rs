//! Periodic Fibonacci producers.
//!
//! [`ColdProducer`] restarts the sequence for every subscription.
//! [`HotProducer`] runs one shared sequence and replays its latest value to
//! newcomers.

mod cold;
mod hot;

use std::{fmt, sync::Arc, time::Duration};

pub use cold::ColdProducer;
pub use hot::{HotProducer, ProducerState};

use crate::clock::{Clock, Sleep, TokioClock};

/// Default delay between two emissions of a [`ColdProducer`].
pub const COLD_PERIOD: Duration = Duration::from_secs(2);

/// Default delay between two emissions of a [`HotProducer`].
pub const HOT_PERIOD: Duration = Duration::from_secs(3);

/// Emission period of a producer together with the clock that measures it.
#[derive(Clone)]
pub struct Schedule {
    period: Duration,
    clock: Arc<dyn Clock>,
}

impl Schedule {
    /// Schedule measured by the Tokio timer.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Schedule {
            period,
            clock: Arc::new(TokioClock),
        }
    }

    /// Replaces the clock, e.g. with a [`ManualClock`](crate::clock::ManualClock)
    /// in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub(crate) fn sleep(&self) -> Sleep {
        self.clock.sleep(self.period)
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}
