use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::{Schedule, COLD_PERIOD};
use crate::{
    observable::Observable,
    observer::Observer,
    sequence::Fibonacci,
    subscription::{
        subscribe::{Subscription, SubscriptionHandle, UnsubscribeLogic},
        Emissions, Notification,
    },
};

/// Producer whose sequence restarts for every subscription.
///
/// Each call to [`subscribe`](ColdProducer::subscribe) spawns its own task with
/// its own sequence state, so subscriptions never influence each other. A value
/// is handed over through a single slot: while the subscriber has not taken the
/// previous value, the task waits.
///
/// ```no_run
/// use fibstream::producers::ColdProducer;
///
/// #[tokio::main]
/// async fn main() {
///     let producer = ColdProducer::new();
///     let mut emissions = producer.subscribe();
///
///     assert_eq!(emissions.next().await, Some(2));
///     assert_eq!(emissions.next().await, Some(3)); // two seconds later
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ColdProducer {
    schedule: Schedule,
    active: Arc<AtomicUsize>,
}

impl ColdProducer {
    /// Producer emitting every [`COLD_PERIOD`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_schedule(Schedule::new(COLD_PERIOD))
    }

    #[must_use]
    pub fn with_schedule(schedule: Schedule) -> Self {
        ColdProducer {
            schedule,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Starts a fresh sequence and returns its stream.
    ///
    /// The first value (2) is delivered right away, every following value one
    /// period after the previous one was handed over. Closing or dropping the
    /// returned [`Emissions`] ends the task behind it.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn subscribe(&self) -> Emissions<i64> {
        let (tx, rx) = mpsc::channel(1);
        let guard = ActiveGuard::enter(&self.active);
        let handle = tokio::spawn(generate(tx, self.schedule.clone(), guard));

        Emissions::queued(
            rx,
            Subscription::new(UnsubscribeLogic::Nil, SubscriptionHandle::JoinTask(handle)),
        )
    }

    /// Push-style access. Every subscribe starts a fresh sequence; unsubscribing
    /// ends it.
    ///
    /// # Panics
    ///
    /// Subscribing panics outside of a Tokio runtime.
    #[must_use]
    pub fn observable(&self) -> Observable<i64> {
        let producer = self.clone();

        Observable::new(move |mut subscriber| {
            let mut emissions = producer.subscribe();

            let join_handle = tokio::spawn(async move {
                while let Some(v) = emissions.next().await {
                    subscriber.next(v);
                }
                match emissions.error() {
                    Some(e) => subscriber.error(Arc::clone(e)),
                    None => subscriber.complete(),
                }
            });
            let abort_handle = join_handle.abort_handle();

            Subscription::new(
                // Aborting the forwarding task drops `emissions`, which closes
                // the sequence task as well.
                UnsubscribeLogic::Logic(Box::new(move || abort_handle.abort())),
                SubscriptionHandle::JoinTask(join_handle),
            )
        })
    }

    /// Number of sequence tasks currently running for this producer.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

impl Default for ColdProducer {
    fn default() -> Self {
        Self::new()
    }
}

// Counts a running sequence task for as long as it lives, including when it is
// aborted.
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        ActiveGuard(Arc::clone(active))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn generate(
    tx: mpsc::Sender<Notification<i64>>,
    schedule: Schedule,
    _guard: ActiveGuard,
) {
    let mut sequence = Fibonacci::new();
    debug!("cold sequence started");

    loop {
        let notification = match sequence.advance() {
            Ok(v) => Notification::Next(v),
            Err(e) => {
                warn!(error = %e, "cold sequence ended");
                Notification::Error(Arc::new(e))
            }
        };
        let last = matches!(notification, Notification::Error(_));

        if tx.is_closed() {
            debug!(step = sequence.step(), "cold subscription closed");
            return;
        }
        if tx.send(notification).await.is_err() {
            debug!(step = sequence.step(), "cold subscription closed while sending");
            return;
        }
        if last {
            return;
        }
        trace!(step = sequence.step(), "cold value delivered");

        tokio::select! {
            () = tx.closed() => {
                debug!(step = sequence.step(), "cold subscription closed while waiting");
                return;
            }
            () = schedule.sleep() => {}
        }
    }
}
