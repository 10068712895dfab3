use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, trace, warn};

use super::{Schedule, HOT_PERIOD};
use crate::{
    observable::Observable,
    observer::Observer,
    sequence::Fibonacci,
    subjects::{BehaviorSubject, BehaviorSubjectEmitter, BehaviorSubjectReceiver},
    subscription::{
        subscribe::{Subscribeable, Subscriber, Subscription, Unsubscribeable},
        Emissions, Notification,
    },
};

/// Observable lifecycle of a [`HotProducer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    NotStarted,
    Running,
    Stopped,
}

enum Lifecycle {
    NotStarted,
    Running(JoinHandle<()>),
    Stopped,
}

struct Shared {
    lifecycle: Mutex<Lifecycle>,
    emitter: BehaviorSubjectEmitter<i64>,
    receiver: BehaviorSubjectReceiver<i64>,
    schedule: Schedule,
}

/// Producer running a single shared sequence.
///
/// The sequence task starts on the first subscription and publishes into a
/// single-slot subject: every subscriber first receives the latest published
/// value, if there is one, and then live values. A subscriber that falls
/// behind only sees the newest value.
///
/// Clones share the same sequence. [`stop`](HotProducer::stop) is final: the
/// producer cannot be started again.
#[derive(Clone)]
pub struct HotProducer {
    shared: Arc<Shared>,
}

impl HotProducer {
    /// Producer emitting every [`HOT_PERIOD`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_schedule(Schedule::new(HOT_PERIOD))
    }

    #[must_use]
    pub fn with_schedule(schedule: Schedule) -> Self {
        let (emitter, receiver) = BehaviorSubject::emitter_receiver();
        HotProducer {
            shared: Arc::new(Shared {
                lifecycle: Mutex::new(Lifecycle::NotStarted),
                emitter,
                receiver,
                schedule,
            }),
        }
    }

    /// Attaches a new listener to the shared sequence and starts it if needed.
    ///
    /// The returned stream yields the latest published value first, when one
    /// exists. Once the producer is stopped the stream ends and yields nothing.
    ///
    /// # Panics
    ///
    /// The first subscription panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn subscribe(&self) -> Emissions<i64> {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let (tx_next, tx_error) = (Arc::clone(&tx), Arc::clone(&tx));

        let subscriber = Subscriber::new(
            move |v| {
                tx_next.send_replace(Some(Notification::Next(v)));
            },
            move |e| {
                tx_error.send_replace(Some(Notification::Error(e)));
            },
            move || {
                tx.send_replace(Some(Notification::Complete));
            },
        );

        Emissions::latest(rx, self.attach(subscriber))
    }

    /// Push-style access with the same replay behavior as
    /// [`subscribe`](HotProducer::subscribe).
    #[must_use]
    pub fn observable(&self) -> Observable<i64> {
        let producer = self.clone();
        Observable::new(move |subscriber| producer.attach(subscriber))
    }

    /// Cancels the sequence task and ends every subscription.
    ///
    /// Push subscribers receive `complete`. Values published before the stop
    /// but not yet read are discarded. Subscriptions made afterwards end
    /// immediately. Calling `stop` again has no effect.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lifecycle(), Lifecycle::Stopped);
        if let Lifecycle::Running(handle) = previous {
            handle.abort();
        }
        // Completion overwrites every subscriber's slot, so an unread value
        // cannot surface after the stop.
        self.shared.emitter.clone().complete();
        self.shared.receiver.clone().unsubscribe();
        debug!("hot producer stopped");
    }

    #[must_use]
    pub fn state(&self) -> ProducerState {
        match *self.lifecycle() {
            Lifecycle::NotStarted => ProducerState::NotStarted,
            Lifecycle::Running(_) => ProducerState::Running,
            Lifecycle::Stopped => ProducerState::Stopped,
        }
    }

    /// Number of listeners currently attached.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.receiver.len()
    }

    /// Most recently published value.
    #[must_use]
    pub fn latest(&self) -> Option<i64> {
        self.shared.receiver.latest()
    }

    fn attach(&self, subscriber: Subscriber<i64>) -> Subscription {
        // Registered before the start check so the first listener is in place
        // when the first value is published. The replay happens here, outside
        // the lifecycle lock, so a subscriber may query the producer from its
        // own callbacks.
        let subscription = self.shared.receiver.clone().subscribe(subscriber);

        // Start check and spawn under one guard: concurrent first subscribers
        // spawn exactly one sequence.
        let mut lifecycle = self.lifecycle();
        if let Lifecycle::NotStarted = *lifecycle {
            let handle = tokio::spawn(publish(
                self.shared.emitter.clone(),
                self.shared.schedule.clone(),
            ));
            *lifecycle = Lifecycle::Running(handle);
            debug!(period = ?self.shared.schedule.period(), "hot producer started");
        }
        subscription
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.shared
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HotProducer {
    fn default() -> Self {
        Self::new()
    }
}

async fn publish(mut emitter: BehaviorSubjectEmitter<i64>, schedule: Schedule) {
    let mut sequence = Fibonacci::new();

    loop {
        match sequence.advance() {
            Ok(v) => {
                trace!(value = v, step = sequence.step(), "hot value published");
                emitter.next(v);
            }
            Err(e) => {
                warn!(error = %e, "hot sequence ended");
                emitter.error(Arc::new(e));
                return;
            }
        }
        schedule.sleep().await;
    }
}
