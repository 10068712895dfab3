use std::{
    error::Error,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use tracing::trace;

use crate::{
    observer::Observer,
    subscription::subscribe::{
        Subscribeable, Subscriber, Subscription, SubscriptionHandle, UnsubscribeLogic,
        Unsubscribeable,
    },
};

/// A subject that remembers the latest emitted value and hands it to every new
/// subscriber before any live value.
///
/// The stored value is a single slot: each `next` overwrites it and is then
/// forwarded to all registered observers. Nothing is queued, so the emitter
/// never waits on slow observers.
///
/// Use [`emitter_receiver`] to obtain a [`BehaviorSubjectEmitter`] for
/// emitting values and a [`BehaviorSubjectReceiver`] for subscribing.
///
/// [`emitter_receiver`]: BehaviorSubject::emitter_receiver
///
/// ```no_run
/// use fibstream::subjects::BehaviorSubject;
/// use fibstream::subscribe::Subscriber;
/// use fibstream::{Observer, Subscribeable};
///
/// let (mut emitter, mut receiver) = BehaviorSubject::emitter_receiver();
///
/// emitter.next(2); // No subscribers yet, value is only stored.
///
/// // Receives 2 right away, then 3.
/// receiver.subscribe(Subscriber::on_next(|v: i64| println!("got {}", v)));
/// emitter.next(3);
/// ```
pub struct BehaviorSubject<T> {
    observers: Vec<(u64, Subscriber<T>)>,
    next_key: u64,
    completed: bool,
    closed: bool,
    error: Option<Arc<dyn Error + Send + Sync>>,
}

impl<T: Clone + Send + 'static> BehaviorSubject<T> {
    /// Creates an empty subject. Subscribers registered before the first
    /// emission receive only live values.
    pub fn emitter_receiver() -> (BehaviorSubjectEmitter<T>, BehaviorSubjectReceiver<T>) {
        Self::with_value(None)
    }

    /// Creates a subject seeded with `value`.
    pub fn emitter_receiver_with(
        value: T,
    ) -> (BehaviorSubjectEmitter<T>, BehaviorSubjectReceiver<T>) {
        Self::with_value(Some(value))
    }

    fn with_value(value: Option<T>) -> (BehaviorSubjectEmitter<T>, BehaviorSubjectReceiver<T>) {
        let s = Arc::new(Shared {
            subject: Mutex::new(BehaviorSubject {
                observers: Vec::with_capacity(16),
                next_key: 0,
                completed: false,
                closed: false,
                error: None,
            }),
            value: Mutex::new(value),
            observer_count: AtomicUsize::new(0),
        });

        (
            BehaviorSubjectEmitter(Arc::clone(&s)),
            BehaviorSubjectReceiver(s),
        )
    }
}

// The latest value and the observer count live outside the fan-out lock, so an
// observer may read them from inside its own `next` call.
struct Shared<T> {
    subject: Mutex<BehaviorSubject<T>>,
    value: Mutex<Option<T>>,
    observer_count: AtomicUsize,
}

impl<T> Shared<T> {
    fn subject(&self) -> Option<MutexGuard<'_, BehaviorSubject<T>>> {
        self.subject.lock().ok()
    }

    fn sync_count(&self, src: &BehaviorSubject<T>) {
        self.observer_count.store(src.observers.len(), Ordering::Release);
    }
}

impl<T: Clone> Shared<T> {
    fn latest(&self) -> Option<T> {
        self.value.lock().ok().and_then(|v| v.clone())
    }

    fn store(&self, v: T) {
        if let Ok(mut value) = self.value.lock() {
            *value = Some(v);
        }
    }
}

/// Subscription side of a [`BehaviorSubject`].
///
/// `unsubscribe` closes the whole subject: registered observers are dropped and
/// neither emissions nor new subscriptions are accepted afterwards.
#[derive(Clone)]
pub struct BehaviorSubjectReceiver<T>(Arc<Shared<T>>);

/// Emitting side of a [`BehaviorSubject`].
#[derive(Clone)]
pub struct BehaviorSubjectEmitter<T>(Arc<Shared<T>>);

impl<T: Clone> BehaviorSubjectReceiver<T> {
    /// Returns the number of registered observers.
    pub fn len(&self) -> usize {
        self.0.observer_count.load(Ordering::Acquire)
    }

    /// Returns `true` if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value currently held by the subject.
    pub fn latest(&self) -> Option<T> {
        self.0.latest()
    }

    /// Returns `true` once the subject was closed with `unsubscribe`.
    pub fn is_closed(&self) -> bool {
        self.0.subject().map_or(true, |src| src.closed)
    }
}

impl<T: Clone + Send + 'static> Subscribeable for BehaviorSubjectReceiver<T> {
    type ObsType = T;

    fn subscribe(&mut self, mut v: Subscriber<Self::ObsType>) -> Subscription {
        let key = if let Some(mut src) = self.0.subject() {
            // Closed subject neither emits nor registers.
            if src.closed {
                return Subscription::nil();
            }
            if src.completed {
                if let Some(err) = &src.error {
                    v.error(Arc::clone(err));
                } else {
                    v.complete();
                }
                return Subscription::nil();
            }
            // Replay the stored value before the subscriber joins the fan-out.
            if let Some(value) = self.0.latest() {
                v.next(value);
            }
            let key = src.next_key;
            src.next_key += 1;
            src.observers.push((key, v));
            self.0.sync_count(&src);
            key
        } else {
            return Subscription::nil();
        };

        let source_cloned = Arc::clone(&self.0);

        Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || {
                if let Some(mut src) = source_cloned.subject() {
                    src.observers.retain(|(k, _)| *k != key);
                    source_cloned.sync_count(&src);
                    trace!(key, remaining = src.observers.len(), "observer removed");
                }
            })),
            SubscriptionHandle::Nil,
        )
    }
}

impl<T> Unsubscribeable for BehaviorSubjectReceiver<T> {
    fn unsubscribe(self) {
        if let Some(mut r) = self.0.subject() {
            r.closed = true;
            r.observers.clear();
            self.0.sync_count(&r);
        }
    }
}

impl<T: Clone> Observer for BehaviorSubjectEmitter<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        if let Some(mut src) = self.0.subject() {
            if src.completed || src.closed {
                return;
            }
            self.0.store(v.clone());
            for (_, o) in &mut src.observers {
                o.next(v.clone());
            }
        }
    }

    fn error(&mut self, e: Arc<dyn Error + Send + Sync>) {
        if let Some(mut src) = self.0.subject() {
            if src.completed || src.closed {
                return;
            }
            for (_, o) in &mut src.observers {
                o.error(Arc::clone(&e));
            }
            src.completed = true;
            src.error = Some(e);
            src.observers.clear();
            self.0.sync_count(&src);
        }
    }

    fn complete(&mut self) {
        if let Some(mut src) = self.0.subject() {
            if src.completed || src.closed {
                return;
            }
            for (_, o) in &mut src.observers {
                o.complete();
            }
            src.completed = true;
            src.observers.clear();
            self.0.sync_count(&src);
        }
    }
}
