//! The `observable` module provides the push-style entry point to producers.

use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};

/// The `Observable` struct represents a source of values that can be observed.
///
/// It wraps the function that runs for every new `Subscriber`. Producers build
/// their observables with it: a cold producer starts a fresh sequence inside
/// that function, a hot producer attaches the subscriber to its shared subject.
///
/// ```no_run
/// use fibstream::subscribe::{Subscriber, Subscription};
/// use fibstream::{Observable, Observer, Subscribeable};
///
/// let mut first_three = Observable::new(|mut subscriber: Subscriber<i64>| {
///     for v in [2, 3, 5] {
///         subscriber.next(v);
///     }
///     subscriber.complete();
///     Subscription::nil()
/// });
///
/// first_three.subscribe(Subscriber::on_next(|v: i64| println!("Emitted {}", v)));
/// ```
pub struct Observable<T> {
    subscribe_fn: Box<dyn FnMut(Subscriber<T>) -> Subscription + Send + Sync>,
}

impl<T: 'static> Observable<T> {
    /// Creates a new `Observable` from the function run on every subscribe.
    pub fn new(sf: impl FnMut(Subscriber<T>) -> Subscription + Send + Sync + 'static) -> Self {
        Observable {
            subscribe_fn: Box::new(sf),
        }
    }
}

impl<T> Subscribeable for Observable<T> {
    type ObsType = T;

    fn subscribe(&mut self, v: Subscriber<Self::ObsType>) -> Subscription {
        (self.subscribe_fn)(v)
    }
}
