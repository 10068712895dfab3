use std::{error::Error, sync::Arc};

use tokio::task::JoinHandle;

use crate::{errors::SubscriptionError, observer::Observer};

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values emitted by a stream.
pub trait Subscribeable {
    /// The type of items emitted by the stream.
    type ObsType;

    /// Subscribes to the stream and specifies how to handle emitted values.
    ///
    /// The returned `Subscription` lets the caller stop receiving values or
    /// await the task that drives the stream.
    fn subscribe(&mut self, s: Subscriber<Self::ObsType>) -> Subscription;
}

/// A trait for types that can be unsubscribed, releasing whatever keeps the
/// emissions going.
pub trait Unsubscribeable {
    /// Unsubscribes and releases associated resources. The value is consumed.
    fn unsubscribe(self);
}

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type CompleteFn = Box<dyn FnMut() + Send + Sync>;
type ErrorFn = Box<dyn FnMut(Arc<dyn Error + Send + Sync>) + Send + Sync>;

/// A type that acts as an observer, letting users handle emitted values, errors
/// and completion when subscribing to an `Observable` or a subject.
///
/// After `error` or `complete` has been delivered, the `Subscriber` ignores
/// every later call.
pub struct Subscriber<NextFnType> {
    next_fn: NextFn<NextFnType>,
    complete_fn: Option<CompleteFn>,
    error_fn: Option<ErrorFn>,
    completed: bool,
    errored: bool,
}

impl<NextFnType> Subscriber<NextFnType> {
    /// Creates a new `Subscriber` with handlers for emitted values, errors and
    /// completion.
    pub fn new(
        next_fn: impl FnMut(NextFnType) + 'static + Send,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) + 'static + Send + Sync,
        complete_fn: impl FnMut() + 'static + Send + Sync,
    ) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: Some(Box::new(complete_fn)),
            error_fn: Some(Box::new(error_fn)),
            completed: false,
            errored: false,
        }
    }

    /// Create a new Subscriber with only the `next` function.
    pub fn on_next(next_fn: impl FnMut(NextFnType) + 'static + Send) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: None,
            error_fn: None,
            completed: false,
            errored: false,
        }
    }

    /// Set the completion function for the Subscriber.
    pub fn on_complete(&mut self, complete_fn: impl FnMut() + 'static + Send + Sync) {
        self.complete_fn = Some(Box::new(complete_fn));
    }

    /// Set the error-handling function for the Subscriber.
    pub fn on_error(
        &mut self,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) + 'static + Send + Sync,
    ) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// Returns `true` once `error` or `complete` has been delivered.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.completed || self.errored
    }
}

impl<T> Observer for Subscriber<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        if self.is_stopped() {
            return;
        }
        (self.next_fn)(v);
    }

    fn complete(&mut self) {
        if self.is_stopped() {
            return;
        }
        self.completed = true;
        if let Some(cfn) = &mut self.complete_fn {
            (cfn)();
        }
    }

    fn error(&mut self, observable_error: Arc<dyn Error + Send + Sync>) {
        if self.is_stopped() {
            return;
        }
        self.errored = true;
        if let Some(efn) = &mut self.error_fn {
            (efn)(observable_error);
        }
    }
}

/// Handle used by a `Subscription` to await the task that drives it.
pub enum SubscriptionHandle {
    /// Nothing to await.
    Nil,

    /// Join handle of the Tokio task emitting into the subscription.
    JoinTask(JoinHandle<()>),
}

/// Represents a subscription to an observable or a subject.
///
/// It can be used to stop emissions with `unsubscribe` or to await the task
/// behind an asynchronous stream with `join_concurrent`.
pub struct Subscription {
    pub(crate) unsubscribe_logic: UnsubscribeLogic,
    pub(crate) subscription_future: SubscriptionHandle,
}

impl Subscription {
    /// Creates a new Subscription with the specified unsubscribe logic and
    /// subscription handle.
    #[must_use]
    pub fn new(
        unsubscribe_logic: UnsubscribeLogic,
        subscription_future: SubscriptionHandle,
    ) -> Self {
        Subscription {
            unsubscribe_logic,
            subscription_future,
        }
    }

    /// Subscription that can neither be unsubscribed nor awaited.
    #[must_use]
    pub fn nil() -> Self {
        Subscription::new(UnsubscribeLogic::Nil, SubscriptionHandle::Nil)
    }

    /// Awaits the Tokio task associated with this subscription.
    ///
    /// A task cancelled by unsubscribing or by stopping its producer counts as
    /// finished.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::Panicked`] if the task panicked.
    pub async fn join_concurrent(self) -> Result<(), SubscriptionError> {
        match self.subscription_future {
            SubscriptionHandle::JoinTask(task_handle) => match task_handle.await {
                Ok(()) => Ok(()),
                Err(e) if e.is_cancelled() => Ok(()),
                Err(e) => Err(SubscriptionError::Panicked(e)),
            },
            SubscriptionHandle::Nil => Ok(()),
        }
    }
}

impl Unsubscribeable for Subscription {
    fn unsubscribe(self) {
        self.unsubscribe_logic.unsubscribe();
    }
}

/// Enumerates various unsubscribe logic options for a subscription.
pub enum UnsubscribeLogic {
    /// No specific unsubscribe logic.
    Nil,

    /// If one subscription depends on another. Wrapped subscription's unsubscribe
    /// will be called upon unsubscribing.
    Wrapped(Box<Subscription>),

    /// Unsubscribe logic defined by a function.
    Logic(Box<dyn FnOnce() + Send>),
}

impl UnsubscribeLogic {
    fn unsubscribe(self) {
        match self {
            UnsubscribeLogic::Nil => (),
            UnsubscribeLogic::Logic(fnc) => fnc(),
            UnsubscribeLogic::Wrapped(subscription) => subscription.unsubscribe(),
        }
    }
}
