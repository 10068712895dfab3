use std::{error::Error, sync::Arc};

use tokio::sync::{mpsc, watch};

use super::subscribe::{Subscription, Unsubscribeable};

/// A single message travelling from a producer to one subscription.
#[derive(Clone)]
pub(crate) enum Notification<T> {
    Next(T),
    Error(Arc<dyn Error + Send + Sync>),
    Complete,
}

enum Source<T> {
    /// Bounded hand-off. The producer waits while the slot is occupied.
    Queued(mpsc::Receiver<Notification<T>>),
    /// Overwritten slot. Only the newest notification is kept.
    Latest(watch::Receiver<Option<Notification<T>>>),
}

/// Pull-style handle to one subscription of a producer.
///
/// Values are read with [`next`](Emissions::next). The stream ends (`None`)
/// when it is closed, when its producer completes, errors or is stopped.
/// Dropping the handle closes the subscription.
pub struct Emissions<T> {
    source: Source<T>,
    subscription: Option<Subscription>,
    error: Option<Arc<dyn Error + Send + Sync>>,
    done: bool,
}

impl<T: Clone> Emissions<T> {
    pub(crate) fn queued(
        receiver: mpsc::Receiver<Notification<T>>,
        subscription: Subscription,
    ) -> Self {
        Emissions {
            source: Source::Queued(receiver),
            subscription: Some(subscription),
            error: None,
            done: false,
        }
    }

    pub(crate) fn latest(
        receiver: watch::Receiver<Option<Notification<T>>>,
        subscription: Subscription,
    ) -> Self {
        Emissions {
            source: Source::Latest(receiver),
            subscription: Some(subscription),
            error: None,
            done: false,
        }
    }

    /// Waits for the next value.
    ///
    /// Returns `None` once the stream has ended; every later call returns
    /// `None` as well.
    pub async fn next(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        let notification = match &mut self.source {
            Source::Queued(rx) => rx.recv().await,
            Source::Latest(rx) => {
                if rx.changed().await.is_err() {
                    None
                } else {
                    let slot = rx.borrow_and_update();
                    slot.clone()
                }
            }
        };

        match notification {
            Some(Notification::Next(v)) => Some(v),
            Some(Notification::Error(e)) => {
                self.error = Some(e);
                self.finish();
                None
            }
            Some(Notification::Complete) | None => {
                self.finish();
                None
            }
        }
    }

    /// Error the stream ended with, if any.
    pub fn error(&self) -> Option<&Arc<dyn Error + Send + Sync>> {
        self.error.as_ref()
    }

    /// Returns `true` once the stream has ended or was closed.
    pub fn is_closed(&self) -> bool {
        self.done
    }

    /// Closes the subscription. No value is delivered afterwards.
    pub fn close(&mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.done = true;
        if let Source::Queued(rx) = &mut self.source {
            rx.close();
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl<T> Drop for Emissions<T> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
