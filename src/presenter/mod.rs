//! Presentation object surfacing producer emissions to a display layer.

mod value_holder;

pub use value_holder::ValueHolder;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::{producers::ColdProducer, producers::HotProducer, subscription::Emissions};

/// Holds one cold and one hot producer and exposes their emissions through
/// [`ValueHolder`]s.
///
/// The cold producer is bound on construction. The hot producer is bound the
/// first time [`hot_value`](SequencePresenter::hot_value) is called, which is
/// also what starts it. Values are passed through unchanged.
///
/// Dropping the presenter cancels its bindings and so closes its
/// subscriptions.
pub struct SequencePresenter {
    cold: ColdProducer,
    hot: HotProducer,
    cold_value: ValueHolder<i64>,
    hot_value: Option<ValueHolder<i64>>,
    bindings: Vec<JoinHandle<()>>,
}

impl SequencePresenter {
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new(cold: ColdProducer, hot: HotProducer) -> Self {
        let cold_value = ValueHolder::new();
        let binding = bind(cold.subscribe(), cold_value.clone());

        SequencePresenter {
            cold,
            hot,
            cold_value,
            hot_value: None,
            bindings: vec![binding],
        }
    }

    /// Latest value of the presenter's cold subscription.
    pub fn cold_value(&self) -> &ValueHolder<i64> {
        &self.cold_value
    }

    /// Latest value of the hot producer, subscribing on first use.
    pub fn hot_value(&mut self) -> &ValueHolder<i64> {
        let hot = &self.hot;
        let bindings = &mut self.bindings;

        self.hot_value.get_or_insert_with(|| {
            let holder = ValueHolder::new();
            bindings.push(bind(hot.subscribe(), holder.clone()));
            holder
        })
    }

    pub fn cold_producer(&self) -> &ColdProducer {
        &self.cold
    }

    pub fn hot_producer(&self) -> &HotProducer {
        &self.hot
    }
}

impl Drop for SequencePresenter {
    fn drop(&mut self) {
        for binding in self.bindings.drain(..) {
            binding.abort();
        }
        debug!("presenter bindings cancelled");
    }
}

fn bind(mut emissions: Emissions<i64>, holder: ValueHolder<i64>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(v) = emissions.next().await {
            holder.set(v);
        }
    })
}
