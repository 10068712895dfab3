use std::sync::Arc;

use tokio::sync::watch;

/// Single observable cell read by a display layer.
///
/// Holds only the current value; each [`set`](ValueHolder::set) replaces the
/// previous one. Clones share the same cell.
#[derive(Debug, Clone)]
pub struct ValueHolder<T> {
    cell: Arc<watch::Sender<Option<T>>>,
}

impl<T: Clone> ValueHolder<T> {
    #[must_use]
    pub fn new() -> Self {
        let (cell, _) = watch::channel(None);
        ValueHolder {
            cell: Arc::new(cell),
        }
    }

    /// Current value, `None` until the first emission.
    pub fn get(&self) -> Option<T> {
        self.cell.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.cell.send_replace(Some(value));
    }

    /// Receiver notified on every change, for hosts that render reactively.
    ///
    /// The value present at the time of the call counts as already seen.
    pub fn watch(&self) -> watch::Receiver<Option<T>> {
        self.cell.subscribe()
    }
}

impl<T: Clone> Default for ValueHolder<T> {
    fn default() -> Self {
        Self::new()
    }
}
