use thiserror::Error;
use tokio::task::JoinError;

/// Errors produced while advancing a Fibonacci sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The next term does not fit into an `i64`. `step` is the 1-based index of
    /// the term that could not be produced.
    #[error("sequence overflowed i64 at step {step}")]
    Overflow { step: u64 },
}

/// Errors returned when awaiting the task behind a `Subscription`.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("subscription task panicked")]
    Panicked(#[source] JoinError),
}
