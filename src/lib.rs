//! `fibstream` produces the Fibonacci sequence (2, 3, 5, 8, ...) on a fixed
//! period and shares it with any number of consumers, in two styles:
//!
//! - [`ColdProducer`](producers::ColdProducer): every subscription gets its own,
//!   freshly started sequence.
//! - [`HotProducer`](producers::HotProducer): one sequence runs for everybody;
//!   newcomers first receive the latest value, then live values.
//!
//! Both producers hand out pull-style [`Emissions`] streams from `subscribe()`
//! and push-style [`Observable`]s from `observable()`. The push side follows the
//! usual observer vocabulary: a [`Subscriber`](subscribe::Subscriber) receives
//! `next`, `error` and `complete` calls and a
//! [`Subscription`](subscribe::Subscription) stops them.
//!
//! [`SequencePresenter`](presenter::SequencePresenter) binds the producers to
//! [`ValueHolder`](presenter::ValueHolder) cells for a display layer.
//!
//! Delays are measured by a [`Clock`](clock::Clock). Tests use
//! [`ManualClock`](clock::ManualClock) to release one emission at a time.
//!
//! # Example
//!
//! ```no_run
//! use fibstream::producers::HotProducer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let producer = HotProducer::new();
//!
//!     let mut first = producer.subscribe();
//!     assert_eq!(first.next().await, Some(2));
//!
//!     // Joins late: receives the latest value, then live ones.
//!     let mut second = producer.subscribe();
//!     assert_eq!(second.next().await, Some(2));
//!
//!     producer.stop();
//!     assert_eq!(first.next().await, None);
//! }
//! ```

pub mod clock;
mod errors;
mod observable;
mod observer;
pub mod presenter;
pub mod producers;
mod sequence;
pub mod subjects;
mod subscription;

pub use errors::{SequenceError, SubscriptionError};
pub use observable::Observable;
pub use observer::Observer;
pub use sequence::Fibonacci;
pub use subscription::subscribe;
pub use subscription::subscribe::{Subscribeable, Unsubscribeable};
pub use subscription::Emissions;
