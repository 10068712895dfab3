//! Provides structures and traits related to subscription management.
//!
//! This module includes `Subscriber` for handling observed values, errors and
//! completions, `Subscription` for controlling push-style subscriptions and
//! `Emissions`, the pull-style stream handle returned by producers.
mod emissions;
pub mod subscribe;

pub use emissions::Emissions;
pub(crate) use emissions::Notification;
