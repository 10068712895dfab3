//! Subjects act both as observers and as observables: values pushed into the
//! emitter are multicast to every subscriber of the receiver.
//!
//! `BehaviorSubject` is the single-slot broadcast primitive behind the hot
//! producer. It keeps only the latest value and replays it to newcomers.

mod behavior_subject;

pub use behavior_subject::*;
