mod register_emissions;

use std::sync::Arc;

use fibstream::subjects::BehaviorSubject;
use fibstream::subscribe::Subscriber;
use fibstream::{Observer, SequenceError, Subscribeable, Unsubscribeable};
use register_emissions::Emitted;

#[test]
fn behavior_subject_replays_latest_then_live() {
    let early = Emitted::default();
    let late = Emitted::default();
    let (mut stx, mut srx) = BehaviorSubject::emitter_receiver();

    // Registering before any emission: nothing to replay.
    srx.subscribe(early.subscriber());
    assert_eq!(srx.len(), 1);
    assert!(early.nexts().is_empty());

    stx.next(2);
    stx.next(3);
    stx.next(5);

    assert_eq!(early.nexts(), vec![2, 3, 5]);
    assert_eq!(srx.latest(), Some(5));

    // Late subscriber gets only the latest value, then live ones.
    srx.subscribe(late.subscriber());
    assert_eq!(late.nexts(), vec![5]);

    stx.next(8);

    assert_eq!(srx.len(), 2);
    assert_eq!(early.nexts(), vec![2, 3, 5, 8]);
    assert_eq!(late.nexts(), vec![5, 8]);
}

#[test]
fn behavior_subject_seeded_value_is_replayed() {
    let emitted = Emitted::default();
    let (_stx, mut srx) = BehaviorSubject::emitter_receiver_with(1);

    srx.subscribe(emitted.subscriber());

    assert_eq!(emitted.nexts(), vec![1]);
}

#[test]
fn behavior_subject_emit_than_complete() {
    let x = Emitted::default();
    let y = Emitted::default();
    let (mut stx, mut srx) = BehaviorSubject::emitter_receiver();

    srx.subscribe(x.subscriber());
    stx.next(2);

    // Completing the BehaviorSubject.
    stx.complete();

    assert_eq!(srx.len(), 0);
    assert_eq!(x.nexts(), vec![2]);
    assert_eq!(x.completes(), 1);

    // Subscribing after completion completes right away, nothing is emitted.
    srx.subscribe(y.subscriber());
    stx.next(3);

    assert_eq!(srx.len(), 0);
    assert!(y.nexts().is_empty());
    assert_eq!(y.completes(), 1);
    assert_eq!(x.nexts(), vec![2]);
}

#[test]
fn behavior_subject_emit_than_error() {
    let x = Emitted::default();
    let y = Emitted::default();
    let (mut stx, mut srx) = BehaviorSubject::emitter_receiver();

    srx.subscribe(x.subscriber());
    stx.next(2);

    // Trigger an error on the BehaviorSubject.
    stx.error(Arc::new(SequenceError::Overflow { step: 91 }));

    assert_eq!(srx.len(), 0);
    assert_eq!(x.errors(), vec!["sequence overflowed i64 at step 91".to_string()]);

    // After the error, new subscribers receive the stored error only.
    srx.subscribe(y.subscriber());
    stx.next(3);

    assert!(y.nexts().is_empty());
    assert_eq!(y.errors().len(), 1);
    assert_eq!(y.completes(), 0);
}

#[test]
fn behavior_subject_unsubscribe_removes_single_observer() {
    let x = Emitted::default();
    let y = Emitted::default();
    let (mut stx, mut srx) = BehaviorSubject::emitter_receiver();

    let x_subscription = srx.subscribe(x.subscriber());
    srx.subscribe(y.subscriber());
    stx.next(2);

    x_subscription.unsubscribe();
    assert_eq!(srx.len(), 1);

    stx.next(3);

    assert_eq!(x.nexts(), vec![2]);
    assert_eq!(y.nexts(), vec![2, 3]);
}

#[test]
fn behavior_subject_closed_receiver_ignores_everything() {
    let x = Emitted::default();
    let y = Emitted::default();
    let (mut stx, mut srx) = BehaviorSubject::emitter_receiver();

    srx.subscribe(x.subscriber());
    stx.next(2);

    srx.clone().unsubscribe();
    assert!(srx.is_closed());
    assert!(srx.is_empty());

    stx.next(3);
    srx.subscribe(y.subscriber());

    assert_eq!(x.nexts(), vec![2]);
    assert!(y.nexts().is_empty());
    assert_eq!(y.completes(), 0);
    assert_eq!(srx.latest(), Some(2));
}

#[test]
fn observer_reads_subject_from_inside_next() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let (mut stx, mut srx) = BehaviorSubject::emitter_receiver_with(2);

    let reader = srx.clone();
    let seen_c = Arc::clone(&seen);
    srx.subscribe(Subscriber::on_next(move |v: i64| {
        seen_c.lock().unwrap().push((v, reader.latest(), reader.len()));
    }));
    stx.next(3);

    // The replay runs before the observer is registered.
    assert_eq!(*seen.lock().unwrap(), vec![(2, Some(2), 0), (3, Some(3), 1)]);
}
