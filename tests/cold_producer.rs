mod register_emissions;

use std::time::Duration;

use fibstream::clock::ManualClock;
use fibstream::producers::{ColdProducer, Schedule, COLD_PERIOD};
use fibstream::{Subscribeable, Unsubscribeable};
use register_emissions::{init_tracing, Emitted};
use tokio::time::sleep;

fn manual_producer() -> (ColdProducer, ManualClock) {
    let clock = ManualClock::new();
    let producer =
        ColdProducer::with_schedule(Schedule::new(COLD_PERIOD).with_clock(clock.clone()));
    (producer, clock)
}

async fn wait_for_idle(producer: &ColdProducer) {
    for _ in 0..100 {
        if producer.active_subscriptions() == 0 {
            return;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn cold_subscription_reads_two_then_three() {
    init_tracing();
    let (producer, clock) = manual_producer();

    let mut emissions = producer.subscribe();
    assert_eq!(emissions.next().await, Some(2));

    clock.tick();
    assert_eq!(emissions.next().await, Some(3));

    clock.tick();
    assert_eq!(emissions.next().await, Some(5));
}

#[tokio::test(start_paused = true)]
async fn cold_value_waits_one_period() {
    let producer = ColdProducer::new();
    let start = tokio::time::Instant::now();

    let mut emissions = producer.subscribe();
    assert_eq!(emissions.next().await, Some(2));
    assert_eq!(start.elapsed(), Duration::ZERO);

    assert_eq!(emissions.next().await, Some(3));
    assert!(start.elapsed() >= COLD_PERIOD);
    assert!(start.elapsed() < COLD_PERIOD + Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn cold_subscriptions_restart_sequence() {
    let producer = ColdProducer::new();

    let mut first = producer.subscribe();
    assert_eq!(first.next().await, Some(2));
    assert_eq!(first.next().await, Some(3));

    sleep(Duration::from_secs(10)).await;

    // Joining later still starts from the beginning.
    let mut second = producer.subscribe();
    assert_eq!(second.next().await, Some(2));
    assert_eq!(second.next().await, Some(3));
    assert_eq!(second.next().await, Some(5));

    // The first subscription was held back by its full slot, nothing skipped.
    assert_eq!(first.next().await, Some(5));
    assert_eq!(first.next().await, Some(8));

    assert_eq!(producer.active_subscriptions(), 2);
}

#[tokio::test]
async fn closing_stops_the_sequence_task() {
    let (producer, clock) = manual_producer();

    let mut emissions = producer.subscribe();
    assert_eq!(emissions.next().await, Some(2));
    assert_eq!(producer.active_subscriptions(), 1);

    emissions.close();
    assert!(emissions.is_closed());

    wait_for_idle(&producer).await;
    assert_eq!(producer.active_subscriptions(), 0);

    clock.advance(3);
    assert_eq!(emissions.next().await, None);
    assert!(emissions.error().is_none());
}

#[tokio::test]
async fn dropping_emissions_stops_the_sequence_task() {
    let (producer, _clock) = manual_producer();

    let mut kept = producer.subscribe();
    let mut dropped = producer.subscribe();
    assert_eq!(kept.next().await, Some(2));
    assert_eq!(dropped.next().await, Some(2));
    assert_eq!(producer.active_subscriptions(), 2);

    drop(dropped);

    for _ in 0..100 {
        if producer.active_subscriptions() == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(producer.active_subscriptions(), 1);
}

#[tokio::test(start_paused = true)]
async fn cold_sequence_ends_with_overflow_error() {
    let producer = ColdProducer::new();
    let mut emissions = producer.subscribe();

    let mut count = 0;
    let mut last = 0;
    while let Some(v) = emissions.next().await {
        assert!(v > last);
        last = v;
        count += 1;
    }

    assert_eq!(count, 90);
    assert_eq!(last, 7_540_113_804_746_346_429);
    assert_eq!(
        emissions.error().map(ToString::to_string),
        Some("sequence overflowed i64 at step 91".to_string())
    );
    assert_eq!(emissions.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn cold_observable_pushes_fresh_sequence() {
    let producer = ColdProducer::new();
    let emitted = Emitted::default();

    let subscription = producer.observable().subscribe(emitted.subscriber());

    sleep(Duration::from_secs(5)).await;
    assert_eq!(emitted.nexts(), vec![2, 3, 5]);

    subscription.unsubscribe();
    sleep(Duration::from_secs(10)).await;

    assert_eq!(emitted.nexts(), vec![2, 3, 5]);
    assert_eq!(emitted.completes(), 0);
    assert_eq!(producer.active_subscriptions(), 0);
}

#[tokio::test(start_paused = true)]
async fn cold_observable_reports_overflow() {
    let producer = ColdProducer::new();
    let emitted = Emitted::default();

    let subscription = producer.observable().subscribe(emitted.subscriber());
    assert!(subscription.join_concurrent().await.is_ok());

    assert_eq!(emitted.nexts().len(), 90);
    assert_eq!(emitted.errors(), vec!["sequence overflowed i64 at step 91".to_string()]);
    assert_eq!(emitted.completes(), 0);
}
