// ABOUTME: Criterion benchmarks for the booking workflow machine and the single-flight guard
// ABOUTME: Measures step walks, stale-result discards, refresh joins and listing decodes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Criterion benchmarks for the booking workflow.
//!
//! The machine runs once per user interaction, so these mostly guard
//! against accidental quadratic behaviour in constraint bookkeeping.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::collections::BTreeSet;
use std::sync::Arc;

use booking_client::client::SingleFlight;
use booking_client::workflow::BookingWorkflow;
use booking_core::models::{
    Availability, BookingPage, Fingerprint, PaymentMethod, Provider, Service, ServiceId, StepValue,
    TimeOfDay,
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures_util::future::join_all;
use serde_json::json;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn walk_to_summary(slot_count: u32) -> BookingWorkflow {
    let mut workflow = BookingWorkflow::new();
    workflow
        .select(StepValue::Service(Service {
            id: ServiceId(1),
            name: "Cleaning".to_owned(),
        }))
        .unwrap();

    let query = workflow.advance().unwrap().unwrap();
    let booked = (1..=20).map(date).collect();
    assert!(workflow.apply_availability(query, Ok(Availability::BookedDates(booked))));
    workflow.select(StepValue::Date(date(28))).unwrap();

    let query = workflow.advance().unwrap().unwrap();
    let slots = (0..slot_count)
        .filter_map(|minute| TimeOfDay::from_hm(8 + minute / 60, minute % 60))
        .collect::<BTreeSet<_>>();
    let first = *slots.iter().next().unwrap();
    assert!(workflow.apply_availability(query, Ok(Availability::OpenSlots(slots))));
    workflow.select(StepValue::Time(first)).unwrap();

    let query = workflow.advance().unwrap().unwrap();
    let providers = (1..=50_u64)
        .map(|id| Provider::new(id, format!("Dr {id}")))
        .collect();
    assert!(workflow.apply_availability(query, Ok(Availability::Providers(providers))));
    workflow
        .select(StepValue::Provider(Provider::new(25_u64, "")))
        .unwrap();
    workflow.advance().unwrap();
    workflow
        .select(StepValue::PaymentMethod(PaymentMethod::Card))
        .unwrap();
    workflow.advance().unwrap();
    workflow
}

fn bench_workflow_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("workflow_walk");
    for slot_count in [8, 120, 480] {
        group.throughput(Throughput::Elements(u64::from(slot_count)));
        group.bench_with_input(
            BenchmarkId::from_parameter(slot_count),
            &slot_count,
            |b, &slots| b.iter(|| walk_to_summary(black_box(slots))),
        );
    }
    group.finish();
}

fn bench_stale_discard(c: &mut Criterion) {
    let summary = walk_to_summary(120);
    let mut at_time = summary.clone();
    for _ in 0..4 {
        at_time.retreat().unwrap();
    }
    at_time.select(StepValue::Date(date(29))).unwrap();
    let live = at_time.advance().unwrap().unwrap();
    let stale = Fingerprint::OpenSlots {
        service: ServiceId(1),
        date: date(28),
    };

    c.bench_function("apply_stale_availability", |b| {
        b.iter(|| {
            let mut workflow = at_time.clone();
            let applied = workflow.apply_availability(
                black_box(stale),
                Ok(Availability::OpenSlots(BTreeSet::new())),
            );
            black_box((applied, live))
        });
    });
}

fn bench_single_flight_join(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("single_flight_join");
    for waiters in [1_usize, 16, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(waiters), &waiters, |b, &n| {
            b.to_async(&runtime).iter(|| async move {
                let flight: Arc<SingleFlight<&'static str, u64>> = Arc::new(SingleFlight::new());
                let outcomes = join_all((0..n).map(|_| {
                    let flight = Arc::clone(&flight);
                    async move {
                        flight
                            .run("csrf-refresh", || async {
                                tokio::task::yield_now().await;
                                1
                            })
                            .await
                    }
                }))
                .await;
                black_box(outcomes)
            });
        });
    }
    group.finish();
}

fn bench_booking_page_decode(c: &mut Criterion) {
    let bookings = (1..=50)
        .map(|id| {
            json!({
                "id": id,
                "patient": {"id": id, "name": "Lea", "last_name": "Cruz"},
                "service": {"id": 1, "name": "Cleaning"},
                "dentist": {"id": 5, "name": "Ana", "last_name": "Reyes"},
                "date": "2024-06-02",
                "time": "09:00:00",
                "status": "pending"
            })
        })
        .collect::<Vec<_>>();
    let body = serde_json::to_vec(&json!({"appointments": bookings, "last_page": 4})).unwrap();

    let mut group = c.benchmark_group("booking_page_decode");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("page_of_50", |b| {
        b.iter(|| serde_json::from_slice::<BookingPage>(black_box(&body)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_workflow_walk,
    bench_stale_discard,
    bench_single_flight_join,
    bench_booking_page_decode
);
criterion_main!(benches);
