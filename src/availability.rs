// ABOUTME: Availability queries gating the date, time and provider steps
// ABOUTME: Defines the AvailabilityResolver trait and its HTTP implementation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Availability resolution
//!
//! Read-only queries. An empty set is a successful answer; network and
//! server failures are errors, never an empty set.

use std::collections::BTreeSet;

use async_trait::async_trait;
use booking_core::constants::{endpoints, messages};
use booking_core::models::{Availability, Fingerprint, Provider, ServiceId, TimeOfDay};
use booking_core::BookingResult;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::client::{ApiRequest, AuthenticatedClient};

/// Source of availability constraints
#[async_trait]
pub trait AvailabilityResolver: Send + Sync {
    /// Dates on which `service` has no free slot
    async fn fully_booked_dates(&self, service: ServiceId) -> BookingResult<BTreeSet<NaiveDate>>;

    /// Open slots for `service` on `date`
    async fn available_slots(
        &self,
        service: ServiceId,
        date: NaiveDate,
    ) -> BookingResult<BTreeSet<TimeOfDay>>;

    /// Providers free for `service` at `date` and `time`
    async fn available_providers(
        &self,
        service: ServiceId,
        date: NaiveDate,
        time: TimeOfDay,
    ) -> BookingResult<BTreeSet<Provider>>;

    /// Answer the query a fingerprint describes
    async fn resolve(&self, fingerprint: &Fingerprint) -> BookingResult<Availability> {
        match *fingerprint {
            Fingerprint::BookedDates { service } => self
                .fully_booked_dates(service)
                .await
                .map(Availability::BookedDates),
            Fingerprint::OpenSlots { service, date } => self
                .available_slots(service, date)
                .await
                .map(Availability::OpenSlots),
            Fingerprint::Providers {
                service,
                date,
                time,
            } => self
                .available_providers(service, date, time)
                .await
                .map(Availability::Providers),
        }
    }
}

#[derive(Deserialize)]
struct FullyBookedDatesResponse {
    #[serde(default)]
    fully_booked_dates: Vec<NaiveDate>,
}

#[derive(Deserialize)]
struct AvailableSlotsResponse {
    #[serde(default)]
    available_slots: Vec<TimeOfDay>,
}

#[derive(Deserialize)]
struct AvailableDentistsResponse {
    #[serde(default)]
    available_dentists: Vec<Provider>,
}

/// Resolver backed by the booking API
#[derive(Debug, Clone)]
pub struct HttpAvailabilityResolver {
    client: AuthenticatedClient,
}

impl HttpAvailabilityResolver {
    /// Resolver sharing `client`'s session
    #[must_use]
    pub const fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AvailabilityResolver for HttpAvailabilityResolver {
    async fn fully_booked_dates(&self, service: ServiceId) -> BookingResult<BTreeSet<NaiveDate>> {
        let request = ApiRequest::get(endpoints::FULLY_BOOKED_DATES).query("service_id", service);
        let response: FullyBookedDatesResponse = self
            .client
            .fetch(&request, messages::BOOKED_DATES_FAILED)
            .await?;
        debug!(%service, count = response.fully_booked_dates.len(), "fully booked dates");
        Ok(response.fully_booked_dates.into_iter().collect())
    }

    async fn available_slots(
        &self,
        service: ServiceId,
        date: NaiveDate,
    ) -> BookingResult<BTreeSet<TimeOfDay>> {
        let request = ApiRequest::get(endpoints::AVAILABLE_TIME_SLOTS)
            .query("service_id", service)
            .query("date", date.format("%Y-%m-%d"));
        let response: AvailableSlotsResponse = self
            .client
            .fetch(&request, messages::TIME_SLOTS_FAILED)
            .await?;
        debug!(%service, %date, count = response.available_slots.len(), "open slots");
        Ok(response.available_slots.into_iter().collect())
    }

    async fn available_providers(
        &self,
        service: ServiceId,
        date: NaiveDate,
        time: TimeOfDay,
    ) -> BookingResult<BTreeSet<Provider>> {
        let request = ApiRequest::get(endpoints::AVAILABLE_DENTISTS)
            .query("service_id", service)
            .query("date", date.format("%Y-%m-%d"))
            .query("time", time);
        let response: AvailableDentistsResponse = self
            .client
            .fetch(&request, messages::DENTISTS_FAILED)
            .await?;
        debug!(
            %service,
            %date,
            %time,
            count = response.available_dentists.len(),
            "available providers"
        );
        Ok(response.available_dentists.into_iter().collect())
    }
}
