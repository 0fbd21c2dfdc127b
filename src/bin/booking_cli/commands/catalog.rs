// ABOUTME: Read-only commands for booking-cli: services, availability and booking lists
// ABOUTME: Prints results through the display helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use anyhow::Result;
use booking_client::appointments::BookingService;
use booking_client::availability::{AvailabilityResolver, HttpAvailabilityResolver};
use booking_client::client::AuthenticatedClient;
use booking_core::models::{Fingerprint, ServiceId, TimeOfDay};
use chrono::NaiveDate;

use crate::helpers::display;

/// List bookable services
pub async fn services(client: &AuthenticatedClient) -> Result<()> {
    let services = BookingService::new(client.clone()).list_services().await?;
    display::services(&services);
    Ok(())
}

/// Show the availability the given prefix resolves to
pub async fn availability(
    client: &AuthenticatedClient,
    service: ServiceId,
    date: Option<NaiveDate>,
    time: Option<TimeOfDay>,
) -> Result<()> {
    let fingerprint = match (date, time) {
        (Some(date), Some(time)) => Fingerprint::Providers {
            service,
            date,
            time,
        },
        (Some(date), None) => Fingerprint::OpenSlots { service, date },
        (None, _) => Fingerprint::BookedDates { service },
    };
    let availability = HttpAvailabilityResolver::new(client.clone())
        .resolve(&fingerprint)
        .await?;
    display::availability(&fingerprint, &availability);
    Ok(())
}

/// List your bookings, or one page of every booking when `page` is given
pub async fn bookings(client: &AuthenticatedClient, page: Option<u32>) -> Result<()> {
    let service = BookingService::new(client.clone());
    match page {
        Some(page) => {
            let listing = service.all_bookings(page).await?;
            display::bookings(&listing.bookings);
            println!("Page {} of {}", page.max(1), listing.last_page);
        }
        None => display::bookings(&service.user_bookings().await?),
    }
    Ok(())
}
