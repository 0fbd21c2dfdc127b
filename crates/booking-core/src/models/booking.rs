// ABOUTME: Booking creation payloads, confirmations and booking list records
// ABOUTME: Field names follow the backend wire format (dentist, serviceId, last_page)
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{BookingId, Provider, ProviderId, Service, ServiceId, TimeOfDay};

/// Body of a booking creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Chosen service
    #[serde(rename = "serviceId")]
    pub service_id: ServiceId,
    /// Chosen provider
    #[serde(rename = "dentistId")]
    pub provider_id: ProviderId,
    /// Chosen date, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Chosen time, `HH:MM`
    pub time: TimeOfDay,
}

/// Successful booking creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// Identifier of the new booking
    pub booking_id: BookingId,
    /// Server message, if any
    pub message: Option<String>,
}

/// Patient shown on staff booking lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Patient identifier
    pub id: u64,
    /// First name
    pub name: String,
    /// Middle name
    #[serde(default)]
    pub middle_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A booking as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// Booked service
    pub service: Service,
    /// Assigned provider
    #[serde(rename = "dentist")]
    pub provider: Provider,
    /// Patient; present on staff lists only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    /// Booked date
    pub date: NaiveDate,
    /// Booked time
    pub time: TimeOfDay,
    /// Backend status label
    pub status: String,
}

/// One page of the staff booking list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPage {
    /// Bookings on this page
    #[serde(rename = "appointments", default)]
    pub bookings: Vec<Booking>,
    /// Number of the last page
    #[serde(default = "first_page")]
    pub last_page: u32,
}

const fn first_page() -> u32 {
    1
}

impl BookingPage {
    /// Whether a page after `page` exists
    #[must_use]
    pub const fn has_next(&self, page: u32) -> bool {
        page < self.last_page
    }
}
