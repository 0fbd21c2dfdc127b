// ABOUTME: Booking API operations: service catalogue, booking creation and booking lists
// ABOUTME: Maps a rejected booking creation to SlotUnavailable with the server's message
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use booking_core::constants::{endpoints, messages};
use booking_core::models::{
    Booking, BookingConfirmation, BookingId, BookingPage, BookingRequest, Service,
};
use booking_core::{BookingError, BookingResult};
use serde::Deserialize;
use tracing::{info, warn};

use crate::client::{is_token_rejection, ApiRequest, ApiResponse, AuthenticatedClient};

/// Status the backend answers a created booking with
const CREATED: u16 = 201;

/// Creates bookings; the seam the workflow driver submits through
#[async_trait]
pub trait BookingCreator: Send + Sync {
    /// Create a booking for a complete selection
    async fn create_booking(&self, request: &BookingRequest) -> BookingResult<BookingConfirmation>;
}

/// The `appointment` field of a creation response: a bare id or an object
#[derive(Deserialize)]
#[serde(untagged)]
enum AppointmentRef {
    Id(BookingId),
    Record { id: BookingId },
}

#[derive(Deserialize)]
struct CreatedResponse {
    appointment: AppointmentRef,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct UserBookingsResponse {
    #[serde(default)]
    appointments: Vec<Booking>,
}

/// Booking endpoints of the API
#[derive(Debug, Clone)]
pub struct BookingService {
    client: AuthenticatedClient,
}

impl BookingService {
    /// Service sharing `client`'s session
    #[must_use]
    pub const fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Bookable services
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed
    pub async fn list_services(&self) -> BookingResult<Vec<Service>> {
        self.client
            .fetch(&ApiRequest::get(endpoints::SERVICES), messages::SERVICES_FAILED)
            .await
    }

    /// Bookings of the signed-in user
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotAuthenticated` without a session, or the
    /// mapped request error
    pub async fn user_bookings(&self) -> BookingResult<Vec<Booking>> {
        let response: UserBookingsResponse = self
            .client
            .fetch(
                &ApiRequest::get(endpoints::USER_APPOINTMENTS),
                messages::BOOKINGS_FAILED,
            )
            .await?;
        Ok(response.appointments)
    }

    /// One page of every booking (staff only); pages below 1 clamp to 1
    ///
    /// # Errors
    ///
    /// Returns the mapped request error
    pub async fn all_bookings(&self, page: u32) -> BookingResult<BookingPage> {
        let request = ApiRequest::get(endpoints::ALL_APPOINTMENTS).query("page", page.max(1));
        self.client.fetch(&request, messages::BOOKINGS_FAILED).await
    }

    fn creation_outcome(response: &ApiResponse) -> BookingResult<BookingConfirmation> {
        if response.status() == CREATED {
            let created: CreatedResponse = response.json("booking confirmation")?;
            let booking_id = match created.appointment {
                AppointmentRef::Id(id) | AppointmentRef::Record { id } => id,
            };
            return Ok(BookingConfirmation {
                booking_id,
                message: created.message,
            });
        }

        let status = response.status();
        if (400..500).contains(&status) && status != 401 && !is_token_rejection(status) {
            return Err(BookingError::SlotUnavailable {
                message: response
                    .server_message()
                    .unwrap_or_else(|| messages::BOOKING_FAILED.to_owned()),
            });
        }
        Err(response.error(messages::BOOKING_FAILED))
    }
}

#[async_trait]
impl BookingCreator for BookingService {
    async fn create_booking(&self, request: &BookingRequest) -> BookingResult<BookingConfirmation> {
        let api_request = ApiRequest::post(endpoints::SET_APPOINTMENT).json(request)?;
        let response = self.client.send(&api_request).await?;
        let outcome = Self::creation_outcome(&response);
        match &outcome {
            Ok(confirmation) => info!(
                booking_id = %confirmation.booking_id,
                service = %request.service_id,
                date = %request.date,
                time = %request.time,
                "booking created"
            ),
            Err(error) => warn!(status = response.status(), %error, "booking rejected"),
        }
        outcome
    }
}
