// ABOUTME: Payment handoff: turns a created booking into an external checkout URL
// ABOUTME: The caller navigates to the returned URL; no payment state is kept here
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use booking_core::constants::{endpoints, messages};
use booking_core::models::{BookingId, PaymentMethod};
use booking_core::{BookingError, BookingResult};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::client::{ApiRequest, AuthenticatedClient};

/// Opens checkout sessions for created bookings
#[async_trait]
pub trait PaymentHandoff: Send + Sync {
    /// Request a checkout session and return the URL to navigate to
    async fn initiate(&self, booking_id: BookingId, method: PaymentMethod) -> BookingResult<Url>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest {
    appointment_id: BookingId,
    payment_method: PaymentMethod,
}

#[derive(Deserialize)]
struct CheckoutResponse {
    checkout_url: String,
}

/// Payment handoff through the booking API
#[derive(Debug, Clone)]
pub struct HttpPaymentHandoff {
    client: AuthenticatedClient,
}

impl HttpPaymentHandoff {
    /// Handoff sharing `client`'s session
    #[must_use]
    pub const fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentHandoff for HttpPaymentHandoff {
    async fn initiate(&self, booking_id: BookingId, method: PaymentMethod) -> BookingResult<Url> {
        let request = ApiRequest::post(endpoints::POST_PAYMENT).json(&CheckoutRequest {
            appointment_id: booking_id,
            payment_method: method,
        })?;
        let response: CheckoutResponse =
            self.client.fetch(&request, messages::PAYMENT_FAILED).await?;
        let url = Url::parse(&response.checkout_url)
            .map_err(|e| BookingError::decode("checkout_url", e))?;
        info!(
            %booking_id,
            %method,
            host = url.host_str().unwrap_or_default(),
            "checkout session opened"
        );
        Ok(url)
    }
}
