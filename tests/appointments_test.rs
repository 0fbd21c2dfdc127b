// ABOUTME: Integration tests for the booking, payment and account endpoints
// ABOUTME: Catalogue and listings, creation outcomes, checkout handoff and session lifecycle
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use booking_client::accounts::{AccountService, Credentials, Registration};
use booking_client::appointments::{BookingCreator, BookingService};
use booking_client::payment::{HttpPaymentHandoff, PaymentHandoff};
use booking_core::constants::security::XSRF_COOKIE;
use booking_core::models::{
    BookingId, BookingRequest, PaymentMethod, ProviderId, ServiceId, TimeOfDay,
};
use booking_core::{BookingError, ErrorKind};
use chrono::NaiveDate;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{api, initialised_client, json, start_backend};

fn request() -> BookingRequest {
    BookingRequest {
        service_id: ServiceId(1),
        provider_id: ProviderId(5),
        date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
        time: TimeOfDay::from_hm(9, 0).unwrap(),
    }
}

fn listed_booking(id: u64) -> Value {
    json!({
        "id": id,
        "service": {"id": 1, "name": "Cleaning"},
        "dentist": {"id": 5, "name": "Ana", "middle_name": "M", "last_name": "Reyes"},
        "date": "2024-06-02",
        "time": "09:00:00",
        "status": "pending"
    })
}

#[tokio::test]
async fn test_services_and_user_bookings() -> Result<()> {
    let server = start_backend().await;
    Mock::given(method("GET"))
        .and(path(api("services/")))
        .respond_with(json(
            200,
            json!([{"id": 1, "name": "Cleaning"}, {"id": 2, "name": "Braces"}]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("appointment/user-appointments")))
        .respond_with(json(200, json!({"appointments": [listed_booking(9)]})))
        .mount(&server)
        .await;
    let service = BookingService::new(initialised_client(&server, "token").await?);

    let services = service.list_services().await?;
    assert_eq!(services.len(), 2);
    assert_eq!(services[1].name, "Braces");

    let bookings = service.user_bookings().await?;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, BookingId(9));
    assert_eq!(bookings[0].provider.display_name(), "Ana M Reyes");
    assert_eq!(bookings[0].time.to_string(), "09:00");
    assert_eq!(bookings[0].patient, None);
    Ok(())
}

#[tokio::test]
async fn test_user_bookings_require_a_session() -> Result<()> {
    let server = start_backend().await;
    Mock::given(method("GET"))
        .and(path(api("appointment/user-appointments")))
        .respond_with(json(401, json!({"message": "Unauthenticated."})))
        .mount(&server)
        .await;
    let service = BookingService::new(initialised_client(&server, "token").await?);

    let error = service.user_bookings().await.unwrap_err();
    assert_eq!(error, BookingError::NotAuthenticated);
    assert_eq!(error.kind(), ErrorKind::NotAuthenticated);
    Ok(())
}

#[tokio::test]
async fn test_all_bookings_pages_clamp_to_one() -> Result<()> {
    let server = start_backend().await;
    Mock::given(method("GET"))
        .and(path(api("appointment/appointments")))
        .and(query_param("page", "1"))
        .respond_with(json(
            200,
            json!({"appointments": [listed_booking(1), listed_booking(2)], "last_page": 3}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    let service = BookingService::new(initialised_client(&server, "token").await?);

    let page = service.all_bookings(0).await?;
    assert_eq!(page.bookings.len(), 2);
    assert!(page.has_next(1));
    assert!(!page.has_next(3));
    Ok(())
}

#[tokio::test]
async fn test_creation_outcomes() -> Result<()> {
    let server = start_backend().await;
    let service = BookingService::new(initialised_client(&server, "token").await?);

    Mock::given(method("POST"))
        .and(path(api("appointment/set-appointment")))
        .respond_with(json(201, json!({"appointment": 31, "message": "Booked"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let confirmation = service.create_booking(&request()).await?;
    assert_eq!(confirmation.booking_id, BookingId(31));
    assert_eq!(confirmation.message.as_deref(), Some("Booked"));

    Mock::given(method("POST"))
        .and(path(api("appointment/set-appointment")))
        .respond_with(json(200, json!({"appointment": 32})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let error = service.create_booking(&request()).await.unwrap_err();
    assert!(
        matches!(error, BookingError::Server { status: 200, .. }),
        "only 201 confirms a booking: {error:?}"
    );

    Mock::given(method("POST"))
        .and(path(api("appointment/set-appointment")))
        .respond_with(ResponseTemplate::new(409))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let error = service.create_booking(&request()).await.unwrap_err();
    assert_eq!(
        error,
        BookingError::SlotUnavailable {
            message: "Failed to book appointment".to_owned()
        }
    );

    Mock::given(method("POST"))
        .and(path(api("appointment/set-appointment")))
        .respond_with(json(503, json!({"message": "maintenance"})))
        .mount(&server)
        .await;
    let error = service.create_booking(&request()).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Transient);
    Ok(())
}

#[tokio::test]
async fn test_payment_handoff_returns_checkout_url() -> Result<()> {
    let server = start_backend().await;
    Mock::given(method("POST"))
        .and(path(api("post-payment")))
        .and(body_json(json!({"appointmentId": 31, "paymentMethod": "grab_pay"})))
        .respond_with(json(200, json!({"checkout_url": "https://pay.example.com/c/31"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("post-payment")))
        .respond_with(json(200, json!({"checkout_url": "not a url"})))
        .mount(&server)
        .await;
    let handoff = HttpPaymentHandoff::new(initialised_client(&server, "token").await?);

    let url = handoff.initiate(BookingId(31), PaymentMethod::GrabPay).await?;
    assert_eq!(url.host_str(), Some("pay.example.com"));

    let error = handoff
        .initiate(BookingId(31), PaymentMethod::GrabPay)
        .await
        .unwrap_err();
    assert!(matches!(error, BookingError::Decode { context: "checkout_url", .. }));
    Ok(())
}

#[tokio::test]
async fn test_login_logout_and_registration() -> Result<()> {
    let server = start_backend().await;
    Mock::given(method("POST"))
        .and(path(api("login")))
        .and(body_json(json!({"email": "lea@example.com", "password": "secret"})))
        .respond_with(json(200, json!({"user": {"id": 1, "role": "user"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("staff/login")))
        .respond_with(json(422, json!({"message": "These credentials do not match our records."})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("register")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("logout")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = initialised_client(&server, "token").await?;
    let accounts = AccountService::new(client.clone());

    let body = accounts
        .login(&Credentials::new("lea@example.com", "secret"))
        .await?;
    assert_eq!(body["user"]["role"], "user");

    let error = accounts
        .staff_login(&Credentials::new("lea@example.com", "secret"))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        BookingError::Server {
            status: 422,
            message: "These credentials do not match our records.".to_owned()
        }
    );

    let registered = accounts
        .register(&Registration {
            name: "Lea".to_owned(),
            middle_name: String::new(),
            last_name: "Cruz".to_owned(),
            email: "lea@example.com".to_owned(),
            password: "secret-pass".to_owned(),
            password_confirmation: "secret-pass".to_owned(),
        })
        .await?;
    assert_eq!(registered, Value::Null);

    assert!(client.cookie_jar().get(XSRF_COOKIE).is_some());
    accounts.logout().await?;
    assert!(client.cookie_jar().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_social_login_url() -> Result<()> {
    let server = start_backend().await;
    let accounts = AccountService::new(initialised_client(&server, "token").await?);

    let url = accounts.social_login_url("google")?;
    assert_eq!(url.path(), "/api/v1/auth/google/redirect");
    assert!(accounts.social_login_url("../admin").is_err());
    Ok(())
}
