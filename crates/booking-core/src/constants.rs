// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Endpoint paths, anti-forgery cookie names, route paths and environment keys
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat list. Endpoint paths are relative to the configured API prefix.

/// API endpoints, relative to `<base_url>/<api_prefix>`
pub mod endpoints {
    /// Service catalogue
    pub const SERVICES: &str = "services/";
    /// Dates on which a service has no free slot left
    pub const FULLY_BOOKED_DATES: &str = "appointment/fully-booked-dates/";
    /// Open time slots for a service on a date
    pub const AVAILABLE_TIME_SLOTS: &str = "appointment/available-time-slots/";
    /// Dentists free for a service at a date and time
    pub const AVAILABLE_DENTISTS: &str = "appointment/available-dentists/";
    /// Booking creation
    pub const SET_APPOINTMENT: &str = "appointment/set-appointment";
    /// Bookings of the signed-in user
    pub const USER_APPOINTMENTS: &str = "appointment/user-appointments";
    /// Paginated list of every booking (staff views)
    pub const ALL_APPOINTMENTS: &str = "appointment/appointments";
    /// Checkout session creation
    pub const POST_PAYMENT: &str = "post-payment";
    /// Identity lookup
    pub const USER: &str = "user";
    /// Patient login
    pub const LOGIN: &str = "login";
    /// Patient registration
    pub const REGISTER: &str = "register";
    /// Staff (dentist/admin) login
    pub const STAFF_LOGIN: &str = "staff/login";
    /// Session teardown
    pub const LOGOUT: &str = "logout";
}

/// Anti-forgery token handling
pub mod security {
    /// Cookie the server uses to hand out the anti-forgery token
    pub const XSRF_COOKIE: &str = "XSRF-TOKEN";
    /// Request header carrying the anti-forgery token
    pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";
    /// Single-flight key shared by every token refresh
    pub const CSRF_REFRESH_KEY: &str = "csrf-refresh";
    /// Status the backend answers with when the token expired
    pub const TOKEN_EXPIRED_STATUS: u16 = 419;
    /// Forbidden; also treated as a stale token
    pub const FORBIDDEN_STATUS: u16 = 403;
}

/// Client-side route paths used for redirects
pub mod routes {
    /// Login page
    pub const LOGIN: &str = "/auth";
    /// Default landing for authenticated users
    pub const HOME: &str = "/";
    /// Patient dashboard
    pub const AUTHENTICATED: &str = "/authenticated";
    /// Admin dashboard
    pub const ADMIN: &str = "/admin";
    /// Dentist dashboard
    pub const DENTIST: &str = "/dentist";
    /// Return route after a completed checkout
    pub const PAYMENT_SUCCESS: &str = "/successPayment";
    /// Return route after a failed checkout
    pub const PAYMENT_FAILED: &str = "/failedPayment";
}

/// Environment variable names
pub mod env_config {
    /// Backend base URL
    pub const API_URL: &str = "BOOKING_API_URL";
    /// API path prefix
    pub const API_PREFIX: &str = "BOOKING_API_PREFIX";
    /// Path of the CSRF cookie endpoint
    pub const CSRF_PATH: &str = "BOOKING_CSRF_PATH";
    /// Request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "BOOKING_HTTP_TIMEOUT_SECS";
    /// Connect timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "BOOKING_HTTP_CONNECT_TIMEOUT_SECS";
}

/// Default configuration values
pub mod defaults {
    /// Backend base URL
    pub const BASE_URL: &str = "http://localhost:8000/";
    /// API path prefix
    pub const API_PREFIX: &str = "api/v1/";
    /// CSRF cookie endpoint, relative to the base URL
    pub const CSRF_COOKIE_PATH: &str = "sanctum/csrf-cookie";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("booking-client/", env!("CARGO_PKG_VERSION"));
}

/// Fallback messages when the server does not explain a failure
pub mod messages {
    /// Fully-booked dates query failed
    pub const BOOKED_DATES_FAILED: &str = "Failed to fetch booked dates";
    /// Time slot query failed
    pub const TIME_SLOTS_FAILED: &str = "Failed to fetch available time slots";
    /// Dentist query failed
    pub const DENTISTS_FAILED: &str = "Failed to fetch available dentists";
    /// Booking creation failed
    pub const BOOKING_FAILED: &str = "Failed to book appointment";
    /// Checkout session creation failed
    pub const PAYMENT_FAILED: &str = "Failed to start payment";
    /// Booking list failed
    pub const BOOKINGS_FAILED: &str = "Failed to load appointments";
    /// Service catalogue failed
    pub const SERVICES_FAILED: &str = "Failed to load services";
    /// Login or registration failed
    pub const LOGIN_FAILED: &str = "An error occurred during login";
    /// Registration failed
    pub const REGISTER_FAILED: &str = "An error occurred during registration";
    /// Logout failed
    pub const LOGOUT_FAILED: &str = "An error occurred during logout";
}
