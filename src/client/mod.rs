// ABOUTME: HTTP plumbing for the booking backend
// ABOUTME: Cookie jar, keyed single-flight guard and the token-refreshing client
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Token-attaching client with single-flight refresh and one replay
pub mod authenticated;
/// In-memory cookie store exposing the anti-forgery token
pub mod cookie_jar;
/// Keyed single-flight primitive
pub mod single_flight;

pub use authenticated::{is_token_rejection, ApiRequest, ApiResponse, AuthenticatedClient};
pub use cookie_jar::SessionCookieJar;
pub use single_flight::SingleFlight;
