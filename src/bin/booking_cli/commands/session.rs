// ABOUTME: Session command for booking-cli
// ABOUTME: Queries the identity endpoint and prints role and landing route
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use booking_client::client::AuthenticatedClient;
use booking_client::session_guard::SessionGuard;

/// Print the current session
pub async fn whoami(client: &AuthenticatedClient) {
    let session = SessionGuard::new(client.clone()).session().await;
    if !session.authenticated {
        println!("Not authenticated (login at {})", session.landing_route());
        return;
    }
    let role = session.role.map_or("none", |role| role.as_str());
    println!("Authenticated as role: {role}");
    println!("Landing route: {}", session.landing_route());
}
