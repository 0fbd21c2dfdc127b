// ABOUTME: Checkout payment methods and the outcome encoded in payment return routes
// ABOUTME: Method names are the processor's snake_case identifiers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::routes;

/// Payment method offered at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Brankas bank transfer
    Brankas,
    /// Credit or debit card
    Card,
    /// Direct online banking
    Dob,
    /// `GCash` wallet
    Gcash,
    /// `GrabPay` wallet
    GrabPay,
    /// `BillEase` pay-later
    Billease,
    /// `PayMaya` wallet
    Paymaya,
}

impl PaymentMethod {
    /// Every method, in display order
    pub const ALL: [Self; 7] = [
        Self::Brankas,
        Self::Card,
        Self::Dob,
        Self::Gcash,
        Self::GrabPay,
        Self::Billease,
        Self::Paymaya,
    ];

    /// Wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brankas => "brankas",
            Self::Card => "card",
            Self::Dob => "dob",
            Self::Gcash => "gcash",
            Self::GrabPay => "grab_pay",
            Self::Billease => "billease",
            Self::Paymaya => "paymaya",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Brankas => "Brankas",
            Self::Card => "Card",
            Self::Dob => "Dob",
            Self::Gcash => "Gcash",
            Self::GrabPay => "GrabPay",
            Self::Billease => "Billease",
            Self::Paymaya => "Paymaya",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown payment method: {wanted}"))
    }
}

/// Outcome reported by the processor's return redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentResult {
    /// Checkout completed
    Succeeded,
    /// Checkout failed or was abandoned
    Failed,
}

impl PaymentResult {
    /// Classify a return route; other routes are not payment returns
    #[must_use]
    pub fn from_route(route: &str) -> Option<Self> {
        let path = route.split(['?', '#']).next().unwrap_or(route);
        match path.trim_end_matches('/') {
            routes::PAYMENT_SUCCESS => Some(Self::Succeeded),
            routes::PAYMENT_FAILED => Some(Self::Failed),
            _ => None,
        }
    }

    /// Route the processor redirects to for this outcome
    #[must_use]
    pub const fn return_route(self) -> &'static str {
        match self {
            Self::Succeeded => routes::PAYMENT_SUCCESS,
            Self::Failed => routes::PAYMENT_FAILED,
        }
    }

    /// Where the user continues after either outcome
    #[must_use]
    pub const fn continue_route(self) -> &'static str {
        match self {
            Self::Succeeded | Self::Failed => routes::AUTHENTICATED,
        }
    }
}
