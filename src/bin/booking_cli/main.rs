// ABOUTME: booking-cli - command-line driver for the appointment booking client
// ABOUTME: Lists services and bookings, queries availability and books appointments
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
//!
//! Usage:
//! ```bash
//! # List bookable services
//! booking-cli services
//!
//! # Show open slots for service 1 on a date
//! booking-cli availability --service 1 --date 2024-06-02
//!
//! # Book an appointment and print the checkout URL
//! booking-cli --email lea@example.com --password secret \
//!     book --service 1 --date 2024-06-02 --time 09:00 --dentist 5 --payment gcash
//!
//! # Show the current session and where it lands
//! booking-cli --email admin@example.com --password secret --staff whoami
//! ```

mod commands;
mod helpers;

use anyhow::{Context, Result};
use booking_client::accounts::{AccountService, Credentials};
use booking_client::client::AuthenticatedClient;
use booking_client::config::ClientConfig;
use booking_client::logging::LoggingConfig;
use booking_core::models::{PaymentMethod, TimeOfDay};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "booking-cli",
    about = "Appointment booking client",
    long_about = "Command-line driver for the appointment booking workflow: \
                  services, availability, bookings and checkout."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL override (defaults to BOOKING_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log in with this email before running the command
    #[arg(long, global = true, requires = "password")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, global = true, requires = "email")]
    password: Option<String>,

    /// Use the staff login endpoint
    #[arg(long, global = true)]
    staff: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List bookable services
    Services,

    /// Show availability for a service, date and time
    Availability {
        /// Service id
        #[arg(long)]
        service: u64,

        /// Date (YYYY-MM-DD); lists open slots instead of booked dates
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Time (HH:MM), requires --date; lists free dentists
        #[arg(long, requires = "date")]
        time: Option<TimeOfDay>,
    },

    /// Book an appointment and print the checkout URL
    Book {
        /// Service id
        #[arg(long)]
        service: u64,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Time (HH:MM)
        #[arg(long)]
        time: TimeOfDay,

        /// Dentist id
        #[arg(long)]
        dentist: u64,

        /// Payment method (brankas, card, dob, gcash, grab_pay, billease, paymaya)
        #[arg(long)]
        payment: PaymentMethod,
    },

    /// List bookings
    Bookings {
        /// List every booking (staff only) instead of your own
        #[arg(long)]
        all: bool,

        /// Page of the full list
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show the current session and its landing route
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::from_env().with_level(log_level).init()?;

    let config = match &cli.base_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    info!(base_url = %config.base_url, "booking-cli");

    let client = AuthenticatedClient::new(config)?;
    client
        .initialize()
        .await
        .context("failed to fetch the anti-forgery cookie")?;

    if let (Some(email), Some(password)) = (cli.email, cli.password) {
        let credentials = Credentials::new(email, password);
        let accounts = AccountService::new(client.clone());
        if cli.staff {
            accounts.staff_login(&credentials).await?;
        } else {
            accounts.login(&credentials).await?;
        }
    }

    match cli.command {
        Command::Services => commands::catalog::services(&client).await?,
        Command::Availability {
            service,
            date,
            time,
        } => commands::catalog::availability(&client, service.into(), date, time).await?,
        Command::Book {
            service,
            date,
            time,
            dentist,
            payment,
        } => {
            let order = commands::book::Order {
                service: service.into(),
                date,
                time,
                dentist: dentist.into(),
                payment,
            };
            commands::book::run(&client, &order).await?;
        }
        Command::Bookings { all, page } => {
            commands::catalog::bookings(&client, all.then_some(page)).await?;
        }
        Command::Whoami => commands::session::whoami(&client).await,
    }

    Ok(())
}
