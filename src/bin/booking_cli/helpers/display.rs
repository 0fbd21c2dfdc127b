// ABOUTME: Output formatting helpers for booking-cli
// ABOUTME: Consistent tables for services, availability, bookings and the summary
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use booking_client::workflow::BookingWorkflow;
use booking_core::models::{Availability, Booking, Fingerprint, Service};

/// Print the service catalogue
pub fn services(services: &[Service]) {
    if services.is_empty() {
        println!("No services available.");
        return;
    }
    println!("{:<6} NAME", "ID");
    for service in services {
        println!("{:<6} {}", service.id, service.name);
    }
}

/// Print one availability answer
pub fn availability(fingerprint: &Fingerprint, availability: &Availability) {
    println!("{fingerprint}");
    match availability {
        Availability::BookedDates(dates) if dates.is_empty() => {
            println!("No fully booked dates.");
        }
        Availability::BookedDates(dates) => {
            println!("Fully booked:");
            for date in dates {
                println!("  {date}");
            }
        }
        Availability::OpenSlots(slots) if slots.is_empty() => println!("No open slots."),
        Availability::OpenSlots(slots) => {
            println!("Open slots:");
            for slot in slots {
                println!("  {slot}");
            }
        }
        Availability::Providers(providers) if providers.is_empty() => {
            println!("No dentists available.");
        }
        Availability::Providers(providers) => {
            println!("Available dentists:");
            for provider in providers {
                println!("  {:<6} {}", provider.id, provider.display_name());
            }
        }
    }
}

/// Print a booking list
pub fn bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("You don't have any appointments scheduled.");
        return;
    }
    println!(
        "{:<6} {:<12} {:<6} {:<24} {:<24} STATUS",
        "ID", "DATE", "TIME", "SERVICE", "DENTIST"
    );
    for booking in bookings {
        println!(
            "{:<6} {:<12} {:<6} {:<24} {:<24} {}",
            booking.id,
            booking.date,
            booking.time,
            booking.service.name,
            booking.provider.display_name(),
            booking.status
        );
    }
}

/// Print the summary step
pub fn summary(workflow: &BookingWorkflow) {
    let selection = workflow.selection();
    println!("Booking summary");
    println!("{}", "=".repeat(40));
    if let Some(service) = selection.service() {
        println!("Service:  {}", service.name);
    }
    if let Some(date) = selection.date() {
        println!("Date:     {date}");
    }
    if let Some(time) = selection.time() {
        println!("Time:     {time}");
    }
    if let Some(provider) = selection.provider() {
        println!("Dentist:  {}", provider.display_name());
    }
    if let Some(method) = selection.payment_method() {
        println!("Payment:  {}", method.display_name());
    }
    println!("{}", "=".repeat(40));
}
