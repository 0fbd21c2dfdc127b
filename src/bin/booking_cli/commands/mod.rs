// ABOUTME: Command modules for booking-cli
// ABOUTME: Catalogue and listing, booking, and session commands

pub mod book;
pub mod catalog;
pub mod session;
