// ABOUTME: Helper modules for booking-cli
// ABOUTME: Output formatting

pub mod display;
