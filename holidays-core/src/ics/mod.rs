//! ICS file generation.
//!
//! This module renders holiday events as an RFC 5545 calendar.

mod generate;

pub use generate::{ICAL_VERSION, PRODUCT_ID, REFRESH_INTERVAL, generate_ics};
