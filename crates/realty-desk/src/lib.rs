//! Commission rules and reporting for a real-estate brokerage back office.

pub mod commission;
pub mod config;
pub mod error;
pub mod telemetry;
