pub mod config;
pub mod customers;
pub mod error;
pub mod telemetry;
