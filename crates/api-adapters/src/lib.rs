//! # api-adapters
//!
//! The REST side of the board: wire DTOs, the reqwest client implementing
//! the `BoardApi` and `AccountApi` ports, and the fire-and-forget telemetry
//! sink. All wire-shape knowledge stays in this crate; services only ever
//! see mapped domain values.

pub mod dto;
pub mod rest;
pub mod telemetry;

pub use rest::RestClient;
pub use telemetry::HttpTelemetry;
