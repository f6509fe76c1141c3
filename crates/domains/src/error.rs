//! # AppError
//!
//! Centralized error handling for the corkboard client.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Target not located in the local tree (e.g. Post, Comment, Reaction).
    /// Raised instead of silently dropping an update against a stale snapshot.
    #[error("{0} not found with id {1}")]
    NotFound(String, String),

    /// Client-side validation failure; the request is never sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Auth failure (401/403). Carries the server message when one was given.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success HTTP response from the board API.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection-level failure (DNS, timeout, refused).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body that could not be parsed into its wire shape.
    #[error("could not decode payload: {0}")]
    Decode(String),

    /// Local persistent store failure.
    #[error("client storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for corkboard logic.
pub type Result<T> = std::result::Result<T, AppError>;
