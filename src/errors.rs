//! Unified error type for the sample bank service.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer maps
//! each variant to a status code in [`crate::api::error`].

use thiserror::Error;

/// All errors produced by configuration, storage and request handling.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage failure reported by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No (non-deleted) client carries the requested id
    #[error("Client not found: {id}")]
    ClientNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Client-supplied input (path id or request body) could not be decoded
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Decoder message
        message: String,
    },

    /// Listener or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
