//! Subcommand implementations.

pub mod ping;
pub mod routes;

use thiserror::Error;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The built-in guard table failed validation.
    #[error("Guard table error: {0}")]
    Guard(#[from] freshwash_core::GuardTableError),

    /// Portal configuration rejected a value.
    #[error("Configuration error: {0}")]
    Config(#[from] freshwash_portal::config::ConfigError),

    /// The laundry API could not be reached.
    #[error("API error: {0}")]
    Api(#[from] freshwash_portal::api::ApiError),
}
