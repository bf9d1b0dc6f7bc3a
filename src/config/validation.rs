//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. All violations are
//! collected and reported together rather than stopping at the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::FixtureConfig;

/// A single semantic violation found in a config.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("bind address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upload.chunk_bytes must be greater than zero")]
    ZeroChunkBytes,

    #[error("upload.echo_body_limit must be greater than zero")]
    ZeroEchoBodyLimit,
}

/// Validate a config, returning every violation found.
pub fn validate_config(config: &FixtureConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.upload.chunk_bytes == 0 {
        errors.push(ValidationError::ZeroChunkBytes);
    }
    if config.upload.echo_body_limit == 0 {
        errors.push(ValidationError::ZeroEchoBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
