//! Application error types

use thiserror::Error;
use trellis_domain::{DomainError, ResolveError};

/// Application-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A document did not have the expected shape.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Resolution failed.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),
}

impl ApplicationError {
    /// Returns the resolution error, if this is one.
    #[must_use]
    pub const fn as_resolve(&self) -> Option<&ResolveError> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Domain(_) => None,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
