//! Contract repository port
//!
//! Defines how contracts, state overrides and resolved documents are loaded
//! and stored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use trellis_domain::{Contract, DomainError, ResolvedContract};

/// Errors that can occur while loading or saving documents.
#[derive(Debug, thiserror::Error)]
pub enum ContractRepositoryError {
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    /// The file extension does not name a supported format.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The document parsed but has the wrong shape.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Repository trait for contract documents.
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Loads a contract.
    ///
    /// # Errors
    /// Returns `ContractRepositoryError::NotFound` if the file doesn't exist,
    /// or `Invalid` if it is not a contract.
    async fn load_contract(&self, path: &Path) -> Result<Contract, ContractRepositoryError>;

    /// Loads an external state override.
    ///
    /// A document holding `null` yields `None`.
    ///
    /// # Errors
    /// Returns `ContractRepositoryError::Invalid` if the document is neither
    /// a mapping nor `null`.
    async fn load_state_override(
        &self,
        path: &Path,
    ) -> Result<Option<Map<String, Value>>, ContractRepositoryError>;

    /// Saves a resolved document.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    async fn save_output(
        &self,
        path: &Path,
        output: &ResolvedContract,
    ) -> Result<(), ContractRepositoryError>;
}
