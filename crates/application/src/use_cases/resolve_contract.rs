//! Resolve contract file use case

use std::path::PathBuf;

use tracing::{debug, info};
use trellis_domain::{ResolveError, ResolveWarning, ResolvedContract};

use crate::ports::{ContractRepository, ContractRepositoryError};
use crate::resolver::{ComputedCache, ContractResolver};

/// Errors that can occur when resolving a contract file.
#[derive(Debug, thiserror::Error)]
pub enum ResolveContractError {
    /// A document could not be loaded or saved.
    #[error(transparent)]
    Repository(#[from] ContractRepositoryError),

    /// The contract could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Input for resolving a contract file.
#[derive(Debug, Clone)]
pub struct ResolveContractInput {
    /// Path to the contract document.
    pub contract_path: PathBuf,

    /// Optional state override document.
    pub state_override_path: Option<PathBuf>,

    /// Where to write the resolved document. Nothing is written when absent.
    pub output_path: Option<PathBuf>,
}

impl ResolveContractInput {
    /// Creates an input for a contract with no override and no output file.
    pub fn new(contract_path: impl Into<PathBuf>) -> Self {
        Self {
            contract_path: contract_path.into(),
            state_override_path: None,
            output_path: None,
        }
    }

    /// Sets the state override document.
    #[must_use]
    pub fn with_state_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_override_path = Some(path.into());
        self
    }

    /// Sets the output document.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Output of a resolved contract file.
#[derive(Debug, Clone)]
pub struct ResolveContractOutput {
    /// The resolved document.
    pub document: ResolvedContract,

    /// Order the computed fields were evaluated in.
    pub order: Vec<String>,

    /// Non-fatal problems found in computed definitions.
    pub warnings: Vec<ResolveWarning>,
}

/// Loads a contract, resolves it, and optionally saves the result.
pub struct ResolveContractFile<R> {
    repository: R,
    resolver: ContractResolver,
}

impl<R: ContractRepository> ResolveContractFile<R> {
    /// Creates a new `ResolveContractFile` use case.
    pub const fn new(repository: R, resolver: ContractResolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns an error if a document cannot be loaded or saved, or if
    /// resolution fails.
    pub async fn execute(
        &self,
        input: &ResolveContractInput,
    ) -> Result<ResolveContractOutput, ResolveContractError> {
        let contract = self.repository.load_contract(&input.contract_path).await?;

        let state_override = match &input.state_override_path {
            Some(path) => self.repository.load_state_override(path).await?,
            None => None,
        };

        let mut cache = ComputedCache::new();
        let resolution =
            self.resolver
                .resolve_with_cache(&contract, state_override.as_ref(), &mut cache)?;
        debug!(
            contract = %input.contract_path.display(),
            computed = resolution.computed.len(),
            "contract resolved"
        );

        if let Some(path) = &input.output_path {
            self.repository.save_output(path, &resolution.output).await?;
            info!(output = %path.display(), "resolved contract written");
        }

        Ok(ResolveContractOutput {
            document: resolution.output,
            order: resolution.order,
            warnings: resolution.warnings,
        })
    }
}
