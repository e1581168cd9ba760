//! File-based contract repository implementation.
//!
//! Documents are read and written as JSON or YAML, chosen by file extension.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;
use trellis_application::ports::{
    ContractRepository, ContractRepositoryError, FileSystem, FileSystemError,
};
use trellis_domain::{Contract, ResolvedContract, state_override_from_value};

use crate::serialization::DocumentFormat;

fn to_repository_error(error: FileSystemError) -> ContractRepositoryError {
    match error {
        FileSystemError::NotFound(path) => ContractRepositoryError::NotFound(path),
        other => ContractRepositoryError::Io(other.to_string()),
    }
}

/// File-based contract repository.
#[derive(Debug, Clone)]
pub struct FileContractRepository<F> {
    fs: F,
}

impl<F: FileSystem> FileContractRepository<F> {
    /// Creates a new file-based contract repository.
    pub const fn new(fs: F) -> Self {
        Self { fs }
    }

    fn format_of(path: &Path) -> Result<DocumentFormat, ContractRepositoryError> {
        DocumentFormat::from_path(path)
            .ok_or_else(|| ContractRepositoryError::UnsupportedFormat(path.to_path_buf()))
    }

    async fn read_document(&self, path: &Path) -> Result<Value, ContractRepositoryError> {
        let format = Self::format_of(path)?;

        if !self.fs.exists(path).await {
            return Err(ContractRepositoryError::NotFound(path.to_path_buf()));
        }

        let content = self
            .fs
            .read_file(path)
            .await
            .map_err(to_repository_error)?;

        let document = format.parse(&content).map_err(|e| {
            ContractRepositoryError::Serialization(format!("{}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), %format, "loaded document");
        Ok(document)
    }
}

#[async_trait]
impl<F: FileSystem + Sync> ContractRepository for FileContractRepository<F> {
    async fn load_contract(&self, path: &Path) -> Result<Contract, ContractRepositoryError> {
        let document = self.read_document(path).await?;
        Ok(Contract::from_value(document)?)
    }

    async fn load_state_override(
        &self,
        path: &Path,
    ) -> Result<Option<Map<String, Value>>, ContractRepositoryError> {
        let document = self.read_document(path).await?;
        Ok(state_override_from_value(document)?)
    }

    async fn save_output(
        &self,
        path: &Path,
        output: &ResolvedContract,
    ) -> Result<(), ContractRepositoryError> {
        // Unknown extensions fall back to JSON.
        let format = DocumentFormat::from_path(path).unwrap_or(DocumentFormat::Json);

        let content = format
            .render(output)
            .map_err(|e| ContractRepositoryError::Serialization(e.to_string()))?;

        self.fs
            .write_file(path, &content)
            .await
            .map_err(to_repository_error)?;

        debug!(path = %path.display(), %format, "saved resolved document");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::TokioFileSystem;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;
    use trellis_domain::DomainError;

    fn repository() -> FileContractRepository<TokioFileSystem> {
        FileContractRepository::new(TokioFileSystem::new())
    }

    #[tokio::test]
    async fn test_load_json_contract() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("contract.json");
        std::fs::write(
            &path,
            r#"{"state": {"n": 1}, "computed": {"b": "${computed.a}", "a": "x"}, "rootElement": "${state.n}"}"#,
        )
        .unwrap();

        let contract = repository().load_contract(&path).await.unwrap();

        assert_eq!(contract.state.get("n"), Some(&json!(1)));
        assert_eq!(
            contract.computed.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert_eq!(contract.root_element, json!("${state.n}"));
    }

    #[tokio::test]
    async fn test_load_yaml_state_override() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("override.yml");
        std::fs::write(&path, "theme: dark\ncount: 3\n").unwrap();

        let overrides = repository().load_state_override(&path).await.unwrap();

        assert_eq!(
            overrides.map(Value::Object),
            Some(json!({"theme": "dark", "count": 3}))
        );
    }

    #[tokio::test]
    async fn test_null_override_is_absent() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("override.json");
        std::fs::write(&path, "null").unwrap();

        assert_eq!(repository().load_state_override(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("missing.json");

        let result = repository().load_contract(&path).await;

        assert!(matches!(result, Err(ContractRepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let result = repository().load_contract(Path::new("contract.toml")).await;
        assert!(matches!(
            result,
            Err(ContractRepositoryError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_shape_and_syntax() {
        let dir = tempdir().expect("Failed to create temp directory");
        let list = dir.path().join("list.json");
        let broken = dir.path().join("broken.json");
        std::fs::write(&list, "[1, 2]").unwrap();
        std::fs::write(&broken, "{\"data\": ").unwrap();

        assert!(matches!(
            repository().load_contract(&list).await,
            Err(ContractRepositoryError::Invalid(DomainError::InvalidContract(_)))
        ));
        assert!(matches!(
            repository().load_contract(&broken).await,
            Err(ContractRepositoryError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_save_output_as_stable_json() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("out/resolved.json");
        let output = ResolvedContract {
            root_element: json!({"type": "Text", "text": "Hi"}),
        };

        repository().save_output(&path, &output).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"rootElement\": {\n    \"type\": \"Text\",\n    \"text\": \"Hi\"\n  }\n}\n"
        );
    }
}
