//! Integration tests for resolving contract files
//!
//! These tests run the file-based flow end to end: documents on disk,
//! the repository adapters, the use case, and the `trellis` binary.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

use trellis_application::{
    ContractResolver, ResolveContractError, ResolveContractFile, ResolveContractInput,
};
use trellis_domain::ResolveError;
use trellis_infrastructure::{FileContractRepository, TokioFileSystem};

const CONTRACT: &str = r#"{
  "data": {"title": "Inbox", "items": [{"type": "Row", "text": "first"}]},
  "state": {"user": "Ann", "theme": "light"},
  "computed": {
    "heading": "${computed.greeting} (${data.title})",
    "greeting": "Hi ${state.user}"
  },
  "rootElement": {
    "type": "Screen",
    "title": "${computed.heading}",
    "theme": "${state.theme}",
    "$children": "${data.items}"
  }
}"#;

fn use_case() -> ResolveContractFile<FileContractRepository<TokioFileSystem>> {
    ResolveContractFile::new(
        FileContractRepository::new(TokioFileSystem::new()),
        ContractResolver::default(),
    )
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_resolve_contract_to_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("screen.json");
    let output = temp_dir.path().join("build/screen.resolved.json");
    std::fs::write(&contract, CONTRACT).unwrap();

    let result = use_case()
        .execute(&ResolveContractInput::new(&contract).with_output(&output))
        .await
        .expect("Failed to resolve contract");

    assert_eq!(result.order, vec!["greeting", "heading"]);
    assert!(result.warnings.is_empty());
    assert_eq!(
        read_json(&output),
        json!({
            "rootElement": {
                "type": "Screen",
                "title": "Hi Ann (Inbox)",
                "theme": "light",
                "children": [{"type": "Row", "text": "first"}]
            }
        })
    );
}

#[tokio::test]
async fn test_yaml_state_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("screen.json");
    let overrides = temp_dir.path().join("state.yaml");
    std::fs::write(&contract, CONTRACT).unwrap();
    std::fs::write(&overrides, "theme: dark\n").unwrap();

    let result = use_case()
        .execute(&ResolveContractInput::new(&contract).with_state_override(&overrides))
        .await
        .unwrap();

    assert_eq!(result.document.root_element["theme"], json!("dark"));
}

#[tokio::test]
async fn test_yaml_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("screen.yaml");
    let output = temp_dir.path().join("screen.out.yaml");
    std::fs::write(
        &contract,
        "state:\n  name: Ann\nrootElement:\n  type: Text\n  text: \"Hello ${state.name}\"\n",
    )
    .unwrap();

    use_case()
        .execute(&ResolveContractInput::new(&contract).with_output(&output))
        .await
        .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("text: Hello Ann"), "{written}");
    assert!(!written.contains("${"));
}

#[tokio::test]
async fn test_resolution_error_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("broken.json");
    let output = temp_dir.path().join("out.json");
    std::fs::write(
        &contract,
        r#"{"computed": {"a": "${computed.b}", "b": "${computed.a}"}, "rootElement": "x"}"#,
    )
    .unwrap();

    let err = use_case()
        .execute(&ResolveContractInput::new(&contract).with_output(&output))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveContractError::Resolve(ResolveError::CircularDependency { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn test_binary_prints_document() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("screen.json");
    std::fs::write(&contract, CONTRACT).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .arg(&contract)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run trellis");

    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["rootElement"]["title"], json!("Hi Ann (Inbox)"));
}

#[test]
fn test_binary_rejects_invalid_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("screen.json");
    std::fs::write(&contract, CONTRACT).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .arg(&contract)
        .env("TRELLIS_MAX_DEPTH", "0")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run trellis");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .output()
        .expect("Failed to run trellis");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_binary_logs_each_warning_once() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let contract = temp_dir.path().join("warned.json");
    std::fs::write(
        &contract,
        r#"{"computed": {"unused": "${}", "ok": "fine"}, "rootElement": "${computed.ok}"}"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .arg(&contract)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to run trellis");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("unused").count(), 1, "{stderr}");
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["rootElement"], json!("fine"));
}
