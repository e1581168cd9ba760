//! Trellis - Main Entry Point
//!
//! Resolves a UI contract file and writes the placeholder-free document.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trellis_application::{ContractResolver, ResolveContractFile, ResolveContractInput};
use trellis_infrastructure::{FileContractRepository, TokioFileSystem, to_json_stable};

/// Resolve a UI contract into a placeholder-free document.
#[derive(Debug, Parser)]
#[command(name = "trellis", version, about)]
struct Cli {
    /// Contract document (.json, .yaml or .yml)
    contract: PathBuf,

    /// Document whose top-level keys are merged into `state`
    state_override: Option<PathBuf>,

    /// Where to write the resolved document; printed to stdout when omitted
    output: Option<PathBuf>,
}

impl Cli {
    fn into_input(self) -> ResolveContractInput {
        let mut input = ResolveContractInput::new(self.contract);
        if let Some(path) = self.state_override {
            input = input.with_state_override(path);
        }
        if let Some(path) = self.output {
            input = input.with_output(path);
        }
        input
    }
}

async fn run(input: ResolveContractInput) -> Result<(), Box<dyn std::error::Error>> {
    let options = config::options_from_env()?;
    info!(
        state_precedence = %options.state_precedence,
        coercion = %options.coercion,
        max_depth = options.max_depth,
        "Starting Trellis v{}",
        env!("CARGO_PKG_VERSION")
    );

    let use_case = ResolveContractFile::new(
        FileContractRepository::new(TokioFileSystem::new()),
        ContractResolver::new(options),
    );
    let output = use_case.execute(&input).await?;

    if input.output_path.is_none() {
        println!("{}", to_json_stable(&output.document)?.trim_end());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the document
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.into_input()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_positionals() {
        let input = Cli::try_parse_from(["trellis", "c.json", "s.yaml", "out.json"])
            .unwrap()
            .into_input();

        assert_eq!(input.contract_path, PathBuf::from("c.json"));
        assert_eq!(input.state_override_path, Some(PathBuf::from("s.yaml")));
        assert_eq!(input.output_path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_contract_only() {
        let input = Cli::try_parse_from(["trellis", "c.json"]).unwrap().into_input();

        assert_eq!(input.state_override_path, None);
        assert_eq!(input.output_path, None);
    }

    #[test]
    fn test_rejects_bad_arity() {
        let missing = Cli::try_parse_from(["trellis"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let extra = Cli::try_parse_from(["trellis", "a", "b", "c", "d"]).unwrap_err();
        assert_eq!(extra.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
