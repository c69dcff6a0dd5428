//! # check-examples entry point
//!
//! Parses command-line arguments, installs tracing, and runs the check.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crdcheck_cli::check::{resolve_config, run_check, CheckArgs, USAGE};

/// Validate example manifests against CustomResourceDefinitions.
///
/// Every served CRD version in CRD_DIR is indexed by kind, version, and
/// group. Every `.yaml`/`.yml` file under EXAMPLES_DIR is then checked for a
/// matching CRD, a `spec` when the CRD declares one, and the CRD's required
/// top-level fields.
#[derive(Parser, Debug)]
#[command(name = "check-examples", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return argument_error(e),
    };

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("check-examples v{} starting", env!("CARGO_PKG_VERSION"));

    let result = resolve_config(cli.config.as_deref(), &cli.check)
        .and_then(|config| run_check(&cli.check, &config, &mut std::io::stdout().lock()));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Map a clap parse failure to an exit code. Help and version exit 0;
/// missing positional arguments print the one-line usage to stdout.
fn argument_error(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::MissingRequiredArgument => {
            println!("{USAGE}");
            ExitCode::from(1)
        }
        _ => {
            let _ = e.print();
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crdcheck_cli::report::OutputFormat;
    use crdcheck_core::{FallbackMode, RequiredFieldScope};

    #[test]
    fn cli_parse_positional_dirs() {
        let cli = Cli::try_parse_from(["check-examples", "crds", "examples"]).unwrap();
        assert_eq!(cli.check.schema_dir, PathBuf::from("crds"));
        assert_eq!(cli.check.examples_dir, PathBuf::from("examples"));
        assert!(cli.check.fallback.is_none());
        assert!(cli.check.required_scope.is_none());
        assert_eq!(cli.check.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_parse_missing_examples_dir() {
        let err = Cli::try_parse_from(["check-examples", "crds"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn cli_parse_no_args() {
        let err = Cli::try_parse_from(["check-examples"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn cli_parse_policy_flags() {
        let cli = Cli::try_parse_from([
            "check-examples",
            "--fallback",
            "strict",
            "--required-scope",
            "root-and-spec",
            "--format",
            "json",
            "-vv",
            "crds",
            "examples",
        ])
        .unwrap();
        assert_eq!(cli.check.fallback, Some(FallbackMode::Strict));
        assert_eq!(cli.check.required_scope, Some(RequiredFieldScope::RootAndSpec));
        assert_eq!(cli.check.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parse_rejects_unknown_fallback() {
        let err = Cli::try_parse_from(["check-examples", "--fallback", "sometimes", "a", "b"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn cli_parse_rejects_extra_positional() {
        let err = Cli::try_parse_from(["check-examples", "crds", "examples", "extra"])
            .unwrap_err();
        assert_ne!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn cli_parse_config_path() {
        let cli =
            Cli::try_parse_from(["check-examples", "--config", "crdcheck.yaml", "a", "b"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("crdcheck.yaml")));
    }
}
