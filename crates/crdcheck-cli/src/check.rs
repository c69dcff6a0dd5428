//! # Check Command
//!
//! Loads the schema index, validates every example file, and renders the
//! report.
//!
//! Missing input directories are reported on stderr with exit code 1 before
//! any schema is read.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use crdcheck_core::{CheckConfig, FallbackMode, RequiredFieldScope};
use crdcheck_schema::{find_example_files, ExampleValidator, SchemaIndex};

use crate::report::{CheckReport, FileReport, OutputFormat};

/// One-line usage, printed when positional arguments are missing.
pub const USAGE: &str = "Usage: check-examples <crd-directory> <examples-directory>";

/// Arguments for a check run.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Directory containing CustomResourceDefinition YAML files (not searched recursively).
    #[arg(value_name = "CRD_DIR")]
    pub schema_dir: PathBuf,

    /// Directory searched recursively for example manifests.
    #[arg(value_name = "EXAMPLES_DIR")]
    pub examples_dir: PathBuf,

    /// What a kind + group match does when the exact version is not served:
    /// lenient, strict, or disabled.
    #[arg(long, value_name = "MODE")]
    pub fallback: Option<FallbackMode>,

    /// Where required fields are checked: root, or root-and-spec.
    #[arg(long, value_name = "SCOPE")]
    pub required_scope: Option<RequiredFieldScope>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Resolve configuration: defaults, then `config_path`, then environment,
/// then command-line flags.
pub fn resolve_config(config_path: Option<&Path>, args: &CheckArgs) -> Result<CheckConfig> {
    let base = match config_path {
        Some(path) => CheckConfig::from_file(path)?,
        None => CheckConfig::default(),
    };
    let mut config = base.apply_env()?;
    if let Some(fallback) = args.fallback {
        config.fallback = fallback;
    }
    if let Some(scope) = args.required_scope {
        config.required_scope = scope;
    }
    tracing::debug!(
        marker = %config.schema_marker,
        fallback = %config.fallback,
        required_scope = %config.required_scope,
        "resolved configuration"
    );
    Ok(config)
}

/// Execute a check run, writing the report to `out`.
///
/// Returns exit code: 0 when every example passed, 1 otherwise.
pub fn run_check(args: &CheckArgs, config: &CheckConfig, out: &mut impl Write) -> Result<u8> {
    if !args.schema_dir.is_dir() {
        eprintln!(
            "Error: CRD directory '{}' does not exist",
            args.schema_dir.display()
        );
        return Ok(1);
    }
    if !args.examples_dir.is_dir() {
        eprintln!(
            "Error: Examples directory '{}' does not exist",
            args.examples_dir.display()
        );
        return Ok(1);
    }

    let report = collect_report(&args.schema_dir, &args.examples_dir, config)?;
    report
        .render(args.format, out)
        .context("failed to write report")?;
    Ok(report.exit_code())
}

/// Build the index from `schema_dir` and validate every example file under
/// `examples_dir`.
pub fn collect_report(
    schema_dir: &Path,
    examples_dir: &Path,
    config: &CheckConfig,
) -> Result<CheckReport> {
    let index = SchemaIndex::load(schema_dir, config).context("failed to load CRDs")?;

    let example_files = find_example_files(examples_dir, &config.example_extensions);
    tracing::info!(count = example_files.len(), "checking example files");

    let validator = ExampleValidator::new(&index, config.policy());
    let files = example_files
        .into_iter()
        .map(|path| FileReport {
            errors: validator.validate_file(&path),
            path,
        })
        .collect();

    Ok(CheckReport::new(schema_dir, examples_dir, index.len(), files))
}
