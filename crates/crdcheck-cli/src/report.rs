//! # Check Report
//!
//! Aggregated results of a run and their text and JSON renderings.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use crdcheck_schema::ValidationError;
use serde::Serialize;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress and summary.
    #[default]
    Text,
    /// One pretty-printed JSON object.
    Json,
}

/// Findings for one example file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The example file.
    pub path: PathBuf,
    /// Findings in document order; empty when the file passed.
    pub errors: Vec<ValidationError>,
}

impl FileReport {
    /// Returns true if the file has no findings.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Results of validating an examples directory.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Directory the CRDs were loaded from.
    pub schema_dir: PathBuf,
    /// Directory searched for example files.
    pub examples_dir: PathBuf,
    /// Number of served CRD versions indexed.
    pub schema_versions: usize,
    /// One entry per example file, in path order.
    pub files: Vec<FileReport>,
    /// Findings across all files.
    pub total_errors: usize,
    /// Files with at least one finding.
    pub files_with_errors: usize,
}

impl CheckReport {
    /// Assemble a report, computing the totals from `files`.
    pub fn new(
        schema_dir: &Path,
        examples_dir: &Path,
        schema_versions: usize,
        files: Vec<FileReport>,
    ) -> Self {
        let total_errors = files.iter().map(|f| f.errors.len()).sum();
        let files_with_errors = files.iter().filter(|f| !f.passed()).count();
        Self {
            schema_dir: schema_dir.to_path_buf(),
            examples_dir: examples_dir.to_path_buf(),
            schema_versions,
            files,
            total_errors,
            files_with_errors,
        }
    }

    /// Returns true if no example file had findings.
    pub fn passed(&self) -> bool {
        self.total_errors == 0
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Write the report in `format`.
    pub fn render(&self, format: OutputFormat, out: &mut impl Write) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => self.render_text(out),
            OutputFormat::Json => self.render_json(out),
        }
    }

    /// Progress lines, per-file results, and the summary banner.
    pub fn render_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "Loading CRDs from {}...", self.schema_dir.display())?;
        writeln!(out, "Loaded {} CRD versions", self.schema_versions)?;
        writeln!(out, "Checking {} example files...", self.files.len())?;

        for file in &self.files {
            if file.passed() {
                writeln!(out, "✓ {}", file.path.display())?;
            } else {
                writeln!(out, "\n❌ {}:", file.path.display())?;
                for error in &file.errors {
                    writeln!(out, "  - {error}")?;
                }
            }
        }

        writeln!(out, "\n{}", "=".repeat(60))?;
        if self.passed() {
            writeln!(out, "✅ All examples validated successfully!")?;
        } else {
            writeln!(
                out,
                "❌ Found {} errors in {} files",
                self.total_errors, self.files_with_errors
            )?;
            writeln!(out, "\nFiles with errors:")?;
            for file in self.files.iter().filter(|f| !f.passed()) {
                writeln!(out, "  - {}", file.path.display())?;
            }
        }
        Ok(())
    }

    /// Write the report as one pretty-printed JSON object.
    pub fn render_json(&self, out: &mut impl Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crdcheck_schema::{ExampleValidator, SchemaIndex};

    fn findings(content: &str) -> Vec<ValidationError> {
        let index = SchemaIndex::new();
        ExampleValidator::new(&index, Default::default()).validate_str(content)
    }

    fn sample() -> CheckReport {
        CheckReport::new(
            Path::new("crds"),
            Path::new("examples"),
            3,
            vec![
                FileReport {
                    path: PathBuf::from("examples/a.yaml"),
                    errors: Vec::new(),
                },
                FileReport {
                    path: PathBuf::from("examples/b.yaml"),
                    errors: findings(
                        "kind: Widget\napiVersion: example.com/v1\n---\nkind: Gadget\napiVersion: example.com/v1\n",
                    ),
                },
            ],
        )
    }

    fn text(report: &CheckReport) -> String {
        let mut buf = Vec::new();
        report.render_text(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn totals_are_computed() {
        let report = sample();
        assert_eq!(report.total_errors, 2);
        assert_eq!(report.files_with_errors, 1);
        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn text_report_lists_failures() {
        let out = text(&sample());
        assert!(out.starts_with(
            "Loading CRDs from crds...\nLoaded 3 CRD versions\nChecking 2 example files...\n"
        ));
        assert!(out.contains("✓ examples/a.yaml\n"));
        assert!(out.contains(
            "\n❌ examples/b.yaml:\n  - Document 0: No CRD found for Widget in example.com/v1\n  - Document 1: No CRD found for Gadget in example.com/v1\n"
        ));
        assert!(out.contains(&"=".repeat(60)));
        assert!(out.contains(
            "❌ Found 2 errors in 1 files\n\nFiles with errors:\n  - examples/b.yaml\n"
        ));
        assert!(!out.contains("✅"));
    }

    #[test]
    fn text_report_success_banner() {
        let report = CheckReport::new(Path::new("crds"), Path::new("examples"), 0, Vec::new());
        let out = text(&report);
        assert!(out.contains("Checking 0 example files..."));
        assert!(out.ends_with("✅ All examples validated successfully!\n"));
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn json_report_shape() {
        let mut buf = Vec::new();
        sample().render(OutputFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["schema_versions"], 3);
        assert_eq!(value["total_errors"], 2);
        assert_eq!(value["files_with_errors"], 1);
        assert_eq!(value["files"][1]["path"], "examples/b.yaml");
        assert_eq!(value["files"][1]["errors"][0]["document"], 0);
        assert_eq!(value["files"][1]["errors"][0]["category"], "no-schema");
        assert_eq!(value["files"][0]["errors"].as_array().unwrap().len(), 0);
    }
}
