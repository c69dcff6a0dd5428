//! # Example Document Validation
//!
//! Checks example manifests against the [`SchemaIndex`].
//!
//! For each document in a file, in order:
//!
//! 1. Null documents, non-mappings, and documents without both `kind` and
//!    `apiVersion` are skipped.
//! 2. Documents whose `apiVersion` has no `/` are core resources and are
//!    skipped.
//! 3. The key `{kind}.{version}.{group}` is looked up. If it is missing, a
//!    version-agnostic kind + group match is tried according to
//!    [`FallbackMode`]. With neither, the document gets a "No CRD found"
//!    finding.
//! 4. On a match carrying a schema, the document must have `spec` if the
//!    schema declares `properties.spec`, and must have every top-level
//!    field in the schema's `required` list.
//!
//! Only field presence is checked. Types, formats, and nested constraints
//! are out of scope.

use std::fmt;
use std::path::Path;

use crdcheck_core::{
    parse_documents, read_document_source, ApiVersion, FallbackMode, RequiredFieldScope,
    SchemaKey, ValidationPolicy,
};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::index::{SchemaEntry, SchemaIndex};

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    /// No schema matched the document's kind and API version.
    NoSchema,
    /// The schema declares `spec` but the document has none.
    MissingSpec,
    /// A field in the schema's `required` list is absent.
    MissingRequiredField,
    /// `kind` or `apiVersion` is not a string.
    InvalidField,
    /// The file is not valid YAML.
    ParseFailure,
    /// The file could not be read.
    ReadFailure,
}

/// A finding reported for an example file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Zero-based document index within the file; `None` for file-level findings.
    pub document: Option<usize>,
    /// Kind of finding, used by the JSON report.
    pub category: FindingCategory,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn in_document(document: usize, category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            document: Some(document),
            category,
            message: message.into(),
        }
    }

    fn for_file(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            document: None,
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.document {
            Some(index) => write!(f, "Document {index}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of resolving a document against the index.
#[derive(Debug, Clone, Copy)]
enum Resolution<'a> {
    /// Run field checks against this entry.
    Checked(&'a SchemaEntry),
    /// A schema exists for the kind and group, but no checks run.
    Unchecked,
    Unresolved,
}

/// Validates example documents against a borrowed [`SchemaIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ExampleValidator<'a> {
    index: &'a SchemaIndex,
    policy: ValidationPolicy,
}

impl<'a> ExampleValidator<'a> {
    /// Validator resolving against `index` under `policy`.
    pub fn new(index: &'a SchemaIndex, policy: ValidationPolicy) -> Self {
        Self { index, policy }
    }

    /// The policy findings are produced under.
    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Validate every document in the file at `path`, in document order.
    ///
    /// An unreadable file yields a single read-failure finding.
    pub fn validate_file(&self, path: &Path) -> Vec<ValidationError> {
        let findings = match read_document_source(path) {
            Ok(content) => self.validate_str(&content),
            Err(e) => vec![ValidationError::for_file(
                FindingCategory::ReadFailure,
                format!("Cannot read file: {e}"),
            )],
        };
        tracing::debug!(
            file = %path.display(),
            findings = findings.len(),
            "validated example file"
        );
        findings
    }

    /// Validate every document in a YAML stream.
    ///
    /// A syntax error adds one parse-failure finding and ends validation of
    /// the stream. Findings for documents before the error are kept.
    pub fn validate_str(&self, content: &str) -> Vec<ValidationError> {
        let mut findings = Vec::new();
        for (position, document) in parse_documents(content).enumerate() {
            match document {
                Ok(doc) => findings.extend(self.validate_document(position, &doc)),
                Err(e) => {
                    findings.push(ValidationError::for_file(
                        FindingCategory::ParseFailure,
                        format!("YAML parsing error: {e}"),
                    ));
                    break;
                }
            }
        }
        findings
    }

    /// Validate one parsed document at `position` within its file.
    pub fn validate_document(&self, position: usize, doc: &Value) -> Vec<ValidationError> {
        let mut findings = Vec::new();

        let Some(fields) = doc.as_mapping() else {
            return findings;
        };
        let (Some(kind), Some(api_version)) = (fields.get("kind"), fields.get("apiVersion")) else {
            return findings;
        };
        let Some(api_version) = api_version.as_str() else {
            findings.push(invalid_field(position, "apiVersion"));
            return findings;
        };
        let Some(api) = ApiVersion::parse(api_version) else {
            return findings;
        };
        let Some(kind) = kind.as_str() else {
            findings.push(invalid_field(position, "kind"));
            return findings;
        };

        match self.resolve(kind, &api) {
            Resolution::Checked(entry) => self.check_fields(position, fields, entry, &mut findings),
            Resolution::Unchecked => {}
            Resolution::Unresolved => findings.push(ValidationError::in_document(
                position,
                FindingCategory::NoSchema,
                format!("No CRD found for {kind} in {api_version}"),
            )),
        }
        findings
    }

    fn resolve(&self, kind: &str, api: &ApiVersion) -> Resolution<'a> {
        let key = SchemaKey::for_resource(kind, api);
        if let Some(entry) = self.index.get(&key) {
            return Resolution::Checked(entry);
        }
        if self.policy.fallback == FallbackMode::Disabled {
            return Resolution::Unresolved;
        }
        match self.index.find_any_version(kind, &api.group) {
            Some(entry) => {
                tracing::trace!(requested = %key, matched = %entry.key, "version fallback match");
                match self.policy.fallback {
                    FallbackMode::Strict => Resolution::Checked(entry),
                    FallbackMode::Lenient | FallbackMode::Disabled => Resolution::Unchecked,
                }
            }
            None => Resolution::Unresolved,
        }
    }

    fn check_fields(
        &self,
        position: usize,
        fields: &Mapping,
        entry: &SchemaEntry,
        findings: &mut Vec<ValidationError>,
    ) {
        if entry.declares_spec() && !fields.contains_key("spec") {
            findings.push(ValidationError::in_document(
                position,
                FindingCategory::MissingSpec,
                "Missing required 'spec' field",
            ));
        }

        for field in entry.required_fields() {
            if !fields.contains_key(field) {
                findings.push(missing_field(position, field));
            }
        }

        if self.policy.required_scope == RequiredFieldScope::RootAndSpec {
            if let Some(spec) = fields.get("spec").and_then(Value::as_mapping) {
                for field in entry.spec_required_fields() {
                    if !spec.contains_key(field) {
                        findings.push(missing_field(position, &format!("spec.{field}")));
                    }
                }
            }
        }
    }
}

fn missing_field(position: usize, field: &str) -> ValidationError {
    ValidationError::in_document(
        position,
        FindingCategory::MissingRequiredField,
        format!("Missing required field '{field}'"),
    )
}

fn invalid_field(position: usize, field: &str) -> ValidationError {
    ValidationError::in_document(
        position,
        FindingCategory::InvalidField,
        format!("Field '{field}' must be a string"),
    )
}

/// Validate the file at `path` with the default (reference) policy.
pub fn validate(path: &Path, index: &SchemaIndex) -> Vec<ValidationError> {
    ExampleValidator::new(index, ValidationPolicy::default()).validate_file(path)
}
