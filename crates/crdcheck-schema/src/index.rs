//! # Schema Index
//!
//! Builds the Group/Version/Kind lookup table from schema definition
//! documents (CRDs).
//!
//! Every served version of every definition becomes one [`SchemaEntry`]
//! keyed by [`SchemaKey`]. Unserved versions are ignored. When two
//! definitions produce the same key, the one loaded later replaces the
//! earlier one; files are loaded in sorted path order, so "later" is
//! alphabetical.
//!
//! Malformed input never aborts the build. Unreadable files, YAML syntax
//! errors, and definitions missing their group, kind, or version list are
//! logged at `warn` and skipped.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crdcheck_core::{parse_documents, read_document_source, CheckConfig, SchemaKey};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::discover::find_schema_files;

/// Error building a schema index.
#[derive(Error, Debug)]
pub enum SchemaIndexError {
    /// The schema directory could not be listed.
    #[error("cannot read schema directory '{path}': {source}")]
    ReadDir {
        /// The schema directory.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },
}

/// One served version of one schema definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    /// Kind, version, and group of this entry.
    pub key: SchemaKey,
    /// The definition's `metadata.name`, if it has one.
    pub definition_name: Option<String>,
    /// The version's `schema.openAPIV3Schema`, or an empty mapping.
    pub schema: Value,
    /// File the definition was loaded from.
    pub source_file: PathBuf,
}

impl SchemaEntry {
    /// Whether the schema declares a `spec` property (present and not null).
    /// An empty mapping (`spec: {}`) counts as declared.
    pub fn declares_spec(&self) -> bool {
        self.spec_schema().is_some()
    }

    /// Names in the schema's top-level `required` list.
    ///
    /// Non-string items are ignored.
    pub fn required_fields(&self) -> Vec<&str> {
        string_items(self.schema.get("required"))
    }

    /// Names in `properties.spec.required`.
    pub fn spec_required_fields(&self) -> Vec<&str> {
        string_items(self.spec_schema().and_then(|s| s.get("required")))
    }

    fn spec_schema(&self) -> Option<&Value> {
        self.schema
            .get("properties")
            .and_then(|p| p.get("spec"))
            .filter(|s| !s.is_null())
    }
}

fn string_items(list: Option<&Value>) -> Vec<&str> {
    list.and_then(Value::as_sequence)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Why a schema definition document was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MalformedDefinition {
    MissingField(&'static str),
}

impl fmt::Display for MalformedDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing or non-string '{field}'"),
        }
    }
}

/// Read-only map from [`SchemaKey`] to [`SchemaEntry`].
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    entries: BTreeMap<SchemaKey, SchemaEntry>,
}

impl SchemaIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from every schema file in `schema_dir`.
    ///
    /// Scans the directory (non-recursively) for files with one of
    /// `config.schema_extensions`, in sorted order, and indexes documents
    /// whose `kind` equals `config.schema_marker`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaIndexError::ReadDir` if the directory cannot be listed.
    /// Problems inside individual files are logged, never returned.
    pub fn load(schema_dir: &Path, config: &CheckConfig) -> Result<Self, SchemaIndexError> {
        let files = find_schema_files(schema_dir, &config.schema_extensions).map_err(|source| {
            SchemaIndexError::ReadDir {
                path: schema_dir.to_path_buf(),
                source,
            }
        })?;

        let mut index = Self::new();
        for path in &files {
            index.load_file(path, &config.schema_marker);
        }

        tracing::info!(
            dir = %schema_dir.display(),
            files = files.len(),
            versions = index.len(),
            "loaded schema index"
        );
        Ok(index)
    }

    /// Index the definitions in one file. Returns the number of versions stored.
    pub fn load_file(&mut self, path: &Path, marker: &str) -> usize {
        match read_document_source(path) {
            Ok(content) => self.insert_yaml_str(&content, path, marker),
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %e,
                    "skipping unreadable schema file"
                );
                0
            }
        }
    }

    /// Build an index from an in-memory YAML stream.
    pub fn from_yaml_str(content: &str, source: &Path, marker: &str) -> Self {
        let mut index = Self::new();
        index.insert_yaml_str(content, source, marker);
        index
    }

    /// Index the definitions in a YAML stream attributed to `source`.
    ///
    /// Returns the number of versions stored. A document that fails to
    /// parse is skipped; a syntax error the parser cannot recover from ends
    /// the stream, keeping the definitions before it.
    pub fn insert_yaml_str(&mut self, content: &str, source: &Path, marker: &str) -> usize {
        let mut stored = 0;
        for (position, document) in parse_documents(content).enumerate() {
            match document {
                Ok(doc) => stored += self.insert_document(&doc, source, marker),
                Err(e) => {
                    tracing::warn!(
                        file = %source.display(),
                        document = position,
                        error = %e,
                        "error parsing schema file"
                    );
                }
            }
        }
        stored
    }

    /// Index one parsed document. Documents whose `kind` is not `marker`
    /// are ignored. Returns the number of versions stored.
    pub fn insert_document(&mut self, doc: &Value, source: &Path, marker: &str) -> usize {
        if doc.get("kind").and_then(Value::as_str) != Some(marker) {
            return 0;
        }
        match definition_entries(doc, source) {
            Ok(entries) => {
                let stored = entries.len();
                for entry in entries {
                    self.insert(entry);
                }
                stored
            }
            Err(reason) => {
                let name = doc
                    .get("metadata")
                    .and_then(|m| m.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("<unnamed>");
                tracing::warn!(
                    file = %source.display(),
                    name,
                    %reason,
                    "skipping malformed schema definition"
                );
                0
            }
        }
    }

    /// Store `entry`, replacing and returning any entry with the same key.
    pub fn insert(&mut self, entry: SchemaEntry) -> Option<SchemaEntry> {
        tracing::debug!(
            key = %entry.key,
            file = %entry.source_file.display(),
            "indexed schema version"
        );
        let previous = self.entries.insert(entry.key.clone(), entry);
        if let Some(prev) = &previous {
            tracing::debug!(
                key = %prev.key,
                replaced = %prev.source_file.display(),
                "schema version redefined; keeping the later definition"
            );
        }
        previous
    }

    /// Exact lookup.
    pub fn get(&self, key: &SchemaKey) -> Option<&SchemaEntry> {
        self.entries.get(key)
    }

    /// First entry, in key order, whose rendered key starts with `{kind}.`
    /// and ends with `.{group}`, regardless of version.
    pub fn find_any_version(&self, kind: &str, group: &str) -> Option<&SchemaEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key.matches_kind_and_group(kind, group))
            .map(|(_, entry)| entry)
    }

    /// Number of indexed versions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.values()
    }
}

/// Entries for every served version of a definition document.
fn definition_entries(doc: &Value, source: &Path) -> Result<Vec<SchemaEntry>, MalformedDefinition> {
    let spec = doc
        .get("spec")
        .filter(|s| s.is_mapping())
        .ok_or(MalformedDefinition::MissingField("spec"))?;
    let group = spec
        .get("group")
        .and_then(Value::as_str)
        .ok_or(MalformedDefinition::MissingField("spec.group"))?;
    let kind = spec
        .get("names")
        .and_then(|n| n.get("kind"))
        .and_then(Value::as_str)
        .ok_or(MalformedDefinition::MissingField("spec.names.kind"))?;
    let versions = spec
        .get("versions")
        .and_then(Value::as_sequence)
        .ok_or(MalformedDefinition::MissingField("spec.versions"))?;
    let definition_name = doc
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut entries = Vec::new();
    for version in versions {
        if version.get("served").and_then(Value::as_bool) != Some(true) {
            continue;
        }
        let Some(name) = version.get("name").and_then(Value::as_str) else {
            tracing::warn!(
                file = %source.display(),
                kind,
                group,
                "skipping served version without a name"
            );
            continue;
        };
        let schema = version
            .get("schema")
            .and_then(|s| s.get("openAPIV3Schema"))
            .filter(|s| !s.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Mapping(Mapping::new()));

        entries.push(SchemaEntry {
            key: SchemaKey::new(kind, name, group),
            definition_name: definition_name.clone(),
            schema,
            source_file: source.to_path_buf(),
        });
    }
    Ok(entries)
}
