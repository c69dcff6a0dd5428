//! # crdcheck-core — Foundational Types for check-examples
//!
//! This crate defines the primitives shared by the schema index, the example
//! validator, and the `check-examples` binary. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Typed identity.** A schema version is addressed by a [`SchemaKey`]
//!    (kind, version, group), never by an ad-hoc string. The dotted rendering
//!    `{kind}.{version}.{group}` exists only at the `Display` boundary.
//!
//! 2. **Explicit document shape.** YAML documents stay as
//!    `serde_yaml::Value` and every field access goes through a presence or
//!    type check. Absence is never conflated with `null` or `false`.
//!
//! 3. **Policy is configuration.** Behaviors that are quirks of the reference
//!    tool (version fallback, root-level required fields) are selected by
//!    [`ValidationPolicy`], with the reference behavior as the default.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `crdcheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod document;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use config::{CheckConfig, FallbackMode, RequiredFieldScope, ValidationPolicy};
pub use document::{parse_documents, read_document_source, YamlDocuments};
pub use error::{ConfigError, DocumentError};
pub use identity::{ApiVersion, SchemaKey};
