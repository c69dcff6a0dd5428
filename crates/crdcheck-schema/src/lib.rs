//! # crdcheck-schema — Schema Index & Example Validation
//!
//! Cross-checks example manifests against the CustomResourceDefinitions that
//! describe them.
//!
//! ## Schema Index (`index`)
//!
//! [`SchemaIndex::load`] scans a directory of CRD files and indexes every
//! served version by kind, version, and group. Later definitions of the same
//! key replace earlier ones.
//!
//! ## Example Validation (`validate`)
//!
//! [`ExampleValidator`] resolves each example document to an index entry,
//! falling back to a version-agnostic kind + group match, and reports
//! missing `spec` and missing required fields as [`ValidationError`]s.
//!
//! ## Discovery (`discover`)
//!
//! Flat schema file listing and recursive example file listing, both sorted.
//!
//! ## Crate Policy
//!
//! - Depends only on `crdcheck-core` internally.
//! - Findings are data. Only process-level failures are `Err`.

pub mod discover;
pub mod index;
pub mod validate;

pub use discover::{find_example_files, find_schema_files};
pub use index::{SchemaEntry, SchemaIndex, SchemaIndexError};
pub use validate::{validate, ExampleValidator, FindingCategory, ValidationError};
