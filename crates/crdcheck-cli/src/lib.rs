//! # crdcheck-cli — the `check-examples` Command
//!
//! Validates every example manifest under a directory against the
//! CustomResourceDefinitions in a schema directory.
//!
//! ```bash
//! check-examples package/crds examples
//! check-examples --fallback strict --format json package/crds examples
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: every example passed.
//! - `1`: validation findings, missing arguments, a missing input
//!   directory, or an operational error.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers return `Result<u8>`.
//! - Indexing and validation are delegated to `crdcheck-schema`.
//! - The text report layout is stable. CI jobs grep for the `✓`/`❌` markers.

pub mod check;
pub mod report;
