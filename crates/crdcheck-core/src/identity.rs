//! # Resource Identity
//!
//! Group/Version/Kind identity for schema definitions and the example
//! documents checked against them.
//!
//! A [`SchemaKey`] renders as `{kind}.{version}.{group}`, the form used in
//! index keys and diagnostics. An [`ApiVersion`] is the `group/version`
//! string carried by a resource document, split on the last `/`.

use std::fmt;

/// Identity of one served version of a schema definition.
///
/// Ordering is field-wise (kind, version, group), which gives the index a
/// stable iteration order for the version-agnostic fallback scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey {
    /// Resource kind, e.g. `Widget`.
    pub kind: String,
    /// Version name, e.g. `v1alpha1`.
    pub version: String,
    /// API group, e.g. `example.com`.
    pub group: String,
}

impl SchemaKey {
    /// Build a key from its three components.
    pub fn new(
        kind: impl Into<String>,
        version: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            version: version.into(),
            group: group.into(),
        }
    }

    /// Key for a resource document of `kind` declaring `api_version`.
    pub fn for_resource(kind: &str, api_version: &ApiVersion) -> Self {
        Self::new(kind, &api_version.version, &api_version.group)
    }

    /// Whether the dotted rendering of this key starts with `{kind}.` and
    /// ends with `.{group}`.
    ///
    /// This is a string match on the rendered key, not a component
    /// comparison: a key for group `sub.example.com` also matches group
    /// `example.com`.
    pub fn matches_kind_and_group(&self, kind: &str, group: &str) -> bool {
        let rendered = self.to_string();
        rendered.starts_with(&format!("{kind}.")) && rendered.ends_with(&format!(".{group}"))
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.kind, self.version, self.group)
    }
}

/// A group-qualified API version (`group/version`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    /// Everything before the last `/`.
    pub group: String,
    /// Everything after the last `/`.
    pub version: String,
}

impl ApiVersion {
    /// Parse a document's `apiVersion`.
    ///
    /// Returns `None` when there is no `/`: such documents are core
    /// resources (`v1`) and carry no group to look up.
    pub fn parse(raw: &str) -> Option<Self> {
        let (group, version) = raw.rsplit_once('/')?;
        Some(Self {
            group: group.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.version)
    }
}
