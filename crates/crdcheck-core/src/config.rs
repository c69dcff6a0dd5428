//! # Configuration
//!
//! Settings for schema discovery and validation policy.
//!
//! Resolution order, later layers winning:
//!
//! 1. Built-in defaults (the reference behavior of `check-examples`).
//! 2. A YAML configuration file (`--config`).
//! 3. Environment variables:
//!    - `CRDCHECK_SCHEMA_MARKER`
//!    - `CRDCHECK_FALLBACK` (`lenient` | `strict` | `disabled`)
//!    - `CRDCHECK_REQUIRED_SCOPE` (`root` | `root-and-spec`)
//! 4. Command-line flags (applied by the binary).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// `kind` of a schema definition document.
pub const DEFAULT_SCHEMA_MARKER: &str = "CustomResourceDefinition";

/// Environment variable overriding [`CheckConfig::schema_marker`].
pub const ENV_SCHEMA_MARKER: &str = "CRDCHECK_SCHEMA_MARKER";
/// Environment variable overriding [`CheckConfig::fallback`].
pub const ENV_FALLBACK: &str = "CRDCHECK_FALLBACK";
/// Environment variable overriding [`CheckConfig::required_scope`].
pub const ENV_REQUIRED_SCOPE: &str = "CRDCHECK_REQUIRED_SCOPE";

/// What a version-agnostic (kind + group) match does when the exact
/// `{kind}.{version}.{group}` key is missing from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    /// Suppress "No CRD found" but run no field checks.
    #[default]
    Lenient,
    /// Run field checks against the matched version's schema.
    Strict,
    /// No fallback lookup; only exact keys match.
    Disabled,
}

impl FallbackMode {
    const EXPECTED: &'static str = "lenient, strict, disabled";

    /// The name used in config files, env and flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
            Self::Disabled => "disabled",
        }
    }
}

impl FromStr for FallbackMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            "disabled" => Ok(Self::Disabled),
            other => Err(ConfigError::InvalidValue {
                field: "fallback",
                value: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a schema's `required` field names are looked up in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredFieldScope {
    /// Top-level `required` against the document root only.
    #[default]
    Root,
    /// Additionally, `properties.spec.required` against the document's `spec`.
    RootAndSpec,
}

impl RequiredFieldScope {
    const EXPECTED: &'static str = "root, root-and-spec";

    /// The name used in config files, env and flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::RootAndSpec => "root-and-spec",
        }
    }
}

impl FromStr for RequiredFieldScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "root" => Ok(Self::Root),
            "root-and-spec" => Ok(Self::RootAndSpec),
            other => Err(ConfigError::InvalidValue {
                field: "required-scope",
                value: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for RequiredFieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The knobs that change validation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationPolicy {
    /// Handling of a kind + group match on another version.
    pub fallback: FallbackMode,
    /// Where required fields are checked.
    pub required_scope: RequiredFieldScope,
}

/// Full configuration for a `check-examples` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CheckConfig {
    /// `kind` value that marks a schema definition document.
    pub schema_marker: String,
    /// File extensions (without the dot) scanned in the schema directory.
    pub schema_extensions: Vec<String>,
    /// File extensions (without the dot) scanned in the examples directory.
    pub example_extensions: Vec<String>,
    /// See [`ValidationPolicy::fallback`].
    pub fallback: FallbackMode,
    /// See [`ValidationPolicy::required_scope`].
    pub required_scope: RequiredFieldScope,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            schema_marker: DEFAULT_SCHEMA_MARKER.to_string(),
            schema_extensions: vec!["yaml".to_string()],
            example_extensions: vec!["yaml".to_string(), "yml".to_string()],
            fallback: FallbackMode::default(),
            required_scope: RequiredFieldScope::default(),
        }
    }
}

impl CheckConfig {
    /// Load configuration from a YAML file. Missing keys take their defaults;
    /// an empty file is the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if it is not a valid configuration mapping.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.checked()
    }

    /// Apply `CRDCHECK_*` environment overrides.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(marker) = get(ENV_SCHEMA_MARKER) {
            tracing::debug!(marker = %marker, "schema marker overridden from environment");
            self.schema_marker = marker.trim().to_string();
        }
        if let Some(raw) = get(ENV_FALLBACK) {
            self.fallback = raw.parse()?;
        }
        if let Some(raw) = get(ENV_REQUIRED_SCOPE) {
            self.required_scope = raw.parse()?;
        }
        self.checked()
    }

    /// The validation policy carried by this configuration.
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            fallback: self.fallback,
            required_scope: self.required_scope,
        }
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.schema_marker.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "schema-marker",
                value: self.schema_marker,
                expected: "a non-empty kind name",
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let config = CheckConfig::default();
        assert_eq!(config.schema_marker, "CustomResourceDefinition");
        assert_eq!(config.schema_extensions, ["yaml"]);
        assert_eq!(config.example_extensions, ["yaml", "yml"]);
        assert_eq!(config.policy(), ValidationPolicy::default());
        assert_eq!(config.fallback, FallbackMode::Lenient);
        assert_eq!(config.required_scope, RequiredFieldScope::Root);
    }

    #[test]
    fn fallback_mode_parses_known_values() {
        assert_eq!("lenient".parse::<FallbackMode>().unwrap(), FallbackMode::Lenient);
        assert_eq!("strict".parse::<FallbackMode>().unwrap(), FallbackMode::Strict);
        assert_eq!(" disabled ".parse::<FallbackMode>().unwrap(), FallbackMode::Disabled);
    }

    #[test]
    fn fallback_mode_rejects_unknown_value() {
        let err = "loose".parse::<FallbackMode>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("loose"));
        assert!(msg.contains("lenient, strict, disabled"));
    }

    #[test]
    fn required_scope_round_trips_display() {
        for scope in [RequiredFieldScope::Root, RequiredFieldScope::RootAndSpec] {
            assert_eq!(scope.to_string().parse::<RequiredFieldScope>().unwrap(), scope);
        }
    }

    #[test]
    fn from_file_reads_kebab_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crdcheck.yaml");
        std::fs::write(
            &path,
            "schema-marker: SchemaDefinition\nfallback: strict\nrequired-scope: root-and-spec\nexample-extensions: [yaml]\n",
        )
        .unwrap();

        let config = CheckConfig::from_file(&path).unwrap();
        assert_eq!(config.schema_marker, "SchemaDefinition");
        assert_eq!(config.fallback, FallbackMode::Strict);
        assert_eq!(config.required_scope, RequiredFieldScope::RootAndSpec);
        assert_eq!(config.example_extensions, ["yaml"]);
        // Unspecified keys keep their defaults.
        assert_eq!(config.schema_extensions, ["yaml"]);
    }

    #[test]
    fn from_file_empty_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(CheckConfig::from_file(&path).unwrap(), CheckConfig::default());
    }

    #[test]
    fn from_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "fallbak: strict\n").unwrap();
        let err = CheckConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn from_file_rejects_unknown_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "fallback: sometimes\n").unwrap();
        assert!(matches!(
            CheckConfig::from_file(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn from_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckConfig::from_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn from_file_rejects_blank_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.yaml");
        std::fs::write(&path, "schema-marker: ''\n").unwrap();
        assert!(matches!(
            CheckConfig::from_file(&path).unwrap_err(),
            ConfigError::InvalidValue { field: "schema-marker", .. }
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = CheckConfig::default()
            .apply_overrides(lookup(&[
                (ENV_FALLBACK, "disabled"),
                (ENV_REQUIRED_SCOPE, "root-and-spec"),
                (ENV_SCHEMA_MARKER, "Definition"),
            ]))
            .unwrap();
        assert_eq!(config.fallback, FallbackMode::Disabled);
        assert_eq!(config.required_scope, RequiredFieldScope::RootAndSpec);
        assert_eq!(config.schema_marker, "Definition");
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let config = CheckConfig::default()
            .apply_overrides(lookup(&[(ENV_FALLBACK, ""), (ENV_SCHEMA_MARKER, "  ")]))
            .unwrap();
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn invalid_override_is_an_error() {
        let err = CheckConfig::default()
            .apply_overrides(lookup(&[(ENV_REQUIRED_SCOPE, "spec-only")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "required-scope", .. }
        ));
    }
}
