//! YAML fault spec loader
//!
//! A fault spec is a small YAML document:
//!
//! ```yaml
//! failures:          # first-N rules
//!   db-connect: 2
//! precise-failures:  # Nth-only rules
//!   payment: 3
//! ```
//!
//! Documents are parsed completely before anything touches the injector,
//! so a rejected document leaves the current rules in place.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use application::{FaultInjector, ports::EnvironmentPort};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable seeding first-N rules as `KEY:N,KEY:N`
pub const FAILURE_COUNTS_ENV: &str = "FI_FAILURE_COUNTS";

/// Errors raised while loading a fault spec
#[derive(Debug, Error)]
pub enum SpecError {
    /// Spec file does not exist
    #[error("Fault spec not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Spec file exists but could not be read
    #[error("Failed to read fault spec {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Document is not valid YAML
    #[error("Malformed fault spec: {0}")]
    Malformed(#[source] serde_yaml::Error),

    /// Valid YAML, but a section is not a map of keys to integers
    #[error("Invalid value in fault spec: {0}")]
    InvalidValue(#[source] serde_yaml::Error),
}

/// Parsed fault spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultSpec {
    /// First-N limits per key
    #[serde(default, deserialize_with = "null_as_empty")]
    pub failures: BTreeMap<String, i64>,

    /// Nth-only attempt numbers per key
    #[serde(
        default,
        rename = "precise-failures",
        deserialize_with = "null_as_empty"
    )]
    pub precise_failures: BTreeMap<String, i64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, i64>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl FaultSpec {
    /// Parse a YAML document; an empty document is an empty spec
    pub fn parse(document: &str) -> Result<Self, SpecError> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(document).map_err(SpecError::Malformed)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(SpecError::InvalidValue)
    }

    /// Parse `KEY:N,KEY:N` into first-N rules
    ///
    /// Pairs without a colon or with a non-integer count are skipped.
    pub fn from_failure_counts(raw: &str) -> Self {
        let failures = raw
            .split(',')
            .filter_map(|pair| pair.split_once(':'))
            .filter_map(|(key, count)| {
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                count.trim().parse::<i64>().ok().map(|n| (key.to_string(), n))
            })
            .collect();

        Self {
            failures,
            precise_failures: BTreeMap::new(),
        }
    }

    /// Read [`FAILURE_COUNTS_ENV`] from `environment`
    ///
    /// Returns `None` when the variable is unset or blank.
    pub fn from_env(environment: &dyn EnvironmentPort) -> Option<Self> {
        environment
            .var(FAILURE_COUNTS_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Self::from_failure_counts(&raw))
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty() && self.precise_failures.is_empty()
    }

    /// Replace every rule on `injector` with this spec
    pub fn apply(&self, injector: &FaultInjector) {
        injector.reset();
        for (key, count) in &self.failures {
            injector.set_failures(key, *count);
        }
        for (key, n) in &self.precise_failures {
            injector.set_nth_failure(key, *n);
        }
        info!(
            failures = self.failures.len(),
            precise_failures = self.precise_failures.len(),
            "Fault spec applied"
        );
    }
}

/// Read and parse the spec at `path`
pub fn load_spec(path: impl AsRef<Path>) -> Result<FaultSpec, SpecError> {
    let path = path.as_ref();
    let document = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SpecError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SpecError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    debug!(path = %path.display(), bytes = document.len(), "Read fault spec");
    FaultSpec::parse(&document)
}

/// Load the spec at `path` and apply it to `injector`
///
/// On error the injector is left untouched.
pub fn load_and_apply(
    path: impl AsRef<Path>,
    injector: &FaultInjector,
) -> Result<FaultSpec, SpecError> {
    let spec = load_spec(path)?;
    spec.apply(injector);
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use application::FixedEnvironment;
    use tempfile::NamedTempFile;

    use super::*;

    fn injector() -> FaultInjector {
        FaultInjector::new(Arc::new(
            FixedEnvironment::empty().with_var("ENVIRONMENT", "testing"),
        ))
    }

    fn spec_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_both_sections() {
        let spec = FaultSpec::parse(
            "failures:\n  api-fault: 5\n  db-fault: 3\nprecise-failures:\n  precise-api: 10\n",
        )
        .unwrap();
        assert_eq!(spec.failures.get("api-fault"), Some(&5));
        assert_eq!(spec.failures.get("db-fault"), Some(&3));
        assert_eq!(spec.precise_failures.get("precise-api"), Some(&10));
    }

    #[test]
    fn empty_documents_are_empty_specs() {
        assert!(FaultSpec::parse("").unwrap().is_empty());
        assert!(FaultSpec::parse("  \n").unwrap().is_empty());
        assert!(FaultSpec::parse("---\n").unwrap().is_empty());
        assert!(FaultSpec::parse("failures:\n").unwrap().is_empty());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = FaultSpec::parse("failures:\n  api: 5\n  db: [invalid: yaml").unwrap_err();
        assert!(matches!(err, SpecError::Malformed(_)));
    }

    #[test]
    fn non_integer_values_are_rejected() {
        let err = FaultSpec::parse("failures:\n  api: five\n").unwrap_err();
        assert!(matches!(err, SpecError::InvalidValue(_)));

        let err = FaultSpec::parse("precise-failures:\n  api: 1.5\n").unwrap_err();
        assert!(matches!(err, SpecError::InvalidValue(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_spec("/definitely/not/here/faults.yaml").unwrap_err();
        assert!(matches!(err, SpecError::NotFound { .. }));
        assert!(err.to_string().contains("faults.yaml"));
    }

    #[test]
    fn apply_replaces_existing_rules() {
        let injector = injector();
        injector.set_failures("stale", 9);

        let file = spec_file("failures:\n  db: 1\nprecise-failures:\n  pay: 2\n");
        load_and_apply(file.path(), &injector).unwrap();

        assert!(injector.status().get("stale").is_none());
        assert!(injector.inject("db"));
        assert!(!injector.inject("db"));
        assert!(!injector.inject("pay"));
        assert!(injector.inject("pay"));
    }

    #[test]
    fn rejected_spec_leaves_rules_untouched() {
        let injector = injector();
        injector.set_failures("keep", 2);

        let file = spec_file("failures:\n  keep: not-a-number\n");
        assert!(load_and_apply(file.path(), &injector).is_err());
        assert_eq!(injector.status().get("keep"), Some(&2));
    }

    #[test]
    fn failure_counts_parsing() {
        let spec = FaultSpec::from_failure_counts("EC2:1, STORAGE:0,broken,BAD:x,:3");
        assert_eq!(spec.failures.len(), 2);
        assert_eq!(spec.failures.get("EC2"), Some(&1));
        assert_eq!(spec.failures.get("STORAGE"), Some(&0));
    }

    #[test]
    fn failure_counts_from_env() {
        let env = FixedEnvironment::empty().with_var(FAILURE_COUNTS_ENV, "db:2");
        let spec = FaultSpec::from_env(&env).unwrap();
        assert_eq!(spec.failures.get("db"), Some(&2));

        let blank = FixedEnvironment::empty().with_var(FAILURE_COUNTS_ENV, " ");
        assert!(FaultSpec::from_env(&blank).is_none());
    }
}
