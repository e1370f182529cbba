//! Deployment environment classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default names treated as safe for fault injection
pub const DEFAULT_ALLOWED_ENVIRONMENTS: [&str; 3] = ["development", "staging", "testing"];

/// Default names treated as production
pub const DEFAULT_PRODUCTION_ENVIRONMENTS: [&str; 2] = ["production", "prod"];

/// Normalized (trimmed, lowercase) environment name
///
/// An empty name means no environment variable was set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Normalize a raw name
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// Name used when no environment is configured
    #[must_use]
    pub const fn unset() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<unset>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Classification of an environment name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentClass {
    /// Listed as production
    Production,
    /// Listed as allowed for fault injection
    Allowed,
    /// Empty or not listed anywhere
    Unclassified,
}

impl EnvironmentClass {
    /// Production and unclassified environments suppress injection
    #[must_use]
    pub const fn is_production_like(self) -> bool {
        !matches!(self, Self::Allowed)
    }
}

/// The two classification lists
///
/// Entries are stored normalized so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentLists {
    allowed: Vec<String>,
    production: Vec<String>,
}

impl Default for EnvironmentLists {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ENVIRONMENTS, DEFAULT_PRODUCTION_ENVIRONMENTS)
    }
}

impl EnvironmentLists {
    /// Build lists from arbitrary names
    pub fn new<A, P>(allowed: A, production: P) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            allowed: normalize(allowed),
            production: normalize(production),
        }
    }

    #[must_use]
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    #[must_use]
    pub fn production(&self) -> &[String] {
        &self.production
    }

    /// Replace the allowed list
    pub fn set_allowed<I>(&mut self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.allowed = normalize(names);
    }

    /// Replace the production list
    pub fn set_production<I>(&mut self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.production = normalize(names);
    }

    /// Classify a name; the production list wins over the allowed list
    #[must_use]
    pub fn classify(&self, name: &EnvironmentName) -> EnvironmentClass {
        if name.is_empty() {
            return EnvironmentClass::Unclassified;
        }
        if self.production.iter().any(|p| p == name.as_str()) {
            EnvironmentClass::Production
        } else if self.allowed.iter().any(|a| a == name.as_str()) {
            EnvironmentClass::Allowed
        } else {
            EnvironmentClass::Unclassified
        }
    }
}

fn normalize<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| EnvironmentName::new(name).0)
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_normalized() {
        assert_eq!(EnvironmentName::new("  Staging ").as_str(), "staging");
        assert!(EnvironmentName::new("   ").is_empty());
        assert_eq!(EnvironmentName::unset().to_string(), "<unset>");
    }

    #[test]
    fn default_lists() {
        let lists = EnvironmentLists::default();
        assert_eq!(lists.allowed(), ["development", "staging", "testing"]);
        assert_eq!(lists.production(), ["production", "prod"]);
    }

    #[test]
    fn classify_defaults() {
        let lists = EnvironmentLists::default();
        assert_eq!(
            lists.classify(&EnvironmentName::new("PROD")),
            EnvironmentClass::Production
        );
        assert_eq!(
            lists.classify(&EnvironmentName::new("testing")),
            EnvironmentClass::Allowed
        );
        assert_eq!(
            lists.classify(&EnvironmentName::new("qa")),
            EnvironmentClass::Unclassified
        );
        assert_eq!(
            lists.classify(&EnvironmentName::unset()),
            EnvironmentClass::Unclassified
        );
    }

    #[test]
    fn production_list_takes_priority() {
        let lists = EnvironmentLists::new(["staging"], ["staging"]);
        assert_eq!(
            lists.classify(&EnvironmentName::new("staging")),
            EnvironmentClass::Production
        );
    }

    #[test]
    fn setters_replace_wholesale() {
        let mut lists = EnvironmentLists::default();
        lists.set_allowed(["QA", ""]);
        assert_eq!(lists.allowed(), ["qa"]);
        assert_eq!(
            lists.classify(&EnvironmentName::new("development")),
            EnvironmentClass::Unclassified
        );

        lists.set_production(Vec::<String>::new());
        assert_eq!(
            lists.classify(&EnvironmentName::new("production")),
            EnvironmentClass::Unclassified
        );
    }

    #[test]
    fn only_allowed_is_not_production_like() {
        assert!(EnvironmentClass::Production.is_production_like());
        assert!(EnvironmentClass::Unclassified.is_production_like());
        assert!(!EnvironmentClass::Allowed.is_production_like());
    }
}
