//! Production gate derived from environment variables
//!
//! The environment name is re-read on every call, so changing a variable
//! or a classification list mid-process takes effect immediately.

use std::fmt;
use std::sync::Arc;

use domain::{EnvironmentClass, EnvironmentLists, EnvironmentName};
use parking_lot::RwLock;

use crate::ports::EnvironmentPort;

/// Variables consulted for the environment name, highest priority first
pub const ENVIRONMENT_VARIABLES: [&str; 3] = ["ENVIRONMENT", "ENV", "GO_ENV"];

/// Decides whether the process runs in a production-like environment
pub struct EnvironmentPolicy {
    source: Arc<dyn EnvironmentPort>,
    lists: RwLock<EnvironmentLists>,
}

impl fmt::Debug for EnvironmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentPolicy")
            .field("lists", &*self.lists.read())
            .finish_non_exhaustive()
    }
}

impl EnvironmentPolicy {
    /// Create a policy with the default classification lists
    pub fn new(source: Arc<dyn EnvironmentPort>) -> Self {
        Self::with_lists(source, EnvironmentLists::default())
    }

    /// Create a policy with explicit classification lists
    pub fn with_lists(source: Arc<dyn EnvironmentPort>, lists: EnvironmentLists) -> Self {
        Self {
            source,
            lists: RwLock::new(lists),
        }
    }

    /// First non-empty value among [`ENVIRONMENT_VARIABLES`], normalized
    pub fn resolve_name(&self) -> EnvironmentName {
        ENVIRONMENT_VARIABLES
            .iter()
            .filter_map(|name| self.source.var(name))
            .map(EnvironmentName::new)
            .find(|name| !name.is_empty())
            .unwrap_or_else(EnvironmentName::unset)
    }

    /// Classify the current environment
    pub fn classify(&self) -> EnvironmentClass {
        let name = self.resolve_name();
        self.lists.read().classify(&name)
    }

    /// Whether injection must be suppressed
    ///
    /// Unknown and empty environment names count as production.
    pub fn is_production(&self) -> bool {
        self.classify().is_production_like()
    }

    /// Replace the allowed (non-production) list
    pub fn set_allowed<I>(&self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.lists.write().set_allowed(names);
    }

    /// Replace the production list
    pub fn set_production<I>(&self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.lists.write().set_production(names);
    }

    /// Copy of the current classification lists
    pub fn lists(&self) -> EnvironmentLists {
        self.lists.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedEnvironment, MockEnvironmentPort};

    fn policy(env: FixedEnvironment) -> EnvironmentPolicy {
        EnvironmentPolicy::new(Arc::new(env))
    }

    #[test]
    fn variable_priority_order() {
        let env = FixedEnvironment::empty()
            .with_var("GO_ENV", "production")
            .with_var("ENV", "staging");
        let policy = policy(env);
        assert_eq!(policy.resolve_name().as_str(), "staging");
        assert!(!policy.is_production());
    }

    #[test]
    fn empty_values_are_skipped() {
        let env = FixedEnvironment::empty()
            .with_var("ENVIRONMENT", "")
            .with_var("ENV", "  ")
            .with_var("GO_ENV", "Development");
        assert_eq!(policy(env).resolve_name().as_str(), "development");
    }

    #[test]
    fn unset_environment_is_production() {
        let policy = policy(FixedEnvironment::empty());
        assert!(policy.resolve_name().is_empty());
        assert_eq!(policy.classify(), EnvironmentClass::Unclassified);
        assert!(policy.is_production());
    }

    #[test]
    fn unknown_environment_is_production() {
        let policy = policy(FixedEnvironment::empty().with_var("ENVIRONMENT", "qa"));
        assert!(policy.is_production());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let policy = policy(FixedEnvironment::empty().with_var("ENVIRONMENT", "PRODUCTION"));
        assert_eq!(policy.classify(), EnvironmentClass::Production);
    }

    #[test]
    fn list_changes_apply_immediately() {
        let policy = policy(FixedEnvironment::empty().with_var("ENVIRONMENT", "qa"));
        assert!(policy.is_production());

        policy.set_allowed(["qa"]);
        assert!(!policy.is_production());

        policy.set_production(["qa"]);
        assert!(policy.is_production());
        assert_eq!(policy.lists().production(), ["qa"]);
    }

    #[test]
    fn environment_is_read_on_every_call() {
        let mut mock = MockEnvironmentPort::new();
        let mut calls = 0;
        mock.expect_var().returning(move |name| {
            if name != "ENVIRONMENT" {
                return None;
            }
            calls += 1;
            Some(if calls == 1 { "testing" } else { "production" }.to_string())
        });

        let policy = EnvironmentPolicy::new(Arc::new(mock));
        assert!(!policy.is_production());
        assert!(policy.is_production());
    }
}
