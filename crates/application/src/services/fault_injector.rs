//! Fault injection decision engine
//!
//! [`FaultInjector`] answers "should this call fail?" for a named fault key.
//! It combines the [`RuleStore`] with the [`EnvironmentPolicy`] gate: in a
//! production-like environment nothing is injected and rule changes are
//! ignored, while `reset` and `status` keep working for cleanup and
//! monitoring.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use application::{FaultInjector, FixedEnvironment};
//!
//! let env = FixedEnvironment::empty().with_var("ENVIRONMENT", "testing");
//! let injector = FaultInjector::new(Arc::new(env));
//!
//! injector.set_failures("db-connect", 2);
//! assert!(injector.inject("db-connect"));
//! assert!(injector.inject("db-connect"));
//! assert!(!injector.inject("db-connect"));
//! ```

use std::sync::Arc;

use domain::{EnvironmentLists, EnvironmentName, FailureRule, FaultStatus, RuleSnapshot};
use tracing::{debug, trace};

use super::{EnvironmentPolicy, InjectionContext, RuleStore};
use crate::ports::EnvironmentPort;

/// Shared, thread-safe fault injection engine
///
/// Construct one per process (or per test) and share it behind an `Arc`.
#[derive(Debug)]
pub struct FaultInjector {
    store: RuleStore,
    policy: EnvironmentPolicy,
}

impl FaultInjector {
    /// Create an injector with the default classification lists
    pub fn new(environment: Arc<dyn EnvironmentPort>) -> Self {
        Self::with_lists(environment, EnvironmentLists::default())
    }

    /// Create an injector with explicit classification lists
    pub fn with_lists(environment: Arc<dyn EnvironmentPort>, lists: EnvironmentLists) -> Self {
        Self {
            store: RuleStore::new(),
            policy: EnvironmentPolicy::with_lists(environment, lists),
        }
    }

    /// Decide whether the current call for `key` fails
    ///
    /// In a production-like environment this returns `false` without
    /// counting the attempt.
    pub fn inject(&self, key: &str) -> bool {
        if self.policy.is_production() {
            trace!(key = %key, "Injection suppressed in production-like environment");
            return false;
        }
        self.store.evaluate_and_advance(key)
    }

    /// Context-aware variant of [`inject`](Self::inject)
    ///
    /// A cancelled or expired context yields `false`; an explicit override
    /// for `key` is returned verbatim. Neither path counts an attempt.
    pub fn inject_with_context(&self, ctx: &InjectionContext, key: &str) -> bool {
        if ctx.is_done() {
            trace!(key = %key, "Context done, skipping injection");
            return false;
        }
        if let Some(forced) = ctx.override_for(key) {
            debug!(key = %key, inject = forced, "Using context override");
            return forced;
        }
        self.inject(key)
    }

    /// Fail the first `count` calls for `key`
    ///
    /// Replaces any rule on `key` and restarts its counter. Ignored in a
    /// production-like environment.
    pub fn set_failures(&self, key: &str, count: i64) {
        self.configure(key, FailureRule::FirstN(count));
    }

    /// Fail only call number `n` for `key`
    ///
    /// Replaces any rule on `key` and restarts its counter. Ignored in a
    /// production-like environment.
    pub fn set_nth_failure(&self, key: &str, n: i64) {
        self.configure(key, FailureRule::NthOnly(n));
    }

    fn configure(&self, key: &str, rule: FailureRule) {
        if self.policy.is_production() {
            debug!(key = %key, rule = %rule, "Ignoring rule change in production-like environment");
            return;
        }
        self.store.install(key, rule);
    }

    /// Clear every rule and counter, regardless of environment
    pub fn reset(&self) {
        self.store.reset();
    }

    /// Remaining failures per first-N key, regardless of environment
    ///
    /// Exhausted keys and keys with a limit of zero or below stay listed
    /// at `0` until [`reset`](Self::reset). Nth-only keys are not listed;
    /// see [`rules`](Self::rules).
    pub fn status(&self) -> FaultStatus {
        self.store.status()
    }

    /// Configured thresholds of every key, both rule kinds
    pub fn rules(&self) -> RuleSnapshot {
        self.store.snapshot()
    }

    /// Replace the list of environments where injection is allowed
    pub fn set_allowed_environments<I>(&self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.policy.set_allowed(names);
    }

    /// Replace the list of production environments
    pub fn set_production_environments<I>(&self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.policy.set_production(names);
    }

    /// Whether injection is currently suppressed
    pub fn is_production(&self) -> bool {
        self.policy.is_production()
    }

    /// Resolved environment name
    pub fn environment(&self) -> EnvironmentName {
        self.policy.resolve_name()
    }

    /// Current classification lists
    pub fn environment_lists(&self) -> EnvironmentLists {
        self.policy.lists()
    }

    /// Completed evaluations of `key`
    pub fn attempts(&self, key: &str) -> Option<u64> {
        self.store.attempts(key)
    }
}
