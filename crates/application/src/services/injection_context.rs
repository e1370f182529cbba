//! Per-call context for context-aware injection
//!
//! Carries a cancellation flag, an optional deadline and explicit per-key
//! verdict overrides. Checking the context never blocks; it is a
//! point-in-time read.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag
///
/// Clones observe the same flag, so a caller can hand one clone to a
/// context and cancel it from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as cancelled
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Context accompanying an injection decision
#[derive(Debug, Clone, Default)]
pub struct InjectionContext {
    cancellation: Option<CancellationFlag>,
    deadline: Option<Instant>,
    overrides: HashMap<String, bool>,
}

impl InjectionContext {
    /// Context with no cancellation, deadline or overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a cancellation flag
    #[must_use]
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Expire the context at `deadline`
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Expire the context after `timeout`
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Force the verdict for `key`, bypassing its rule
    #[must_use]
    pub fn with_override(mut self, key: impl Into<String>, inject: bool) -> Self {
        self.overrides.insert(key.into(), inject);
        self
    }

    /// Context that has already been cancelled
    #[must_use]
    pub fn cancelled() -> Self {
        let flag = CancellationFlag::new();
        flag.cancel();
        Self::new().with_cancellation(flag)
    }

    /// Whether the context was cancelled or its deadline has passed
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Explicit verdict for `key`, if any
    #[must_use]
    pub fn override_for(&self, key: &str) -> Option<bool> {
        self.overrides.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_live() {
        let ctx = InjectionContext::new();
        assert!(!ctx.is_done());
        assert!(ctx.override_for("any").is_none());
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let ctx = InjectionContext::new().with_cancellation(flag.clone());
        assert!(!ctx.is_done());
        flag.cancel();
        assert!(ctx.is_done());
    }

    #[test]
    fn elapsed_deadline_marks_done() {
        let ctx = InjectionContext::new().with_deadline(Instant::now());
        assert!(ctx.is_done());

        let ctx = InjectionContext::new().with_timeout(Duration::from_secs(60));
        assert!(!ctx.is_done());
    }

    #[test]
    fn overrides_are_per_key() {
        let ctx = InjectionContext::new()
            .with_override("db", true)
            .with_override("api", false);
        assert_eq!(ctx.override_for("db"), Some(true));
        assert_eq!(ctx.override_for("api"), Some(false));
        assert_eq!(ctx.override_for("cache"), None);
    }

    #[test]
    fn cancelled_constructor() {
        assert!(InjectionContext::cancelled().is_done());
    }
}
