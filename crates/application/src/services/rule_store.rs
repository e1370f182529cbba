//! Shared store of per-key failure rules and attempt counters
//!
//! Every operation takes the same mutex, so an evaluation reads, increments
//! and compares the counter of a key as one atomic step. Under concurrent
//! callers the attempt numbers handed out for a key form a gapless,
//! duplicate-free sequence in lock-acquisition order.

use std::collections::HashMap;

use domain::{AttemptOutcome, FailureRule, FaultPoint, FaultStatus, RuleSnapshot};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Per-key rules and counters guarded by a single lock
#[derive(Debug, Default)]
pub struct RuleStore {
    points: Mutex<HashMap<String, FaultPoint>>,
}

impl RuleStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a first-N rule, replacing any rule on `key` and zeroing its counter
    pub fn set_first_n(&self, key: &str, limit: i64) {
        self.install(key, FailureRule::FirstN(limit));
    }

    /// Install an Nth-only rule, replacing any rule on `key` and zeroing its counter
    pub fn set_nth_only(&self, key: &str, n: i64) {
        self.install(key, FailureRule::NthOnly(n));
    }

    /// Install `rule` on `key`
    pub fn install(&self, key: &str, rule: FailureRule) {
        let previous = self
            .points
            .lock()
            .insert(key.to_owned(), FaultPoint::new(rule));

        debug!(
            key = %key,
            rule = %rule,
            replaced = ?previous.map(|p| p.rule().label()),
            "Fault rule installed"
        );
    }

    /// Drop every rule and counter
    pub fn reset(&self) {
        let cleared = {
            let mut points = self.points.lock();
            let cleared = points.len();
            points.clear();
            cleared
        };
        info!(cleared, "Fault rules reset");
    }

    /// Count one attempt for `key` and report its number and verdict
    ///
    /// Returns `None` when `key` has no rule. Such keys keep no counter:
    /// configuring a rule starts counting from zero anyway.
    pub fn advance(&self, key: &str) -> Option<AttemptOutcome> {
        let mut points = self.points.lock();
        points.get_mut(key).map(FaultPoint::advance)
    }

    /// Count one attempt for `key` and decide whether it fails
    pub fn evaluate_and_advance(&self, key: &str) -> bool {
        self.advance(key).is_some_and(|outcome| {
            if outcome.injected {
                debug!(key = %key, attempt = outcome.attempt, "Injecting failure");
            }
            outcome.injected
        })
    }

    /// Remaining failures for every key with a first-N rule
    ///
    /// Keys with an Nth-only rule are not reported.
    pub fn status(&self) -> FaultStatus {
        self.points
            .lock()
            .iter()
            .filter_map(|(key, point)| point.remaining().map(|left| (key.clone(), left)))
            .collect()
    }

    /// Configured thresholds of every key, split by rule kind
    pub fn snapshot(&self) -> RuleSnapshot {
        let points = self.points.lock();
        let mut snapshot = RuleSnapshot::default();
        for (key, point) in points.iter() {
            match point.rule() {
                FailureRule::FirstN(limit) => {
                    snapshot.failures.insert(key.clone(), limit);
                },
                FailureRule::NthOnly(n) => {
                    snapshot.precise_failures.insert(key.clone(), n);
                },
            }
        }
        snapshot
    }

    /// Rule currently installed on `key`
    pub fn rule(&self, key: &str) -> Option<FailureRule> {
        self.points.lock().get(key).map(FaultPoint::rule)
    }

    /// Completed evaluations of `key` since its rule was installed
    pub fn attempts(&self, key: &str) -> Option<u64> {
        self.points.lock().get(key).map(FaultPoint::attempts)
    }

    /// Number of keys with a rule
    pub fn len(&self) -> usize {
        self.points.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    #[test]
    fn unknown_key_never_injects() {
        let store = RuleStore::new();
        assert!(!store.evaluate_and_advance("missing"));
        assert!(store.advance("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn first_n_then_stops() {
        let store = RuleStore::new();
        store.set_first_n("db", 2);
        assert!(store.evaluate_and_advance("db"));
        assert!(store.evaluate_and_advance("db"));
        assert!(!store.evaluate_and_advance("db"));
        assert_eq!(store.attempts("db"), Some(3));
    }

    #[test]
    fn nth_only_hits_single_attempt() {
        let store = RuleStore::new();
        store.set_nth_only("pay", 3);
        let verdicts: Vec<bool> = (0..5).map(|_| store.evaluate_and_advance("pay")).collect();
        assert_eq!(verdicts, [false, false, true, false, false]);
    }

    #[test]
    fn switching_rule_kind_resets_counter() {
        let store = RuleStore::new();
        store.set_nth_only("k", 1);
        store.evaluate_and_advance("k");
        store.set_first_n("k", 1);

        assert_eq!(store.rule("k"), Some(FailureRule::FirstN(1)));
        assert_eq!(store.attempts("k"), Some(0));
        assert!(store.evaluate_and_advance("k"));
        assert!(!store.evaluate_and_advance("k"));
    }

    #[test]
    fn keys_are_independent() {
        let store = RuleStore::new();
        store.set_first_n("a", 1);
        store.set_first_n("b", 1);
        assert!(store.evaluate_and_advance("a"));
        assert!(!store.evaluate_and_advance("a"));
        assert!(store.evaluate_and_advance("b"));
    }

    #[test]
    fn status_reports_first_n_only() {
        let store = RuleStore::new();
        store.set_first_n("a", 3);
        store.set_first_n("spent", 1);
        store.set_nth_only("nth", 2);
        store.evaluate_and_advance("a");
        store.evaluate_and_advance("spent");
        store.evaluate_and_advance("spent");

        let status = store.status();
        assert_eq!(status.get("a"), Some(&2));
        assert_eq!(status.get("spent"), Some(&0));
        // Nth-only rules are not part of the status view
        assert!(!status.contains_key("nth"));
    }

    #[test]
    fn snapshot_reports_both_kinds() {
        let store = RuleStore::new();
        store.set_first_n("a", 3);
        store.set_nth_only("b", 5);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.failures.get("a"), Some(&3));
        assert_eq!(snapshot.precise_failures.get("b"), Some(&5));
    }

    #[test]
    fn reset_clears_everything() {
        let store = RuleStore::new();
        store.set_first_n("a", 3);
        store.set_nth_only("b", 1);
        store.reset();
        assert!(store.status().is_empty());
        assert!(!store.evaluate_and_advance("a"));
        assert!(!store.evaluate_and_advance("b"));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn concurrent_attempts_are_gapless() {
        const THREADS: usize = 16;
        const CALLS: usize = 50;

        let store = RuleStore::new();
        store.set_first_n("hot", 100);
        let barrier = Barrier::new(THREADS);

        let mut attempts: Vec<(u64, bool)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        (0..CALLS)
                            .filter_map(|_| store.advance("hot"))
                            .map(|o| (o.attempt, o.injected))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        attempts.sort_unstable();
        let total = THREADS * CALLS;
        assert_eq!(attempts.len(), total);
        for (index, (attempt, injected)) in attempts.iter().enumerate() {
            assert_eq!(*attempt, index as u64 + 1);
            assert_eq!(*injected, *attempt <= 100);
        }
        assert_eq!(store.status().get("hot"), Some(&0));
    }
}
