//! Behavioral properties of the fault injector
//!
//! Each test builds its own injector, so no state is shared between tests.

use std::sync::{Arc, Barrier};
use std::thread;

use application::{FaultInjector, FixedEnvironment, InjectionContext};
use proptest::prelude::*;

fn injector() -> FaultInjector {
    FaultInjector::new(Arc::new(
        FixedEnvironment::empty().with_var("ENV", "staging"),
    ))
}

proptest! {
    #[test]
    fn first_n_limit_then_clean(limit in 1i64..60, extra in 1usize..20) {
        let injector = injector();
        injector.set_failures("k", limit);
        let limit = usize::try_from(limit).unwrap();

        for call in 1..=limit + extra {
            prop_assert_eq!(injector.inject("k"), call <= limit);
        }
    }

    #[test]
    fn nth_only_exact_attempt(n in 1i64..60, extra in 1usize..20) {
        let injector = injector();
        injector.set_nth_failure("k", n);
        let n = usize::try_from(n).unwrap();

        for call in 1..=n + extra {
            prop_assert_eq!(injector.inject("k"), call == n);
        }
    }

    #[test]
    fn non_positive_never_injects(value in -100i64..=0, calls in 1usize..30) {
        let injector = injector();
        injector.set_failures("first", value);
        injector.set_nth_failure("nth", value);
        for _ in 0..calls {
            prop_assert!(!injector.inject("first"));
            prop_assert!(!injector.inject("nth"));
        }
    }

    #[test]
    fn reconfiguring_restarts_the_count(first in 1i64..20, second in 1i64..20, used in 0usize..20) {
        let injector = injector();
        injector.set_failures("k", first);
        for _ in 0..used {
            injector.inject("k");
        }
        injector.set_failures("k", second);
        prop_assert_eq!(injector.status().get("k").copied(), Some(u64::try_from(second).unwrap()));
    }
}

#[test]
fn ten_concurrent_callers_record_ten_attempts() {
    let injector = injector();
    injector.set_failures("k", 100);
    let barrier = Barrier::new(10);

    thread::scope(|scope| {
        for _ in 0..10 {
            scope.spawn(|| {
                barrier.wait();
                injector.inject("k");
            });
        }
    });

    assert_eq!(injector.status()["k"], 90);
}

#[test]
fn cancelled_context_leaves_status_unchanged() {
    let injector = injector();
    injector.set_failures("k", 4);
    let before = injector.status();
    assert!(!injector.inject_with_context(&InjectionContext::cancelled(), "k"));
    assert_eq!(injector.status(), before);
}

#[test]
fn production_window_ignores_configuration() {
    let injector = FaultInjector::new(Arc::new(
        FixedEnvironment::empty().with_var("ENVIRONMENT", "production"),
    ));
    injector.set_failures("k", 3);
    injector.set_nth_failure("n", 1);
    assert!(injector.status().is_empty());
    assert!(injector.rules().is_empty());
    assert!(!injector.inject("k"));
}

#[test]
fn nth_only_is_invisible_to_status() {
    // Status only covers first-N rules; `rules()` shows both kinds
    let injector = injector();
    injector.set_nth_failure("n", 3);
    assert!(injector.status().is_empty());
    assert_eq!(injector.rules().precise_failures.get("n"), Some(&3));
}
