//! Convenience wrappers around the decision engine
//!
//! These helpers make exactly one injection decision per call and turn a
//! positive verdict into an error. They hold no state of their own.

use std::sync::Arc;

use super::{FaultInjector, InjectionContext};
use crate::error::{DEFAULT_INJECTED_MESSAGE, InjectedError};

impl FaultInjector {
    /// Run `failure` when `key` triggers, otherwise succeed without calling it
    ///
    /// `failure` supplies the caller's own failure behavior, typically a
    /// closure returning the error the real operation would produce.
    pub fn inject_with_fn<E, F>(&self, key: &str, failure: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        if self.inject(key) { failure() } else { Ok(()) }
    }

    /// Context-aware variant of [`inject_with_fn`](Self::inject_with_fn)
    pub fn inject_with_fn_context<E, F>(
        &self,
        ctx: &InjectionContext,
        key: &str,
        failure: F,
    ) -> Result<(), E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        if self.inject_with_context(ctx, key) {
            failure()
        } else {
            Ok(())
        }
    }

    /// Return an [`InjectedError`] carrying `message` when `key` triggers
    pub fn inject_with_error(&self, key: &str, message: &str) -> Result<(), InjectedError> {
        if self.inject(key) {
            Err(InjectedError::new(key, message))
        } else {
            Ok(())
        }
    }

    /// Context-aware variant of [`inject_with_error`](Self::inject_with_error)
    pub fn inject_with_context_error(
        &self,
        ctx: &InjectionContext,
        key: &str,
        message: &str,
    ) -> Result<(), InjectedError> {
        if self.inject_with_context(ctx, key) {
            Err(InjectedError::new(key, message))
        } else {
            Ok(())
        }
    }
}

/// Decorate `operation` so that it fails whenever `key` triggers
///
/// When the key triggers, `operation` is not called and an
/// [`InjectedError`] converted into `E` is returned instead.
pub fn with_fault_injection<T, R, E, F>(
    injector: Arc<FaultInjector>,
    key: impl Into<String>,
    operation: F,
) -> impl Fn(T) -> Result<R, E>
where
    F: Fn(T) -> Result<R, E>,
    E: From<InjectedError>,
{
    let key = key.into();
    move |input: T| {
        injector.inject_with_error(&key, DEFAULT_INJECTED_MESSAGE)?;
        operation(input)
    }
}

/// Context-aware variant of [`with_fault_injection`]
pub fn with_fault_injection_context<T, R, E, F>(
    injector: Arc<FaultInjector>,
    key: impl Into<String>,
    operation: F,
) -> impl Fn(&InjectionContext, T) -> Result<R, E>
where
    F: Fn(T) -> Result<R, E>,
    E: From<InjectedError>,
{
    let key = key.into();
    move |ctx: &InjectionContext, input: T| {
        injector.inject_with_context_error(ctx, &key, DEFAULT_INJECTED_MESSAGE)?;
        operation(input)
    }
}
