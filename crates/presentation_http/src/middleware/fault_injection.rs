//! Fault injection middleware for HTTP services
//!
//! Asks the injector once per request whether the request's fault key
//! triggers. A triggered request never reaches the inner service and gets
//! the configured failure response instead: `500 Injected failure` by
//! default, another status via [`FaultInjectionLayer::with_status`], or any
//! response built from the request via [`FaultInjectionLayer::with_response`].
//!
//! If the request carries an [`InjectionContext`] extension, the decision
//! is context-aware (cancellation, deadline and per-key overrides apply).

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use application::{FaultInjector, InjectionContext};
use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use tracing::debug;

/// Body of the default failure response
pub const INJECTED_FAILURE_BODY: &str = "Injected failure";

/// Builds the failure response for a triggered request
pub type ResponseFactory = Arc<dyn Fn(&Request<Body>) -> Response + Send + Sync>;

fn status_response(status: StatusCode) -> ResponseFactory {
    Arc::new(move |_: &Request<Body>| (status, INJECTED_FAILURE_BODY).into_response())
}

/// Layer that injects failures into HTTP services
#[derive(Clone)]
pub struct FaultInjectionLayer {
    injector: Arc<FaultInjector>,
    key: Arc<str>,
    respond: ResponseFactory,
}

impl fmt::Debug for FaultInjectionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjectionLayer")
            .field("injector", &self.injector)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl FaultInjectionLayer {
    /// Fail requests with `500 Injected failure` whenever `key` triggers
    pub fn new(injector: Arc<FaultInjector>, key: impl Into<Arc<str>>) -> Self {
        Self {
            injector,
            key: key.into(),
            respond: status_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Fail requests with the response built by `respond` whenever `key` triggers
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use application::{FaultInjector, FixedEnvironment};
    /// use axum::{http::{StatusCode, header}, response::IntoResponse};
    /// use presentation_http::FaultInjectionLayer;
    ///
    /// let injector = Arc::new(FaultInjector::new(Arc::new(FixedEnvironment::empty())));
    /// let layer = FaultInjectionLayer::with_response(injector, "upstream", |_req| {
    ///     (
    ///         StatusCode::SERVICE_UNAVAILABLE,
    ///         [(header::RETRY_AFTER, "30")],
    ///         "retry later",
    ///     )
    ///         .into_response()
    /// });
    /// assert_eq!(layer.key(), "upstream");
    /// ```
    pub fn with_response<F>(
        injector: Arc<FaultInjector>,
        key: impl Into<Arc<str>>,
        respond: F,
    ) -> Self
    where
        F: Fn(&Request<Body>) -> Response + Send + Sync + 'static,
    {
        Self {
            injector,
            key: key.into(),
            respond: Arc::new(respond),
        }
    }

    /// Replace the failure response with `<status> Injected failure`
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.respond = status_response(status);
        self
    }

    /// Fault key consulted for every request
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S> Layer<S> for FaultInjectionLayer {
    type Service = FaultInjectionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FaultInjectionService {
            inner,
            injector: Arc::clone(&self.injector),
            key: Arc::clone(&self.key),
            respond: Arc::clone(&self.respond),
        }
    }
}

/// Service that short-circuits requests whose fault key triggers
#[derive(Clone)]
pub struct FaultInjectionService<S> {
    inner: S,
    injector: Arc<FaultInjector>,
    key: Arc<str>,
    respond: ResponseFactory,
}

impl<S: fmt::Debug> fmt::Debug for FaultInjectionService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjectionService")
            .field("inner", &self.inner)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<S> FaultInjectionService<S> {
    fn should_fail(&self, request: &Request<Body>) -> bool {
        request.extensions().get::<InjectionContext>().map_or_else(
            || self.injector.inject(&self.key),
            |ctx| self.injector.inject_with_context(ctx, &self.key),
        )
    }
}

impl<S> Service<Request<Body>> for FaultInjectionService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        if self.should_fail(&request) {
            let response = (self.respond)(&request);
            debug!(
                key = %self.key,
                method = %request.method(),
                path = %request.uri().path(),
                status = response.status().as_u16(),
                "Injected HTTP failure"
            );
            return Box::pin(async move { Ok(response) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
