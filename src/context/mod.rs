//! Deferred per-request context construction.
//!
//! The engine, not the adapter, decides whether and when GraphQL context
//! is built (it may skip it entirely for fast-path error responses). The
//! adapter therefore hands the engine a zero-argument thunk closing over
//! the platform-native request view; resolving the thunk invokes the
//! caller-supplied builder at most once, enforced by `FnOnce`.

use std::sync::Arc;

use axum::http::{request::Parts, HeaderMap, Method, Uri};

/// Platform-native per-request view handed to the context builder.
#[derive(Debug, Clone)]
pub struct RequestScope {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestScope {
    pub(crate) fn new(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Caller-supplied builder from the platform request view to the
/// engine's context value.
pub type ContextBuilderFn<Ctx> = dyn Fn(RequestScope) -> Ctx + Send + Sync;

/// Zero-argument thunk the engine resolves to obtain its context value.
///
/// Construction is lazy and at-most-once per request: the builder runs
/// only if the engine calls [`resolve`](Self::resolve), and consuming
/// `self` makes a second resolution unrepresentable.
pub struct ContextThunk<Ctx> {
    build: Box<dyn FnOnce() -> Ctx + Send>,
}

impl<Ctx: 'static> ContextThunk<Ctx> {
    pub(crate) fn new(builder: Arc<ContextBuilderFn<Ctx>>, scope: RequestScope) -> Self {
        Self {
            build: Box::new(move || builder(scope)),
        }
    }

    /// Run the context builder against the captured request scope.
    pub fn resolve(self) -> Ctx {
        (self.build)()
    }
}
