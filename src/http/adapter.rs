//! Request/response adapter.
//!
//! # Responsibilities
//! - Enforce the parsed-body precondition before any translation
//! - Build the canonical request and the deferred context thunk
//! - Invoke the engine exactly once per request
//! - Render the engine's response onto the outbound object
//!
//! # Design Decisions
//! - The missing-body precondition is a configuration error signal: a
//!   fixed 500 diagnostic, the engine is never called
//! - Engine faults are not caught here; the tower `Service` error type
//!   carries them to the host framework's own error handling
//! - Engine startup is asserted once at construction, not per request

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tower::Service;

use crate::context::{ContextBuilderFn, ContextThunk, RequestScope};
use crate::engine::{Engine, EngineFault};
use crate::http::inbound::{canonicalize, ParsedBody};
use crate::http::outbound::{render, FlushSignal};

/// Diagnostic returned when the upstream body-parsing layer never ran.
const MISSING_PARSED_BODY: &str = "GraphQL request body was not parsed. \
    A body-parsing layer must be installed ahead of the GraphQL adapter \
    so the parsed body extension is populated before requests reach it.";

/// Translates one inbound request into a canonical engine call and the
/// engine's response back onto the outbound object.
pub struct GraphqlAdapter<E: Engine> {
    engine: Arc<E>,
    context_builder: Arc<ContextBuilderFn<E::Context>>,
}

impl<E: Engine> Clone for GraphqlAdapter<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            context_builder: self.context_builder.clone(),
        }
    }
}

impl<E: Engine> GraphqlAdapter<E>
where
    E::Context: Default,
{
    /// Adapter with the default context builder, producing an empty
    /// context value per request.
    pub fn new(engine: Arc<E>) -> Self {
        engine.assert_started("GraphqlAdapter::new");
        Self::build(engine, Arc::new(|_: RequestScope| E::Context::default()))
    }
}

impl<E: Engine> GraphqlAdapter<E> {
    /// Adapter with a caller-supplied context builder. The builder is
    /// invoked by the engine (via the per-request thunk), at most once
    /// per request, and only if the engine asks for context at all.
    pub fn with_context(
        engine: Arc<E>,
        builder: impl Fn(RequestScope) -> E::Context + Send + Sync + 'static,
    ) -> Self {
        engine.assert_started("GraphqlAdapter::with_context");
        Self::build(engine, Arc::new(builder))
    }

    fn build(engine: Arc<E>, context_builder: Arc<ContextBuilderFn<E::Context>>) -> Self {
        Self {
            engine,
            context_builder,
        }
    }

    /// Handle one inbound request: exactly one engine round trip.
    pub async fn handle(&self, request: Request<Body>) -> Result<Response<Body>, EngineFault> {
        let (parts, _) = request.into_parts();

        let Some(parsed) = parts.extensions.get::<ParsedBody>().cloned() else {
            tracing::warn!(
                uri = %parts.uri,
                "parsed body extension missing; body-parsing layer does not appear to be installed"
            );
            let mut response = Response::new(Body::from(MISSING_PARSED_BODY));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return Ok(response);
        };

        let flush = parts.extensions.get::<FlushSignal>().cloned();
        let scope = RequestScope::new(&parts);
        let canonical = canonicalize(&parts, parsed);

        tracing::debug!(
            method = %canonical.method,
            search = %canonical.search,
            "dispatching graphql request"
        );

        let thunk = ContextThunk::new(self.context_builder.clone(), scope);
        let outcome = self.engine.execute(canonical, thunk).await?;

        Ok(render(outcome, flush))
    }
}

impl<E: Engine> Service<Request<Body>> for GraphqlAdapter<E> {
    type Response = Response<Body>;
    type Error = EngineFault;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let adapter = self.clone();
        Box::pin(async move { adapter.handle(request).await })
    }
}
