//! Execution engine contract.
//!
//! # Responsibilities
//! - Define the single entry point the adapter calls per request
//! - Carry the canonical GraphQL-HTTP request into the engine
//! - Carry the engine's status/headers/body back out
//!
//! # Design Decisions
//! - The engine is opaque: GraphQL errors are encoded into the
//!   [`EngineResponse`] by the engine itself, never interpreted here
//! - The response body is an explicit sum type, not a shape sniffed at
//!   each use site
//! - Engine-level faults surface as [`EngineFault`] and travel the host
//!   framework's own error path; the adapter catches nothing

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use futures_util::Stream;
use indexmap::IndexMap;
use thiserror::Error;

use crate::context::ContextThunk;

/// Finite, non-restartable sequence of response chunks. Consumed
/// left-to-right, exactly once.
pub type ChunkStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// A GraphQL execution engine as seen by the transport adapter.
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    /// Per-request context value threaded into GraphQL resolution.
    type Context: Send + 'static;

    /// Precondition check: panics, naming `operation`, if the engine has
    /// not finished starting up. The adapter calls this once at
    /// construction, before any request handling begins.
    fn assert_started(&self, operation: &str);

    /// Execute one canonical request. Called exactly once per inbound
    /// request. The engine decides whether and when to resolve `context`;
    /// the adapter never resolves it eagerly.
    async fn execute(
        &self,
        request: EngineRequest,
        context: ContextThunk<Self::Context>,
    ) -> Result<EngineResponse, EngineFault>;
}

/// Canonical GraphQL-HTTP request handed to the engine.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Upper-cased HTTP method.
    pub method: String,

    /// Lower-cased header names to single joined values, in insertion
    /// order. Multi-valued headers are collapsed with `", "`.
    pub headers: IndexMap<String, String>,

    /// Query component of the URI including the leading `?`, or `""`
    /// when the URI carries no query. Never absent.
    pub search: String,

    /// Already-parsed request body, opaque to the adapter.
    pub body: serde_json::Value,
}

/// The engine's single return value per request.
pub struct EngineResponse {
    /// Written onto the outbound response only when present; otherwise
    /// the platform default (typically 200) stands.
    pub status: Option<StatusCode>,

    /// Ordered header pairs, applied with set semantics so a repeated
    /// name is last-write-wins.
    pub headers: Vec<(HeaderName, HeaderValue)>,

    /// How the outbound body is delivered.
    pub body: ResponseBody,
}

impl EngineResponse {
    /// Response with a single complete string payload.
    pub fn complete(payload: impl Into<String>) -> Self {
        Self {
            status: None,
            headers: Vec::new(),
            body: ResponseBody::Complete(payload.into()),
        }
    }

    /// Response delivered incrementally as a stream of chunks.
    pub fn chunked(chunks: ChunkStream) -> Self {
        Self {
            status: None,
            headers: Vec::new(),
            body: ResponseBody::Chunked(chunks),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }
}

/// Response body delivery modes.
///
/// Marked non-exhaustive: a future engine revision may grow delivery
/// modes this adapter version does not understand, and rendering such a
/// variant is a fatal version-compatibility bug rather than a
/// recoverable per-request error.
#[non_exhaustive]
pub enum ResponseBody {
    /// The entire payload as one string.
    Complete(String),
    /// Incremental delivery, e.g. streamed multi-part GraphQL results.
    Chunked(ChunkStream),
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Complete(payload) => f.debug_tuple("Complete").field(payload).finish(),
            ResponseBody::Chunked(_) => f.write_str("Chunked(..)"),
        }
    }
}

/// Opaque engine-level failure raised by [`Engine::execute`] itself, as
/// opposed to GraphQL errors the engine encodes into its response.
#[derive(Debug, Error)]
#[error("graphql engine fault: {0}")]
pub struct EngineFault(String);

impl EngineFault {
    pub fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_response_defaults() {
        let response = EngineResponse::complete("{\"data\":{}}");
        assert!(response.status.is_none());
        assert!(response.headers.is_empty());
        match response.body {
            ResponseBody::Complete(payload) => assert_eq!(payload, "{\"data\":{}}"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_builder_helpers() {
        let response = EngineResponse::complete("ok")
            .with_status(StatusCode::IM_A_TEAPOT)
            .with_header(
                HeaderName::from_static("content-type"),
                HeaderValue::from_static("application/json"),
            );
        assert_eq!(response.status, Some(StatusCode::IM_A_TEAPOT));
        assert_eq!(response.headers.len(), 1);
    }

    #[test]
    fn test_fault_display() {
        let fault = EngineFault::new("schema not loaded");
        assert_eq!(fault.to_string(), "graphql engine fault: schema not loaded");
    }

    #[test]
    fn test_body_debug_names_variant() {
        let complete = ResponseBody::Complete("x".into());
        assert!(format!("{complete:?}").starts_with("Complete"));
    }
}
