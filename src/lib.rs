//! HTTP transport adapter for a GraphQL execution engine.
//!
//! # Data Flow
//! ```text
//! Inbound axum request
//!     → http/inbound.rs (precondition check, canonical request)
//!     → context (deferred per-request context thunk)
//!     → engine (single execution entry point)
//!     → http/outbound.rs (status, headers, complete or chunked body)
//!     → Send to client
//! ```
//!
//! The engine itself (parsing, validation, resolution) is an external
//! collaborator behind the [`Engine`] trait; body parsing is an upstream
//! layer that must populate the [`ParsedBody`] extension before requests
//! reach the adapter.

pub mod context;
pub mod engine;
pub mod http;

pub use context::{ContextThunk, RequestScope};
pub use engine::{ChunkStream, Engine, EngineFault, EngineRequest, EngineResponse, ResponseBody};
pub use http::{FlushSignal, GraphqlAdapter, ParsedBody};
