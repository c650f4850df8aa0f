//! HTTP translation subsystem.
//!
//! # Data Flow
//! ```text
//! axum Request<Body>
//!     → inbound.rs (parsed-body precondition, canonical request)
//!     → adapter.rs (context thunk, single engine call)
//!     → outbound.rs (body first, then status and headers)
//!     → axum Response<Body>
//! ```

pub mod adapter;
pub mod inbound;
pub mod outbound;

pub use adapter::GraphqlAdapter;
pub use inbound::ParsedBody;
pub use outbound::FlushSignal;
