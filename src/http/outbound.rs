//! Outbound response rendering.
//!
//! # Responsibilities
//! - Render the engine's response onto an `http::Response`
//! - Drive chunked delivery as a pull-based stream, one chunk in flight
//! - Raise the transport's flush signal once per emitted chunk
//!
//! # Design Decisions
//! - Body is constructed before status and header write-back, so the
//!   head is still open when it is finalized; for chunked delivery the
//!   stream is initiated here, never drained
//! - Flush is raised only when a signal is present; the capability is
//!   checked at most once per chunk
//! - An engine body variant this version does not know is a fatal
//!   version-compatibility bug, surfaced as an immediate panic

use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::Response;
use futures_util::Stream;

use crate::engine::{ChunkStream, EngineResponse, ResponseBody};

/// Optional flush capability of the outbound transport.
///
/// Installed into the request extensions by whatever owns the downstream
/// stage (typically a compression stream that would otherwise sit on
/// buffered bytes until the response completes). Raised once per chunk
/// during chunked delivery, never for complete bodies.
#[derive(Clone)]
pub struct FlushSignal {
    notify: Arc<dyn Fn() + Send + Sync>,
}

impl FlushSignal {
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            notify: Arc::new(notify),
        }
    }

    pub(crate) fn raise(&self) {
        (self.notify)()
    }
}

impl fmt::Debug for FlushSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FlushSignal")
    }
}

/// Write the engine's response onto a fresh outbound response.
///
/// Body first, then status (only if the engine supplied one), then
/// headers with insert semantics so a repeated name is last-write-wins.
pub(crate) fn render(outcome: EngineResponse, flush: Option<FlushSignal>) -> Response<Body> {
    let body = match outcome.body {
        ResponseBody::Complete(payload) => Body::from(payload),
        ResponseBody::Chunked(chunks) => Body::from_stream(FlushingChunks::new(chunks, flush)),
        #[allow(unreachable_patterns)]
        other => panic!("engine returned a response body variant this adapter does not support: {other:?}"),
    };

    let mut response = Response::new(body);
    if let Some(status) = outcome.status {
        *response.status_mut() = status;
    }
    for (name, value) in outcome.headers {
        response.headers_mut().insert(name, value);
    }
    response
}

/// Pull-based wrapper over the engine's chunk sequence.
///
/// Each chunk is awaited before the next is requested, so nothing is
/// buffered ahead of demand and a dropped connection simply stops the
/// polling. The flush signal is raised on the poll after a chunk was
/// handed off, once the transport has taken the bytes.
struct FlushingChunks {
    chunks: ChunkStream,
    flush: Option<FlushSignal>,
    handed_off: bool,
}

impl FlushingChunks {
    fn new(chunks: ChunkStream, flush: Option<FlushSignal>) -> Self {
        Self {
            chunks,
            flush,
            handed_off: false,
        }
    }
}

impl Stream for FlushingChunks {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.handed_off {
            this.handed_off = false;
            if let Some(flush) = &this.flush {
                flush.raise();
            }
        }

        match this.chunks.as_mut().poll_next(cx) {
            Poll::Ready(Some(chunk)) => {
                this.handed_off = true;
                Poll::Ready(Some(Ok(Bytes::from(chunk))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
