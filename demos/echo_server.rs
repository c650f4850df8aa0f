//! Runnable wiring example: a toy echo engine mounted on an axum router.
//!
//! ```text
//! cargo run --example echo_server
//! curl -s localhost:8080/graphql -H 'content-type: application/json' \
//!     -d '{"query":"{ __typename }"}'
//! curl -s 'localhost:8080/graphql?stream=1' -d '{}'
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::error_handling::HandleError;
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use futures_util::StreamExt;
use graphql_http_adapter::{
    ContextThunk, Engine, EngineFault, EngineRequest, EngineResponse, GraphqlAdapter, ParsedBody,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Toy engine: echoes the parsed body back, or streams a three-part
/// reply when the query string asks for it.
struct EchoEngine;

#[async_trait]
impl Engine for EchoEngine {
    type Context = ();

    fn assert_started(&self, _operation: &str) {}

    async fn execute(
        &self,
        request: EngineRequest,
        _context: ContextThunk<()>,
    ) -> Result<EngineResponse, EngineFault> {
        if request.search.contains("stream") {
            let chunks = futures_util::stream::iter(vec![
                "{\"data\":".to_string(),
                "{\"echo\":true}".to_string(),
                "}".to_string(),
            ])
            .boxed();
            return Ok(EngineResponse::chunked(chunks));
        }

        let payload = json!({"data": {"echo": request.body}}).to_string();
        Ok(EngineResponse::complete(payload).with_header(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        ))
    }
}

/// Stand-in for the upstream body-parsing layer the adapter requires.
async fn parse_body(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, 1 << 20).await.unwrap_or_default();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    parts.extensions.insert(ParsedBody(value));
    next.run(Request::from_parts(parts, Body::empty())).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphql_http_adapter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let adapter = GraphqlAdapter::new(Arc::new(EchoEngine));
    let graphql = HandleError::new(adapter, |fault: EngineFault| async move {
        (StatusCode::BAD_GATEWAY, fault.to_string())
    });

    let app = Router::new()
        .route_service("/graphql", graphql)
        .layer(middleware::from_fn(parse_body))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind("127.0.0.1:8080").await?;
    tracing::info!(address = %listener.local_addr()?, "echo graphql server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
