//! Inbound request projection.
//!
//! # Responsibilities
//! - Carry the already-parsed body through request extensions
//! - Normalize method, headers, and query string into the canonical
//!   engine-facing request
//!
//! # Design Decisions
//! - Header names arrive lower-cased from the `http` crate and are never
//!   re-cased or coalesced further
//! - Multi-valued headers join with `", "` in original order
//! - A header value that is not representable as a string is skipped,
//!   never an error
//! - `search` is always a string: leading `?` when a query exists, `""`
//!   otherwise

use axum::http::request::Parts;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::EngineRequest;

/// Request body populated by an upstream body-parsing layer.
///
/// The adapter requires this extension to be present before it will
/// translate anything; an empty object or `null` is a legitimately
/// parsed body, only the missing extension trips the precondition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedBody(pub serde_json::Value);

impl ParsedBody {
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

/// Build the canonical engine-facing request from the inbound head and
/// the already-parsed body.
pub fn canonicalize(parts: &Parts, body: ParsedBody) -> EngineRequest {
    let mut headers = IndexMap::new();
    for name in parts.headers.keys() {
        let mut joined = String::new();
        let mut present = false;
        for value in parts.headers.get_all(name) {
            let Ok(text) = value.to_str() else {
                continue;
            };
            if present {
                joined.push_str(", ");
            }
            joined.push_str(text);
            present = true;
        }
        if present {
            headers.insert(name.as_str().to_owned(), joined);
        }
    }

    let search = match parts.uri.query() {
        Some(query) => format!("?{query}"),
        None => String::new(),
    };

    EngineRequest {
        method: parts.method.as_str().to_ascii_uppercase(),
        headers,
        search,
        body: body.into_inner(),
    }
}
