pub mod assign;
pub mod health;
pub mod workload;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use taskforce_core::RequestContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-scoped context from the `X-Actor` header. Auth itself lives in
/// front of this service; the engine only needs to know who triggered the
/// run.
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let actor = headers
        .get("x-actor")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous");
    RequestContext::new(actor)
}
