// API request handlers

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use super::AppState;
use crate::error::ProxyError;
use crate::proxy::translator::ChatCompletionRequest;
use crate::proxy::ModelsResponse;

pub const SERVICE_NAME: &str = "nim-proxy";

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

// OpenAI compatible endpoints
pub async fn openai_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(state.gateway.list_models())
}

pub async fn chat_completions(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_chat_request(&body) {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };

    // Detached so a client disconnect does not cancel the upstream call
    let gateway = state.gateway.clone();
    let task = tokio::spawn(async move { gateway.create_chat_completion(request).await });

    match task.await {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => ProxyError::Internal(e.to_string()).into_response(),
    }
}

/// Parse the body regardless of content type. An empty body is an empty
/// request; anything that is not a JSON object is rejected.
fn parse_chat_request(body: &[u8]) -> Result<ChatCompletionRequest, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChatCompletionRequest::default());
    }

    let raw: Value = serde_json::from_slice(body).map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;
    if !raw.is_object() {
        return Err(ProxyError::InvalidRequest("expected a JSON object".to_string()));
    }
    serde_json::from_value(raw).map_err(|e| ProxyError::InvalidRequest(e.to_string()))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
