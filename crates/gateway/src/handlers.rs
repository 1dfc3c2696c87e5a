//! Route handlers.

use crate::SharedState;
use crate::session::{self, ResolvedSession};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use dsatutor_core::error::ToolError;
use dsatutor_core::session::Exchange;
use dsatutor_core::tool::ToolCall;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

const SERVER_ERROR_REPLY: &str =
    "❌ Sorry, I encountered a server error. Please try again or refresh the page.";

/// JSON response, plus the session cookie when one was just issued.
fn respond(resolved: &ResolvedSession, status: StatusCode, body: impl Serialize) -> Response {
    let mut response = (status, Json(body)).into_response();
    if let Some(cookie) = &resolved.set_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, cookie.clone());
    }
    response
}

fn server_error(resolved: &ResolvedSession, reason: impl std::fmt::Display) -> Response {
    respond(
        resolved,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": format!("Server error: {reason}"),
            "response": SERVER_ERROR_REPLY,
        }),
    )
}

/// The trimmed `message` field of a JSON body. Anything unusable is empty.
fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .map(|m| m.trim().to_string())
        .unwrap_or_default()
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub history_length: usize,
    pub backend: String,
    pub source: &'static str,
}

pub async fn chat(State(state): State<SharedState>, headers: HeaderMap, body: Bytes) -> Response {
    let resolved = session::resolve(&state.signer, &headers);

    let message = extract_message(&body);
    if message.is_empty() {
        return respond(
            &resolved,
            StatusCode::BAD_REQUEST,
            json!({"error": "Empty message"}),
        );
    }

    let session = match state.sessions.get_or_create(&resolved.id).await {
        Ok(session) => session,
        Err(e) => {
            error!(session = %resolved.id, error = %e, "Failed to load session");
            return server_error(&resolved, e);
        }
    };

    info!(
        session = %resolved.id,
        message_len = message.len(),
        history = session.len(),
        "Chat message received"
    );

    let reply = state.tutor.handle(&message, &session.exchanges).await;

    let history_length = match state
        .sessions
        .append(&resolved.id, Exchange::new(message, reply.text.clone()))
        .await
    {
        Ok(n) => n,
        Err(e) => {
            error!(session = %resolved.id, error = %e, "Failed to store exchange");
            return server_error(&resolved, e);
        }
    };

    respond(
        &resolved,
        StatusCode::OK,
        ChatResponse {
            response: reply.text,
            history_length,
            backend: state.backend.clone(),
            source: reply.source.as_str(),
        },
    )
}

pub async fn clear(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let resolved = session::resolve(&state.signer, &headers);

    match state.sessions.clear(&resolved.id).await {
        Ok(()) => respond(&resolved, StatusCode::OK, json!({"status": "cleared"})),
        Err(e) => {
            error!(session = %resolved.id, error = %e, "Failed to clear session");
            respond(
                &resolved,
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            )
        }
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub backend: String,
    pub framework: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub model_client: bool,
}

pub async fn status(State(state): State<SharedState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        backend: state.backend.clone(),
        framework: "axum",
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model_client: state.tutor.has_model_client(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn models(State(state): State<SharedState>) -> Response {
    let Some(provider) = &state.provider else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "client not initialized"})),
        )
            .into_response();
    };

    match provider.list_models().await {
        Ok(models) => Json(json!({ "models": models })).into_response(),
        Err(e) => {
            warn!(error = %e, "Model listing failed");
            (StatusCode::BAD_GATEWAY, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}

pub async fn list_tools(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(json!({ "tools": state.tools.infos() }))
}

pub async fn run_tool(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(v) => v,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": format!("Invalid JSON arguments: {e}")})),
                )
                    .into_response();
            }
        }
    };

    let call = ToolCall { name, arguments };
    match state.tools.execute(&call).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            let status = match &e {
                ToolError::NotFound(_) => StatusCode::NOT_FOUND,
                ToolError::InvalidArguments(_) => StatusCode::BAD_REQUEST,
                ToolError::ExecutionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            warn!(tool = %call.name, error = %e, "Tool call failed");
            (status, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_extraction() {
        assert_eq!(extract_message(br#"{"message": "  Two Sum  "}"#), "Two Sum");
        assert_eq!(extract_message(br#"{"message": ""}"#), "");
        assert_eq!(extract_message(br#"{"message": 42}"#), "");
        assert_eq!(extract_message(br#"{}"#), "");
        assert_eq!(extract_message(b"not json"), "");
        assert_eq!(extract_message(b""), "");
    }
}
