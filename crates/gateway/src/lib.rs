//! HTTP gateway for the DSA tutor.
//!
//! Serves the embedded chat UI and a small JSON API:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /chat` | Tutor reply for one message, stored in the caller's session |
//! | `POST /clear` | Empty the caller's history |
//! | `GET /status`, `GET /health` | Liveness and backend info |
//! | `GET /models` | Models offered by the completion API |
//! | `GET /tools`, `POST /tools/{name}` | Static DSA lookup tools |
//!
//! Sessions are keyed by a signed cookie; histories live in memory.

pub mod error;
pub mod frontend;
pub mod handlers;
pub mod session;

pub use error::GatewayError;
pub use session::SessionSigner;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use dsatutor_agent::TutorAgent;
use dsatutor_config::AppConfig;
use dsatutor_core::provider::Provider;
use dsatutor_core::session::SessionStore;
use dsatutor_core::tool::ToolRegistry;
use dsatutor_memory::InMemorySessionStore;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info};

/// Shared application state. Everything here is immutable except the
/// session store, which does its own locking.
pub struct GatewayState {
    pub tutor: Arc<TutorAgent>,
    pub sessions: Arc<dyn SessionStore>,
    pub tools: Arc<ToolRegistry>,
    /// Completion client, kept for model listing.
    pub provider: Option<Arc<dyn Provider>>,
    pub signer: SessionSigner,
    /// Backend label reported by `/chat` and `/status`.
    pub backend: String,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Build every collaborator from configuration. The session store's idle
    /// TTL doubles as the cookie `Max-Age`.
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let provider = dsatutor_providers::build_from_config(config);
        let tutor = TutorAgent::from_config(config, provider.clone());
        let sessions = InMemorySessionStore::with_limits(
            Duration::from_secs(config.gateway.session_ttl_secs),
            config.gateway.max_sessions,
        );
        let signer =
            SessionSigner::new(&config.gateway.session_secret)?.with_max_age(sessions.idle_ttl());

        Ok(Self {
            tutor: Arc::new(tutor),
            sessions: Arc::new(sessions),
            tools: Arc::new(dsatutor_tools::default_registry()),
            provider,
            signer,
            backend: backend_label(&config.provider),
        })
    }
}

/// Human-readable backend name for a provider.
pub fn backend_label(provider: &str) -> String {
    match provider {
        "groq" => "Groq/Llama".into(),
        "openai" => "OpenAI".into(),
        "openrouter" => "OpenRouter".into(),
        "ollama" => "Ollama".into(),
        other => other.into(),
    }
}

/// Build the router with all gateway routes and the embedded UI.
///
/// Layers: 1 MB body limit, panic-to-JSON-500 conversion, HTTP tracing.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/clear", post(handlers::clear))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/models", get(handlers::models))
        .route("/tools", get(handlers::list_tools))
        .route("/tools/{name}", post(handlers::run_tool))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Convert a handler panic into the generic JSON 500. The payload is logged only.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "Server error",
            "response": "❌ Sorry, I encountered a server error. Please try again or refresh the page.",
        })),
    )
        .into_response()
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), GatewayError> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState::from_config(&config)?);

    info!(
        backend = %state.backend,
        model_client = state.tutor.has_model_client(),
        candidates = ?state.tutor.candidates(),
        "Tutor ready"
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| GatewayError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(addr = %addr, "Gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}
