use axum::{
    routing::{get, post},
    Router,
    Json,
    extract::State,
    response::{IntoResponse, Response},
    http::StatusCode,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{CorsLayer, Any};
use validator::Validate;

use crate::chat::{Intent, IntentResolver};
use crate::menu::MenuItem;
use crate::providers::traits::CompletionProvider;
use crate::providers::utils::delegate;

const MAX_CONCURRENT_REQUESTS: usize = 64;

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<IntentResolver>,
    /// Answers `/chat` messages no rule matched.
    delegate: Option<Arc<dyn CompletionProvider + Send + Sync>>,
    /// Backs `/ask`.
    completion: Option<Arc<dyn CompletionProvider + Send + Sync>>,
}

impl AppState {
    pub fn new(resolver: Arc<IntentResolver>) -> Self {
        Self {
            resolver,
            delegate: None,
            completion: None,
        }
    }

    pub fn with_delegate(mut self, provider: Box<dyn CompletionProvider + Send + Sync>) -> Self {
        self.delegate = Some(Arc::from(provider));
        self
    }

    pub fn with_completion(mut self, provider: Box<dyn CompletionProvider + Send + Sync>) -> Self {
        self.completion = Some(Arc::from(provider));
        self
    }
}

#[derive(Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 1000))]
    message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    reply: String,
    intent: Intent,
    delegated: bool,
}

#[derive(Deserialize)]
pub struct AskRequest {
    message: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    reply: String,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No completion provider configured")]
    ProviderUnavailable,
    #[error("Something went wrong.")]
    Completion,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Completion => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Create and configure the API router
pub fn create_api(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/ask", post(ask_handler))
        .route("/menu", get(menu_handler))
        .route("/health", get(health_check))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(cors)
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    request.validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::InvalidRequest("message must not be blank".to_string()));
    }

    let resolution = state.resolver.resolve_detailed(message);
    info!("Chat message resolved as {}", resolution.intent.name());

    if state.resolver.needs_delegation(&resolution.reply) {
        if let Some(provider) = &state.delegate {
            let reply = delegate(provider.as_ref(), message).await;
            return Ok(Json(ChatResponse {
                reply,
                intent: resolution.intent,
                delegated: true,
            }));
        }
    }

    Ok(Json(ChatResponse {
        reply: resolution.reply,
        intent: resolution.intent,
        delegated: false,
    }))
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let provider = state.completion.as_ref().ok_or(ApiError::ProviderUnavailable)?;

    match provider.complete(&request.message).await {
        Ok(reply) => Ok(Json(AskResponse { reply })),
        Err(e) => {
            error!("Completion request failed: {}", e);
            Err(ApiError::Completion)
        }
    }
}

async fn menu_handler(State(state): State<AppState>) -> Json<Vec<MenuItem>> {
    Json(state.resolver.catalog().items().to_vec())
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "Server is running and healthy".to_string()
    })
}
