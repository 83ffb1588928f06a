//! The thin backend proxy.
//!
//! Issues a shared-password session token and forwards generation
//! requests to external language-model providers, keeping API keys out of
//! the client. An unset password disables authentication entirely: login
//! hands out the sentinel token `no-auth` and the guard lets every
//! request through.

mod providers;
pub mod token;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router, async_trait};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::info;

use crate::bridge::caption::{clean_caption, split_thread};
use crate::bridge::{BridgeAction, BridgeRequest};

pub use providers::{DEEPSEEK_URL, GEMINI_URL};

/// Proxy configuration, read from the environment in the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Shared password; `None` disables authentication.
    pub password: Option<String>,
    /// HMAC secret for issued tokens.
    pub secret: String,
    pub deepseek_key: Option<String>,
    pub gemini_key: Option<String>,
    pub deepseek_url: String,
    pub gemini_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let password = std::env::var("AUTH_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            password,
            secret: std::env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| "cardeck_default_secret".to_string()),
            deepseek_key: std::env::var("DEEPSEEK_API_KEY").ok(),
            gemini_key: std::env::var("GEMINI_API_KEY").ok(),
            deepseek_url: DEEPSEEK_URL.to_string(),
            gemini_url: GEMINI_URL.to_string(),
        }
    }
}

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    http: reqwest::Client,
}

/// Build the router; separated from [`run`] for tests.
pub fn app(config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        http: reqwest::Client::new(),
    };
    Router::new()
        .route("/api/login", post(login))
        .route("/api/verify", get(verify))
        .route("/api/generate", post(generate))
        .route("/api/gemini", post(gemini))
        .with_state(state)
}

/// Start the proxy and serve until the process exits.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.addr;
    let router = app(config);
    info!("cardeck proxy listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// Extractor enforcing the bearer check on protected routes.
struct RequireAuth;

#[async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.password.is_none() {
            return Ok(RequireAuth);
        }

        if token::verify(
            &state.config.secret,
            bearer_token(&parts.headers),
            SystemTime::now(),
        ) {
            Ok(RequireAuth)
        } else {
            Err(api_error(StatusCode::UNAUTHORIZED, "login required"))
        }
    }
}

fn bearer_token(headers: &axum::http::HeaderMap) -> &str {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError> {
    let Some(password) = &state.config.password else {
        return Ok(Json(json!({ "success": true, "token": "no-auth" })));
    };
    if body.password != *password {
        return Err(api_error(StatusCode::UNAUTHORIZED, "wrong password"));
    }
    let token = token::issue(&state.config.secret, SystemTime::now());
    Ok(Json(json!({ "success": true, "token": token })))
}

async fn verify(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if state.config.password.is_none() {
        return Ok(Json(json!({ "valid": true })));
    }
    if token::verify(
        &state.config.secret,
        bearer_token(&headers),
        SystemTime::now(),
    ) {
        Ok(Json(json!({ "valid": true })))
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    topic: String,
    #[serde(default = "default_pages")]
    pages: u32,
}

fn default_pages() -> u32 {
    4
}

async fn generate(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(body): Json<GenerateBody>,
) -> Result<Json<Value>, ApiError> {
    if body.topic.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "topic required"));
    }
    let Some(key) = &state.config.deepseek_key else {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "API key not configured",
        ));
    };

    let prompt = providers::deck_prompt(&body.topic, body.pages);
    let content =
        providers::chat_completion(&state.http, &state.config.deepseek_url, key, &prompt)
            .await
            .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e))?;
    Ok(Json(json!({ "content": content })))
}

async fn gemini(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(body): Json<BridgeRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(key) = &state.config.gemini_key else {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "API key not configured",
        ));
    };

    let thread_mode = body.is_thread_mode.unwrap_or(false);
    let Some(prompt) = providers::action_prompt(
        body.action,
        body.text.as_deref(),
        body.topic.as_deref(),
        thread_mode,
    ) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "invalid action"));
    };

    let content = providers::generate_content(&state.http, &state.config.gemini_url, key, &prompt)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e))?;

    if body.action == BridgeAction::SocialCaption {
        let captions = if thread_mode {
            split_thread(&content)
        } else {
            vec![clean_caption(&content)]
        };
        return Ok(Json(json!({ "captions": captions })));
    }
    Ok(Json(json!({ "content": content })))
}
