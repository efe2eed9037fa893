//!
//! podview HTTP server
//! --------------------
//! Axum router for the pod identity demo service.
//!
//! Responsibilities:
//! - `hello` mode: pod identity page and health check.
//! - `gateway` mode: login form, credential check, signed session cookie,
//!   session-gated dashboard and logout.
//! - Health check that never touches the session.
//!
//! Unauthenticated access and bad credentials are ordinary outcomes (redirects and
//! a re-rendered form), never error responses.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{GatewayConfig, ServiceMode};
use crate::error::{AppError, AppResult};
use crate::host::{HostEnvironment, SystemEnvironment};
use crate::identity::{SessionCodec, SessionData};

pub mod templates;

use templates::{dashboard_page, hello_page, login_page, INVALID_CREDENTIALS};

/// Version shown on the dashboard when `APP_VERSION` is unset.
pub const DEFAULT_DASHBOARD_VERSION: &str = "v1";
/// Version shown on the hello page when `APP_VERSION` is unset.
pub const DEFAULT_HELLO_VERSION: &str = "v1.0";

/// Shared server state injected into all handlers.
///
/// Everything here is read-only after start-up; per-client state lives in the
/// signed session cookie.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub sessions: SessionCodec,
    pub env: Arc<dyn HostEnvironment>,
}

impl AppState {
    pub fn new(config: GatewayConfig, env: Arc<dyn HostEnvironment>) -> AppResult<Self> {
        let sessions = SessionCodec::new(&config.secret_key, config.secure_cookie)?;
        Ok(Self { config: Arc::new(config), sessions, env })
    }

    fn session(&self, headers: &HeaderMap) -> SessionData {
        self.sessions.load(headers)
    }
}

/// Build the router for the configured mode.
pub fn router(state: AppState) -> Router {
    let routes = match state.config.mode {
        ServiceMode::Hello => Router::new()
            .route("/", get(hello))
            .route("/health", get(hello_health)),
        ServiceMode::Gateway => Router::new()
            .route("/", get(home))
            .route("/login", get(login_form).post(login_submit))
            .route("/dashboard", get(dashboard))
            .route("/logout", get(logout))
            .route("/health", get(health)),
    };
    routes.fallback(not_found).with_state(state)
}

/// Start the HTTP server and serve until Ctrl-C.
pub async fn run_with_config(config: GatewayConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let rust_log = std::env::var("RUST_LOG").ok();
    let app_version = std::env::var("APP_VERSION").ok();
    info!(target: "startup", "{}", startup_banner(&config, rust_log.as_deref(), app_version.as_deref()));

    let env: Arc<dyn HostEnvironment> = Arc::new(SystemEnvironment);
    info!(target: "startup", hostname = %env.hostname(), "pod identity resolved");

    let state = AppState::new(config, env)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;
    info!("Starting server on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;
    info!("Server stopped");
    Ok(())
}

/// One-line summary of the running configuration. Never includes the signing key
/// or passwords.
pub fn startup_banner(config: &GatewayConfig, rust_log: Option<&str>, app_version: Option<&str>) -> String {
    let default_version = match config.mode {
        ServiceMode::Hello => DEFAULT_HELLO_VERSION,
        ServiceMode::Gateway => DEFAULT_DASHBOARD_VERSION,
    };
    let version = match app_version {
        Some(v) => format!("APP_VERSION='{}'", v),
        None => format!("APP_VERSION unset (default {})", default_version),
    };
    format!(
        "podview {} starting: RUST_LOG='{}', mode={}, addr={}:{}, version={}, credentials={} ({} users), secure_cookie={}",
        env!("CARGO_PKG_VERSION"),
        rust_log.unwrap_or("<unset>"),
        config.mode.as_str(),
        config.host,
        config.port,
        version,
        if config.custom_credentials { "APP_USERS" } else { "demo" },
        config.credentials.len(),
        config.secure_cookie
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// 302 Found to `location`.
fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, HeaderValue::from_static(location))]).into_response()
}

fn found_with_cookie(location: &'static str, cookie: HeaderValue) -> Response {
    let mut resp = found(location);
    resp.headers_mut().insert(SET_COOKIE, cookie);
    resp
}

#[derive(Debug, Default, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.session(&headers).is_authenticated() {
        found("/dashboard")
    } else {
        found("/login")
    }
}

async fn login_form() -> Html<String> {
    Html(login_page(None))
}

async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AppResult<Response> {
    // Unreadable bodies count as a failed match
    let form = match form {
        Ok(Form(f)) => f,
        Err(e) => {
            debug!(target: "gateway", error = %e, "unreadable login form");
            LoginForm::default()
        }
    };

    if !state.config.credentials.verify(&form.username, &form.password) {
        debug!(target: "gateway", username = %form.username, "login rejected");
        return Ok((StatusCode::OK, Html(login_page(Some(INVALID_CREDENTIALS)))).into_response());
    }

    let mut session = state.session(&headers);
    session.user = Some(form.username.clone());
    let cookie = state.sessions.set_cookie(&session)?;
    info!(target: "gateway", username = %form.username, "login succeeded");
    Ok(found_with_cookie("/dashboard", cookie))
}

async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.session(&headers);
    let Some(user) = session.user() else {
        return found("/login");
    };
    let hostname = state.env.hostname();
    let version = state.env.var("APP_VERSION", DEFAULT_DASHBOARD_VERSION);
    Html(dashboard_page(user, &hostname, &version)).into_response()
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.session(&headers);
    if let Some(user) = session.user() {
        info!(target: "gateway", username = %user, "logout");
    }
    session.clear_user();
    let cookie = state.sessions.set_cookie(&session)?;
    Ok(found_with_cookie("/login", cookie))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn hello(State(state): State<AppState>) -> Html<String> {
    let hostname = state.env.hostname();
    let version = state.env.var("APP_VERSION", DEFAULT_HELLO_VERSION);
    Html(hello_page(&hostname, &version))
}

async fn hello_health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy"}))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found("not_found", format!("no route for {}", uri.path()))
}
