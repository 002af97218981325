//! HTTP surface for the budget assistant
//!
//! Session identity is supplied by callers: a request without a session id
//! gets a fresh session whose id is echoed back for subsequent turns. Each
//! generation failure kind maps to its own status code so callers can tell a
//! timeout from an exhausted quota.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::AssistantError;
use crate::gemini::{GenerationError, TextGenerator};
use crate::models::{BudgetUpdate, ProfileUpdate};
use crate::session::SessionRegistry;

const CHAT_PAGE: &str = include_str!("../assets/chat.html");

const DEFAULT_PROFILE_PATH: &str = "user_profile.json";

/// =============================
/// Request / Response Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(flatten)]
    pub update: ProfileUpdate,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    #[serde(flatten)]
    pub update: BudgetUpdate,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PersistenceRequest {
    pub path: Option<String>,
    pub session_id: Option<Uuid>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub sessions: SessionRegistry,
    pub generator: Arc<dyn TextGenerator>,
}

/// =============================
/// Error Mapping
/// =============================

/// Wraps [`AssistantError`] so each failure kind becomes a distinct response.
#[derive(Debug)]
pub struct ApiError(AssistantError);

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AssistantError::Generation(err) => match err {
                GenerationError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                GenerationError::Quota(_) => StatusCode::TOO_MANY_REQUESTS,
                GenerationError::Auth(_)
                | GenerationError::Api { .. }
                | GenerationError::Transport(_)
                | GenerationError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            },
            AssistantError::Serialization(_) | AssistantError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error!("request failed ({}): {}", status, self.0);

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// =============================
/// Handlers
/// =============================

async fn index() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(session = ?req.session_id, "received chat message");

    let (session_id, assistant) = state.sessions.get_or_create(req.session_id).await;
    let mut assistant = assistant.lock().await;

    let response = assistant
        .process_message(&req.message, state.generator.as_ref())
        .await?;

    Ok(Json(ChatResponse {
        response,
        session_id,
    }))
}

async fn update_profile(
    State(state): State<ApiState>,
    Json(req): Json<ProfileRequest>,
) -> Json<ChatResponse> {
    let (session_id, assistant) = state.sessions.get_or_create(req.session_id).await;
    let outcome = assistant.lock().await.update_profile(req.update);

    Json(ChatResponse {
        response: outcome.to_string(),
        session_id,
    })
}

async fn update_budget(
    State(state): State<ApiState>,
    Json(req): Json<BudgetRequest>,
) -> Json<ChatResponse> {
    let (session_id, assistant) = state.sessions.get_or_create(req.session_id).await;
    let outcome = assistant.lock().await.set_budget_info(req.update);

    Json(ChatResponse {
        response: outcome.to_string(),
        session_id,
    })
}

async fn save_profile(
    State(state): State<ApiState>,
    Json(req): Json<PersistenceRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (session_id, assistant) = state.sessions.get_or_create(req.session_id).await;
    let path = req
        .path
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string());

    let outcome = assistant.lock().await.save(&path)?;

    Ok(Json(ChatResponse {
        response: outcome.to_string(),
        session_id,
    }))
}

async fn load_profile(
    State(state): State<ApiState>,
    Json(req): Json<PersistenceRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (session_id, assistant) = state.sessions.get_or_create(req.session_id).await;
    let path = req
        .path
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string());

    let outcome = assistant.lock().await.load(&path)?;

    Ok(Json(ChatResponse {
        response: outcome.to_string(),
        session_id,
    }))
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/profile", post(update_profile))
        .route("/budget", post(update_budget))
        .route("/profile/save", post(save_profile))
        .route("/profile/load", post(load_profile))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok("canned advice".to_string())
        }
    }

    struct ErrorGenerator(fn() -> GenerationError);

    #[async_trait]
    impl TextGenerator for ErrorGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err((self.0)())
        }
    }

    fn app(generator: Arc<dyn TextGenerator>) -> Router {
        create_router(ApiState {
            sessions: SessionRegistry::new(),
            generator,
        })
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(CannedGenerator))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_index_serves_chat_page() {
        let response = app(Arc::new(CannedGenerator))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_returns_response_and_session() {
        let response = app(Arc::new(CannedGenerator))
            .oneshot(json_post("/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "canned advice");
        assert!(body["session_id"].is_string());
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_message() {
        let response = app(Arc::new(CannedGenerator))
            .oneshot(json_post("/chat", r#"{"session_id": null}"#))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_chat_rejects_non_string_message() {
        let response = app(Arc::new(CannedGenerator))
            .oneshot(json_post("/chat", r#"{"message": 42}"#))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let generator = Arc::new(ErrorGenerator(|| GenerationError::Timeout));
        let response = app(generator)
            .oneshot(json_post("/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_quota_maps_to_too_many_requests() {
        let generator = Arc::new(ErrorGenerator(|| {
            GenerationError::Quota("rate limited".to_string())
        }));
        let response = app(generator)
            .oneshot(json_post("/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_auth_failure_maps_to_bad_gateway() {
        let generator = Arc::new(ErrorGenerator(|| {
            GenerationError::Auth("bad key".to_string())
        }));
        let response = app(generator)
            .oneshot(json_post("/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_profile_and_budget_roundtrip_through_session() {
        let app = app(Arc::new(CannedGenerator));

        // Create the session through a profile update, then reuse its id.
        let response = app
            .clone()
            .oneshot(json_post("/profile", r#"{"name": "Priya"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "Profile updated successfully!");
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let budget_body = format!(
            r#"{{"monthly_income": 5000, "session_id": "{}"}}"#,
            session_id
        );
        let response = app
            .clone()
            .oneshot(json_post("/budget", &budget_body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "Budget information updated successfully!");

        // The budget breakdown now has income available in the same session.
        let chat_body = format!(
            r#"{{"message": "help me budget", "session_id": "{}"}}"#,
            session_id
        );
        let response = app.oneshot(json_post("/chat", &chat_body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "canned advice");
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_budget_state() {
        let app = app(Arc::new(CannedGenerator));

        let response = app
            .clone()
            .oneshot(json_post("/budget", r#"{"monthly_income": 5000}"#))
            .await
            .unwrap();
        let _ = body_json(response).await;

        // A different (fresh) session still lacks income, so the budget
        // precondition message comes back instead of generated text.
        let response = app
            .oneshot(json_post("/chat", r#"{"message": "help me budget"}"#))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body["response"],
            "Please provide your monthly income first."
        );
    }

    #[tokio::test]
    async fn test_profile_save_and_load_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let app = app(Arc::new(CannedGenerator));

        let save_body = format!(r#"{{"path": {:?}}}"#, path.to_str().unwrap());
        let response = app.clone().oneshot(json_post("/profile/save", &save_body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "User profile saved successfully!");

        let load_body = format!(r#"{{"path": {:?}}}"#, path.to_str().unwrap());
        let response = app.oneshot(json_post("/profile/load", &load_body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "User profile loaded successfully!");
    }
}
