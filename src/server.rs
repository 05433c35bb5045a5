use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::assistant::{next_chunk, ChunkedResponse, SafetyAssistant, TravelBudgetAssistant};
use crate::config::Config;

const SAFETY_UNAVAILABLE: &str =
    "Sorry, the safety assistant is currently unavailable. Please try again later.";
const TRAVEL_UNAVAILABLE: &str =
    "Sorry, the travel budget assistant is currently unavailable. Please try again later.";
const MISSING_MESSAGE: &str = "Please provide a message.";

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NextChunkRequest {
    #[serde(default)]
    remaining_chunks: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    safety_assistant: bool,
    travel_assistant: bool,
    timestamp: String,
}

/// Each assistant is one long-lived session guarded by its own lock, so
/// messages to the same assistant are handled one at a time. `None` means the
/// assistant failed to start.
#[derive(Clone, Default)]
pub struct AppState {
    safety: Option<Arc<Mutex<SafetyAssistant>>>,
    travel: Option<Arc<Mutex<TravelBudgetAssistant>>>,
}

impl AppState {
    pub fn new(safety: Option<SafetyAssistant>, travel: Option<TravelBudgetAssistant>) -> Self {
        Self {
            safety: safety.map(|a| Arc::new(Mutex::new(a))),
            travel: travel.map(|a| Arc::new(Mutex::new(a))),
        }
    }

    /// Builds both assistants. A failure disables only that assistant.
    pub fn from_config(config: &Config) -> Self {
        let safety = match SafetyAssistant::new(config) {
            Ok(assistant) => Some(assistant),
            Err(e) => {
                error!("Failed to initialize Safety Assistant: {}", e);
                None
            }
        };
        let travel = match TravelBudgetAssistant::new(config) {
            Ok(assistant) => Some(assistant),
            Err(e) => {
                error!("Failed to initialize Travel Budget Assistant: {}", e);
                None
            }
        };
        Self::new(safety, travel)
    }
}

fn message_response(status: StatusCode, text: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            response: text.to_string(),
        }),
    )
        .into_response()
}

/// A body that is not JSON, or whose `message` is absent, null, blank or not a
/// string, carries no message.
fn require_message(body: Result<Json<ChatRequest>, JsonRejection>) -> Option<String> {
    match body {
        Ok(Json(body)) => body.message.filter(|m| !m.trim().is_empty()),
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            None
        }
    }
}

/// POST /chat - Send a message to the safety assistant
async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Some(assistant) = state.safety else {
        return message_response(StatusCode::INTERNAL_SERVER_ERROR, SAFETY_UNAVAILABLE);
    };
    let Some(message) = require_message(body) else {
        return message_response(StatusCode::BAD_REQUEST, MISSING_MESSAGE);
    };

    let result = assistant.lock().await.process(&message).await;
    (StatusCode::OK, Json(result)).into_response()
}

/// POST /get_next_chunk - Pop the next chunk off a remainder the client holds
async fn get_next_chunk(body: Result<Json<NextChunkRequest>, JsonRejection>) -> Response {
    let remaining = match body {
        Ok(Json(body)) => body.remaining_chunks.unwrap_or_default(),
        Err(rejection) => {
            warn!("Rejected next chunk body: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(ChunkedResponse::empty())).into_response();
        }
    };
    debug!("Serving next chunk, {} remaining before this call", remaining.len());
    (StatusCode::OK, Json(next_chunk(remaining))).into_response()
}

/// POST /travel/chat - Send a message to the travel budget assistant
async fn travel_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Some(assistant) = state.travel else {
        return message_response(StatusCode::INTERNAL_SERVER_ERROR, TRAVEL_UNAVAILABLE);
    };
    let Some(message) = require_message(body) else {
        return message_response(StatusCode::BAD_REQUEST, MISSING_MESSAGE);
    };

    let response = assistant.lock().await.process(&message).await;
    message_response(StatusCode::OK, &response)
}

/// GET /health - Health check
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        safety_assistant: state.safety.is_some(),
        travel_assistant: state.travel.is_some(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/get_next_chunk", post(get_next_chunk))
        .route("/travel/chat", post(travel_chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    info!("  POST /chat           - Safety assistant");
    info!("  POST /get_next_chunk - Next chunk of a safety reply");
    info!("  POST /travel/chat    - Travel budget assistant");
    info!("  GET  /health         - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::completion::testing::ScriptedCompletion;

    fn state_with(reply: &str) -> AppState {
        let stub = Arc::new(ScriptedCompletion::always(reply));
        AppState::new(
            Some(SafetyAssistant::with_completion(stub.clone(), Duration::from_secs(1))),
            Some(TravelBudgetAssistant::with_completion(stub, Duration::from_secs(1))),
        )
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, body.to_string()).await
    }

    async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn chat_returns_first_chunk() {
        let app = router(state_with("🚨 EMERGENCY RESPONSE\n- Leave the building"));

        let (status, body) =
            post_json(app, "/chat", json!({ "message": "gas leak emergency" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "chunk": "🚨 EMERGENCY RESPONSE\n- Leave the building",
                "has_more": false,
                "remaining_chunks": []
            })
        );
    }

    #[tokio::test]
    async fn chat_without_message_is_rejected() {
        let app = router(state_with("unused"));

        let (status, body) = post_json(app.clone(), "/chat", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["response"], MISSING_MESSAGE);

        let (status, _) = post_json(app, "/chat", json!({ "message": "  " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_assistant_reports_error() {
        let app = router(AppState::default());

        let (status, body) = post_json(app.clone(), "/chat", json!({ "message": "hi" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["response"], SAFETY_UNAVAILABLE);

        let (status, body) = post_json(app, "/travel/chat", json!({ "message": "hi" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["response"], TRAVEL_UNAVAILABLE);
    }

    #[tokio::test]
    async fn next_chunk_walks_the_remainder() {
        let app = router(AppState::default());

        let (status, body) = post_json(
            app.clone(),
            "/get_next_chunk",
            json!({ "remaining_chunks": ["B", "C"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let result: ChunkedResponse = serde_json::from_value(body).unwrap();
        assert_eq!(result.chunk, "B");
        assert!(result.has_more);
        assert_eq!(result.remaining_chunks, vec!["C".to_string()]);

        let (_, body) = post_json(app, "/get_next_chunk", json!({})).await;
        assert_eq!(
            body,
            json!({ "chunk": "", "has_more": false, "remaining_chunks": [] })
        );
    }

    #[tokio::test]
    async fn null_or_non_string_message_is_rejected_as_json() {
        let app = router(state_with("unused"));

        for body in [json!({ "message": null }), json!({ "message": 5 })] {
            let (status, reply) = post_json(app.clone(), "/chat", body.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(reply["response"], MISSING_MESSAGE);

            let (status, reply) = post_json(app.clone(), "/travel/chat", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(reply["response"], MISSING_MESSAGE);
        }
    }

    #[tokio::test]
    async fn invalid_json_gets_a_json_error() {
        let app = router(state_with("unused"));

        let (status, reply) = post_raw(app.clone(), "/chat", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["response"], MISSING_MESSAGE);

        let (status, reply) = post_raw(app, "/get_next_chunk", "{\"remaining_chunks\": [").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply,
            json!({ "chunk": "", "has_more": false, "remaining_chunks": [] })
        );
    }

    #[tokio::test]
    async fn null_remainder_is_treated_as_empty() {
        let app = router(AppState::default());

        let (status, reply) =
            post_json(app, "/get_next_chunk", json!({ "remaining_chunks": null })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            reply,
            json!({ "chunk": "", "has_more": false, "remaining_chunks": [] })
        );
    }

    #[tokio::test]
    async fn travel_chat_returns_whole_reply() {
        let app = router(state_with("unused"));

        let (status, body) =
            post_json(app, "/travel/chat", json!({ "message": "budget breakdown please" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Please provide your total travel budget first.");
    }

    #[tokio::test]
    async fn health_reports_assistant_availability() {
        let app = router(AppState::default());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["safety_assistant"], false);
    }
}
