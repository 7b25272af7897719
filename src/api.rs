//! HTTP surface: one handler per flavor, all funnelled through the pipeline.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::completion::{CompletionClient, GroqClient};
use crate::config::Settings;
use crate::error::{ApiError, ConfigError};
use crate::pipeline;
use crate::prompt::PromptSpec;
use crate::requests::{
    ActivityRequest, ClusterVideoRequest, CoachQuery, ParentMessageRequest, PlannerRequest,
    Validate, VideoSuggestionRequest,
};
use crate::videos::{self, VideoSuggestionResponse};

pub struct AppState {
    pub client: Arc<dyn CompletionClient>,
    pub model: String,
    pub static_dir: String,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            static_dir: "frontend/dist".to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let client = GroqClient::new(settings.completion.clone())?;
        Ok(Self {
            client: Arc::new(client),
            model: settings.completion.model.clone(),
            static_dir: settings.static_dir.clone(),
        })
    }
}

type Generated = Result<Json<Map<String, Value>>, ApiError>;

/// Parse, check, render, generate. Shared by every contract-backed route.
async fn generate<R>(
    state: &AppState,
    body: Result<Json<R>, JsonRejection>,
    spec: fn(R) -> PromptSpec,
) -> Generated
where
    R: DeserializeOwned + Validate,
{
    let Json(request) = body?;
    request.validate()?;
    let map = pipeline::run(state.client.as_ref(), &spec(request)).await?;
    Ok(Json(map))
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "Backend running" }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "ok", "model": state.model }))
}

#[axum::debug_handler]
async fn coach_query(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CoachQuery>, JsonRejection>,
) -> Generated {
    generate(&state, body, PromptSpec::Coaching).await
}

#[axum::debug_handler]
async fn planner_generate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlannerRequest>, JsonRejection>,
) -> Generated {
    generate(&state, body, PromptSpec::LessonSteps).await
}

#[axum::debug_handler]
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlannerRequest>, JsonRejection>,
) -> Generated {
    generate(&state, body, PromptSpec::LessonPlan).await
}

#[axum::debug_handler]
async fn activity_generate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ActivityRequest>, JsonRejection>,
) -> Generated {
    generate(&state, body, PromptSpec::Activity).await
}

#[axum::debug_handler]
async fn parent_message(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ParentMessageRequest>, JsonRejection>,
) -> Generated {
    generate(&state, body, PromptSpec::ParentMessage).await
}

// Video routes never fail once the request itself is valid.
async fn suggest_videos<R>(
    state: &AppState,
    body: Result<Json<R>, JsonRejection>,
    spec: fn(R) -> PromptSpec,
) -> Result<Json<VideoSuggestionResponse>, ApiError>
where
    R: DeserializeOwned + Validate,
{
    let Json(request) = body?;
    request.validate()?;
    Ok(Json(videos::suggest(state.client.as_ref(), &spec(request)).await))
}

#[axum::debug_handler]
async fn video_suggestions(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VideoSuggestionRequest>, JsonRejection>,
) -> Result<Json<VideoSuggestionResponse>, ApiError> {
    suggest_videos(&state, body, PromptSpec::Videos).await
}

#[axum::debug_handler]
async fn cluster_videos(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ClusterVideoRequest>, JsonRejection>,
) -> Result<Json<VideoSuggestionResponse>, ApiError> {
    suggest_videos(&state, body, PromptSpec::ClusterVideos).await
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(root))
        .route("/api/v1/system/health", get(health))
        .route("/api/v1/coach/query", post(coach_query))
        .route("/api/v1/planner/generate", post(planner_generate))
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/v1/activities/generate", post(activity_generate))
        .route("/api/v1/parent/message", post(parent_message))
        .route("/api/video-suggestions", post(video_suggestions))
        .route("/api/v1/resources/cluster-videos", post(cluster_videos))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
