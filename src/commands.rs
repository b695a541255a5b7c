// ─── HTTP API ───
// JSON endpoints polled by the local web UI. Every body carries
// `status: "success" | "error"`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::core::error::SetupError;
use crate::core::instance::{validate_version_key, DiskInspection};
use crate::core::jobs::{query_status, Job, StatusReport};
use crate::core::launch::launch_instructions;
use crate::core::state::AppState;

/// Versions returned by `GET /api/versions`.
const VERSION_LIST_LIMIT: usize = 20;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/versions", get(get_versions))
        .route("/api/setup", post(setup))
        .route("/api/install-mod", post(install_mod))
        .route("/api/launch", post(launch))
        .route("/api/status/{mc_version}", get(get_status))
        .route("/api/jobs", get(list_jobs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Errors ──────────────────────────────────────────────

/// `{status: "error", message}` with a 4xx/5xx code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SetupError> for ApiError {
    fn from(err: SetupError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

// ── Payloads ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VersionPayload {
    pub mc_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InstallModPayload {
    pub mc_version: Option<String>,
    #[serde(default = "default_true")]
    pub install_ai_mod: bool,
}

fn default_true() -> bool {
    true
}

fn required_version(mc_version: Option<String>) -> Result<String, ApiError> {
    let version = mc_version
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing mc_version parameter"))?;
    validate_version_key(&version)?;
    Ok(version)
}

// ── Responses ───────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub id: String,
    pub name: String,
    pub stable: bool,
}

#[derive(Debug, Serialize)]
struct VersionsResponse {
    status: &'static str,
    versions: Vec<VersionInfo>,
}

#[derive(Debug, Serialize)]
struct SetupAccepted {
    status: &'static str,
    message: &'static str,
    mc_version: String,
    run_id: Uuid,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mod_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    launch_instructions: Option<String>,
}

impl MessageResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            mod_path: None,
            launch_instructions: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    mc_version: String,
    #[serde(flatten)]
    report: StatusBody,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StatusBody {
    Tracked { installation_status: Job },
    OnDisk(DiskInspection),
}

#[derive(Debug, Serialize)]
struct JobsResponse {
    status: &'static str,
    jobs: Vec<Job>,
}

// ── Handlers ────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_versions(State(state): State<SharedState>) -> Result<Json<VersionsResponse>, ApiError> {
    let versions = state.source.game_versions().await.map_err(|e| {
        error!("Cannot fetch version list: {}", e);
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Cannot fetch version list: {e}"),
        }
    })?;

    let versions = versions
        .into_iter()
        .take(VERSION_LIST_LIMIT)
        .map(|v| VersionInfo {
            id: v.version.clone(),
            name: v.version,
            stable: v.stable,
        })
        .collect();

    Ok(Json(VersionsResponse {
        status: "success",
        versions,
    }))
}

async fn setup(
    State(state): State<SharedState>,
    payload: Result<Json<VersionPayload>, JsonRejection>,
) -> Result<Json<SetupAccepted>, ApiError> {
    let Json(payload) = payload?;
    let mc_version = required_version(payload.mc_version)?;

    let run_id = state.pipeline.start(&mc_version).await;
    info!("Started setup {} for Minecraft {}", run_id, mc_version);

    Ok(Json(SetupAccepted {
        status: "success",
        message: "Setting up the environment, please wait...",
        mc_version,
        run_id,
    }))
}

async fn install_mod(
    State(state): State<SharedState>,
    payload: Result<Json<InstallModPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    let mc_version = required_version(payload.mc_version)?;

    // Checked before the skip so a missing setup is reported either way.
    state.instance_manager.require_mods_dir(&mc_version).await?;

    if !payload.install_ai_mod {
        return Ok(Json(MessageResponse::success(
            "Skipped AI Builder mod installation",
        )));
    }

    let dest = state
        .instance_manager
        .install_addon_jar(&mc_version, &state.settings.addon_jar)
        .await?;

    Ok(Json(MessageResponse {
        mod_path: Some(dest.display().to_string()),
        ..MessageResponse::success("AI Builder mod installed")
    }))
}

async fn launch(
    State(state): State<SharedState>,
    payload: Result<Json<VersionPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    let mc_version = required_version(payload.mc_version)?;

    let game_dir = state.instance_manager.require_install_dir(&mc_version).await?;
    let loader_version = state.source.resolve_loader_version(&mc_version).await;

    Ok(Json(MessageResponse {
        launch_instructions: Some(launch_instructions(
            &mc_version,
            loader_version.as_deref(),
            &game_dir,
        )),
        ..MessageResponse::success("Launch instructions generated")
    }))
}

async fn get_status(
    State(state): State<SharedState>,
    Path(mc_version): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    validate_version_key(&mc_version)?;

    let report = match query_status(&state.jobs, &state.instance_manager, &mc_version).await {
        StatusReport::Tracked(job) => StatusBody::Tracked {
            installation_status: job,
        },
        StatusReport::OnDisk(inspection) => StatusBody::OnDisk(inspection),
    };

    Ok(Json(StatusResponse {
        status: "success",
        mc_version,
        report,
    }))
}

async fn list_jobs(State(state): State<SharedState>) -> Json<JobsResponse> {
    Json(JobsResponse {
        status: "success",
        jobs: state.jobs.snapshot_all().await,
    })
}
