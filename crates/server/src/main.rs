// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod caller;
mod live;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRef, Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use sponsorlink::CollaborationEngine;
use sponsorlink_api::{
    ApiError, AuditTrailResponse, CatalogOptionInfo, CollaborationInfo,
    CreateCollaborationRequest, CreateCollaborationResponse, Engine, ListCatalogResponse,
    ListCollaborationsResponse, PublishCatalogOptionRequest, RegisterPartyRequest,
    RegisterPartyResponse, SetOptionsRequest, SetOptionsResponse, SettlementUrlResponse,
    ToggleOptionRequest, TransitionRequest, create_collaboration, download_file,
    get_audit_trail, get_collaboration, list_catalog, list_collaborations,
    publish_catalog_option, register_party, request_cause, request_transition,
    resolve_settlement, set_options, settlement_file_url, submit_settlement,
    toggle_catalog_option,
};
use sponsorlink_audit::Cause;
use sponsorlink_persistence::Persistence;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::caller::CallerIdentity;
use crate::live::{LiveEventBroadcaster, live_events_handler};

/// Default upper bound for settlement uploads (10 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// `SponsorLink` server - HTTP server for sponsorship collaborations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Base URL prefixed to stored file references. Defaults to the bind address.
    #[arg(long)]
    public_base_url: Option<String>,

    /// Largest accepted settlement upload, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

/// The engine as run by this server: `SQLite` storage, live notifications.
type AppEngine = Engine<LiveEventBroadcaster>;

/// Application state shared across handlers.
///
/// The engine is wrapped in a Mutex; every operation runs to completion
/// while holding it.
#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<AppEngine>>,
    live: Arc<LiveEventBroadcaster>,
    max_upload_bytes: usize,
}

impl AppState {
    fn new(persistence: Persistence, max_upload_bytes: usize) -> Self {
        let live: LiveEventBroadcaster = LiveEventBroadcaster::new();
        let engine: AppEngine = CollaborationEngine::new(persistence, live.clone());
        Self {
            engine: Arc::new(Mutex::new(engine)),
            live: Arc::new(live),
            max_upload_bytes,
        }
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Query parameters for listing collaborations.
#[derive(Debug, Deserialize)]
struct ListCollaborationsQuery {
    party_id: Option<String>,
    role: Option<String>,
}

/// Query parameters for a settlement upload.
#[derive(Debug, Deserialize)]
struct SettlementUploadQuery {
    /// Client-side file name, kept in the stored path.
    file_name: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable error code.
    code: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable error code.
    code: &'static str,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidState { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Builds the audit cause for one request.
fn new_cause(description: String) -> Cause {
    request_cause(uuid::Uuid::new_v4().to_string(), description)
}

// ============================================================================
// Collaborations
// ============================================================================

/// Handler for POST `/collaborations`.
///
/// Responds 201 both for a clean creation and for a partial one; the body
/// lists any dropped options.
async fn handle_create_collaboration(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Json(req): Json<CreateCollaborationRequest>,
) -> Result<(StatusCode, Json<CreateCollaborationResponse>), HttpError> {
    info!(
        party_id = %caller.party_id,
        organization_id = %req.organization_id,
        options = req.options.len(),
        "Handling create_collaboration request"
    );

    let mut engine = app_state.engine.lock().await;
    let response: CreateCollaborationResponse = create_collaboration(
        &mut engine,
        &caller,
        &req,
        new_cause(String::from("POST /collaborations")),
    )?;
    drop(engine);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/collaborations`.
async fn handle_list_collaborations(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Query(query): Query<ListCollaborationsQuery>,
) -> Result<Json<ListCollaborationsResponse>, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let response: ListCollaborationsResponse = list_collaborations(
        &mut engine,
        &caller,
        query.party_id.as_deref(),
        query.role.as_deref(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/collaborations/{id}`.
async fn handle_get_collaboration(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<CollaborationInfo>, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let info: CollaborationInfo = get_collaboration(&mut engine, &caller, &id)?;
    Ok(Json(info))
}

/// Handler for POST `/collaborations/{id}/{action}`.
///
/// The body is optional and only read by `edit_options`.
async fn handle_transition(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path((id, action)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<CollaborationInfo>, HttpError> {
    info!(
        collaboration_id = %id,
        action = %action,
        party_id = %caller.party_id,
        role = %caller.role,
        "Handling transition request"
    );

    let request: TransitionRequest = if body.is_empty() {
        TransitionRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            HttpError::from(ApiError::InvalidInput {
                field: String::from("body"),
                message: e.to_string(),
            })
        })?
    };

    let mut engine = app_state.engine.lock().await;
    let info: CollaborationInfo = request_transition(
        &mut engine,
        &caller,
        &id,
        &action,
        &request,
        new_cause(format!("POST /collaborations/{id}/{action}")),
    )?;
    Ok(Json(info))
}

/// Handler for PUT `/collaborations/{id}/options`.
async fn handle_set_options(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    Json(req): Json<SetOptionsRequest>,
) -> Result<Json<SetOptionsResponse>, HttpError> {
    info!(
        collaboration_id = %id,
        options = req.options.len(),
        "Handling set_options request"
    );

    let mut engine = app_state.engine.lock().await;
    let response: SetOptionsResponse = set_options(
        &mut engine,
        &caller,
        &id,
        &req,
        new_cause(format!("PUT /collaborations/{id}/options")),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/collaborations/{id}/options/toggle`.
async fn handle_toggle_option(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    Json(req): Json<ToggleOptionRequest>,
) -> Result<Json<CollaborationInfo>, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let info: CollaborationInfo = toggle_catalog_option(
        &mut engine,
        &caller,
        &id,
        &req,
        new_cause(format!("POST /collaborations/{id}/options/toggle")),
    )?;
    Ok(Json(info))
}

// ============================================================================
// Settlement
// ============================================================================

/// Handler for POST `/collaborations/{id}/settlement`.
///
/// The request body is the raw file.
async fn handle_submit_settlement(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    Query(query): Query<SettlementUploadQuery>,
    body: Bytes,
) -> Result<Json<CollaborationInfo>, HttpError> {
    let file_name: String = query.file_name.unwrap_or_else(|| String::from("settlement"));
    info!(
        collaboration_id = %id,
        file_name = %file_name,
        size = body.len(),
        "Handling submit_settlement request"
    );

    let mut engine = app_state.engine.lock().await;
    let info: CollaborationInfo = submit_settlement(
        &mut engine,
        &caller,
        &id,
        &file_name,
        &body,
        app_state.max_upload_bytes,
        new_cause(format!("POST /collaborations/{id}/settlement")),
    )?;
    Ok(Json(info))
}

/// Handler for POST `/collaborations/{id}/settlement/{decision}`.
async fn handle_resolve_settlement(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path((id, decision)): Path<(String, String)>,
) -> Result<Json<CollaborationInfo>, HttpError> {
    info!(collaboration_id = %id, decision = %decision, "Handling resolve_settlement request");

    let mut engine = app_state.engine.lock().await;
    let info: CollaborationInfo = resolve_settlement(
        &mut engine,
        &caller,
        &id,
        &decision,
        new_cause(format!("POST /collaborations/{id}/settlement/{decision}")),
    )?;
    Ok(Json(info))
}

/// Handler for GET `/collaborations/{id}/settlement/url`.
async fn handle_settlement_url(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<SettlementUrlResponse>, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let response: SettlementUrlResponse = settlement_file_url(&mut engine, &caller, &id)?;
    Ok(Json(response))
}

/// Handler for GET `/collaborations/{id}/audit`.
async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<AuditTrailResponse>, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let response: AuditTrailResponse = get_audit_trail(&mut engine, &caller, &id)?;
    Ok(Json(response))
}

/// Handler for GET `/files/{*file_ref}`.
///
/// File references are unguessable and handed out only to parties, so
/// downloads need no caller identity.
async fn handle_download_file(
    AxumState(app_state): AxumState<AppState>,
    Path(file_ref): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let bytes: Vec<u8> = download_file(&mut engine, &file_ref)?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}

// ============================================================================
// Directory and catalog
// ============================================================================

/// Handler for POST `/parties`.
async fn handle_register_party(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterPartyRequest>,
) -> Result<(StatusCode, Json<RegisterPartyResponse>), HttpError> {
    info!(party_id = %req.party_id, role = %req.role, "Handling register_party request");

    let mut engine = app_state.engine.lock().await;
    let response: RegisterPartyResponse = register_party(&mut engine, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/catalog`.
async fn handle_publish_catalog_option(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Json(req): Json<PublishCatalogOptionRequest>,
) -> Result<(StatusCode, Json<CatalogOptionInfo>), HttpError> {
    info!(event_id = %req.event_id, title = %req.title, "Handling publish_catalog_option request");

    let mut engine = app_state.engine.lock().await;
    let response: CatalogOptionInfo = publish_catalog_option(&mut engine, &caller, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/events/{event_id}/catalog`.
async fn handle_list_catalog(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<ListCatalogResponse>, HttpError> {
    let mut engine = app_state.engine.lock().await;
    let response: ListCatalogResponse = list_catalog(&mut engine, &event_id)?;
    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    let upload_limit: usize = app_state.max_upload_bytes;
    Router::new()
        .route(
            "/collaborations",
            post(handle_create_collaboration).get(handle_list_collaborations),
        )
        .route("/collaborations/{id}", get(handle_get_collaboration))
        .route("/collaborations/{id}/{action}", post(handle_transition))
        .route("/collaborations/{id}/options", put(handle_set_options))
        .route(
            "/collaborations/{id}/options/toggle",
            post(handle_toggle_option),
        )
        .route(
            "/collaborations/{id}/settlement",
            post(handle_submit_settlement).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/collaborations/{id}/settlement/url",
            get(handle_settlement_url),
        )
        .route(
            "/collaborations/{id}/settlement/{decision}",
            post(handle_resolve_settlement),
        )
        .route("/collaborations/{id}/audit", get(handle_audit_trail))
        .route("/files/{*file_ref}", get(handle_download_file))
        .route("/parties", post(handle_register_party))
        .route("/catalog", post(handle_publish_catalog_option))
        .route("/events/{event_id}/catalog", get(handle_list_catalog))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SponsorLink server");

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    let public_base_url: String = args
        .public_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{addr}"));

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    }
    .with_public_base_url(public_base_url);

    info!(
        public_base_url = %persistence.public_base_url(),
        max_upload_bytes = args.max_upload_bytes,
        "Storage configured"
    );

    let app: Router = build_router(AppState::new(persistence, args.max_upload_bytes));

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
