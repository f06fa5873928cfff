//! REST surface for the patient registry.
//!
//! A deliberately thin layer: handlers deserialize the wire payloads, call
//! [`PatientService`] and map each typed service error to a user-facing
//! status. All business rules live in `registry-core`.

#![warn(rust_2018_idioms)]

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
};
use registry_core::{
    CreatePatientRequest, PatientError, PatientResponse, PatientService, UpdatePatientRequest,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

/// Application state shared across REST handlers.
///
/// Holds the patient service, constructed once at startup and injected
/// explicitly; handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

/// Health check response body.
#[derive(Serialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Builds the application router around an injected service.
pub fn app(patient_service: PatientService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/:id", put(update_patient).delete(delete_patient))
        .layer(CorsLayer::permissive())
        .with_state(AppState { patient_service })
}

/// Newtype so service errors can flow out of handlers with `?`.
pub struct ApiError(PatientError);

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            PatientError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            PatientError::EmailConflict { email } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": format!("a patient with email {email} already exists")
                })),
            )
                .into_response(),
            PatientError::NotFound { id } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("no patient with id {id}") })),
            )
                .into_response(),
            PatientError::Storage(e) => {
                tracing::error!("patient store failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Health check endpoint, used by monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "patient registry is alive".into(),
    })
}

async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    Ok(Json(state.patient_service.list_patients()?))
}

async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let created = state.patient_service.create_patient(&req)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    Ok(Json(state.patient_service.update_patient(&id, &req)?))
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.patient_service.delete_patient(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
