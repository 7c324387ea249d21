use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{health::HealthResponse, integrity::IntegrityResponse},
    error::AppError,
    services::{health_service, integrity_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
/// Return the current health status of the backend and probe the key-value store.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = health_service::health_status(&state).await;
    Json(status)
}

/// Cross-check the ID indices against stored records.
#[utoipa::path(
    get,
    path = "/integrity",
    tag = "health",
    responses((status = 200, description = "Consistency report", body = IntegrityResponse))
)]
pub async fn integrity(
    State(state): State<SharedState>,
) -> Result<Json<IntegrityResponse>, AppError> {
    Ok(Json(integrity_service::check(&state).await?))
}

/// Configure the health routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/healthcheck", get(healthcheck))
        .route("/integrity", get(integrity))
}
