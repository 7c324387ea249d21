use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the key-value store and report whether it answered.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.engine().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded()
        }
    }
}
