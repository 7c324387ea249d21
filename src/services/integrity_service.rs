use crate::{dto::integrity::IntegrityResponse, error::ServiceError, state::SharedState};

/// Run the engine's consistency check and project it for the API.
pub async fn check(state: &SharedState) -> Result<IntegrityResponse, ServiceError> {
    let report = state.engine().check_integrity().await?;
    Ok(report.into())
}
