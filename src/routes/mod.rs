use axum::Router;

use crate::state::SharedState;

/// Swagger UI.
pub mod docs;
/// `/games` endpoints.
pub mod games;
/// Health and integrity probes.
pub mod health;
/// `/players/{id}` endpoints.
pub mod players;
/// `/teams` endpoints.
pub mod teams;

#[cfg(test)]
mod tests;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(teams::router())
        .merge(players::router())
        .merge(games::router());

    api_router.merge(docs::router()).with_state(state)
}
