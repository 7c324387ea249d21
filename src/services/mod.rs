/// OpenAPI documentation generation.
pub mod documentation;
/// Game creation, scoresheet actions, and listing.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Store consistency reporting.
pub mod integrity_service;
/// Team and player management.
pub mod team_service;
