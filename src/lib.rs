//! Library crate for swish-ticker-back, exposing modules for binaries and integration tests.

pub mod config;
/// Storage backends, records, and the query engine.
pub mod dao;
mod dto;
mod error;
/// HTTP routers.
pub mod routes;
/// Business rules between routes and the query engine.
pub mod services;
/// Shared application state.
pub mod state;
