use std::sync::Arc;

use crate::dao::query_engine::QueryEngine;

/// Cheaply cloneable handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// Central application state handed to every route.
pub struct AppState {
    engine: Arc<QueryEngine>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(engine: Arc<QueryEngine>) -> SharedState {
        Arc::new(Self { engine })
    }

    /// Data-access façade backing every read and write.
    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }
}
