use std::sync::Arc;

use crate::scoring::scorer::CompatibilityScorer;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Partitioned document store holding the raw job records.
    pub store: Arc<dyn DocumentStore>,
    /// Remote endpoint when configured, simulated otherwise.
    pub scorer: Arc<dyn CompatibilityScorer>,
}
