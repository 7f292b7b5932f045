use std::sync::Arc;

use kb_core::SessionStore;
use kb_inference::Pipeline;
use kb_scrapers::ScraperManager;

use crate::datasets::LabelDistribution;

/// Shared, read-only apart from the session store.
pub struct AppState {
    pub pipeline: Pipeline,
    pub scrapers: ScraperManager,
    pub sessions: Arc<dyn SessionStore>,
    pub datasets: Vec<LabelDistribution>,
}
