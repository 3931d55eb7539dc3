// --- File: crates/planify_slots/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use planify_config::AppConfig;
use std::sync::Arc;

use crate::handlers::{
    preview_slots_handler, publish_slots_handler, week_slots_handler, PlanningState,
};
use crate::service::{ReqwestSlotApiFactory, SlotApiFactory};

/// Creates the router of the planning feature, talking to the configured
/// planning API over HTTP.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let base_url = config
        .planning
        .as_ref()
        .map(|planning| planning.api_base_url.clone())
        .unwrap_or_default();
    routes_with_factory(config, Arc::new(ReqwestSlotApiFactory::new(base_url)))
}

/// Same as [`routes`] with a custom source of [`crate::service::SlotApi`] clients.
pub fn routes_with_factory(config: Arc<AppConfig>, api_factory: Arc<dyn SlotApiFactory>) -> Router {
    let state = Arc::new(PlanningState {
        config,
        api_factory,
    });

    Router::new()
        .route("/slots/preview", post(preview_slots_handler))
        .route("/slots/publish", post(publish_slots_handler))
        .route("/slots/week", get(week_slots_handler))
        .with_state(state)
}
