// File: services/planify_backend/src/main.rs
use axum::{routing::get, Router};
use planify_config::load_config;
use planify_slots::routes as slot_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    planify_common::logging::init();
    let config = Arc::new(load_config()?);

    let mut api_router = Router::new().route("/", get(|| async { "Welcome to the Planify API!" }));
    if config.use_planning {
        if config
            .planning
            .as_ref()
            .is_some_and(|planning| planning.submission.dry_run)
        {
            warn!("Submission dry run is on: published slots are logged, not sent");
        }
        api_router = api_router.merge(slot_routes::routes(config.clone()));
    } else {
        warn!("Planning is disabled; slot routes are not mounted");
    }

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use planify_slots::doc::PlanningApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Planify API",
                version = "0.1.0",
                description = "Weekly slot planning API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(PlanningApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
