// File: services/datebook_backend/src/main.rs
use axum::{routing::get, Router};
use datebook_calendar::routes as calendar_routes;
use datebook_common::{Context, DatebookError};
use datebook_config::{load_config, AppConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

const WELCOME: &str = "Welcome to the Datebook API!";

/// The full application: API routes under `/api`, docs when enabled, and the
/// CORS and tracing layers.
fn app(config: Arc<AppConfig>) -> Result<Router, DatebookError> {
    let api_router = Router::new()
        .route("/", get(|| async { WELCOME }))
        .merge(calendar_routes::routes(config)?);

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use datebook_calendar::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Datebook API",
                version = "0.1.0",
                description = "Date availability and booking",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    Ok(app.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    ))
}

#[tokio::main]
async fn main() -> Result<(), DatebookError> {
    let config = Arc::new(load_config().context("Failed to load config")?);

    match config.log_level.as_deref() {
        Some(level) => datebook_common::init_from_str(level),
        None => datebook_common::init(),
    }

    let app = app(config.clone())?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}
