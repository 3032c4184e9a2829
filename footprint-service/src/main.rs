//! Footprint Service - HTTP microservice for raster footprint extraction.
//!
//! Accepts a raster URL, extracts the outline of its valid-data area and
//! returns it as a GeoJSON Feature, with antimeridian crossings corrected.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `FOOTPRINT_PORT` | HTTP server port | 8080 |
//! | `FOOTPRINT_SIMPLIFY_TOLERANCE` | Simplification tolerance in pixels | 0.5 |
//! | `FOOTPRINT_MIN_REGION_AREA` | Minimum region area in pixels | 1 |
//! | `FOOTPRINT_POLE_POLICY` | Pole closure: "auto", "north", "south" | auto |
//! | `FOOTPRINT_PRECISION` | Output coordinate decimal places | 7 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /` - Service description
//! - `GET /health` - Health check
//! - `POST /footprint` - Extract a raster footprint
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use footprint::FootprintConfig;
use footprint_service::{handlers, router, AppState};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the footprint service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Footprint Service",
        version = "0.1.0",
        description = "REST API extracting the valid-data outline of a raster as GeoJSON.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::post_footprint,
        handlers::health_check,
        handlers::service_info,
    ),
    components(
        schemas(
            handlers::FootprintRequest,
            handlers::ErrorResponse,
            handlers::HealthResponse,
            handlers::ServiceInfoResponse,
        )
    ),
    tags(
        (name = "footprint", description = "Footprint extraction endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footprint_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("FOOTPRINT_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // Extraction defaults from FOOTPRINT_* variables
    let config = FootprintConfig::from_env();
    config.validate()?;

    tracing::info!(
        tolerance = config.simplify_tolerance_pixels,
        min_area = config.min_region_area_pixels,
        precision = config.coordinate_precision,
        port = port,
        "Starting footprint service"
    );

    let state = Arc::new(AppState { config });

    // Build router
    let app = router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
