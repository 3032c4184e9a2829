//! HTTP request handlers for the footprint service.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use footprint::geojson::footprint_feature;
use footprint::{extract_footprint, FootprintError, RasterSample};

use crate::AppState;

/// Footprint extraction request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FootprintRequest {
    /// URL of an ESRI ASCII grid (`.asc`, `.asc.gz` or `.zip`), or a local
    /// file path.
    pub url: String,
    /// EPSG code of the raster CRS. Defaults to 4326.
    pub epsg: Option<u16>,
    /// Simplification tolerance in pixel units, overriding the service
    /// default.
    pub tolerance: Option<f64>,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Service description returned from the root endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfoResponse {
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Endpoint summary.
    pub endpoints: Vec<String>,
}

/// Extract the footprint of a raster.
///
/// Downloads the grid (or reads it from a local path), runs the extraction
/// pipeline and returns a GeoJSON Feature whose geometry outlines the
/// valid-data area, with `source_url` in the properties.
#[utoipa::path(
    post,
    path = "/footprint",
    request_body = FootprintRequest,
    responses(
        (status = 200, description = "GeoJSON Feature with the footprint geometry"),
        (status = 400, description = "Malformed raster or invalid tolerance", body = ErrorResponse),
        (status = 404, description = "Local raster file not found", body = ErrorResponse),
        (status = 422, description = "Raster is entirely nodata or its CRS is unsupported", body = ErrorResponse),
        (status = 502, description = "Remote fetch failed", body = ErrorResponse),
        (status = 500, description = "Geometry correction failed", body = ErrorResponse),
    ),
    tag = "footprint"
)]
#[axum::debug_handler]
pub async fn post_footprint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FootprintRequest>,
) -> impl IntoResponse {
    tracing::debug!(
        url = request.url,
        epsg = request.epsg,
        tolerance = request.tolerance,
        "Footprint request"
    );

    let mut config = state.config.clone();
    if let Some(tolerance) = request.tolerance {
        config.simplify_tolerance_pixels = tolerance;
    }

    // The extraction is CPU-bound and the fetch blocking, so both run off
    // the async runtime.
    let url = request.url.clone();
    let epsg = request.epsg.unwrap_or(4326);
    let result = tokio::task::spawn_blocking(move || {
        let sample = load_sample(&url, epsg)?;
        extract_footprint(&sample, &config)
    })
    .await;

    let geometry = match result {
        Ok(Ok(geometry)) => geometry,
        Ok(Err(e)) => return error_response(&request.url, e),
        Err(e) => {
            tracing::error!(url = request.url, error = %e, "Extraction task panicked");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal".to_string(),
                    message: "extraction task failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::info!(
        url = request.url,
        polygons = geometry.polygons().len(),
        "Footprint extracted"
    );
    let feature = footprint_feature(&geometry, &request.url);
    (StatusCode::OK, Json(feature)).into_response()
}

/// Load a raster from an HTTP(S) URL or a local file path.
fn load_sample(url: &str, epsg: u16) -> footprint::Result<RasterSample> {
    if url.starts_with("http://") || url.starts_with("https://") {
        footprint::fetch::fetch_ascii_grid_with_crs(url, epsg)
    } else {
        RasterSample::from_ascii_grid_with_crs(url, epsg)
    }
}

/// Map a pipeline error to an HTTP response.
fn error_response(url: &str, e: FootprintError) -> axum::response::Response {
    let status = match &e {
        FootprintError::Shape { .. } | FootprintError::InvalidTolerance { .. } => {
            StatusCode::BAD_REQUEST
        }
        FootprintError::EmptyMask | FootprintError::Projection { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        FootprintError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND
        }
        FootprintError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        FootprintError::Fetch { .. } => StatusCode::BAD_GATEWAY,
        FootprintError::GeometryCorrection { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(url = url, error = %e, "Footprint extraction failed");
    } else {
        tracing::warn!(url = url, error = %e, "Footprint extraction rejected");
    }

    (
        status,
        Json(ErrorResponse {
            error: e.kind().to_string(),
            message: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Service description endpoint.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service description", body = ServiceInfoResponse)),
    tag = "system"
)]
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: "footprint-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            "GET /health".to_string(),
            "POST /footprint".to_string(),
            "GET /docs".to_string(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_request_deserialize() {
        let json = r#"{"url": "https://example.com/scene.asc", "epsg": 3857}"#;
        let request: FootprintRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.url, "https://example.com/scene.asc");
        assert_eq!(request.epsg, Some(3857));
        assert_eq!(request.tolerance, None);
    }

    #[test]
    fn test_error_response_serialize() {
        let response = ErrorResponse {
            error: "empty_mask".to_string(),
            message: "no valid pixels".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("empty_mask"));
        assert!(json.contains("no valid pixels"));
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }
}
