//! GeoJSON conversion for extracted footprints.
//!
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use footprint::{extract_footprint, FootprintConfig, RasterSample};
//! use footprint::geojson::footprint_feature;
//!
//! let sample = RasterSample::from_ascii_grid("scene.asc")?;
//! let geometry = extract_footprint(&sample, &FootprintConfig::default())?;
//! let feature = footprint_feature(&geometry, "scene.asc");
//! println!("{}", serde_json::to_string(&feature)?);
//! ```

use geojson::{Feature, Geometry as GeoJsonGeometry, JsonObject, JsonValue, Value as GeoJsonValue};

use crate::geometry::{GeoRing, Geometry};

/// Convert a footprint geometry to a GeoJSON geometry.
///
/// Rings are closed on output: the first position is repeated at the end,
/// and coordinates are `[longitude, latitude]` pairs.
pub fn to_geojson(geometry: &Geometry) -> GeoJsonGeometry {
    let value = match geometry {
        Geometry::Polygon(polygon) => GeoJsonValue::Polygon(polygon_rings(polygon)),
        Geometry::MultiPolygon(polygons) => {
            GeoJsonValue::MultiPolygon(polygons.iter().map(polygon_rings).collect())
        }
    };
    GeoJsonGeometry::new(value)
}

/// Wrap a footprint geometry into a GeoJSON feature carrying the raster
/// source as a `source_url` property.
pub fn footprint_feature(geometry: &Geometry, source_url: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert(
        "source_url".to_string(),
        JsonValue::String(source_url.to_string()),
    );
    Feature {
        bbox: None,
        geometry: Some(to_geojson(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn polygon_rings(polygon: &crate::geometry::GeoPolygon) -> Vec<Vec<Vec<f64>>> {
    let mut rings = Vec::with_capacity(1 + polygon.holes.len());
    rings.push(closed_ring(&polygon.exterior));
    rings.extend(polygon.holes.iter().map(closed_ring));
    rings
}

fn closed_ring(ring: &GeoRing) -> Vec<Vec<f64>> {
    let mut positions: Vec<Vec<f64>> = ring.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
    if let Some(first) = positions.first().cloned() {
        positions.push(first);
    }
    positions
}
