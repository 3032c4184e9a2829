//! Raster footprint extraction with antimeridian correction.
//!
//! Given a raster sample (pixel values, a nodata sentinel, an affine
//! geotransform and a CRS), this crate derives the polygon outline of the
//! valid-data area: a validity mask, traced region boundaries, simplified
//! rings, geographic coordinates, and finally geometry that is split or
//! stitched wherever the data crosses the ±180° meridian.
//!
//! # Example
//!
//! ```ignore
//! use footprint::{extract_footprint, FootprintConfig, RasterSample};
//!
//! let sample = RasterSample::from_ascii_grid("scene.asc")?;
//! let geometry = extract_footprint(&sample, &FootprintConfig::default())?;
//! println!("footprint bounds: {:?}", geometry.bounds());
//! ```
//!
//! # Features
//!
//! * `fetch` - download grids over HTTP, with gzip and ZIP support
//! * `geojson` - convert footprints to GeoJSON geometries and features

pub mod antimeridian;
pub mod assemble;
pub mod config;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod geometry;
pub mod mask;
pub mod raster;
pub mod reproject;
pub mod simplify;
pub mod trace;

pub use config::{FootprintConfig, PoleInclusionPolicy};
pub use error::{FootprintError, Result};
pub use geometry::{GeoPolygon, GeoRing, Geometry};
pub use mask::Mask;
pub use raster::{AffineTransform, RasterSample};
pub use reproject::Reprojector;

use trace::PixelRing;

/// Extract the valid-data footprint of a raster sample.
///
/// Runs the full pipeline: mask derivation, boundary tracing,
/// simplification, reprojection to WGS84, antimeridian correction and
/// final assembly. The result is a [`Geometry::Polygon`] for a single
/// region and a [`Geometry::MultiPolygon`] otherwise, with exterior rings
/// wound counter-clockwise, holes clockwise, and every longitude within
/// `[-180, 180]`.
///
/// # Errors
///
/// * [`FootprintError::InvalidTolerance`] for a negative or non-finite
///   simplification tolerance.
/// * [`FootprintError::Shape`] for an empty raster.
/// * [`FootprintError::EmptyMask`] when no valid region survives the mask
///   and area threshold.
/// * [`FootprintError::Projection`] for an unsupported CRS or a singular
///   geotransform.
/// * [`FootprintError::GeometryCorrection`] when the traced geometry
///   cannot be corrected into valid output.
///
/// # Example
///
/// ```ignore
/// use footprint::{extract_footprint, FootprintConfig, RasterSample};
///
/// let sample = RasterSample::from_ascii_grid("scene.asc")?;
/// let geometry = extract_footprint(&sample, &FootprintConfig::default())?;
/// ```
pub fn extract_footprint(sample: &RasterSample, config: &FootprintConfig) -> Result<Geometry> {
    config.validate()?;

    let mask = Mask::build(sample)?;
    tracing::debug!(
        valid = mask.valid_count(),
        total = mask.width() * mask.height(),
        "mask built"
    );

    let regions = trace::trace_regions(&mask, config.min_region_area_pixels)?;
    tracing::debug!(regions = regions.len(), "boundaries traced");

    let reprojector = Reprojector::new(*sample.transform(), sample.epsg())?;

    let mut polygons = Vec::with_capacity(regions.len());
    for region in &regions {
        let Some(exterior) = prepare_ring(&region.outer, config, &reprojector)? else {
            tracing::warn!("region boundary collapsed during simplification, dropping region");
            continue;
        };
        let mut holes = Vec::new();
        for hole in &region.holes {
            match prepare_ring(hole, config, &reprojector)? {
                Some(ring) => holes.push(ring),
                None => {
                    tracing::warn!("hole collapsed during simplification, dropping hole");
                }
            }
        }
        polygons.push(GeoPolygon { exterior, holes });
    }

    let geometry =
        Geometry::from_polygons(polygons).ok_or_else(|| FootprintError::GeometryCorrection {
            message: "every region collapsed during simplification".to_string(),
        })?;

    let corrected = antimeridian::fix_geometry(geometry, config.pole_inclusion_policy)?;
    assemble::assemble(corrected.into_polygons(), config.coordinate_precision)
}

/// Simplify one pixel ring and map it to geographic coordinates.
///
/// Returns `None` if simplification leaves fewer than 3 vertices.
fn prepare_ring(
    ring: &PixelRing,
    config: &FootprintConfig,
    reprojector: &Reprojector,
) -> Result<Option<GeoRing>> {
    let vertices: Vec<(f64, f64)> = ring.iter().map(|&(c, r)| (c as f64, r as f64)).collect();
    let simplified = simplify::simplify_ring(&vertices, config.simplify_tolerance_pixels);
    if simplified.len() < 3 {
        return Ok(None);
    }
    reprojector.reproject_ring(&simplified).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{is_ccw, signed_area};

    const EPS: f64 = 1e-9;

    fn grid(
        rows: &[&[f64]],
        nodata: Option<f64>,
        transform: AffineTransform,
        epsg: u16,
    ) -> RasterSample {
        let height = rows.len();
        let width = rows[0].len();
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        RasterSample::new(data, width, height, nodata, transform, epsg).unwrap()
    }

    #[test]
    fn test_fully_valid_grid_yields_bounding_box() {
        // 10x10 grid of 0.01-degree cells with lower-left corner at
        // (-0.05, -0.05): the footprint is the raster bounding box.
        let rows: Vec<Vec<f64>> = vec![vec![1.0; 10]; 10];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(-0.05, 0.05, 0.01, -0.01);
        let sample = grid(&refs, None, transform, 4326);

        let geometry = extract_footprint(&sample, &FootprintConfig::default()).unwrap();
        match &geometry {
            Geometry::Polygon(p) => {
                assert_eq!(p.exterior.len(), 4);
                assert!(p.holes.is_empty());
                assert!(is_ccw(&p.exterior));
                for &(lon, lat) in &p.exterior {
                    assert!((lon.abs() - 0.05).abs() < EPS);
                    assert!((lat.abs() - 0.05).abs() < EPS);
                }
            }
            other => panic!("expected polygon, got {:?}", other),
        }
        let (min_lon, min_lat, max_lon, max_lat) = geometry.bounds();
        assert!((min_lon - -0.05).abs() < EPS);
        assert!((min_lat - -0.05).abs() < EPS);
        assert!((max_lon - 0.05).abs() < EPS);
        assert!((max_lat - 0.05).abs() < EPS);
    }

    #[test]
    fn test_two_disjoint_corners_yield_multipolygon() {
        let nd = -9999.0;
        let rows: Vec<Vec<f64>> = vec![
            vec![1.0, nd, nd, nd],
            vec![nd, nd, nd, nd],
            vec![nd, nd, nd, nd],
            vec![nd, nd, nd, 1.0],
        ];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(0.0, 4.0, 1.0, -1.0);
        let sample = grid(&refs, Some(nd), transform, 4326);

        let geometry = extract_footprint(&sample, &FootprintConfig::default()).unwrap();
        match geometry {
            Geometry::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                for p in &polygons {
                    assert_eq!(p.exterior.len(), 4);
                    assert!(is_ccw(&p.exterior));
                }
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_interior_nodata_yields_hole() {
        let nd = -9999.0;
        let rows: Vec<Vec<f64>> = vec![
            vec![1.0, 1.0, 1.0],
            vec![1.0, nd, 1.0],
            vec![1.0, 1.0, 1.0],
        ];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(0.0, 3.0, 1.0, -1.0);
        let sample = grid(&refs, Some(nd), transform, 4326);

        let geometry = extract_footprint(&sample, &FootprintConfig::default()).unwrap();
        match geometry {
            Geometry::Polygon(p) => {
                assert_eq!(p.holes.len(), 1);
                assert!(is_ccw(&p.exterior));
                assert!(!is_ccw(&p.holes[0]));
                // Hole covers the center cell (1,1)-(2,2) in map units.
                let hole = &p.holes[0];
                assert!(hole.contains(&(1.0, 1.0)));
                assert!(hole.contains(&(2.0, 2.0)));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_all_nodata_is_empty_mask() {
        let nd = -9999.0;
        let rows: Vec<Vec<f64>> = vec![vec![nd; 3]; 3];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(0.0, 3.0, 1.0, -1.0);
        let sample = grid(&refs, Some(nd), transform, 4326);

        let result = extract_footprint(&sample, &FootprintConfig::default());
        assert!(matches!(result, Err(FootprintError::EmptyMask)));
    }

    #[test]
    fn test_invalid_tolerance_rejected_before_work() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0]];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(0.0, 1.0, 1.0, -1.0);
        let sample = grid(&refs, None, transform, 4326);

        let config = FootprintConfig {
            simplify_tolerance_pixels: -1.0,
            ..Default::default()
        };
        let result = extract_footprint(&sample, &config);
        assert!(matches!(
            result,
            Err(FootprintError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn test_antimeridian_crossing_grid_is_split() {
        // Ten one-degree columns starting at 175°E: the raster spans
        // 175..185, so the footprint crosses the antimeridian.
        let rows: Vec<Vec<f64>> = vec![vec![1.0; 10]; 4];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(175.0, 2.0, 1.0, -1.0);
        let sample = grid(&refs, None, transform, 4326);

        let geometry = extract_footprint(&sample, &FootprintConfig::default()).unwrap();
        match geometry {
            Geometry::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                for p in &polygons {
                    assert!(is_ccw(&p.exterior));
                    for &(lon, _) in &p.exterior {
                        assert!((-180.0..=180.0).contains(&lon));
                    }
                }
                // One piece hugs +180, the other -180.
                let touches_east = polygons
                    .iter()
                    .any(|p| p.exterior.iter().any(|&(lon, _)| (lon - 180.0).abs() < EPS));
                let touches_west = polygons
                    .iter()
                    .any(|p| p.exterior.iter().any(|&(lon, _)| (lon + 180.0).abs() < EPS));
                assert!(touches_east && touches_west);
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_nodata_patch_across_antimeridian_notches_the_pieces() {
        // 10x6 one-degree grid spanning 176..186 with a 2x2 nodata patch
        // straddling 180: the hole is cut along with the exterior and each
        // piece comes back as a notched boundary, not a pole-spanning hole.
        let nd = -9999.0;
        let mut rows: Vec<Vec<f64>> = vec![vec![1.0; 10]; 6];
        for row in rows.iter_mut().take(4).skip(2) {
            row[3] = nd;
            row[4] = nd;
        }
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(176.0, 3.0, 1.0, -1.0);
        let sample = grid(&refs, Some(nd), transform, 4326);

        let geometry = extract_footprint(&sample, &FootprintConfig::default()).unwrap();
        match geometry {
            Geometry::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                let mut total = 0.0;
                for p in &polygons {
                    assert!(
                        p.holes.is_empty(),
                        "crossing hole must notch the boundary: {:?}",
                        p.holes
                    );
                    assert!(is_ccw(&p.exterior));
                    for &(lon, lat) in &p.exterior {
                        assert!((-180.0..=180.0).contains(&lon));
                        assert!((-3.0..=3.0).contains(&lat), "latitude escaped: {}", lat);
                    }
                    total += signed_area(&p.exterior);
                }
                // 10x6 of valid data minus the 2x2 nodata patch.
                assert!((total - 56.0).abs() < EPS);
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_diagonal_nodata_cells_yield_separate_holes() {
        let nd = -9999.0;
        let rows: Vec<Vec<f64>> = vec![
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, nd, 1.0, 1.0],
            vec![1.0, 1.0, nd, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
        ];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(0.0, 4.0, 1.0, -1.0);
        let sample = grid(&refs, Some(nd), transform, 4326);

        let geometry = extract_footprint(&sample, &FootprintConfig::default()).unwrap();
        match geometry {
            Geometry::Polygon(p) => {
                assert!(is_ccw(&p.exterior));
                assert_eq!(p.holes.len(), 2);
                for hole in &p.holes {
                    assert_eq!(hole.len(), 4);
                    assert!(!is_ccw(hole));
                    assert!((signed_area(hole) + 1.0).abs() < EPS);
                }
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let nd = -9999.0;
        let rows: Vec<Vec<f64>> = vec![
            vec![1.0, 1.0, nd, 1.0],
            vec![1.0, nd, nd, 1.0],
            vec![nd, nd, 1.0, 1.0],
        ];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let transform = AffineTransform::from_origin(10.0, 3.0, 0.5, -0.5);
        let sample = grid(&refs, Some(nd), transform, 4326);

        let config = FootprintConfig::default();
        let first = extract_footprint(&sample, &config).unwrap();
        let second = extract_footprint(&sample, &config).unwrap();
        assert_eq!(
            format!("{:?}", first),
            format!("{:?}", second),
            "repeated extraction must produce identical output"
        );
    }
}
