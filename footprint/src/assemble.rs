//! Final footprint assembly: rounding, winding and ring ordering.

use crate::error::{FootprintError, Result};
use crate::geometry::{is_ccw, GeoPolygon, GeoRing, Geometry};

/// Assemble corrected polygons into the output geometry.
///
/// Coordinates are rounded to `precision` decimal places, consecutive
/// duplicates created by the rounding are merged, and one winding
/// convention is enforced across the whole output: exterior rings
/// counter-clockwise, holes clockwise (the GeoJSON RFC 7946 convention).
/// Rings that degenerate below 3 vertices after rounding are dropped with
/// a warning.
///
/// # Errors
///
/// Returns [`FootprintError::GeometryCorrection`] if no polygon survives,
/// which would mean upstream stages emitted only micro-geometry.
pub fn assemble(polygons: Vec<GeoPolygon>, precision: u32) -> Result<Geometry> {
    let factor = 10f64.powi(precision.min(15) as i32);
    let mut assembled = Vec::new();

    for polygon in polygons {
        let Some(mut exterior) = round_ring(&polygon.exterior, factor) else {
            tracing::warn!("exterior ring degenerated during rounding, dropping polygon");
            continue;
        };
        if !is_ccw(&exterior) {
            exterior.reverse();
        }

        let mut holes = Vec::new();
        for hole in &polygon.holes {
            let Some(mut rounded) = round_ring(hole, factor) else {
                tracing::warn!("hole ring degenerated during rounding, dropping hole");
                continue;
            };
            if is_ccw(&rounded) {
                rounded.reverse();
            }
            holes.push(rounded);
        }

        assembled.push(GeoPolygon { exterior, holes });
    }

    Geometry::from_polygons(assembled).ok_or_else(|| FootprintError::GeometryCorrection {
        message: "all polygons degenerated during assembly".to_string(),
    })
}

/// Round a ring and merge consecutive duplicates; `None` if fewer than 3
/// distinct vertices remain.
fn round_ring(ring: &GeoRing, factor: f64) -> Option<GeoRing> {
    let mut rounded: GeoRing = Vec::with_capacity(ring.len());
    for &(lon, lat) in ring {
        let vertex = ((lon * factor).round() / factor, (lat * factor).round() / factor);
        if rounded.last() != Some(&vertex) {
            rounded.push(vertex);
        }
    }
    // The ring is stored open; drop a rounded vertex that collides with
    // the implicit closure.
    while rounded.len() > 1 && rounded.last() == rounded.first() {
        rounded.pop();
    }
    (rounded.len() >= 3).then_some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_applied() {
        let polygon = GeoPolygon::new(vec![
            (0.123456789, 0.0),
            (1.000000004, 0.0),
            (1.0, 1.00000001),
            (0.0, 1.0),
        ]);
        let geometry = assemble(vec![polygon], 7).unwrap();
        match geometry {
            Geometry::Polygon(p) => {
                assert_eq!(p.exterior[0], (0.1234568, 0.0));
                assert_eq!(p.exterior[1], (1.0, 0.0));
                assert_eq!(p.exterior[2], (1.0, 1.0));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_winding_enforced() {
        // Clockwise exterior, counter-clockwise hole: both get flipped.
        let exterior = vec![(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)];
        let hole = vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)];
        let geometry = assemble(
            vec![GeoPolygon {
                exterior,
                holes: vec![hole],
            }],
            7,
        )
        .unwrap();
        match geometry {
            Geometry::Polygon(p) => {
                assert!(is_ccw(&p.exterior));
                assert!(!is_ccw(&p.holes[0]));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_hole_dropped_polygon_kept() {
        let exterior = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        // Collapses to a single point at precision 2.
        let hole = vec![(1.0, 1.0), (1.001, 1.0), (1.001, 1.001), (1.0, 1.001)];
        let geometry = assemble(
            vec![GeoPolygon {
                exterior,
                holes: vec![hole],
            }],
            2,
        )
        .unwrap();
        match geometry {
            Geometry::Polygon(p) => assert!(p.holes.is_empty()),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_everything_degenerate_fails() {
        let tiny = GeoPolygon::new(vec![(0.0, 0.0), (0.001, 0.0), (0.001, 0.001)]);
        let result = assemble(vec![tiny], 1);
        assert!(matches!(
            result,
            Err(FootprintError::GeometryCorrection { .. })
        ));
    }

    #[test]
    fn test_multiple_polygons_preserved() {
        let a = GeoPolygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let b = GeoPolygon::new(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]);
        let geometry = assemble(vec![a, b], 7).unwrap();
        assert!(matches!(geometry, Geometry::MultiPolygon(ref ps) if ps.len() == 2));
    }
}
