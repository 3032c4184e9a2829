//! Antimeridian correction.
//!
//! A longitude jump of more than 180° between adjacent vertices is the
//! symptom of a ring crossing the ±180° meridian. Such rings must never be
//! returned as-is; this module resolves them deterministically:
//!
//! * Rings that merely straddle a meridian without crossing it are
//!   normalized by shifting whole multiples of 360°.
//! * Rings that cross are cut at the meridian and re-stitched into closed
//!   pieces, each confined to [-180°, 180°], yielding a multi-polygon.
//! * Rings that encircle a pole are closed over that pole with edges along
//!   the meridian and the ±90° latitude line.
//! * Holes that cross are cut the same way; their pieces cannot stay holes,
//!   so they merge into the split exteriors as boundary notches.
//!
//! Every ring is processed with the polygon interior on its left (exterior
//! rings counter-clockwise, holes clockwise), which lets one stitching pass
//! weld exterior and hole chains into the same boundaries.

use crate::config::PoleInclusionPolicy;
use crate::error::{FootprintError, Result};
use crate::geometry::{
    point_in_ring, ring_self_intersects, signed_area, GeoPolygon, GeoRing, Geometry,
};

const LON_EPS: f64 = 1e-9;

/// Correct a geometry for antimeridian crossings.
///
/// Deterministic: the same input always yields the same pieces, winding
/// and vertex order.
///
/// # Errors
///
/// Returns [`FootprintError::GeometryCorrection`] for geometries whose
/// topology cannot be reconciled (a split exterior that crosses itself, a
/// hole piece with no surrounding exterior, or stitching that fails to
/// close). Ordinary crossings always succeed.
pub fn fix_geometry(geometry: Geometry, policy: PoleInclusionPolicy) -> Result<Geometry> {
    let mut fixed = Vec::new();
    for polygon in geometry.into_polygons() {
        fixed.extend(fix_polygon(polygon, policy)?);
    }
    Geometry::from_polygons(fixed).ok_or_else(|| FootprintError::GeometryCorrection {
        message: "no polygons survived antimeridian correction".to_string(),
    })
}

fn fix_polygon(polygon: GeoPolygon, policy: PoleInclusionPolicy) -> Result<Vec<GeoPolygon>> {
    let mut chains: Vec<GeoRing> = Vec::new();
    let mut exterior_rings: Vec<GeoRing> = Vec::new();

    match cut_ring(&polygon.exterior, true) {
        CutRing::Whole(ring) => exterior_rings.push(ring),
        CutRing::Chains(pieces) => chains.extend(pieces),
    }

    // A hole that crosses the meridian cannot survive as a hole: each of
    // its pieces becomes a notch in the split exterior. Its chains are
    // wound opposite the exterior's, so pooling them lets the meridian walk
    // weld them into the right boundaries.
    let mut intact_holes: Vec<GeoRing> = Vec::new();
    for hole in &polygon.holes {
        match cut_ring(hole, false) {
            CutRing::Whole(ring) => intact_holes.push(ring),
            CutRing::Chains(pieces) => chains.extend(pieces),
        }
    }

    if !chains.is_empty() {
        if !exterior_rings.is_empty() {
            return Err(FootprintError::GeometryCorrection {
                message: "hole crosses the antimeridian but its exterior does not".to_string(),
            });
        }
        exterior_rings = stitch_chains(chains, policy)?;
    }

    for piece in &exterior_rings {
        if ring_self_intersects(piece) {
            return Err(FootprintError::GeometryCorrection {
                message: "exterior ring crosses itself after antimeridian split".to_string(),
            });
        }
    }

    let mut result: Vec<GeoPolygon> = exterior_rings.into_iter().map(GeoPolygon::new).collect();
    for hole in intact_holes {
        let owner = find_owner(&mut result, &hole).ok_or_else(|| {
            FootprintError::GeometryCorrection {
                message: "hole has no surrounding exterior after antimeridian split".to_string(),
            }
        })?;
        owner.holes.push(hole);
    }

    Ok(result)
}

/// The exterior piece containing the hole, probed with hole vertices that
/// lie off the meridian (those are original vertices, strictly inside).
fn find_owner<'a>(polygons: &'a mut [GeoPolygon], hole: &GeoRing) -> Option<&'a mut GeoPolygon> {
    let probes: Vec<(f64, f64)> = hole
        .iter()
        .copied()
        .filter(|(lon, _)| (lon.abs() - 180.0).abs() > LON_EPS)
        .collect();
    let index = polygons.iter().position(|polygon| {
        probes
            .iter()
            .any(|&probe| point_in_ring(probe, &polygon.exterior))
    })?;
    polygons.get_mut(index)
}

/// A ring after cutting at the antimeridian.
enum CutRing {
    /// No crossing; the ring normalized into [-180, 180].
    Whole(GeoRing),
    /// The ring crossed; open chains whose endpoints lie exactly on ±180°.
    Chains(Vec<GeoRing>),
}

/// Unwrap a ring's longitudes so adjacent vertices never jump more than
/// 180°; the extra vertex at index `len` continues the closing edge back
/// to vertex 0 (offset by 360° per net turn around the globe).
fn unwrap_ring(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let n = ring.len();
    let mut unwrapped = Vec::with_capacity(n + 1);
    let mut lon = wrap_lon(ring[0].0);
    unwrapped.push((lon, ring[0].1));
    for i in 1..=n {
        lon += wrap_delta(ring[i % n].0 - ring[(i - 1) % n].0);
        unwrapped.push((lon, ring[i % n].1));
    }
    unwrapped
}

/// Cut one ring at every meridian line (±180° plus whole turns).
///
/// `want_ccw` names the winding the caller expects for this ring's role;
/// a flat (non-pole-encircling) ring wound the other way is reversed first
/// so the interior stays on the left. Orientation is judged on the
/// unwrapped coordinates, and only when the ring has no net winding around
/// the globe; pole-encircling rings express their orientation through the
/// direction of travel instead. Degenerate rings yield no chains at all.
fn cut_ring(ring: &[(f64, f64)], want_ccw: bool) -> CutRing {
    let n = ring.len();
    if n < 3 {
        return CutRing::Chains(Vec::new());
    }

    let mut unwrapped = unwrap_ring(ring);
    let winding = unwrapped[n].0 - unwrapped[0].0;
    if winding.abs() < LON_EPS && (signed_area(&unwrapped[..n]) > 0.0) != want_ccw {
        let reversed: Vec<(f64, f64)> = ring.iter().rev().copied().collect();
        unwrapped = unwrap_ring(&reversed);
    }

    let mut chains: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current = vec![unwrapped[0]];
    for i in 0..n {
        let (a_lon, a_lat) = unwrapped[i];
        let (b_lon, b_lat) = unwrapped[i + 1];
        for meridian in meridians_between(a_lon, b_lon) {
            let t = (meridian - a_lon) / (b_lon - a_lon);
            let lat = a_lat + t * (b_lat - a_lat);
            current.push((meridian, lat));
            chains.push(current);
            current = vec![(meridian, lat)];
        }
        if i < n - 1 {
            current.push(unwrapped[i + 1]);
        }
    }

    if chains.is_empty() {
        return match normalize_chain(current) {
            Some(whole) => CutRing::Whole(whole),
            None => CutRing::Chains(Vec::new()),
        };
    }

    // The walk started mid-chain; the trailing piece continues into the
    // leading one across the ring closure, offset by the net winding.
    let offset = unwrapped[n].0 - unwrapped[0].0;
    let first = chains.remove(0);
    current.extend(first.into_iter().map(|(lon, lat)| (lon + offset, lat)));
    chains.push(current);

    CutRing::Chains(chains.into_iter().filter_map(normalize_chain).collect())
}

/// Shift a chain into [-180, 180] by a whole number of turns, dropping it
/// if it is a degenerate sliver running along the meridian itself.
fn normalize_chain(chain: Vec<(f64, f64)>) -> Option<GeoRing> {
    let on_meridian = |lon: f64| {
        let rem = (lon - 180.0).rem_euclid(360.0);
        rem < LON_EPS || rem > 360.0 - LON_EPS
    };
    let interior = chain
        .iter()
        .map(|&(lon, _)| lon)
        .find(|&lon| !on_meridian(lon))?;
    let shift = 360.0 * (((interior - 180.0) / 360.0).floor() + 1.0);
    Some(
        chain
            .into_iter()
            .map(|(lon, lat)| (lon - shift, lat))
            .collect(),
    )
}

/// Meridian lines (180° + k·360°) strictly between two unwrapped
/// longitudes, ordered in the direction of travel.
fn meridians_between(a: f64, b: f64) -> Vec<f64> {
    let mut crossings = Vec::new();
    if b > a {
        let mut meridian = 180.0 + 360.0 * (((a - 180.0) / 360.0).floor() + 1.0);
        while meridian < b {
            if meridian > a {
                crossings.push(meridian);
            }
            meridian += 360.0;
        }
    } else {
        let mut meridian = 180.0 + 360.0 * (((a - 180.0) / 360.0).ceil() - 1.0);
        while meridian > b {
            if meridian < a {
                crossings.push(meridian);
            }
            meridian -= 360.0;
        }
    }
    crossings
}

/// Close open chains into rings by walking along the meridian.
///
/// Each chain starts and ends exactly on ±180° and carries the polygon
/// interior on its left, exterior and hole chains alike. The walk
/// continues north along +180° and south along -180°, connecting to the
/// nearest chain start in that direction; hole chains run opposite the
/// exterior's and slot in as notches along the way. When nothing lies
/// ahead the ring must continue over a pole.
fn stitch_chains(mut chains: Vec<GeoRing>, policy: PoleInclusionPolicy) -> Result<Vec<GeoRing>> {
    let mut rings = Vec::new();
    let max_steps = 2 * chains.len() + 8;

    while !chains.is_empty() {
        let mut ring = chains.remove(0);
        let mut steps = 0;
        loop {
            steps += 1;
            if steps > max_steps {
                return Err(FootprintError::GeometryCorrection {
                    message: "antimeridian stitching did not converge".to_string(),
                });
            }

            let Some(&(end_lon, end_lat)) = ring.last() else {
                return Err(FootprintError::GeometryCorrection {
                    message: "empty chain during antimeridian stitching".to_string(),
                });
            };
            let (start_lon, start_lat) = ring[0];
            let northward = end_lon > 0.0;
            let ahead = |lat: f64| {
                if northward {
                    lat >= end_lat - LON_EPS
                } else {
                    lat <= end_lat + LON_EPS
                }
            };

            // Closing back to the ring's own start wins ties.
            let mut best: Option<(f64, Option<usize>)> = None;
            if (start_lon - end_lon).abs() < LON_EPS && ahead(start_lat) {
                best = Some((start_lat, None));
            }
            for (i, chain) in chains.iter().enumerate() {
                let (s_lon, s_lat) = chain[0];
                if (s_lon - end_lon).abs() < LON_EPS && ahead(s_lat) {
                    let closer = match best {
                        None => true,
                        Some((b_lat, _)) => {
                            if northward {
                                s_lat < b_lat
                            } else {
                                s_lat > b_lat
                            }
                        }
                    };
                    if closer {
                        best = Some((s_lat, Some(i)));
                    }
                }
            }

            match best {
                Some((_, None)) => {
                    rings.push(ring);
                    break;
                }
                Some((_, Some(i))) => {
                    let chain = chains.remove(i);
                    ring.extend(chain);
                }
                None => {
                    // Nothing ahead on this side: the ring encircles a pole.
                    let pole_lat = match policy {
                        PoleInclusionPolicy::Auto => {
                            if northward {
                                90.0
                            } else {
                                -90.0
                            }
                        }
                        PoleInclusionPolicy::North => 90.0,
                        PoleInclusionPolicy::South => -90.0,
                    };
                    ring.push((end_lon, pole_lat));
                    ring.push((-end_lon, pole_lat));
                }
            }
        }
    }

    Ok(rings)
}

/// Wrap a longitude into [-180, 180).
fn wrap_lon(lon: f64) -> f64 {
    lon - 360.0 * ((lon + 180.0) / 360.0).floor()
}

/// Wrap a longitude difference into (-180, 180].
fn wrap_delta(delta: f64) -> f64 {
    delta - 360.0 * ((delta - 180.0) / 360.0).ceil()
}
