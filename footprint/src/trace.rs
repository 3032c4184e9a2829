//! Boundary tracing: binary mask to closed pixel-space rings.
//!
//! Valid regions are labeled with 4-connectivity, then each region's
//! boundary is collected as directed unit edges along pixel borders and
//! stitched into closed rings. Every traced ring is closed (last vertex
//! implicitly connects to the first), keeps the region interior on its
//! right-hand side, and never crosses itself.
//!
//! Winding convention in pixel space (row axis pointing down): outer rings
//! carry positive shoelace area, hole rings negative.

use std::collections::BTreeMap;

use crate::error::{FootprintError, Result};
use crate::mask::Mask;

/// A closed loop of integer pixel-corner vertices. The first vertex is not
/// repeated at the end.
pub type PixelRing = Vec<(i64, i64)>;

/// One connected valid region: an outer boundary plus any enclosed holes.
#[derive(Debug, Clone)]
pub struct PixelRegion {
    /// Outer boundary ring, positive shoelace area.
    pub outer: PixelRing,
    /// Fully enclosed hole rings, negative shoelace area.
    pub holes: Vec<PixelRing>,
}

/// Trace the boundaries of all valid regions in the mask.
///
/// Regions smaller than `min_region_area_pixels` pixels are discarded;
/// there is no minimum otherwise, so a single valid pixel yields its unit
/// square. Regions are returned in scan order (top-left region first),
/// which makes the output deterministic.
///
/// # Errors
///
/// * [`FootprintError::EmptyMask`] if the mask has no valid pixels, or if
///   every region falls under the area threshold.
/// * [`FootprintError::GeometryCorrection`] if edge stitching produces an
///   inconsistent boundary, which would indicate a labeling bug.
pub fn trace_regions(mask: &Mask, min_region_area_pixels: u64) -> Result<Vec<PixelRegion>> {
    if mask.valid_count() == 0 {
        return Err(FootprintError::EmptyMask);
    }

    let (labels, sizes) = label_components(mask);
    let kept: Vec<bool> = sizes
        .iter()
        .map(|&size| size as u64 >= min_region_area_pixels)
        .collect();
    if !kept.iter().any(|&k| k) {
        return Err(FootprintError::EmptyMask);
    }

    // Directed boundary edges per component, keyed by start vertex.
    let width = mask.width();
    let height = mask.height();
    let mut edges: Vec<BTreeMap<(i64, i64), Vec<(i64, i64)>>> =
        vec![BTreeMap::new(); sizes.len()];
    for row in 0..height {
        for col in 0..width {
            let label = labels[row * width + col];
            if label == 0 || !kept[label as usize - 1] {
                continue;
            }
            let map = &mut edges[label as usize - 1];
            let (c, r) = (col as i64, row as i64);
            if !mask.get(c, r - 1) {
                map.entry((c, r)).or_default().push((c + 1, r));
            }
            if !mask.get(c + 1, r) {
                map.entry((c + 1, r)).or_default().push((c + 1, r + 1));
            }
            if !mask.get(c, r + 1) {
                map.entry((c + 1, r + 1)).or_default().push((c, r + 1));
            }
            if !mask.get(c - 1, r) {
                map.entry((c, r + 1)).or_default().push((c, r));
            }
        }
    }

    let mut regions = Vec::new();
    for map in edges {
        if map.is_empty() {
            continue;
        }
        let rings = stitch_rings(map)?;
        let mut outer: Option<PixelRing> = None;
        let mut holes = Vec::new();
        for ring in rings {
            if signed_area2(&ring) > 0 {
                if outer.is_some() {
                    return Err(FootprintError::GeometryCorrection {
                        message: "connected region traced more than one outer ring".to_string(),
                    });
                }
                outer = Some(ring);
            } else {
                holes.push(ring);
            }
        }
        let outer = outer.ok_or_else(|| FootprintError::GeometryCorrection {
            message: "connected region traced no outer ring".to_string(),
        })?;
        regions.push(PixelRegion { outer, holes });
    }

    Ok(regions)
}

/// Label 4-connected valid regions. Returns a row-major label grid
/// (0 = invalid) and the pixel count of each component.
fn label_components(mask: &Mask) -> (Vec<u32>, Vec<usize>) {
    let width = mask.width();
    let height = mask.height();
    let mut labels = vec![0u32; width * height];
    let mut sizes = Vec::new();
    let mut stack = Vec::new();

    for row in 0..height {
        for col in 0..width {
            let idx = row * width + col;
            if labels[idx] != 0 || !mask.get(col as i64, row as i64) {
                continue;
            }
            let label = sizes.len() as u32 + 1;
            let mut size = 0usize;
            labels[idx] = label;
            stack.push((col as i64, row as i64));
            while let Some((c, r)) = stack.pop() {
                size += 1;
                for (nc, nr) in [(c, r - 1), (c + 1, r), (c, r + 1), (c - 1, r)] {
                    if !mask.get(nc, nr) {
                        continue;
                    }
                    let nidx = nr as usize * width + nc as usize;
                    if labels[nidx] == 0 {
                        labels[nidx] = label;
                        stack.push((nc, nr));
                    }
                }
            }
            sizes.push(size);
        }
    }

    (labels, sizes)
}

/// Stitch directed boundary edges into closed rings.
///
/// Every directed edge keeps the valid region on its right and an invalid
/// pixel on its left. At a vertex where two invalid pixels touch
/// diagonally inside one region, two outgoing edges exist; preferring the
/// left turn relative to the incoming direction keeps the walk around the
/// invalid pixel it has been hugging, so rings that pinch together at a
/// shared vertex close separately instead of fusing into a crossing loop.
fn stitch_rings(mut edges: BTreeMap<(i64, i64), Vec<(i64, i64)>>) -> Result<Vec<PixelRing>> {
    for targets in edges.values_mut() {
        targets.sort_unstable();
    }

    let mut rings = Vec::new();

    // Each step consumes one edge, so every walk terminates.
    while let Some((&start, _)) = edges.iter().next() {
        let mut ring: PixelRing = vec![start];
        let mut current = start;
        let mut incoming: Option<(i64, i64)> = None;

        loop {
            let next = take_edge(&mut edges, current, incoming)?;
            if next == start {
                break;
            }
            incoming = Some((next.0 - current.0, next.1 - current.1));
            ring.push(next);
            current = next;
        }

        rings.push(ring);
    }

    Ok(rings)
}

/// Remove and return the outgoing edge at `from`, preferring the left
/// turn relative to the incoming direction when two edges are available.
fn take_edge(
    edges: &mut BTreeMap<(i64, i64), Vec<(i64, i64)>>,
    from: (i64, i64),
    incoming: Option<(i64, i64)>,
) -> Result<(i64, i64)> {
    let targets = edges.get_mut(&from).ok_or_else(|| {
        FootprintError::GeometryCorrection {
            message: format!("open boundary at vertex ({}, {})", from.0, from.1),
        }
    })?;

    let index = match incoming {
        Some((dx, dy)) if targets.len() > 1 => {
            // Left turn with the row axis pointing down: (dx, dy) -> (dy, -dx).
            let preferred = (from.0 + dy, from.1 - dx);
            targets.iter().position(|&t| t == preferred).unwrap_or(0)
        }
        _ => 0,
    };
    let next = targets.swap_remove(index);
    if targets.is_empty() {
        edges.remove(&from);
    }
    Ok(next)
}

/// Twice the signed shoelace area of a closed integer ring.
pub(crate) fn signed_area2(ring: &[(i64, i64)]) -> i64 {
    let n = ring.len();
    let mut sum = 0i64;
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum
}
