//! Geographic geometry types shared by the pipeline stages.

/// An open ring of (longitude, latitude) vertices; the last vertex
/// implicitly connects back to the first.
pub type GeoRing = Vec<(f64, f64)>;

/// One polygon: an outer ring plus zero or more hole rings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    /// Outer boundary, counter-clockwise.
    pub exterior: GeoRing,
    /// Holes, clockwise, each fully inside the exterior.
    pub holes: Vec<GeoRing>,
}

impl GeoPolygon {
    /// Polygon with an exterior ring and no holes.
    pub fn new(exterior: GeoRing) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }
}

/// The assembled footprint: a single polygon, or several when the valid
/// region is disjoint or was split at the antimeridian.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(GeoPolygon),
    MultiPolygon(Vec<GeoPolygon>),
}

impl Geometry {
    /// Wrap a polygon list; `None` when the list is empty.
    pub fn from_polygons(mut polygons: Vec<GeoPolygon>) -> Option<Self> {
        if polygons.len() > 1 {
            return Some(Geometry::MultiPolygon(polygons));
        }
        polygons.pop().map(Geometry::Polygon)
    }

    /// View the contained polygons as a slice.
    pub fn polygons(&self) -> &[GeoPolygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    /// Consume into a polygon list.
    pub fn into_polygons(self) -> Vec<GeoPolygon> {
        match self {
            Geometry::Polygon(p) => vec![p],
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    /// Bounding box as (min_lon, min_lat, max_lon, max_lat).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut min_lon = f64::INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        for polygon in self.polygons() {
            for &(lon, lat) in &polygon.exterior {
                min_lon = min_lon.min(lon);
                min_lat = min_lat.min(lat);
                max_lon = max_lon.max(lon);
                max_lat = max_lat.max(lat);
            }
        }
        (min_lon, min_lat, max_lon, max_lat)
    }
}

/// Signed shoelace area of a closed ring (positive = counter-clockwise).
pub fn signed_area(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum / 2.0
}

/// Whether a ring winds counter-clockwise.
pub fn is_ccw(ring: &[(f64, f64)]) -> bool {
    signed_area(ring) > 0.0
}

/// Even-odd ray cast; points exactly on the boundary are unspecified.
pub(crate) fn point_in_ring(point: (f64, f64), ring: &[(f64, f64)]) -> bool {
    let (px, py) = point;
    let n = ring.len();
    let mut inside = false;
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        if (y0 > py) != (y1 > py) {
            let x_cross = x0 + (py - y0) / (y1 - y0) * (x1 - x0);
            if px < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether any two non-adjacent ring segments properly cross.
///
/// Rings that merely touch at a shared vertex (a pinch point, which the
/// tracer legitimately produces) are not reported.
pub(crate) fn ring_self_intersects(ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a0 = ring[i];
        let a1 = ring[(i + 1) % n];
        for j in (i + 2)..n {
            // Skip adjacent segments, including the closing pair.
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = ring[j];
            let b1 = ring[(j + 1) % n];
            if segments_cross(a0, a1, b0, b1) {
                return true;
            }
        }
    }
    false
}

fn segments_cross(a0: (f64, f64), a1: (f64, f64), b0: (f64, f64), b1: (f64, f64)) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}
