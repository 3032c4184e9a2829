//! Pixel-to-geographic reprojection.
//!
//! Ring vertices are pixel-corner coordinates, so the affine transform is
//! applied to them directly; the half-pixel center offset used for point
//! sampling does not apply to cell boundaries. Non-geographic source CRSs
//! are reprojected to WGS84 longitude/latitude with proj4rs, resolving
//! EPSG codes through the crs-definitions database.

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::error::{FootprintError, Result};
use crate::geometry::GeoRing;
use crate::raster::AffineTransform;

/// PROJ string for WGS84 geographic coordinates (EPSG:4326).
const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Look up the PROJ4 string for an EPSG code.
pub fn proj_string(epsg: u16) -> Option<&'static str> {
    crs_definitions::from_code(epsg).map(|def| def.proj4)
}

/// Whether an EPSG code denotes a geographic (longitude/latitude) CRS.
pub fn is_geographic(epsg: u16) -> bool {
    match proj_string(epsg) {
        Some(proj) => proj.contains("+proj=longlat"),
        None => epsg == 4326,
    }
}

/// Project a single point between two EPSG-coded CRSs.
///
/// Geographic inputs and outputs are in degrees.
///
/// # Errors
///
/// Returns [`FootprintError::Projection`] if either code is unknown or the
/// transformation fails.
pub fn project_point(source_epsg: u16, target_epsg: u16, x: f64, y: f64) -> Result<(f64, f64)> {
    if source_epsg == target_epsg {
        return Ok((x, y));
    }

    let source = build_proj(source_epsg)?;
    let target = build_proj(target_epsg)?;

    let (x_in, y_in) = if is_geographic(source_epsg) {
        (x.to_radians(), y.to_radians())
    } else {
        (x, y)
    };

    let mut point = (x_in, y_in, 0.0);
    transform(&source, &target, &mut point).map_err(|e| FootprintError::Projection {
        message: format!(
            "transform from EPSG:{} to EPSG:{} failed: {:?}",
            source_epsg, target_epsg, e
        ),
    })?;

    if is_geographic(target_epsg) {
        Ok((point.0.to_degrees(), point.1.to_degrees()))
    } else {
        Ok((point.0, point.1))
    }
}

fn build_proj(epsg: u16) -> Result<Proj> {
    let proj_str = proj_string(epsg).ok_or_else(|| FootprintError::Projection {
        message: format!("EPSG:{} is not in the crs-definitions database", epsg),
    })?;
    Proj::from_proj_string(proj_str).map_err(|e| FootprintError::Projection {
        message: format!("invalid projection for EPSG:{}: {:?}", epsg, e),
    })
}

/// Maps ring vertices from pixel space to geographic coordinates.
///
/// Holds the projection objects for one extraction so they are built once,
/// not per vertex.
pub struct Reprojector {
    transform: AffineTransform,
    /// `None` when the source CRS is already geographic.
    projection: Option<(Proj, Proj)>,
}

impl Reprojector {
    /// Prepare a reprojector for the given transform and source CRS.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Projection`] if the affine transform is
    /// singular or the EPSG code is unsupported.
    pub fn new(transform: AffineTransform, epsg: u16) -> Result<Self> {
        if !transform.is_invertible() {
            return Err(FootprintError::Projection {
                message: "affine transform is singular".to_string(),
            });
        }

        let projection = if is_geographic(epsg) {
            None
        } else {
            let source = build_proj(epsg)?;
            let target =
                Proj::from_proj_string(WGS84_PROJ).map_err(|e| FootprintError::Projection {
                    message: format!("invalid WGS84 projection: {:?}", e),
                })?;
            Some((source, target))
        };

        Ok(Self {
            transform,
            projection,
        })
    }

    /// Map one pixel-corner coordinate to (longitude, latitude).
    pub fn pixel_to_geographic(&self, col: f64, row: f64) -> Result<(f64, f64)> {
        let (x, y) = self.transform.apply(col, row);
        match &self.projection {
            None => Ok((x, y)),
            Some((source, target)) => {
                let mut point = (x, y, 0.0);
                transform(source, target, &mut point).map_err(|e| {
                    FootprintError::Projection {
                        message: format!("reprojection to WGS84 failed: {:?}", e),
                    }
                })?;
                Ok((point.0.to_degrees(), point.1.to_degrees()))
            }
        }
    }

    /// Map a whole ring, preserving vertex order; no vertex is dropped.
    pub fn reproject_ring(&self, ring: &[(f64, f64)]) -> Result<GeoRing> {
        ring.iter()
            .map(|&(col, row)| self.pixel_to_geographic(col, row))
            .collect()
    }
}
