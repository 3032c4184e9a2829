//! Extraction configuration.
//!
//! All options are passed explicitly per invocation; the library holds no
//! global mutable state. [`FootprintConfig::from_env`] exists for the
//! service and CLI wrappers, which read `FOOTPRINT_*` variables once at
//! startup and then pass the resulting config through.

use std::str::FromStr;

use crate::error::{FootprintError, Result};

/// Default simplification tolerance in pixel units.
///
/// Half a pixel: collinear tracing artifacts are removed while no simplified
/// vertex can drift further than half a cell from the traced boundary.
pub const DEFAULT_SIMPLIFY_TOLERANCE_PIXELS: f64 = 0.5;

/// Default minimum region area in pixels. Regions below this are discarded.
pub const DEFAULT_MIN_REGION_AREA_PIXELS: u64 = 1;

/// Default number of decimal places kept in output coordinates.
///
/// Seven decimal degrees is roughly centimetre precision at the equator,
/// enough for any raster footprint while suppressing floating-point noise.
pub const DEFAULT_COORDINATE_PRECISION: u32 = 7;

/// How a ring that encircles a pole is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoleInclusionPolicy {
    /// Derive the pole from the direction the ring winds around the
    /// antimeridian: rings walked north along +180° close over the north
    /// pole, rings walked south along -180° close over the south pole.
    #[default]
    Auto,
    /// Always close pole-enclosing rings over the north pole.
    North,
    /// Always close pole-enclosing rings over the south pole.
    South,
}

impl FromStr for PoleInclusionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(PoleInclusionPolicy::Auto),
            "north" => Ok(PoleInclusionPolicy::North),
            "south" => Ok(PoleInclusionPolicy::South),
            other => Err(format!(
                "unknown pole policy '{}' (expected auto, north or south)",
                other
            )),
        }
    }
}

/// Configuration for one footprint extraction.
#[derive(Debug, Clone)]
pub struct FootprintConfig {
    /// Maximum distance, in pixel units, a simplified vertex may deviate
    /// from the traced boundary.
    pub simplify_tolerance_pixels: f64,
    /// Connected valid regions smaller than this many pixels are discarded.
    pub min_region_area_pixels: u64,
    /// How pole-enclosing rings are closed during antimeridian correction.
    pub pole_inclusion_policy: PoleInclusionPolicy,
    /// Decimal places kept in output coordinates.
    pub coordinate_precision: u32,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self {
            simplify_tolerance_pixels: DEFAULT_SIMPLIFY_TOLERANCE_PIXELS,
            min_region_area_pixels: DEFAULT_MIN_REGION_AREA_PIXELS,
            pole_inclusion_policy: PoleInclusionPolicy::default(),
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
        }
    }
}

impl FootprintConfig {
    /// Build a configuration from `FOOTPRINT_*` environment variables.
    ///
    /// Recognized variables, all optional:
    ///
    /// | Variable | Option | Default |
    /// |----------|--------|---------|
    /// | `FOOTPRINT_SIMPLIFY_TOLERANCE` | `simplify_tolerance_pixels` | 0.5 |
    /// | `FOOTPRINT_MIN_REGION_AREA` | `min_region_area_pixels` | 1 |
    /// | `FOOTPRINT_POLE_POLICY` | `pole_inclusion_policy` | auto |
    /// | `FOOTPRINT_PRECISION` | `coordinate_precision` | 7 |
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            simplify_tolerance_pixels: env_parse(
                "FOOTPRINT_SIMPLIFY_TOLERANCE",
                defaults.simplify_tolerance_pixels,
            ),
            min_region_area_pixels: env_parse(
                "FOOTPRINT_MIN_REGION_AREA",
                defaults.min_region_area_pixels,
            ),
            pole_inclusion_policy: env_parse(
                "FOOTPRINT_POLE_POLICY",
                defaults.pole_inclusion_policy,
            ),
            coordinate_precision: env_parse("FOOTPRINT_PRECISION", defaults.coordinate_precision),
        }
    }

    /// Validate the configuration before running the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::InvalidTolerance`] if the simplification
    /// tolerance is negative, NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        if !self.simplify_tolerance_pixels.is_finite() || self.simplify_tolerance_pixels < 0.0 {
            return Err(FootprintError::InvalidTolerance {
                value: self.simplify_tolerance_pixels,
            });
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
