pub mod batch;
pub mod extract;
pub mod info;

use anyhow::{anyhow, Result};
use footprint::{FootprintConfig, PoleInclusionPolicy, RasterSample};

/// Build an extraction config from the global CLI flags.
pub fn build_config(
    tolerance: f64,
    min_area: u64,
    pole_policy: &str,
    precision: u32,
) -> Result<FootprintConfig> {
    let pole_inclusion_policy: PoleInclusionPolicy =
        pole_policy.parse().map_err(|e: String| anyhow!(e))?;
    let config = FootprintConfig {
        simplify_tolerance_pixels: tolerance,
        min_region_area_pixels: min_area,
        pole_inclusion_policy,
        coordinate_precision: precision,
    };
    config.validate()?;
    Ok(config)
}

/// Load a raster from a local path or an http(s) URL.
pub fn load_sample(input: &str, epsg: u16) -> footprint::Result<RasterSample> {
    if input.starts_with("http://") || input.starts_with("https://") {
        footprint::fetch::fetch_ascii_grid_with_crs(input, epsg)
    } else {
        RasterSample::from_ascii_grid_with_crs(input, epsg)
    }
}
