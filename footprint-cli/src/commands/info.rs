use anyhow::{Context, Result};
use footprint::{trace, FootprintConfig, Mask, RasterSample, Reprojector};
use std::path::Path;

pub fn run(input: &Path, epsg: u16) -> Result<()> {
    let sample = RasterSample::from_ascii_grid_with_crs(input, epsg)
        .with_context(|| format!("Failed to load raster from {}", input.display()))?;

    let metadata = std::fs::metadata(input)?;

    let mask = Mask::build(&sample).context("Failed to derive validity mask")?;
    let total = mask.width() * mask.height();
    let coverage = mask.valid_count() as f64 / total as f64 * 100.0;

    println!("Raster: {}", input.display());
    println!("File size: {}", format_size(metadata.len()));
    println!();
    println!("Dimensions: {}x{} pixels", sample.width(), sample.height());
    println!("CRS: EPSG:{}", sample.epsg());
    match sample.nodata() {
        Some(nd) => println!("Nodata value: {}", nd),
        None => println!("Nodata value: none"),
    }
    println!(
        "Valid pixels: {} of {} ({:.1}%)",
        mask.valid_count(),
        total,
        coverage
    );

    let config = FootprintConfig::default();
    match trace::trace_regions(&mask, config.min_region_area_pixels) {
        Ok(regions) => {
            let holes: usize = regions.iter().map(|r| r.holes.len()).sum();
            println!("Regions: {}", regions.len());
            println!("Holes: {}", holes);

            if let Ok(bounds) = region_bounds(&sample, &regions) {
                let (min_lon, min_lat, max_lon, max_lat) = bounds;
                println!(
                    "Bounds: ({:.4}, {:.4}) to ({:.4}, {:.4})",
                    min_lon, min_lat, max_lon, max_lat
                );
            }
        }
        Err(footprint::FootprintError::EmptyMask) => {
            println!("Regions: 0 (raster is entirely nodata)");
        }
        Err(e) => return Err(e).context("Boundary tracing failed"),
    }

    Ok(())
}

/// Geographic bounds of the traced outer rings, before simplification.
fn region_bounds(
    sample: &RasterSample,
    regions: &[trace::PixelRegion],
) -> footprint::Result<(f64, f64, f64, f64)> {
    let reprojector = Reprojector::new(*sample.transform(), sample.epsg())?;
    let (mut min_lon, mut min_lat) = (f64::INFINITY, f64::INFINITY);
    let (mut max_lon, mut max_lat) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for region in regions {
        for &(col, row) in &region.outer {
            let (lon, lat) = reprojector.pixel_to_geographic(col as f64, row as f64)?;
            min_lon = min_lon.min(lon);
            min_lat = min_lat.min(lat);
            max_lon = max_lon.max(lon);
            max_lat = max_lat.max(lat);
        }
    }
    Ok((min_lon, min_lat, max_lon, max_lat))
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
