//! Footprint of a raster straddling the antimeridian.
//!
//! Run with: cargo run --example antimeridian

use footprint::{extract_footprint, AffineTransform, FootprintConfig, RasterSample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Eight one-degree columns starting at 176°E: the grid spans
    // longitudes 176 through 184, crossing the 180° meridian.
    let data = vec![1.0; 8 * 4];
    let transform = AffineTransform::from_origin(176.0, 2.0, 1.0, -1.0);
    let sample = RasterSample::new(data, 8, 4, None, transform, 4326)?;

    let geometry = extract_footprint(&sample, &FootprintConfig::default())?;

    println!(
        "the footprint splits into {} pieces:",
        geometry.polygons().len()
    );
    for polygon in geometry.polygons() {
        let lons: Vec<f64> = polygon.exterior.iter().map(|&(lon, _)| lon).collect();
        let min = lons.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!("  piece covering longitudes {:.1} to {:.1}", min, max);
    }

    Ok(())
}
