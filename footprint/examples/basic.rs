//! Basic footprint extraction from an in-memory raster.
//!
//! Run with: cargo run --example basic

use footprint::{extract_footprint, AffineTransform, FootprintConfig, RasterSample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A 5x5 grid with a nodata corner and a nodata pixel in the middle.
    let nd = -9999.0;
    let data = vec![
        nd, nd, 1.0, 1.0, 1.0, //
        nd, 1.0, 1.0, 1.0, 1.0, //
        1.0, 1.0, nd, 1.0, 1.0, //
        1.0, 1.0, 1.0, 1.0, 1.0, //
        1.0, 1.0, 1.0, 1.0, 1.0, //
    ];
    let transform = AffineTransform::from_origin(10.0, 50.0, 0.1, -0.1);
    let sample = RasterSample::new(data, 5, 5, Some(nd), transform, 4326)?;

    let geometry = extract_footprint(&sample, &FootprintConfig::default())?;

    let (min_lon, min_lat, max_lon, max_lat) = geometry.bounds();
    println!("footprint polygons: {}", geometry.polygons().len());
    println!(
        "bounds: ({:.2}, {:.2}) to ({:.2}, {:.2})",
        min_lon, min_lat, max_lon, max_lat
    );
    for (i, polygon) in geometry.polygons().iter().enumerate() {
        println!(
            "polygon {}: {} exterior vertices, {} holes",
            i,
            polygon.exterior.len(),
            polygon.holes.len()
        );
    }

    Ok(())
}
