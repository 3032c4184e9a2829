use anyhow::{Context, Result};
use footprint::geojson::{footprint_feature, to_geojson};
use footprint::{extract_footprint, FootprintConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub fn run(
    config: &FootprintConfig,
    input: &str,
    output: Option<PathBuf>,
    epsg: u16,
    feature: bool,
    pretty: bool,
) -> Result<()> {
    let sample = super::load_sample(input, epsg)
        .with_context(|| format!("Failed to load raster from {}", input))?;

    let geometry =
        extract_footprint(&sample, config).context("Footprint extraction failed")?;

    let json = if feature {
        render(&footprint_feature(&geometry, input), pretty)?
    } else {
        render(&to_geojson(&geometry), pretty)?
    };

    match output {
        Some(path) => {
            let file = File::create(&path).context("Failed to create output file")?;
            let mut writer = BufWriter::new(file);
            writer.write_all(json.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            eprintln!("Output written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
