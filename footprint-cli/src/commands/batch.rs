use anyhow::{bail, Context, Result};
use footprint::geojson::footprint_feature;
use footprint::{extract_footprint, FootprintConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn run(
    config: &FootprintConfig,
    manifest: &Path,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let file = File::open(manifest).context("Failed to open manifest file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let input_idx = headers
        .iter()
        .position(|h| h == "input")
        .context("Column 'input' not found in manifest")?;
    let epsg_idx = headers.iter().position(|h| h == "epsg");

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    if records.is_empty() {
        bail!("Manifest contains no rows");
    }

    let output_dir = match output_dir {
        Some(dir) => dir,
        None => manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut failures: Vec<(String, String)> = Vec::new();
    for record in records {
        let input = record.get(input_idx).context("Missing input value")?;
        let epsg: u16 = match epsg_idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse()
                .with_context(|| format!("Invalid epsg value '{}' for {}", s, input))?,
            None => 4326,
        };

        if let Err(e) = process_row(config, input, epsg, &output_dir) {
            failures.push((input.to_string(), format!("{:#}", e)));
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if !failures.is_empty() {
        eprintln!("{} raster(s) failed:", failures.len());
        for (input, error) in &failures {
            eprintln!("  {}: {}", input, error);
        }
        bail!("{} of the manifest rows failed", failures.len());
    }

    println!("Output written to: {}", output_dir.display());
    Ok(())
}

fn process_row(
    config: &FootprintConfig,
    input: &str,
    epsg: u16,
    output_dir: &Path,
) -> Result<()> {
    let sample = super::load_sample(input, epsg)
        .with_context(|| format!("Failed to load raster from {}", input))?;
    let geometry = extract_footprint(&sample, config).context("Footprint extraction failed")?;
    let feature = footprint_feature(&geometry, input);

    let stem = Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "footprint".to_string());
    let output_path = output_dir.join(format!("{}_footprint.geojson", stem));
    let file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &feature)?;
    writer.flush()?;

    Ok(())
}
