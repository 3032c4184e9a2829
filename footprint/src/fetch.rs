//! Remote raster fetch.
//!
//! Downloads an ESRI ASCII grid over HTTP, with compression detected from
//! the URL suffix. Only available when the `fetch` feature is enabled.
//!
//! The fetch is deliberately blocking; async callers should offload it to
//! a blocking worker alongside the extraction itself.

use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use zip::ZipArchive;

use crate::error::{FootprintError, Result};
use crate::raster::RasterSample;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Compression format of a fetched grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw `.asc` text.
    #[default]
    None,
    /// Gzip compressed (`.asc.gz`).
    Gzip,
    /// ZIP archive containing one `.asc` entry.
    Zip,
}

impl Compression {
    /// Detect the compression format from a URL or filename.
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.ends_with(".gz") {
            Compression::Gzip
        } else if lower.ends_with(".zip") {
            Compression::Zip
        } else {
            Compression::None
        }
    }
}

/// Fetch an ASCII grid from a URL, assuming EPSG:4326.
pub fn fetch_ascii_grid(url: &str) -> Result<RasterSample> {
    fetch_ascii_grid_with_crs(url, 4326)
}

/// Fetch an ASCII grid from a URL with an explicit EPSG code.
///
/// # Errors
///
/// Returns [`FootprintError::Fetch`] for transport failures, non-success
/// status codes and undecodable payloads; grid parsing failures propagate
/// as [`FootprintError::Shape`].
pub fn fetch_ascii_grid_with_crs(url: &str, epsg: u16) -> Result<RasterSample> {
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| fetch_error(url, &e.to_string()))?;

    tracing::debug!(url = url, "fetching raster");
    let response = client
        .get(url)
        .send()
        .map_err(|e| fetch_error(url, &e.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_error(
            url,
            &format!("server returned {}", response.status()),
        ));
    }
    let bytes = response
        .bytes()
        .map_err(|e| fetch_error(url, &e.to_string()))?;

    let text = decompress(bytes.as_ref(), Compression::from_url(url))
        .map_err(|message| fetch_error(url, &message))?;
    RasterSample::parse_ascii_grid(&text, epsg)
}

/// Decode the payload into grid text according to its compression.
fn decompress(bytes: &[u8], compression: Compression) -> std::result::Result<String, String> {
    match compression {
        Compression::None => {
            String::from_utf8(bytes.to_vec()).map_err(|_| "payload is not UTF-8".to_string())
        }
        Compression::Gzip => {
            let mut decoder = GzDecoder::new(bytes);
            let mut text = String::new();
            decoder
                .read_to_string(&mut text)
                .map_err(|e| format!("gzip decode failed: {}", e))?;
            Ok(text)
        }
        Compression::Zip => {
            let mut archive = ZipArchive::new(Cursor::new(bytes))
                .map_err(|e| format!("zip open failed: {}", e))?;
            let index = (0..archive.len())
                .find(|&i| {
                    archive
                        .by_index(i)
                        .map(|entry| entry.name().to_lowercase().ends_with(".asc"))
                        .unwrap_or(false)
                })
                .ok_or_else(|| "zip archive contains no .asc entry".to_string())?;
            let mut entry = archive
                .by_index(index)
                .map_err(|e| format!("zip read failed: {}", e))?;
            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|e| format!("zip decode failed: {}", e))?;
            Ok(text)
        }
    }
}

fn fetch_error(url: &str, message: &str) -> FootprintError {
    FootprintError::Fetch {
        url: url.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GRID: &str = "\
ncols 2
nrows 2
xllcorner 0
yllcorner 0
cellsize 1.0
1 2
3 4
";

    #[test]
    fn test_compression_from_url() {
        assert_eq!(
            Compression::from_url("https://example.com/scene.asc"),
            Compression::None
        );
        assert_eq!(
            Compression::from_url("https://example.com/scene.asc.gz"),
            Compression::Gzip
        );
        assert_eq!(
            Compression::from_url("https://example.com/scene.ASC.ZIP"),
            Compression::Zip
        );
    }

    #[test]
    fn test_decompress_plain() {
        let text = decompress(GRID.as_bytes(), Compression::None).unwrap();
        assert_eq!(text, GRID);
    }

    #[test]
    fn test_decompress_gzip() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(GRID.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let text = decompress(&compressed, Compression::Gzip).unwrap();
        assert_eq!(text, GRID);
    }

    #[test]
    fn test_decompress_zip() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("scene.asc", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(GRID.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let text = decompress(buffer.get_ref(), Compression::Zip).unwrap();
        assert_eq!(text, GRID);
    }

    #[test]
    fn test_zip_without_grid_entry_fails() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("readme.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"nothing").unwrap();
            writer.finish().unwrap();
        }

        let result = decompress(buffer.get_ref(), Compression::Zip);
        assert!(result.is_err());
    }
}
