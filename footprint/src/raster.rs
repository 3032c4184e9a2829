//! Raster input: the sample grid handed to the extraction pipeline.
//!
//! The pipeline does not decode raster formats in general; it consumes a
//! [`RasterSample`] prepared by the caller. One self-describing text format
//! is supported directly, the ESRI ASCII grid (`.asc`), which carries its
//! own georeferencing header but no CRS (EPSG:4326 is assumed unless stated
//! otherwise).

use std::path::Path;

use crate::error::{FootprintError, Result};

/// Affine transform mapping pixel (column, row) to CRS coordinates.
///
/// Uses the six-coefficient convention
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// For a north-up raster `b` and `d` are zero, `e` is negative (row index
/// grows southward) and `(c, f)` is the top-left corner of pixel (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    /// Create a transform from the six coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create a north-up transform from the top-left corner and per-pixel
    /// resolutions. `y_res` is typically negative.
    pub fn from_origin(x0: f64, y0: f64, x_res: f64, y_res: f64) -> Self {
        Self::new(x_res, 0.0, x0, 0.0, y_res, y0)
    }

    /// Map pixel coordinates to CRS coordinates.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Whether the transform can be inverted.
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > f64::EPSILON
    }

    /// Inverse transform mapping CRS coordinates back to pixel coordinates,
    /// or `None` if the transform is singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= f64::EPSILON {
            return None;
        }
        let a = self.e / det;
        let b = -self.b / det;
        let d = -self.d / det;
        let e = self.a / det;
        Some(Self {
            a,
            b,
            c: -(a * self.c + b * self.f),
            d,
            e,
            f: -(d * self.c + e * self.f),
        })
    }
}

/// A single-band raster sample: the immutable input to the pipeline.
///
/// Data is stored row-major, north row first, one `f64` per pixel.
#[derive(Debug, Clone)]
pub struct RasterSample {
    data: Vec<f64>,
    width: usize,
    height: usize,
    nodata: Option<f64>,
    transform: AffineTransform,
    epsg: u16,
}

impl RasterSample {
    /// Create a sample from raw parts.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Shape`] if either dimension is zero or if
    /// `data` does not hold exactly `width * height` samples.
    pub fn new(
        data: Vec<f64>,
        width: usize,
        height: usize,
        nodata: Option<f64>,
        transform: AffineTransform,
        epsg: u16,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FootprintError::Shape {
                message: format!("raster has empty dimensions ({}x{})", width, height),
            });
        }
        if data.len() != width * height {
            return Err(FootprintError::Shape {
                message: format!(
                    "expected {} samples for a {}x{} raster, found {}",
                    width * height,
                    width,
                    height,
                    data.len()
                ),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            nodata,
            transform,
            epsg,
        })
    }

    /// Load an ESRI ASCII grid file, assuming EPSG:4326.
    pub fn from_ascii_grid<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_ascii_grid_with_crs(path, 4326)
    }

    /// Load an ESRI ASCII grid file with an explicit EPSG code.
    pub fn from_ascii_grid_with_crs<P: AsRef<Path>>(path: P, epsg: u16) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_ascii_grid(&text, epsg)
    }

    /// Parse ESRI ASCII grid text.
    ///
    /// Recognized header keys (case-insensitive): `ncols`, `nrows`,
    /// `xllcorner` or `xllcenter`, `yllcorner` or `yllcenter`, `cellsize`,
    /// and optional `nodata_value`. The header is followed by `nrows` rows
    /// of whitespace-separated samples, north row first.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Shape`] for missing or malformed header
    /// keys and for a sample count that does not match `ncols * nrows`.
    pub fn parse_ascii_grid(text: &str, epsg: u16) -> Result<Self> {
        let mut ncols: Option<usize> = None;
        let mut nrows: Option<usize> = None;
        let mut xll: Option<(f64, bool)> = None; // (value, is_center)
        let mut yll: Option<(f64, bool)> = None;
        let mut cellsize: Option<f64> = None;
        let mut nodata: Option<f64> = None;
        let mut data: Vec<f64> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let mut parts = trimmed.split_whitespace();
                let key = parts.next().unwrap_or_default().to_lowercase();
                let value: f64 = parts
                    .next()
                    .ok_or_else(|| header_error(&key, "missing value"))?
                    .parse()
                    .map_err(|_| header_error(&key, "unparseable value"))?;
                match key.as_str() {
                    "ncols" => ncols = Some(positive_count(&key, value)?),
                    "nrows" => nrows = Some(positive_count(&key, value)?),
                    "xllcorner" => xll = Some((value, false)),
                    "xllcenter" => xll = Some((value, true)),
                    "yllcorner" => yll = Some((value, false)),
                    "yllcenter" => yll = Some((value, true)),
                    "cellsize" => cellsize = Some(value),
                    "nodata_value" => nodata = Some(value),
                    other => {
                        return Err(FootprintError::Shape {
                            message: format!("unknown ASCII grid header key '{}'", other),
                        })
                    }
                }
            } else {
                for token in trimmed.split_whitespace() {
                    let sample: f64 = token.parse().map_err(|_| FootprintError::Shape {
                        message: format!("unparseable sample value '{}'", token),
                    })?;
                    data.push(sample);
                }
            }
        }

        let ncols = ncols.ok_or_else(|| header_error("ncols", "missing"))?;
        let nrows = nrows.ok_or_else(|| header_error("nrows", "missing"))?;
        let (x_raw, x_center) = xll.ok_or_else(|| header_error("xllcorner", "missing"))?;
        let (y_raw, y_center) = yll.ok_or_else(|| header_error("yllcorner", "missing"))?;
        let cellsize = cellsize.ok_or_else(|| header_error("cellsize", "missing"))?;
        if !cellsize.is_finite() || cellsize <= 0.0 {
            return Err(header_error("cellsize", "must be positive"));
        }

        // Center registration shifts the corner by half a cell.
        let x0 = if x_center { x_raw - cellsize / 2.0 } else { x_raw };
        let y_bottom = if y_center { y_raw - cellsize / 2.0 } else { y_raw };
        let y_top = y_bottom + nrows as f64 * cellsize;
        let transform = AffineTransform::from_origin(x0, y_top, cellsize, -cellsize);

        Self::new(data, ncols, nrows, nodata, transform, epsg)
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The nodata sentinel, if any.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Pixel-to-CRS affine transform.
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// EPSG code of the source CRS.
    pub fn epsg(&self) -> u16 {
        self.epsg
    }

    /// Sample value at (column, row). Panics if out of range.
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.width + col]
    }
}

fn header_error(key: &str, problem: &str) -> FootprintError {
    FootprintError::Shape {
        message: format!("ASCII grid header '{}': {}", key, problem),
    }
}

fn positive_count(key: &str, value: f64) -> Result<usize> {
    if value.fract() != 0.0 || value < 1.0 || value > usize::MAX as f64 {
        return Err(header_error(key, "must be a positive integer"));
    }
    Ok(value as usize)
}
