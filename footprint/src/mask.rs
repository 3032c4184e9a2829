//! Valid/invalid pixel mask derivation.

use crate::error::{FootprintError, Result};
use crate::raster::RasterSample;

/// Absolute tolerance used when comparing floating-point samples to the
/// nodata sentinel.
pub const NODATA_EPSILON: f64 = 1e-9;

/// A binary validity grid with the same dimensions as its source raster.
///
/// `true` marks a valid pixel: finite and not equal to the nodata sentinel.
#[derive(Debug, Clone)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    valid_count: usize,
}

impl Mask {
    /// Derive the mask from a raster sample.
    ///
    /// A pixel is valid iff its sample is finite and differs from the
    /// nodata value by more than [`NODATA_EPSILON`]. A NaN nodata sentinel
    /// excludes exactly the NaN samples (already covered by the finiteness
    /// check). Without a nodata value every finite sample is valid.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Shape`] if the raster has zero rows or
    /// columns; an empty array cannot produce a meaningful polygon.
    pub fn build(sample: &RasterSample) -> Result<Self> {
        let width = sample.width();
        let height = sample.height();
        if width == 0 || height == 0 {
            return Err(FootprintError::Shape {
                message: format!("cannot mask an empty raster ({}x{})", width, height),
            });
        }

        let nodata = sample.nodata();
        let mut cells = Vec::with_capacity(width * height);
        let mut valid_count = 0;
        for row in 0..height {
            for col in 0..width {
                let value = sample.get(col, row);
                let valid = value.is_finite()
                    && match nodata {
                        Some(nd) if nd.is_finite() => (value - nd).abs() > NODATA_EPSILON,
                        _ => true,
                    };
                if valid {
                    valid_count += 1;
                }
                cells.push(valid);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            valid_count,
        })
    }

    /// Build a mask directly from boolean cells (row-major).
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Shape`] on empty dimensions or a cell
    /// count mismatch.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FootprintError::Shape {
                message: format!("cannot build an empty mask ({}x{})", width, height),
            });
        }
        if cells.len() != width * height {
            return Err(FootprintError::Shape {
                message: format!(
                    "expected {} cells for a {}x{} mask, found {}",
                    width * height,
                    width,
                    height,
                    cells.len()
                ),
            });
        }
        let valid_count = cells.iter().filter(|&&c| c).count();
        Ok(Self {
            width,
            height,
            cells,
            valid_count,
        })
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of valid pixels.
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Validity at (column, row); out-of-bounds coordinates are invalid.
    pub fn get(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return false;
        }
        self.cells[row as usize * self.width + col as usize]
    }
}
