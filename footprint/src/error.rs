//! Error types for the footprint library.

use thiserror::Error;

/// Errors that can occur during footprint extraction.
#[derive(Error, Debug)]
pub enum FootprintError {
    /// IO error when reading raster files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or empty input array (zero rows/columns, bad grid header,
    /// sample count mismatch).
    #[error("Invalid raster shape: {message}")]
    Shape { message: String },

    /// The raster contains no valid pixels at all (entirely nodata).
    ///
    /// Semantically distinct from [`FootprintError::Shape`]: the input was
    /// well-formed, there is just nothing to outline.
    #[error("Raster contains no valid pixels (entire raster is nodata)")]
    EmptyMask,

    /// Unsupported CRS or singular pixel-to-CRS transform.
    #[error("Projection failed: {message}")]
    Projection { message: String },

    /// Unrecoverable topology after antimeridian correction.
    ///
    /// This indicates an upstream tracing or simplification bug and should
    /// be logged for investigation.
    #[error("Geometry correction failed: {message}")]
    GeometryCorrection { message: String },

    /// Simplification tolerance rejected before the pipeline ran.
    #[error("Invalid simplify tolerance: {value} (must be finite and non-negative)")]
    InvalidTolerance { value: f64 },

    /// Remote raster fetch failed.
    #[cfg(feature = "fetch")]
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },
}

impl FootprintError {
    /// Short machine-readable tag identifying the error kind.
    ///
    /// The HTTP boundary uses this to map each kind to a distinct response
    /// without losing the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FootprintError::Io(_) => "io",
            FootprintError::Shape { .. } => "shape",
            FootprintError::EmptyMask => "empty_mask",
            FootprintError::Projection { .. } => "projection",
            FootprintError::GeometryCorrection { .. } => "geometry_correction",
            FootprintError::InvalidTolerance { .. } => "invalid_tolerance",
            #[cfg(feature = "fetch")]
            FootprintError::Fetch { .. } => "fetch",
        }
    }
}

/// Result type alias using [`FootprintError`].
pub type Result<T> = std::result::Result<T, FootprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FootprintError::Shape {
            message: "expected 100 samples, found 99".to_string(),
        };
        assert!(err.to_string().contains("99"));

        let err = FootprintError::InvalidTolerance { value: -1.5 };
        assert!(err.to_string().contains("-1.5"));

        let err = FootprintError::EmptyMask;
        assert!(err.to_string().contains("nodata"));
    }

    #[test]
    fn test_error_kind_tags() {
        assert_eq!(FootprintError::EmptyMask.kind(), "empty_mask");
        assert_eq!(
            FootprintError::Projection {
                message: String::new()
            }
            .kind(),
            "projection"
        );
        assert_eq!(
            FootprintError::GeometryCorrection {
                message: String::new()
            }
            .kind(),
            "geometry_correction"
        );
    }
}
