//! Error types and path context for weights, statistics and batch operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum MoranError {
    /// Lattice side length outside the supported range
    InvalidDimension {
        /// Requested side length
        side: usize,
        /// Smallest accepted side length
        min: usize,
        /// Largest accepted side length
        max: usize,
    },

    /// Grid and weights (or two grids of one batch) disagree on side length
    DimensionMismatch {
        /// Side length the operation was configured for
        expected: usize,
        /// Side length actually supplied
        found: usize,
    },

    /// Grid shape or content violates the square, finite, two-dimensional contract
    InvalidInput {
        /// Description of what is wrong with the input
        reason: String,
    },

    /// Statistic is undefined because every cell carries the same value
    DegenerateInput {
        /// Number of cells in the rejected grid
        cells: usize,
    },

    /// Image could not be read or decoded
    Decode {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// File name does not follow the `<marker><generation><delimiter><simulation>` layout
    PatternMismatch {
        /// Path whose name was rejected
        path: PathBuf,
        /// Description of the mismatch
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Result records could not be serialized
    Report {
        /// Underlying serialization error
        source: serde_json::Error,
    },
}

impl fmt::Display for MoranError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { side, min, max } => {
                write!(
                    f,
                    "Invalid lattice side {side}: must lie between {min} and {max}"
                )
            }
            Self::DimensionMismatch { expected, found } => {
                write!(
                    f,
                    "Dimension mismatch: expected a {expected}x{expected} grid, found {found}x{found}"
                )
            }
            Self::InvalidInput { reason } => {
                write!(f, "Invalid input grid: {reason}")
            }
            Self::DegenerateInput { cells } => {
                write!(
                    f,
                    "Degenerate input: all {cells} cells share one value, Moran's I is undefined"
                )
            }
            Self::Decode { path, source } => {
                write!(f, "Failed to decode image '{}': {source}", path.display())
            }
            Self::PatternMismatch { path, reason } => {
                write!(
                    f,
                    "File name '{}' does not match the landscape pattern: {reason}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::Report { source } => {
                write!(f, "Failed to serialize results: {source}")
            }
        }
    }
}

impl std::error::Error for MoranError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Report { source } => Some(source),
            _ => None,
        }
    }
}

impl MoranError {
    /// Whether the error is a dimension problem that must abort a whole batch
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimension { .. }
                | Self::DimensionMismatch { .. }
                | Self::InvalidInput { .. }
        )
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, MoranError>;

/// Placeholder path used until a caller attaches the real one
pub const UNKNOWN_PATH: &str = "<unknown>";

/// Attaches the offending file path to path-carrying errors
pub trait WithPath<T> {
    /// Replace a placeholder path with `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<MoranError>,
{
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only errors built through the `From` impls carry a placeholder
            match &mut error {
                MoranError::Decode { path: slot, .. }
                | MoranError::FileSystem { path: slot, .. }
                | MoranError::PatternMismatch { path: slot, .. } => {
                    if slot.as_os_str() == UNKNOWN_PATH {
                        *slot = path.to_path_buf();
                    }
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for MoranError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

impl From<std::io::Error> for MoranError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for MoranError {
    fn from(err: serde_json::Error) -> Self {
        Self::Report { source: err }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MoranError {
    MoranError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> MoranError {
    MoranError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an invalid input error
pub fn invalid_input(reason: &impl ToString) -> MoranError {
    MoranError::InvalidInput {
        reason: reason.to_string(),
    }
}
