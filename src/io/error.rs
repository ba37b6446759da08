//! Error types and context management for flow and equity analyses

use std::fmt;
use std::path::PathBuf;

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Input table doesn't meet analysis requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Region identifier lies outside the distance matrix domain
    ///
    /// Region identifiers are 1-based, so the valid domain is `1..=region_count`
    RegionOutOfDomain {
        /// The offending region identifier
        region: u32,
        /// Number of regions covered by the distance matrix
        region_count: usize,
    },

    /// Flow with zero standardized intensity under the rejecting policy
    ZeroIntensity {
        /// Row of the flow in the input table
        flow_index: usize,
    },

    /// Local association scores cannot be standardized
    ///
    /// Occurs when:
    /// - Fewer than two finite scores are available
    /// - All finite scores are identical (zero standard deviation)
    DegenerateVariance {
        /// Number of finite scores the moments were computed over
        finite_scores: usize,
        /// Sample standard deviation, if it could be computed
        std_dev: Option<f64>,
    },

    /// Analysis parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Required column is absent from an input table
    MissingColumn {
        /// Name of the missing column
        column: String,
    },

    /// Cell could not be parsed into the expected type
    ParseValue {
        /// Column holding the cell
        column: String,
        /// Zero-based data row of the cell
        row: usize,
        /// Raw cell contents
        value: String,
    },

    /// Failed to read or write a CSV table
    Csv {
        /// Path of the table
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Failed to serialize a summary document
    Json {
        /// Path of the document
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
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

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::RegionOutOfDomain {
                region,
                region_count,
            } => {
                write!(
                    f,
                    "Region {region} is outside the distance matrix domain (1..={region_count})"
                )
            }
            Self::ZeroIntensity { flow_index } => {
                write!(
                    f,
                    "Flow {flow_index} has zero intensity; local association is undefined"
                )
            }
            Self::DegenerateVariance {
                finite_scores,
                std_dev,
            } => match std_dev {
                Some(sd) => write!(
                    f,
                    "Cannot standardize local association: standard deviation is {sd} over {finite_scores} finite scores"
                ),
                None => write!(
                    f,
                    "Cannot standardize local association: need at least 2 finite scores, got {finite_scores}"
                ),
            },
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MissingColumn { column } => {
                write!(f, "Missing required column '{column}'")
            }
            Self::ParseValue { column, row, value } => {
                write!(
                    f,
                    "Cannot parse '{value}' in column '{column}' at row {row}"
                )
            }
            Self::Csv { path, source } => {
                write!(f, "CSV error in '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(
                    f,
                    "Failed to write summary '{}': {source}",
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
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Attaches a file path to errors raised while touching that file
pub trait WithPath<T> {
    /// Record the path the failing operation was working on
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path filled in
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only boundary errors carry a path
            match &mut error {
                AnalysisError::Csv { path: slot, .. }
                | AnalysisError::Json { path: slot, .. }
                | AnalysisError::FileSystem { path: slot, .. } => *slot = path.into(),
                _ => {}
            }
            error
        })
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> AnalysisError {
    AnalysisError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn invalid_source(reason: &impl ToString) -> AnalysisError {
    AnalysisError::InvalidSourceData {
        reason: reason.to_string(),
    }
}
