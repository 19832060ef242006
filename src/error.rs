//! Unified error hierarchy for fittrack
//!
//! Every fallible operation in the library returns [`FitTrackError`] (through
//! the [`Result`] alias), with per-area enums for package dispatch, formula
//! evaluation and batch import so callers can match on the precise failure.

use thiserror::Error;

/// Top-level error type for all fittrack operations
#[derive(Debug, Error)]
pub enum FitTrackError {
    /// Sensor package could not be turned into a workout
    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    /// Formula evaluation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Batch import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while dispatching a package to a workout variant
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackageError {
    /// Code is not one of RUN, WLK, SWM
    #[error("Unknown workout code: {code}")]
    UnknownWorkoutCode { code: String },

    /// Package carries the wrong number of sensor values
    #[error("Workout {code} expects {expected} values, got {actual}")]
    WrongArity {
        code: String,
        expected: usize,
        actual: usize,
    },

    /// A sensor value is out of range
    #[error("Invalid parameter {parameter}={value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

/// Errors raised while evaluating the workout formulas
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// Intermediate value does not fit in a Decimal
    #[error("Numerical overflow in {calculation}")]
    Overflow { calculation: String },
}

/// Errors raised while reading packages from CSV
#[derive(Debug, Error)]
pub enum ImportError {
    /// A record could not be parsed
    #[error("Parse error on line {line}: {reason}")]
    ParseError { line: u64, reason: String },

    /// Underlying CSV reader failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for fittrack operations
pub type Result<T> = std::result::Result<T, FitTrackError>;

impl PackageError {
    pub(crate) fn invalid(
        parameter: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        PackageError::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl FitTrackError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FitTrackError::Package(_) => ErrorSeverity::Warning,
            FitTrackError::Calculation(_) => ErrorSeverity::Warning,
            FitTrackError::Import(ImportError::ParseError { .. }) => ErrorSeverity::Warning,
            FitTrackError::Import(_) => ErrorSeverity::Error,
            FitTrackError::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FitTrackError::Package(PackageError::UnknownWorkoutCode { code }) => {
                format!(
                    "Unrecognised workout type '{}'. Use one of RUN, WLK or SWM.",
                    code
                )
            }
            FitTrackError::Package(PackageError::WrongArity {
                code,
                expected,
                actual,
            }) => {
                format!(
                    "A {} package needs {} sensor values but {} were supplied.",
                    code, expected, actual
                )
            }
            FitTrackError::Calculation(CalculationError::Overflow { calculation }) => {
                format!(
                    "The readings are too extreme to compute {}. Check duration and weight.",
                    calculation
                )
            }
            FitTrackError::Import(ImportError::ParseError { line, reason }) => {
                format!("Could not read package on line {}: {}", line, reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Unrecoverable failure of the environment (IO)
    Critical,
    /// Error that prevents the operation
    Error,
    /// Bad input; the rest of a batch can continue
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }

    /// Prefix used when the CLI reports an error
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "Fatal:",
            ErrorSeverity::Error => "Error:",
            ErrorSeverity::Warning => "Invalid input:",
        }
    }
}
