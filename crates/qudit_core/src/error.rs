//! Error types for the qudit engine
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every failure carries an [`ErrorKind`] so that callers (and the
//! consistency runner) can report the category without string matching.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for the qudit engine
/// Gantree: QuditError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuditError {
    // ========================================================================
    // Index Errors
    // ========================================================================
    /// Per-subsystem basis index outside [0, d)
    #[error("Index {index} out of range for subsystem {subsystem} with dimension {dimension}")]
    BasisIndexOutOfRange {
        subsystem: usize,
        index: usize,
        dimension: usize,
    },

    /// Flattened index outside [0, size)
    #[error("Flat index {index} out of range: composite dimension is {size}")]
    FlatIndexOutOfRange { index: usize, size: usize },

    /// Index tuple length differs from the number of subsystems
    #[error("Index tuple has {got} entries but the system has {expected} subsystems")]
    IndexArity { expected: usize, got: usize },

    /// Subsystem position does not exist
    #[error("Subsystem {subsystem} out of range: system has {count} subsystems")]
    SubsystemOutOfRange { subsystem: usize, count: usize },

    /// Same subsystem listed twice in a target list
    #[error("Subsystem {0} listed more than once")]
    DuplicateSubsystem(usize),

    // ========================================================================
    // Gate Errors
    // ========================================================================
    /// Gate dimensions do not match the targeted subsystems
    #[error("Dimension mismatch for gate '{gate}': gate acts on {expected:?}, targets have {found:?}")]
    DimensionMismatch {
        gate: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Gate matrix fails the U·U† ≈ I check
    #[error("Gate '{gate}' is not unitary: max deviation {deviation:e} exceeds {tolerance:e}")]
    NonUnitaryGate {
        gate: String,
        deviation: f64,
        tolerance: f64,
    },

    // ========================================================================
    // State Errors
    // ========================================================================
    /// Norm drifted beyond the hard ceiling
    #[error("Normalization drift {drift:e} exceeds hard ceiling {ceiling:e}")]
    NormalizationDrift { drift: f64, ceiling: f64 },

    /// Amplitude vector length does not match the dimension tuple
    #[error("Amplitude vector has {got} entries, expected {expected}")]
    AmplitudeLength { expected: usize, got: usize },

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Empty tuple or zero dimension
    #[error("Invalid dimension tuple {0:?}: must be non-empty with every dimension >= 1")]
    InvalidDimension(Vec<usize>),

    /// Composite space too large to allocate
    #[error("State of {size} amplitudes exceeds maximum {max}")]
    StateTooLarge { size: usize, max: usize },

    /// Dense operator or reduced density matrix too large to allocate
    #[error("Dense matrix of dimension {dim} exceeds maximum {max}")]
    MatrixTooLarge { dim: usize, max: usize },

    /// Invalid gate or circuit parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Named constant not in the constant table
    #[error("Unknown constant '{0}'")]
    UnknownConstant(String),

    // ========================================================================
    // Runner Errors
    // ========================================================================
    /// Run exceeded its deadline
    #[error("Run '{context}' timed out after {timeout_ms} ms")]
    Timeout { context: String, timeout_ms: u64 },

    /// Worker process failed or spoke an invalid protocol
    #[error("Worker error: {0}")]
    Worker(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for qudit engine operations
/// Gantree: QuditResult<T> // type alias
pub type QuditResult<T> = Result<T, QuditError>;

// ============================================================================
// Error Kind
// ============================================================================

/// Error category surfaced to callers and in run failure records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed basis or subsystem index
    #[serde(rename = "IndexRangeError")]
    IndexRange,
    /// Gate/subsystem size mismatch
    #[serde(rename = "DimensionMismatchError")]
    DimensionMismatch,
    /// Construction-time unitarity violation
    #[serde(rename = "NonUnitaryGateError")]
    NonUnitaryGate,
    /// State invariant violated beyond the hard ceiling
    #[serde(rename = "NormalizationDriftError")]
    NormalizationDrift,
    /// Run exceeded its deadline
    #[serde(rename = "TimeoutError")]
    Timeout,
    /// Malformed circuit or parameter
    #[serde(rename = "InvalidCircuitError")]
    InvalidCircuit,
    /// Worker process failure
    #[serde(rename = "WorkerError")]
    Worker,
    /// JSON or I/O failure
    #[serde(rename = "SerializationError")]
    Serialization,
    /// Should not happen
    #[serde(rename = "InternalError")]
    Internal,
}

impl ErrorKind {
    /// Name used in reports and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::IndexRange => "IndexRangeError",
            ErrorKind::DimensionMismatch => "DimensionMismatchError",
            ErrorKind::NonUnitaryGate => "NonUnitaryGateError",
            ErrorKind::NormalizationDrift => "NormalizationDriftError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::InvalidCircuit => "InvalidCircuitError",
            ErrorKind::Worker => "WorkerError",
            ErrorKind::Serialization => "SerializationError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QuditError {
    fn from(err: serde_json::Error) -> Self {
        QuditError::Json(err.to_string())
    }
}

impl From<std::io::Error> for QuditError {
    fn from(err: std::io::Error) -> Self {
        QuditError::Io(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QuditError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuditError::BasisIndexOutOfRange { .. }
            | QuditError::FlatIndexOutOfRange { .. }
            | QuditError::IndexArity { .. }
            | QuditError::SubsystemOutOfRange { .. }
            | QuditError::DuplicateSubsystem(_) => ErrorKind::IndexRange,
            QuditError::DimensionMismatch { .. } | QuditError::AmplitudeLength { .. } => {
                ErrorKind::DimensionMismatch
            }
            QuditError::NonUnitaryGate { .. } => ErrorKind::NonUnitaryGate,
            QuditError::NormalizationDrift { .. } => ErrorKind::NormalizationDrift,
            QuditError::Timeout { .. } => ErrorKind::Timeout,
            QuditError::InvalidDimension(_)
            | QuditError::StateTooLarge { .. }
            | QuditError::MatrixTooLarge { .. }
            | QuditError::InvalidParameter(_)
            | QuditError::UnknownConstant(_) => ErrorKind::InvalidCircuit,
            QuditError::Worker(_) => ErrorKind::Worker,
            QuditError::Json(_) | QuditError::Io(_) => ErrorKind::Serialization,
            QuditError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if error is raised by state evolution (fatal to its run only)
    pub fn is_state_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::IndexRange
                | ErrorKind::DimensionMismatch
                | ErrorKind::NonUnitaryGate
                | ErrorKind::NormalizationDrift
        )
    }

    /// Check if error is a validation error of the circuit specification
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::IndexRange | ErrorKind::DimensionMismatch | ErrorKind::InvalidCircuit
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuditError::BasisIndexOutOfRange {
            subsystem: 1,
            index: 9,
            dimension: 7,
        };
        assert!(err.to_string().contains("9"));
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            QuditError::FlatIndexOutOfRange { index: 10, size: 6 }.kind(),
            ErrorKind::IndexRange
        );
        assert_eq!(
            QuditError::NormalizationDrift {
                drift: 0.1,
                ceiling: 1e-6
            }
            .kind(),
            ErrorKind::NormalizationDrift
        );
        assert_eq!(ErrorKind::NonUnitaryGate.as_str(), "NonUnitaryGateError");
    }

    #[test]
    fn test_kind_serializes_with_error_names() {
        let json = serde_json::to_string(&ErrorKind::Timeout).unwrap();
        assert_eq!(json, "\"TimeoutError\"");

        let back: ErrorKind = serde_json::from_str("\"DimensionMismatchError\"").unwrap();
        assert_eq!(back, ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_is_state_error() {
        assert!(QuditError::DuplicateSubsystem(0).is_state_error());
        assert!(!QuditError::Worker("exit 1".into()).is_state_error());
        assert!(QuditError::InvalidDimension(vec![]).is_validation_error());
    }
}
