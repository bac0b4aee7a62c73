//! Error types for manifold operations and solvers.
//!
//! Geometric failures are reported as [`ManifoldError`]; problem and solver
//! failures as [`OptimizerError`], which wraps geometric errors so they
//! propagate unchanged out of a solver run.

use thiserror::Error;

/// Errors that can occur during manifold operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManifoldError {
    /// Point is not on the manifold.
    ///
    /// Raised by `validate_point` when a point violates a structural
    /// constraint of its manifold (unit norm, angle range, ...).
    #[error("Point {value} is not on the manifold: {reason}")]
    InvalidPoint {
        /// Rendering of the offending point
        value: String,
        /// The violated constraint
        reason: String,
    },

    /// Vector is not in the tangent space.
    #[error("Vector {value} is not in the tangent space: {reason}")]
    InvalidTangent {
        /// Rendering of the offending tangent vector
        value: String,
        /// The violated constraint
        reason: String,
    },

    /// Two tangent vectors with known, different base points were combined.
    ///
    /// This indicates a programming error rather than a numerical condition.
    #[error("Tangent vectors live in different tangent spaces: base {left} vs base {right}")]
    IncompatibleTangentSpaces {
        /// Base point of the first vector
        left: String,
        /// Base point of the second vector
        right: String,
    },

    /// Dimension mismatch between points, vectors or component lists.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Invalid construction parameter.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the problem
        reason: String,
    },

    /// Numerical instability detected.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl ManifoldError {
    /// Create an InvalidPoint error naming the value and the violated constraint.
    pub fn invalid_point<V, S>(value: V, reason: S) -> Self
    where
        V: std::fmt::Debug,
        S: Into<String>,
    {
        Self::InvalidPoint {
            value: format!("{value:?}"),
            reason: reason.into(),
        }
    }

    /// Create an InvalidTangent error naming the value and the violated constraint.
    pub fn invalid_tangent<V, S>(value: V, reason: S) -> Self
    where
        V: std::fmt::Debug,
        S: Into<String>,
    {
        Self::InvalidTangent {
            value: format!("{value:?}"),
            reason: reason.into(),
        }
    }

    /// Create an IncompatibleTangentSpaces error from the two base points.
    pub fn incompatible_tangent_spaces<L, R>(left: L, right: R) -> Self
    where
        L: std::fmt::Debug,
        R: std::fmt::Debug,
    {
        Self::IncompatibleTangentSpaces {
            left: format!("{left:?}"),
            right: format!("{right:?}"),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Returns `true` for the validation family of errors.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPoint { .. } | Self::InvalidTangent { .. } | Self::DimensionMismatch { .. }
        )
    }
}

/// Errors that can occur while setting up or running a solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// A proximal map index outside `[1, count]` was requested.
    #[error("Proximal map index {index} out of range [1, {count}]")]
    IndexOutOfRange {
        /// Requested (1-based) index
        index: usize,
        /// Number of available proximal maps
        count: usize,
    },

    /// Invalid solver configuration.
    #[error("Invalid optimizer configuration: {reason} ({parameter} = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Propagated manifold error.
    #[error("Manifold operation failed: {0}")]
    Manifold(#[from] ManifoldError),
}

impl OptimizerError {
    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { index, count }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for operations that can produce ManifoldError.
pub type Result<T> = std::result::Result<T, ManifoldError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
