//! Type aliases and numerical constants.

use nalgebra::{Dyn, OVector};

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// Numerical constants shared by manifolds and solvers.
pub mod constants {
    /// Threshold below which a norm is treated as zero.
    pub const EPSILON: f64 = f64::EPSILON;

    /// Tolerance used by `validate_point` / `validate_tangent`.
    pub const VALIDATION_TOLERANCE: f64 = 1e-10;

    /// Angles this close to ±π are reduced to -π on the circle.
    pub const SYM_REM_TOLERANCE: f64 = 1e-12;

    /// Default iteration cap of the cyclic proximal point solver.
    pub const CPPA_MAX_ITERATIONS: usize = 5000;

    /// Default change tolerance of the cyclic proximal point solver.
    pub const CPPA_CHANGE_TOLERANCE: f64 = 1e-8;

    /// Default iteration cap of gradient descent.
    pub const GRADIENT_DESCENT_MAX_ITERATIONS: usize = 200;

    /// Default gradient norm tolerance of gradient descent.
    pub const GRADIENT_TOLERANCE: f64 = 1e-8;

    /// Smallest step an Armijo backtracking search will try.
    pub const MIN_STEP_SIZE: f64 = 1e-12;
}
