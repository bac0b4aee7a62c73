//! Core traits and types for Riemannian optimization.
//!
//! This crate provides the abstractions every solver and manifold builds on:
//! the [`Manifold`](manifold::Manifold) capability set, problem descriptors,
//! stopping criteria, observers and the generic solver engine.
//!
//! # Key Concepts
//!
//! - **Manifolds**: Smooth spaces with exponential and logarithmic maps, a
//!   geodesic distance and a Riemannian inner product
//! - **Problems**: A manifold bound to a cost and to the oracles a solver
//!   needs (a gradient, or a family of proximal maps)
//! - **Options**: The mutable per-run state of an algorithm
//! - **Observers**: Debug printing and recording, invoked around every step
//!
//! # Modules
//!
//! - [`component`]: Type-erased manifolds for heterogeneous products
//! - [`debug`]: Debug output observers
//! - [`error`]: Error types for manifold operations and solvers
//! - [`manifold`]: Core manifold trait and tangent vectors
//! - [`observer`]: Observer hook and iteration markers
//! - [`options`]: Per-run solver state
//! - [`problem`]: Gradient and proximal problems
//! - [`record`]: Recording observers
//! - [`retraction`]: Retractions used by gradient methods
//! - [`solver`]: The generic solver loop
//! - [`step_size`]: Step size schedules
//! - [`stopping`]: Stopping criteria
//! - [`types`]: Type aliases and numerical constants

pub mod component;
pub mod debug;
pub mod error;
pub mod manifold;
pub mod observer;
pub mod options;
pub mod problem;
pub mod record;
pub mod retraction;
pub mod solver;
pub mod step_size;
pub mod stopping;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_manifolds;

// Re-export commonly used items at the crate root
pub use error::{ManifoldError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use manifoldopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::component::{component, Component, ComponentManifold, Element};
    pub use crate::debug::{
        DebugAction, DebugChange, DebugCost, DebugGradient, DebugGradientNorm, DebugGroup,
        DebugIterate, DebugIteration, DebugStepsize, DebugStoppingCriterion,
    };
    pub use crate::error::{ManifoldError, OptimizerError, OptimizerResult, Result};
    pub use crate::manifold::{Manifold, TVector};
    pub use crate::observer::{Iteration, Observer};
    pub use crate::options::{PointOf, SolverOptions, TVectorOf};
    pub use crate::problem::{GradientProblem, Problem, ProximalMapFn, ProximalProblem};
    pub use crate::record::{
        RecordAction, RecordChange, RecordCost, RecordGradient, RecordGradientNorm, RecordGroup,
        RecordIterate, RecordIteration, RecordRow, RecordStepsize, RecordValue,
    };
    pub use crate::retraction::{ExponentialRetraction, FnRetraction, Retraction};
    pub use crate::solver::{solve, OptimizationResult, SolveSummary};
    pub use crate::step_size::StepSizeSchedule;
    pub use crate::stopping::{StopReason, StoppingCriterion, TerminationReason};
    pub use crate::types::{constants, DVector};
}
