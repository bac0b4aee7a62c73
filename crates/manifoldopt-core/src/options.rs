//! Per-run solver state.
//!
//! Every algorithm keeps its mutable state (current and previous iterate,
//! cached gradient, schedules, ...) in a value implementing
//! [`SolverOptions`]. The engine in [`crate::solver`] owns that value
//! exclusively for the duration of a run and hands shared references of it
//! to stopping criteria and observers.

use crate::{
    error::OptimizerResult,
    manifold::{Manifold, TVector},
    problem::Problem,
    stopping::StoppingCriterion,
};

/// Point type of a problem's manifold.
pub type PointOf<P> = <<P as Problem>::Manifold as Manifold>::Point;

/// Tangent vector type of a problem's manifold.
pub type TVectorOf<P> = TVector<<P as Problem>::Manifold>;

/// Mutable state of one algorithm run on problems of type `P`.
pub trait SolverOptions<P: Problem> {
    /// Prepares the state before the first step.
    fn initialize(&mut self, problem: &P) -> OptimizerResult<()>;

    /// Performs iteration `iteration` (1-based).
    fn step(&mut self, problem: &P, iteration: usize) -> OptimizerResult<()>;

    /// The current iterate.
    fn iterate(&self) -> &PointOf<P>;

    /// The iterate before the last step.
    fn previous_iterate(&self) -> &PointOf<P>;

    /// The gradient evaluated during the last step, if the algorithm has one.
    fn gradient(&self) -> Option<&TVectorOf<P>> {
        None
    }

    /// The step size (or proximal parameter) of the last step.
    fn step_size(&self) -> Option<f64> {
        None
    }

    /// The criterion deciding when the run ends.
    fn stopping_criterion(&self) -> &StoppingCriterion;
}
