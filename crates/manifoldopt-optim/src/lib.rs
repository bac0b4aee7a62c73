//! ManifoldOpt Optimization - Solvers for Riemannian manifolds.
//!
//! This crate provides the algorithms running on top of the generic solver
//! loop of `manifoldopt-core`. They work with any manifold implementing
//! [`Manifold`](manifoldopt_core::manifold::Manifold).
//!
//! # Available Solvers
//!
//! - **Gradient Descent**: Steepest descent along a retraction, with constant,
//!   decreasing or Armijo step sizes
//! - **Cyclic Proximal Point**: Sweeps over the proximal maps of a sum of
//!   cost terms in linear, random or fixed random order
//!
//! # Examples
//!
//! ```rust
//! use manifoldopt_optim::{
//!     CyclicProximalPointConfig, EvaluationOrder, GradientDescentConfig,
//! };
//! use manifoldopt_core::stopping::StoppingCriterion;
//! use manifoldopt_manifolds::Sphere;
//!
//! let cppa = CyclicProximalPointConfig::new()
//!     .with_evaluation_order(EvaluationOrder::Random)
//!     .with_seed(42);
//!
//! let gd = GradientDescentConfig::<Sphere>::new()
//!     .with_constant_step_size(0.1)
//!     .with_stopping_criterion(StoppingCriterion::max_iterations(100));
//! ```

pub mod cyclic_proximal_point;
pub mod evaluation_order;
pub mod gradient_descent;

// Re-export main solvers for convenience
pub use cyclic_proximal_point::{
    CyclicProximalPoint, CyclicProximalPointConfig, CyclicProximalPointDebug,
    CyclicProximalPointOptions, CyclicProximalPointRecord,
};
pub use evaluation_order::EvaluationOrder;
pub use gradient_descent::{
    ArmijoBacktracking, GradientDescent, GradientDescentConfig, GradientDescentDebug,
    GradientDescentOptions, GradientDescentRecord, GradientDescentState, Stepsize,
};

// Re-export commonly used items from core
pub use manifoldopt_core::{
    retraction::{ExponentialRetraction, Retraction},
    step_size::StepSizeSchedule,
    stopping::StoppingCriterion,
};

#[cfg(test)]
mod tests {
    use super::*;
    use manifoldopt_core::test_manifolds::TestEuclideanManifold;

    #[test]
    fn test_exports() {
        let _cppa = CyclicProximalPointConfig::new().with_lambda(StepSizeSchedule::harmonic(1.0));
        let _gd = GradientDescentConfig::<TestEuclideanManifold>::new()
            .with_stepsize(ArmijoBacktracking::new())
            .with_retraction(ExponentialRetraction);
        let _order = EvaluationOrder::FixedRandom;
        let _stop = StoppingCriterion::max_iterations(10);
    }
}
