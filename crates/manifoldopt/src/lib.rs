//! ManifoldOpt - Optimization on Riemannian manifolds.
//!
//! This crate bundles the workspace crates behind a single dependency:
//!
//! - [`manifoldopt_core`]: the manifold trait, problems, stopping criteria,
//!   observers and the generic solver loop
//! - [`manifoldopt_manifolds`]: the sphere, the circle and product manifolds
//! - [`manifoldopt_optim`]: gradient descent and the cyclic proximal point
//!   algorithm
//!
//! # Example
//!
//! ```rust
//! use manifoldopt::prelude::*;
//!
//! // Riemannian center of mass of two points on the circle
//! let circle = Circle::new();
//! let anchors = [S1Point(0.5), S1Point(1.5)];
//!
//! let mut problem = ProximalProblem::new(
//!     circle,
//!     move |x: &S1Point| {
//!         let mut cost = 0.0;
//!         for a in &anchors {
//!             cost += 0.5 * circle.distance(x, a)?.powi(2);
//!         }
//!         Ok(cost)
//!     },
//!     Vec::new(),
//! );
//! for anchor in anchors {
//!     problem = problem.with_proximal_map(move |lambda, x: &S1Point| {
//!         let log = circle.log(x, &anchor)?;
//!         circle.exp(x, &log, lambda / (1.0 + lambda))
//!     });
//! }
//!
//! let mut cppa = CyclicProximalPoint::new(CyclicProximalPointConfig::new());
//! let result = cppa.optimize(&problem, &S1Point(0.0)).unwrap();
//! assert!((result.point.0 - 1.0).abs() < 1e-3);
//! ```

pub use manifoldopt_core;
pub use manifoldopt_manifolds;
pub use manifoldopt_optim;

// Re-export key dependencies
pub use nalgebra;
pub use rand;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use manifoldopt::prelude::*;
/// ```
pub mod prelude {
    pub use manifoldopt_core::prelude::*;
    pub use manifoldopt_manifolds::{
        sym_rem, Circle, ProdPoint, ProdTangent, Product, S1Point, SnPoint, Sphere,
    };
    pub use manifoldopt_optim::{
        ArmijoBacktracking, CyclicProximalPoint, CyclicProximalPointConfig,
        CyclicProximalPointDebug, CyclicProximalPointOptions, CyclicProximalPointRecord,
        EvaluationOrder, GradientDescent, GradientDescentConfig, GradientDescentDebug,
        GradientDescentOptions, GradientDescentRecord, GradientDescentState, Stepsize,
    };
}
