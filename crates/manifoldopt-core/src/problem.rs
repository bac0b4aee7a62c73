//! Problem descriptors binding a manifold to an objective.
//!
//! A problem is built once per optimization run and is read-only afterwards,
//! so the same problem can be shared between independent runs.
//!
//! - [`GradientProblem`]: cost `F: M → ℝ` and its Riemannian gradient
//! - [`ProximalProblem`]: cost `F = Σₖ fₖ` and the proximal maps of the `fₖ`
//!
//! The callables are opaque to the solvers: they are only ever evaluated.

use crate::{
    error::{OptimizerError, OptimizerResult, Result},
    manifold::{Manifold, TVector},
};
use std::fmt::{self, Debug};

/// Cost function `F: M → ℝ`.
pub type CostFn<M> = Box<dyn Fn(&<M as Manifold>::Point) -> Result<f64> + Send + Sync>;

/// Riemannian gradient `∇F: M → TM`.
pub type GradientFn<M> =
    Box<dyn Fn(&<M as Manifold>::Point) -> Result<TVector<M>> + Send + Sync>;

/// Proximal map `(λ, x) ↦ prox_{λf}(x)`.
pub type ProximalMapFn<M> = Box<
    dyn Fn(f64, &<M as Manifold>::Point) -> Result<<M as Manifold>::Point> + Send + Sync,
>;

/// Common interface of all problems: a manifold and a cost.
pub trait Problem: Send + Sync {
    /// The manifold the problem lives on.
    type Manifold: Manifold;

    /// Returns the manifold.
    fn manifold(&self) -> &Self::Manifold;

    /// Evaluates the cost at `x`.
    fn cost(&self, x: &<Self::Manifold as Manifold>::Point) -> Result<f64>;
}

/// A problem solvable with gradient-based methods.
pub struct GradientProblem<M: Manifold> {
    manifold: M,
    cost: CostFn<M>,
    gradient: GradientFn<M>,
}

impl<M: Manifold> GradientProblem<M> {
    /// Creates a gradient problem from a cost and its gradient.
    pub fn new<F, G>(manifold: M, cost: F, gradient: G) -> Self
    where
        F: Fn(&M::Point) -> Result<f64> + Send + Sync + 'static,
        G: Fn(&M::Point) -> Result<TVector<M>> + Send + Sync + 'static,
    {
        Self {
            manifold,
            cost: Box::new(cost),
            gradient: Box::new(gradient),
        }
    }

    /// Evaluates the gradient at `x`.
    pub fn gradient(&self, x: &M::Point) -> Result<TVector<M>> {
        (self.gradient)(x)
    }
}

impl<M: Manifold> Problem for GradientProblem<M> {
    type Manifold = M;

    fn manifold(&self) -> &M {
        &self.manifold
    }

    fn cost(&self, x: &M::Point) -> Result<f64> {
        (self.cost)(x)
    }
}

impl<M: Manifold> Debug for GradientProblem<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientProblem")
            .field("manifold", &self.manifold)
            .finish_non_exhaustive()
    }
}

/// A problem whose cost is a sum of terms with known proximal maps.
pub struct ProximalProblem<M: Manifold> {
    manifold: M,
    cost: CostFn<M>,
    proximal_maps: Vec<ProximalMapFn<M>>,
}

impl<M: Manifold> ProximalProblem<M> {
    /// Creates a proximal problem.
    ///
    /// The maps are addressed 1-based by [`ProximalProblem::proximal_map`].
    pub fn new<F>(manifold: M, cost: F, proximal_maps: Vec<ProximalMapFn<M>>) -> Self
    where
        F: Fn(&M::Point) -> Result<f64> + Send + Sync + 'static,
    {
        Self {
            manifold,
            cost: Box::new(cost),
            proximal_maps,
        }
    }

    /// Appends a proximal map.
    #[must_use]
    pub fn with_proximal_map<P>(mut self, map: P) -> Self
    where
        P: Fn(f64, &M::Point) -> Result<M::Point> + Send + Sync + 'static,
    {
        self.proximal_maps.push(Box::new(map));
        self
    }

    /// Number of proximal maps.
    pub fn num_proximal_maps(&self) -> usize {
        self.proximal_maps.len()
    }

    /// Evaluates the `k`-th proximal map (1-based) with parameter `lambda` at `x`.
    pub fn proximal_map(&self, lambda: f64, x: &M::Point, k: usize) -> OptimizerResult<M::Point> {
        let count = self.proximal_maps.len();
        if k == 0 || k > count {
            return Err(OptimizerError::index_out_of_range(k, count));
        }
        Ok((self.proximal_maps[k - 1])(lambda, x)?)
    }
}

impl<M: Manifold> Problem for ProximalProblem<M> {
    type Manifold = M;

    fn manifold(&self) -> &M {
        &self.manifold
    }

    fn cost(&self, x: &M::Point) -> Result<f64> {
        (self.cost)(x)
    }
}

impl<M: Manifold> Debug for ProximalProblem<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximalProblem")
            .field("manifold", &self.manifold)
            .field("proximal_maps", &self.proximal_maps.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_manifolds::TestEuclideanManifold;
    use crate::types::DVector;

    fn point(v: f64) -> DVector<f64> {
        DVector::from_vec(vec![v])
    }

    #[test]
    fn test_gradient_problem_evaluations() {
        let problem = GradientProblem::new(
            TestEuclideanManifold::new(1),
            |x: &DVector<f64>| Ok(x[0] * x[0]),
            |x: &DVector<f64>| Ok(TVector::at(x.clone(), x * 2.0)),
        );

        assert_eq!(problem.cost(&point(3.0)).unwrap(), 9.0);
        assert_eq!(problem.gradient(&point(3.0)).unwrap().value()[0], 6.0);
        assert_eq!(problem.manifold().dimension(), 1);
    }

    #[test]
    fn test_proximal_map_indices_are_one_based() {
        let problem = ProximalProblem::new(
            TestEuclideanManifold::new(1),
            |_: &DVector<f64>| Ok(0.0),
            Vec::new(),
        )
        .with_proximal_map(|_, x: &DVector<f64>| Ok(x.clone()))
        .with_proximal_map(|_, _: &DVector<f64>| Ok(point(7.0)));

        assert_eq!(problem.num_proximal_maps(), 2);
        assert_eq!(problem.proximal_map(1.0, &point(1.0), 1).unwrap(), point(1.0));
        assert_eq!(problem.proximal_map(1.0, &point(1.0), 2).unwrap(), point(7.0));
    }

    #[test]
    fn test_proximal_map_out_of_range() {
        let problem = ProximalProblem::new(
            TestEuclideanManifold::new(1),
            |_: &DVector<f64>| Ok(0.0),
            Vec::new(),
        )
        .with_proximal_map(|_, x: &DVector<f64>| Ok(x.clone()));

        assert_eq!(
            problem.proximal_map(1.0, &point(0.0), 0).unwrap_err(),
            OptimizerError::index_out_of_range(0, 1)
        );
        assert_eq!(
            problem.proximal_map(1.0, &point(0.0), 2).unwrap_err(),
            OptimizerError::index_out_of_range(2, 1)
        );
    }

    #[test]
    fn test_problems_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GradientProblem<TestEuclideanManifold>>();
        assert_send_sync::<ProximalProblem<TestEuclideanManifold>>();
    }
}
