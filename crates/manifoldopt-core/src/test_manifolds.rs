//! Common test manifolds for use in unit tests.
//!
//! This module provides a flat manifold and a minimal descent state that
//! exercise the solver engine without pulling in the concrete manifolds or
//! solver crates.

#![cfg(any(test, feature = "test-utils"))]

use crate::{
    error::{ManifoldError, OptimizerResult, Result},
    manifold::{Manifold, TVector},
    options::SolverOptions,
    problem::{GradientProblem, Problem},
    stopping::StoppingCriterion,
    types::DVector,
};
use rand::{Rng, RngCore};

/// Flat Euclidean space R^n.
///
/// Every vector is a point, exp is addition and log is subtraction.
#[derive(Debug, Clone)]
pub struct TestEuclideanManifold {
    dim: usize,
}

impl TestEuclideanManifold {
    /// Creates R^`dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len == self.dim {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(self.dim, len))
        }
    }
}

impl Manifold for TestEuclideanManifold {
    type Point = DVector<f64>;
    type Tangent = DVector<f64>;

    fn name(&self) -> &str {
        "TestEuclidean"
    }

    fn abbreviation(&self) -> &str {
        "Rn"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn typical_distance(&self) -> f64 {
        (self.dim as f64).sqrt()
    }

    fn distance(&self, x: &Self::Point, y: &Self::Point) -> Result<f64> {
        Ok((y - x).norm())
    }

    fn exp(&self, x: &Self::Point, xi: &TVector<Self>, t: f64) -> Result<Self::Point> {
        Ok(x + xi.value() * t)
    }

    fn log(&self, x: &Self::Point, y: &Self::Point) -> Result<TVector<Self>> {
        Ok(TVector::at(x.clone(), y - x))
    }

    fn inner(&self, _x: &Self::Point, u: &Self::Tangent, v: &Self::Tangent) -> Result<f64> {
        Ok(u.dot(v))
    }

    fn zero_vector(&self, x: &Self::Point) -> Result<TVector<Self>> {
        Ok(TVector::at(x.clone(), DVector::zeros(x.len())))
    }

    fn parallel_transport(
        &self,
        _x: &Self::Point,
        y: &Self::Point,
        xi: &TVector<Self>,
    ) -> Result<TVector<Self>> {
        Ok(TVector::at(y.clone(), xi.value().clone()))
    }

    fn scale_tangent(&self, xi: &Self::Tangent, s: f64) -> Result<Self::Tangent> {
        Ok(xi * s)
    }

    fn add_tangents(&self, xi: &Self::Tangent, nu: &Self::Tangent) -> Result<Self::Tangent> {
        self.check_len(nu.len())?;
        Ok(xi + nu)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Self::Point {
        DVector::from_fn(self.dim, |_, _| rng.gen_range(-1.0..1.0))
    }

    fn random_tangent(&self, x: &Self::Point, rng: &mut dyn RngCore) -> Result<TVector<Self>> {
        Ok(TVector::at(x.clone(), self.random_point(rng)))
    }

    fn validate_point(&self, x: &Self::Point) -> Result<()> {
        self.check_len(x.len())
    }

    fn validate_tangent(&self, x: &Self::Point, xi: &TVector<Self>) -> Result<()> {
        self.check_len(x.len())?;
        self.check_len(xi.value().len())
    }
}

/// `F(x) = ‖x‖²` with gradient `2x` on R^`dim`.
pub fn quadratic_problem(dim: usize) -> GradientProblem<TestEuclideanManifold> {
    GradientProblem::new(
        TestEuclideanManifold::new(dim),
        |x: &DVector<f64>| Ok(x.norm_squared()),
        |x: &DVector<f64>| Ok(TVector::at(x.clone(), x * 2.0)),
    )
}

/// Fixed-step Euclidean gradient descent state.
#[derive(Debug, Clone)]
pub struct TestDescentOptions {
    x: DVector<f64>,
    x_old: DVector<f64>,
    gradient: Option<TVector<TestEuclideanManifold>>,
    step_size: f64,
    criterion: StoppingCriterion,
}

impl TestDescentOptions {
    /// Starts at `x0` and moves by `step_size` times the negative gradient.
    pub fn new(x0: DVector<f64>, step_size: f64, criterion: StoppingCriterion) -> Self {
        Self {
            x_old: x0.clone(),
            x: x0,
            gradient: None,
            step_size,
            criterion,
        }
    }
}

impl SolverOptions<GradientProblem<TestEuclideanManifold>> for TestDescentOptions {
    fn initialize(&mut self, _problem: &GradientProblem<TestEuclideanManifold>) -> OptimizerResult<()> {
        self.x_old = self.x.clone();
        self.gradient = None;
        Ok(())
    }

    fn step(&mut self, problem: &GradientProblem<TestEuclideanManifold>, _iteration: usize) -> OptimizerResult<()> {
        let gradient = problem.gradient(&self.x)?;
        let next = problem.manifold().exp(&self.x, &gradient, -self.step_size)?;
        self.x_old = std::mem::replace(&mut self.x, next);
        self.gradient = Some(gradient);
        Ok(())
    }

    fn iterate(&self) -> &DVector<f64> {
        &self.x
    }

    fn previous_iterate(&self) -> &DVector<f64> {
        &self.x_old
    }

    fn gradient(&self) -> Option<&TVector<TestEuclideanManifold>> {
        self.gradient.as_ref()
    }

    fn step_size(&self) -> Option<f64> {
        Some(self.step_size)
    }

    fn stopping_criterion(&self) -> &StoppingCriterion {
        &self.criterion
    }
}
