//! Sphere manifold S^n = {x in R^{n+1} : ||x|| = 1}
//!
//! The unit sphere is one of the most fundamental manifolds in optimization.
//! It naturally appears in:
//! - Principal Component Analysis (PCA)
//! - Directional statistics and Riemannian centers of mass
//! - Eigenvalue problems
//! - Sparse coding with unit norm constraints

use manifoldopt_core::{
    error::{ManifoldError, Result},
    manifold::{Manifold, TVector},
    types::{constants, DVector},
};
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

/// A point on a sphere: a unit vector in R^{n+1}.
#[derive(Debug, Clone, PartialEq)]
pub struct SnPoint(pub DVector<f64>);

impl SnPoint {
    /// Wraps a vector without checking its norm.
    pub fn new(value: DVector<f64>) -> Self {
        Self(value)
    }

    /// Builds a point from its coordinates, without checking the norm.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }

    /// The embedding coordinates.
    pub fn value(&self) -> &DVector<f64> {
        &self.0
    }

    /// Consumes the point and returns its coordinates.
    pub fn into_inner(self) -> DVector<f64> {
        self.0
    }

    /// Intrinsic dimension of the sphere this point lives on.
    pub fn manifold_dimension(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

/// The unit sphere S^n in R^{n+1}.
///
/// # Mathematical Properties
///
/// - **Dimension**: n (for the sphere in R^{n+1})
/// - **Tangent space**: T_x S^n = {v in R^{n+1} : x^T v = 0}
/// - **Riemannian metric**: Inherited from Euclidean space (canonical metric)
/// - **Exponential map**: exp_x(v) = cos(||v||) x + sin(||v||) v/||v||
/// - **Logarithmic map**: log_x(y) = θ (y - cos(θ)x) / ||y - cos(θ)x||, θ = arccos(x^T y)
/// - **Distance**: d(x, y) = arccos(x^T y)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sphere {
    /// Intrinsic dimension (n)
    dim: usize,
}

impl Sphere {
    /// Creates the sphere S^n embedded in R^{n+1}.
    ///
    /// # Errors
    /// Returns an error if `n` is zero.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ManifoldError::invalid_parameter(
                "Sphere requires intrinsic dimension >= 1",
            ));
        }
        Ok(Self { dim: n })
    }

    /// Returns the ambient dimension (n + 1).
    pub fn ambient_dimension(&self) -> usize {
        self.dim + 1
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len == self.ambient_dimension() {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(self.ambient_dimension(), len))
        }
    }

    fn random_gaussian(&self, rng: &mut dyn RngCore) -> DVector<f64> {
        DVector::from_fn(self.ambient_dimension(), |_, _| {
            let value: f64 = StandardNormal.sample(rng);
            value
        })
    }
}

/// Clamps an inner product of unit vectors into the domain of `acos`.
fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

impl Manifold for Sphere {
    type Point = SnPoint;
    type Tangent = DVector<f64>;

    fn name(&self) -> &str {
        "Sphere"
    }

    fn abbreviation(&self) -> &str {
        "Sn"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn typical_distance(&self) -> f64 {
        PI
    }

    fn distance(&self, x: &SnPoint, y: &SnPoint) -> Result<f64> {
        self.check_len(x.0.len())?;
        self.check_len(y.0.len())?;
        Ok(clamp_unit(x.0.dot(&y.0)).acos())
    }

    fn exp(&self, x: &SnPoint, xi: &TVector<Self>, t: f64) -> Result<SnPoint> {
        self.check_len(x.0.len())?;
        self.check_len(xi.value().len())?;

        let len = xi.value().norm();
        if len < constants::EPSILON {
            // exp_x(0) = x
            return Ok(x.clone());
        }

        let angle = t * len;
        Ok(SnPoint(&x.0 * angle.cos() + xi.value() * (angle.sin() / len)))
    }

    fn log(&self, x: &SnPoint, y: &SnPoint) -> Result<TVector<Self>> {
        self.check_len(x.0.len())?;
        self.check_len(y.0.len())?;

        let scp = x.0.dot(&y.0);
        let residual = &y.0 - &x.0 * scp;
        let residual_norm = residual.norm();
        if residual_norm <= constants::EPSILON {
            return self.zero_vector(x);
        }

        let theta = clamp_unit(scp).acos();
        Ok(TVector::at(x.clone(), residual * (theta / residual_norm)))
    }

    fn inner(&self, _x: &SnPoint, u: &DVector<f64>, v: &DVector<f64>) -> Result<f64> {
        self.check_len(u.len())?;
        self.check_len(v.len())?;
        Ok(u.dot(v))
    }

    fn zero_vector(&self, x: &SnPoint) -> Result<TVector<Self>> {
        self.check_len(x.0.len())?;
        Ok(TVector::at(x.clone(), DVector::zeros(x.0.len())))
    }

    fn parallel_transport(&self, x: &SnPoint, y: &SnPoint, xi: &TVector<Self>) -> Result<TVector<Self>> {
        self.check_len(x.0.len())?;
        self.check_len(y.0.len())?;
        self.check_len(xi.value().len())?;

        let v = xi.value();
        let denominator = 1.0 + x.0.dot(&y.0);
        let moved = if denominator.abs() < constants::EPSILON {
            // Antipodal points have no unique minimizing geodesic
            v - &y.0 * y.0.dot(v)
        } else {
            v - (&x.0 + &y.0) * (y.0.dot(v) / denominator)
        };
        Ok(TVector::at(y.clone(), moved))
    }

    fn scale_tangent(&self, xi: &DVector<f64>, s: f64) -> Result<DVector<f64>> {
        Ok(xi * s)
    }

    fn add_tangents(&self, xi: &DVector<f64>, nu: &DVector<f64>) -> Result<DVector<f64>> {
        self.check_len(xi.len())?;
        self.check_len(nu.len())?;
        Ok(xi + nu)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> SnPoint {
        loop {
            let v = self.random_gaussian(rng);
            let norm = v.norm();
            if norm > constants::EPSILON {
                return SnPoint(v / norm);
            }
        }
    }

    fn random_tangent(&self, x: &SnPoint, rng: &mut dyn RngCore) -> Result<TVector<Self>> {
        self.check_len(x.0.len())?;
        loop {
            let v = self.random_gaussian(rng);
            // Project to tangent space: v - <v,x>x
            let projected = &v - &x.0 * x.0.dot(&v);
            let norm = projected.norm();
            if norm > constants::EPSILON {
                return Ok(TVector::at(x.clone(), projected / norm));
            }
        }
    }

    fn validate_point(&self, x: &SnPoint) -> Result<()> {
        self.check_len(x.0.len())?;
        let norm = x.0.norm();
        if (norm - 1.0).abs() > constants::VALIDATION_TOLERANCE {
            return Err(ManifoldError::invalid_point(
                &x.0,
                format!("norm is {norm} instead of 1"),
            ));
        }
        Ok(())
    }

    fn validate_tangent(&self, x: &SnPoint, xi: &TVector<Self>) -> Result<()> {
        self.validate_point(x)?;
        if let Some(base) = xi.base() {
            if base != x {
                return Err(ManifoldError::incompatible_tangent_spaces(base, x));
            }
        }
        self.check_len(xi.value().len())?;
        let scp = x.0.dot(xi.value());
        if scp.abs() > constants::VALIDATION_TOLERANCE {
            return Err(ManifoldError::invalid_tangent(
                xi.value(),
                format!("inner product with the base point is {scp} instead of 0"),
            ));
        }
        Ok(())
    }
}
