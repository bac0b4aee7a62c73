//! Core manifold trait and tangent vector type.
//!
//! This module defines the `Manifold` trait that every Riemannian manifold
//! implements to be usable by the solvers, and [`TVector`], a tangent vector
//! that optionally remembers the point it is attached to.
//!
//! # Mathematical Background
//!
//! A Riemannian manifold (M, g) consists of:
//! - A smooth manifold M
//! - A Riemannian metric g that assigns an inner product to each tangent space
//!
//! Key operations:
//! - **Exponential map**: exp_x: T_x M → M, following the geodesic through x
//! - **Logarithmic map**: log_x: M → T_x M, the inverse of exp_x near x
//! - **Parallel transport**: P_{x→y}: T_x M → T_y M along the minimizing geodesic
//!
//! # Tangent spaces
//!
//! A [`TVector`] carries an optional copy of its base point. The base is only
//! used to check that [`Manifold::dot`] combines vectors of the same tangent
//! space; a vector with an unknown base is compatible with every other vector.

use crate::error::{ManifoldError, Result};
use rand::RngCore;
use std::fmt::{self, Debug};

/// A tangent vector on the manifold `M`.
///
/// The vector owns its value and an optional copy of the base point. The
/// base is never mutated through the vector.
pub struct TVector<M: Manifold + ?Sized> {
    value: M::Tangent,
    base: Option<M::Point>,
}

impl<M: Manifold + ?Sized> TVector<M> {
    /// Creates a tangent vector with an unknown base point.
    pub fn new(value: M::Tangent) -> Self {
        Self { value, base: None }
    }

    /// Creates a tangent vector attached to `base`.
    pub fn at(base: M::Point, value: M::Tangent) -> Self {
        Self {
            value,
            base: Some(base),
        }
    }

    /// The underlying tangent value.
    pub fn value(&self) -> &M::Tangent {
        &self.value
    }

    /// The base point, if known.
    pub fn base(&self) -> Option<&M::Point> {
        self.base.as_ref()
    }

    /// Returns the same vector attached to `base`.
    #[must_use]
    pub fn with_base(mut self, base: M::Point) -> Self {
        self.base = Some(base);
        self
    }

    /// Returns the same vector with the base forgotten.
    #[must_use]
    pub fn without_base(mut self) -> Self {
        self.base = None;
        self
    }

    /// Consumes the vector and returns its value.
    pub fn into_value(self) -> M::Tangent {
        self.value
    }

    /// Fails unless both vectors may live in the same tangent space.
    ///
    /// An unknown base on either side skips the check.
    pub fn check_same_tangent_space(&self, other: &Self) -> Result<()> {
        match (&self.base, &other.base) {
            (Some(left), Some(right)) if left != right => {
                Err(ManifoldError::incompatible_tangent_spaces(left, right))
            }
            _ => Ok(()),
        }
    }
}

impl<M: Manifold + ?Sized> Clone for TVector<M> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            base: self.base.clone(),
        }
    }
}

impl<M: Manifold + ?Sized> PartialEq for TVector<M> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.base == other.base
    }
}

impl<M: Manifold + ?Sized> Debug for TVector<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TVector")
            .field("value", &self.value)
            .field("base", &self.base)
            .finish()
    }
}

/// Trait for Riemannian manifolds.
///
/// This is the capability set the solver engine relies on. A manifold is
/// "pluggable" as soon as it implements this trait; nothing else couples it
/// to the solvers.
///
/// ## Laws
///
/// Implementations must satisfy, up to numerical tolerance:
///
/// 1. `exp(x, zero_vector(x), t) == x`
/// 2. `exp(x, log(x, y), 1) == y` away from the cut locus
/// 3. `log(x, x) == zero_vector(x)`
/// 4. `distance` is symmetric, non-negative and zero iff the points coincide
/// 5. `dot` is symmetric and positive definite
///
/// ## Validation
///
/// `validate_point` and `validate_tangent` fail with a
/// [`ManifoldError::InvalidPoint`] / [`ManifoldError::InvalidTangent`] (or a
/// [`ManifoldError::DimensionMismatch`]) naming the offending value. They are
/// never invoked implicitly by the other operations.
pub trait Manifold: Debug + Send + Sync {
    /// Points on the manifold.
    type Point: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Raw tangent values, without base point information.
    type Tangent: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Returns a human-readable name for the manifold.
    fn name(&self) -> &str;

    /// Returns a short abbreviation, e.g. `"Sn"` or `"S1"`.
    fn abbreviation(&self) -> &str;

    /// Returns the intrinsic dimension of the manifold.
    fn dimension(&self) -> usize;

    /// A characteristic length of the manifold.
    ///
    /// Used as the default numerator of decreasing step size sequences.
    fn typical_distance(&self) -> f64;

    /// Geodesic distance between two points.
    fn distance(&self, x: &Self::Point, y: &Self::Point) -> Result<f64>;

    /// Exponential map: follows the geodesic from `x` in direction `t·ξ`.
    fn exp(&self, x: &Self::Point, xi: &TVector<Self>, t: f64) -> Result<Self::Point>;

    /// Logarithmic map: the tangent vector at `x` pointing to `y`.
    ///
    /// The returned vector is attached to `x`.
    fn log(&self, x: &Self::Point, y: &Self::Point) -> Result<TVector<Self>>;

    /// Riemannian inner product of two raw tangent values at `x`.
    fn inner(&self, x: &Self::Point, u: &Self::Tangent, v: &Self::Tangent) -> Result<f64>;

    /// Riemannian inner product of two tangent vectors at `x`.
    ///
    /// Fails with [`ManifoldError::IncompatibleTangentSpaces`] when both
    /// vectors know their base point and the bases differ.
    fn dot(&self, x: &Self::Point, xi: &TVector<Self>, nu: &TVector<Self>) -> Result<f64> {
        xi.check_same_tangent_space(nu)?;
        self.inner(x, xi.value(), nu.value())
    }

    /// Norm of a tangent vector, `sqrt(dot(x, ξ, ξ))`.
    fn norm(&self, x: &Self::Point, xi: &TVector<Self>) -> Result<f64> {
        self.inner(x, xi.value(), xi.value()).map(f64::sqrt)
    }

    /// Additive identity of the tangent space at `x`.
    fn zero_vector(&self, x: &Self::Point) -> Result<TVector<Self>>;

    /// Moves `ξ` from the tangent space at `x` to the tangent space at `y`.
    fn parallel_transport(
        &self,
        x: &Self::Point,
        y: &Self::Point,
        xi: &TVector<Self>,
    ) -> Result<TVector<Self>>;

    /// Scales a raw tangent value by `s`.
    fn scale_tangent(&self, xi: &Self::Tangent, s: f64) -> Result<Self::Tangent>;

    /// Adds two raw tangent values of the same tangent space.
    fn add_tangents(&self, xi: &Self::Tangent, nu: &Self::Tangent) -> Result<Self::Tangent>;

    /// Generates a random point on the manifold.
    fn random_point(&self, rng: &mut dyn RngCore) -> Self::Point;

    /// Generates a random tangent vector at `x`.
    fn random_tangent(&self, x: &Self::Point, rng: &mut dyn RngCore) -> Result<TVector<Self>>;

    /// Checks the structural constraints of a point.
    fn validate_point(&self, x: &Self::Point) -> Result<()>;

    /// Checks that `ξ` is a tangent vector at `x`.
    fn validate_tangent(&self, x: &Self::Point, xi: &TVector<Self>) -> Result<()>;

    /// Scales a tangent vector, keeping its base point.
    fn scale(&self, xi: &TVector<Self>, s: f64) -> Result<TVector<Self>> {
        Ok(TVector {
            value: self.scale_tangent(xi.value(), s)?,
            base: xi.base.clone(),
        })
    }

    /// Adds two tangent vectors of the same tangent space.
    fn add(&self, xi: &TVector<Self>, nu: &TVector<Self>) -> Result<TVector<Self>> {
        xi.check_same_tangent_space(nu)?;
        Ok(TVector {
            value: self.add_tangents(xi.value(), nu.value())?,
            base: xi.base.clone().or_else(|| nu.base.clone()),
        })
    }
}
