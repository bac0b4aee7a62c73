//! Retractions used by gradient-based solvers.
//!
//! A retraction R_x(tξ) is a first-order approximation of the exponential
//! map. Solvers move along it instead of calling `exp` directly, so a cheaper
//! approximation can be swapped in without touching the algorithm.

use crate::{
    error::Result,
    manifold::{Manifold, TVector},
};
use std::fmt::{self, Debug};

/// A map from tangent vectors back to the manifold.
pub trait Retraction<M: Manifold>: Debug + Send + Sync {
    /// Returns the name of this retraction.
    fn name(&self) -> &str;

    /// Moves from `x` along `t·ξ`.
    fn retract(&self, manifold: &M, x: &M::Point, xi: &TVector<M>, t: f64) -> Result<M::Point>;
}

/// The exponential map as a retraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialRetraction;

impl ExponentialRetraction {
    /// Creates the exponential retraction.
    pub fn new() -> Self {
        Self
    }
}

impl<M: Manifold> Retraction<M> for ExponentialRetraction {
    fn name(&self) -> &str {
        "Exponential"
    }

    fn retract(&self, manifold: &M, x: &M::Point, xi: &TVector<M>, t: f64) -> Result<M::Point> {
        manifold.exp(x, xi, t)
    }
}

/// A retraction given by a closure `(manifold, x, ξ, t) ↦ R_x(tξ)`.
pub struct FnRetraction<F> {
    name: String,
    f: F,
}

impl<F> FnRetraction<F> {
    /// Wraps `f` under the given name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Debug for FnRetraction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRetraction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<M, F> Retraction<M> for FnRetraction<F>
where
    M: Manifold,
    F: Fn(&M, &M::Point, &TVector<M>, f64) -> Result<M::Point> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn retract(&self, manifold: &M, x: &M::Point, xi: &TVector<M>, t: f64) -> Result<M::Point> {
        (self.f)(manifold, x, xi, t)
    }
}
