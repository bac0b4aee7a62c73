//! # Product Manifold M₁ × M₂ × ... × Mₙ
//!
//! The product manifold combines several manifolds, possibly with different
//! point types, into a single manifold structure.
//!
//! ## Geometric Structure
//!
//! The tangent space decomposes naturally:
//! ```text
//! T_{(x₁,...,xₙ)} M = T_{x₁} M₁ × T_{x₂} M₂ × ... × T_{xₙ} Mₙ
//! ```
//!
//! The product metric is the sum of component metrics and geodesics are
//! component-wise geodesics, so
//! ```text
//! g_x((u₁,...,uₙ), (v₁,...,vₙ)) = Σᵢ gᵢ(uᵢ, vᵢ)
//! d²(x, y) = Σᵢ d²ᵢ(xᵢ, yᵢ)
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use manifoldopt_core::component::{component, Element};
//! use manifoldopt_core::manifold::Manifold;
//! use manifoldopt_manifolds::{Circle, ProdPoint, Product, S1Point, SnPoint, Sphere};
//!
//! // S² × S¹
//! let product = Product::new(vec![component(Sphere::new(2)?), component(Circle::new())])?;
//! let x = ProdPoint::new(vec![
//!     Element::new(SnPoint::from_vec(vec![1.0, 0.0, 0.0])),
//!     Element::new(S1Point(0.5)),
//! ]);
//! product.validate_point(&x)?;
//! assert_eq!(product.dimension(), 3);
//! # Ok::<(), manifoldopt_core::error::ManifoldError>(())
//! ```

use manifoldopt_core::{
    component::{ComponentManifold, Element},
    error::{ManifoldError, Result},
    manifold::{Manifold, TVector},
};
use rand::RngCore;
use std::sync::Arc;

/// A point on a product manifold: one element per component.
#[derive(Debug, Clone, PartialEq)]
pub struct ProdPoint(pub Vec<Element>);

impl ProdPoint {
    /// Creates a point from its component points.
    pub fn new(components: Vec<Element>) -> Self {
        Self(components)
    }

    /// The component points.
    pub fn components(&self) -> &[Element] {
        &self.0
    }

    /// The `index`-th component downcast to `T`.
    pub fn component<T: 'static>(&self, index: usize) -> Option<&T> {
        self.0.get(index)?.downcast_ref()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the point has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A raw tangent value on a product manifold: one element per component.
#[derive(Debug, Clone, PartialEq)]
pub struct ProdTangent(pub Vec<Element>);

impl ProdTangent {
    /// Creates a tangent value from its component tangent values.
    pub fn new(components: Vec<Element>) -> Self {
        Self(components)
    }

    /// The component tangent values.
    pub fn components(&self) -> &[Element] {
        &self.0
    }

    /// The `index`-th component downcast to `T`.
    pub fn component<T: 'static>(&self, index: usize) -> Option<&T> {
        self.0.get(index)?.downcast_ref()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the value has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A product of manifolds.
///
/// # Invariants
///
/// - At least one component manifold
/// - Points and tangent values have exactly one element per component,
///   in component order
#[derive(Debug, Clone)]
pub struct Product {
    /// Component manifolds
    manifolds: Vec<Arc<dyn ComponentManifold>>,
    /// Cached name, e.g. "Product(Sphere, Circle)"
    name: String,
    /// Cached abbreviation, e.g. "Sn×S1"
    abbreviation: String,
}

impl Product {
    /// Creates a product manifold from component manifolds.
    ///
    /// # Errors
    /// Returns an error if `manifolds` is empty.
    pub fn new(manifolds: Vec<Arc<dyn ComponentManifold>>) -> Result<Self> {
        if manifolds.is_empty() {
            return Err(ManifoldError::invalid_parameter(
                "Product requires at least one component manifold",
            ));
        }
        let name = format!(
            "Product({})",
            manifolds
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let abbreviation = manifolds
            .iter()
            .map(|m| m.abbreviation())
            .collect::<Vec<_>>()
            .join("×");
        Ok(Self {
            manifolds,
            name,
            abbreviation,
        })
    }

    /// The component manifolds.
    pub fn manifolds(&self) -> &[Arc<dyn ComponentManifold>] {
        &self.manifolds
    }

    /// Number of component manifolds.
    pub fn num_components(&self) -> usize {
        self.manifolds.len()
    }

    fn check_count(&self, count: usize) -> Result<()> {
        if count == self.manifolds.len() {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(self.manifolds.len(), count))
        }
    }

    fn zip_map<F>(&self, a: &[Element], b: &[Element], mut f: F) -> Result<Vec<Element>>
    where
        F: FnMut(&dyn ComponentManifold, &Element, &Element) -> Result<Element>,
    {
        self.check_count(a.len())?;
        self.check_count(b.len())?;
        self.manifolds
            .iter()
            .zip(a.iter().zip(b))
            .map(|(m, (a, b))| f(m.as_ref(), a, b))
            .collect()
    }
}

impl Manifold for Product {
    type Point = ProdPoint;
    type Tangent = ProdTangent;

    fn name(&self) -> &str {
        &self.name
    }

    fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    fn dimension(&self) -> usize {
        self.manifolds.iter().map(|m| m.dimension()).sum()
    }

    fn typical_distance(&self) -> f64 {
        self.manifolds
            .iter()
            .map(|m| m.typical_distance().powi(2))
            .sum::<f64>()
            .sqrt()
    }

    fn distance(&self, x: &ProdPoint, y: &ProdPoint) -> Result<f64> {
        self.check_count(x.len())?;
        self.check_count(y.len())?;
        let mut sum = 0.0;
        for (m, (xi, yi)) in self.manifolds.iter().zip(x.0.iter().zip(&y.0)) {
            sum += m.distance(xi, yi)?.powi(2);
        }
        Ok(sum.sqrt())
    }

    fn exp(&self, x: &ProdPoint, xi: &TVector<Self>, t: f64) -> Result<ProdPoint> {
        self.zip_map(&x.0, &xi.value().0, |m, x, v| m.exp(x, v, t))
            .map(ProdPoint)
    }

    fn log(&self, x: &ProdPoint, y: &ProdPoint) -> Result<TVector<Self>> {
        let value = self.zip_map(&x.0, &y.0, |m, x, y| m.log(x, y))?;
        Ok(TVector::at(x.clone(), ProdTangent(value)))
    }

    fn inner(&self, x: &ProdPoint, u: &ProdTangent, v: &ProdTangent) -> Result<f64> {
        self.check_count(x.len())?;
        self.check_count(u.len())?;
        self.check_count(v.len())?;
        let mut sum = 0.0;
        for (m, (xi, (ui, vi))) in self
            .manifolds
            .iter()
            .zip(x.0.iter().zip(u.0.iter().zip(&v.0)))
        {
            sum += m.inner(xi, ui, vi)?;
        }
        Ok(sum)
    }

    fn zero_vector(&self, x: &ProdPoint) -> Result<TVector<Self>> {
        self.check_count(x.len())?;
        let value = self
            .manifolds
            .iter()
            .zip(&x.0)
            .map(|(m, xi)| m.zero_vector(xi))
            .collect::<Result<Vec<_>>>()?;
        Ok(TVector::at(x.clone(), ProdTangent(value)))
    }

    fn parallel_transport(&self, x: &ProdPoint, y: &ProdPoint, xi: &TVector<Self>) -> Result<TVector<Self>> {
        self.check_count(x.len())?;
        self.check_count(y.len())?;
        self.check_count(xi.value().len())?;
        let moved = self
            .manifolds
            .iter()
            .zip(x.0.iter().zip(&y.0))
            .zip(&xi.value().0)
            .map(|((m, (xc, yc)), vc)| m.parallel_transport(xc, yc, vc))
            .collect::<Result<Vec<_>>>()?;
        Ok(TVector::at(y.clone(), ProdTangent(moved)))
    }

    fn scale_tangent(&self, xi: &ProdTangent, s: f64) -> Result<ProdTangent> {
        self.check_count(xi.len())?;
        self.manifolds
            .iter()
            .zip(&xi.0)
            .map(|(m, v)| m.scale_tangent(v, s))
            .collect::<Result<Vec<_>>>()
            .map(ProdTangent)
    }

    fn add_tangents(&self, xi: &ProdTangent, nu: &ProdTangent) -> Result<ProdTangent> {
        self.zip_map(&xi.0, &nu.0, |m, a, b| m.add_tangents(a, b))
            .map(ProdTangent)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> ProdPoint {
        ProdPoint(self.manifolds.iter().map(|m| m.random_point(rng)).collect())
    }

    fn random_tangent(&self, x: &ProdPoint, rng: &mut dyn RngCore) -> Result<TVector<Self>> {
        self.check_count(x.len())?;
        let mut value = Vec::with_capacity(x.len());
        for (m, xc) in self.manifolds.iter().zip(&x.0) {
            value.push(m.random_tangent(xc, rng)?);
        }
        Ok(TVector::at(x.clone(), ProdTangent(value)))
    }

    fn validate_point(&self, x: &ProdPoint) -> Result<()> {
        self.check_count(x.len())?;
        for (m, xc) in self.manifolds.iter().zip(&x.0) {
            m.validate_point(xc)?;
        }
        Ok(())
    }

    fn validate_tangent(&self, x: &ProdPoint, xi: &TVector<Self>) -> Result<()> {
        if let Some(base) = xi.base() {
            if base != x {
                return Err(ManifoldError::incompatible_tangent_spaces(base, x));
            }
        }
        self.check_count(x.len())?;
        self.check_count(xi.value().len())?;
        for (m, (xc, vc)) in self.manifolds.iter().zip(x.0.iter().zip(&xi.value().0)) {
            m.validate_tangent(xc, vc)?;
        }
        Ok(())
    }
}
