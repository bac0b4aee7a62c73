//! Type-erased manifolds for composing heterogeneous products.
//!
//! A product manifold such as S² × S¹ combines manifolds whose point types
//! differ. [`Element`] boxes a point or tangent value of any manifold and
//! [`ComponentManifold`] exposes the geometric operations on elements. Any
//! [`Manifold`] becomes a component through [`Component`]:
//!
//! ```rust,ignore
//! let parts: Vec<Arc<dyn ComponentManifold>> = vec![
//!     component(Sphere::new(2)?),
//!     component(Circle::new()),
//! ];
//! ```

use crate::{
    error::{ManifoldError, Result},
    manifold::{Manifold, TVector},
};
use rand::RngCore;
use std::any::{type_name, Any};
use std::fmt::{self, Debug};
use std::sync::Arc;

trait ErasedValue: Any + Debug + Send + Sync {
    fn clone_boxed(&self) -> Box<dyn ErasedValue>;
    fn eq_erased(&self, other: &dyn ErasedValue) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T> ErasedValue for T
where
    T: Any + Clone + Debug + PartialEq + Send + Sync,
{
    fn clone_boxed(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn eq_erased(&self, other: &dyn ErasedValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A point or raw tangent value of some manifold, with its type erased.
pub struct Element(Box<dyn ErasedValue>);

impl Element {
    /// Wraps a value.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + Debug + PartialEq + Send + Sync,
    {
        Self(Box::new(value))
    }

    /// Returns the wrapped value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the wrapped value has type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_erased(other.0.as_ref())
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Geometric operations on type-erased elements.
///
/// Tangent elements hold raw tangent values; base points are tracked by the
/// enclosing product vector, not by its components.
pub trait ComponentManifold: Debug + Send + Sync {
    /// Name of the wrapped manifold.
    fn name(&self) -> &str;
    /// Abbreviation of the wrapped manifold.
    fn abbreviation(&self) -> &str;
    /// Intrinsic dimension of the wrapped manifold.
    fn dimension(&self) -> usize;
    /// Characteristic length of the wrapped manifold.
    fn typical_distance(&self) -> f64;
    /// Geodesic distance.
    fn distance(&self, x: &Element, y: &Element) -> Result<f64>;
    /// Exponential map.
    fn exp(&self, x: &Element, xi: &Element, t: f64) -> Result<Element>;
    /// Logarithmic map, returning a raw tangent element.
    fn log(&self, x: &Element, y: &Element) -> Result<Element>;
    /// Inner product of raw tangent elements.
    fn inner(&self, x: &Element, u: &Element, v: &Element) -> Result<f64>;
    /// Raw zero tangent element at `x`.
    fn zero_vector(&self, x: &Element) -> Result<Element>;
    /// Parallel transport of a raw tangent element.
    fn parallel_transport(&self, x: &Element, y: &Element, xi: &Element) -> Result<Element>;
    /// Scales a raw tangent element.
    fn scale_tangent(&self, xi: &Element, s: f64) -> Result<Element>;
    /// Adds two raw tangent elements.
    fn add_tangents(&self, xi: &Element, nu: &Element) -> Result<Element>;
    /// Random point element.
    fn random_point(&self, rng: &mut dyn RngCore) -> Element;
    /// Random raw tangent element at `x`.
    fn random_tangent(&self, x: &Element, rng: &mut dyn RngCore) -> Result<Element>;
    /// Validates a point element.
    fn validate_point(&self, x: &Element) -> Result<()>;
    /// Validates a raw tangent element at `x`.
    fn validate_tangent(&self, x: &Element, xi: &Element) -> Result<()>;
}

/// Adapter turning a [`Manifold`] into a [`ComponentManifold`].
#[derive(Debug, Clone)]
pub struct Component<M>(M);

impl<M: Manifold> Component<M> {
    /// Wraps `manifold`.
    pub fn new(manifold: M) -> Self {
        Self(manifold)
    }

    /// The wrapped manifold.
    pub fn manifold(&self) -> &M {
        &self.0
    }

    fn point<'a>(&self, x: &'a Element) -> Result<&'a M::Point> {
        x.downcast_ref::<M::Point>().ok_or_else(|| {
            ManifoldError::invalid_point(
                x,
                format!(
                    "expected a {} for component {}",
                    type_name::<M::Point>(),
                    self.0.name()
                ),
            )
        })
    }

    fn tangent(&self, xi: &Element) -> Result<TVector<M>> {
        xi.downcast_ref::<M::Tangent>()
            .map(|value| TVector::new(value.clone()))
            .ok_or_else(|| {
                ManifoldError::invalid_tangent(
                    xi,
                    format!(
                        "expected a {} for component {}",
                        type_name::<M::Tangent>(),
                        self.0.name()
                    ),
                )
            })
    }
}

/// Wraps a manifold as a shareable product component.
pub fn component<M: Manifold + 'static>(manifold: M) -> Arc<dyn ComponentManifold> {
    Arc::new(Component::new(manifold))
}

impl<M: Manifold + 'static> ComponentManifold for Component<M> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn abbreviation(&self) -> &str {
        self.0.abbreviation()
    }

    fn dimension(&self) -> usize {
        self.0.dimension()
    }

    fn typical_distance(&self) -> f64 {
        self.0.typical_distance()
    }

    fn distance(&self, x: &Element, y: &Element) -> Result<f64> {
        self.0.distance(self.point(x)?, self.point(y)?)
    }

    fn exp(&self, x: &Element, xi: &Element, t: f64) -> Result<Element> {
        let xi = self.tangent(xi)?;
        self.0.exp(self.point(x)?, &xi, t).map(Element::new)
    }

    fn log(&self, x: &Element, y: &Element) -> Result<Element> {
        let log = self.0.log(self.point(x)?, self.point(y)?)?;
        Ok(Element::new(log.into_value()))
    }

    fn inner(&self, x: &Element, u: &Element, v: &Element) -> Result<f64> {
        let u = self.tangent(u)?;
        let v = self.tangent(v)?;
        self.0.inner(self.point(x)?, u.value(), v.value())
    }

    fn zero_vector(&self, x: &Element) -> Result<Element> {
        let zero = self.0.zero_vector(self.point(x)?)?;
        Ok(Element::new(zero.into_value()))
    }

    fn parallel_transport(&self, x: &Element, y: &Element, xi: &Element) -> Result<Element> {
        let xi = self.tangent(xi)?;
        let moved = self
            .0
            .parallel_transport(self.point(x)?, self.point(y)?, &xi)?;
        Ok(Element::new(moved.into_value()))
    }

    fn scale_tangent(&self, xi: &Element, s: f64) -> Result<Element> {
        let xi = self.tangent(xi)?;
        self.0.scale_tangent(xi.value(), s).map(Element::new)
    }

    fn add_tangents(&self, xi: &Element, nu: &Element) -> Result<Element> {
        let xi = self.tangent(xi)?;
        let nu = self.tangent(nu)?;
        self.0.add_tangents(xi.value(), nu.value()).map(Element::new)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Element {
        Element::new(self.0.random_point(rng))
    }

    fn random_tangent(&self, x: &Element, rng: &mut dyn RngCore) -> Result<Element> {
        let xi = self.0.random_tangent(self.point(x)?, rng)?;
        Ok(Element::new(xi.into_value()))
    }

    fn validate_point(&self, x: &Element) -> Result<()> {
        self.0.validate_point(self.point(x)?)
    }

    fn validate_tangent(&self, x: &Element, xi: &Element) -> Result<()> {
        let xi = self.tangent(xi)?;
        self.0.validate_tangent(self.point(x)?, &xi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_manifolds::TestEuclideanManifold;
    use crate::types::DVector;

    #[test]
    fn test_element_equality_respects_type() {
        let a = Element::new(1.0_f64);
        let b = Element::new(1.0_f64);
        let c = Element::new(1.0_f32);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is::<f64>());
        assert_eq!(a.downcast_ref::<f64>(), Some(&1.0));
        assert_eq!(a.downcast_ref::<f32>(), None);
    }

    #[test]
    fn test_element_clone_and_debug() {
        let a = Element::new(DVector::from_vec(vec![1.0, 2.0]));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), format!("{:?}", DVector::from_vec(vec![1.0, 2.0])));
    }

    #[test]
    fn test_component_delegates() {
        let part = component(TestEuclideanManifold::new(2));
        let x = Element::new(DVector::from_vec(vec![0.0, 0.0]));
        let y = Element::new(DVector::from_vec(vec![3.0, 4.0]));

        assert_eq!(part.name(), "TestEuclidean");
        assert_eq!(part.dimension(), 2);
        assert_eq!(part.distance(&x, &y).unwrap(), 5.0);

        let log = part.log(&x, &y).unwrap();
        let back = part.exp(&x, &log, 1.0).unwrap();
        assert_eq!(back, y);
        assert_eq!(part.inner(&x, &log, &log).unwrap(), 25.0);
    }

    #[test]
    fn test_component_rejects_foreign_elements() {
        let part = component(TestEuclideanManifold::new(2));
        let x = Element::new(0.5_f64);
        let y = Element::new(DVector::from_vec(vec![3.0, 4.0]));

        let err = part.distance(&x, &y).unwrap_err();
        assert!(matches!(err, ManifoldError::InvalidPoint { .. }));

        let err = part.scale_tangent(&x, 2.0).unwrap_err();
        assert!(matches!(err, ManifoldError::InvalidTangent { .. }));
    }
}
