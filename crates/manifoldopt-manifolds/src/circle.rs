//! The circle S¹ represented by angles in [-π, π).
//!
//! Every angle arithmetic result is reduced with [`sym_rem`], the symmetric
//! remainder modulo 2π, so points always stay in the canonical interval and
//! tangent values returned by `log` are the shortest signed arc.

use manifoldopt_core::{
    error::{ManifoldError, Result},
    manifold::{Manifold, TVector},
    types::constants,
};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::{PI, TAU};

/// Symmetric remainder of `x` modulo 2π, in `[-π, π)`.
///
/// Angles already inside the interval are returned unchanged; others are
/// reduced with an exact Euclidean remainder. Values numerically at ±π are
/// mapped to -π, so `sym_rem(3π) == -π`. The function is idempotent.
pub fn sym_rem(x: f64) -> f64 {
    let inside = |r: f64| {
        r > -PI + constants::SYM_REM_TOLERANCE && r < PI - constants::SYM_REM_TOLERANCE
    };
    if inside(x) {
        return x;
    }
    let r = (x + PI).rem_euclid(TAU) - PI;
    if inside(r) {
        r
    } else {
        -PI
    }
}

/// A point on the circle: an angle in `[-π, π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct S1Point(pub f64);

impl S1Point {
    /// Wraps an angle without reducing it.
    pub fn new(angle: f64) -> Self {
        Self(angle)
    }

    /// Wraps an angle reduced into `[-π, π)`.
    pub fn reduced(angle: f64) -> Self {
        Self(sym_rem(angle))
    }

    /// The angle.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Intrinsic dimension of the circle.
    pub fn manifold_dimension(&self) -> usize {
        1
    }
}

/// The circle S¹ with the arc length metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Circle;

impl Circle {
    /// Creates the circle.
    pub fn new() -> Self {
        Self
    }
}

impl Manifold for Circle {
    type Point = S1Point;
    type Tangent = f64;

    fn name(&self) -> &str {
        "Circle"
    }

    fn abbreviation(&self) -> &str {
        "S1"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn typical_distance(&self) -> f64 {
        PI / 2.0
    }

    fn distance(&self, x: &S1Point, y: &S1Point) -> Result<f64> {
        Ok(sym_rem(y.0 - x.0).abs())
    }

    fn exp(&self, x: &S1Point, xi: &TVector<Self>, t: f64) -> Result<S1Point> {
        Ok(S1Point::reduced(x.0 + t * xi.value()))
    }

    fn log(&self, x: &S1Point, y: &S1Point) -> Result<TVector<Self>> {
        Ok(TVector::at(*x, sym_rem(y.0 - x.0)))
    }

    fn inner(&self, _x: &S1Point, u: &f64, v: &f64) -> Result<f64> {
        Ok(u * v)
    }

    fn zero_vector(&self, x: &S1Point) -> Result<TVector<Self>> {
        Ok(TVector::at(*x, 0.0))
    }

    fn parallel_transport(&self, _x: &S1Point, y: &S1Point, xi: &TVector<Self>) -> Result<TVector<Self>> {
        // The circle is flat
        Ok(TVector::at(*y, *xi.value()))
    }

    fn scale_tangent(&self, xi: &f64, s: f64) -> Result<f64> {
        Ok(xi * s)
    }

    fn add_tangents(&self, xi: &f64, nu: &f64) -> Result<f64> {
        Ok(xi + nu)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> S1Point {
        S1Point(rng.gen_range(-PI..PI))
    }

    fn random_tangent(&self, x: &S1Point, rng: &mut dyn RngCore) -> Result<TVector<Self>> {
        let value: f64 = StandardNormal.sample(rng);
        Ok(TVector::at(*x, value))
    }

    fn validate_point(&self, x: &S1Point) -> Result<()> {
        if !x.0.is_finite() {
            return Err(ManifoldError::invalid_point(x, "angle is not finite"));
        }
        if !(-PI..PI).contains(&x.0) {
            return Err(ManifoldError::invalid_point(x, "angle is outside [-π, π)"));
        }
        Ok(())
    }

    fn validate_tangent(&self, x: &S1Point, xi: &TVector<Self>) -> Result<()> {
        self.validate_point(x)?;
        if let Some(base) = xi.base() {
            if base != x {
                return Err(ManifoldError::incompatible_tangent_spaces(base, x));
            }
        }
        if !xi.value().is_finite() {
            return Err(ManifoldError::invalid_tangent(xi.value(), "value is not finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_sym_rem_reduces_into_range() {
        assert_relative_eq!(sym_rem(0.5), 0.5);
        assert_relative_eq!(sym_rem(-6.0), TAU - 6.0, epsilon = 1e-12);
        assert_relative_eq!(sym_rem(7.0), 7.0 - TAU, epsilon = 1e-12);
        assert_eq!(sym_rem(PI), -PI);
        assert_eq!(sym_rem(-PI), -PI);
        assert_eq!(sym_rem(3.0 * PI), -PI);
    }

    #[test]
    fn test_sym_rem_keeps_precision_for_large_angles() {
        assert_eq!(sym_rem(0.1), 0.1);
        assert_eq!(sym_rem(-3.0), -3.0);

        let r = sym_rem(1e17);
        assert_relative_eq!(r, -1.901_909_558_165_098, epsilon = 1e-9);
        assert_relative_eq!(sym_rem(1e6 + 0.25), (1e6 + 0.25 + PI) % TAU - PI, epsilon = 1e-9);

        let circle = Circle::new();
        let moved = circle
            .exp(&S1Point(0.0), &TVector::at(S1Point(0.0), 1.0), 1e17)
            .unwrap();
        assert_relative_eq!(moved.0, r);
    }

    #[test]
    fn test_log_takes_shortest_arc() {
        let circle = Circle::new();
        let log = circle.log(&S1Point(3.0), &S1Point(-3.0)).unwrap();

        assert_relative_eq!(*log.value(), TAU - 6.0, epsilon = 1e-12);
        assert_relative_eq!(*log.value(), 0.283_185_307_179_586, epsilon = 1e-12);
        assert_eq!(log.base(), Some(&S1Point(3.0)));
    }

    #[test]
    fn test_exp_wraps_around() {
        let circle = Circle::new();
        let x = S1Point(3.0);
        let xi = TVector::at(x, 1.0);

        let y = circle.exp(&x, &xi, 1.0).unwrap();
        assert_relative_eq!(y.0, 4.0 - TAU, epsilon = 1e-12);
        assert!(circle.validate_point(&y).is_ok());

        let back = circle.log(&x, &y).unwrap();
        assert_relative_eq!(*back.value(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_and_properties() {
        let circle = Circle::new();
        let x = S1Point(3.0);
        let y = S1Point(-3.0);

        assert_relative_eq!(circle.distance(&x, &y).unwrap(), TAU - 6.0, epsilon = 1e-12);
        assert_eq!(circle.dimension(), 1);
        assert_eq!(circle.abbreviation(), "S1");
        assert_relative_eq!(circle.typical_distance(), PI / 2.0);
        assert_eq!(x.manifold_dimension(), 1);
    }

    #[test]
    fn test_validation() {
        let circle = Circle::new();

        assert!(circle.validate_point(&S1Point(-PI)).is_ok());
        assert!(matches!(
            circle.validate_point(&S1Point(PI)),
            Err(ManifoldError::InvalidPoint { .. })
        ));
        assert!(matches!(
            circle.validate_point(&S1Point(f64::NAN)),
            Err(ManifoldError::InvalidPoint { .. })
        ));

        let xi = TVector::at(S1Point(1.0), 0.5);
        assert!(circle.validate_tangent(&S1Point(1.0), &xi).is_ok());
        assert!(matches!(
            circle.validate_tangent(&S1Point(0.0), &xi),
            Err(ManifoldError::IncompatibleTangentSpaces { .. })
        ));
    }

    #[test]
    fn test_transport_is_identity() {
        let circle = Circle::new();
        let xi = TVector::at(S1Point(0.0), 0.7);

        let moved = circle.parallel_transport(&S1Point(0.0), &S1Point(2.0), &xi).unwrap();
        assert_eq!(moved.value(), &0.7);
        assert_eq!(moved.base(), Some(&S1Point(2.0)));
    }

    #[test]
    fn test_random_generation() {
        let circle = Circle::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let x = circle.random_point(&mut rng);
            assert!(circle.validate_point(&x).is_ok());
            let xi = circle.random_tangent(&x, &mut rng).unwrap();
            assert!(circle.validate_tangent(&x, &xi).is_ok());
        }
    }
}
