//! manifoldopt Manifolds - Concrete implementations of Riemannian manifolds.
//!
//! This crate provides the sphere S^n, the circle S¹ and products of
//! arbitrary manifolds. Each implements
//! [`Manifold`](manifoldopt_core::manifold::Manifold) and works with every
//! solver of `manifoldopt-optim`.

pub mod circle;
pub mod product;
pub mod sphere;

// Re-export main manifolds for convenience
pub use circle::{sym_rem, Circle, S1Point};
pub use product::{ProdPoint, ProdTangent, Product};
pub use sphere::{SnPoint, Sphere};
