//! Step size and proximal parameter schedules.
//!
//! A schedule maps the iteration number k to a positive parameter αₖ. Gradient
//! descent uses it as the step length; the cyclic proximal point algorithm uses
//! it as the proximal parameter λₖ.
//!
//! # Theoretical Requirements
//!
//! Convergence of the cyclic proximal point algorithm requires
//! - **Non-summable**: Σₖ λₖ = ∞
//! - **Square-summable**: Σₖ λₖ² < ∞
//!
//! [`StepSizeSchedule::Harmonic`] (λₖ = λ₀/k) satisfies both and is the
//! default proximal schedule.
//!
//! # Examples
//!
//! ```rust
//! # use manifoldopt_core::step_size::StepSizeSchedule;
//! let schedule = StepSizeSchedule::harmonic(1.0);
//! assert_eq!(schedule.get_step_size(4), 0.25);
//!
//! let custom = StepSizeSchedule::custom(|k| 1.0 / (k as f64 + 1.0).powi(2));
//! assert_eq!(custom.get_step_size(1), 0.25);
//! ```

use std::fmt::{self, Debug};
use std::sync::Arc;

/// Function of the iteration number used by [`StepSizeSchedule::Custom`].
pub type ScheduleFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// Step size scheduling strategies.
#[derive(Clone)]
pub enum StepSizeSchedule {
    /// Fixed step size αₖ = α₀ for all iterations
    Constant(f64),

    /// Exponential decay: αₖ = α₀ · γᵏ where 0 < γ < 1
    ExponentialDecay {
        /// Initial step size α₀
        initial: f64,
        /// Decay factor γ ∈ (0, 1)
        decay_rate: f64,
    },

    /// Polynomial decay: αₖ = α₀ / (1 + βk)ᵖ where β > 0, p > 0
    PolynomialDecay {
        /// Initial step size α₀
        initial: f64,
        /// Decay coefficient β > 0
        decay_rate: f64,
        /// Decay power p > 0
        power: f64,
    },

    /// Square root decay: αₖ = α₀ / √(1 + k)
    SquareRootDecay {
        /// Initial step size α₀
        initial: f64,
    },

    /// Harmonic decay: αₖ = α₀ / k for k ≥ 1, α₀ for k = 0
    Harmonic {
        /// Numerator α₀
        initial: f64,
    },

    /// Arbitrary function of the iteration number
    Custom(ScheduleFn),
}

impl StepSizeSchedule {
    /// Computes the step size αₖ for iteration k.
    pub fn get_step_size(&self, iteration: usize) -> f64 {
        let k = iteration as f64;

        match self {
            Self::Constant(alpha) => *alpha,

            Self::ExponentialDecay {
                initial,
                decay_rate,
            } => initial * decay_rate.powf(k),

            Self::PolynomialDecay {
                initial,
                decay_rate,
                power,
            } => initial / (1.0 + decay_rate * k).powf(*power),

            Self::SquareRootDecay { initial } => initial / (1.0 + k).sqrt(),

            Self::Harmonic { initial } => initial / k.max(1.0),

            Self::Custom(f) => f(iteration),
        }
    }

    /// Creates a constant step size schedule αₖ = α₀.
    pub fn constant(step_size: f64) -> Self {
        Self::Constant(step_size)
    }

    /// Creates an exponential decay schedule αₖ = α₀ · γᵏ.
    pub fn exponential_decay(initial: f64, decay_rate: f64) -> Self {
        Self::ExponentialDecay {
            initial,
            decay_rate,
        }
    }

    /// Creates a polynomial decay schedule αₖ = α₀ / (1 + βk)ᵖ.
    ///
    /// For p ∈ (0.5, 1] the sequence is non-summable but square-summable.
    pub fn polynomial_decay(initial: f64, decay_rate: f64, power: f64) -> Self {
        Self::PolynomialDecay {
            initial,
            decay_rate,
            power,
        }
    }

    /// Creates a square root decay schedule αₖ = α₀ / √(1 + k).
    pub fn sqrt_decay(initial: f64) -> Self {
        Self::SquareRootDecay { initial }
    }

    /// Creates a harmonic schedule αₖ = α₀ / k.
    pub fn harmonic(initial: f64) -> Self {
        Self::Harmonic { initial }
    }

    /// Creates a schedule from an arbitrary function of k.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl Debug for StepSizeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(alpha) => f.debug_tuple("Constant").field(alpha).finish(),
            Self::ExponentialDecay {
                initial,
                decay_rate,
            } => f
                .debug_struct("ExponentialDecay")
                .field("initial", initial)
                .field("decay_rate", decay_rate)
                .finish(),
            Self::PolynomialDecay {
                initial,
                decay_rate,
                power,
            } => f
                .debug_struct("PolynomialDecay")
                .field("initial", initial)
                .field("decay_rate", decay_rate)
                .field("power", power)
                .finish(),
            Self::SquareRootDecay { initial } => f
                .debug_struct("SquareRootDecay")
                .field("initial", initial)
                .finish(),
            Self::Harmonic { initial } => {
                f.debug_struct("Harmonic").field("initial", initial).finish()
            }
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_schedule() {
        let schedule = StepSizeSchedule::constant(0.1);
        assert_eq!(schedule.get_step_size(0), 0.1);
        assert_eq!(schedule.get_step_size(100), 0.1);
        assert_eq!(schedule.get_step_size(1000), 0.1);
    }

    #[test]
    fn test_exponential_decay() {
        let schedule = StepSizeSchedule::exponential_decay(1.0, 0.9);
        let step0 = schedule.get_step_size(0);
        let step1 = schedule.get_step_size(1);
        let step10 = schedule.get_step_size(10);

        assert!((step0 - 1.0).abs() < 1e-10);
        assert!((step1 - 0.9).abs() < 1e-10);
        assert!(step10 < step1);
        assert!(step10 < 0.5); // 0.9^10 ≈ 0.349
    }

    #[test]
    fn test_polynomial_decay() {
        let schedule = StepSizeSchedule::polynomial_decay(1.0, 0.1, 2.0);
        let step0 = schedule.get_step_size(0);
        let step10 = schedule.get_step_size(10);

        assert!((step0 - 1.0).abs() < 1e-10);
        // 1.0 / (1 + 0.1*10)^2 = 0.25
        assert!((step10 - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_sqrt_decay() {
        let schedule = StepSizeSchedule::sqrt_decay(1.0);
        assert!((schedule.get_step_size(0) - 1.0).abs() < 1e-10);
        assert!((schedule.get_step_size(3) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_harmonic() {
        let schedule = StepSizeSchedule::harmonic(std::f64::consts::PI);
        assert_eq!(schedule.get_step_size(0), std::f64::consts::PI);
        assert_eq!(schedule.get_step_size(1), std::f64::consts::PI);
        assert!((schedule.get_step_size(4) - std::f64::consts::PI / 4.0).abs() < 1e-15);
    }

    #[test]
    fn test_custom_and_debug() {
        let schedule = StepSizeSchedule::custom(|k| 2.0 * k as f64);
        assert_eq!(schedule.get_step_size(3), 6.0);
        assert_eq!(format!("{schedule:?}"), "Custom(..)");
        assert_eq!(
            format!("{:?}", StepSizeSchedule::harmonic(1.0)),
            "Harmonic { initial: 1.0 }"
        );
    }
}
