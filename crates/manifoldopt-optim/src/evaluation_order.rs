//! Evaluation order policies for the cyclic proximal point algorithm.
//!
//! An order is a permutation of the 1-based proximal map indices `1..=m`.
//! The policy decides how the permutation evolves between sweeps:
//!
//! - [`EvaluationOrder::Linear`]: always `[1, 2, ..., m]`
//! - [`EvaluationOrder::Random`]: a fresh shuffle before every sweep
//! - [`EvaluationOrder::FixedRandom`]: shuffled once, then kept

use rand::{seq::SliceRandom, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the proximal maps are ordered within a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EvaluationOrder {
    /// Identity order every iteration
    #[default]
    Linear,
    /// Newly shuffled order every iteration
    Random,
    /// Shuffled at iteration 0 and then held fixed
    FixedRandom,
}

impl EvaluationOrder {
    /// Computes the order used after `iteration` completed sweeps.
    ///
    /// `previous` is the order of the last sweep; it is ignored when its
    /// length does not match `count`, which is the case at initialization.
    pub fn update_order(
        &self,
        count: usize,
        iteration: usize,
        previous: &[usize],
        rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        let reusable = previous.len() == count;
        match self {
            Self::Linear => identity(count),
            Self::Random => shuffled(count, rng),
            Self::FixedRandom if iteration == 0 || !reusable => shuffled(count, rng),
            Self::FixedRandom => previous.to_vec(),
        }
    }

    /// Returns the name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Random => "Random",
            Self::FixedRandom => "FixedRandom",
        }
    }
}

fn identity(count: usize) -> Vec<usize> {
    (1..=count).collect()
}

fn shuffled(count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let mut order = identity(count);
    order.shuffle(rng);
    order
}
