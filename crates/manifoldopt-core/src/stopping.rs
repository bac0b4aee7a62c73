//! Stopping criteria.
//!
//! A criterion is evaluated at the top of every iteration with the problem,
//! the solver state and the number of completed iterations. It either lets
//! the run continue or returns a [`StopReason`].
//!
//! Criteria compose with [`StoppingCriterion::or`] and
//! [`StoppingCriterion::and`]:
//!
//! ```rust
//! # use manifoldopt_core::stopping::StoppingCriterion;
//! let criterion = StoppingCriterion::max_iterations(5000)
//!     .or(StoppingCriterion::change_less(1e-8));
//! ```

use crate::{
    error::{OptimizerError, OptimizerResult, Result},
    manifold::Manifold,
    options::SolverOptions,
    problem::Problem,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationReason {
    /// Gradient norm or iterate change fell below its tolerance
    Converged,
    /// Objective value reached the requested target
    TargetReached,
    /// Maximum iteration count exhausted
    MaxIterations,
}

/// The outcome of a criterion that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct StopReason {
    /// Category of the reason
    pub termination: TerminationReason,
    /// Human-readable explanation
    pub message: String,
}

impl StopReason {
    fn new(termination: TerminationReason, message: String) -> Self {
        Self {
            termination,
            message,
        }
    }
}

/// Conditions under which a solver stops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StoppingCriterion {
    /// Stop once `iteration >= n`.
    MaxIterations(usize),
    /// Stop once `distance(x_old, x) < tol`, with the manifold's own distance.
    ChangeLess(f64),
    /// Stop once the norm of the last gradient is below `tol`.
    GradientNormLess(f64),
    /// Stop once the cost at the iterate is below the target.
    CostLess(f64),
    /// Stop when any of the criteria fires.
    Any(Vec<StoppingCriterion>),
    /// Stop when all of the criteria fire.
    All(Vec<StoppingCriterion>),
}

impl StoppingCriterion {
    /// Stop after `n` iterations.
    pub fn max_iterations(n: usize) -> Self {
        Self::MaxIterations(n)
    }

    /// Stop when an iteration moves the iterate less than `tol`.
    pub fn change_less(tol: f64) -> Self {
        Self::ChangeLess(tol)
    }

    /// Stop when the gradient norm drops below `tol`.
    pub fn gradient_norm_less(tol: f64) -> Self {
        Self::GradientNormLess(tol)
    }

    /// Stop when the cost drops below `target`.
    pub fn cost_less(target: f64) -> Self {
        Self::CostLess(target)
    }

    /// Combines two criteria; the result fires when either fires.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Any(mut criteria) => {
                criteria.push(other);
                Self::Any(criteria)
            }
            criterion => Self::Any(vec![criterion, other]),
        }
    }

    /// Combines two criteria; the result fires when both fire.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::All(mut criteria) => {
                criteria.push(other);
                Self::All(criteria)
            }
            criterion => Self::All(vec![criterion, other]),
        }
    }

    /// Checks that every `Any` / `All` combination has at least one member.
    ///
    /// An empty combination never fires, so a run using it would not end.
    pub fn validate(&self) -> OptimizerResult<()> {
        match self {
            Self::Any(criteria) | Self::All(criteria) => {
                if criteria.is_empty() {
                    return Err(OptimizerError::invalid_configuration(
                        "a combined stopping criterion needs at least one member",
                        "stopping_criterion",
                        format!("{self:?}"),
                    ));
                }
                criteria.iter().try_for_each(Self::validate)
            }
            _ => Ok(()),
        }
    }

    /// Evaluates the criterion after `iteration` completed iterations.
    ///
    /// Criteria comparing two iterates or reading the gradient never fire
    /// before the first step.
    pub fn evaluate<P, O>(&self, problem: &P, options: &O, iteration: usize) -> Result<Option<StopReason>>
    where
        P: Problem,
        O: SolverOptions<P> + ?Sized,
    {
        match self {
            Self::MaxIterations(max) => Ok((iteration >= *max).then(|| {
                StopReason::new(
                    TerminationReason::MaxIterations,
                    format!("The algorithm reached its maximal number of iterations ({max})."),
                )
            })),
            Self::ChangeLess(tol) => {
                if iteration == 0 {
                    return Ok(None);
                }
                let change = problem
                    .manifold()
                    .distance(options.previous_iterate(), options.iterate())?;
                Ok((change < *tol).then(|| {
                    StopReason::new(
                        TerminationReason::Converged,
                        format!(
                            "The algorithm performed a step with a change ({change:e}) less than {tol:e}."
                        ),
                    )
                }))
            }
            Self::GradientNormLess(tol) => {
                let Some(gradient) = options.gradient().filter(|_| iteration > 0) else {
                    return Ok(None);
                };
                let base = gradient.base().unwrap_or_else(|| options.iterate());
                let norm = problem.manifold().norm(base, gradient)?;
                Ok((norm < *tol).then(|| {
                    StopReason::new(
                        TerminationReason::Converged,
                        format!("The algorithm reached approximately critical point; the gradient norm ({norm:e}) is less than {tol:e}."),
                    )
                }))
            }
            Self::CostLess(target) => {
                let cost = problem.cost(options.iterate())?;
                Ok((cost < *target).then(|| {
                    StopReason::new(
                        TerminationReason::TargetReached,
                        format!("The algorithm reached a cost ({cost:e}) less than {target:e}."),
                    )
                }))
            }
            Self::Any(criteria) => {
                for criterion in criteria {
                    if let Some(reason) = criterion.evaluate(problem, options, iteration)? {
                        return Ok(Some(reason));
                    }
                }
                Ok(None)
            }
            Self::All(criteria) => {
                let mut reasons = Vec::with_capacity(criteria.len());
                for criterion in criteria {
                    match criterion.evaluate(problem, options, iteration)? {
                        Some(reason) => reasons.push(reason),
                        None => return Ok(None),
                    }
                }
                let Some(first) = reasons.first() else {
                    return Ok(None);
                };
                let termination = first.termination;
                let message = reasons
                    .iter()
                    .map(|reason| reason.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                Ok(Some(StopReason::new(termination, message)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizerResult;
    use crate::manifold::TVector;
    use crate::problem::GradientProblem;
    use crate::test_manifolds::TestEuclideanManifold;
    use crate::types::DVector;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    type Euclid = TestEuclideanManifold;

    struct FixedState {
        x: DVector<f64>,
        x_old: DVector<f64>,
        gradient: Option<TVector<Euclid>>,
        criterion: StoppingCriterion,
    }

    impl SolverOptions<GradientProblem<Euclid>> for FixedState {
        fn initialize(&mut self, _problem: &GradientProblem<Euclid>) -> OptimizerResult<()> {
            Ok(())
        }

        fn step(&mut self, _problem: &GradientProblem<Euclid>, _iteration: usize) -> OptimizerResult<()> {
            Ok(())
        }

        fn iterate(&self) -> &DVector<f64> {
            &self.x
        }

        fn previous_iterate(&self) -> &DVector<f64> {
            &self.x_old
        }

        fn gradient(&self) -> Option<&TVector<Euclid>> {
            self.gradient.as_ref()
        }

        fn stopping_criterion(&self) -> &StoppingCriterion {
            &self.criterion
        }
    }

    fn problem() -> GradientProblem<Euclid> {
        GradientProblem::new(
            Euclid::new(1),
            |x: &DVector<f64>| Ok(x[0] * x[0]),
            |x: &DVector<f64>| Ok(TVector::at(x.clone(), x * 2.0)),
        )
    }

    fn state(x: f64, x_old: f64, gradient: Option<f64>) -> FixedState {
        FixedState {
            x: DVector::from_vec(vec![x]),
            x_old: DVector::from_vec(vec![x_old]),
            gradient: gradient.map(|g| TVector::new(DVector::from_vec(vec![g]))),
            criterion: StoppingCriterion::max_iterations(1),
        }
    }

    #[test]
    fn test_max_iterations() {
        let p = problem();
        let s = state(0.0, 0.0, None);
        let criterion = StoppingCriterion::max_iterations(3);

        assert!(criterion.evaluate(&p, &s, 2).unwrap().is_none());
        let reason = criterion.evaluate(&p, &s, 3).unwrap().unwrap();
        assert_eq!(reason.termination, TerminationReason::MaxIterations);
        assert!(reason.message.contains('3'));
    }

    #[test]
    fn test_change_less_uses_manifold_distance() {
        let p = problem();
        let criterion = StoppingCriterion::change_less(1e-3);

        assert!(criterion.evaluate(&p, &state(1.0, 1.0, None), 0).unwrap().is_none());
        assert!(criterion.evaluate(&p, &state(1.0, 0.0, None), 4).unwrap().is_none());
        let reason = criterion
            .evaluate(&p, &state(1.0, 1.0 + 1e-4, None), 4)
            .unwrap()
            .unwrap();
        assert_eq!(reason.termination, TerminationReason::Converged);
    }

    #[test]
    fn test_gradient_norm_needs_a_gradient() {
        let p = problem();
        let criterion = StoppingCriterion::gradient_norm_less(1e-6);

        assert!(criterion.evaluate(&p, &state(0.0, 0.0, None), 5).unwrap().is_none());
        assert!(criterion.evaluate(&p, &state(0.0, 0.0, Some(1.0)), 5).unwrap().is_none());
        assert!(criterion.evaluate(&p, &state(0.0, 0.0, Some(1e-9)), 0).unwrap().is_none());
        assert!(criterion.evaluate(&p, &state(0.0, 0.0, Some(1e-9)), 5).unwrap().is_some());
    }

    #[test]
    fn test_cost_less() {
        let p = problem();
        let criterion = StoppingCriterion::cost_less(0.5);

        assert!(criterion.evaluate(&p, &state(1.0, 1.0, None), 0).unwrap().is_none());
        let reason = criterion.evaluate(&p, &state(0.5, 1.0, None), 0).unwrap().unwrap();
        assert_eq!(reason.termination, TerminationReason::TargetReached);
    }

    #[test]
    fn test_combinators() {
        let p = problem();
        let any = StoppingCriterion::max_iterations(10).or(StoppingCriterion::change_less(1e-3));
        let all = StoppingCriterion::max_iterations(10).and(StoppingCriterion::change_less(1e-3));
        let settled = state(1.0, 1.0, None);

        assert_eq!(
            any.evaluate(&p, &settled, 2).unwrap().unwrap().termination,
            TerminationReason::Converged
        );
        assert!(all.evaluate(&p, &settled, 2).unwrap().is_none());
        assert!(all.evaluate(&p, &settled, 10).unwrap().is_some());
    }

    #[test]
    fn test_or_flattens() {
        let criterion = StoppingCriterion::max_iterations(1)
            .or(StoppingCriterion::change_less(1.0))
            .or(StoppingCriterion::cost_less(0.0));
        match criterion {
            StoppingCriterion::Any(criteria) => assert_eq!(criteria.len(), 3),
            other => panic!("expected Any, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_combinations_are_rejected() {
        assert!(StoppingCriterion::max_iterations(3)
            .or(StoppingCriterion::change_less(1e-6))
            .validate()
            .is_ok());

        for criterion in [
            StoppingCriterion::Any(Vec::new()),
            StoppingCriterion::All(Vec::new()),
            StoppingCriterion::max_iterations(3).or(StoppingCriterion::All(Vec::new())),
        ] {
            let err = criterion.validate().unwrap_err();
            assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }), "{err}");
        }
    }

    proptest! {
        #[test]
        fn prop_combinations_follow_their_members(
            max in 0usize..20,
            iteration in 0usize..20,
            target in -1.0f64..2.0,
            x in -1.0f64..1.0,
        ) {
            let p = problem();
            let s = state(x, x, None);
            let by_count = StoppingCriterion::max_iterations(max);
            let by_cost = StoppingCriterion::cost_less(target);
            let fires = |c: &StoppingCriterion| c.evaluate(&p, &s, iteration).unwrap().is_some();

            let count_fires = fires(&by_count);
            let cost_fires = fires(&by_cost);
            prop_assert_eq!(fires(&by_count.clone().or(by_cost.clone())), count_fires || cost_fires);
            prop_assert_eq!(fires(&by_count.and(by_cost)), count_fires && cost_fires);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let criterion = StoppingCriterion::max_iterations(200)
            .or(StoppingCriterion::gradient_norm_less(1e-8));
        let json = serde_json::to_string(&criterion).unwrap();
        let back: StoppingCriterion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, criterion);
    }
}
