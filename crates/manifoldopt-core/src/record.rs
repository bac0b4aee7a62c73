//! Recording observers.
//!
//! A [`RecordGroup`] holds a list of [`RecordAction`]s, each with its own
//! ordered sequence of recorded values. The sequences are cleared when a run
//! starts and extended after every observed step, so after the run the group
//! holds one value per action and recorded step. The rows of that table form
//! the trace returned to the caller.

use crate::{
    error::Result,
    manifold::{Manifold, TVector},
    observer::{Iteration, Observer},
    options::SolverOptions,
    problem::Problem,
};
use std::fmt;

/// A single recorded value.
pub enum RecordValue<M: Manifold> {
    /// An iteration number
    Iteration(usize),
    /// A real number such as a cost or a norm
    Scalar(f64),
    /// A point on the manifold
    Point(M::Point),
    /// A tangent vector
    Tangent(TVector<M>),
    /// The quantity is not available for this solver
    Missing,
}

impl<M: Manifold> RecordValue<M> {
    /// The iteration number, if this is one.
    pub fn as_iteration(&self) -> Option<usize> {
        match self {
            Self::Iteration(i) => Some(*i),
            _ => None,
        }
    }

    /// The real number, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The point, if this is one.
    pub fn as_point(&self) -> Option<&M::Point> {
        match self {
            Self::Point(x) => Some(x),
            _ => None,
        }
    }

    /// The tangent vector, if this is one.
    pub fn as_tangent(&self) -> Option<&TVector<M>> {
        match self {
            Self::Tangent(xi) => Some(xi),
            _ => None,
        }
    }
}

impl<M: Manifold> Clone for RecordValue<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Iteration(i) => Self::Iteration(*i),
            Self::Scalar(v) => Self::Scalar(*v),
            Self::Point(x) => Self::Point(x.clone()),
            Self::Tangent(xi) => Self::Tangent(xi.clone()),
            Self::Missing => Self::Missing,
        }
    }
}

impl<M: Manifold> PartialEq for RecordValue<M> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Iteration(a), Self::Iteration(b)) => a == b,
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Point(a), Self::Point(b)) => a == b,
            (Self::Tangent(a), Self::Tangent(b)) => a == b,
            (Self::Missing, Self::Missing) => true,
            _ => false,
        }
    }
}

impl<M: Manifold> fmt::Debug for RecordValue<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iteration(i) => f.debug_tuple("Iteration").field(i).finish(),
            Self::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            Self::Point(x) => f.debug_tuple("Point").field(x).finish(),
            Self::Tangent(xi) => f.debug_tuple("Tangent").field(xi).finish(),
            Self::Missing => f.write_str("Missing"),
        }
    }
}

/// One recorded quantity per iteration.
pub trait RecordAction<P: Problem, O: SolverOptions<P>>: Send {
    /// Short name of the quantity, e.g. `"Cost"`.
    fn name(&self) -> &str;

    /// Extracts the value after step `iteration`.
    fn record(&self, problem: &P, options: &O, iteration: usize) -> Result<RecordValue<P::Manifold>>;
}

/// Records the iteration number.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordIteration;

/// Records the cost at the current iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCost;

/// Records the current iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordIterate;

/// Records the distance between the previous and the current iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordChange;

/// Records the last gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordGradient;

/// Records the norm of the last gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordGradientNorm;

/// Records the last step size.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStepsize;

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordIteration {
    fn name(&self) -> &str {
        "Iteration"
    }

    fn record(&self, _problem: &P, _options: &O, iteration: usize) -> Result<RecordValue<P::Manifold>> {
        Ok(RecordValue::Iteration(iteration))
    }
}

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordCost {
    fn name(&self) -> &str {
        "Cost"
    }

    fn record(&self, problem: &P, options: &O, _iteration: usize) -> Result<RecordValue<P::Manifold>> {
        problem.cost(options.iterate()).map(RecordValue::Scalar)
    }
}

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordIterate {
    fn name(&self) -> &str {
        "Iterate"
    }

    fn record(&self, _problem: &P, options: &O, _iteration: usize) -> Result<RecordValue<P::Manifold>> {
        Ok(RecordValue::Point(options.iterate().clone()))
    }
}

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordChange {
    fn name(&self) -> &str {
        "Change"
    }

    fn record(&self, problem: &P, options: &O, _iteration: usize) -> Result<RecordValue<P::Manifold>> {
        problem
            .manifold()
            .distance(options.previous_iterate(), options.iterate())
            .map(RecordValue::Scalar)
    }
}

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordGradient {
    fn name(&self) -> &str {
        "Gradient"
    }

    fn record(&self, _problem: &P, options: &O, _iteration: usize) -> Result<RecordValue<P::Manifold>> {
        Ok(options
            .gradient()
            .map_or(RecordValue::Missing, |gradient| RecordValue::Tangent(gradient.clone())))
    }
}

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordGradientNorm {
    fn name(&self) -> &str {
        "GradientNorm"
    }

    fn record(&self, problem: &P, options: &O, _iteration: usize) -> Result<RecordValue<P::Manifold>> {
        let Some(gradient) = options.gradient() else {
            return Ok(RecordValue::Missing);
        };
        let base = gradient.base().unwrap_or_else(|| options.iterate());
        problem.manifold().norm(base, gradient).map(RecordValue::Scalar)
    }
}

impl<P: Problem, O: SolverOptions<P>> RecordAction<P, O> for RecordStepsize {
    fn name(&self) -> &str {
        "Stepsize"
    }

    fn record(&self, _problem: &P, options: &O, _iteration: usize) -> Result<RecordValue<P::Manifold>> {
        Ok(options
            .step_size()
            .map_or(RecordValue::Missing, RecordValue::Scalar))
    }
}

/// A recorded row: one value per action of a [`RecordGroup`].
pub type RecordRow<M> = Vec<RecordValue<M>>;

/// An observer recording a table of values, one row per recorded step.
pub struct RecordGroup<P: Problem, O: SolverOptions<P>> {
    actions: Vec<Box<dyn RecordAction<P, O>>>,
    recorded: Vec<Vec<RecordValue<P::Manifold>>>,
    every: usize,
}

impl<P: Problem, O: SolverOptions<P>> RecordGroup<P, O> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            recorded: Vec::new(),
            every: 1,
        }
    }

    /// Appends an action.
    ///
    /// Values recorded so far are discarded, so every column covers the same
    /// steps.
    #[must_use]
    pub fn with_action<A>(mut self, action: A) -> Self
    where
        A: RecordAction<P, O> + 'static,
    {
        self.actions.push(Box::new(action));
        for column in &mut self.recorded {
            column.clear();
        }
        self.recorded.push(Vec::new());
        self
    }

    /// Records only every `k`-th step.
    #[must_use]
    pub fn every(mut self, k: usize) -> Self {
        self.every = k.max(1);
        self
    }

    /// Names of the actions, in column order.
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|action| action.name()).collect()
    }

    /// The sequence recorded by the `index`-th action.
    pub fn recorded(&self, index: usize) -> Option<&[RecordValue<P::Manifold>]> {
        self.recorded.get(index).map(Vec::as_slice)
    }

    /// The sequence recorded by the first action called `name`.
    pub fn recorded_by_name(&self, name: &str) -> Option<&[RecordValue<P::Manifold>]> {
        let index = self.actions.iter().position(|action| action.name() == name)?;
        self.recorded(index)
    }

    /// Number of recorded rows.
    pub fn len(&self) -> usize {
        self.recorded.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The recorded table as rows.
    pub fn trace(&self) -> Vec<RecordRow<P::Manifold>> {
        (0..self.len())
            .map(|row| {
                self.recorded
                    .iter()
                    .map(|column| column.get(row).cloned().unwrap_or(RecordValue::Missing))
                    .collect()
            })
            .collect()
    }
}

impl<P: Problem, O: SolverOptions<P>> Default for RecordGroup<P, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Problem, O: SolverOptions<P>> Observer<P, O> for RecordGroup<P, O> {
    fn observe(&mut self, problem: &P, options: &O, iteration: &Iteration) -> Result<()> {
        match iteration {
            Iteration::Start => {
                for column in &mut self.recorded {
                    column.clear();
                }
            }
            Iteration::Step(i) if i % self.every == 0 => {
                for (action, column) in self.actions.iter().zip(self.recorded.iter_mut()) {
                    column.push(action.record(problem, options, *i)?);
                }
            }
            Iteration::Step(_) | Iteration::Stop(_) => {}
        }
        Ok(())
    }
}

impl<P: Problem, O: SolverOptions<P>> fmt::Debug for RecordGroup<P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordGroup")
            .field("actions", &self.names())
            .field("rows", &self.len())
            .field("every", &self.every)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::GradientProblem;
    use crate::stopping::StoppingCriterion;
    use crate::test_manifolds::{quadratic_problem, TestDescentOptions, TestEuclideanManifold};
    use crate::types::DVector;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    type Group = RecordGroup<GradientProblem<TestEuclideanManifold>, TestDescentOptions>;

    fn run(group: &mut Group, steps: usize) {
        let problem = quadratic_problem(1);
        let mut options = TestDescentOptions::new(
            DVector::from_vec(vec![1.0]),
            0.25,
            StoppingCriterion::max_iterations(steps),
        );
        options.initialize(&problem).unwrap();
        group.observe(&problem, &options, &Iteration::Start).unwrap();
        for i in 1..=steps {
            options.step(&problem, i).unwrap();
            group.observe(&problem, &options, &Iteration::Step(i)).unwrap();
        }
    }

    #[test]
    fn test_records_one_row_per_step() {
        let mut group = Group::new()
            .with_action(RecordIteration)
            .with_action(RecordCost)
            .with_action(RecordStepsize);
        run(&mut group, 3);

        assert_eq!(group.len(), 3);
        assert_eq!(group.names(), vec!["Iteration", "Cost", "Stepsize"]);

        let trace = group.trace();
        assert_eq!(trace[2][0].as_iteration(), Some(3));
        // x halves every step, so the cost is divided by four
        assert_relative_eq!(trace[0][1].as_scalar().unwrap(), 0.25);
        assert_relative_eq!(trace[2][1].as_scalar().unwrap(), 0.25f64.powi(3));
        assert_eq!(trace[1][2], RecordValue::Scalar(0.25));
    }

    #[test]
    fn test_start_resets_records() {
        let mut group = Group::new().with_action(RecordIterate);
        run(&mut group, 4);
        assert_eq!(group.len(), 4);

        run(&mut group, 2);
        assert_eq!(group.len(), 2);
        let iterates = group.recorded_by_name("Iterate").unwrap();
        assert_eq!(iterates[1].as_point(), Some(&DVector::from_vec(vec![0.25])));
    }

    #[test]
    fn test_every_and_gradient_records() {
        let mut group = Group::new()
            .with_action(RecordIteration)
            .with_action(RecordGradientNorm)
            .with_action(RecordChange)
            .every(2);
        run(&mut group, 5);

        let iterations: Vec<_> = group
            .recorded(0)
            .unwrap()
            .iter()
            .filter_map(RecordValue::as_iteration)
            .collect();
        assert_eq!(iterations, vec![2, 4]);

        // gradient at x = 0.5 is 1.0; the step then moves by 0.25
        let row = &group.trace()[0];
        assert_relative_eq!(row[1].as_scalar().unwrap(), 1.0);
        assert_relative_eq!(row[2].as_scalar().unwrap(), 0.25);
    }

    #[test]
    fn test_record_value_accessors() {
        let value: RecordValue<TestEuclideanManifold> = RecordValue::Missing;
        assert!(value.as_scalar().is_none());
        assert!(value.as_point().is_none());
        assert_eq!(value.clone(), RecordValue::Missing);
        assert_eq!(format!("{value:?}"), "Missing");
    }

    #[test]
    fn test_adding_an_action_after_a_run_keeps_rows_aligned() {
        let mut group = Group::new().with_action(RecordIteration);
        run(&mut group, 2);
        assert_eq!(group.len(), 2);

        let mut group = group.with_action(RecordCost);
        assert!(group.is_empty());
        assert!(group.trace().is_empty());

        run(&mut group, 2);
        let trace = group.trace();
        assert_eq!(trace.len(), 2);
        assert!(trace.iter().all(|row| row.len() == 2));
        assert_eq!(trace[1][0], RecordValue::Iteration(2));
        assert_relative_eq!(trace[1][1].as_scalar().unwrap(), 0.0625);
    }
}
