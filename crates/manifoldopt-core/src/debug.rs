//! Debug output observers.
//!
//! A [`DebugGroup`] holds a list of [`DebugAction`]s. At every observed
//! iteration each action renders one fragment, the fragments are joined with
//! a divider and the resulting line is handed to a sink. The default sink
//! emits the line as a `tracing` event on the `manifoldopt::debug` target.
//!
//! ```rust,ignore
//! let debug = DebugGroup::new()
//!     .with_action(DebugIteration)
//!     .with_action(DebugCost)
//!     .with_action(DebugChange)
//!     .with_action(DebugStoppingCriterion)
//!     .every(10);
//! ```

use crate::{
    error::Result,
    manifold::Manifold,
    observer::{Iteration, Observer},
    options::SolverOptions,
    problem::Problem,
};
use std::fmt;

/// Renders one fragment of a debug line.
pub trait DebugAction<P: Problem, O: SolverOptions<P>>: Send {
    /// Returns the fragment for `iteration`, or `None` to print nothing.
    fn format(&self, problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>>;
}

/// Prints `Initial` before the first step and `# i` after step i.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugIteration;

/// Prints the cost at the current iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugCost;

/// Prints the current iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugIterate;

/// Prints the distance between the previous and the current iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugChange;

/// Prints the last gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugGradient;

/// Prints the norm of the last gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugGradientNorm;

/// Prints the last step size.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugStepsize;

/// Prints the stop reason once the run is over.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugStoppingCriterion;

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugIteration {
    fn format(&self, _problem: &P, _options: &O, iteration: &Iteration) -> Result<Option<String>> {
        Ok(match iteration {
            Iteration::Start => Some("Initial".to_string()),
            Iteration::Step(i) => Some(format!("# {i}")),
            Iteration::Stop(_) => None,
        })
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugCost {
    fn format(&self, problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        if matches!(iteration, Iteration::Stop(_)) {
            return Ok(None);
        }
        let cost = problem.cost(options.iterate())?;
        Ok(Some(format!("F(x): {cost:.6}")))
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugIterate {
    fn format(&self, _problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        if matches!(iteration, Iteration::Stop(_)) {
            return Ok(None);
        }
        Ok(Some(format!("x: {:?}", options.iterate())))
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugChange {
    fn format(&self, problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        if iteration.step().is_none() {
            return Ok(None);
        }
        let change = problem
            .manifold()
            .distance(options.previous_iterate(), options.iterate())?;
        Ok(Some(format!("Last Change: {change:.6}")))
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugGradient {
    fn format(&self, _problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        if iteration.step().is_none() {
            return Ok(None);
        }
        Ok(options
            .gradient()
            .map(|gradient| format!("∇F(x): {:?}", gradient.value())))
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugGradientNorm {
    fn format(&self, problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        let Some(gradient) = options.gradient().filter(|_| iteration.step().is_some()) else {
            return Ok(None);
        };
        let base = gradient.base().unwrap_or_else(|| options.iterate());
        let norm = problem.manifold().norm(base, gradient)?;
        Ok(Some(format!("|∇F(x)|: {norm:.6}")))
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugStepsize {
    fn format(&self, _problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        if iteration.step().is_none() {
            return Ok(None);
        }
        Ok(options.step_size().map(|s| format!("s: {s:.6}")))
    }
}

impl<P: Problem, O: SolverOptions<P>> DebugAction<P, O> for DebugStoppingCriterion {
    fn format(&self, _problem: &P, _options: &O, iteration: &Iteration) -> Result<Option<String>> {
        Ok(iteration.stop_reason().map(|reason| reason.message.clone()))
    }
}

/// Destination of rendered debug lines.
pub type DebugSink = Box<dyn FnMut(&str) + Send>;

fn tracing_sink(line: &str) {
    tracing::info!(target: "manifoldopt::debug", "{line}");
}

/// An observer printing a line per observed iteration.
pub struct DebugGroup<P: Problem, O: SolverOptions<P>> {
    actions: Vec<Box<dyn DebugAction<P, O>>>,
    divider: String,
    every: usize,
    sink: DebugSink,
}

impl<P: Problem, O: SolverOptions<P>> DebugGroup<P, O> {
    /// Creates an empty group writing to `tracing`.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            divider: " | ".to_string(),
            every: 1,
            sink: Box::new(tracing_sink),
        }
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action<A>(mut self, action: A) -> Self
    where
        A: DebugAction<P, O> + 'static,
    {
        self.actions.push(Box::new(action));
        self
    }

    /// Sets the text placed between fragments.
    #[must_use]
    pub fn with_divider(mut self, divider: impl Into<String>) -> Self {
        self.divider = divider.into();
        self
    }

    /// Prints only every `k`-th step. Start and stop lines are always printed.
    #[must_use]
    pub fn every(mut self, k: usize) -> Self {
        self.every = k.max(1);
        self
    }

    /// Sends lines to `sink` instead of `tracing`.
    #[must_use]
    pub fn with_sink<F>(mut self, sink: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.sink = Box::new(sink);
        self
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the group has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Renders the line for `iteration` without emitting it.
    pub fn render(&self, problem: &P, options: &O, iteration: &Iteration) -> Result<Option<String>> {
        let mut fragments = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            if let Some(fragment) = action.format(problem, options, iteration)? {
                fragments.push(fragment);
            }
        }
        Ok((!fragments.is_empty()).then(|| fragments.join(&self.divider)))
    }
}

impl<P: Problem, O: SolverOptions<P>> Default for DebugGroup<P, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Problem, O: SolverOptions<P>> Observer<P, O> for DebugGroup<P, O> {
    fn observe(&mut self, problem: &P, options: &O, iteration: &Iteration) -> Result<()> {
        if iteration.step().is_some_and(|i| i % self.every != 0) {
            return Ok(());
        }
        if let Some(line) = self.render(problem, options, iteration)? {
            (self.sink)(&line);
        }
        Ok(())
    }
}

impl<P: Problem, O: SolverOptions<P>> fmt::Debug for DebugGroup<P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugGroup")
            .field("actions", &self.actions.len())
            .field("divider", &self.divider)
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}
