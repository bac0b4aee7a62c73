//! The generic solver engine.
//!
//! [`solve`] drives any [`SolverOptions`] implementation:
//!
//! 1. `initialize`, then notify observers with [`Iteration::Start`]
//! 2. evaluate the stopping criterion with the number of completed steps
//! 3. if it fired, notify observers with [`Iteration::Stop`] and return
//! 4. otherwise run the next step, notify observers with [`Iteration::Step`]
//!    and continue at 2
//!
//! The options are exclusively borrowed for the whole run; observers and the
//! stopping criterion only ever see shared references.

use crate::{
    error::OptimizerResult,
    manifold::Manifold,
    observer::{Iteration, Observer},
    options::SolverOptions,
    problem::Problem,
    record::RecordRow,
    stopping::{StopReason, TerminationReason},
};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// What [`solve`] reports about a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveSummary {
    /// Number of completed steps
    pub iterations: usize,
    /// Why the run ended
    pub reason: StopReason,
    /// Wall-clock time of the run
    pub duration: Duration,
}

/// Runs `options` on `problem` until its stopping criterion fires.
pub fn solve<P, O>(
    problem: &P,
    options: &mut O,
    observers: &mut [&mut dyn Observer<P, O>],
) -> OptimizerResult<SolveSummary>
where
    P: Problem,
    O: SolverOptions<P>,
{
    let start = Instant::now();
    debug!(
        manifold = problem.manifold().name(),
        observers = observers.len(),
        "starting solver"
    );

    options.stopping_criterion().validate()?;
    options.initialize(problem)?;
    notify(problem, options, observers, &Iteration::Start)?;

    let mut iteration = 0;
    loop {
        if let Some(reason) = options
            .stopping_criterion()
            .evaluate(problem, &*options, iteration)?
        {
            debug!(
                iterations = iteration,
                reason = %reason.message,
                "solver stopped"
            );
            let stop = Iteration::Stop(reason.clone());
            notify(problem, options, observers, &stop)?;
            return Ok(SolveSummary {
                iterations: iteration,
                reason,
                duration: start.elapsed(),
            });
        }

        iteration += 1;
        options.step(problem, iteration)?;
        trace!(iteration, "solver step");
        notify(problem, options, observers, &Iteration::Step(iteration))?;
    }
}

fn notify<P, O>(
    problem: &P,
    options: &O,
    observers: &mut [&mut dyn Observer<P, O>],
    iteration: &Iteration,
) -> OptimizerResult<()>
where
    P: Problem,
    O: SolverOptions<P>,
{
    for observer in observers.iter_mut() {
        observer.observe(problem, options, iteration)?;
    }
    Ok(())
}

/// Result of a high-level optimization call.
pub struct OptimizationResult<M: Manifold> {
    /// The final iterate
    pub point: M::Point,
    /// Cost at the final iterate
    pub value: f64,
    /// Number of completed steps
    pub iterations: usize,
    /// Wall-clock time of the run
    pub duration: Duration,
    /// Category of the stop reason
    pub termination_reason: TerminationReason,
    /// Message of the criterion that fired
    pub stop_reason: String,
    /// Whether a criterion other than the iteration cap fired
    pub converged: bool,
    /// Recorded rows, if recording was requested
    pub trace: Option<Vec<RecordRow<M>>>,
}

impl<M: Manifold> OptimizationResult<M> {
    /// Builds the result from the final iterate and the engine summary.
    pub fn new(point: M::Point, value: f64, summary: SolveSummary) -> Self {
        let termination_reason = summary.reason.termination;
        Self {
            point,
            value,
            iterations: summary.iterations,
            duration: summary.duration,
            termination_reason,
            stop_reason: summary.reason.message,
            converged: termination_reason != TerminationReason::MaxIterations,
            trace: None,
        }
    }

    /// Attaches recorded rows.
    #[must_use]
    pub fn with_trace(mut self, trace: Vec<RecordRow<M>>) -> Self {
        self.trace = Some(trace);
        self
    }
}

impl<M: Manifold> Clone for OptimizationResult<M> {
    fn clone(&self) -> Self {
        Self {
            point: self.point.clone(),
            value: self.value,
            iterations: self.iterations,
            duration: self.duration,
            termination_reason: self.termination_reason,
            stop_reason: self.stop_reason.clone(),
            converged: self.converged,
            trace: self.trace.clone(),
        }
    }
}

impl<M: Manifold> fmt::Debug for OptimizationResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizationResult")
            .field("point", &self.point)
            .field("value", &self.value)
            .field("iterations", &self.iterations)
            .field("duration", &self.duration)
            .field("termination_reason", &self.termination_reason)
            .field("stop_reason", &self.stop_reason)
            .field("converged", &self.converged)
            .field("trace", &self.trace.as_ref().map(Vec::len))
            .finish()
    }
}
