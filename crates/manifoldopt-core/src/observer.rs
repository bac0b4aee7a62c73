//! Hooks invoked by the solver engine.
//!
//! Observers see the problem and the solver state once before the first
//! step, after every step and once after the stopping criterion fired. They
//! get shared references only and cannot alter the run.

use crate::{
    error::Result,
    options::SolverOptions,
    problem::Problem,
    stopping::StopReason,
};

/// The point of a run an observer is called at.
#[derive(Debug, Clone, PartialEq)]
pub enum Iteration {
    /// Before the first step.
    Start,
    /// After the given (1-based) step.
    Step(usize),
    /// After the stopping criterion fired.
    Stop(StopReason),
}

impl Iteration {
    /// The step number, if this is a step.
    pub fn step(&self) -> Option<usize> {
        match self {
            Self::Step(i) => Some(*i),
            _ => None,
        }
    }

    /// The stop reason, if the run is over.
    pub fn stop_reason(&self) -> Option<&StopReason> {
        match self {
            Self::Stop(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Observes a run of a solver on problems `P` with state `O`.
pub trait Observer<P: Problem, O: SolverOptions<P>> {
    /// Called by the engine at `iteration`.
    fn observe(&mut self, problem: &P, options: &O, iteration: &Iteration) -> Result<()>;
}
