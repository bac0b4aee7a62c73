//! Riemannian gradient descent.
//!
//! Each iteration evaluates the Riemannian gradient, asks the step size
//! policy for a step length and moves along the negative gradient with a
//! retraction:
//!
//! ```text
//! ∇ = grad F(x),  s = stepsize(problem, state, i),  x ← R_x(−s·∇)
//! ```
//!
//! # Step size policies
//!
//! Any [`Stepsize`] can be plugged in. Provided are every
//! [`StepSizeSchedule`] (constant and decreasing sequences) and
//! [`ArmijoBacktracking`], which shrinks a trial step until the cost
//! decreases sufficiently.
//!
//! # Defaults
//!
//! - Step size: Armijo backtracking
//! - Retraction: the exponential map
//! - Stopping: 200 iterations or a gradient norm below `1e-8`

use manifoldopt_core::{
    debug::DebugGroup,
    error::{OptimizerError, OptimizerResult},
    manifold::{Manifold, TVector},
    observer::Observer,
    options::SolverOptions,
    problem::{GradientProblem, Problem},
    record::RecordGroup,
    retraction::{ExponentialRetraction, Retraction},
    solver::{solve, OptimizationResult},
    step_size::StepSizeSchedule,
    stopping::StoppingCriterion,
    types::constants,
};
use std::fmt::{self, Debug};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// A step size policy for gradient descent.
///
/// Called once per iteration after the gradient of the current iterate has
/// been stored in `state`.
pub trait Stepsize<M: Manifold>: Debug + Send + Sync {
    /// Returns the name of the policy.
    fn name(&self) -> &str;

    /// Computes the step length of iteration `iteration` (1-based).
    fn step_size(
        &self,
        problem: &GradientProblem<M>,
        retraction: &dyn Retraction<M>,
        state: &GradientDescentState<M>,
        iteration: usize,
    ) -> OptimizerResult<f64>;
}

impl<M: Manifold> Stepsize<M> for StepSizeSchedule {
    fn name(&self) -> &str {
        match self {
            Self::Constant(_) => "Constant",
            Self::ExponentialDecay { .. } => "ExponentialDecay",
            Self::PolynomialDecay { .. } => "PolynomialDecay",
            Self::SquareRootDecay { .. } => "SquareRootDecay",
            Self::Harmonic { .. } => "Harmonic",
            Self::Custom(_) => "Custom",
        }
    }

    fn step_size(
        &self,
        _problem: &GradientProblem<M>,
        _retraction: &dyn Retraction<M>,
        _state: &GradientDescentState<M>,
        iteration: usize,
    ) -> OptimizerResult<f64> {
        Ok(self.get_step_size(iteration))
    }
}

/// Backtracking line search with the Armijo sufficient decrease condition.
///
/// Starting from `initial_step`, the step `s` is multiplied by `contraction`
/// until
///
/// ```text
/// F(R_x(−s·∇)) ≤ F(x) − sufficient_decrease · s · ‖∇‖²
/// ```
///
/// or `s` falls below `min_step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmijoBacktracking {
    /// First trial step of every search
    pub initial_step: f64,
    /// Factor ρ ∈ (0, 1) applied after a rejected trial
    pub contraction: f64,
    /// Armijo constant c ∈ (0, 1)
    pub sufficient_decrease: f64,
    /// Smallest step tried before giving up
    pub min_step: f64,
}

impl Default for ArmijoBacktracking {
    fn default() -> Self {
        Self {
            initial_step: 1.0,
            contraction: 0.95,
            sufficient_decrease: 0.1,
            min_step: constants::MIN_STEP_SIZE,
        }
    }
}

impl ArmijoBacktracking {
    /// Creates a line search with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first trial step.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Sets the contraction factor.
    #[must_use]
    pub fn with_contraction(mut self, contraction: f64) -> Self {
        self.contraction = contraction;
        self
    }

    /// Sets the sufficient decrease constant.
    #[must_use]
    pub fn with_sufficient_decrease(mut self, c: f64) -> Self {
        self.sufficient_decrease = c;
        self
    }

    /// Sets the smallest step tried before the search gives up.
    #[must_use]
    pub fn with_min_step(mut self, step: f64) -> Self {
        self.min_step = step;
        self
    }

    /// Checks that all parameters are in range.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.initial_step <= 0.0 {
            return Err(OptimizerError::invalid_configuration(
                "initial step must be positive",
                "initial_step",
                self.initial_step.to_string(),
            ));
        }
        if self.contraction <= 0.0 || self.contraction >= 1.0 {
            return Err(OptimizerError::invalid_configuration(
                "contraction must be in (0, 1)",
                "contraction",
                self.contraction.to_string(),
            ));
        }
        if self.sufficient_decrease <= 0.0 || self.sufficient_decrease >= 1.0 {
            return Err(OptimizerError::invalid_configuration(
                "sufficient decrease must be in (0, 1)",
                "sufficient_decrease",
                self.sufficient_decrease.to_string(),
            ));
        }
        if !(self.min_step > 0.0 && self.min_step.is_finite()) {
            return Err(OptimizerError::invalid_configuration(
                "minimal step must be positive and finite",
                "min_step",
                self.min_step.to_string(),
            ));
        }
        Ok(())
    }
}

impl<M: Manifold> Stepsize<M> for ArmijoBacktracking {
    fn name(&self) -> &str {
        "Armijo"
    }

    fn step_size(
        &self,
        problem: &GradientProblem<M>,
        retraction: &dyn Retraction<M>,
        state: &GradientDescentState<M>,
        iteration: usize,
    ) -> OptimizerResult<f64> {
        self.validate()?;
        let Some(gradient) = state.gradient() else {
            return Ok(self.initial_step);
        };

        let manifold = problem.manifold();
        let x = state.iterate();
        let f0 = problem.cost(x)?;
        let slope = self.sufficient_decrease * manifold.norm(x, gradient)?.powi(2);

        let mut step = self.initial_step;
        loop {
            let trial = retraction.retract(manifold, x, gradient, -step)?;
            if problem.cost(&trial)? <= f0 - step * slope {
                trace!(iteration, step, "armijo step accepted");
                return Ok(step);
            }
            if step < self.min_step {
                warn!(iteration, step, "armijo backtracking reached the minimal step size");
                return Ok(step);
            }
            step *= self.contraction;
        }
    }
}

/// Iterate, previous iterate, gradient and step of a gradient descent run.
pub struct GradientDescentState<M: Manifold> {
    x: M::Point,
    x_old: M::Point,
    gradient: Option<TVector<M>>,
    step_size: Option<f64>,
}

impl<M: Manifold> GradientDescentState<M> {
    /// Creates the state of a run starting at `x0`.
    pub fn new(x0: M::Point) -> Self {
        Self {
            x_old: x0.clone(),
            x: x0,
            gradient: None,
            step_size: None,
        }
    }

    /// The current iterate.
    pub fn iterate(&self) -> &M::Point {
        &self.x
    }

    /// The iterate before the last step.
    pub fn previous_iterate(&self) -> &M::Point {
        &self.x_old
    }

    /// The gradient at the current iterate, once evaluated.
    pub fn gradient(&self) -> Option<&TVector<M>> {
        self.gradient.as_ref()
    }

    /// The step length of the last step.
    pub fn step_size(&self) -> Option<f64> {
        self.step_size
    }
}

impl<M: Manifold> Clone for GradientDescentState<M> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            x_old: self.x_old.clone(),
            gradient: self.gradient.clone(),
            step_size: self.step_size,
        }
    }
}

impl<M: Manifold> Debug for GradientDescentState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientDescentState")
            .field("x", &self.x)
            .field("x_old", &self.x_old)
            .field("gradient", &self.gradient)
            .field("step_size", &self.step_size)
            .finish()
    }
}

/// Configuration for gradient descent.
pub struct GradientDescentConfig<M: Manifold> {
    /// Criterion ending the run
    pub stopping_criterion: StoppingCriterion,

    /// Step size policy
    pub stepsize: Arc<dyn Stepsize<M>>,

    /// Retraction used to move along the negative gradient
    pub retraction: Arc<dyn Retraction<M>>,
}

impl<M: Manifold> Default for GradientDescentConfig<M> {
    fn default() -> Self {
        Self {
            stopping_criterion: StoppingCriterion::max_iterations(
                constants::GRADIENT_DESCENT_MAX_ITERATIONS,
            )
            .or(StoppingCriterion::gradient_norm_less(constants::GRADIENT_TOLERANCE)),
            stepsize: Arc::new(ArmijoBacktracking::default()),
            retraction: Arc::new(ExponentialRetraction),
        }
    }
}

impl<M: Manifold> GradientDescentConfig<M> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stopping criterion.
    #[must_use]
    pub fn with_stopping_criterion(mut self, criterion: StoppingCriterion) -> Self {
        self.stopping_criterion = criterion;
        self
    }

    /// Sets the step size policy.
    #[must_use]
    pub fn with_stepsize<S>(mut self, stepsize: S) -> Self
    where
        S: Stepsize<M> + 'static,
    {
        self.stepsize = Arc::new(stepsize);
        self
    }

    /// Sets a constant step size.
    #[must_use]
    pub fn with_constant_step_size(self, step_size: f64) -> Self {
        self.with_stepsize(StepSizeSchedule::constant(step_size))
    }

    /// Sets the retraction.
    #[must_use]
    pub fn with_retraction<R>(mut self, retraction: R) -> Self
    where
        R: Retraction<M> + 'static,
    {
        self.retraction = Arc::new(retraction);
        self
    }
}

impl<M: Manifold> Clone for GradientDescentConfig<M> {
    fn clone(&self) -> Self {
        Self {
            stopping_criterion: self.stopping_criterion.clone(),
            stepsize: Arc::clone(&self.stepsize),
            retraction: Arc::clone(&self.retraction),
        }
    }
}

impl<M: Manifold> Debug for GradientDescentConfig<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientDescentConfig")
            .field("stopping_criterion", &self.stopping_criterion)
            .field("stepsize", &self.stepsize)
            .field("retraction", &self.retraction)
            .finish()
    }
}

/// Mutable state of a gradient descent run together with its policies.
pub struct GradientDescentOptions<M: Manifold> {
    state: GradientDescentState<M>,
    stepsize: Arc<dyn Stepsize<M>>,
    retraction: Arc<dyn Retraction<M>>,
    stopping_criterion: StoppingCriterion,
}

impl<M: Manifold> GradientDescentOptions<M> {
    /// Creates the options of a run starting at `x0`.
    pub fn new(x0: M::Point, config: &GradientDescentConfig<M>) -> Self {
        Self {
            state: GradientDescentState::new(x0),
            stepsize: Arc::clone(&config.stepsize),
            retraction: Arc::clone(&config.retraction),
            stopping_criterion: config.stopping_criterion.clone(),
        }
    }

    /// The iterate, gradient and step size.
    pub fn state(&self) -> &GradientDescentState<M> {
        &self.state
    }

    /// Consumes the options and returns the current iterate.
    pub fn into_iterate(self) -> M::Point {
        self.state.x
    }
}

impl<M: Manifold> SolverOptions<GradientProblem<M>> for GradientDescentOptions<M> {
    fn initialize(&mut self, _problem: &GradientProblem<M>) -> OptimizerResult<()> {
        self.state.x_old = self.state.x.clone();
        self.state.gradient = None;
        self.state.step_size = None;
        Ok(())
    }

    fn step(&mut self, problem: &GradientProblem<M>, iteration: usize) -> OptimizerResult<()> {
        let gradient = problem.gradient(&self.state.x)?;
        self.state.gradient = Some(gradient.clone());
        let step = self
            .stepsize
            .step_size(problem, &*self.retraction, &self.state, iteration)?;

        let next = self
            .retraction
            .retract(problem.manifold(), &self.state.x, &gradient, -step)?;
        self.state.x_old = std::mem::replace(&mut self.state.x, next);
        self.state.step_size = Some(step);
        Ok(())
    }

    fn iterate(&self) -> &M::Point {
        &self.state.x
    }

    fn previous_iterate(&self) -> &M::Point {
        &self.state.x_old
    }

    fn gradient(&self) -> Option<&TVector<M>> {
        self.state.gradient.as_ref()
    }

    fn step_size(&self) -> Option<f64> {
        self.state.step_size
    }

    fn stopping_criterion(&self) -> &StoppingCriterion {
        &self.stopping_criterion
    }
}

impl<M: Manifold> Debug for GradientDescentOptions<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientDescentOptions")
            .field("state", &self.state)
            .field("stepsize", &self.stepsize)
            .field("retraction", &self.retraction)
            .field("stopping_criterion", &self.stopping_criterion)
            .finish()
    }
}

/// Debug observer of a gradient descent run.
pub type GradientDescentDebug<M> = DebugGroup<GradientProblem<M>, GradientDescentOptions<M>>;

/// Record observer of a gradient descent run.
pub type GradientDescentRecord<M> = RecordGroup<GradientProblem<M>, GradientDescentOptions<M>>;

/// Riemannian gradient descent solver.
///
/// # Examples
///
/// ```rust
/// use manifoldopt_core::{manifold::{Manifold, TVector}, problem::GradientProblem};
/// use manifoldopt_manifolds::{Circle, S1Point};
/// use manifoldopt_optim::{GradientDescent, GradientDescentConfig};
///
/// // F(x) = ½ d(x, 1)², grad F(x) = −log_x(1)
/// let circle = Circle::new();
/// let problem = GradientProblem::new(
///     circle,
///     move |x: &S1Point| Ok(0.5 * circle.distance(x, &S1Point(1.0))?.powi(2)),
///     move |x: &S1Point| Ok(TVector::at(*x, -*circle.log(x, &S1Point(1.0))?.value())),
/// );
///
/// let mut gd = GradientDescent::new(GradientDescentConfig::new());
/// let result = gd.optimize(&problem, &S1Point(0.0)).unwrap();
/// assert!((result.point.0 - 1.0).abs() < 1e-6);
/// ```
pub struct GradientDescent<M: Manifold> {
    config: GradientDescentConfig<M>,
    debug: Option<GradientDescentDebug<M>>,
    record: Option<GradientDescentRecord<M>>,
}

impl<M: Manifold> GradientDescent<M> {
    /// Creates a new solver with the given configuration.
    pub fn new(config: GradientDescentConfig<M>) -> Self {
        Self {
            config,
            debug: None,
            record: None,
        }
    }

    /// Attaches a debug observer.
    #[must_use]
    pub fn with_debug(mut self, debug: GradientDescentDebug<M>) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Attaches a record observer; its rows become the result's trace.
    #[must_use]
    pub fn with_record(mut self, record: GradientDescentRecord<M>) -> Self {
        self.record = Some(record);
        self
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &GradientDescentConfig<M> {
        &self.config
    }

    /// The record observer, holding the values of the last run.
    pub fn record(&self) -> Option<&GradientDescentRecord<M>> {
        self.record.as_ref()
    }

    /// Returns the solver name.
    pub fn name(&self) -> &str {
        "Riemannian Gradient Descent"
    }

    /// Runs the algorithm from `x0`.
    pub fn optimize(
        &mut self,
        problem: &GradientProblem<M>,
        x0: &M::Point,
    ) -> OptimizerResult<OptimizationResult<M>> {
        let mut options = GradientDescentOptions::new(x0.clone(), &self.config);
        debug!(
            manifold = problem.manifold().name(),
            stepsize = self.config.stepsize.name(),
            retraction = self.config.retraction.name(),
            "running gradient descent"
        );

        let mut observers: Vec<&mut dyn Observer<GradientProblem<M>, GradientDescentOptions<M>>> =
            Vec::new();
        if let Some(debug) = self.debug.as_mut() {
            observers.push(debug);
        }
        if let Some(record) = self.record.as_mut() {
            observers.push(record);
        }

        let summary = solve(problem, &mut options, &mut observers)?;
        info!(
            iterations = summary.iterations,
            reason = %summary.reason.message,
            "gradient descent finished"
        );

        let value = problem.cost(options.iterate())?;
        let result = OptimizationResult::new(options.into_iterate(), value, summary);
        Ok(match &self.record {
            Some(record) => result.with_trace(record.trace()),
            None => result,
        })
    }
}

impl<M: Manifold> Debug for GradientDescent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientDescent")
            .field("config", &self.config)
            .field("debug", &self.debug)
            .field("record", &self.record)
            .finish()
    }
}
