//! Cyclic proximal point algorithm (CPPA).
//!
//! Minimizes a cost `F = Σₖ fₖ` on a manifold given the proximal maps of the
//! individual terms. Every iteration performs one sweep over the maps,
//! feeding the output of each map into the next one (a Gauss-Seidel sweep):
//!
//! ```text
//! x ← prox_{λᵢ f_{σ(1)}}(x), ..., x ← prox_{λᵢ f_{σ(m)}}(x)
//! ```
//!
//! where σ is the current [`EvaluationOrder`] and λᵢ a decreasing parameter
//! sequence. The default sequence is `λᵢ = typical_distance(M) / i`, which
//! is square-summable but not summable.
//!
//! # Defaults
//!
//! - Evaluation order: [`EvaluationOrder::Linear`]
//! - λ sequence: [`StepSizeSchedule::Harmonic`] scaled by the manifold's
//!   typical distance
//! - Stopping: 5000 iterations or an iterate change below `1e-8`

use crate::evaluation_order::EvaluationOrder;
use manifoldopt_core::{
    debug::DebugGroup,
    error::{OptimizerError, OptimizerResult},
    manifold::Manifold,
    observer::Observer,
    options::SolverOptions,
    problem::{Problem, ProximalProblem},
    record::RecordGroup,
    solver::{solve, OptimizationResult},
    step_size::StepSizeSchedule,
    stopping::StoppingCriterion,
    types::constants,
};
use rand::{rngs::StdRng, SeedableRng};
use std::fmt;
use tracing::{debug, info};

/// Configuration for the cyclic proximal point algorithm.
#[derive(Debug, Clone)]
pub struct CyclicProximalPointConfig {
    /// Order of the proximal maps within a sweep
    pub evaluation_order: EvaluationOrder,

    /// Criterion ending the run
    pub stopping_criterion: StoppingCriterion,

    /// λ sequence (None = typical distance / i)
    pub lambda: Option<StepSizeSchedule>,

    /// Seed of the generator used by random evaluation orders (None = entropy)
    pub seed: Option<u64>,
}

impl Default for CyclicProximalPointConfig {
    fn default() -> Self {
        Self {
            evaluation_order: EvaluationOrder::Linear,
            stopping_criterion: StoppingCriterion::max_iterations(constants::CPPA_MAX_ITERATIONS)
                .or(StoppingCriterion::change_less(constants::CPPA_CHANGE_TOLERANCE)),
            lambda: None,
            seed: None,
        }
    }
}

impl CyclicProximalPointConfig {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the evaluation order.
    #[must_use]
    pub fn with_evaluation_order(mut self, order: EvaluationOrder) -> Self {
        self.evaluation_order = order;
        self
    }

    /// Sets the stopping criterion.
    #[must_use]
    pub fn with_stopping_criterion(mut self, criterion: StoppingCriterion) -> Self {
        self.stopping_criterion = criterion;
        self
    }

    /// Sets the λ sequence.
    #[must_use]
    pub fn with_lambda(mut self, lambda: StepSizeSchedule) -> Self {
        self.lambda = Some(lambda);
        self
    }

    /// Sets the λ sequence from a closure of the (1-based) iteration.
    #[must_use]
    pub fn with_lambda_fn<F>(self, f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        self.with_lambda(StepSizeSchedule::custom(f))
    }

    /// Seeds the generator of the random evaluation orders.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The λ sequence for a manifold with the given typical distance.
    pub fn lambda_for(&self, typical_distance: f64) -> StepSizeSchedule {
        self.lambda
            .clone()
            .unwrap_or_else(|| StepSizeSchedule::harmonic(typical_distance))
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Mutable state of a CPPA run.
pub struct CyclicProximalPointOptions<M: Manifold> {
    x: M::Point,
    x_old: M::Point,
    lambda: StepSizeSchedule,
    current_lambda: Option<f64>,
    evaluation_order: EvaluationOrder,
    order: Vec<usize>,
    stopping_criterion: StoppingCriterion,
    rng: StdRng,
}

impl<M: Manifold> CyclicProximalPointOptions<M> {
    /// Creates the state for a run starting at `x0`.
    pub fn new(
        x0: M::Point,
        lambda: StepSizeSchedule,
        evaluation_order: EvaluationOrder,
        stopping_criterion: StoppingCriterion,
        rng: StdRng,
    ) -> Self {
        Self {
            x_old: x0.clone(),
            x: x0,
            lambda,
            current_lambda: None,
            evaluation_order,
            order: Vec::new(),
            stopping_criterion,
            rng,
        }
    }

    /// Order of the next sweep (1-based map indices).
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The evaluation order policy.
    pub fn evaluation_order(&self) -> EvaluationOrder {
        self.evaluation_order
    }

    /// λ of the last sweep.
    pub fn lambda(&self) -> Option<f64> {
        self.current_lambda
    }

    /// Consumes the state and returns the current iterate.
    pub fn into_iterate(self) -> M::Point {
        self.x
    }
}

impl<M: Manifold> SolverOptions<ProximalProblem<M>> for CyclicProximalPointOptions<M> {
    fn initialize(&mut self, problem: &ProximalProblem<M>) -> OptimizerResult<()> {
        let count = problem.num_proximal_maps();
        if count == 0 {
            return Err(OptimizerError::invalid_configuration(
                "the problem has no proximal maps",
                "proximal_maps",
                "0",
            ));
        }

        self.x_old = self.x.clone();
        self.current_lambda = None;
        self.order = self
            .evaluation_order
            .update_order(count, 0, &[], &mut self.rng);
        Ok(())
    }

    fn step(&mut self, problem: &ProximalProblem<M>, iteration: usize) -> OptimizerResult<()> {
        self.x_old = self.x.clone();
        let lambda = self.lambda.get_step_size(iteration);

        for &k in &self.order {
            self.x = problem.proximal_map(lambda, &self.x, k)?;
        }
        self.current_lambda = Some(lambda);

        self.order = self.evaluation_order.update_order(
            problem.num_proximal_maps(),
            iteration,
            &self.order,
            &mut self.rng,
        );
        Ok(())
    }

    fn iterate(&self) -> &M::Point {
        &self.x
    }

    fn previous_iterate(&self) -> &M::Point {
        &self.x_old
    }

    fn step_size(&self) -> Option<f64> {
        self.current_lambda
    }

    fn stopping_criterion(&self) -> &StoppingCriterion {
        &self.stopping_criterion
    }
}

impl<M: Manifold> fmt::Debug for CyclicProximalPointOptions<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CyclicProximalPointOptions")
            .field("x", &self.x)
            .field("x_old", &self.x_old)
            .field("lambda", &self.lambda)
            .field("evaluation_order", &self.evaluation_order)
            .field("order", &self.order)
            .field("stopping_criterion", &self.stopping_criterion)
            .finish_non_exhaustive()
    }
}

/// Debug observer of a CPPA run.
pub type CyclicProximalPointDebug<M> = DebugGroup<ProximalProblem<M>, CyclicProximalPointOptions<M>>;

/// Record observer of a CPPA run.
pub type CyclicProximalPointRecord<M> = RecordGroup<ProximalProblem<M>, CyclicProximalPointOptions<M>>;

/// Cyclic proximal point solver.
///
/// # Examples
///
/// ```rust
/// use manifoldopt_core::problem::ProximalProblem;
/// use manifoldopt_manifolds::{Circle, S1Point};
/// use manifoldopt_optim::{CyclicProximalPoint, CyclicProximalPointConfig};
///
/// let target = S1Point(1.0);
/// let problem = ProximalProblem::new(
///     Circle::new(),
///     |x: &S1Point| Ok((x.0 - 1.0).abs()),
///     Vec::new(),
/// )
/// .with_proximal_map(move |_, _: &S1Point| Ok(target));
///
/// let mut cppa = CyclicProximalPoint::new(CyclicProximalPointConfig::new());
/// let result = cppa.optimize(&problem, &S1Point(0.0)).unwrap();
/// assert_eq!(result.point, target);
/// ```
pub struct CyclicProximalPoint<M: Manifold> {
    config: CyclicProximalPointConfig,
    debug: Option<CyclicProximalPointDebug<M>>,
    record: Option<CyclicProximalPointRecord<M>>,
}

impl<M: Manifold> CyclicProximalPoint<M> {
    /// Creates a new solver with the given configuration.
    pub fn new(config: CyclicProximalPointConfig) -> Self {
        Self {
            config,
            debug: None,
            record: None,
        }
    }

    /// Attaches a debug observer.
    #[must_use]
    pub fn with_debug(mut self, debug: CyclicProximalPointDebug<M>) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Attaches a record observer; its rows become the result's trace.
    #[must_use]
    pub fn with_record(mut self, record: CyclicProximalPointRecord<M>) -> Self {
        self.record = Some(record);
        self
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &CyclicProximalPointConfig {
        &self.config
    }

    /// The record observer, holding the values of the last run.
    pub fn record(&self) -> Option<&CyclicProximalPointRecord<M>> {
        self.record.as_ref()
    }

    /// Returns the solver name.
    pub fn name(&self) -> &str {
        "Cyclic Proximal Point"
    }

    /// Runs the algorithm from `x0`.
    pub fn optimize(
        &mut self,
        problem: &ProximalProblem<M>,
        x0: &M::Point,
    ) -> OptimizerResult<OptimizationResult<M>> {
        let manifold = problem.manifold();
        let mut options = CyclicProximalPointOptions::new(
            x0.clone(),
            self.config.lambda_for(manifold.typical_distance()),
            self.config.evaluation_order,
            self.config.stopping_criterion.clone(),
            self.config.rng(),
        );
        debug!(
            manifold = manifold.name(),
            proximal_maps = problem.num_proximal_maps(),
            order = self.config.evaluation_order.name(),
            "running cyclic proximal point"
        );

        let mut observers: Vec<
            &mut dyn Observer<ProximalProblem<M>, CyclicProximalPointOptions<M>>,
        > = Vec::new();
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
            "cyclic proximal point finished"
        );

        let value = problem.cost(options.iterate())?;
        let result = OptimizationResult::new(options.into_iterate(), value, summary);
        Ok(match &self.record {
            Some(record) => result.with_trace(record.trace()),
            None => result,
        })
    }
}

impl<M: Manifold> fmt::Debug for CyclicProximalPoint<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CyclicProximalPoint")
            .field("config", &self.config)
            .field("debug", &self.debug)
            .field("record", &self.record)
            .finish()
    }
}
