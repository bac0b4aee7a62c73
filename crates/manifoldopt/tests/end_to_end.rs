//! End-to-end tests through the facade crate.

use approx::assert_relative_eq;
use manifoldopt::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn sphere_point(values: &[f64]) -> SnPoint {
    SnPoint::from_vec(values.to_vec())
}

/// Σₖ ½d²(·, aₖ) on the sphere, with the geodesic proximal maps.
fn sphere_mean_problem(sphere: &Sphere, anchors: &[SnPoint]) -> ProximalProblem<Sphere> {
    let cost_sphere = sphere.clone();
    let cost_anchors = anchors.to_vec();
    let mut problem = ProximalProblem::new(
        sphere.clone(),
        move |x: &SnPoint| {
            let mut cost = 0.0;
            for a in &cost_anchors {
                cost += 0.5 * cost_sphere.distance(x, a)?.powi(2);
            }
            Ok(cost)
        },
        Vec::new(),
    );
    for anchor in anchors.iter().cloned() {
        let sphere = sphere.clone();
        problem = problem.with_proximal_map(move |lambda, x: &SnPoint| {
            let log = sphere.log(x, &anchor)?;
            sphere.exp(x, &log, lambda / (1.0 + lambda))
        });
    }
    problem
}

#[test]
fn test_sphere_mean_with_random_order_is_reproducible() {
    let sphere = Sphere::new(2).unwrap();
    let anchors = [
        sphere_point(&[1.0, 0.0, 0.0]),
        sphere_point(&[0.0, 1.0, 0.0]),
        sphere_point(&[0.0, 0.0, 1.0]),
    ];
    let problem = sphere_mean_problem(&sphere, &anchors);
    let x0 = sphere_point(&[0.6, 0.0, 0.8]);

    let run = || {
        let mut cppa = CyclicProximalPoint::new(
            CyclicProximalPointConfig::new()
                .with_evaluation_order(EvaluationOrder::Random)
                .with_stopping_criterion(StoppingCriterion::max_iterations(2000))
                .with_seed(11),
        );
        cppa.optimize(&problem, &x0).unwrap()
    };
    let first = run();
    let second = run();

    assert_eq!(first.point, second.point);
    assert!(sphere.validate_point(&first.point).is_ok());

    // The mean of the three axes is their normalized sum
    let expected = sphere_point(&[1.0, 1.0, 1.0].map(|v: f64| v / 3f64.sqrt()));
    assert!(sphere.distance(&first.point, &expected).unwrap() < 1e-2);
}

#[test]
fn test_gradient_descent_on_product_with_debug_output() {
    let product = Product::new(vec![
        component(Sphere::new(2).unwrap()),
        component(Circle::new()),
    ])
    .unwrap();
    assert_eq!(product.name(), "Product(Sphere, Circle)");
    assert_eq!(product.abbreviation(), "Sn×S1");
    assert_eq!(product.dimension(), 3);

    let target = ProdPoint::new(vec![
        Element::new(sphere_point(&[0.0, 0.0, 1.0])),
        Element::new(S1Point(0.5)),
    ]);
    let for_cost = product.clone();
    let for_gradient = product.clone();
    let cost_target = target.clone();
    let gradient_target = target.clone();
    let problem = GradientProblem::new(
        product.clone(),
        move |x: &ProdPoint| Ok(0.5 * for_cost.distance(x, &cost_target)?.powi(2)),
        move |x: &ProdPoint| {
            let log = for_gradient.log(x, &gradient_target)?;
            for_gradient.scale(&log, -1.0)
        },
    );

    let lines = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&lines);
    let mut gd = GradientDescent::new(GradientDescentConfig::new())
        .with_debug(
            GradientDescentDebug::new()
                .with_action(DebugIteration)
                .with_action(DebugStoppingCriterion)
                .with_sink(move |line| captured.lock().unwrap().push(line.to_string())),
        )
        .with_record(
            GradientDescentRecord::new()
                .with_action(RecordIteration)
                .with_action(RecordCost),
        );

    let x0 = ProdPoint::new(vec![
        Element::new(sphere_point(&[1.0, 0.0, 0.0])),
        Element::new(S1Point(-1.0)),
    ]);
    let result = gd.optimize(&problem, &x0).unwrap();

    assert!(result.converged, "{}", result.stop_reason);
    assert!(product.distance(&result.point, &target).unwrap() < 1e-6);

    let lines = lines.lock().unwrap();
    assert_eq!(lines.first().map(String::as_str), Some("Initial"));
    assert_eq!(lines.len(), result.iterations + 2);
    assert_eq!(lines.last(), Some(&result.stop_reason));

    let trace = result.trace.unwrap();
    assert_eq!(trace.len(), result.iterations);
    let costs: Vec<_> = trace.iter().filter_map(|row| row[1].as_scalar()).collect();
    assert!(costs.windows(2).all(|pair| pair[1] <= pair[0] + 1e-12));
}

#[test]
fn test_solve_drives_custom_options() {
    // A hand-written algorithm plugged into the generic loop: x ← exp_x(½ log_x(target))
    struct Halving {
        x: S1Point,
        x_old: S1Point,
        target: S1Point,
        stop: StoppingCriterion,
    }

    impl SolverOptions<GradientProblem<Circle>> for Halving {
        fn initialize(&mut self, _: &GradientProblem<Circle>) -> OptimizerResult<()> {
            self.x_old = self.x;
            Ok(())
        }

        fn step(&mut self, problem: &GradientProblem<Circle>, _: usize) -> OptimizerResult<()> {
            let circle = problem.manifold();
            let log = circle.log(&self.x, &self.target)?;
            self.x_old = self.x;
            self.x = circle.exp(&self.x, &log, 0.5)?;
            Ok(())
        }

        fn iterate(&self) -> &S1Point {
            &self.x
        }

        fn previous_iterate(&self) -> &S1Point {
            &self.x_old
        }

        fn stopping_criterion(&self) -> &StoppingCriterion {
            &self.stop
        }
    }

    let problem = GradientProblem::new(
        Circle::new(),
        |x: &S1Point| Ok(x.0.abs()),
        |x: &S1Point| Ok(TVector::at(*x, x.0.signum())),
    );
    let mut options = Halving {
        x: S1Point(3.0),
        x_old: S1Point(3.0),
        target: S1Point(-3.0),
        stop: StoppingCriterion::max_iterations(100).or(StoppingCriterion::change_less(1e-10)),
    };
    let mut record = RecordGroup::<GradientProblem<Circle>, Halving>::new().with_action(RecordChange);

    let summary = solve(&problem, &mut options, &mut [&mut record]).unwrap();

    assert_eq!(summary.reason.termination, TerminationReason::Converged);
    assert!(Circle::new().distance(&options.x, &S1Point(-3.0)).unwrap() < 1e-9);

    // The first step crosses the cut: half of 2π − 6
    let first_change = record.recorded(0).unwrap()[0].as_scalar().unwrap();
    assert_relative_eq!(first_change, std::f64::consts::PI - 3.0, epsilon = 1e-12);
}
