use std::io::Cursor;
use std::time::Duration;

use swarmkp::{
    discretization::DiscretizationScheme,
    engine::{
        CancellationToken, CsvSink, EngineOptions, EngineState, IterationEngine, LogLevel,
        MemorySink, NullSink,
    },
    error::{Result, SolverError},
    problem::{KnapsackInstance, Objective, Problem},
    strategy::Algorithm,
};

const F1: &str = "10 269
55 95
10 4
47 60
5 32
4 23
50 72
8 80
61 62
85 65
87 46
";

fn f1() -> KnapsackInstance {
    KnapsackInstance::from_reader("kn_f1_l-d_kp_10_269", Cursor::new(F1)).unwrap()
}

fn options(iterations: usize, population: usize, seed: u64) -> EngineOptions {
    EngineOptions::builder()
        .max_iterations(iterations)
        .population_size(population)
        .seed(seed)
        .build()
}

fn run(algorithm: Algorithm, scheme: &str, options: EngineOptions) -> Result<MemorySink> {
    let scheme: DiscretizationScheme = scheme.parse()?;
    let mut engine = IterationEngine::new(f1(), algorithm, Some(scheme), options)?;
    let mut sink = MemorySink::new();
    engine.run(&mut sink)?;
    Ok(sink)
}

#[test]
fn test_best_fitness_never_decreases() {
    for name in ["PSO", "GWO", "EOO"] {
        let algorithm = Algorithm::from_name(name, None).unwrap();
        let sink = run(algorithm, "V4-ELIT", options(30, 12, 11)).unwrap();

        for pair in sink.records.windows(2) {
            assert!(
                pair[1].best_fitness >= pair[0].best_fitness,
                "{} regressed from {} to {}",
                name,
                pair[0].best_fitness,
                pair[1].best_fitness
            );
        }
    }
}

#[test]
fn test_best_candidate_is_feasible_and_consistent() {
    let instance = f1();
    let algorithm = Algorithm::from_name("GA", Some("cross:0.9;muta:0.05")).unwrap();
    let mut engine =
        IterationEngine::new(&instance, algorithm, None, options(25, 10, 5)).unwrap();
    let mut sink = MemorySink::new();
    let summary = engine.run(&mut sink).unwrap();

    assert_eq!(summary.best_candidate.len(), 10);
    assert!(summary.best_candidate.iter().all(|&g| g == 0.0 || g == 1.0));
    assert!(instance.is_feasible(&summary.best_candidate));
    assert_eq!(instance.fitness(&summary.best_candidate), summary.best_fitness);
    assert!(summary.best_fitness <= instance.known_optimum().unwrap());

    let last = sink.records.last().unwrap();
    assert_eq!(last.best_fitness, summary.best_fitness);
    assert_eq!(sink.summary, Some(summary));
}

#[test]
fn test_one_record_per_generation_plus_initial() {
    let sink = run(Algorithm::Gwo, "S2-STD", options(8, 6, 1)).unwrap();
    let generations: Vec<usize> = sink.records.iter().map(|r| r.generation).collect();
    assert_eq!(generations, (0..=8).collect::<Vec<_>>());

    let summary = sink.summary.unwrap();
    assert_eq!(summary.iterations_completed, 8);
    assert!(!summary.cancelled);
}

#[test]
fn test_exploration_and_exploitation_sum_to_hundred() {
    let sink = run(Algorithm::Eoo, "X3-COM", options(15, 8, 21)).unwrap();

    for record in &sink.records {
        assert!((record.exploration_pct + record.exploitation_pct - 100.0).abs() < 1e-9);
        assert!((0.0..=100.0).contains(&record.exploration_pct));
        assert!(record.diversity >= 0.0);
    }
    let first = &sink.records[0];
    if first.diversity > 0.0 {
        assert_eq!(first.exploration_pct, 100.0);
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let pso = || Algorithm::from_name("PSO", None).unwrap();
    let a = run(pso(), "V2-PS", options(20, 10, 77)).unwrap();
    let b = run(pso(), "V2-PS", options(20, 10, 77)).unwrap();

    let trace = |sink: &MemorySink| -> Vec<(f64, f64)> {
        sink.records
            .iter()
            .map(|r| (r.best_fitness, r.diversity))
            .collect()
    };
    assert_eq!(trace(&a), trace(&b));
    assert_eq!(
        a.summary.unwrap().best_candidate,
        b.summary.unwrap().best_candidate
    );
}

#[test]
fn test_parallel_and_sequential_paths_agree() {
    let sequential = options(15, 16, 9);
    let mut parallel = sequential.clone();
    parallel.set_parallel_threshold(1);

    let a = run(Algorithm::Gwo, "V4-ELIT", sequential).unwrap();
    let b = run(Algorithm::Gwo, "V4-ELIT", parallel).unwrap();

    for (x, y) in a.records.iter().zip(&b.records) {
        assert_eq!(x.best_fitness, y.best_fitness);
        assert_eq!(x.diversity, y.diversity);
    }
    assert_eq!(
        a.summary.unwrap().best_candidate,
        b.summary.unwrap().best_candidate
    );
}

#[test]
fn test_csv_output() {
    let scheme: DiscretizationScheme = "S1-STD".parse().unwrap();
    let mut engine =
        IterationEngine::new(f1(), Algorithm::Eoo, Some(scheme), options(5, 4, 2)).unwrap();
    let mut sink = CsvSink::new(Vec::new());
    engine.run(&mut sink).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "iter,fitness,time,XPL,XPT,DIV");
    assert_eq!(lines.len(), 1 + 6);
    for (generation, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], generation.to_string());
        let time = fields[2];
        assert_eq!(time.split('.').nth(1).map(str::len), Some(3));
        // Whole knapsack profits still carry a decimal point.
        assert!(fields[1].contains('.'), "{}", line);
    }
}

#[test]
fn test_cancelled_before_start_still_finalizes() {
    let token = CancellationToken::new();
    token.cancel();

    let scheme = DiscretizationScheme::default();
    let mut engine = IterationEngine::new(f1(), Algorithm::Gwo, Some(scheme), options(50, 6, 4))
        .unwrap()
        .with_cancellation(token);
    let mut sink = MemorySink::new();
    let summary = engine.run(&mut sink).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.iterations_completed, 0);
    assert_eq!(sink.records.len(), 1);
    assert!(sink.summary.is_some());
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn test_cancellation_from_another_thread() {
    let scheme = DiscretizationScheme::default();
    let mut engine = IterationEngine::new(
        f1(),
        Algorithm::Gwo,
        Some(scheme),
        options(usize::MAX / 2, 6, 4),
    )
    .unwrap();
    let token = engine.cancellation_token();

    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        token.cancel();
    });

    let summary = engine.run(&mut NullSink).unwrap();
    assert!(summary.cancelled);
    assert!(summary.iterations_completed < usize::MAX / 2);
}

#[test]
fn test_zero_time_limit_stops_at_first_boundary() {
    let mut opts = options(40, 6, 4);
    opts.set_time_limit(Some(Duration::ZERO));
    let sink = run(Algorithm::Eoo, "V1-STD", opts).unwrap();

    let summary = sink.summary.unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.iterations_completed, 0);
}

#[test]
fn test_configuration_errors_fail_fast() {
    let too_short = run(Algorithm::Gwo, "V4-ELIT", options(3, 6, 1));
    assert!(matches!(too_short, Err(SolverError::Configuration(_))));

    let too_small = run(Algorithm::Gwo, "V4-ELIT", options(10, 2, 1));
    assert!(matches!(too_small, Err(SolverError::Configuration(_))));

    let unknown_scheme = run(Algorithm::Gwo, "Z9-STD", options(10, 6, 1));
    assert!(matches!(unknown_scheme, Err(SolverError::Configuration(_))));

    assert!(Algorithm::from_name("ABC", None).unwrap_err().is_configuration());
}

#[test]
fn test_run_twice_is_rejected() {
    let scheme = DiscretizationScheme::default();
    let mut engine =
        IterationEngine::new(f1(), Algorithm::Eoo, Some(scheme), options(5, 4, 8)).unwrap();
    engine.run(&mut NullSink).unwrap();
    match engine.run(&mut NullSink) {
        Err(SolverError::Evolution(msg)) => assert!(msg.contains("terminated")),
        other => panic!("Expected Evolution error, got {:?}", other),
    }
}

#[test]
fn test_verbose_logging_run() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let mut opts = options(5, 5, 13);
    opts.set_log_level(LogLevel::Verbose);
    let sink = run(Algorithm::from_name("PSO", None).unwrap(), "V4-ELIT", opts).unwrap();
    assert_eq!(sink.records.len(), 6);
}

#[derive(Debug)]
struct Broken;

impl Problem for Broken {
    fn dimension(&self) -> usize {
        3
    }

    fn objective(&self) -> Objective {
        Objective::Maximize
    }

    fn fitness(&self, _candidate: &[f64]) -> f64 {
        f64::NAN
    }

    fn is_feasible(&self, _candidate: &[f64]) -> bool {
        true
    }

    fn repair(&self, candidate: Vec<f64>) -> Result<Vec<f64>> {
        Ok(candidate)
    }
}

#[test]
fn test_non_finite_fitness_is_an_error() {
    let scheme = DiscretizationScheme::default();
    let mut engine =
        IterationEngine::new(Broken, Algorithm::Eoo, Some(scheme), options(5, 4, 1)).unwrap();
    assert!(matches!(
        engine.run(&mut NullSink),
        Err(SolverError::FitnessCalculation(_))
    ));
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[derive(Debug)]
struct Sphere;

impl Problem for Sphere {
    fn dimension(&self) -> usize {
        2
    }

    fn objective(&self) -> Objective {
        Objective::Minimize
    }

    fn fitness(&self, candidate: &[f64]) -> f64 {
        candidate.iter().map(|x| x * x).sum()
    }

    fn is_feasible(&self, _candidate: &[f64]) -> bool {
        true
    }

    fn repair(&self, candidate: Vec<f64>) -> Result<Vec<f64>> {
        Ok(candidate)
    }

    fn is_binary(&self) -> bool {
        false
    }
}

#[test]
fn test_continuous_problem_minimizes_without_scheme() {
    let mut engine =
        IterationEngine::new(Sphere, Algorithm::Gwo, None, options(30, 8, 3)).unwrap();
    let mut sink = MemorySink::new();
    let summary = engine.run(&mut sink).unwrap();

    for pair in sink.records.windows(2) {
        assert!(pair[1].best_fitness <= pair[0].best_fitness);
    }
    assert!(summary.best_fitness <= sink.records[0].best_fitness);
}

#[test]
fn test_ga_rejects_continuous_problem() {
    let ga = Algorithm::from_name("GA", Some("cross:0.8;muta:0.1")).unwrap();
    assert!(matches!(
        IterationEngine::new(Sphere, ga, None, options(10, 4, 1)),
        Err(SolverError::Configuration(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_summary_serializes_to_json() {
    let sink = run(Algorithm::Gwo, "V4-ELIT", options(5, 5, 6)).unwrap();
    let summary = sink.summary.unwrap();

    let json = serde_json::to_string(&summary).unwrap();
    let back: swarmkp::engine::RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);

    let record_json = serde_json::to_string(&sink.records[0]).unwrap();
    assert!(record_json.contains("\"exploration_pct\""));
}
