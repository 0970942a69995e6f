use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swarmkp::{
    diversity::DiversityMetric,
    population::Population,
    problem::{KnapsackInstance, Problem},
    rng::RandomNumberGenerator,
};

fn random_instance(items: usize, rng: &mut RandomNumberGenerator) -> KnapsackInstance {
    let weights: Vec<f64> = (0..items).map(|_| rng.uniform_range(1.0, 1000.0).round()).collect();
    let profits: Vec<f64> = (0..items).map(|_| rng.uniform_range(1.0, 1000.0).round()).collect();
    let capacity = weights.iter().sum::<f64>() / 4.0;
    KnapsackInstance::new(format!("random_{}", items), weights, profits, capacity).unwrap()
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair");
    let mut rng = RandomNumberGenerator::from_seed(5);

    for items in [100, 1000, 10000].iter() {
        let instance = random_instance(*items, &mut rng);
        let candidate: Vec<f64> = (0..*items).map(|_| rng.bit()).collect();

        group.bench_with_input(BenchmarkId::new("greedy", items), &candidate, |b, candidate| {
            b.iter(|| instance.repair(black_box(candidate.clone())).unwrap())
        });
    }

    group.finish();
}

fn bench_diversity(c: &mut Criterion) {
    let mut group = c.benchmark_group("diversity");
    let mut rng = RandomNumberGenerator::from_seed(6);

    for size in [10, 100, 1000].iter() {
        let population = Population::from_fn(*size, 500, |_, _| rng.bit()).unwrap();

        for metric in [DiversityMetric::Hussain, DiversityMetric::Median] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", metric), size),
                &population,
                |b, population| b.iter(|| metric.measure(black_box(population))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_repair, bench_diversity);
criterion_main!(benches);
