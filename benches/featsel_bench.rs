//! Criterion benchmarks for the feature-selection GA.
//!
//! Uses synthetic problems (OneMax, random feature tables with the
//! variance scorer) to measure engine overhead independent of any
//! expensive metric.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_featsel::features::{FeatureTable, SubsetBounds, SubsetProblem, VarianceScorer};
use u_featsel::ga::{GaConfig, GaProblem, GaRunner};
use u_featsel::random::create_rng;

// ===========================================================================
// OneMax: maximize the number of set bits
// ===========================================================================

struct OneMax;

impl GaProblem for OneMax {
    type Data = usize;

    fn evaluate(&self, genes: &[bool], _data: &usize) -> anyhow::Result<f64> {
        Ok(genes.iter().filter(|&&g| g).count() as f64)
    }
}

// ===========================================================================
// Random feature table
// ===========================================================================

fn random_table(n_rows: usize, n_cols: usize) -> FeatureTable {
    let mut rng = create_rng(7);
    let names = (0..n_cols).map(|i| format!("f{i}")).collect();
    let columns = (0..n_cols)
        .map(|c| {
            let spread = 1.0 + c as f64;
            (0..n_rows).map(|_| rng.random_range(0.0..spread)).collect()
        })
        .collect();
    let mut table = FeatureTable::new(names, columns).expect("columns have equal length");
    table.normalize_min_max();
    table
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_ga_onemax(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_onemax");
    group.sample_size(10);

    for (bits, pop, gen) in [(20usize, 30usize, 50usize), (50, 50, 50), (100, 100, 30)] {
        let config = GaConfig::default()
            .with_population_size(pop)
            .with_generations(gen)
            .with_max_no_improvement(0)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}_g{}", bits, pop, gen), bits),
            &(bits, config),
            |b, (n, c)| {
                b.iter(|| {
                    let result = GaRunner::run(black_box(&OneMax), black_box(n), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_variance_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("variance_selection");
    group.sample_size(10);

    for &n_cols in &[16, 64, 256] {
        let table = random_table(500, n_cols);
        let config = GaConfig::feature_selection(100).with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n_cols),
            &(table, config),
            |b, (t, c)| {
                b.iter(|| {
                    // A fresh problem per iteration so the fitness cache starts empty.
                    let problem = SubsetProblem::new(
                        SubsetBounds::new(3, 6).expect("3 <= 6"),
                        VarianceScorer::new(),
                    );
                    let result = GaRunner::run(black_box(&problem), black_box(t), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_ga_onemax, bench_variance_selection);
criterion_main!(benches);
