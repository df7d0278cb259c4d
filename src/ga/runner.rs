//! One-call GA execution.
//!
//! [`GaRunner`] wraps [`GeneticAlgorithm`] for callers that only need the
//! final outcome: it runs the full loop and packs the best candidate, the
//! final generation and the fitness history into a [`GaResult`].

use super::config::GaConfig;
use super::engine::{GeneticAlgorithm, Termination};
use super::types::{Chromosome, GaProblem};
use crate::error::GaError;
use std::time::{Duration, Instant};

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best candidate found during the entire run.
    pub best: Chromosome,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Index of the last generation built; the first generation is 0.
    pub generations: usize,

    /// How the run ended.
    pub termination: Termination,

    /// Best-so-far fitness after each generation, starting with the first.
    pub fitness_history: Vec<f64>,

    /// The final generation, best first.
    pub last_generation: Vec<Chromosome>,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl GaResult {
    /// `true` when the run spent its whole generation budget.
    pub fn exhausted_budget(&self) -> bool {
        self.termination.exhausted_budget()
    }

    /// `true` when the run stopped on stagnation.
    pub fn stagnated(&self) -> bool {
        self.termination == Termination::StoppedEarly
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &table, &config)?;
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// Fails with [`GaError::Config`] before building anything if the
    /// configuration is invalid, and propagates operator and evaluation
    /// failures.
    pub fn run<P: GaProblem>(
        problem: &P,
        data: &P::Data,
        config: &GaConfig,
    ) -> Result<GaResult, GaError> {
        let start = Instant::now();
        let mut ga = GeneticAlgorithm::new(problem, data, config.clone())?;
        let termination = ga.run()?;
        let elapsed = start.elapsed();

        let best = ga
            .best_so_far()
            .cloned()
            .ok_or(GaError::NotInitialized)?;
        log::debug!(
            "run finished in {:.2?}: {:?} at generation {}, best {}",
            elapsed,
            termination,
            ga.generation(),
            best
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations: ga.generation(),
            termination,
            fitness_history: ga.history().to_vec(),
            last_generation: ga.last_generation().chromosomes().to_vec(),
            elapsed,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
