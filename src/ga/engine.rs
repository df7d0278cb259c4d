//! Generational driver.
//!
//! [`GeneticAlgorithm`] owns one run: it builds the first generation, then
//! advances one generation per [`step`](GeneticAlgorithm::step), consulting
//! [`AdaptiveControl`] after each one. [`run`](GeneticAlgorithm::run) drives
//! the whole loop until the generation budget is spent or the search stops
//! early on stagnation.
//!
//! # Phases
//!
//! `Uninitialized → FirstGeneration → SteadyState → Terminated`
//!
//! A generation is committed only after every candidate in it has been
//! evaluated; a failing fitness call leaves the previous generation and the
//! elite archive untouched.

use super::config::GaConfig;
use super::control::{AdaptiveControl, ControlDecision, Observation};
use super::population::{EliteArchive, Population};
use super::selection;
use super::types::{genome_key, Chromosome, GaProblem};
use crate::error::GaError;
use crate::random::rng_from_seed;
use log::Level;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every generation of the budget was built.
    BudgetExhausted,
    /// The no-improvement limit was reached before the budget ran out.
    StoppedEarly,
}

impl Termination {
    /// `true` when the full generation budget ran without an early stop.
    pub fn exhausted_budget(self) -> bool {
        self == Termination::BudgetExhausted
    }
}

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No generation exists yet.
    Uninitialized,
    /// The first generation is current; no step has run.
    FirstGeneration,
    /// At least one step has run.
    SteadyState,
    /// The run ended for the given reason; further steps fail.
    Terminated(Termination),
}

/// The evolutionary engine for one problem, dataset and configuration.
///
/// # Usage
///
/// ```
/// use u_featsel::ga::{GaConfig, GaProblem, GeneticAlgorithm};
///
/// struct OneMax;
///
/// impl GaProblem for OneMax {
///     type Data = usize;
///     fn evaluate(&self, genes: &[bool], _data: &usize) -> anyhow::Result<f64> {
///         Ok(genes.iter().filter(|&&g| g).count() as f64)
///     }
/// }
///
/// let config = GaConfig::default().with_population_size(20).with_generations(30).with_seed(1);
/// let mut ga = GeneticAlgorithm::new(&OneMax, &8, config).unwrap();
/// let termination = ga.run().unwrap();
/// let (fitness, genes) = ga.best_individual().unwrap();
/// assert_eq!(genes.len(), 8);
/// assert!(fitness >= 1.0);
/// # let _ = termination;
/// ```
pub struct GeneticAlgorithm<'a, P: GaProblem> {
    problem: &'a P,
    data: &'a P::Data,
    config: GaConfig,
    rng: StdRng,
    genome_length: usize,
    population: Population,
    elite: EliteArchive,
    control: Option<AdaptiveControl>,
    best_ever: Option<Chromosome>,
    history: Vec<f64>,
    generation: usize,
    phase: Phase,
}

impl<'a, P: GaProblem> GeneticAlgorithm<'a, P> {
    /// Creates an engine.
    ///
    /// Fails with [`GaError::Config`] on invalid bounds or when
    /// [`GaProblem::check`] rejects the problem for `data` and `config`.
    pub fn new(problem: &'a P, data: &'a P::Data, config: GaConfig) -> Result<Self, GaError> {
        config.validate()?;
        problem.check(data, &config)?;
        let rng = rng_from_seed(config.seed);
        let genome_length = problem.genome_length(data);
        Ok(Self {
            problem,
            data,
            population: Population::new(config.direction),
            elite: EliteArchive::new(config.elite_size(), config.direction),
            history: Vec::with_capacity(config.generations),
            rng,
            genome_length,
            control: None,
            best_ever: None,
            generation: 0,
            phase: Phase::Uninitialized,
            config,
        })
    }

    /// Runs the whole search: first generation, then one step per remaining
    /// generation of the budget, stopping early on stagnation.
    pub fn run(&mut self) -> Result<Termination, GaError> {
        self.create_first_generation()?;

        while self.generation + 1 < self.config.generations {
            let obs = self.step()?;
            if obs.decision == ControlDecision::Stop {
                log::info!(
                    "stopped after {} generations without improvement (generation {} of {})",
                    self.config.max_no_improvement,
                    self.generation,
                    self.config.generations
                );
                return Ok(Termination::StoppedEarly);
            }
        }

        self.phase = Phase::Terminated(Termination::BudgetExhausted);
        log::info!(
            "generation budget of {} exhausted, best fitness {}",
            self.config.generations,
            self.best_so_far().map_or(0.0, Chromosome::fitness)
        );
        Ok(Termination::BudgetExhausted)
    }

    /// Builds, evaluates and ranks the first generation and seeds the elite
    /// archive and the control state from it.
    ///
    /// Calling this again starts a fresh run on the same engine.
    pub fn create_first_generation(&mut self) -> Result<(), GaError> {
        log::log!(
            self.log_level(),
            "processing generation 1 of {}",
            self.config.generations
        );

        let mut members = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let genes = self
                .problem
                .create_individual(self.data, &mut self.rng);
            self.check_length("create_individual", &genes)?;
            members.push(Chromosome::new(genes));
        }
        self.evaluate_pending(&mut members)?;

        self.elite.clear();
        for m in &members {
            self.elite.consider(m);
        }
        self.population.replace(members);
        self.population.rank();

        let best = self
            .population
            .best()
            .cloned()
            .ok_or(GaError::NotInitialized)?;
        self.control = Some(AdaptiveControl::new(&self.config, best.fitness()));
        self.history.clear();
        self.history.push(best.fitness());
        self.generation = 0;
        self.phase = Phase::FirstGeneration;
        self.problem.on_generation(0, best.fitness());
        self.best_ever = Some(best);
        Ok(())
    }

    /// Advances one generation: selection, crossover, mutation,
    /// diversification, elitism, evaluation, ranking, then one pass of the
    /// adaptive control loop.
    ///
    /// Fails with [`GaError::NotInitialized`] before the first generation and
    /// with [`GaError::Terminated`] after the run stopped.
    pub fn step(&mut self) -> Result<Observation, GaError> {
        match self.phase {
            Phase::Uninitialized => return Err(GaError::NotInitialized),
            Phase::Terminated(_) => return Err(GaError::Terminated),
            Phase::FirstGeneration | Phase::SteadyState => {}
        }
        let control = self.control.as_ref().ok_or(GaError::NotInitialized)?;
        let crossover_probability = control.crossover_probability();
        let diversify = control.diversify_pending();

        log::log!(
            self.log_level(),
            "processing generation {} of {}",
            self.generation + 2,
            self.config.generations
        );

        let mut next = self.breed(crossover_probability)?;
        if diversify {
            self.diversify(&mut next)?;
        }
        for (slot, elite) in next.iter_mut().zip(self.elite.members()) {
            *slot = elite.clone();
        }
        self.evaluate_pending(&mut next)?;

        // Commit.
        for m in &next {
            self.elite.consider(m);
        }
        self.population.replace(next);
        self.population.rank();
        self.generation += 1;
        self.phase = Phase::SteadyState;

        let best = self
            .population
            .best()
            .cloned()
            .ok_or(GaError::NotInitialized)?;
        let control = self.control.as_mut().ok_or(GaError::NotInitialized)?;
        if diversify {
            control.take_diversify();
        }
        let obs = control.observe(best.fitness());
        self.history.push(control.best_so_far());
        self.problem.on_generation(self.generation, best.fitness());

        let level = self.log_level();
        if obs.improved {
            log::log!(
                level,
                "generation {}: improvement from {} to {}",
                self.generation,
                obs.previous_best,
                best.fitness()
            );
            self.best_ever = Some(best);
        } else {
            log::log!(level, "generation {}: no improvement", self.generation);
        }
        if obs.decayed {
            log::log!(
                level,
                "crossover probability decayed to {:.2}",
                self.crossover_probability()
            );
        }
        if obs.diversify {
            log::log!(level, "diversification scheduled for the next generation");
        }
        if obs.decision == ControlDecision::Stop {
            self.phase = Phase::Terminated(Termination::StoppedEarly);
        }
        Ok(obs)
    }

    /// Best candidate of the current generation as `(fitness, genes)`.
    ///
    /// `None` before the first generation exists.
    pub fn best_individual(&self) -> Option<(f64, &[bool])> {
        self.population.best().map(|c| (c.fitness(), c.genes()))
    }

    /// Best candidate seen during the run, by the control loop's strict
    /// improvement rule.
    pub fn best_so_far(&self) -> Option<&Chromosome> {
        self.best_ever.as_ref()
    }

    /// A restartable view over the current generation.
    pub fn last_generation(&self) -> GenerationView<'_> {
        GenerationView {
            members: self.population.members(),
        }
    }

    pub fn elite(&self) -> &EliteArchive {
        &self.elite
    }

    /// Index of the current generation; the first generation is 0.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Best fitness so far after each generation, starting with the first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Current crossover probability, initial value before the first generation.
    pub fn crossover_probability(&self) -> f64 {
        self.control
            .as_ref()
            .map_or(self.config.crossover_probability, AdaptiveControl::crossover_probability)
    }

    /// Consecutive generations without strict improvement.
    pub fn no_improvement(&self) -> usize {
        self.control.as_ref().map_or(0, AdaptiveControl::no_improvement)
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Fills a new generation with unevaluated children of tournament winners.
    fn breed(&mut self, crossover_probability: f64) -> Result<Vec<Chromosome>, GaError> {
        let pop_size = self.config.population_size;
        let tournament_size = self.config.tournament_size();
        let direction = self.config.direction;
        let parents = self.population.members();

        let mut next = Vec::with_capacity(pop_size);
        while next.len() < pop_size {
            let i1 = selection::tournament(parents, tournament_size, direction, &mut self.rng);
            let i2 = selection::tournament(parents, tournament_size, direction, &mut self.rng);
            let mut child1 = parents[i1].genes().to_vec();
            let mut child2 = parents[i2].genes().to_vec();

            let can_crossover = self.rng.random_range(0.0..1.0) < crossover_probability;
            let can_mutate =
                self.rng.random_range(0.0..1.0) < self.config.mutation_probability;

            if can_crossover {
                let (c1, c2) = self
                    .problem
                    .crossover(&child1, &child2, self.data, &mut self.rng);
                child1 = c1;
                child2 = c2;
                check_length(self.genome_length, "crossover", &child1)?;
                check_length(self.genome_length, "crossover", &child2)?;
                self.problem.repair(&mut child1, self.data, &mut self.rng);
                self.problem.repair(&mut child2, self.data, &mut self.rng);
                check_length(self.genome_length, "repair", &child1)?;
                check_length(self.genome_length, "repair", &child2)?;
            }

            if can_mutate {
                self.problem.mutate(&mut child1, self.data, &mut self.rng);
                self.problem.mutate(&mut child2, self.data, &mut self.rng);
                check_length(self.genome_length, "mutate", &child1)?;
                check_length(self.genome_length, "mutate", &child2)?;
            }

            next.push(Chromosome::new(child1));
            if next.len() < pop_size {
                next.push(Chromosome::new(child2));
            }
        }
        Ok(next)
    }

    /// Replaces the genotypes of a random subset of `next` with strongly
    /// perturbed ones.
    fn diversify(&mut self, next: &mut [Chromosome]) -> Result<(), GaError> {
        let count = self.config.diversification_count().min(next.len());
        let positions = index::sample(&mut self.rng, next.len(), count);
        log::log!(
            self.log_level(),
            "diversifying {} of {} candidates",
            count,
            next.len()
        );
        for idx in positions {
            let genes = next[idx].genes().to_vec();
            let genes = self.problem.diversify(genes, self.data, &mut self.rng);
            check_length(self.genome_length, "diversify", &genes)?;
            next[idx].set_genes(genes);
        }
        Ok(())
    }

    /// Evaluates every candidate whose fitness is unset.
    ///
    /// Either all pending candidates receive a fitness or an error is
    /// returned; callers discard `members` on error.
    #[cfg(feature = "parallel")]
    fn evaluate_pending(&self, members: &mut [Chromosome]) -> Result<(), GaError> {
        if !self.config.parallel {
            return self.evaluate_sequential(members);
        }
        let problem = self.problem;
        let data = self.data;
        let results: Vec<(usize, Result<f64, GaError>)> = members
            .par_iter()
            .enumerate()
            .filter(|(_, m)| !m.is_evaluated())
            .map(|(i, m)| (i, evaluate_one(problem, data, m.genes())))
            .collect();
        for (i, result) in results {
            members[i].set_fitness(result?);
        }
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_pending(&self, members: &mut [Chromosome]) -> Result<(), GaError> {
        self.evaluate_sequential(members)
    }

    fn evaluate_sequential(&self, members: &mut [Chromosome]) -> Result<(), GaError> {
        for m in members.iter_mut().filter(|m| !m.is_evaluated()) {
            let fitness = evaluate_one(self.problem, self.data, m.genes())?;
            m.set_fitness(fitness);
        }
        Ok(())
    }

    fn check_length(&self, operator: &'static str, genes: &[bool]) -> Result<(), GaError> {
        check_length(self.genome_length, operator, genes)
    }

    fn log_level(&self) -> Level {
        if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }
}

fn evaluate_one<P: GaProblem>(
    problem: &P,
    data: &P::Data,
    genes: &[bool],
) -> Result<f64, GaError> {
    let fitness = problem
        .evaluate(genes, data)
        .map_err(|source| GaError::Evaluation {
            key: genome_key(genes),
            source,
        })?;
    if fitness.is_nan() {
        return Err(GaError::NonComparableFitness {
            key: genome_key(genes),
            value: fitness,
        });
    }
    Ok(fitness)
}

fn check_length(expected: usize, operator: &'static str, genes: &[bool]) -> Result<(), GaError> {
    if genes.len() != expected {
        return Err(GaError::GenotypeLength {
            operator,
            expected,
            actual: genes.len(),
        });
    }
    Ok(())
}

/// Finite, restartable view over a generation.
///
/// The view is `Copy`; every call to [`iter`](Self::iter) (or every
/// `for` loop over the view) starts again from the best candidate.
#[derive(Debug, Clone, Copy)]
pub struct GenerationView<'a> {
    members: &'a [Chromosome],
}

impl<'a> GenerationView<'a> {
    /// Iterates `(fitness, genes)` pairs, best first.
    pub fn iter(&self) -> GenerationIter<'a> {
        GenerationIter {
            inner: self.members.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The underlying candidates.
    pub fn chromosomes(&self) -> &'a [Chromosome] {
        self.members
    }
}

impl<'a> IntoIterator for GenerationView<'a> {
    type Item = (f64, &'a [bool]);
    type IntoIter = GenerationIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`GenerationView::iter`].
#[derive(Debug, Clone)]
pub struct GenerationIter<'a> {
    inner: std::slice::Iter<'a, Chromosome>,
}

impl<'a> Iterator for GenerationIter<'a> {
    type Item = (f64, &'a [bool]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|c| (c.fitness(), c.genes()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for GenerationIter<'_> {}

// ============================================================================
// Tests
// ============================================================================
