//! Core type definitions for the GA engine.
//!
//! [`Chromosome`] is the candidate solution, [`Direction`] fixes what
//! "better" means, [`SeedData`] is the opaque dataset handle and
//! [`GaProblem`] is the operator set that plugs a concrete problem into the
//! generic engine.

use super::config::GaConfig;
use super::operators;
use crate::error::GaError;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Higher fitness is better.
    #[default]
    Maximize,
    /// Lower fitness is better.
    Minimize,
}

impl Direction {
    /// Returns `true` if `candidate` is strictly better than `incumbent`.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Maximize => candidate > incumbent,
            Direction::Minimize => candidate < incumbent,
        }
    }

    /// Orders two fitness values best-first.
    ///
    /// Incomparable values are treated as equal; the engine rejects NaN
    /// fitness before anything is ranked.
    pub fn best_first(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Direction::Maximize => ord.reverse(),
            Direction::Minimize => ord,
        }
    }
}

/// A candidate solution: a fixed-length binary genotype plus its fitness.
///
/// Fitness is `None` until the engine evaluates the candidate and is reset
/// whenever the genes change. The identity key is always derived from the
/// genes, so it can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    genes: Vec<bool>,
    fitness: Option<f64>,
}

impl Chromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Creates a chromosome with a known fitness.
    pub fn with_fitness(genes: Vec<bool>, fitness: f64) -> Self {
        Self {
            genes,
            fitness: Some(fitness),
        }
    }

    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    /// Replaces the genotype and discards the fitness.
    pub fn set_genes(&mut self, genes: Vec<bool>) {
        self.genes = genes;
        self.fitness = None;
    }

    /// Fitness value, `0.0` while unevaluated.
    pub fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Identity key used for deduplication: one `'0'`/`'1'` per gene.
    pub fn key(&self) -> String {
        genome_key(&self.genes)
    }

    /// Number of selected genes.
    pub fn selected_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.key(), self.fitness())
    }
}

/// Renders a genotype as its identity key.
pub fn genome_key(genes: &[bool]) -> String {
    genes.iter().map(|&g| if g { '1' } else { '0' }).collect()
}

/// Read-only dataset handed to every operator.
///
/// The engine never looks inside; it only uses the column count to size
/// genotypes when the problem does not say otherwise.
pub trait SeedData: Sync {
    /// Number of columns (features), i.e. the default genotype length.
    fn column_count(&self) -> usize;
}

impl SeedData for usize {
    fn column_count(&self) -> usize {
        *self
    }
}

impl<T: Sync> SeedData for [T] {
    fn column_count(&self) -> usize {
        self.len()
    }
}

impl<T: Sync> SeedData for Vec<T> {
    fn column_count(&self) -> usize {
        self.len()
    }
}

/// Defines a binary-encoded GA problem.
///
/// This is the operator set the engine is polymorphic over. Only
/// [`evaluate`](GaProblem::evaluate) is mandatory; every other slot has a
/// default for the unconstrained bit-vector case.
///
/// The implementation is constructed once and handed to the engine; it is
/// never swapped mid-run. Any memoization of fitness values belongs to the
/// implementation (see [`FitnessCache`](crate::features::FitnessCache)).
///
/// Operators must preserve the genotype length; the engine checks this and
/// fails the run with [`GaError::GenotypeLength`](crate::GaError) otherwise.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the engine may evaluate
/// candidates in parallel (`parallel` feature).
pub trait GaProblem: Send + Sync {
    /// The dataset type passed to every operator.
    type Data: SeedData + ?Sized;

    /// Checks that the problem can run on `data` under `config`.
    ///
    /// Called once when the engine is built, after the configuration itself
    /// has been validated. Problems that fix their optimization direction or
    /// require a minimum dataset shape reject mismatches here with
    /// [`GaError::Config`]. The default accepts everything.
    fn check(&self, _data: &Self::Data, _config: &GaConfig) -> Result<(), GaError> {
        Ok(())
    }

    /// Genotype length for `data`.
    ///
    /// Defaults to the dataset's column count.
    fn genome_length(&self, data: &Self::Data) -> usize {
        data.column_count()
    }

    /// Creates a random genotype.
    ///
    /// Default: every gene drawn independently and uniformly from {0, 1}.
    fn create_individual<R: Rng>(&self, data: &Self::Data, rng: &mut R) -> Vec<bool> {
        operators::uniform_genes(self.genome_length(data), rng)
    }

    /// Computes the fitness of a genotype.
    ///
    /// This is typically the most expensive operation. Errors abort the run.
    fn evaluate(&self, genes: &[bool], data: &Self::Data) -> anyhow::Result<f64>;

    /// Recombines two parents into two children.
    ///
    /// Default: single-point crossover.
    fn crossover<R: Rng>(
        &self,
        parent1: &[bool],
        parent2: &[bool],
        _data: &Self::Data,
        rng: &mut R,
    ) -> (Vec<bool>, Vec<bool>) {
        operators::single_point_crossover(parent1, parent2, rng)
    }

    /// Post-crossover repair of a child.
    ///
    /// Called on both children whenever crossover fired. The default is a
    /// no-op; encodings with cardinality bounds restore them here.
    fn repair<R: Rng>(&self, _genes: &mut Vec<bool>, _data: &Self::Data, _rng: &mut R) {}

    /// Mutates a genotype in place.
    ///
    /// Default: flip exactly one gene.
    fn mutate<R: Rng>(&self, genes: &mut Vec<bool>, _data: &Self::Data, rng: &mut R) {
        operators::flip_one(genes, rng);
    }

    /// Strong perturbation used when the search stagnates.
    ///
    /// Default: flip every gene.
    fn diversify<R: Rng>(&self, genes: Vec<bool>, _data: &Self::Data, _rng: &mut R) -> Vec<bool> {
        operators::flip_all(genes)
    }

    /// Called at the end of each generation with the generation's best fitness.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_tracks_genes() {
        let mut c = Chromosome::with_fitness(vec![true, false, true], 2.0);
        assert_eq!(c.key(), "101");
        c.set_genes(vec![false, false, true]);
        assert_eq!(c.key(), "001");
        assert!(!c.is_evaluated());
        assert_eq!(c.fitness(), 0.0);
    }

    #[test]
    fn test_direction_is_better_is_strict() {
        assert!(Direction::Maximize.is_better(2.0, 1.0));
        assert!(!Direction::Maximize.is_better(1.0, 1.0));
        assert!(Direction::Minimize.is_better(1.0, 2.0));
        assert!(!Direction::Minimize.is_better(2.0, 2.0));
    }

    #[test]
    fn test_best_first_ordering() {
        let mut v = vec![1.0, 3.0, 2.0];
        v.sort_by(|a, b| Direction::Maximize.best_first(*a, *b));
        assert_eq!(v, vec![3.0, 2.0, 1.0]);
        v.sort_by(|a, b| Direction::Minimize.best_first(*a, *b));
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_seed_data_impls() {
        assert_eq!(7usize.column_count(), 7);
        assert_eq!(vec!["a", "b"].column_count(), 2);
    }

    #[test]
    fn test_display() {
        let c = Chromosome::with_fitness(vec![true, true], 1.5);
        assert_eq!(c.to_string(), "[11]: 1.5");
    }
}
