//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop and
//! its adaptive control policy.

use super::types::Direction;
use crate::error::GaError;

/// Fixed amount subtracted from the crossover probability at each decay event.
pub const CROSSOVER_DECAY: f64 = 0.1;

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, operator probabilities, elitism, tournament
/// pressure, the crossover decay schedule, diversification and early
/// stopping.
///
/// # Defaults
///
/// ```
/// use u_featsel::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_featsel::ga::{Direction, GaConfig};
///
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_generations(300)
///     .with_direction(Direction::Minimize)
///     .with_mutation_probability(0.01)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of candidates in every generation.
    pub population_size: usize,

    /// Generation budget, counting the first generation.
    ///
    /// A run that is never stopped early builds the first generation and
    /// then `generations - 1` further ones.
    pub generations: usize,

    /// Initial probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// Decays by [`CROSSOVER_DECAY`] every `max_no_improvement / 2`
    /// generations.
    pub crossover_probability: f64,

    /// Floor for the decayed crossover probability.
    pub min_crossover_probability: f64,

    /// Probability of mutating the children of a pair (0.0–1.0).
    pub mutation_probability: f64,

    /// Fraction of the population kept in the elite archive (0.0–1.0).
    ///
    /// `elite_size = floor(elitism * population_size)`; 0 disables elitism.
    pub elitism: f64,

    /// Whether fitness is maximized or minimized.
    pub direction: Direction,

    /// Consecutive generations without strict improvement before stopping.
    ///
    /// Set to 0 to disable early stopping (and crossover decay).
    pub max_no_improvement: usize,

    /// Tournament size as a fraction of the population, in (0.0, 1.0].
    pub tournament_percent: f64,

    /// Fraction of the population perturbed by a diversification burst.
    pub diversification_factor: f64,

    /// Diversification is considered every
    /// `generations / diversification_step` stagnating generations.
    pub diversification_step: usize,

    /// Log per-generation progress at `info` instead of `debug`.
    pub verbose: bool,

    /// Whether to evaluate candidates in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            crossover_probability: 0.8,
            min_crossover_probability: 0.1,
            mutation_probability: 0.2,
            elitism: 0.05,
            direction: Direction::Maximize,
            max_no_improvement: 20,
            tournament_percent: 0.2,
            diversification_factor: 0.1,
            diversification_step: 10,
            verbose: false,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the initial crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover probability floor.
    pub fn with_min_crossover_probability(mut self, p: f64) -> Self {
        self.min_crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the elitism fraction (0 disables elitism).
    pub fn with_elitism(mut self, fraction: f64) -> Self {
        self.elitism = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the optimization direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the no-improvement limit (0 to disable early stopping).
    pub fn with_max_no_improvement(mut self, limit: usize) -> Self {
        self.max_no_improvement = limit;
        self
    }

    /// Sets the tournament fraction.
    pub fn with_tournament_percent(mut self, fraction: f64) -> Self {
        self.tournament_percent = fraction.min(1.0);
        self
    }

    /// Sets the diversification factor.
    pub fn with_diversification_factor(mut self, factor: f64) -> Self {
        self.diversification_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Sets the diversification step count.
    pub fn with_diversification_step(mut self, step: usize) -> Self {
        self.diversification_step = step;
        self
    }

    /// Enables or disables verbose progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for feature-subset selection runs.
    ///
    /// - Population: 30, Generations: `generations`
    /// - Crossover: 0.8 decaying to 0.1, Mutation: 0.01
    /// - No-improvement limit: 10% of the budget, rounded
    pub fn feature_selection(generations: usize) -> Self {
        Self {
            population_size: 30,
            generations,
            crossover_probability: 0.8,
            min_crossover_probability: 0.1,
            mutation_probability: 0.01,
            max_no_improvement: (0.1 * generations as f64).round() as usize,
            ..Self::default()
        }
    }

    /// Capacity of the elite archive: `floor(elitism * population_size)`.
    pub fn elite_size(&self) -> usize {
        (self.elitism * self.population_size as f64) as usize
    }

    /// Candidates per tournament: `round(tournament_percent * population_size)`,
    /// clamped to at least 2 and at most the population size.
    pub fn tournament_size(&self) -> usize {
        let k = (self.tournament_percent * self.population_size as f64).round() as usize;
        k.max(2).min(self.population_size)
    }

    /// Generations between crossover decay events.
    ///
    /// 0 means the crossover probability never decays.
    pub fn decay_step(&self) -> usize {
        self.max_no_improvement / 2
    }

    /// Modulus applied to the no-improvement counter to trigger
    /// diversification. 0 means diversification never triggers.
    pub fn diversification_interval(&self) -> usize {
        self.generations / self.diversification_step.max(1)
    }

    /// Candidates perturbed by a diversification burst.
    pub fn diversification_count(&self) -> usize {
        let n = (self.diversification_factor * self.population_size as f64).round() as usize;
        n.min(self.population_size)
    }

    /// Validates the configuration.
    ///
    /// Returns [`GaError::Config`] with a description if any parameter is
    /// invalid.
    pub fn validate(&self) -> Result<(), GaError> {
        if self.population_size == 0 {
            return Err(GaError::Config("population_size must be at least 1".into()));
        }
        if self.generations == 0 {
            return Err(GaError::Config("generations must be at least 1".into()));
        }
        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("min_crossover_probability", self.min_crossover_probability),
            ("mutation_probability", self.mutation_probability),
            ("elitism", self.elitism),
            ("diversification_factor", self.diversification_factor),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GaError::Config(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if self.min_crossover_probability > self.crossover_probability {
            return Err(GaError::Config(format!(
                "min_crossover_probability ({}) exceeds crossover_probability ({})",
                self.min_crossover_probability, self.crossover_probability
            )));
        }
        if self.elite_size() > self.population_size {
            return Err(GaError::Config(format!(
                "elite size {} exceeds population size {}",
                self.elite_size(),
                self.population_size
            )));
        }
        if !(self.tournament_percent > 0.0 && self.tournament_percent <= 1.0) {
            return Err(GaError::Config(format!(
                "tournament_percent must be in (0, 1], got {}",
                self.tournament_percent
            )));
        }
        if self.diversification_step == 0 {
            return Err(GaError::Config("diversification_step must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.generations, 100);
        assert!((config.crossover_probability - 0.8).abs() < 1e-10);
        assert!((config.min_crossover_probability - 0.1).abs() < 1e-10);
        assert!((config.mutation_probability - 0.2).abs() < 1e-10);
        assert!((config.elitism - 0.05).abs() < 1e-10);
        assert_eq!(config.direction, Direction::Maximize);
        assert_eq!(config.max_no_improvement, 20);
        assert_eq!(config.diversification_step, 10);
        assert!(!config.verbose);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_generations(1000)
            .with_crossover_probability(0.9)
            .with_min_crossover_probability(0.2)
            .with_mutation_probability(0.05)
            .with_elitism(0.1)
            .with_direction(Direction::Minimize)
            .with_max_no_improvement(100)
            .with_tournament_percent(0.1)
            .with_diversification_factor(0.3)
            .with_diversification_step(20)
            .with_verbose(true)
            .with_parallel(true)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.generations, 1000);
        assert!((config.crossover_probability - 0.9).abs() < 1e-10);
        assert!((config.min_crossover_probability - 0.2).abs() < 1e-10);
        assert!((config.mutation_probability - 0.05).abs() < 1e-10);
        assert_eq!(config.direction, Direction::Minimize);
        assert_eq!(config.max_no_improvement, 100);
        assert_eq!(config.diversification_step, 20);
        assert!(config.verbose);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_elitism(1.5)
            .with_crossover_probability(-0.5)
            .with_mutation_probability(2.0);

        assert!((config.elitism - 1.0).abs() < 1e-10);
        assert!((config.crossover_probability - 0.0).abs() < 1e-10);
        assert!((config.mutation_probability - 1.0).abs() < 1e-10);
    }

    // ---- Derived sizes ----

    #[test]
    fn test_elite_size_floors() {
        let config = GaConfig::default().with_population_size(30).with_elitism(0.05);
        assert_eq!(config.elite_size(), 1);
        let config = GaConfig::default().with_population_size(19).with_elitism(0.05);
        assert_eq!(config.elite_size(), 0);
    }

    #[test]
    fn test_tournament_size_rounds_and_clamps() {
        let config = GaConfig::default().with_population_size(50);
        assert_eq!(config.tournament_size(), 10);
        let config = GaConfig::default().with_population_size(4);
        // round(0.8) = 1, clamped to 2
        assert_eq!(config.tournament_size(), 2);
        let config = GaConfig::default().with_population_size(1);
        assert_eq!(config.tournament_size(), 1);
        let config = GaConfig::default()
            .with_population_size(30)
            .with_tournament_percent(0.25);
        // round(7.5) = 8
        assert_eq!(config.tournament_size(), 8);
    }

    #[test]
    fn test_decay_step_and_interval() {
        let config = GaConfig::default()
            .with_max_no_improvement(5)
            .with_generations(300)
            .with_diversification_step(10);
        assert_eq!(config.decay_step(), 2);
        assert_eq!(config.diversification_interval(), 30);

        let config = GaConfig::default().with_generations(5);
        assert_eq!(config.diversification_interval(), 0);
    }

    #[test]
    fn test_diversification_count() {
        let config = GaConfig::default().with_population_size(30);
        assert_eq!(config.diversification_count(), 3);
        let config = GaConfig::default()
            .with_population_size(4)
            .with_diversification_factor(1.0);
        assert_eq!(config.diversification_count(), 4);
    }

    // ---- Validation ----

    #[test]
    fn test_validate_zero_population() {
        let config = GaConfig::default().with_population_size(0);
        assert!(matches!(config.validate(), Err(GaError::Config(_))));
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_generations(0);
        assert!(matches!(config.validate(), Err(GaError::Config(_))));
    }

    #[test]
    fn test_validate_floor_above_initial() {
        let config = GaConfig::default()
            .with_crossover_probability(0.3)
            .with_min_crossover_probability(0.5);
        assert!(matches!(config.validate(), Err(GaError::Config(_))));
    }

    #[test]
    fn test_validate_unclamped_fields() {
        let mut config = GaConfig::default();
        config.mutation_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = GaConfig::default();
        config.elitism = 2.0;
        assert!(config.validate().is_err());

        let mut config = GaConfig::default();
        config.crossover_probability = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_tournament_percent() {
        let config = GaConfig::default().with_tournament_percent(0.0);
        assert!(config.validate().is_err());
        let config = GaConfig::default().with_tournament_percent(-0.2);
        assert!(config.validate().is_err());
        let config = GaConfig::default().with_tournament_percent(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_diversification_step() {
        let config = GaConfig::default().with_diversification_step(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_elitism_is_valid() {
        let config = GaConfig::default().with_population_size(10).with_elitism(1.0);
        assert_eq!(config.elite_size(), 10);
        assert!(config.validate().is_ok());
    }

    // ---- Presets ----

    #[test]
    fn test_preset_feature_selection() {
        let config = GaConfig::feature_selection(300);
        assert_eq!(config.population_size, 30);
        assert_eq!(config.generations, 300);
        assert_eq!(config.max_no_improvement, 30);
        assert!((config.mutation_probability - 0.01).abs() < 1e-15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_chainable() {
        let config = GaConfig::feature_selection(100)
            .with_population_size(75)
            .with_seed(42);
        assert_eq!(config.population_size, 75);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_no_improvement, 10);
    }
}
