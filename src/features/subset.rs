//! Cardinality-constrained feature-subset problem.
//!
//! [`SubsetProblem`] plugs a [`SubsetScorer`] into the GA: genotypes select
//! between `min_size` and `max_size` columns of a [`FeatureTable`], the
//! operators keep them inside those bounds, and fitness values are memoized
//! per genotype.

use super::cache::FitnessCache;
use super::table::FeatureTable;
use crate::error::GaError;
use crate::ga::{genome_key, operators, Direction, GaConfig, GaProblem};
use rand::seq::IteratorRandom;
use rand::Rng;

/// Inclusive bounds on the number of selected features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(usize, usize)", into = "(usize, usize)")
)]
pub struct SubsetBounds {
    min_size: usize,
    max_size: usize,
}

impl SubsetBounds {
    /// Fails with [`GaError::Config`] if `min_size > max_size`.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self, GaError> {
        if min_size > max_size {
            return Err(GaError::Config(format!(
                "min subset size {min_size} exceeds max subset size {max_size}"
            )));
        }
        Ok(Self { min_size, max_size })
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min_size..=self.max_size).contains(&count)
    }
}

/// `(min_size, max_size)`, checked like [`SubsetBounds::new`].
impl TryFrom<(usize, usize)> for SubsetBounds {
    type Error = GaError;

    fn try_from((min_size, max_size): (usize, usize)) -> Result<Self, GaError> {
        Self::new(min_size, max_size)
    }
}

impl From<SubsetBounds> for (usize, usize) {
    fn from(bounds: SubsetBounds) -> Self {
        (bounds.min_size, bounds.max_size)
    }
}

/// Scores a set of selected columns.
///
/// This is the seam where concrete quality metrics attach: average
/// variance, silhouette or inertia of a clustering over the selected
/// columns.
pub trait SubsetScorer: Send + Sync {
    /// Scores the columns `selected` (indices into `table`).
    ///
    /// Only called for subsets within the problem's bounds.
    fn score(&self, table: &FeatureTable, selected: &[usize]) -> anyhow::Result<f64>;

    /// Score given to subsets outside the bounds.
    ///
    /// Must be the worst value for [`direction`](Self::direction).
    fn out_of_bounds_score(&self) -> f64 {
        match self.direction() {
            Direction::Maximize => 0.0,
            Direction::Minimize => f64::INFINITY,
        }
    }

    /// Whether higher or lower scores are better.
    fn direction(&self) -> Direction;
}

/// Adapts a closure into a [`SubsetScorer`].
///
/// ```
/// use u_featsel::features::{FeatureTable, ScoreFn, SubsetScorer};
/// use u_featsel::ga::Direction;
///
/// // Fewer columns is better.
/// let scorer = ScoreFn::new(Direction::Minimize, |_t: &FeatureTable, sel: &[usize]| {
///     Ok(sel.len() as f64)
/// });
/// assert_eq!(scorer.out_of_bounds_score(), f64::INFINITY);
/// ```
pub struct ScoreFn<F> {
    direction: Direction,
    out_of_bounds: Option<f64>,
    f: F,
}

impl<F> ScoreFn<F>
where
    F: Fn(&FeatureTable, &[usize]) -> anyhow::Result<f64> + Send + Sync,
{
    pub fn new(direction: Direction, f: F) -> Self {
        Self {
            direction,
            out_of_bounds: None,
            f,
        }
    }

    /// Overrides the score of out-of-bounds subsets.
    pub fn with_out_of_bounds_score(mut self, score: f64) -> Self {
        self.out_of_bounds = Some(score);
        self
    }
}

impl<F> SubsetScorer for ScoreFn<F>
where
    F: Fn(&FeatureTable, &[usize]) -> anyhow::Result<f64> + Send + Sync,
{
    fn score(&self, table: &FeatureTable, selected: &[usize]) -> anyhow::Result<f64> {
        (self.f)(table, selected)
    }

    fn out_of_bounds_score(&self) -> f64 {
        self.out_of_bounds.unwrap_or(match self.direction {
            Direction::Maximize => 0.0,
            Direction::Minimize => f64::INFINITY,
        })
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

/// Feature-subset selection over a [`FeatureTable`].
pub struct SubsetProblem<S> {
    bounds: SubsetBounds,
    scorer: S,
    cache: FitnessCache,
}

impl<S: SubsetScorer> SubsetProblem<S> {
    pub fn new(bounds: SubsetBounds, scorer: S) -> Self {
        Self {
            bounds,
            scorer,
            cache: FitnessCache::new(),
        }
    }

    pub fn bounds(&self) -> SubsetBounds {
        self.bounds
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Direction the GA must be configured with for this scorer.
    pub fn direction(&self) -> Direction {
        self.scorer.direction()
    }

    pub fn cache(&self) -> &FitnessCache {
        &self.cache
    }

    /// Checks the bounds against a table before a run.
    pub fn validate(&self, table: &FeatureTable) -> Result<(), GaError> {
        if self.bounds.min_size > table.n_columns() {
            return Err(GaError::Config(format!(
                "min subset size {} exceeds the {} available features",
                self.bounds.min_size,
                table.n_columns()
            )));
        }
        Ok(())
    }
}

impl<S: SubsetScorer> GaProblem for SubsetProblem<S> {
    type Data = FeatureTable;

    /// Rejects bounds the table cannot satisfy and a run direction that
    /// disagrees with the scorer's.
    fn check(&self, data: &FeatureTable, config: &GaConfig) -> Result<(), GaError> {
        self.validate(data)?;
        if config.direction != self.direction() {
            return Err(GaError::Config(format!(
                "the scorer is optimized with {:?} but the run is configured with {:?}",
                self.direction(),
                config.direction
            )));
        }
        Ok(())
    }

    /// Exactly `k` ones, `k` uniform in `[min_size, max_size]` (capped by
    /// the number of columns).
    fn create_individual<R: Rng>(&self, data: &FeatureTable, rng: &mut R) -> Vec<bool> {
        let n = data.n_columns();
        let hi = self.bounds.max_size.min(n);
        let lo = self.bounds.min_size.min(hi);
        let k = rng.random_range(lo..=hi);
        operators::exact_count_genes(n, k, rng)
    }

    fn evaluate(&self, genes: &[bool], data: &FeatureTable) -> anyhow::Result<f64> {
        let key = genome_key(genes);
        self.cache.get_or_try_insert_with(&key, || {
            let selected = FeatureTable::selected_indices(genes);
            if self.bounds.contains(selected.len()) {
                self.scorer.score(data, &selected)
            } else {
                Ok(self.scorer.out_of_bounds_score())
            }
        })
    }

    /// Adds random columns until `min_size` is met, removes random ones
    /// until `max_size` is met.
    fn repair<R: Rng>(&self, genes: &mut Vec<bool>, _data: &FeatureTable, rng: &mut R) {
        let mut count = genes.iter().filter(|&&g| g).count();
        while count < self.bounds.min_size {
            match pick(genes, false, rng) {
                Some(i) => genes[i] = true,
                None => break,
            }
            count += 1;
        }
        while count > self.bounds.max_size {
            match pick(genes, true, rng) {
                Some(i) => genes[i] = false,
                None => break,
            }
            count -= 1;
        }
    }

    /// Bound-preserving mutation.
    ///
    /// At the lower bound a column is added, at the upper bound one is
    /// removed, otherwise a random gene flips. When both bounds coincide
    /// one selected column is swapped for an unselected one.
    fn mutate<R: Rng>(&self, genes: &mut Vec<bool>, _data: &FeatureTable, rng: &mut R) {
        let count = genes.iter().filter(|&&g| g).count();
        let SubsetBounds { min_size, max_size } = self.bounds;

        if min_size == max_size && count == min_size {
            if let (Some(on), Some(off)) = (pick(genes, true, rng), pick(genes, false, rng)) {
                genes[on] = false;
                genes[off] = true;
            }
        } else if count <= min_size {
            if let Some(i) = pick(genes, false, rng) {
                genes[i] = true;
            }
        } else if count >= max_size {
            if let Some(i) = pick(genes, true, rng) {
                genes[i] = false;
            }
        } else {
            operators::flip_one(genes, rng);
        }
    }

    /// Complements the genotype, then repairs it back into bounds.
    fn diversify<R: Rng>(&self, genes: Vec<bool>, data: &FeatureTable, rng: &mut R) -> Vec<bool> {
        let mut genes = operators::flip_all(genes);
        self.repair(&mut genes, data, rng);
        genes
    }
}

/// Picks a uniformly random position whose gene equals `value`.
fn pick<R: Rng>(genes: &[bool], value: bool, rng: &mut R) -> Option<usize> {
    genes
        .iter()
        .enumerate()
        .filter(|&(_, &g)| g == value)
        .map(|(i, _)| i)
        .choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaRunner, GeneticAlgorithm};
    use crate::random::create_rng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table(n: usize) -> FeatureTable {
        let names = (0..n).map(|i| format!("f{i}")).collect();
        let columns = (0..n).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        FeatureTable::new(names, columns).unwrap()
    }

    fn count(genes: &[bool]) -> usize {
        genes.iter().filter(|&&g| g).count()
    }

    fn size_scorer() -> ScoreFn<impl Fn(&FeatureTable, &[usize]) -> anyhow::Result<f64> + Send + Sync> {
        ScoreFn::new(Direction::Maximize, |_t: &FeatureTable, sel: &[usize]| {
            Ok(sel.len() as f64)
        })
    }

    #[test]
    fn test_bounds_validation() {
        assert!(SubsetBounds::new(3, 6).is_ok());
        assert!(SubsetBounds::new(4, 4).is_ok());
        assert!(matches!(SubsetBounds::new(5, 2), Err(GaError::Config(_))));
    }

    #[test]
    fn test_bounds_from_tuple_is_checked() {
        assert!(matches!(SubsetBounds::try_from((5, 2)), Err(GaError::Config(_))));
        let bounds = SubsetBounds::try_from((2, 5)).unwrap();
        assert_eq!((bounds.min_size(), bounds.max_size()), (2, 5));
        assert_eq!(<(usize, usize)>::from(bounds), (2, 5));
    }

    #[test]
    fn test_create_within_bounds() {
        let problem = SubsetProblem::new(SubsetBounds::new(3, 6).unwrap(), size_scorer());
        let data = table(9);
        let mut rng = create_rng(42);
        let mut seen = [false; 10];
        for _ in 0..500 {
            let genes = problem.create_individual(&data, &mut rng);
            assert_eq!(genes.len(), 9);
            let k = count(&genes);
            assert!((3..=6).contains(&k));
            seen[k] = true;
        }
        assert!(seen[3] && seen[6], "both bounds must be reachable");
    }

    #[test]
    fn test_create_caps_at_column_count() {
        let problem = SubsetProblem::new(SubsetBounds::new(3, 10).unwrap(), size_scorer());
        let data = table(4);
        let mut rng = create_rng(1);
        for _ in 0..50 {
            let genes = problem.create_individual(&data, &mut rng);
            assert!(count(&genes) <= 4);
        }
    }

    #[test]
    fn test_mutate_preserves_bounds() {
        let problem = SubsetProblem::new(SubsetBounds::new(2, 4).unwrap(), size_scorer());
        let data = table(8);
        let mut rng = create_rng(3);
        let mut genes = problem.create_individual(&data, &mut rng);
        for _ in 0..1000 {
            problem.mutate(&mut genes, &data, &mut rng);
            assert!((2..=4).contains(&count(&genes)), "{genes:?}");
        }
    }

    #[test]
    fn test_mutate_at_bounds_moves_inward() {
        let problem = SubsetProblem::new(SubsetBounds::new(2, 4).unwrap(), size_scorer());
        let data = table(6);
        let mut rng = create_rng(3);

        let mut at_min = vec![true, true, false, false, false, false];
        problem.mutate(&mut at_min, &data, &mut rng);
        assert_eq!(count(&at_min), 3);

        let mut at_max = vec![true, true, true, true, false, false];
        problem.mutate(&mut at_max, &data, &mut rng);
        assert_eq!(count(&at_max), 3);
    }

    #[test]
    fn test_mutate_fixed_size_swaps() {
        let problem = SubsetProblem::new(SubsetBounds::new(3, 3).unwrap(), size_scorer());
        let data = table(6);
        let mut rng = create_rng(5);
        let mut genes = vec![true, true, true, false, false, false];
        let original = genes.clone();
        problem.mutate(&mut genes, &data, &mut rng);
        assert_eq!(count(&genes), 3);
        assert_ne!(genes, original);
    }

    #[test]
    fn test_repair_restores_bounds() {
        let problem = SubsetProblem::new(SubsetBounds::new(3, 5).unwrap(), size_scorer());
        let data = table(9);
        let mut rng = create_rng(11);

        let mut sparse = vec![false; 9];
        sparse[4] = true;
        problem.repair(&mut sparse, &data, &mut rng);
        assert_eq!(count(&sparse), 3);
        assert!(sparse[4], "repair must keep existing selections");

        let mut dense = vec![true; 9];
        problem.repair(&mut dense, &data, &mut rng);
        assert_eq!(count(&dense), 5);

        let mut fine = vec![true, true, true, true, false, false, false, false, false];
        let before = fine.clone();
        problem.repair(&mut fine, &data, &mut rng);
        assert_eq!(fine, before);
    }

    #[test]
    fn test_evaluate_out_of_bounds_uses_sentinel() {
        let problem = SubsetProblem::new(SubsetBounds::new(2, 3).unwrap(), size_scorer());
        let data = table(5);
        assert_eq!(problem.evaluate(&[true, false, false, false, false], &data).unwrap(), 0.0);
        assert_eq!(problem.evaluate(&[true, true, false, false, false], &data).unwrap(), 2.0);

        let minimize = SubsetProblem::new(
            SubsetBounds::new(2, 3).unwrap(),
            ScoreFn::new(Direction::Minimize, |_t: &FeatureTable, _s: &[usize]| Ok(1.0)),
        );
        assert_eq!(
            minimize.evaluate(&[true; 5], &data).unwrap(),
            f64::INFINITY
        );
    }

    #[test]
    fn test_out_of_bounds_override() {
        let scorer = ScoreFn::new(Direction::Maximize, |_t: &FeatureTable, _s: &[usize]| Ok(1.0))
            .with_out_of_bounds_score(-1.0);
        assert_eq!(scorer.out_of_bounds_score(), -1.0);
    }

    #[test]
    fn test_evaluate_is_memoized() {
        let calls = AtomicUsize::new(0);
        let scorer = ScoreFn::new(Direction::Maximize, |_t: &FeatureTable, sel: &[usize]| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(sel.iter().sum::<usize>() as f64)
        });
        let problem = SubsetProblem::new(SubsetBounds::new(1, 3).unwrap(), scorer);
        let data = table(4);
        let genes = [false, true, true, false];
        for _ in 0..5 {
            assert_eq!(problem.evaluate(&genes, &data).unwrap(), 3.0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(problem.cache().hits(), 4);
    }

    #[test]
    fn test_diversify_stays_in_bounds() {
        let problem = SubsetProblem::new(SubsetBounds::new(2, 3).unwrap(), size_scorer());
        let data = table(8);
        let mut rng = create_rng(8);
        let genes = vec![true, true, false, false, false, false, false, false];
        let out = problem.diversify(genes, &data, &mut rng);
        assert_eq!(count(&out), 3);
        assert!(!out[0] && !out[1]);
    }

    #[test]
    fn test_validate_against_table() {
        let problem = SubsetProblem::new(SubsetBounds::new(5, 6).unwrap(), size_scorer());
        assert!(problem.validate(&table(4)).is_err());
        assert!(problem.validate(&table(5)).is_ok());
    }

    #[test]
    fn test_engine_rejects_direction_mismatch() {
        let problem = SubsetProblem::new(
            SubsetBounds::new(2, 3).unwrap(),
            ScoreFn::new(Direction::Minimize, |_t: &FeatureTable, sel: &[usize]| {
                Ok(sel.len() as f64)
            }),
        );
        let data = table(6);
        let config = GaConfig::feature_selection(30).with_seed(1);
        assert_eq!(config.direction, Direction::Maximize);

        match GaRunner::run(&problem, &data, &config) {
            Err(GaError::Config(msg)) => assert!(msg.contains("Minimize"), "{msg}"),
            other => panic!("expected a configuration error, got {other:?}"),
        }
        assert!(problem.cache().is_empty(), "nothing may be evaluated");

        let config = config.with_direction(Direction::Minimize);
        let result = GaRunner::run(&problem, &data, &config).unwrap();
        assert_eq!(result.best_fitness, 2.0);
    }

    #[test]
    fn test_engine_rejects_unsatisfiable_bounds() {
        let problem = SubsetProblem::new(SubsetBounds::new(10, 12).unwrap(), size_scorer());
        let data = table(6);
        let config = GaConfig::feature_selection(30).with_seed(1);
        assert!(matches!(
            GeneticAlgorithm::new(&problem, &data, config),
            Err(GaError::Config(_))
        ));
        assert!(problem.cache().is_empty());
    }
}
