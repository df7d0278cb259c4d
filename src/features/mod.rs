//! Feature-subset selection on top of the GA engine.
//!
//! - [`FeatureTable`]: named numeric columns, the dataset the GA searches over
//! - [`SubsetProblem`]: a [`GaProblem`](crate::ga::GaProblem) whose genotypes
//!   select between `min_size` and `max_size` columns
//! - [`SubsetScorer`]: the quality metric for a subset; [`VarianceScorer`]
//!   is the built-in one, [`ScoreFn`] wraps a closure
//! - [`FitnessCache`]: per-problem memo of evaluated genotypes

mod cache;
mod subset;
mod table;
mod variance;

pub use cache::FitnessCache;
pub use subset::{ScoreFn, SubsetBounds, SubsetProblem, SubsetScorer};
pub use table::FeatureTable;
pub use variance::{population_variance, VarianceScorer};
