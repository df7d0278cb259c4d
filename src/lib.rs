//! Evolutionary feature-subset selection.
//!
//! An adaptive binary Genetic Algorithm that searches for the subset of
//! feature columns optimizing a user-supplied quality metric:
//!
//! - **GA engine** ([`ga`]): population store, best-ever elite archive,
//!   pluggable operator set and the generational driver.
//! - **Adaptive control** ([`ga::AdaptiveControl`]): stagnation tracking,
//!   crossover-probability decay, diversification bursts and early stop.
//! - **Feature selection** ([`features`]): feature tables, a
//!   cardinality-constrained subset problem with memoized fitness, and
//!   scorers.
//! - **Reporting** ([`report`]): delimited run reports and elapsed-time
//!   formatting.
//!
//! # Example
//!
//! ```
//! use u_featsel::features::{FeatureTable, SubsetBounds, SubsetProblem, VarianceScorer};
//! use u_featsel::ga::{GaConfig, GaRunner};
//!
//! let mut table = FeatureTable::new(
//!     vec!["a".into(), "b".into(), "c".into(), "d".into()],
//!     vec![
//!         vec![0.0, 1.0, 0.0, 1.0],
//!         vec![0.2, 0.3, 0.2, 0.3],
//!         vec![5.0, 5.0, 5.0, 5.0],
//!         vec![0.0, 0.5, 1.0, 0.5],
//!     ],
//! )?;
//! table.normalize_min_max();
//!
//! let problem = SubsetProblem::new(SubsetBounds::new(1, 2)?, VarianceScorer::new());
//! let config = GaConfig::feature_selection(30)
//!     .with_population_size(12)
//!     .with_seed(7);
//! let result = GaRunner::run(&problem, &table, &config)?;
//! assert!(result.best_fitness > 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod features;
pub mod ga;
pub mod random;
pub mod report;

pub use error::{DataError, GaError, ReportError};
