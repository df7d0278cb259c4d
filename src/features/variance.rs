//! Average-variance subset scorer.

use super::subset::SubsetScorer;
use super::table::FeatureTable;
use crate::ga::Direction;

/// Scores a subset by the mean population variance of its columns.
///
/// Higher is better: a subset of high-variance columns separates entities
/// more. Run it on a min-max normalized table so columns are comparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarianceScorer;

impl VarianceScorer {
    pub fn new() -> Self {
        Self
    }
}

/// Population variance (divides by `n`). Zero for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

impl SubsetScorer for VarianceScorer {
    fn score(&self, table: &FeatureTable, selected: &[usize]) -> anyhow::Result<f64> {
        if selected.is_empty() {
            return Ok(0.0);
        }
        if let Some(&bad) = selected.iter().find(|&&i| i >= table.n_columns()) {
            anyhow::bail!(
                "column index {bad} out of range for a table with {} columns",
                table.n_columns()
            );
        }
        let total: f64 = selected
            .iter()
            .map(|&i| population_variance(table.column(i)))
            .sum();
        Ok(total / selected.len() as f64)
    }

    fn out_of_bounds_score(&self) -> f64 {
        0.0
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }
}
