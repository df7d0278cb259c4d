//! Parent selection.
//!
//! The engine uses tournament selection: sample `k` distinct candidates,
//! keep the fittest according to the run's [`Direction`].
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{Chromosome, Direction};
use rand::seq::index;
use rand::Rng;

/// Tournament selection: returns the index of the fittest of `k` candidates
/// sampled uniformly **without replacement**.
///
/// `k` is clamped to `[1, population.len()]`. Ties go to the candidate
/// sampled first. Separate calls are independent, so the same candidate can
/// win several tournaments.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(
    population: &[Chromosome],
    k: usize,
    direction: Direction,
    rng: &mut R,
) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );

    let n = population.len();
    let k = k.clamp(1, n);

    let mut members = index::sample(rng, n, k).into_iter();
    let mut best_idx = members.next().expect("k >= 1");
    for idx in members {
        if direction.is_better(population[idx].fitness(), population[best_idx].fitness()) {
            best_idx = idx;
        }
    }
    best_idx
}
