//! Generic binary-genotype genetic operators.
//!
//! These are the defaults behind [`GaProblem`](super::GaProblem) for the
//! unconstrained bit-vector case, plus the building blocks that
//! cardinality-constrained encodings reuse. They operate on `&[bool]`
//! genotypes and know nothing about the features behind the bits.
//!
//! # Creation
//!
//! - [`uniform_genes`]: every gene an independent fair coin, O(n)
//! - [`exact_count_genes`]: exactly `k` ones at random positions, O(n)
//!
//! # Crossover
//!
//! - [`single_point_crossover`]: cut at a uniform index in `[1, n-1]`, splice, O(n)
//!
//! # Mutation and perturbation
//!
//! - [`flip_one`]: flip one random gene, O(1)
//! - [`flip_all`]: flip every gene (diversification), O(n)
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

use rand::seq::SliceRandom;
use rand::Rng;

// ============================================================================
// Creation
// ============================================================================

/// Draws `n` genes independently and uniformly from {0, 1}.
pub fn uniform_genes<R: Rng>(n: usize, rng: &mut R) -> Vec<bool> {
    (0..n).map(|_| rng.random_bool(0.5)).collect()
}

/// Builds a genotype of length `n` with exactly `k` selected genes at
/// uniformly random positions.
///
/// # Panics
/// Panics if `k > n`.
pub fn exact_count_genes<R: Rng>(n: usize, k: usize, rng: &mut R) -> Vec<bool> {
    assert!(k <= n, "cannot select {k} genes out of {n}");
    let mut genes = vec![false; n];
    genes[..k].fill(true);
    genes.shuffle(rng);
    genes
}

// ============================================================================
// Crossover
// ============================================================================

/// Single-point crossover.
///
/// Draws a cut index uniformly in `[1, n-1]`; child 1 takes parent 1's
/// prefix and parent 2's suffix, child 2 the converse. Genotypes shorter
/// than two genes have no valid cut and are returned unchanged.
///
/// No cardinality repair happens here; see
/// [`GaProblem::repair`](super::GaProblem::repair).
///
/// # Panics
/// Panics if parents have different lengths.
pub fn single_point_crossover<R: Rng>(
    parent1: &[bool],
    parent2: &[bool],
    rng: &mut R,
) -> (Vec<bool>, Vec<bool>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cut = rng.random_range(1..n);
    let mut child1 = Vec::with_capacity(n);
    child1.extend_from_slice(&parent1[..cut]);
    child1.extend_from_slice(&parent2[cut..]);
    let mut child2 = Vec::with_capacity(n);
    child2.extend_from_slice(&parent2[..cut]);
    child2.extend_from_slice(&parent1[cut..]);

    (child1, child2)
}

// ============================================================================
// Mutation
// ============================================================================

/// Flips exactly one gene chosen uniformly at random.
///
/// # Complexity
/// O(1)
pub fn flip_one<R: Rng>(genes: &mut [bool], rng: &mut R) {
    if genes.is_empty() {
        return;
    }
    let idx = rng.random_range(0..genes.len());
    genes[idx] = !genes[idx];
}

/// Flips every gene.
pub fn flip_all(mut genes: Vec<bool>) -> Vec<bool> {
    for g in &mut genes {
        *g = !*g;
    }
    genes
}

// ============================================================================
// Tests
// ============================================================================
