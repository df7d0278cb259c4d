//! Population store: the current generation and the elite archive.

use super::types::{Chromosome, Direction};
use std::collections::HashSet;

/// The current generation, ranked best-first after each evaluation pass.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Chromosome>,
    direction: Direction,
}

impl Population {
    /// Creates an empty store for the given direction.
    pub fn new(direction: Direction) -> Self {
        Self {
            members: Vec::new(),
            direction,
        }
    }

    /// Installs a freshly built generation, replacing the previous one.
    pub fn replace(&mut self, members: Vec<Chromosome>) {
        self.members = members;
    }

    /// Stable sort by fitness, best first for the configured direction.
    ///
    /// Equal fitness keeps the original order, which keeps runs
    /// reproducible under a fixed seed.
    pub fn rank(&mut self) {
        let direction = self.direction;
        self.members
            .sort_by(|a, b| direction.best_first(a.fitness(), b.fitness()));
    }

    /// The first member. Only meaningful after [`rank`](Self::rank).
    ///
    /// Returns `None` before any generation exists.
    pub fn best(&self) -> Option<&Chromosome> {
        self.members.first()
    }

    pub fn members(&self) -> &[Chromosome] {
        &self.members
    }
}

/// Bounded, deduplicated store of the best candidates seen during a run.
///
/// Members are kept sorted best-first for the run's direction, so a
/// minimizing run archives its lowest fitness values. No two members share
/// an identity key and the archive never exceeds its capacity.
#[derive(Debug, Clone)]
pub struct EliteArchive {
    members: Vec<Chromosome>,
    keys: HashSet<String>,
    capacity: usize,
    direction: Direction,
}

impl EliteArchive {
    /// Creates an empty archive holding at most `capacity` members.
    pub fn new(capacity: usize, direction: Direction) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            keys: HashSet::with_capacity(capacity),
            capacity,
            direction,
        }
    }

    /// Offers a candidate to the archive.
    ///
    /// The candidate enters only if its key is new and either there is room
    /// or it is strictly better than the current worst member, which it
    /// then evicts. Returns whether the candidate was archived.
    pub fn consider(&mut self, candidate: &Chromosome) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let key = candidate.key();
        if self.keys.contains(&key) {
            return false;
        }

        if self.members.len() >= self.capacity {
            match self.members.last() {
                Some(worst) if self.direction.is_better(candidate.fitness(), worst.fitness()) => {}
                _ => return false,
            }
            if let Some(evicted) = self.members.pop() {
                self.keys.remove(&evicted.key());
            }
        }

        // Insert after every member at least as good, keeping the order stable.
        let direction = self.direction;
        let pos = self
            .members
            .partition_point(|m| !direction.is_better(candidate.fitness(), m.fitness()));
        self.members.insert(pos, candidate.clone());
        self.keys.insert(key);
        true
    }

    /// Best archived candidate.
    pub fn best(&self) -> Option<&Chromosome> {
        self.members.first()
    }

    /// Members, best first.
    pub fn members(&self) -> &[Chromosome] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.keys.clear();
    }
}
