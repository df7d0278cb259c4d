//! Adaptive run control.
//!
//! [`AdaptiveControl`] is consulted once per completed generation. It tracks
//! the best fitness so far, counts generations without strict improvement,
//! decays the crossover probability on a fixed schedule, raises the
//! diversification flag and decides when to stop early.

use super::config::{GaConfig, CROSSOVER_DECAY};
use super::types::Direction;

/// What the driver should do after a generation has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlDecision {
    /// The no-improvement limit has not been reached.
    Continue,
    /// The no-improvement limit was reached.
    Stop,
}

/// Per-generation report produced by [`AdaptiveControl::observe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// The generation's best fitness strictly beat the previous best.
    pub improved: bool,
    /// Best fitness before this generation was observed.
    pub previous_best: f64,
    /// The crossover probability was decayed at this generation.
    pub decayed: bool,
    /// Diversification was scheduled for the next generation.
    pub diversify: bool,
    pub decision: ControlDecision,
}

/// Run controller state.
#[derive(Debug, Clone)]
pub struct AdaptiveControl {
    direction: Direction,
    crossover_probability: f64,
    min_crossover_probability: f64,
    max_no_improvement: usize,
    decay_step: usize,
    diversification_interval: usize,
    best_so_far: f64,
    no_improvement: usize,
    decay_count: usize,
    diversify_pending: bool,
}

impl AdaptiveControl {
    /// Starts a run from the first generation's best fitness.
    pub fn new(config: &GaConfig, initial_best: f64) -> Self {
        Self {
            direction: config.direction,
            crossover_probability: config.crossover_probability,
            min_crossover_probability: config.min_crossover_probability,
            max_no_improvement: config.max_no_improvement,
            decay_step: config.decay_step(),
            diversification_interval: config.diversification_interval(),
            best_so_far: initial_best,
            no_improvement: 0,
            decay_count: 0,
            diversify_pending: false,
        }
    }

    /// Observes the best fitness of a newly ranked generation.
    pub fn observe(&mut self, generation_best: f64) -> Observation {
        let previous_best = self.best_so_far;
        let improved = self.direction.is_better(generation_best, self.best_so_far);
        if improved {
            self.best_so_far = generation_best;
            self.no_improvement = 0;
        } else {
            self.no_improvement += 1;
        }

        // Decay follows elapsed generations, not stagnation.
        self.decay_count += 1;
        let decayed = self.decay_step > 0 && self.decay_count == self.decay_step;
        if decayed {
            self.crossover_probability = (self.crossover_probability - CROSSOVER_DECAY)
                .max(self.min_crossover_probability);
            self.decay_count = 0;
        }

        let diversify = self.diversification_interval > 0
            && self.no_improvement % self.diversification_interval == 0;
        if diversify {
            self.diversify_pending = true;
        }

        let decision = if self.max_no_improvement > 0
            && self.no_improvement >= self.max_no_improvement
        {
            ControlDecision::Stop
        } else {
            ControlDecision::Continue
        };

        Observation {
            improved,
            previous_best,
            decayed,
            diversify,
            decision,
        }
    }

    /// Consumes the one-shot diversification flag.
    pub fn take_diversify(&mut self) -> bool {
        std::mem::take(&mut self.diversify_pending)
    }

    pub fn diversify_pending(&self) -> bool {
        self.diversify_pending
    }

    /// Current (possibly decayed) crossover probability.
    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn best_so_far(&self) -> f64 {
        self.best_so_far
    }

    /// Consecutive generations without strict improvement.
    pub fn no_improvement(&self) -> usize {
        self.no_improvement
    }
}
