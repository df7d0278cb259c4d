//! Genetic Algorithm engine over binary genotypes.
//!
//! A generic, problem-agnostic GA built for feature-subset search. Users
//! plug a problem in by implementing [`GaProblem`], which supplies how to
//! create, evaluate, recombine, repair, mutate and diversify genotypes.
//!
//! # Core Types
//!
//! - [`Chromosome`]: A candidate genotype with its cached fitness
//! - [`GaProblem`]: Operator set; only `evaluate` is mandatory
//! - [`SeedData`]: Read-only dataset handed to every operator
//!
//! # Components
//!
//! - [`Population`] / [`EliteArchive`]: current generation and best-ever store
//! - [`GeneticAlgorithm`]: the generational driver
//! - [`AdaptiveControl`]: stagnation tracking, crossover decay,
//!   diversification trigger and early stop
//! - [`GaRunner`]: one-call execution returning a [`GaResult`]
//!
//! # Submodules
//!
//! - [`operators`]: Default binary creation, crossover and mutation operators
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Eiben, Hinterding & Michalewicz (1999), *Parameter Control in Evolutionary Algorithms*

mod config;
mod control;
mod engine;
pub mod operators;
mod population;
mod runner;
mod selection;
mod types;

pub use config::{GaConfig, CROSSOVER_DECAY};
pub use control::{AdaptiveControl, ControlDecision, Observation};
pub use engine::{GenerationIter, GenerationView, GeneticAlgorithm, Phase, Termination};
pub use population::{EliteArchive, Population};
pub use runner::{GaResult, GaRunner};
pub use selection::tournament;
pub use types::{genome_key, Chromosome, Direction, GaProblem, SeedData};
