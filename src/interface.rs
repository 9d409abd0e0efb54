//! Output abstraction.
//!
//! Everything the optimizer wants to tell the user goes through a single
//! trait, so the command line and any future embedding only have to
//! implement one `post` method.

use serde::Serialize;
use serde_with::skip_serializing_none;

/// Messages reported during a run.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Resolved hyperparameters, sent once before the first generation.
    Parameters {
        population_size: usize,
        generations: usize,
        crossover_rate: f64,
        mutation_rate: f64,
        tournament_size: usize,
    },
    /// Time to evaluate the initial population, in microseconds.
    Elapsed { micros: u128 },
    /// Periodic progress: best fitness so far after `generation`.
    Progress { generation: usize, best_fitness: f64 },
    /// A chromosome better than anything seen before.
    BetterSolution {
        generation: usize,
        fitness: f64,
        /// Tuned breakpoints rendered as YAML, ready to be saved.
        shapes: String,
        save: bool,
    },
}

pub trait Interface {
    fn post(&self, message: Message);
}

/// Discards everything; used by tests and library embeddings that do not
/// care about progress.
pub struct Silent;

impl Interface for Silent {
    fn post(&self, _message: Message) {}
}
