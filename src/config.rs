//! Run configuration: an optional YAML file in which every field is
//! optional, resolved against built-in defaults. Command-line flags
//! override file values.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fs::read_to_string;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Offspring replace the population wholesale.
    Generational,
    /// Parents and offspring are merged and the top N survive.
    ElitistMerge,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub population_size: Option<usize>,
    pub generations: Option<usize>,
    pub crossover_rate: Option<f64>,
    pub mutation_rate: Option<f64>,
    pub tournament_size: Option<usize>,
    pub replacement: Option<ReplacementPolicy>,
    pub threads: Option<usize>,
    pub seed: Option<u64>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub train_split: Option<f64>,
    pub optimization: Option<OptimizationConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Fully resolved GA hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct GaParameters {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub replacement: ReplacementPolicy,
    /// 1 = sequential reference; anything else evaluates the population
    /// in parallel.
    pub threads: usize,
    pub seed: u64,
}

impl Default for GaParameters {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            tournament_size: 3,
            replacement: ReplacementPolicy::ElitistMerge,
            threads: 1,
            seed: 0,
        }
    }
}

impl GaParameters {
    pub fn resolve(config: &OptimizationConfig) -> Self {
        let defaults = Self::default();
        Self {
            population_size: config.population_size.unwrap_or(defaults.population_size),
            generations: config.generations.unwrap_or(defaults.generations),
            crossover_rate: config.crossover_rate.unwrap_or(defaults.crossover_rate),
            mutation_rate: config.mutation_rate.unwrap_or(defaults.mutation_rate),
            tournament_size: config.tournament_size.unwrap_or(defaults.tournament_size),
            replacement: config.replacement.unwrap_or(defaults.replacement),
            threads: config.threads.unwrap_or(defaults.threads),
            seed: config.seed.unwrap_or(defaults.seed),
        }
    }

    pub fn parallel(&self) -> bool {
        self.threads != 1
    }
}
