use crate::chromosome::Chromosome;
use crate::config::GaParameters;
use crate::error::Error;
use crate::ga::fitness::FitnessEvaluator;
use crate::ga::population::Population;
use crate::interface::{Interface, Message};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// How often a progress message is posted, in generations.
const REPORT_EVERY: usize = 10;

/// Drives the generation loop and tracks the best chromosome seen.
///
/// The RNG is owned by the engine and seeded up front, so a run is fully
/// determined by its parameters and seed.
pub struct GaEngine {
    params: GaParameters,
    rng: StdRng,
    cancel: Option<Arc<AtomicBool>>,
    best: Option<(Chromosome, f64)>,
}

impl GaEngine {
    pub fn new(params: GaParameters) -> Self {
        Self {
            rng: StdRng::seed_from_u64(params.seed),
            params,
            cancel: None,
            best: None,
        }
    }

    /// Install a flag checked between generations; when it flips, the run
    /// stops early and the best-so-far stands.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run the configured number of generations against the evaluator.
    pub fn run(
        &mut self,
        evaluator: &FitnessEvaluator,
        interface: &dyn Interface,
    ) -> Result<(), Error> {
        interface.post(Message::Parameters {
            population_size: self.params.population_size,
            generations: self.params.generations,
            crossover_rate: self.params.crossover_rate,
            mutation_rate: self.params.mutation_rate,
            tournament_size: self.params.tournament_size,
        });

        let start = Instant::now();
        let mut population = Population::initialize(&self.params, evaluator, &mut self.rng)?;
        interface.post(Message::Elapsed {
            micros: start.elapsed().as_micros() / self.params.population_size as u128,
        });
        self.track_best(&population, 0, interface)?;

        for generation in 1..=self.params.generations {
            if self.cancelled() {
                break;
            }
            population.evolve(&self.params, evaluator, &mut self.rng)?;
            self.track_best(&population, generation, interface)?;

            if generation % REPORT_EVERY == 0 || generation == self.params.generations {
                interface.post(Message::Progress {
                    generation,
                    best_fitness: self.best_fitness(),
                });
            }
        }

        if let Some((chromosome, fitness)) = &self.best {
            interface.post(Message::BetterSolution {
                generation: self.params.generations,
                fitness: *fitness,
                shapes: serde_yaml::to_string(&chromosome.dump_shapes())?,
                save: true,
            });
        }
        Ok(())
    }

    /// Best-so-far is only updated after a whole generation is evaluated.
    fn track_best(
        &mut self,
        population: &Population,
        generation: usize,
        interface: &dyn Interface,
    ) -> Result<(), Error> {
        let (candidate, fitness) = population.best();
        let improved = match &self.best {
            Some((_, best_fitness)) => fitness > *best_fitness,
            None => true,
        };
        if improved {
            self.best = Some((candidate.clone(), fitness));
            interface.post(Message::BetterSolution {
                generation,
                fitness,
                shapes: serde_yaml::to_string(&candidate.dump_shapes())?,
                save: false,
            });
        }
        Ok(())
    }

    pub fn best_chromosome(&self) -> &Chromosome {
        &self
            .best
            .as_ref()
            .expect("engine has not run yet")
            .0
    }

    pub fn best_fitness(&self) -> f64 {
        self.best.as_ref().map(|(_, fitness)| *fitness).unwrap_or(0.0)
    }
}
