use crate::chromosome::Chromosome;
use crate::config::{GaParameters, ReplacementPolicy};
use crate::error::Error;
use crate::ga::fitness::FitnessEvaluator;
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

/// Initial chromosomes are defaults shaken hard before the search starts.
const INIT_MUTATION_RATE: f64 = 0.9;

/// A fixed-size population with its fitness values, kept in lockstep.
pub struct Population {
    pub chromosomes: Vec<Chromosome>,
    pub fitness: Vec<f64>,
}

impl Population {
    /// N mutated copies of the default chromosome, evaluated.
    pub fn initialize(
        params: &GaParameters,
        evaluator: &FitnessEvaluator,
        rng: &mut StdRng,
    ) -> Result<Self, Error> {
        if params.population_size == 0 {
            return Err(Error::EmptyBatch);
        }
        let mut chromosomes = Vec::with_capacity(params.population_size);
        for _ in 0..params.population_size {
            let mut chromosome = Chromosome::new();
            chromosome.mutate(INIT_MUTATION_RATE, rng);
            chromosomes.push(chromosome);
        }
        let fitness = evaluate_all(&chromosomes, evaluator, params.parallel())?;
        Ok(Self {
            chromosomes,
            fitness,
        })
    }

    /// Draw `tournament_size` indices with replacement and return the
    /// fittest of them.
    pub fn tournament_select(&self, tournament_size: usize, rng: &mut StdRng) -> &Chromosome {
        let mut best = rng.gen_range(0..self.chromosomes.len());
        for _ in 1..tournament_size {
            let index = rng.gen_range(0..self.chromosomes.len());
            if self.fitness[index] > self.fitness[best] {
                best = index;
            }
        }
        &self.chromosomes[best]
    }

    /// One generation: select, cross, mutate until N offspring exist,
    /// then apply the replacement policy and re-evaluate.
    pub fn evolve(
        &mut self,
        params: &GaParameters,
        evaluator: &FitnessEvaluator,
        rng: &mut StdRng,
    ) -> Result<(), Error> {
        let n = self.chromosomes.len();
        let mut offspring = Vec::with_capacity(n);
        while offspring.len() < n {
            let first_parent = self.tournament_select(params.tournament_size, rng).clone();
            let second_parent = self.tournament_select(params.tournament_size, rng).clone();

            let (mut first, mut second) = if rng.gen::<f64>() < params.crossover_rate {
                first_parent.crossover(&second_parent, rng)
            } else {
                (first_parent, second_parent)
            };

            if rng.gen::<f64>() < params.mutation_rate {
                first.mutate(params.mutation_rate, rng);
            }
            if rng.gen::<f64>() < params.mutation_rate {
                second.mutate(params.mutation_rate, rng);
            }

            offspring.push(first);
            if offspring.len() < n {
                offspring.push(second);
            }
        }

        match params.replacement {
            ReplacementPolicy::Generational => {
                self.fitness = evaluate_all(&offspring, evaluator, params.parallel())?;
                self.chromosomes = offspring;
            }
            ReplacementPolicy::ElitistMerge => {
                let offspring_fitness = evaluate_all(&offspring, evaluator, params.parallel())?;
                self.chromosomes.extend(offspring);
                self.fitness.extend(offspring_fitness);

                let mut order: Vec<usize> = (0..self.chromosomes.len()).collect();
                order.sort_by(|&a, &b| self.fitness[b].total_cmp(&self.fitness[a]));
                order.truncate(n);

                let mut chromosomes = Vec::with_capacity(n);
                let mut fitness = Vec::with_capacity(n);
                for index in order {
                    chromosomes.push(self.chromosomes[index].clone());
                    fitness.push(self.fitness[index]);
                }
                self.chromosomes = chromosomes;
                self.fitness = fitness;
            }
        }
        Ok(())
    }

    pub fn best(&self) -> (&Chromosome, f64) {
        let mut best = 0;
        for index in 1..self.fitness.len() {
            if self.fitness[index] > self.fitness[best] {
                best = index;
            }
        }
        (&self.chromosomes[best], self.fitness[best])
    }
}

/// Fitness of every chromosome. Evaluation is pure, so the parallel
/// version returns exactly the sequential result.
fn evaluate_all(
    chromosomes: &[Chromosome],
    evaluator: &FitnessEvaluator,
    parallel: bool,
) -> Result<Vec<f64>, Error> {
    if parallel {
        chromosomes
            .par_iter()
            .map(|chromosome| evaluator.evaluate(chromosome))
            .collect()
    } else {
        chromosomes
            .iter()
            .map(|chromosome| evaluator.evaluate(chromosome))
            .collect()
    }
}
