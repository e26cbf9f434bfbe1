//! The generation loop driving selection, crossover, and mutation.

use rayon::prelude::*;

use crate::schema::{EvolutionConfig, Tonality};

use super::EvolveError;
use super::fitness::{max_fitness, score_genome};
use super::genome::{Genome, GenomeRng, PARENT_COUNT};
use super::pool::ChordPool;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Best fitness crossed the configured share of the maximum.
    TargetReached,
    /// Generation cap hit without crossing the target.
    MaxGenerations,
}

/// Summary counters for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStats {
    /// Generations bred before stopping.
    pub generations: usize,
    /// Fitness of the returned genome.
    pub best_fitness: u32,
    /// Fitness ceiling for this melody.
    pub max_fitness: u32,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
}

/// Per-generation fitness traces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessHistory {
    /// Best fitness in each evaluated generation.
    pub best: Vec<u32>,
    /// Mean fitness in each evaluated generation.
    pub mean: Vec<f64>,
}

/// Outcome of a run: the winning genome plus bookkeeping.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Fittest genome of the final population.
    pub best: Genome,
    /// Its fitness.
    pub fitness: u32,
    /// Run counters.
    pub stats: EvolutionStats,
    /// Fitness traces across the run.
    pub history: FitnessHistory,
}

/// Evolution engine that breeds an accompaniment for one melody.
#[derive(Debug)]
pub struct EvolutionEngine {
    config: EvolutionConfig,
    tonality: Tonality,
    notes: Vec<Vec<u8>>,
    pool: ChordPool,
    rng: GenomeRng,
    population: Vec<Genome>,
    generation: usize,
    history: FitnessHistory,
}

impl EvolutionEngine {
    /// Create an engine for one melody.
    ///
    /// The melody must span at least two slots so crossover has an interior
    /// cut point.
    pub fn new(
        config: EvolutionConfig,
        tonality: Tonality,
        notes: Vec<Vec<u8>>,
    ) -> Result<Self, EvolveError> {
        config.validate()?;
        if notes.len() < 2 {
            return Err(EvolveError::TooFewSlots { slots: notes.len() });
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        log::info!(
            "evolving {} slots in {} with seed {}",
            notes.len(),
            tonality,
            seed
        );

        Ok(Self {
            config,
            tonality,
            notes,
            pool: ChordPool::for_tonality(tonality),
            rng: GenomeRng::new(seed),
            population: Vec::new(),
            generation: 0,
            history: FitnessHistory::default(),
        })
    }

    /// (Re)build the initial population.
    pub fn initialize(&mut self) {
        self.generation = 0;
        self.history = FitnessHistory::default();
        self.population = self.rng.random_population(
            &self.pool,
            self.config.population_limit,
            self.notes.len(),
        );
    }

    /// Fitness of every genome, in population order. Genomes are scored
    /// independently; the full vector is in hand before any sorting or
    /// selection sees it.
    fn evaluate_population(&self) -> Result<Vec<u32>, EvolveError> {
        self.population
            .par_iter()
            .map(|genome| score_genome(genome, &self.notes))
            .collect()
    }

    /// Stable-sort the population best-first, returning the fitness vector
    /// in the new order. Ties keep their prior relative order.
    fn sort_population(&mut self, fitness: Vec<u32>) -> Vec<u32> {
        let mut ranked: Vec<(u32, Genome)> =
            fitness.into_iter().zip(self.population.drain(..)).collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let mut sorted = Vec::with_capacity(ranked.len());
        self.population = ranked
            .into_iter()
            .map(|(score, genome)| {
                sorted.push(score);
                genome
            })
            .collect();
        sorted
    }

    /// Breed one generation: retire the five weakest genomes and refill with
    /// mutated offspring of five fitness-weighted parents.
    ///
    /// Parents are drawn from the full sorted population, bottom five
    /// included, which keeps some pressure toward diversity.
    fn breed(&mut self, fitness: &[u32]) -> Result<(), EvolveError> {
        let picks = self.rng.weighted_indices(fitness, PARENT_COUNT);
        let parents: [Genome; PARENT_COUNT] =
            std::array::from_fn(|k| self.population[picks[k]].clone());

        let mut offspring = self.rng.crossover(parents)?;
        for child in &mut offspring {
            self.rng.mutate(
                child,
                self.tonality,
                self.config.mutation.passes,
                self.config.mutation.sus_probability,
            );
        }

        self.population
            .truncate(self.population.len() - PARENT_COUNT);
        self.population.extend(offspring);
        Ok(())
    }

    /// Run until the fitness target or the generation cap.
    pub fn run(&mut self) -> Result<EvolutionResult, EvolveError> {
        self.initialize();
        let target = f64::from(max_fitness(self.notes.len())) * self.config.target_ratio;

        let stop_reason = loop {
            let fitness = self.evaluate_population()?;
            let fitness = self.sort_population(fitness);

            let best = fitness[0];
            let mean =
                fitness.iter().map(|&f| f64::from(f)).sum::<f64>() / fitness.len() as f64;
            self.history.best.push(best);
            self.history.mean.push(mean);
            log::debug!(
                "generation {}: best {best}, mean {mean:.1}",
                self.generation
            );

            if f64::from(best) >= target {
                break StopReason::TargetReached;
            }
            if self.generation >= self.config.generation_limit {
                break StopReason::MaxGenerations;
            }

            self.breed(&fitness)?;
            self.generation += 1;
        };

        let best_fitness = self.history.best.last().copied().unwrap_or(0);
        let stats = EvolutionStats {
            generations: self.generation,
            best_fitness,
            max_fitness: max_fitness(self.notes.len()),
            stop_reason,
        };
        log::info!(
            "stopped after {} generations: best {} of {} ({:?})",
            stats.generations,
            stats.best_fitness,
            stats.max_fitness,
            stats.stop_reason
        );

        Ok(EvolutionResult {
            best: self.population[0].clone(),
            fitness: best_fitness,
            stats,
            history: self.history.clone(),
        })
    }
}
