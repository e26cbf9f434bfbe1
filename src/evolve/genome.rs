//! Genome representation and the stochastic operators that breed it.

use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{Chord, Tonality};

use super::EvolveError;
use super::pool::ChordPool;

/// Number of parents consumed, and children produced, by one crossover.
pub const PARENT_COUNT: usize = 5;

/// A candidate accompaniment: one chord per melody time slot.
///
/// Chords are plain values, so genomes never share storage; mutating one
/// genome cannot bleed into another that drew the same pool entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    /// Chords in slot order.
    pub chords: Vec<Chord>,
}

impl Genome {
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

/// Random number generator wrapper for genome operations.
///
/// All stochastic steps draw from this handle, so a fixed seed reproduces a
/// whole run.
#[derive(Debug)]
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw a genome of `length` uniform picks from the pool, with
    /// replacement.
    pub fn random_genome(&mut self, pool: &ChordPool, length: usize) -> Genome {
        let chords = (0..length)
            .map(|_| pool.chords()[self.rng.gen_range(0..pool.chords().len())])
            .collect();
        Genome { chords }
    }

    /// Draw `size` independent genomes.
    pub fn random_population(&mut self, pool: &ChordPool, size: usize, length: usize) -> Vec<Genome> {
        (0..size).map(|_| self.random_genome(pool, length)).collect()
    }

    /// Sample `count` indices with replacement, weighted by `weights`.
    ///
    /// When every weight is zero there is no distribution to sample, so the
    /// draw falls back to uniform.
    pub fn weighted_indices(&mut self, weights: &[u32], count: usize) -> Vec<usize> {
        match WeightedIndex::new(weights) {
            Ok(dist) => (0..count).map(|_| dist.sample(&mut self.rng)).collect(),
            Err(_) => (0..count)
                .map(|_| self.rng.gen_range(0..weights.len()))
                .collect(),
        }
    }

    /// Recombine five parents into five children around one shared cut point.
    ///
    /// Children rotate tails: child k keeps parent k up to the cut and takes
    /// parent k+1 from the cut onward, cyclically, so child 4 receives the
    /// tail parent 0 had before it was overwritten.
    pub fn crossover(
        &mut self,
        mut parents: [Genome; PARENT_COUNT],
    ) -> Result<[Genome; PARENT_COUNT], EvolveError> {
        let lengths = parents.each_ref().map(Genome::len);
        let length = lengths[0];
        if lengths.iter().any(|&l| l != length) {
            return Err(EvolveError::ParentLengthMismatch { lengths });
        }
        if length < 2 {
            return Err(EvolveError::TooFewSlots { slots: length });
        }

        let cut = self.rng.gen_range(1..length);
        let first_tail: Vec<Chord> = parents[0].chords[cut..].to_vec();
        for k in 0..PARENT_COUNT - 1 {
            let tail: Vec<Chord> = parents[k + 1].chords[cut..].to_vec();
            parents[k].chords.truncate(cut);
            parents[k].chords.extend(tail);
        }
        parents[PARENT_COUNT - 1].chords.truncate(cut);
        parents[PARENT_COUNT - 1].chords.extend(first_tail);

        Ok(parents)
    }

    /// Mutate a genome in place.
    ///
    /// Each pass picks one chord and, with probability `sus_probability`,
    /// suspends it if it is a plain major or minor triad: a root on the
    /// third degree forces sus4, a root on the fourth degree forces sus2,
    /// and any other degree takes either on a coin flip. Each pass then
    /// swaps two random positions half of the time (which may coincide, a
    /// no-op).
    pub fn mutate(
        &mut self,
        genome: &mut Genome,
        tonality: Tonality,
        passes: usize,
        sus_probability: f64,
    ) {
        if genome.is_empty() {
            return;
        }
        for _ in 0..passes {
            let index = self.rng.gen_range(0..genome.len());
            let chord = genome.chords[index];
            if chord.has_perfect_fifth()
                && !chord.is_suspended()
                && self.rng.gen_bool(sus_probability)
            {
                let class = chord.root() % 12;
                let middle = if class == tonality.third_degree_class() {
                    chord.fifth() - 2
                } else if class == tonality.fourth_degree_class() {
                    chord.root() + 2
                } else if self.rng.gen_bool(0.5) {
                    chord.root() + 2
                } else {
                    chord.fifth() - 2
                };
                genome.chords[index].pitches[1] = middle;
            }

            if self.rng.gen_bool(0.5) {
                let a = self.rng.gen_range(0..genome.len());
                let b = self.rng.gen_range(0..genome.len());
                genome.chords.swap(a, b);
            }
        }
    }
}
