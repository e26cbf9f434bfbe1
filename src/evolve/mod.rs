//! The genetic-algorithm engine.
//!
//! Evolves chord sequences against a quantized melody:
//!
//! - **Chord pool** (`pool`): the seven diatonic triads of the tonality
//! - **Genome operations** (`genome`): random generation, five-parent
//!   crossover, and mutation, all drawing from one seedable RNG handle
//! - **Fitness** (`fitness`): per-slot harmonic agreement scoring
//! - **Generation loop** (`search`): selection, breeding, and convergence
//!
//! # Example
//!
//! ```rust,no_run
//! use accompanist::evolve::EvolutionEngine;
//! use accompanist::schema::{EvolutionConfig, Mode, Tonality};
//!
//! let tonality = Tonality::new(60, Mode::Major);
//! let notes = vec![vec![64], vec![], vec![67, 71], vec![60]];
//!
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), tonality, notes)?;
//! let result = engine.run()?;
//! println!(
//!     "best fitness {} of {} after {} generations",
//!     result.fitness, result.stats.max_fitness, result.stats.generations
//! );
//! # Ok::<(), accompanist::evolve::EvolveError>(())
//! ```

mod fitness;
mod genome;
mod pool;
mod search;

pub use fitness::{MATCH_SCORE, SILENCE_SCORE, SUS_BONUS, max_fitness, score_genome};
pub use genome::{Genome, GenomeRng, PARENT_COUNT};
pub use pool::ChordPool;
pub use search::{
    EvolutionEngine, EvolutionResult, EvolutionStats, FitnessHistory, StopReason,
};

/// Errors raised by the engine. All are precondition violations; the loop
/// itself has no failing states.
#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("genome spans {genome} slots but the melody has {slots}")]
    SlotCountMismatch { genome: usize, slots: usize },
    #[error("crossover parents must all share one length, got {lengths:?}")]
    ParentLengthMismatch { lengths: [usize; PARENT_COUNT] },
    #[error("need at least 2 slots to place a crossover cut, got {slots}")]
    TooFewSlots { slots: usize },
    #[error("invalid configuration: {0}")]
    Config(#[from] crate::schema::ConfigError),
}
