//! Accompanist - genetic-algorithm chord accompaniment for MIDI melodies.
//!
//! Given a melody quantized into beat-sized note slots, the engine evolves a
//! sequence of diatonic triads (a genome, one chord per slot) that agrees
//! with the melody: populations of candidate sequences are scored slot by
//! slot, bred with a five-parent crossover, nudged by suspension and swap
//! mutations, and iterated until a fitness target or a generation cap.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: configuration and music-domain types (modes, tonalities,
//!   chords)
//! - `evolve`: the genetic algorithm (chord pool, fitness, selection,
//!   crossover, mutation, generation loop)
//! - `midi`: the Standard MIDI File boundary (melody quantization, key
//!   signature reading, accompaniment rendering)
//!
//! # Example
//!
//! ```rust,no_run
//! use accompanist::{
//!     evolve::EvolutionEngine,
//!     schema::{EvolutionConfig, Mode, Tonality},
//! };
//!
//! // One set of sounding pitches per beat; empty slots are rests.
//! let notes = vec![vec![64], vec![], vec![67, 71], vec![60]];
//!
//! let tonality = Tonality::new(60, Mode::Major);
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), tonality, notes)?;
//! let result = engine.run()?;
//!
//! println!(
//!     "fitness {} of {} after {} generations",
//!     result.fitness, result.stats.max_fitness, result.stats.generations
//! );
//! # Ok::<(), accompanist::evolve::EvolveError>(())
//! ```

pub mod evolve;
pub mod midi;
pub mod schema;

// Re-export commonly used types
pub use evolve::{EvolutionEngine, EvolutionResult, Genome};
pub use schema::{AccompanyConfig, Chord, Mode, Tonality};
