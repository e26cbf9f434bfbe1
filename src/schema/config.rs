//! Configuration types for accompaniment runs.

use serde::{Deserialize, Serialize};

use super::Tonality;

/// Top-level run configuration, usually loaded from a JSON file next to the
/// melody.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccompanyConfig {
    /// Tonality override; when absent the input file's key signature is used.
    #[serde(default)]
    pub tonality: Option<Tonality>,
    /// Index of the melody track within the input file.
    #[serde(default = "default_melody_track")]
    pub melody_track: usize,
    /// Genetic-algorithm settings.
    #[serde(default)]
    pub evolution: EvolutionConfig,
    /// Rendering settings for the accompaniment track.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for AccompanyConfig {
    fn default() -> Self {
        Self {
            tonality: None,
            melody_track: default_melody_track(),
            evolution: EvolutionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_melody_track() -> usize {
    1
}

/// Settings of the generation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of genomes kept in every generation.
    #[serde(default = "default_population_limit")]
    pub population_limit: usize,
    /// Maximum number of generations before giving up.
    #[serde(default = "default_generation_limit")]
    pub generation_limit: usize,
    /// Share of the maximum fitness that counts as good enough, in (0, 1].
    #[serde(default = "default_target_ratio")]
    pub target_ratio: f64,
    /// Seed for reproducible runs; drawn from entropy when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Mutation settings.
    #[serde(default)]
    pub mutation: MutationConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_limit: default_population_limit(),
            generation_limit: default_generation_limit(),
            target_ratio: default_target_ratio(),
            random_seed: None,
            mutation: MutationConfig::default(),
        }
    }
}

fn default_population_limit() -> usize {
    100
}
fn default_generation_limit() -> usize {
    200
}
fn default_target_ratio() -> f64 {
    0.95
}

/// Settings of the per-offspring mutation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Mutation passes applied to each offspring.
    #[serde(default = "default_passes")]
    pub passes: usize,
    /// Per-pass probability of suspending an eligible triad, in [0, 1].
    /// Better kept small.
    #[serde(default = "default_sus_probability")]
    pub sus_probability: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            passes: default_passes(),
            sus_probability: default_sus_probability(),
        }
    }
}

fn default_passes() -> usize {
    2
}
fn default_sus_probability() -> f64 {
    0.001
}

/// Settings of the rendered accompaniment track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Velocity of every accompaniment note, 0-127.
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            velocity: default_velocity(),
        }
    }
}

fn default_velocity() -> u8 {
    45
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population must hold at least 5 genomes, got {0}")]
    PopulationTooSmall(usize),
    #[error("target ratio must be in (0, 1], got {0}")]
    InvalidTargetRatio(f64),
    #[error("sus probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("velocity must be 0-127, got {0}")]
    InvalidVelocity(u8),
}

impl AccompanyConfig {
    /// Validate ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evolution.validate()?;
        if self.output.velocity > 127 {
            return Err(ConfigError::InvalidVelocity(self.output.velocity));
        }
        Ok(())
    }
}

impl EvolutionConfig {
    /// Validate ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The breeding step retires five genomes a generation; anything
        // smaller cannot keep the population size fixed.
        if self.population_limit < 5 {
            return Err(ConfigError::PopulationTooSmall(self.population_limit));
        }
        if !(self.target_ratio > 0.0 && self.target_ratio <= 1.0) {
            return Err(ConfigError::InvalidTargetRatio(self.target_ratio));
        }
        if !(0.0..=1.0).contains(&self.mutation.sus_probability) {
            return Err(ConfigError::InvalidProbability(self.mutation.sus_probability));
        }
        Ok(())
    }
}
