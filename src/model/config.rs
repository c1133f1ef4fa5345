use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference party size.
pub const POKEMON_PARTY_LIMIT: usize = 6;
/// Reference move bank size.
pub const POKEMON_MOVE_LIMIT: usize = 4;
/// Placeholder for "no data"; strictly positive so the loss can take its logarithm.
pub const DEFAULT_EPSILON: f32 = 1e-16;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("party limit must be at least 1")]
    ZeroPartyLimit,
    #[error("move limit must be at least 1")]
    ZeroMoveLimit,
    #[error("epsilon must be finite and strictly positive, got {0}")]
    InvalidEpsilon(f32),
}

/// Shape of the feature matrix and policy vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Maximum number of Pokémon per party
    pub party_limit: usize,
    /// Maximum number of moves per Pokémon
    pub move_limit: usize,
    /// Value written wherever there is no data
    pub epsilon: f32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            party_limit: POKEMON_PARTY_LIMIT,
            move_limit: POKEMON_MOVE_LIMIT,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl EncoderConfig {
    pub fn new(party_limit: usize, move_limit: usize, epsilon: f32) -> Result<Self, ConfigError> {
        let config = Self {
            party_limit,
            move_limit,
            epsilon,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.party_limit == 0 {
            return Err(ConfigError::ZeroPartyLimit);
        }
        if self.move_limit == 0 {
            return Err(ConfigError::ZeroMoveLimit);
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }

    /// Feature matrix rows: one per party slot of both players.
    pub fn rows(&self) -> usize {
        2 * self.party_limit
    }

    /// Feature matrix columns: HP ratio followed by one PP ratio per move slot.
    pub fn columns(&self) -> usize {
        1 + self.move_limit
    }

    /// Length of target and output vectors.
    pub fn output_size(&self) -> usize {
        self.party_limit + self.party_limit * self.move_limit + 1
    }
}
