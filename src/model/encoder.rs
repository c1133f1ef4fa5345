//! State encoder - converts both players' visible state into the feature matrix

use thiserror::Error;

use super::config::{ConfigError, EncoderConfig};
use super::ordering::{CanonicalOrder, OrderingError};
use crate::battle::{Player, Pokemon, PokemonId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error("{player} has {len} Pokémon, the party limit is {limit}")]
    PartyOverflow {
        player: String,
        len: usize,
        limit: usize,
    },
    #[error("Pokémon {pokemon} knows {len} moves, the move limit is {limit}")]
    MoveBankOverflow {
        pokemon: PokemonId,
        len: usize,
        limit: usize,
    },
    #[error("Pokémon {0} has a base HP of zero")]
    ZeroBaseHp(PokemonId),
    #[error("move {move_slot} of Pokémon {pokemon} has a base PP of zero")]
    ZeroBasePp { pokemon: PokemonId, move_slot: usize },
}

/// Row-major `rows x columns` matrix of HP and PP ratios.
///
/// Rows `0..party_limit` belong to the focused player, the rest to the opponent,
/// each half in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    columns: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.columns]
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        (index < self.rows).then(|| &self.data[index * self.columns..(index + 1) * self.columns])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.columns)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Checks a player's party against the configured limit.
pub(crate) fn check_party_size(config: &EncoderConfig, player: &Player) -> Result<(), EncodeError> {
    let len = player.party().len();
    if len > config.party_limit {
        return Err(EncodeError::PartyOverflow {
            player: player.name.clone(),
            len,
            limit: config.party_limit,
        });
    }
    Ok(())
}

/// State encoder for converting a pair of players into a [`FeatureMatrix`]
#[derive(Debug, Clone)]
pub struct StateEncoder {
    config: EncoderConfig,
}

impl StateEncoder {
    pub fn new(config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode the state seen by `focused`, followed by `opponent`.
    #[tracing::instrument(
        level = "trace",
        skip(self, focused, opponent),
        fields(focused = %focused.name, opponent = %opponent.name)
    )]
    pub fn encode_state(
        &self,
        focused: &Player,
        opponent: &Player,
    ) -> Result<FeatureMatrix, EncodeError> {
        let rows = self.config.rows();
        let columns = self.config.columns();
        let mut data = Vec::with_capacity(rows * columns);

        self.push_party(&mut data, focused)?;
        self.push_party(&mut data, opponent)?;

        debug_assert_eq!(data.len(), rows * columns);
        Ok(FeatureMatrix {
            rows,
            columns,
            data,
        })
    }

    fn push_party(&self, data: &mut Vec<f32>, player: &Player) -> Result<(), EncodeError> {
        check_party_size(&self.config, player)?;

        let party = player.party();
        let order = CanonicalOrder::of(party)?;
        for pokemon in order.pokemon(party) {
            self.push_pokemon(data, pokemon)?;
        }

        // Pad missing party members
        let missing = self.config.party_limit - order.len();
        data.extend(std::iter::repeat_n(
            self.config.epsilon,
            missing * self.config.columns(),
        ));
        Ok(())
    }

    fn push_pokemon(&self, data: &mut Vec<f32>, pokemon: &Pokemon) -> Result<(), EncodeError> {
        let moves = pokemon.move_bank().as_list();
        if moves.len() > self.config.move_limit {
            return Err(EncodeError::MoveBankOverflow {
                pokemon: pokemon.id(),
                len: moves.len(),
                limit: self.config.move_limit,
            });
        }
        if pokemon.base_hp() == 0 {
            return Err(EncodeError::ZeroBaseHp(pokemon.id()));
        }

        data.push(self.ratio(pokemon.hp(), pokemon.base_hp()));

        for (move_slot, known) in moves.iter().enumerate() {
            if known.base_pp() == 0 {
                return Err(EncodeError::ZeroBasePp {
                    pokemon: pokemon.id(),
                    move_slot,
                });
            }
            data.push(self.ratio(known.pp(), known.base_pp()));
        }

        // Pad unknown moves
        data.extend(std::iter::repeat_n(
            self.config.epsilon,
            self.config.move_limit - moves.len(),
        ));
        Ok(())
    }

    /// `value / base`, floored at epsilon so a fainted Pokémon or an exhausted move never yields zero.
    fn ratio(&self, value: u32, base: u32) -> f32 {
        (value as f32 / base as f32).max(self.config.epsilon)
    }
}
