//! Target encoder - turns a completed search into the training target of one decision

use std::collections::HashSet;

use thiserror::Error;

use super::config::{ConfigError, EncoderConfig};
use super::encoder::{EncodeError, check_party_size};
use super::layout::{PolicyLayout, PolicyVector, TargetVector};
use super::ordering::CanonicalOrder;
use crate::battle::{Player, PokemonId};
use crate::search::{SearchEdge, SearchNode};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TargetError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("search child has no action")]
    MissingEdge,
    #[error("search root has more than one child for {0:?}")]
    DuplicateEdge(SearchEdge),
    #[error("switch to slot {slot} but the party has {party_len} members")]
    SwitchSlotOutOfRange { slot: usize, party_len: usize },
    #[error("attack by Pokémon {0} which is not in the party")]
    UnknownPokemon(PokemonId),
    #[error("attack with move {move_slot} of Pokémon {pokemon} which knows {known} moves")]
    MoveSlotOutOfRange {
        pokemon: PokemonId,
        move_slot: usize,
        known: usize,
    },
    #[error("search root outcome is {0}, expected a finite value")]
    NonFiniteRoot(f32),
    #[error("search child {edge:?} gives the ratio {value}, expected a finite non-negative value")]
    InvalidEvidence { edge: SearchEdge, value: f32 },
}

/// Builds [`TargetVector`]s from the root of a completed search.
///
/// Each root child contributes `child.outcome / root.outcome`. The ratios are independent
/// evidence, not a distribution: they are not normalized, and the switch and move segments
/// may carry unrelated scales.
#[derive(Debug, Clone)]
pub struct TargetEncoder {
    config: EncoderConfig,
}

impl TargetEncoder {
    pub fn new(config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn layout(&self) -> PolicyLayout {
        PolicyLayout::from(&self.config)
    }

    #[tracing::instrument(level = "trace", skip(self, player, root), fields(player = %player.name))]
    pub fn encode_target<N: SearchNode>(
        &self,
        player: &Player,
        root: &N,
    ) -> Result<TargetVector, TargetError> {
        check_party_size(&self.config, player)?;

        let party = player.party();
        let order = CanonicalOrder::of(party).map_err(EncodeError::from)?;
        let epsilon = self.config.epsilon;
        let move_limit = self.config.move_limit;

        let root_outcome = root.outcome();
        if !root_outcome.is_finite() {
            return Err(TargetError::NonFiniteRoot(root_outcome));
        }
        let has_evidence = root_outcome != 0.0;
        if !has_evidence {
            tracing::debug!("Search root outcome is zero, treating every child as no evidence");
        }

        // Pass 1: switches keyed by battle-order slot, attacks keyed by canonical slot
        let mut switch_by_battle = vec![epsilon; party.len()];
        let mut moves_by_sorted = vec![epsilon; party.len() * move_limit];
        let mut seen = HashSet::new();

        for child in root.children() {
            let edge = child.edge().ok_or(TargetError::MissingEdge)?;
            if !seen.insert(edge) {
                return Err(TargetError::DuplicateEdge(edge));
            }

            let probability = if has_evidence {
                let ratio = child.outcome() / root_outcome;
                if !ratio.is_finite() || ratio < 0.0 {
                    return Err(TargetError::InvalidEvidence { edge, value: ratio });
                }
                // A zero ratio means no evidence
                ratio.max(epsilon)
            } else {
                epsilon
            };

            match edge {
                SearchEdge::Switch { slot } => {
                    let entry = switch_by_battle.get_mut(slot).ok_or(
                        TargetError::SwitchSlotOutOfRange {
                            slot,
                            party_len: party.len(),
                        },
                    )?;
                    *entry = probability;
                }
                SearchEdge::Attack { pokemon, move_slot } => {
                    let sorted_slot = order
                        .sorted_slot_of(pokemon)
                        .ok_or(TargetError::UnknownPokemon(pokemon))?;
                    let known = party
                        .get_by_id(pokemon)
                        .map(|p| p.move_bank().len())
                        .unwrap_or(0);
                    if move_slot >= known || move_slot >= move_limit {
                        return Err(TargetError::MoveSlotOutOfRange {
                            pokemon,
                            move_slot,
                            known,
                        });
                    }
                    moves_by_sorted[sorted_slot * move_limit + move_slot] = probability;
                }
            }
        }

        // Pass 2: re-key switches into canonical order
        let switch_by_sorted = order.permute(&switch_by_battle);

        let layout = self.layout();
        let mut target = PolicyVector::filled(layout, epsilon);
        for (sorted_slot, &probability) in switch_by_sorted.iter().enumerate() {
            if let Some(index) = layout.switch_index(sorted_slot) {
                target.set(index, probability);
            }
        }
        for (sorted_slot, block) in moves_by_sorted.chunks_exact(move_limit).enumerate() {
            for (move_slot, &probability) in block.iter().enumerate() {
                if let Some(index) = layout.move_index(sorted_slot, move_slot) {
                    target.set(index, probability);
                }
            }
        }
        target.set(layout.outcome_index(), root_outcome);

        tracing::trace!(children = seen.len(), outcome = root_outcome, "Encoded search target");
        Ok(target)
    }
}
