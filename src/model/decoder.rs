//! Action decoder - maps a raw model output back to one concrete action

use thiserror::Error;

use super::config::{ConfigError, EncoderConfig};
use super::layout::{OutputVector, PolicyLayout};
use super::ordering::{CanonicalOrder, OrderingError};
use crate::battle::{Move, Player, TurnHandler};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("output laid out as {actual:?}, decoder expects {expected:?}")]
    LayoutMismatch {
        expected: PolicyLayout,
        actual: PolicyLayout,
    },
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error("no move or switch candidates for {0}")]
    NoCandidates(String),
}

/// A decided turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action<'a> {
    /// Attack with a move of the Pokémon in battle.
    Attack(&'a Move),
    /// Switch to the party member at this canonical (identifier ascending) slot.
    ///
    /// [`crate::battle::Party::battle_index_of_sorted`] converts it to battle order.
    Switch(usize),
}

impl Action<'_> {
    /// Invoke the one callback this action stands for.
    pub fn dispatch<H: TurnHandler + ?Sized>(&self, handler: &mut H) {
        match *self {
            Action::Attack(chosen) => handler.do_move(chosen),
            Action::Switch(slot) => handler.switch_pokemon(slot),
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Action::Attack(_))
    }
}

/// First index holding the largest value; NaN never wins.
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best, (index, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((index, value)),
        })
}

#[derive(Debug, Clone)]
pub struct ActionDecoder {
    layout: PolicyLayout,
}

impl ActionDecoder {
    pub fn new(config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            layout: PolicyLayout::from(&config),
        })
    }

    pub fn layout(&self) -> PolicyLayout {
        self.layout
    }

    /// Pick the action for `focused` from `output`.
    ///
    /// Only move slots the active Pokémon knows and switch slots the party fills are
    /// candidates. Attacking wins a tie.
    pub fn decide<'a>(
        &self,
        output: &OutputVector,
        focused: &'a Player,
    ) -> Result<Action<'a>, DecodeError> {
        if output.layout() != self.layout {
            return Err(DecodeError::LayoutMismatch {
                expected: self.layout,
                actual: output.layout(),
            });
        }

        let party = focused.party();
        let order = CanonicalOrder::of(party)?;

        // The Pokémon in battle sits at battle index 0
        let active = focused.active();
        let active_slot = order.sorted_slot_of_battle_index(0);

        let move_probs: &[f32] = match (active, active_slot.and_then(|s| output.move_block(s))) {
            (Some(pokemon), Some(block)) => {
                let known = pokemon.move_bank().len().min(block.len());
                &block[..known]
            }
            _ => {
                tracing::warn!(
                    player = %focused.name,
                    "Active Pokémon not found in canonical order, considering switches only"
                );
                &[]
            }
        };

        let switch_segment = output.switch_segment();
        let switch_probs = &switch_segment[..party.len().min(switch_segment.len())];

        let best_move = argmax(move_probs);
        let best_switch = argmax(switch_probs);
        tracing::trace!(?best_move, ?best_switch, "Candidate maxima");

        match (best_move, best_switch) {
            (Some((move_slot, move_prob)), best_switch)
                if best_switch.is_none_or(|(_, switch_prob)| move_prob >= switch_prob) =>
            {
                active
                    .and_then(|pokemon| pokemon.move_bank().get(move_slot))
                    .map(Action::Attack)
                    .ok_or_else(|| DecodeError::NoCandidates(focused.name.clone()))
            }
            (_, Some((slot, _))) => Ok(Action::Switch(slot)),
            (_, None) => Err(DecodeError::NoCandidates(focused.name.clone())),
        }
    }

    /// Decide and invoke exactly one of the handler's callbacks.
    ///
    /// Item use is never chosen.
    #[tracing::instrument(
        level = "trace",
        skip(self, output, focused, opponent, handler),
        fields(focused = %focused.name, opponent = %opponent.name)
    )]
    pub fn decode_action<'a, H: TurnHandler + ?Sized>(
        &self,
        output: &OutputVector,
        focused: &'a Player,
        opponent: &Player,
        handler: &mut H,
    ) -> Result<Action<'a>, DecodeError> {
        let action = self.decide(output, focused)?;
        tracing::debug!(?action, "Decoded action");
        action.dispatch(handler);
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::PolicyVector;
    use crate::test_util::{Call, RecordingHandler, TEST_EPSILON, player, pokemon, test_config};

    fn decoder() -> ActionDecoder {
        ActionDecoder::new(test_config()).unwrap()
    }

    /// Battle order [10, 5, 3]; canonical order [3, 5, 10]. Id 10 is in battle.
    fn focused() -> Player {
        player(
            "red",
            vec![pokemon(10, &[10, 10, 10]), pokemon(5, &[10]), pokemon(3, &[10, 10])],
        )
    }

    fn output(set: &[(usize, f32)]) -> OutputVector {
        let layout = decoder().layout();
        let mut values = vec![TEST_EPSILON; layout.len()];
        for &(index, value) in set {
            values[index] = value;
        }
        PolicyVector::from_values(layout, values).unwrap()
    }

    #[test]
    fn test_tie_prefers_attack() {
        let layout = decoder().layout();
        // Active id 10 sits at canonical slot 2
        let out = output(&[
            (layout.move_index(2, 1).unwrap(), 0.7),
            (layout.switch_index(0).unwrap(), 0.7),
        ]);
        let focused = focused();
        let mut handler = RecordingHandler::default();
        let action = decoder()
            .decode_action(&out, &focused, &player("blue", vec![]), &mut handler)
            .unwrap();

        assert!(action.is_attack());
        assert_eq!(handler.calls, vec![Call::Move("move-10-1".to_string())]);
    }

    #[test]
    fn test_switch_when_moves_have_no_evidence() {
        let layout = decoder().layout();
        let out = output(&[(layout.switch_index(1).unwrap(), 0.4)]);
        let focused = focused();
        let mut handler = RecordingHandler::default();
        let action = decoder()
            .decode_action(&out, &focused, &player("blue", vec![]), &mut handler)
            .unwrap();

        assert_eq!(action, Action::Switch(1));
        assert_eq!(handler.calls, vec![Call::Switch(1)]);
        assert_eq!(focused.party.battle_index_of_sorted(1).unwrap(), Some(1));
    }

    #[test]
    fn test_reads_active_block_not_first_block() {
        let layout = decoder().layout();
        let out = output(&[
            (layout.move_index(0, 0).unwrap(), 0.9),
            (layout.move_index(2, 2).unwrap(), 0.3),
        ]);
        let focused = focused();
        let action = decoder().decide(&out, &focused).unwrap();
        assert_eq!(action, Action::Attack(&focused.party.as_list()[0].move_bank.as_list()[2]));
    }

    #[test]
    fn test_unknown_move_slots_are_not_candidates() {
        let layout = decoder().layout();
        // Slot 3 of the active block is padding: id 10 knows three moves
        let out = output(&[
            (layout.move_index(2, 3).unwrap(), 0.9),
            (layout.switch_index(2).unwrap(), 0.5),
        ]);
        assert_eq!(decoder().decide(&out, &focused()).unwrap(), Action::Switch(2));
    }

    #[test]
    fn test_unfilled_switch_slots_are_not_candidates() {
        let layout = decoder().layout();
        let out = output(&[
            (layout.switch_index(5).unwrap(), 0.9),
            (layout.move_index(2, 0).unwrap(), 0.2),
        ]);
        let focused = focused();
        assert!(decoder().decide(&out, &focused).unwrap().is_attack());
    }

    #[test]
    fn test_empty_party_has_no_candidates() {
        let out = output(&[]);
        let empty = player("nobody", vec![]);
        let mut handler = RecordingHandler::default();
        let err = decoder()
            .decode_action(&out, &empty, &focused(), &mut handler)
            .unwrap_err();
        assert_eq!(err, DecodeError::NoCandidates("nobody".to_string()));
        assert!(handler.calls.is_empty());
    }

    #[test]
    fn test_moveless_active_falls_through_to_switch() {
        let focused = player("red", vec![pokemon(4, &[]), pokemon(2, &[10])]);
        let layout = decoder().layout();
        let out = output(&[(layout.move_index(0, 0).unwrap(), 0.9)]);
        assert_eq!(decoder().decide(&out, &focused).unwrap(), Action::Switch(0));
    }

    #[test]
    fn test_rejects_foreign_layout() {
        let foreign = PolicyVector::from_values(PolicyLayout::new(3, 2), vec![0.5; 10]).unwrap();
        assert!(matches!(
            decoder().decide(&foreign, &focused()),
            Err(DecodeError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5]), Some((1, 0.5)));
        assert_eq!(argmax(&[f32::NAN, 0.2]), Some((1, 0.2)));
        assert_eq!(argmax(&[]), None);
    }
}
