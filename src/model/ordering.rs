//! Canonical ordering of party members.
//!
//! Feature matrix rows, target vector segments and output vector segments are all laid out
//! in this order. It depends on the Pokémon identifier alone, so two independently built
//! arrays for the same party always line up, whatever the battle order was at the time.

use thiserror::Error;

use crate::battle::{Party, Pokemon, PokemonId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("party contains Pokémon {0} more than once")]
    DuplicateId(PokemonId),
}

/// Permutation from canonical (identifier ascending) slots to battle-order indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOrder {
    /// `battle_indices[sorted_slot]` is the member's index in the party's as-is list
    battle_indices: Vec<usize>,
    /// Identifiers in ascending order, parallel to `battle_indices`
    ids: Vec<PokemonId>,
}

impl CanonicalOrder {
    pub fn of(party: &Party) -> Result<Self, OrderingError> {
        let mut keyed: Vec<(PokemonId, usize)> = party
            .as_list()
            .iter()
            .enumerate()
            .map(|(index, pokemon)| (pokemon.id(), index))
            .collect();
        keyed.sort_unstable_by_key(|&(id, _)| id);

        if let Some(pair) = keyed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(OrderingError::DuplicateId(pair[0].0));
        }

        let (ids, battle_indices) = keyed.into_iter().unzip();
        Ok(Self {
            battle_indices,
            ids,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn battle_index(&self, sorted_slot: usize) -> Option<usize> {
        self.battle_indices.get(sorted_slot).copied()
    }

    pub fn sorted_slot_of(&self, id: PokemonId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// Inverse of [`Self::battle_index`].
    pub fn sorted_slot_of_battle_index(&self, battle_index: usize) -> Option<usize> {
        self.battle_indices.iter().position(|&b| b == battle_index)
    }

    /// Members of `party` in canonical order. `party` must be the party this order was built from.
    pub fn pokemon<'p>(&self, party: &'p Party) -> impl Iterator<Item = &'p Pokemon> {
        self.battle_indices
            .iter()
            .filter_map(move |&index| party.get_at_index(index))
    }

    /// Re-key values stored by battle-order index into canonical order.
    pub fn permute<T: Copy>(&self, by_battle_index: &[T]) -> Vec<T> {
        debug_assert_eq!(by_battle_index.len(), self.len());
        self.battle_indices
            .iter()
            .map(|&index| by_battle_index[index])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::pokemon;

    #[test]
    fn test_orders_by_identifier() {
        let party = Party::new(vec![pokemon(10, &[]), pokemon(5, &[]), pokemon(7, &[])]);
        let order = CanonicalOrder::of(&party).unwrap();
        assert_eq!(order.battle_index(0), Some(1));
        assert_eq!(order.battle_index(1), Some(2));
        assert_eq!(order.battle_index(2), Some(0));
        assert_eq!(order.sorted_slot_of(PokemonId(10)), Some(2));
        assert_eq!(order.sorted_slot_of(PokemonId(3)), None);
        assert_eq!(order.sorted_slot_of_battle_index(1), Some(0));
    }

    #[test]
    fn test_independent_of_battle_order() {
        let mut party = Party::new(vec![pokemon(3, &[]), pokemon(1, &[]), pokemon(2, &[])]);
        let before: Vec<PokemonId> = CanonicalOrder::of(&party)
            .unwrap()
            .pokemon(&party)
            .map(|p| p.id())
            .collect();
        party.make_starting(2);
        let after: Vec<PokemonId> = CanonicalOrder::of(&party)
            .unwrap()
            .pokemon(&party)
            .map(|p| p.id())
            .collect();
        assert_eq!(before, after);
        assert_eq!(before, vec![PokemonId(1), PokemonId(2), PokemonId(3)]);
    }

    #[test]
    fn test_permute_rekeys_values() {
        let party = Party::new(vec![pokemon(10, &[]), pokemon(5, &[])]);
        let order = CanonicalOrder::of(&party).unwrap();
        assert_eq!(order.permute(&['a', 'b']), vec!['b', 'a']);
    }

    #[test]
    fn test_duplicate_identifier_fails_fast() {
        let party = Party::new(vec![pokemon(4, &[]), pokemon(9, &[]), pokemon(4, &[])]);
        assert_eq!(
            CanonicalOrder::of(&party),
            Err(OrderingError::DuplicateId(PokemonId(4)))
        );
    }

    #[test]
    fn test_empty_party() {
        let order = CanonicalOrder::of(&Party::default()).unwrap();
        assert!(order.is_empty());
        assert_eq!(order.battle_index(0), None);
    }
}
