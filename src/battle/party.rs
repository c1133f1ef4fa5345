use serde::{Deserialize, Serialize};

use super::pokemon::{Pokemon, PokemonId};
use crate::model::ordering::{CanonicalOrder, OrderingError};

/// A player's Pokémon in battle order. Index 0 is the Pokémon currently in battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Party {
    pokemon: Vec<Pokemon>,
}

impl Party {
    pub fn new(pokemon: Vec<Pokemon>) -> Self {
        Self { pokemon }
    }

    /// Members in battle order.
    pub fn as_list(&self) -> &[Pokemon] {
        &self.pokemon
    }

    /// Members in canonical order (identifier ascending).
    pub fn sorted_list(&self) -> Result<Vec<&Pokemon>, OrderingError> {
        Ok(CanonicalOrder::of(self)?.pokemon(self).collect())
    }

    /// The Pokémon currently in battle, if the party has any members.
    pub fn starting(&self) -> Option<&Pokemon> {
        self.pokemon.first()
    }

    pub fn get_at_index(&self, index: usize) -> Option<&Pokemon> {
        self.pokemon.get(index)
    }

    pub fn get_by_id(&self, id: PokemonId) -> Option<&Pokemon> {
        self.pokemon.iter().find(|p| p.id == id)
    }

    /// Bring the member at `index` into battle, swapping it with the current one.
    ///
    /// Returns false when `index` is out of range.
    pub fn make_starting(&mut self, index: usize) -> bool {
        if index >= self.pokemon.len() {
            return false;
        }
        self.pokemon.swap(0, index);
        true
    }

    /// Convert a slot in canonical order into the matching battle-order index.
    pub fn battle_index_of_sorted(&self, sorted_slot: usize) -> Result<Option<usize>, OrderingError> {
        Ok(CanonicalOrder::of(self)?.battle_index(sorted_slot))
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }

    /// Number of members that can still battle.
    pub fn healthy_count(&self) -> usize {
        self.pokemon.iter().filter(|p| !p.is_fainted()).count()
    }
}

impl From<Vec<Pokemon>> for Party {
    fn from(pokemon: Vec<Pokemon>) -> Self {
        Self::new(pokemon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::pokemon;

    #[test]
    fn test_starting_is_first_member() {
        let party = Party::new(vec![pokemon(10, &[35]), pokemon(5, &[20])]);
        assert_eq!(party.starting().map(|p| p.id), Some(PokemonId(10)));
        assert!(Party::default().starting().is_none());
    }

    #[test]
    fn test_make_starting_swaps_into_battle() {
        let mut party = Party::new(vec![pokemon(1, &[]), pokemon(2, &[]), pokemon(3, &[])]);
        assert!(party.make_starting(2));
        let ids: Vec<u32> = party.as_list().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(!party.make_starting(3));
    }

    #[test]
    fn test_sorted_list_ignores_battle_order() {
        let party = Party::new(vec![pokemon(10, &[]), pokemon(5, &[]), pokemon(7, &[])]);
        let ids: Vec<u32> = party.sorted_list().unwrap().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![5, 7, 10]);
    }

    #[test]
    fn test_battle_index_of_sorted() {
        let party = Party::new(vec![pokemon(10, &[]), pokemon(5, &[])]);
        assert_eq!(party.battle_index_of_sorted(0).unwrap(), Some(1));
        assert_eq!(party.battle_index_of_sorted(1).unwrap(), Some(0));
        assert_eq!(party.battle_index_of_sorted(2).unwrap(), None);
    }

    #[test]
    fn test_fainted_members_do_not_count() {
        let mut fainted = pokemon(4, &[10]);
        fainted.hp = 0;
        let party = Party::new(vec![fainted.clone(), pokemon(6, &[10])]);
        assert_eq!(party.healthy_count(), 1);

        let player = crate::battle::Player::new("red", vec![fainted]);
        assert!(!player.can_battle());
    }
}
