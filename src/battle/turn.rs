use serde::{Deserialize, Serialize};

use super::pokemon::Move;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Callbacks the battle simulator hands to whoever decides a player's turn.
///
/// A decision invokes exactly one of them.
pub trait TurnHandler {
    /// Attack with a move of the Pokémon currently in battle.
    fn do_move(&mut self, chosen: &Move);

    /// Use an item from the player's bag.
    fn use_item(&mut self, item: &Item);

    /// Switch to another party member.
    fn switch_pokemon(&mut self, slot: usize);
}
