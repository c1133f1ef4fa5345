//! Shared test fixtures.

use crate::battle::{Item, Move, Player, Pokemon, TurnHandler};
use crate::model::EncoderConfig;

/// Distinct from the production epsilon so a stray zero default shows up in assertions.
pub const TEST_EPSILON: f32 = 1e-3;

pub fn test_config() -> EncoderConfig {
    EncoderConfig {
        epsilon: TEST_EPSILON,
        ..EncoderConfig::default()
    }
}

/// Full-HP Pokémon whose moves have the given PP out of 40, named `move-{id}-{slot}`.
pub fn pokemon(id: u32, pp: &[u32]) -> Pokemon {
    let moves = pp
        .iter()
        .enumerate()
        .map(|(slot, &pp)| Move::new(format!("move-{id}-{slot}"), pp, 40))
        .collect();
    Pokemon::new(id, format!("mon-{id}"), 100, 100, moves)
}

pub fn player(name: &str, members: Vec<Pokemon>) -> Player {
    Player::new(name, members)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Move(String),
    Item(String),
    Switch(usize),
}

#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub calls: Vec<Call>,
}

impl TurnHandler for RecordingHandler {
    fn do_move(&mut self, chosen: &Move) {
        self.calls.push(Call::Move(chosen.name.clone()));
    }

    fn use_item(&mut self, item: &Item) {
        self.calls.push(Call::Item(item.name.clone()));
    }

    fn switch_pokemon(&mut self, slot: usize) {
        self.calls.push(Call::Switch(slot));
    }
}
