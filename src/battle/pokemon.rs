use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a Pokémon, unique within its party and stable across re-sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonId(pub u32);

impl fmt::Display for PokemonId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub pp: u32,
    pub base_pp: u32,
}

impl Move {
    pub fn new(name: impl Into<String>, pp: u32, base_pp: u32) -> Self {
        Self {
            name: name.into(),
            pp,
            base_pp,
        }
    }

    pub fn pp(&self) -> u32 {
        self.pp
    }

    pub fn base_pp(&self) -> u32 {
        self.base_pp
    }
}

/// The moves a Pokémon knows, in their native (learned) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveBank {
    moves: Vec<Move>,
}

impl MoveBank {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn as_list(&self) -> &[Move] {
        &self.moves
    }

    pub fn get(&self, slot: usize) -> Option<&Move> {
        self.moves.get(slot)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl From<Vec<Move>> for MoveBank {
    fn from(moves: Vec<Move>) -> Self {
        Self::new(moves)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: String,
    pub hp: u32,
    pub base_hp: u32,
    #[serde(default)]
    pub move_bank: MoveBank,
}

impl Pokemon {
    pub fn new(id: u32, name: impl Into<String>, hp: u32, base_hp: u32, moves: Vec<Move>) -> Self {
        Self {
            id: PokemonId(id),
            name: name.into(),
            hp,
            base_hp,
            move_bank: MoveBank::new(moves),
        }
    }

    pub fn id(&self) -> PokemonId {
        self.id
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn base_hp(&self) -> u32 {
        self.base_hp
    }

    pub fn move_bank(&self) -> &MoveBank {
        &self.move_bank
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }
}
