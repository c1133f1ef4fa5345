//! Battle state consumed by the model bridge.
//!
//! These types are owned by the battle simulator; the model layer only reads them.

mod party;
mod player;
mod pokemon;
mod turn;

pub use party::Party;
pub use player::Player;
pub use pokemon::{Move, MoveBank, Pokemon, PokemonId};
pub use turn::{Item, TurnHandler};
