pub mod battle;
pub mod model;
pub mod search;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use battle::{Party, Player, Pokemon, TurnHandler};
pub use model::{ActionDecoder, EncoderConfig, StateEncoder, TargetEncoder};
pub use snapshot::BattleSnapshot;

#[cfg(test)]
mod test_util;
