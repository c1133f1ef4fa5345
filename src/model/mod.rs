//! Bridge between the battle state and a learned policy/value model
//!
//! The model sees both parties as a fixed-size matrix and answers with one
//! vector holding switch probabilities, per-Pokémon move probabilities and the
//! expected game outcome. The same layout is used for search-derived training
//! targets.
//!
//! # Architecture
//!
//! ```text
//! (focused Player, opponent Player)            search root (SearchNode)
//!     │                                              │
//!     ▼                                              ▼
//! ┌───────────────────────────────┐   ┌───────────────────────────────┐
//! │  StateEncoder                 │   │  TargetEncoder                │
//! │  - (2P) x (1+M) FeatureMatrix │   │  - child/root outcome ratios  │
//! │  - canonical id order         │   │  - re-keyed to canonical order│
//! └───────────────────────────────┘   └───────────────────────────────┘
//!     │                                              │
//!     ▼                                              │
//! ┌───────────────────────────────┐                  │
//! │  PolicyModel (external)       │                  │
//! │  - FeatureMatrix → Output     │                  │
//! └───────────────────────────────┘                  │
//!     │                                              ▼
//!     ├──────────────────────────────────────▶ loss(target, output)
//!     ▼
//! ┌───────────────────────────────┐
//! │  ActionDecoder                │
//! │  - argmax over live slots     │
//! │  - TurnHandler callback       │
//! └───────────────────────────────┘
//! ```

pub mod config;
pub mod dataset;
pub mod decoder;
pub mod encoder;
pub mod layout;
pub mod loss;
pub mod ordering;
pub mod predictor;
pub mod target;

// Burn-dependent
#[cfg(feature = "rl")]
pub mod tensor;

pub use config::{ConfigError, DEFAULT_EPSILON, EncoderConfig, POKEMON_MOVE_LIMIT, POKEMON_PARTY_LIMIT};
pub use dataset::{FlatBatch, SampleBuffer, SampleError, TrainingSample};
pub use decoder::{Action, ActionDecoder, DecodeError};
pub use encoder::{EncodeError, FeatureMatrix, StateEncoder};
pub use layout::{LengthMismatch, OutputVector, PolicyLayout, PolicyVector, TargetVector};
pub use loss::{LossError, LossTerms, loss, policy_value_loss};
pub use ordering::{CanonicalOrder, OrderingError};
pub use predictor::{DecisionError, DecisionPolicy, ModelError, PolicyModel};
pub use target::{TargetEncoder, TargetError};
#[cfg(feature = "rl")]
pub use tensor::BurnPolicy;
