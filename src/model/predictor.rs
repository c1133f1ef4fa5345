//! End-to-end decision: encode state, run the model, decode its output

use thiserror::Error;

use super::config::{ConfigError, EncoderConfig};
use super::decoder::{Action, ActionDecoder, DecodeError};
use super::encoder::{EncodeError, FeatureMatrix, StateEncoder};
use super::layout::{LengthMismatch, OutputVector, PolicyVector};
use crate::battle::{Player, TurnHandler};

pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("model forward pass failed: {0}")]
    Model(#[source] ModelError),
    #[error("model output has the wrong length: {0}")]
    Output(#[from] LengthMismatch),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Forward pass of the learned model: feature matrix in, raw output vector values out.
pub trait PolicyModel {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f32>, ModelError>;
}

impl<F> PolicyModel for F
where
    F: Fn(&FeatureMatrix) -> Result<Vec<f32>, ModelError>,
{
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f32>, ModelError> {
        self(features)
    }
}

/// Decides turns for one player with a learned model.
pub struct DecisionPolicy<M> {
    encoder: StateEncoder,
    decoder: ActionDecoder,
    model: M,
}

impl<M: PolicyModel> DecisionPolicy<M> {
    pub fn new(config: EncoderConfig, model: M) -> Result<Self, ConfigError> {
        Ok(Self {
            encoder: StateEncoder::new(config)?,
            decoder: ActionDecoder::new(config)?,
            model,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the model on the current state.
    pub fn predict(&self, focused: &Player, opponent: &Player) -> Result<OutputVector, DecisionError> {
        let features = self.encoder.encode_state(focused, opponent)?;
        let raw = self.model.predict(&features).map_err(DecisionError::Model)?;
        Ok(PolicyVector::from_values(self.decoder.layout(), raw)?)
    }

    /// Decide `focused`'s turn and invoke the matching callback of `handler`.
    ///
    /// On error no callback has been invoked; the caller falls back to its default policy.
    pub fn take_turn<'a, H: TurnHandler + ?Sized>(
        &self,
        focused: &'a Player,
        opponent: &Player,
        handler: &mut H,
    ) -> Result<Action<'a>, DecisionError> {
        let output = self.predict(focused, opponent)?;
        Ok(self
            .decoder
            .decode_action(&output, focused, opponent, handler)?)
    }
}
