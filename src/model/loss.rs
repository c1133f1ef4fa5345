//! Combined outcome-regression and policy loss

use thiserror::Error;

use super::layout::PolicyVector;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LossError {
    #[error("target has {target} values but output has {output}")]
    ShapeMismatch { target: usize, output: usize },
    #[error("loss needs at least the outcome value")]
    Empty,
    /// The epsilon floor of the target encoder was bypassed somewhere upstream.
    #[error("target component {index} is {value}, the logarithm needs a positive value")]
    NonPositiveTarget { index: usize, value: f32 },
}

/// The two terms of the loss, kept apart for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossTerms {
    /// `(target_outcome - output_outcome)^2`
    pub outcome: f32,
    /// `output_policy . ln(target_policy)`
    pub policy: f32,
}

impl LossTerms {
    /// Split both vectors at their last value and score `output` against `target`.
    pub fn compute(target: &[f32], output: &[f32]) -> Result<Self, LossError> {
        if target.len() != output.len() {
            return Err(LossError::ShapeMismatch {
                target: target.len(),
                output: output.len(),
            });
        }
        let (Some((target_outcome, target_policy)), Some((output_outcome, output_policy))) =
            (target.split_last(), output.split_last())
        else {
            return Err(LossError::Empty);
        };

        let outcome = (target_outcome - output_outcome).powi(2);

        let mut policy = 0.0f32;
        for (index, (&t, &o)) in target_policy.iter().zip(output_policy).enumerate() {
            if t.is_nan() || t <= 0.0 {
                return Err(LossError::NonPositiveTarget { index, value: t });
            }
            policy += o * t.ln();
        }

        Ok(Self { outcome, policy })
    }

    pub fn total(&self) -> f32 {
        self.outcome + self.policy
    }
}

/// Scalar loss of a model `output` against a search or game `target`.
pub fn loss(target: &[f32], output: &[f32]) -> Result<f32, LossError> {
    LossTerms::compute(target, output).map(|terms| terms.total())
}

/// [`loss`] over two policy vectors.
pub fn policy_value_loss(target: &PolicyVector, output: &PolicyVector) -> Result<LossTerms, LossError> {
    LossTerms::compute(target.as_slice(), output.as_slice())
}
