//! Bridge between the encoded vectors and `burn` tensors

use burn::prelude::*;
use burn::tensor::backend::Backend;

use super::dataset::FlatBatch;
use super::encoder::FeatureMatrix;
use super::layout::PolicyVector;
use super::loss::LossError;
use super::predictor::{ModelError, PolicyModel};

/// `[1, rows, columns]` tensor of a single feature matrix.
pub fn features_tensor<B: Backend>(features: &FeatureMatrix, device: &B::Device) -> Tensor<B, 3> {
    let [rows, columns] = features.shape();
    Tensor::<B, 1>::from_floats(features.as_slice(), device).reshape([1, rows, columns])
}

/// `[1, len]` tensor of a target or output vector.
pub fn policy_tensor<B: Backend>(vector: &PolicyVector, device: &B::Device) -> Tensor<B, 2> {
    Tensor::<B, 1>::from_floats(vector.as_slice(), device).reshape([1, vector.len()])
}

/// Feature `[batch, rows, columns]` and target `[batch, len]` tensors of a flattened batch.
pub fn batch_tensors<B: Backend>(batch: &FlatBatch, device: &B::Device) -> (Tensor<B, 3>, Tensor<B, 2>) {
    let [rows, columns] = batch.feature_shape;
    let features = Tensor::<B, 1>::from_floats(batch.features.as_slice(), device)
        .reshape([batch.batch_size, rows, columns]);
    let targets = Tensor::<B, 1>::from_floats(batch.targets.as_slice(), device)
        .reshape([batch.batch_size, batch.target_len]);
    (features, targets)
}

/// Per-sample loss `(t_out - o_out)^2 + o_policy . ln(t_policy)` of `[batch, len]` tensors.
///
/// Targets must come from validated [`TrainingSample`]s, whose policy components are all
/// positive. The logarithm is not checked here; use [`super::loss::loss`] on a single pair
/// when the inputs are not trusted.
///
/// [`TrainingSample`]: super::dataset::TrainingSample
pub fn batched_policy_value_loss<B: Backend>(
    targets: Tensor<B, 2>,
    outputs: Tensor<B, 2>,
) -> Result<Tensor<B, 1>, LossError> {
    let [batch_size, len] = targets.dims();
    if outputs.dims() != [batch_size, len] {
        return Err(LossError::ShapeMismatch {
            target: len,
            output: outputs.dims()[1],
        });
    }
    let Some(policy_len) = len.checked_sub(1) else {
        return Err(LossError::Empty);
    };

    let target_policy = targets.clone().slice([0..batch_size, 0..policy_len]);
    let output_policy = outputs.clone().slice([0..batch_size, 0..policy_len]);
    let target_outcome = targets.slice([0..batch_size, policy_len..len]);
    let output_outcome = outputs.slice([0..batch_size, policy_len..len]);

    let outcome = (target_outcome - output_outcome).powf_scalar(2.0);
    let policy = (output_policy * target_policy.log()).sum_dim(1);

    Ok((outcome + policy).squeeze::<1>(1))
}

/// Runs a `burn` forward function as a [`PolicyModel`].
///
/// The function receives a `[1, rows, columns]` feature tensor and returns `[1, len]`.
pub struct BurnPolicy<B: Backend, F> {
    device: B::Device,
    forward: F,
}

impl<B: Backend, F> BurnPolicy<B, F>
where
    F: Fn(Tensor<B, 3>) -> Tensor<B, 2>,
{
    pub fn new(device: B::Device, forward: F) -> Self {
        Self { device, forward }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }
}

impl<B: Backend, F> PolicyModel for BurnPolicy<B, F>
where
    F: Fn(Tensor<B, 3>) -> Tensor<B, 2>,
{
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f32>, ModelError> {
        let input = features_tensor::<B>(features, &self.device);
        let output = (self.forward)(input);
        let [batch_size, len] = output.dims();
        if batch_size != 1 {
            return Err(format!("forward pass returned a batch of {batch_size}, expected 1").into());
        }
        tracing::trace!(len, "Forward pass done");
        output
            .reshape([len])
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| format!("cannot read output tensor: {e:?}").into())
    }
}
