//! Training samples pairing a feature matrix with the target of the same turn

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use super::encoder::FeatureMatrix;
use super::layout::{PolicyLayout, TargetVector};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("feature matrix is {actual:?}, the target layout needs {expected:?}")]
    ShapeMismatch {
        expected: [usize; 2],
        actual: [usize; 2],
    },
    #[error("sample uses {actual:?}, the buffer holds {expected:?}")]
    LayoutMismatch {
        expected: PolicyLayout,
        actual: PolicyLayout,
    },
    #[error("target component {index} is {value}, expected a positive value")]
    NonPositiveTarget { index: usize, value: f32 },
}

/// One decision point: what the model saw and what the search found.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    features: FeatureMatrix,
    target: TargetVector,
}

impl TrainingSample {
    pub fn new(features: FeatureMatrix, target: TargetVector) -> Result<Self, SampleError> {
        let layout = target.layout();
        let expected = [2 * layout.party_limit(), 1 + layout.move_limit()];
        if features.shape() != expected {
            return Err(SampleError::ShapeMismatch {
                expected,
                actual: features.shape(),
            });
        }
        if let Some((index, &value)) = target
            .policy()
            .iter()
            .enumerate()
            .find(|(_, v)| !(**v > 0.0))
        {
            return Err(SampleError::NonPositiveTarget { index, value });
        }
        Ok(Self { features, target })
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn target(&self) -> &TargetVector {
        &self.target
    }
}

/// Row-major buffers of a batch, ready to be turned into tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBatch {
    pub batch_size: usize,
    /// `[rows, columns]` of every feature matrix
    pub feature_shape: [usize; 2],
    pub target_len: usize,
    pub features: Vec<f32>,
    pub targets: Vec<f32>,
}

impl FlatBatch {
    pub fn from_samples(samples: &[&TrainingSample]) -> Option<Self> {
        let first = samples.first()?;
        let feature_shape = first.features.shape();
        let target_len = first.target.len();

        let features = samples
            .iter()
            .flat_map(|s| s.features.as_slice().iter().copied())
            .collect();
        let targets = samples
            .iter()
            .flat_map(|s| s.target.as_slice().iter().copied())
            .collect();

        Some(Self {
            batch_size: samples.len(),
            feature_shape,
            target_len,
            features,
            targets,
        })
    }
}

/// Samples collected during self-play, all with the same layout.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<TrainingSample>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: TrainingSample) -> Result<(), SampleError> {
        if let Some(first) = self.samples.first() {
            let expected = first.target.layout();
            let actual = sample.target.layout();
            if expected != actual {
                return Err(SampleError::LayoutMismatch { expected, actual });
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingSample> {
        self.samples.iter()
    }

    /// Replace the outcome of every sample from `first` on with the finished game's result.
    pub fn assign_outcome(&mut self, first: usize, outcome: f32) {
        for sample in self.samples.iter_mut().skip(first) {
            sample.target.set_outcome(outcome);
        }
        tracing::debug!(
            first,
            count = self.samples.len().saturating_sub(first),
            outcome,
            "Assigned game outcome"
        );
    }

    /// Random mini-batch without replacement.
    pub fn sample_batch<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<&TrainingSample> {
        let batch_size = batch_size.min(self.samples.len());
        self.samples.choose_multiple(rng, batch_size).collect()
    }
}
