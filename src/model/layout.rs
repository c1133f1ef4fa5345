//! Layout shared by target vectors and model output vectors
//!
//! ```text
//! [ switch_0 .. switch_{P-1} | moves of slot 0 (M) | .. | moves of slot P-1 (M) | outcome ]
//! ```
//!
//! `P` is the party limit, `M` the move limit. Party slots are in canonical order.

use std::ops::Range;

use thiserror::Error;

use super::config::EncoderConfig;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected} values, got {actual}")]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyLayout {
    party_limit: usize,
    move_limit: usize,
}

impl PolicyLayout {
    pub fn new(party_limit: usize, move_limit: usize) -> Self {
        Self {
            party_limit,
            move_limit,
        }
    }

    pub fn party_limit(&self) -> usize {
        self.party_limit
    }

    pub fn move_limit(&self) -> usize {
        self.move_limit
    }

    pub fn len(&self) -> usize {
        self.party_limit + self.party_limit * self.move_limit + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn switch_range(&self) -> Range<usize> {
        0..self.party_limit
    }

    pub fn move_segment_range(&self) -> Range<usize> {
        self.party_limit..self.outcome_index()
    }

    /// Move block of the Pokémon at `sorted_slot`.
    pub fn move_range(&self, sorted_slot: usize) -> Option<Range<usize>> {
        if sorted_slot >= self.party_limit {
            return None;
        }
        let start = self.party_limit + sorted_slot * self.move_limit;
        Some(start..start + self.move_limit)
    }

    pub fn switch_index(&self, sorted_slot: usize) -> Option<usize> {
        (sorted_slot < self.party_limit).then_some(sorted_slot)
    }

    pub fn move_index(&self, sorted_slot: usize, move_slot: usize) -> Option<usize> {
        if move_slot >= self.move_limit {
            return None;
        }
        self.move_range(sorted_slot).map(|range| range.start + move_slot)
    }

    pub fn outcome_index(&self) -> usize {
        self.len() - 1
    }
}

impl From<&EncoderConfig> for PolicyLayout {
    fn from(config: &EncoderConfig) -> Self {
        Self::new(config.party_limit, config.move_limit)
    }
}

/// Switch probabilities, per-Pokémon move probabilities and an outcome, in [`PolicyLayout`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyVector {
    layout: PolicyLayout,
    values: Vec<f32>,
}

/// Training target built from a completed search.
pub type TargetVector = PolicyVector;
/// Raw model output.
pub type OutputVector = PolicyVector;

impl PolicyVector {
    pub fn from_values(layout: PolicyLayout, values: Vec<f32>) -> Result<Self, LengthMismatch> {
        if values.len() != layout.len() {
            return Err(LengthMismatch {
                expected: layout.len(),
                actual: values.len(),
            });
        }
        Ok(Self { layout, values })
    }

    pub(crate) fn filled(layout: PolicyLayout, value: f32) -> Self {
        Self {
            layout,
            values: vec![value; layout.len()],
        }
    }

    pub(crate) fn set(&mut self, index: usize, value: f32) {
        self.values[index] = value;
    }

    pub fn layout(&self) -> PolicyLayout {
        self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn switch_segment(&self) -> &[f32] {
        &self.values[self.layout.switch_range()]
    }

    pub fn move_segment(&self) -> &[f32] {
        &self.values[self.layout.move_segment_range()]
    }

    pub fn move_block(&self, sorted_slot: usize) -> Option<&[f32]> {
        self.layout
            .move_range(sorted_slot)
            .map(|range| &self.values[range])
    }

    /// Everything but the trailing outcome.
    pub fn policy(&self) -> &[f32] {
        &self.values[..self.layout.outcome_index()]
    }

    pub fn outcome(&self) -> f32 {
        self.values[self.layout.outcome_index()]
    }

    /// Replace the trailing outcome, e.g. with the result of the finished game.
    pub fn with_outcome(mut self, outcome: f32) -> Self {
        self.set_outcome(outcome);
        self
    }

    pub(crate) fn set_outcome(&mut self, outcome: f32) {
        let index = self.layout.outcome_index();
        self.values[index] = outcome;
    }
}
