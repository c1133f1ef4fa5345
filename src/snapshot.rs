//! JSON snapshot of one decision point, for offline inspection

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::Player;
use crate::model::{
    ConfigError, EncodeError, EncoderConfig, FeatureMatrix, LengthMismatch, LossError, LossTerms,
    OutputVector, PolicyVector, StateEncoder, TargetEncoder, TargetError, TargetVector,
    policy_value_loss,
};
use crate::search::OutcomeNode;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error("recorded output has the wrong length: {0}")]
    Output(#[from] LengthMismatch),
    #[error(transparent)]
    Loss(#[from] LossError),
}

/// Both players at one turn, plus whatever the search and the model said about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    #[serde(default)]
    pub config: EncoderConfig,
    pub focused: Player,
    pub opponent: Player,
    /// Root of the finished search for `focused`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<OutcomeNode>,
    /// Raw model output for this state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<f32>>,
}

/// Everything derivable from a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub features: FeatureMatrix,
    pub target: Option<TargetVector>,
    pub output: Option<OutputVector>,
    /// Present when both target and output are
    pub loss: Option<LossTerms>,
}

impl BattleSnapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&text)?;
        tracing::debug!(
            path = %path.display(),
            focused = %snapshot.focused.name,
            opponent = %snapshot.opponent.name,
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Encode the state, and the target and loss where the snapshot has the inputs for them.
    pub fn evaluate(&self) -> Result<SnapshotReport, SnapshotError> {
        let features = StateEncoder::new(self.config)?.encode_state(&self.focused, &self.opponent)?;

        let target = match &self.search {
            Some(root) => Some(TargetEncoder::new(self.config)?.encode_target(&self.focused, root)?),
            None => None,
        };

        let output = match &self.output {
            Some(values) => Some(PolicyVector::from_values(
                (&self.config).into(),
                values.clone(),
            )?),
            None => None,
        };

        let loss = match (&target, &output) {
            (Some(target), Some(output)) => Some(policy_value_loss(target, output)?),
            _ => None,
        };

        Ok(SnapshotReport {
            features,
            target,
            output,
            loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "config": { "epsilon": 0.001 },
        "focused": {
            "name": "red",
            "party": [
                { "id": 25, "name": "pikachu", "hp": 35, "base_hp": 35,
                  "move_bank": [ { "name": "thunderbolt", "pp": 15, "base_pp": 15 } ] },
                { "id": 1, "name": "bulbasaur", "hp": 20, "base_hp": 45 }
            ]
        },
        "opponent": {
            "name": "blue",
            "party": [ { "id": 7, "name": "squirtle", "hp": 44, "base_hp": 44 } ]
        },
        "search": {
            "outcome": 2.0,
            "children": [
                { "outcome": 1.0, "edge": { "action": "attack", "pokemon": 25, "move_slot": 0 } },
                { "outcome": 0.5, "edge": { "action": "switch", "slot": 1 } }
            ]
        }
    }"#;

    #[test]
    fn test_parses_with_defaults() {
        let snapshot = BattleSnapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.config.party_limit, 6);
        assert_eq!(snapshot.config.epsilon, 0.001);
        assert_eq!(snapshot.focused.party.len(), 2);
        assert!(snapshot.focused.party.as_list()[1].move_bank().is_empty());
        assert!(snapshot.output.is_none());
    }

    #[test]
    fn test_evaluate_without_output_has_no_loss() {
        let report = BattleSnapshot::from_json(SNAPSHOT).unwrap().evaluate().unwrap();
        assert_eq!(report.features.shape(), [12, 5]);
        let target = report.target.unwrap();
        assert_eq!(target.outcome(), 2.0);
        // Bulbasaur (id 1) is canonical slot 0 but battle index 1
        assert!((target.switch_segment()[0] - 0.25).abs() < 1e-6);
        assert!(report.loss.is_none());
    }

    #[test]
    fn test_evaluate_with_output() {
        let mut snapshot = BattleSnapshot::from_json(SNAPSHOT).unwrap();
        snapshot.output = Some(vec![0.1; 31]);
        let report = snapshot.evaluate().unwrap();
        assert!(report.loss.is_some());

        snapshot.output = Some(vec![0.1; 5]);
        assert!(matches!(snapshot.evaluate(), Err(SnapshotError::Output(_))));
    }

    #[test]
    fn test_json_survives_a_write() {
        let snapshot = BattleSnapshot::from_json(SNAPSHOT).unwrap();
        let again = BattleSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            BattleSnapshot::load("/nonexistent/snapshot.json"),
            Err(SnapshotError::Io { .. })
        ));
    }
}
