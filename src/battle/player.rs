use serde::{Deserialize, Serialize};

use super::party::Party;
use super::pokemon::Pokemon;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub party: Party,
}

impl Player {
    pub fn new(name: impl Into<String>, party: impl Into<Party>) -> Self {
        Self {
            name: name.into(),
            party: party.into(),
        }
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn active(&self) -> Option<&Pokemon> {
        self.party.starting()
    }

    /// True while at least one member can still battle.
    pub fn can_battle(&self) -> bool {
        self.party.healthy_count() > 0
    }
}
