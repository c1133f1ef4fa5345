use serde::{Deserialize, Serialize};

use crate::battle::PokemonId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Attack,
    Switch,
}

/// The action a child of a decision node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SearchEdge {
    /// `pokemon` attacks with the move at `move_slot` of its move bank.
    Attack { pokemon: PokemonId, move_slot: usize },
    /// Switch to the party member at battle-order index `slot`.
    Switch { slot: usize },
}

impl SearchEdge {
    pub fn kind(&self) -> ActionKind {
        match self {
            SearchEdge::Attack { .. } => ActionKind::Attack,
            SearchEdge::Switch { .. } => ActionKind::Switch,
        }
    }
}

/// Read-only view of a node in a completed search tree.
pub trait SearchNode {
    /// Visit-weighted value accumulated by the search at this node.
    fn outcome(&self) -> f32;

    /// The action leading into this node; `None` for the root.
    fn edge(&self) -> Option<SearchEdge>;

    fn children(&self) -> impl Iterator<Item = &Self>;
}

/// Plain owned search tree, as exported by a finished search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeNode {
    pub outcome: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<SearchEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutcomeNode>,
}

impl OutcomeNode {
    pub fn root(outcome: f32) -> Self {
        Self {
            outcome,
            edge: None,
            children: Vec::new(),
        }
    }

    pub fn child(edge: SearchEdge, outcome: f32) -> Self {
        Self {
            outcome,
            edge: Some(edge),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, edge: SearchEdge, outcome: f32) -> Self {
        self.children.push(Self::child(edge, outcome));
        self
    }

    pub fn with_attack(self, pokemon: u32, move_slot: usize, outcome: f32) -> Self {
        self.with_child(
            SearchEdge::Attack {
                pokemon: PokemonId(pokemon),
                move_slot,
            },
            outcome,
        )
    }

    pub fn with_switch(self, slot: usize, outcome: f32) -> Self {
        self.with_child(SearchEdge::Switch { slot }, outcome)
    }
}

impl SearchNode for OutcomeNode {
    fn outcome(&self) -> f32 {
        self.outcome
    }

    fn edge(&self) -> Option<SearchEdge> {
        self.edge
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_tags_children() {
        let root = OutcomeNode::root(4.0).with_switch(1, 1.0).with_attack(7, 2, 3.0);
        let kinds: Vec<ActionKind> = root
            .children()
            .filter_map(|c| c.edge())
            .map(|e| e.kind())
            .collect();
        assert_eq!(kinds, vec![ActionKind::Switch, ActionKind::Attack]);
        assert!(root.edge().is_none());
    }

    #[test]
    fn test_deserialize_exported_tree() {
        let json = r#"{
            "outcome": 2.0,
            "children": [
                { "outcome": 1.5, "edge": { "action": "attack", "pokemon": 5, "move_slot": 0 } },
                { "outcome": 0.5, "edge": { "action": "switch", "slot": 1 } }
            ]
        }"#;
        let root: OutcomeNode = serde_json::from_str(json).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(
            root.children[0].edge,
            Some(SearchEdge::Attack {
                pokemon: PokemonId(5),
                move_slot: 0
            })
        );
        assert_eq!(root.children[1].edge, Some(SearchEdge::Switch { slot: 1 }));
    }
}
