//! Boundary to the tree search that produces training targets.

mod node;

pub use node::{ActionKind, OutcomeNode, SearchEdge, SearchNode};
