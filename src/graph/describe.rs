//! Serializable snapshot of a graph's shape, for debugging and tooling.

use super::{Graph, NodeKind};
use crate::core::{StateId, TransitionId, TransitionKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateRole {
    Plain,
    Start,
    Group,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDescription {
    pub id: StateId,
    pub role: StateRole,
    pub parent: Option<StateId>,
    pub conditional: bool,
    pub fallback: Option<StateId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDescription {
    pub id: TransitionId,
    pub kind: TransitionKind,
    pub sources: Vec<StateId>,
    pub target: StateId,
    pub synthesized: bool,
}

/// Conditions are closures and are reported only as flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescription {
    pub start: StateId,
    pub states: Vec<StateDescription>,
    pub transitions: Vec<TransitionDescription>,
}

impl GraphDescription {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Graph {
    pub fn describe(&self) -> GraphDescription {
        let states = self
            .states()
            .iter()
            .map(|node| StateDescription {
                id: node.id().clone(),
                role: match node.kind() {
                    NodeKind::Plain => StateRole::Plain,
                    NodeKind::Start => StateRole::Start,
                    NodeKind::Group { .. } => StateRole::Group,
                },
                parent: node
                    .parent_index()
                    .map(|index| self.node(index).id().clone()),
                conditional: node.is_conditional(),
                fallback: node.gate().map(|gate| gate.fallback.clone()),
            })
            .collect();

        let transitions = self
            .transitions()
            .iter()
            .map(|t| TransitionDescription {
                id: t.id().clone(),
                kind: t.kind(),
                sources: t.sources().to_vec(),
                target: t.target().clone(),
                synthesized: t.is_synthesized(),
            })
            .collect();

        GraphDescription {
            start: self.start().id().clone(),
            states,
            transitions,
        }
    }
}
