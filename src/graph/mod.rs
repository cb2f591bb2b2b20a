//! The validated state graph.
//!
//! A [`Graph`] is only produced by [`crate::validation::validate`]. It
//! flattens the declared state tree into an arena of [`StateNode`]s: every
//! node records the index of its enclosing group, and every group records
//! the indices of its children. The shape is immutable once built.

mod describe;
mod lookup;

pub use describe::{GraphDescription, StateDescription, StateRole, TransitionDescription};
pub use lookup::{filter_transitions, find_state, AncestorOrder};

use crate::core::{Gate, State, StateId, StateKind, Transition, TransitionKind};
use crate::validation::ValidationError;
use std::collections::HashMap;

/// Role of a flattened state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Plain,
    Start,
    Group { children: Vec<usize> },
}

/// A state inside the validated graph.
#[derive(Clone, Debug)]
pub struct StateNode {
    id: StateId,
    kind: NodeKind,
    parent: Option<usize>,
    gate: Option<Gate>,
}

impl StateNode {
    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_ref()
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, NodeKind::Start)
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn is_conditional(&self) -> bool {
        self.gate.is_some()
    }

    /// Evaluate this state's own condition, or `None` if it has none.
    pub fn check_condition(&self) -> Option<bool> {
        self.gate.as_ref().map(|gate| gate.condition.check())
    }

    /// True unless the state is conditional and its condition is false.
    pub fn is_satisfied(&self) -> bool {
        self.check_condition().unwrap_or(true)
    }

    pub(crate) fn parent_index(&self) -> Option<usize> {
        self.parent
    }
}

/// Validated, immutable state graph.
#[derive(Clone, Debug)]
pub struct Graph {
    nodes: Vec<StateNode>,
    by_id: HashMap<StateId, usize>,
    transitions: Vec<Transition>,
    start: usize,
}

impl Graph {
    /// Flatten already-checked declarations. `transitions` must include the
    /// synthesized fallback transitions.
    pub(crate) fn assemble(
        states: Vec<State>,
        transitions: Vec<Transition>,
    ) -> Result<Self, ValidationError> {
        let mut nodes = Vec::new();
        for state in states {
            flatten_into(&mut nodes, state, None);
        }

        let by_id: HashMap<StateId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        let start = nodes
            .iter()
            .position(StateNode::is_start)
            .ok_or(ValidationError::MissingStartState)?;

        Ok(Self {
            nodes,
            by_id,
            transitions,
            start,
        })
    }

    /// Every state, flattened depth-first with groups before their children.
    pub fn states(&self) -> &[StateNode] {
        &self.nodes
    }

    /// Declared transitions followed by synthesized fallback transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn start(&self) -> &StateNode {
        &self.nodes[self.start]
    }

    pub fn state(&self, id: &str) -> Option<&StateNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn parent(&self, id: &str) -> Option<&StateNode> {
        self.state(id)?.parent.map(|index| &self.nodes[index])
    }

    pub fn children(&self, id: &str) -> Vec<&StateNode> {
        match self.state(id).map(StateNode::kind) {
            Some(NodeKind::Group { children }) => {
                children.iter().map(|&index| &self.nodes[index]).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Enclosing groups of `id`. Empty for top-level or unknown states.
    pub fn ancestors(&self, id: &str, order: AncestorOrder) -> Vec<&StateNode> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        self.ancestor_indices(index, order)
            .into_iter()
            .map(|index| &self.nodes[index])
            .collect()
    }

    /// Whether `group` encloses `id` at any depth.
    pub fn is_ancestor(&self, group: &str, id: &str) -> bool {
        self.ancestors(id, AncestorOrder::NearestFirst)
            .iter()
            .any(|ancestor| ancestor.id() == group)
    }

    /// Transitions leaving `source`, in declaration order.
    pub fn transitions_from<'a>(
        &'a self,
        source: &'a str,
        target: Option<&'a str>,
        kind: Option<TransitionKind>,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        filter_transitions(&self.transitions, source, target, kind)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn node(&self, index: usize) -> &StateNode {
        &self.nodes[index]
    }

    pub(crate) fn start_index(&self) -> usize {
        self.start
    }

    pub(crate) fn ancestor_indices(&self, index: usize, order: AncestorOrder) -> Vec<usize> {
        let chain = lookup::parent_chain(index, |n| self.nodes[n].parent);
        lookup::ordered(chain, order)
    }
}

fn flatten_into(nodes: &mut Vec<StateNode>, state: State, parent: Option<usize>) -> usize {
    let (id, kind, gate) = state.into_parts();
    let index = nodes.len();
    let (kind, children) = match kind {
        StateKind::Plain => (NodeKind::Plain, Vec::new()),
        StateKind::Start => (NodeKind::Start, Vec::new()),
        StateKind::Group(children) => (
            NodeKind::Group {
                children: Vec::new(),
            },
            children,
        ),
    };
    nodes.push(StateNode {
        id,
        kind,
        parent,
        gate,
    });

    let child_indices: Vec<usize> = children
        .into_iter()
        .map(|child| flatten_into(nodes, child, Some(index)))
        .collect();
    if let NodeKind::Group { children } = &mut nodes[index].kind {
        *children = child_indices;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        let states = vec![
            State::start("start"),
            State::group(
                "outer",
                vec![
                    State::plain("a").when(|| false, "start"),
                    State::group("inner", vec![State::plain("deep")]),
                ],
            ),
        ];
        let transitions = vec![
            Transition::action("to_a", ["start"], "a"),
            Transition::trigger("to_deep", "a", "deep", || true),
        ];
        Graph::assemble(states, transitions).unwrap()
    }

    #[test]
    fn flattens_groups_before_children() {
        let graph = graph();

        let ids: Vec<&str> = graph.states().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, vec!["start", "outer", "a", "inner", "deep"]);
        assert_eq!(graph.start().id(), "start");
    }

    #[test]
    fn parent_and_children_links() {
        let graph = graph();

        assert_eq!(graph.parent("deep").unwrap().id(), "inner");
        assert_eq!(graph.parent("inner").unwrap().id(), "outer");
        assert!(graph.parent("outer").is_none());

        let children: Vec<&str> = graph
            .children("outer")
            .iter()
            .map(|s| s.id().as_str())
            .collect();
        assert_eq!(children, vec!["a", "inner"]);
        assert!(graph.children("a").is_empty());
    }

    #[test]
    fn ancestors_in_both_orders() {
        let graph = graph();

        let nearest: Vec<&str> = graph
            .ancestors("deep", AncestorOrder::NearestFirst)
            .iter()
            .map(|s| s.id().as_str())
            .collect();
        assert_eq!(nearest, vec!["inner", "outer"]);

        let topmost: Vec<&str> = graph
            .ancestors("deep", AncestorOrder::TopmostFirst)
            .iter()
            .map(|s| s.id().as_str())
            .collect();
        assert_eq!(topmost, vec!["outer", "inner"]);

        assert!(graph.ancestors("start", AncestorOrder::NearestFirst).is_empty());
        assert!(graph.ancestors("missing", AncestorOrder::NearestFirst).is_empty());
    }

    #[test]
    fn is_ancestor_checks_every_level() {
        let graph = graph();

        assert!(graph.is_ancestor("outer", "deep"));
        assert!(graph.is_ancestor("inner", "deep"));
        assert!(!graph.is_ancestor("inner", "a"));
        assert!(!graph.is_ancestor("deep", "deep"));
    }

    #[test]
    fn condition_helpers_on_nodes() {
        let graph = graph();

        let a = graph.state("a").unwrap();
        assert_eq!(a.check_condition(), Some(false));
        assert!(!a.is_satisfied());

        let deep = graph.state("deep").unwrap();
        assert_eq!(deep.check_condition(), None);
        assert!(deep.is_satisfied());
    }

    #[test]
    fn transitions_from_filters_by_kind() {
        let graph = graph();

        let triggers: Vec<&str> = graph
            .transitions_from("a", None, Some(TransitionKind::Trigger))
            .map(|t| t.id().as_str())
            .collect();
        assert_eq!(triggers, vec!["to_deep"]);
        assert_eq!(graph.transitions_from("a", None, Some(TransitionKind::Action)).count(), 0);
    }
}
