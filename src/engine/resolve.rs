//! Automatic-trigger resolution.
//!
//! Given a starting state, find the state the graph should settle on without
//! any explicit user action. Precedence at every state visited:
//!
//! 1. the enclosing groups, outermost first, are resolved before the state
//! 2. a failing condition sends the traversal to the state's fallback target
//! 3. otherwise the first declared trigger (in declaration order) whose
//!    target is enterable and whose own condition holds is taken
//!
//! Every move continues resolution from the state it lands on, so one call
//! can chase a chain of triggers and fallbacks. Landing twice on the same
//! state within one call is a broken trigger graph and fails immediately.

use super::error::EngineError;
use crate::core::{StateId, TransitionKind};
use crate::graph::Graph;
use tracing::{debug, trace};

pub(crate) struct Resolver<'g> {
    graph: &'g Graph,
    origin: usize,
    path: Vec<usize>,
}

impl<'g> Resolver<'g> {
    pub(crate) fn new(graph: &'g Graph, origin: usize) -> Self {
        Self {
            graph,
            origin,
            path: vec![origin],
        }
    }

    /// Resolve from the origin. `None` means the origin is where the graph
    /// already settles.
    pub(crate) fn run(mut self) -> Result<Option<usize>, EngineError> {
        self.resolve(self.origin)
    }

    fn resolve(&mut self, at: usize) -> Result<Option<usize>, EngineError> {
        let graph = self.graph;
        let node = graph.node(at);
        trace!(state = %node.id(), "resolving");

        if let Some(parent) = node.parent_index() {
            if let Some(target) = self.resolve(parent)? {
                return Ok(Some(target));
            }
        }

        if let Some(gate) = node.gate() {
            if !gate.condition.check() {
                let fallback = self.lookup(&gate.fallback)?;
                debug!(state = %node.id(), fallback = %gate.fallback, "condition failed, falling back");
                return self.land(fallback).map(Some);
            }
        }

        let triggers = graph
            .transitions_from(node.id().as_str(), None, Some(TransitionKind::Trigger))
            .filter(|transition| !transition.is_synthesized());
        for transition in triggers {
            let target = self.lookup(transition.target())?;
            if !graph.node(target).is_satisfied() {
                continue;
            }
            if transition.fires() {
                debug!(
                    transition = %transition.id(),
                    from = %node.id(),
                    to = %transition.target(),
                    "trigger fired"
                );
                return self.land(target).map(Some);
            }
        }

        Ok(None)
    }

    /// Move onto `target` and keep resolving from there.
    fn land(&mut self, target: usize) -> Result<usize, EngineError> {
        if self.path.contains(&target) {
            let mut path: Vec<StateId> = self
                .path
                .iter()
                .map(|&index| self.graph.node(index).id().clone())
                .collect();
            path.push(self.graph.node(target).id().clone());
            return Err(EngineError::CircularTraversal {
                origin: self.graph.node(self.origin).id().clone(),
                path,
            });
        }

        self.path.push(target);
        Ok(self.resolve(target)?.unwrap_or(target))
    }

    fn lookup(&self, id: &StateId) -> Result<usize, EngineError> {
        self.graph
            .index_of(id.as_str())
            .ok_or_else(|| EngineError::UnknownState(id.clone()))
    }
}
