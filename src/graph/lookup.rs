//! Pure lookup helpers over declarations and the validated graph.

use crate::core::{State, Transition, TransitionKind};

/// Order in which an ancestor chain is listed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AncestorOrder {
    /// Enclosing group first, outermost group last.
    NearestFirst,
    /// Outermost group first, enclosing group last.
    TopmostFirst,
}

/// Find a declared state by ID anywhere in a (possibly nested) state set.
///
/// Groups are searched depth-first in declaration order.
pub fn find_state<'a>(states: &'a [State], id: &str) -> Option<&'a State> {
    states.iter().find_map(|state| {
        if state.id() == id {
            Some(state)
        } else {
            find_state(state.children(), id)
        }
    })
}

/// Transitions leaving `source`, optionally restricted to a target and kind,
/// in declaration order.
pub fn filter_transitions<'a>(
    transitions: &'a [Transition],
    source: &'a str,
    target: Option<&'a str>,
    kind: Option<TransitionKind>,
) -> impl Iterator<Item = &'a Transition> + 'a {
    transitions.iter().filter(move |t| {
        t.has_source(source)
            && target.is_none_or(|target| t.target() == target)
            && kind.is_none_or(|kind| t.kind() == kind)
    })
}

/// Walk parent links from `start`, returning the chain nearest-first.
///
/// `parent_of` maps a node to its enclosing group.
pub(crate) fn parent_chain<N: Copy>(start: N, parent_of: impl Fn(N) -> Option<N>) -> Vec<N> {
    let mut chain = Vec::new();
    let mut cursor = parent_of(start);
    while let Some(parent) = cursor {
        chain.push(parent);
        cursor = parent_of(parent);
    }
    chain
}

pub(crate) fn ordered<T>(mut chain: Vec<T>, order: AncestorOrder) -> Vec<T> {
    if order == AncestorOrder::TopmostFirst {
        chain.reverse();
    }
    chain
}
