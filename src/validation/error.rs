//! Structural declaration errors.

use crate::core::{StateId, TransitionId};
use thiserror::Error;

/// Errors found while checking a declared graph before any traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Duplicate state ID '{0}'")]
    DuplicateState(StateId),

    #[error("Duplicate transition ID '{0}'")]
    DuplicateTransition(TransitionId),

    #[error("Transition '{transition}' targets group state '{target}'. Groups cannot be entered directly")]
    GroupTarget {
        transition: TransitionId,
        target: StateId,
    },

    #[error("Transition '{transition}' references unknown state '{state}'")]
    UnknownState {
        transition: TransitionId,
        state: StateId,
    },

    #[error("Transition '{0}' has no source states")]
    NoSources(TransitionId),

    #[error("No start state declared. Declare exactly one with State::start")]
    MissingStartState,

    #[error("Multiple start states declared: {}", join(.0))]
    MultipleStartStates(Vec<StateId>),

    #[error("Start state '{state}' is nested inside group '{group}'")]
    NestedStartState { state: StateId, group: StateId },

    #[error("State '{0}' is not the target of any transition")]
    UnreachableState(StateId),
}

fn join(ids: &[StateId]) -> String {
    ids.iter()
        .map(StateId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
