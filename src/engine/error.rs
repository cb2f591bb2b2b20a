//! Runtime errors raised by the state manager.

use crate::core::StateId;
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors that can occur while driving a [`StateManager`](super::StateManager).
///
/// "No eligible transition" and "target condition is false" are not errors;
/// those attempts leave the current state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("State graph has not been validated. Call .validate() or .initialize() first")]
    NotValidated,

    #[error("State graph failed validation: {0}")]
    Invalid(#[from] ValidationError),

    #[error("State manager has not been initialized. Call .initialize() first")]
    NotInitialized,

    #[error("State '{0}' is not part of the state graph")]
    UnknownState(StateId),

    #[error("Circular traversal starting at '{origin}': {}", path_display(.path))]
    CircularTraversal { origin: StateId, path: Vec<StateId> },

    #[error("State '{0}' has no condition to check")]
    NotConditional(StateId),
}

fn path_display(path: &[StateId]) -> String {
    path.iter()
        .map(StateId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
