//! Builder for assembling a state manager incrementally.

use crate::core::{State, Transition};
use crate::engine::{EngineError, ResolvingFlag, StateManager};
use crate::validation::{diagnose, ValidationError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Accumulates states and transitions before constructing a [`StateManager`].
pub struct StateManagerBuilder {
    states: Vec<State>,
    transitions: Vec<Transition>,
    validate_on_build: bool,
    initialize_on_build: bool,
    resolving: Option<ResolvingFlag>,
}

impl StateManagerBuilder {
    /// Create a new builder. Validation runs on build by default.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            validate_on_build: true,
            initialize_on_build: false,
            resolving: None,
        }
    }

    /// Add a top-level state (groups carry their own children).
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Validate while building (default `true`).
    pub fn validate_on_build(mut self, enabled: bool) -> Self {
        self.validate_on_build = enabled;
        self
    }

    /// Initialize while building (default `false`). Implies validation.
    pub fn initialize_on_build(mut self, enabled: bool) -> Self {
        self.initialize_on_build = enabled;
        self
    }

    /// Share a resolving flag with conditions declared before the manager exists.
    pub fn resolving_flag(mut self, flag: ResolvingFlag) -> Self {
        self.resolving = Some(flag);
        self
    }

    /// Every structural error in the accumulated declarations.
    pub fn diagnose(&self) -> Validation<(), NonEmptyVec<ValidationError>> {
        diagnose(&self.states, &self.transitions)
    }

    /// Build the state manager.
    /// Returns an error if the requested validation or initialization fails.
    pub fn build(self) -> Result<StateManager, EngineError> {
        let mut manager = StateManager::new(self.states, self.transitions);
        if let Some(flag) = self.resolving {
            manager = manager.with_resolving_flag(flag);
        }

        if self.initialize_on_build {
            manager.initialize()?;
        } else if self.validate_on_build {
            manager.validate()?;
        }
        Ok(manager)
    }
}

impl Default for StateManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
