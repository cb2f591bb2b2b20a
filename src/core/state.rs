//! State declarations.
//!
//! States are declared as a tree: a group owns its children, which may
//! themselves be groups. Declarations are plain values; they carry no
//! runtime position and no parent pointers. The validated [`Graph`] is where
//! parent relations live.
//!
//! [`Graph`]: crate::graph::Graph

use super::condition::Condition;
use super::id::StateId;

/// Variant-specific role of a declared state.
#[derive(Clone, Debug)]
pub enum StateKind {
    /// No special role.
    Plain,
    /// The initial current state. Exactly one must exist, at the top level.
    Start,
    /// Owns child states. Never the target of a transition.
    Group(Vec<State>),
}

/// Condition attached to a state, with the state to fall back to while the
/// condition does not hold.
#[derive(Clone, Debug)]
pub struct Gate {
    pub condition: Condition,
    pub fallback: StateId,
}

/// A declared state: one reachable view, or a group of them.
///
/// # Example
///
/// ```rust
/// use waystate::core::State;
///
/// let app = vec![
///     State::start("login"),
///     State::group("logged_in", vec![State::plain("dashboard")])
///         .when(|| true, "login"),
/// ];
///
/// assert!(app[0].is_start());
/// assert!(app[1].is_group());
/// assert!(app[1].is_conditional());
/// assert_eq!(app[1].children().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct State {
    id: StateId,
    kind: StateKind,
    gate: Option<Gate>,
}

impl State {
    pub fn new(id: impl Into<StateId>, kind: StateKind) -> Self {
        Self {
            id: id.into(),
            kind,
            gate: None,
        }
    }

    /// A state with no special role.
    pub fn plain(id: impl Into<StateId>) -> Self {
        Self::new(id, StateKind::Plain)
    }

    /// The start state.
    pub fn start(id: impl Into<StateId>) -> Self {
        Self::new(id, StateKind::Start)
    }

    /// A group owning `children`.
    pub fn group(id: impl Into<StateId>, children: impl IntoIterator<Item = State>) -> Self {
        Self::new(id, StateKind::Group(children.into_iter().collect()))
    }

    /// Gate this state behind `predicate`, falling back to `fallback` while
    /// it evaluates false.
    pub fn when<F>(self, predicate: F, fallback: impl Into<StateId>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.gated(Condition::new(predicate), fallback)
    }

    /// Gate this state behind an existing condition.
    pub fn gated(mut self, condition: Condition, fallback: impl Into<StateId>) -> Self {
        self.gate = Some(Gate {
            condition,
            fallback: fallback.into(),
        });
        self
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_ref()
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, StateKind::Start)
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, StateKind::Group(_))
    }

    pub fn is_conditional(&self) -> bool {
        self.gate.is_some()
    }

    /// Direct children; empty for non-group states.
    pub fn children(&self) -> &[State] {
        match &self.kind {
            StateKind::Group(children) => children,
            StateKind::Plain | StateKind::Start => &[],
        }
    }

    pub(crate) fn into_parts(self) -> (StateId, StateKind, Option<Gate>) {
        (self.id, self.kind, self.gate)
    }
}
