//! Transition declarations.

use super::condition::Condition;
use super::id::{StateId, TransitionId};
use super::state::State;
use serde::{Deserialize, Serialize};

/// Suffix appended to a state's ID to name its synthesized fallback transition.
pub const FALLBACK_SUFFIX: &str = "::fallback";

/// Coarse kind of a transition, used for filtering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Only taken on an explicit traversal attempt.
    Action,
    /// May fire automatically while the graph is re-evaluated.
    Trigger,
}

/// How a transition is taken.
#[derive(Clone, Debug)]
pub enum TransitionRule {
    /// Plain directed edge for explicit traversal attempts.
    Action,
    /// Declared automatic edge, fires when its condition holds.
    Trigger(Condition),
    /// Synthesized for a conditional state: fires when the state's own
    /// condition does not hold.
    Fallback(Condition),
}

/// A declared or synthesized edge between states.
///
/// # Example
///
/// ```rust
/// use waystate::core::{Transition, TransitionKind};
///
/// let open = Transition::action("open_settings", ["dashboard", "profile"], "settings");
/// assert_eq!(open.kind(), TransitionKind::Action);
/// assert_eq!(open.sources().len(), 2);
///
/// let auto = Transition::trigger("auto_login", "login", "dashboard", || true);
/// assert_eq!(auto.kind(), TransitionKind::Trigger);
/// assert!(auto.fires());
/// ```
#[derive(Clone, Debug)]
pub struct Transition {
    id: TransitionId,
    sources: Vec<StateId>,
    target: StateId,
    rule: TransitionRule,
}

impl Transition {
    /// Action transition from any of `sources` to `target`.
    pub fn action<I, S>(id: impl Into<TransitionId>, sources: I, target: impl Into<StateId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        Self {
            id: id.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            target: target.into(),
            rule: TransitionRule::Action,
        }
    }

    /// Trigger transition from `source` to `target`, firing when `predicate` holds.
    pub fn trigger<F>(
        id: impl Into<TransitionId>,
        source: impl Into<StateId>,
        target: impl Into<StateId>,
        predicate: F,
    ) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::trigger_on(id, source, target, Condition::new(predicate))
    }

    /// Trigger transition with an existing condition.
    pub fn trigger_on(
        id: impl Into<TransitionId>,
        source: impl Into<StateId>,
        target: impl Into<StateId>,
        condition: Condition,
    ) -> Self {
        Self {
            id: id.into(),
            sources: vec![source.into()],
            target: target.into(),
            rule: TransitionRule::Trigger(condition),
        }
    }

    /// The fallback transition a conditional state implicitly owns, or `None`
    /// for unconditional states.
    pub fn fallback_for(state: &State) -> Option<Self> {
        let gate = state.gate()?;
        Some(Self {
            id: fallback_transition_id(state.id()),
            sources: vec![state.id().clone()],
            target: gate.fallback.clone(),
            rule: TransitionRule::Fallback(gate.condition.negate()),
        })
    }

    pub fn id(&self) -> &TransitionId {
        &self.id
    }

    pub fn sources(&self) -> &[StateId] {
        &self.sources
    }

    pub fn target(&self) -> &StateId {
        &self.target
    }

    pub fn rule(&self) -> &TransitionRule {
        &self.rule
    }

    pub fn kind(&self) -> TransitionKind {
        match self.rule {
            TransitionRule::Action => TransitionKind::Action,
            TransitionRule::Trigger(_) | TransitionRule::Fallback(_) => TransitionKind::Trigger,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self.rule, TransitionRule::Fallback(_))
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.iter().any(|source| source == id)
    }

    /// Evaluate the transition's own condition. Action transitions never
    /// fire on their own.
    pub fn fires(&self) -> bool {
        match &self.rule {
            TransitionRule::Action => false,
            TransitionRule::Trigger(condition) | TransitionRule::Fallback(condition) => {
                condition.check()
            }
        }
    }
}

/// ID of the fallback transition synthesized for `state`.
pub fn fallback_transition_id(state: &StateId) -> TransitionId {
    TransitionId::new(format!("{state}{FALLBACK_SUFFIX}"))
}
