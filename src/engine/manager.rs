//! The state manager: owns the validated graph and the current state.

use super::error::EngineError;
use super::events::{ChangeCause, ResolvingFlag, StateChange, SubscriptionId, Subscribers};
use super::resolve::Resolver;
use crate::core::{State, StateId, Transition, TransitionKind};
use crate::graph::{AncestorOrder, Graph, StateNode};
use crate::validation::{validate, ValidationError};
use chrono::Utc;
use tracing::{debug, info};

enum Phase {
    Declared {
        states: Vec<State>,
        transitions: Vec<Transition>,
    },
    Valid(Graph),
    Invalid(ValidationError),
}

/// Drives view selection over a hierarchical, condition-gated state graph.
///
/// The manager moves through a fixed lifecycle: declared, validated,
/// initialized, running. [`initialize`](Self::initialize) validates on
/// demand; every other runtime operation requires initialization.
///
/// The manager does not watch application data. Hosts call
/// [`reevaluate`](Self::reevaluate) whenever something a condition reads may
/// have changed, and subscribe to be told when the current state moves.
///
/// # Concurrency
///
/// All operations run to completion on the calling thread. The manager is
/// `Send` but not synchronised: hosts that share it between threads must
/// serialise access themselves, e.g. behind a `Mutex`. Conditions must not
/// call back into the manager.
///
/// # Example
///
/// ```rust
/// use waystate::core::{State, Transition};
/// use waystate::engine::StateManager;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let signed_in = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&signed_in);
/// let is_signed_in = move || flag.load(Ordering::SeqCst);
///
/// let mut manager = StateManager::new(
///     vec![
///         State::start("login"),
///         State::group("logged_in", vec![State::plain("dashboard")])
///             .when(is_signed_in.clone(), "login"),
///     ],
///     vec![Transition::trigger("sign_in", "login", "dashboard", is_signed_in)],
/// );
///
/// manager.initialize().unwrap();
/// assert_eq!(manager.current_id().unwrap(), "login");
///
/// signed_in.store(true, Ordering::SeqCst);
/// assert!(manager.reevaluate().unwrap());
/// assert_eq!(manager.current_id().unwrap(), "dashboard");
/// ```
pub struct StateManager {
    phase: Phase,
    current: Option<usize>,
    initialized: bool,
    resolving: ResolvingFlag,
    subscribers: Subscribers,
}

impl StateManager {
    /// Create a manager from declarations. Nothing is checked until
    /// [`validate`](Self::validate) or [`initialize`](Self::initialize).
    pub fn new(
        states: impl IntoIterator<Item = State>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Self {
        Self {
            phase: Phase::Declared {
                states: states.into_iter().collect(),
                transitions: transitions.into_iter().collect(),
            },
            current: None,
            initialized: false,
            resolving: ResolvingFlag::default(),
            subscribers: Subscribers::default(),
        }
    }

    /// Validate the declared graph once.
    ///
    /// Succeeds immediately if validation already succeeded; returns the
    /// original error again if it already failed.
    pub fn validate(&mut self) -> Result<(), EngineError> {
        let (states, transitions) = match &mut self.phase {
            Phase::Valid(_) => return Ok(()),
            Phase::Invalid(error) => return Err(EngineError::Invalid(error.clone())),
            Phase::Declared {
                states,
                transitions,
            } => (std::mem::take(states), std::mem::take(transitions)),
        };

        match validate(states, transitions) {
            Ok(graph) => {
                self.phase = Phase::Valid(graph);
                Ok(())
            }
            Err(error) => {
                self.phase = Phase::Invalid(error.clone());
                Err(error.into())
            }
        }
    }

    /// Enter the start state and resolve automatic triggers from it.
    ///
    /// Validates first if needed. Idempotent after the first success.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Ok(());
        }
        self.validate()?;

        let start = self.graph()?.start_index();
        let settled = self.resolve_from(start)?.unwrap_or(start);

        self.current = Some(settled);
        self.initialized = true;
        self.publish(None, settled, ChangeCause::Initialized)?;
        Ok(())
    }

    /// Resolve automatic triggers from the current state.
    ///
    /// Returns whether the current state changed.
    pub fn reevaluate(&mut self) -> Result<bool, EngineError> {
        let current = self.require_current()?;
        let resolved = self.resolve_from(current)?;
        self.settle(current, resolved, ChangeCause::Triggered)
    }

    /// Alias for [`reevaluate`](Self::reevaluate).
    pub fn apply_triggers(&mut self) -> Result<bool, EngineError> {
        self.reevaluate()
    }

    /// Try to move to `target` along a declared action transition.
    ///
    /// Automatic triggers are resolved first; if they move the current state
    /// the attempt is abandoned. Otherwise the current state and then its
    /// enclosing groups, nearest first, are searched for an action transition
    /// to `target`. The move is refused if the target's condition, or (when
    /// crossing into a different group chain) any enclosing group's condition,
    /// is false. After a move, triggers are resolved from the target.
    ///
    /// Returns whether the current state changed. A refused or impossible
    /// attempt is not an error.
    pub fn attempt_transition(&mut self, target: &str) -> Result<bool, EngineError> {
        let current = self.require_current()?;

        if self.reevaluate()? {
            debug!(requested = target, "automatic transition preempted requested transition");
            return Ok(true);
        }

        let Some(next) = self.plan(current, target)? else {
            return Ok(false);
        };
        let settled = self.resolve_from(next)?.unwrap_or(next);
        self.settle(
            current,
            Some(settled),
            ChangeCause::Requested {
                target: StateId::from(target),
            },
        )
    }

    /// [`attempt_transition`](Self::attempt_transition) towards a declared state.
    pub fn attempt_transition_to(&mut self, state: &State) -> Result<bool, EngineError> {
        self.attempt_transition(state.id().as_str())
    }

    /// Evaluate a state's own condition.
    pub fn check_condition(&self, id: &str) -> Result<bool, EngineError> {
        let node = self
            .graph()?
            .state(id)
            .ok_or_else(|| EngineError::UnknownState(StateId::from(id)))?;
        node.check_condition()
            .ok_or_else(|| EngineError::NotConditional(node.id().clone()))
    }

    /// Register a listener for current-state changes. Listeners run
    /// synchronously, in subscription order, at the end of the operation that
    /// caused the change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    /// Returns whether a listener was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// The validated graph.
    pub fn graph(&self) -> Result<&Graph, EngineError> {
        match &self.phase {
            Phase::Valid(graph) => Ok(graph),
            Phase::Invalid(error) => Err(EngineError::Invalid(error.clone())),
            Phase::Declared { .. } => Err(EngineError::NotValidated),
        }
    }

    /// Every state in the graph, flattened.
    pub fn states(&self) -> Result<&[StateNode], EngineError> {
        Ok(self.graph()?.states())
    }

    /// Declared and synthesized transitions.
    pub fn transitions(&self) -> Result<&[Transition], EngineError> {
        Ok(self.graph()?.transitions())
    }

    /// `None` before initialization.
    pub fn current_state(&self) -> Option<&StateNode> {
        match (&self.phase, self.current) {
            (Phase::Valid(graph), Some(index)) => Some(graph.node(index)),
            _ => None,
        }
    }

    pub fn current_id(&self) -> Option<&StateId> {
        self.current_state().map(StateNode::id)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.phase, Phase::Valid(_))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether automatic-trigger resolution is in progress.
    pub fn is_resolving(&self) -> bool {
        self.resolving.is_set()
    }

    /// Shareable handle on the resolving flag, readable from conditions.
    pub fn resolving_flag(&self) -> ResolvingFlag {
        self.resolving.clone()
    }

    /// Use a flag created before the conditions that read it.
    pub fn with_resolving_flag(mut self, flag: ResolvingFlag) -> Self {
        self.resolving = flag;
        self
    }

    fn require_current(&self) -> Result<usize, EngineError> {
        self.graph()?;
        match self.current {
            Some(index) if self.initialized => Ok(index),
            _ => Err(EngineError::NotInitialized),
        }
    }

    fn resolve_from(&self, origin: usize) -> Result<Option<usize>, EngineError> {
        let graph = self.graph()?;
        let _resolving = self.resolving.raise();
        Resolver::new(graph, origin).run()
    }

    /// Find the state an explicit attempt from `current` to `target` would
    /// enter, or `None` if the attempt is a no-op.
    fn plan(&self, current: usize, target: &str) -> Result<Option<usize>, EngineError> {
        let graph = self.graph()?;

        let sources =
            std::iter::once(current).chain(graph.ancestor_indices(current, AncestorOrder::NearestFirst));
        let found = sources.into_iter().find_map(|source| {
            graph
                .transitions_from(
                    graph.node(source).id().as_str(),
                    Some(target),
                    Some(TransitionKind::Action),
                )
                .next()
        });
        let Some(transition) = found else {
            debug!(from = %graph.node(current).id(), requested = target, "no action transition available");
            return Ok(None);
        };

        let next = graph
            .index_of(transition.target().as_str())
            .ok_or_else(|| EngineError::UnknownState(transition.target().clone()))?;
        if !graph.node(next).is_satisfied() {
            debug!(requested = target, "target condition is false");
            return Ok(None);
        }

        let from_chain = graph.ancestor_indices(current, AncestorOrder::TopmostFirst);
        let to_chain = graph.ancestor_indices(next, AncestorOrder::TopmostFirst);
        if from_chain != to_chain {
            if let Some(&closed) = to_chain
                .iter()
                .find(|&&group| !graph.node(group).is_satisfied())
            {
                debug!(requested = target, group = %graph.node(closed).id(), "enclosing group condition is false");
                return Ok(None);
            }
        }

        debug!(transition = %transition.id(), requested = target, "action transition taken");
        Ok(Some(next))
    }

    fn settle(
        &mut self,
        current: usize,
        resolved: Option<usize>,
        cause: ChangeCause,
    ) -> Result<bool, EngineError> {
        match resolved {
            Some(next) if next != current => {
                self.current = Some(next);
                self.publish(Some(current), next, cause)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn publish(
        &mut self,
        from: Option<usize>,
        to: usize,
        cause: ChangeCause,
    ) -> Result<(), EngineError> {
        let graph = self.graph()?;
        let change = StateChange {
            from: from.map(|index| graph.node(index).id().clone()),
            to: graph.node(to).id().clone(),
            cause,
            at: Utc::now(),
        };
        info!(
            from = change.from.as_ref().map(StateId::as_str).unwrap_or("-"),
            to = %change.to,
            "current state changed"
        );
        self.subscribers.publish(&change);
        Ok(())
    }
}
