//! Waystate: a hierarchical, condition-gated state machine for view selection
//!
//! Application code declares the reachable views as states, groups them,
//! and connects them with transitions. The engine decides which state is
//! current and, when told that application data changed, re-evaluates the
//! graph and moves automatically.
//!
//! # Core Concepts
//!
//! - **State**: one view, a start state, or a group of states; any state may be
//!   gated behind a condition with a fallback target
//! - **Transition**: an *action* edge taken on explicit request, or a *trigger*
//!   edge that fires on its own when its condition holds
//! - **Validation**: one structural check over the whole graph before any traversal
//! - **StateManager**: owns the current state, resolves triggers, notifies subscribers
//!
//! The engine knows nothing about views, URLs, or UI frameworks. Hosts call
//! [`StateManager::reevaluate`] when something a condition reads has changed,
//! and subscribe to [`StateChange`] notifications.
//!
//! # Example
//!
//! ```rust
//! use waystate::builder::StateManagerBuilder;
//! use waystate::core::{State, Transition};
//!
//! let mut manager = StateManagerBuilder::new()
//!     .state(State::start("start"))
//!     .state(State::group("g0", vec![State::plain("g0.s0"), State::plain("g0.s1")]))
//!     .transition(Transition::trigger("enter", "start", "g0.s0", || true))
//!     .transition(Transition::action("next", ["g0.s0"], "g0.s1"))
//!     .transition(Transition::action("back", ["g0.s1"], "g0.s0"))
//!     .build()
//!     .unwrap();
//!
//! manager.initialize().unwrap();
//! assert_eq!(manager.current_id().unwrap(), "g0.s0");
//!
//! manager.attempt_transition("g0.s1").unwrap();
//! assert_eq!(manager.current_id().unwrap(), "g0.s1");
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod graph;
pub mod validation;

// Re-export commonly used types
pub use crate::builder::StateManagerBuilder;
pub use crate::core::{Condition, State, StateId, Transition, TransitionId, TransitionKind};
pub use crate::engine::{ChangeCause, EngineError, StateChange, StateManager};
pub use crate::graph::{AncestorOrder, Graph, StateNode};
pub use crate::validation::ValidationError;
