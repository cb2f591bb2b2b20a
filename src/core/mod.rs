//! Declaration types for the state graph.
//!
//! This module contains the value types application code uses to describe
//! the reachable views:
//! - Identifiers for states and transitions
//! - Conditions evaluated against external application data
//! - State declarations (plain, start, group), optionally gated
//! - Transition declarations (action, trigger, synthesized fallback)
//!
//! Nothing here evaluates the graph; see [`crate::validation`] and
//! [`crate::engine`].

mod condition;
mod id;
mod state;
mod transition;

pub use condition::Condition;
pub use id::{StateId, TransitionId};
pub use state::{Gate, State, StateKind};
pub use transition::{
    fallback_transition_id, Transition, TransitionKind, TransitionRule, FALLBACK_SUFFIX,
};
