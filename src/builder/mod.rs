//! Builder API for ergonomic state manager construction.
//!
//! This module provides a fluent builder for accumulating declarations and
//! short helpers for the two kinds of declared transition.

mod manager;

pub use manager::StateManagerBuilder;

use crate::core::{StateId, Transition, TransitionId};

/// Create an action transition with a single source.
///
/// # Example
///
/// ```
/// use waystate::builder::action;
///
/// let open = action("open_settings", "dashboard", "settings");
/// assert_eq!(open.sources().len(), 1);
/// ```
pub fn action(
    id: impl Into<TransitionId>,
    from: impl Into<StateId>,
    to: impl Into<StateId>,
) -> Transition {
    let from: StateId = from.into();
    Transition::action(id, [from], to)
}

/// Create a trigger transition firing when `predicate` holds.
///
/// # Example
///
/// ```
/// use waystate::builder::trigger;
///
/// let skip = trigger("skip_intro", "intro", "home", || true);
/// assert!(skip.fires());
/// ```
pub fn trigger<F>(
    id: impl Into<TransitionId>,
    from: impl Into<StateId>,
    to: impl Into<StateId>,
    predicate: F,
) -> Transition
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Transition::trigger(id, from, to, predicate)
}
