//! Change notifications and the re-entrancy flag.

use crate::core::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What caused the current state to change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeCause {
    /// `initialize` moved to the start state and resolved from there.
    Initialized,
    /// Automatic resolution moved the current state.
    Triggered,
    /// An explicit traversal attempt towards `target` succeeded.
    Requested { target: StateId },
}

/// Notification delivered to subscribers after the current state changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    /// `None` only for the change made by `initialize`.
    pub from: Option<StateId>,
    pub to: StateId,
    pub cause: ChangeCause,
    pub at: DateTime<Utc>,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StateChange) + Send>;

/// Listeners in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn publish(&mut self, change: &StateChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

/// Shared, read-only view of whether the manager is resolving triggers.
///
/// Clones observe the same flag, so a condition callback can capture one and
/// check whether it is being evaluated during resolution.
#[derive(Clone, Debug, Default)]
pub struct ResolvingFlag(Arc<AtomicBool>);

impl ResolvingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag until the returned guard is dropped.
    pub(crate) fn raise(&self) -> ResolvingGuard {
        self.0.store(true, Ordering::SeqCst);
        ResolvingGuard(Arc::clone(&self.0))
    }
}

pub(crate) struct ResolvingGuard(Arc<AtomicBool>);

impl Drop for ResolvingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn change(to: &str) -> StateChange {
        StateChange {
            from: None,
            to: to.into(),
            cause: ChangeCause::Initialized,
            at: Utc::now(),
        }
    }

    #[test]
    fn publish_reaches_listeners_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = Subscribers::default();

        for name in ["first", "second"] {
            let seen = Arc::clone(&seen);
            subscribers.add(Box::new(move |c: &StateChange| {
                seen.lock().unwrap().push(format!("{name}:{}", c.to));
            }));
        }
        subscribers.publish(&change("home"));

        assert_eq!(*seen.lock().unwrap(), vec!["first:home", "second:home"]);
    }

    #[test]
    fn remove_only_drops_matching_listener() {
        let mut subscribers = Subscribers::default();
        let a = subscribers.add(Box::new(|_: &StateChange| {}));
        let b = subscribers.add(Box::new(|_: &StateChange| {}));

        assert_ne!(a, b);
        assert!(subscribers.remove(a));
        assert!(!subscribers.remove(a));
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn guard_resets_flag_on_drop() {
        let flag = ResolvingFlag::default();
        let observer = flag.clone();

        {
            let _guard = flag.raise();
            assert!(observer.is_set());
        }
        assert!(!observer.is_set());
    }

    #[test]
    fn change_serializes_with_tagged_cause() {
        let change = StateChange {
            from: Some("login".into()),
            to: "dashboard".into(),
            cause: ChangeCause::Requested {
                target: "dashboard".into(),
            },
            at: Utc::now(),
        };

        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("\"type\":\"requested\""));

        let back: StateChange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
    }
}
