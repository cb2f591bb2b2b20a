//! Conditions that gate states and fire trigger transitions.
//!
//! A condition is a zero-argument predicate over data the host application
//! owns (authentication status, feature flags, ...). The engine never
//! observes that data itself; it only evaluates conditions when asked to
//! resolve the graph.

use std::fmt;
use std::sync::Arc;

/// Shared boolean predicate evaluated against external application data.
///
/// Conditions are cheap to clone: clones share the same underlying closure.
///
/// # Example
///
/// ```rust
/// use waystate::core::Condition;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let signed_in = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&signed_in);
/// let condition = Condition::new(move || flag.load(Ordering::SeqCst));
///
/// assert!(!condition.check());
/// signed_in.store(true, Ordering::SeqCst);
/// assert!(condition.check());
/// assert!(!condition.negate().check());
/// ```
#[derive(Clone)]
pub struct Condition {
    predicate: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Condition {
    /// Create a condition from a predicate.
    ///
    /// The predicate is invoked synchronously during resolution and must not
    /// call back into the state manager.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Condition that always holds.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Condition that never holds.
    pub fn never() -> Self {
        Self::new(|| false)
    }

    /// Evaluate the predicate now.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }

    /// Logical negation, sharing the original predicate.
    pub fn negate(&self) -> Self {
        let inner = Arc::clone(&self.predicate);
        Self::new(move || !inner())
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn condition_reads_external_data() {
        let flag = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&flag);
        let condition = Condition::new(move || seen.load(Ordering::SeqCst));

        assert!(!condition.check());
        flag.store(true, Ordering::SeqCst);
        assert!(condition.check());
    }

    #[test]
    fn negate_inverts_current_value() {
        let flag = Arc::new(AtomicBool::new(true));
        let seen = Arc::clone(&flag);
        let negated = Condition::new(move || seen.load(Ordering::SeqCst)).negate();

        assert!(!negated.check());
        flag.store(false, Ordering::SeqCst);
        assert!(negated.check());
    }

    #[test]
    fn clones_share_the_predicate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let condition = Condition::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        let clone = condition.clone();

        condition.check();
        clone.check();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn constant_conditions() {
        assert!(Condition::always().check());
        assert!(!Condition::never().check());
        assert!(Condition::never().negate().check());
    }
}
