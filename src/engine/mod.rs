//! Runtime traversal of a validated state graph.
//!
//! This module is the imperative shell around the declarations in
//! [`crate::core`]:
//!
//! - **StateManager**: owns the graph and the current-state pointer
//! - **Resolution**: recursive trigger chasing with fallback and group precedence
//! - **Notifications**: synchronous `StateChange` delivery to subscribers
//!
//! Conditions are evaluated synchronously, only while an operation runs.

mod error;
mod events;
mod manager;
mod resolve;

pub use error::EngineError;
pub use events::{ChangeCause, ResolvingFlag, StateChange, SubscriptionId};
pub use manager::StateManager;
