//! Structural validation of declared state graphs.
//!
//! Validation runs once, before any traversal. It either produces an
//! immutable [`Graph`](crate::graph::Graph) or fails with the first
//! [`ValidationError`] found. [`diagnose`] runs the same checks but collects
//! every error using Stillwater's `Validation`, for tooling that wants the
//! full list in one pass.
//!
//! # Example
//!
//! ```rust
//! use waystate::core::{State, Transition};
//! use waystate::validation::{validate, ValidationError};
//!
//! let result = validate(
//!     vec![State::start("home"), State::plain("about")],
//!     vec![Transition::action("to_about", ["home"], "about")],
//! );
//! assert!(result.is_ok());
//!
//! let result = validate(vec![State::plain("home")], Vec::new());
//! assert!(matches!(result, Err(ValidationError::MissingStartState)));
//! ```

mod error;
mod validator;

pub use crate::core::fallback_transition_id;
pub use error::ValidationError;
pub use validator::{diagnose, validate};
