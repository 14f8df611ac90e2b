//! Core domain models for Policy Console
//!
//! This crate contains the shared data structures used across the
//! console: the in-progress `PolicyDraft`, the `PolicyListEntry`
//! projection used for name checks, and the `ValidationOutcome` flags
//! shown to the operator.

pub mod error;
pub mod models;
pub mod naming;

pub use error::CoreError;
pub use models::*;
pub use naming::{matching_entries, name_key};
