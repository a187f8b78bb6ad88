//! Core domain models for Trapline
//!
//! This crate contains the shared data structures used across
//! the operator console: zones, rules and their components, captured
//! requests, templates, and the fixed action vocabulary.

pub mod action;
pub mod error;
pub mod models;

pub use action::ActionName;
pub use error::CoreError;
pub use models::*;
