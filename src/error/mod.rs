//! Error handling built on `thiserror` and `anyhow`.
//!
//! This module provides the domain error types raised by the collections
//! repository and the library state, plus centralized failure reporting.

pub mod domain;
pub mod operational;

pub use {
    domain::{CollectionError, FailureKind, LibraryStateError},
    operational::ErrorReporter,
};
