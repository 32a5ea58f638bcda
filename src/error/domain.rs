//! Domain-specific error types using `thiserror`.
//!
//! This module defines the error enums for the collections repository and
//! the library state, along with the failure taxonomy shown to users.

use std::io::Error as IoError;

use {
    anyhow::Error,
    serde::{Deserialize, Serialize},
    thiserror::Error,
    tokio::time::error::Elapsed,
};

/// Message shown for connectivity-class failures.
pub const CONNECTIVITY_MESSAGE: &str = "Please check your internet connection";

/// Message shown for timeout-class failures.
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Message shown for every other failure.
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Coarse classification of a collection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The network could not be reached.
    Connectivity,
    /// The request did not complete in time.
    Timeout,
    /// Anything else.
    Other,
}

impl FailureKind {
    /// Returns the user-facing message for this failure class.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Connectivity => CONNECTIVITY_MESSAGE,
            Self::Timeout => TIMEOUT_MESSAGE,
            Self::Other => GENERIC_MESSAGE,
        }
    }
}

/// Errors produced by a collections repository.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// Transport-level I/O failure.
    #[error("Network error: {0}")]
    Network(#[from] IoError),
    /// A tokio timeout elapsed.
    #[error("Request timed out: {0}")]
    TimedOut(#[from] Elapsed),
    /// An upstream operation reported a timeout.
    #[error("Request timed out: {operation}")]
    Timeout { operation: String },
    /// Any other repository failure.
    #[error("{0}")]
    Other(#[from] Error),
}

impl CollectionError {
    /// Creates a new `Timeout` error.
    ///
    /// # Arguments
    ///
    /// * `operation` - Name of the operation that timed out.
    ///
    /// # Returns
    ///
    /// A new `CollectionError::Timeout`.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Classifies this error.
    ///
    /// Wrapped errors are classified by the first I/O or elapsed-timer error
    /// found in their source chain, with I/O taking precedence.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Connectivity,
            Self::TimedOut(_) | Self::Timeout { .. } => FailureKind::Timeout,
            Self::Other(error) => {
                if error.chain().any(|cause| cause.is::<IoError>()) {
                    FailureKind::Connectivity
                } else if error.chain().any(|cause| cause.is::<Elapsed>()) {
                    FailureKind::Timeout
                } else {
                    FailureKind::Other
                }
            }
        }
    }
}

/// Library state errors.
#[derive(Error, Debug)]
pub enum LibraryStateError {
    /// No tokio runtime was available to run background work on.
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
