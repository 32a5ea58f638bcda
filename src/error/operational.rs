//! Centralized failure reporting.
//!
//! Feed failures are caught at the subscription boundary, logged here and
//! turned into a user-facing message.

use tracing::{debug, error, warn};

use crate::error::domain::CollectionError;

/// Centralized error reporting and logging.
///
/// The `ErrorReporter` provides a consistent interface for logging
/// collection failures and mapping them to messages for end users.
pub struct ErrorReporter;

impl ErrorReporter {
    /// Logs a feed failure and returns the message to show the user.
    ///
    /// Errors that render to an empty string are logged with a bare marker
    /// followed by their debug representation.
    ///
    /// # Arguments
    ///
    /// * `caller` - Tag naming the operation that failed.
    /// * `error` - The failure to report.
    ///
    /// # Returns
    ///
    /// The user-facing message for the error's class.
    pub fn report(caller: &str, error: &CollectionError) -> &'static str {
        let detail = error.to_string();
        if detail.is_empty() {
            error!("ERROR {caller} ->");
            debug!(caller = caller, error = ?error, "Failure without message");
        } else {
            error!("ERROR {caller} -> {detail}");
        }
        Self::to_user_message(error)
    }

    /// Logs a failure that is not surfaced to the user.
    pub fn warn(caller: &str, error: &CollectionError) {
        warn!(caller = caller, error = %error, kind = ?error.kind(), "Ignored failure");
    }

    /// Converts an error to a user-friendly message.
    pub fn to_user_message(error: &CollectionError) -> &'static str {
        error.kind().user_message()
    }
}
