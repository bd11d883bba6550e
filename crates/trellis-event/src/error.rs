//! Event layer errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`HandlerFailed`](EventError::HandlerFailed) | `EVENT_HANDLER_FAILED` | No |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_types::{ErrorCode, Fault};

/// Event layer error.
///
/// The dispatcher deliberately does not contain subscriber failures: the
/// first failing handler aborts delivery and surfaces here, to the caller
/// of `notify`. Containment is the caller's concern: module method calls
/// are guarded one level up, and delegates route this into the runtime's
/// fault sink.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum EventError {
    /// A subscriber returned a fault during notification.
    ///
    /// `key` is the canonical rendering of the event key; `fault` is the
    /// subscriber's failure, unchanged.
    ///
    /// **Not recoverable** - re-notifying replays the same subscriber.
    #[error("handler for '{key}' failed: {fault}")]
    HandlerFailed {
        /// Canonical form of the key being notified.
        key: String,
        /// The subscriber's failure.
        fault: Fault,
    },
}

impl EventError {
    /// Extracts the carried fault, consuming the error.
    #[must_use]
    pub fn into_fault(self) -> Fault {
        match self {
            Self::HandlerFailed { fault, .. } => fault,
        }
    }
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::HandlerFailed { .. } => "EVENT_HANDLER_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
