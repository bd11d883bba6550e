//! Module layer errors.
//!
//! Errors raised by module code itself. The runtime's containment guard
//! annotates these with module and method before applying the debug/
//! production policy; they cross the bus as a
//! [`Fault`](trellis_types::Fault).
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`NotSupported`](ModuleError::NotSupported) | `MODULE_NOT_SUPPORTED` | No |
//! | [`ExecutionFailed`](ModuleError::ExecutionFailed) | `MODULE_EXECUTION_FAILED` | Yes |
//! | [`InvalidPayload`](ModuleError::InvalidPayload) | `MODULE_INVALID_PAYLOAD` | No |
//! | [`InitFailed`](ModuleError::InitFailed) | `MODULE_INIT_FAILED` | Yes |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_types::{ErrorCode, Fault};

/// Failure raised by module code.
///
/// # Example
///
/// ```
/// use trellis_module::ModuleError;
/// use trellis_types::ErrorCode;
///
/// let err = ModuleError::NotSupported("unknown".into());
/// assert_eq!(err.code(), "MODULE_NOT_SUPPORTED");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ModuleError {
    /// The invoked method is not part of this module's surface.
    ///
    /// **Not recoverable** - the method will never exist.
    #[error("method not supported: {0}")]
    NotSupported(String),

    /// The method was recognized but failed during execution.
    ///
    /// **Recoverable** - retry may succeed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The payload doesn't match what the method expects.
    ///
    /// **Not recoverable** - fix the payload.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The module factory failed to produce an instance.
    ///
    /// **Recoverable** - may succeed with different configuration.
    #[error("initialization failed: {0}")]
    InitFailed(String),
}

impl ErrorCode for ModuleError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotSupported(_) => "MODULE_NOT_SUPPORTED",
            Self::ExecutionFailed(_) => "MODULE_EXECUTION_FAILED",
            Self::InvalidPayload(_) => "MODULE_INVALID_PAYLOAD",
            Self::InitFailed(_) => "MODULE_INIT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ExecutionFailed(_) | Self::InitFailed(_) => true,
            Self::NotSupported(_) | Self::InvalidPayload(_) => false,
        }
    }
}

impl From<ModuleError> for Fault {
    /// Converts into the record published on the bus, keeping the machine
    /// code and message. Module/method annotation is the guard's job.
    fn from(err: ModuleError) -> Self {
        Fault::new(err.code(), err.to_string())
    }
}
