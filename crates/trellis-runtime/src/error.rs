//! Runtime layer errors.
//!
//! Everything the runtime can fail with, across directory, container,
//! registry, and guard. All variants implement
//! [`ErrorCode`](trellis_types::ErrorCode).
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`MissingName`](RuntimeError::MissingName) | `RUNTIME_MISSING_NAME` | No |
//! | [`DuplicateRuntime`](RuntimeError::DuplicateRuntime) | `RUNTIME_DUPLICATE_RUNTIME` | No |
//! | [`UnknownRuntime`](RuntimeError::UnknownRuntime) | `RUNTIME_UNKNOWN_RUNTIME` | No |
//! | [`NoMainModule`](RuntimeError::NoMainModule) | `RUNTIME_NO_MAIN` | No |
//! | [`DuplicateModule`](RuntimeError::DuplicateModule) | `RUNTIME_DUPLICATE_MODULE` | No |
//! | [`UnknownModule`](RuntimeError::UnknownModule) | `RUNTIME_UNKNOWN_MODULE` | No |
//! | [`CyclicModule`](RuntimeError::CyclicModule) | `RUNTIME_CYCLIC_MODULE` | No |
//! | [`ModuleFailed`](RuntimeError::ModuleFailed) | `RUNTIME_MODULE_FAILED` | Yes |
//! | [`ContainerGone`](RuntimeError::ContainerGone) | `RUNTIME_CONTAINER_GONE` | No |
//! | [`Handler`](RuntimeError::Handler) | `RUNTIME_HANDLER_FAILED` | No |
//! | [`Store`](RuntimeError::Store) | `RUNTIME_STORE` | No |
//! | [`View`](RuntimeError::View) | `RUNTIME_VIEW` | No |
//!
//! # Propagation Policy
//!
//! A single dynamic `debug` flag in the container's global store governs
//! propagation, uniformly across the runtime: when truthy, a caught failure
//! re-raises synchronously to the immediate caller (fail loud); when falsy
//! it is contained and re-published as an `error` notice carrying a
//! [`Fault`] (fail soft), so one module's bug cannot halt the runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_event::EventError;
use trellis_types::{DictionaryError, ErrorCode, Fault, ModuleName, RuntimeName};
use trellis_view::ViewError;

fn chain_display(chain: &[ModuleName]) -> String {
    chain
        .iter()
        .map(ModuleName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Runtime layer error.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RuntimeError {
    /// A runtime or module name was required and empty.
    ///
    /// **Not recoverable** - the caller must supply a name.
    #[error("a name is required")]
    MissingName,

    /// A runtime with this name already exists in the directory.
    ///
    /// The existing runtime stays registered.
    ///
    /// **Not recoverable** - pick another name or destroy the holder.
    #[error("runtime '{0}' has already been created")]
    DuplicateRuntime(RuntimeName),

    /// No runtime with this name exists in the directory.
    ///
    /// **Not recoverable** - create it first.
    #[error("runtime '{0}' has not been created")]
    UnknownRuntime(RuntimeName),

    /// The addressed runtime has no started main module.
    ///
    /// **Not recoverable** - the peer must flag and start a main module.
    #[error("runtime '{0}' has no main module")]
    NoMainModule(RuntimeName),

    /// A module with this name is already registered.
    ///
    /// The first registration stays active.
    ///
    /// **Not recoverable** - same name will keep colliding.
    #[error("module '{0}' has already been added")]
    DuplicateModule(ModuleName),

    /// No module with this name is registered.
    ///
    /// **Not recoverable** - register it first.
    #[error("module '{0}' has not been added")]
    UnknownModule(ModuleName),

    /// Two module factories requested each other during start.
    ///
    /// Detected by the per-container currently-starting stack instead of
    /// overflowing the call stack. `chain` is the start chain that closed
    /// the cycle, ending in `module`.
    ///
    /// **Not recoverable** - the dependency shape is the bug.
    #[error("cyclic module dependency: {}", chain_display(.chain))]
    CyclicModule {
        /// The module whose start closed the cycle.
        module: ModuleName,
        /// The chain of in-progress starts, ending in `module`.
        chain: Vec<ModuleName>,
    },

    /// A module method or factory failed; the fault carries module and
    /// method annotations.
    ///
    /// **Recoverable** - retry may succeed.
    #[error("module failed: {0}")]
    ModuleFailed(Fault),

    /// The owning container was torn down while a context or handle to it
    /// was still alive.
    ///
    /// **Not recoverable** - the container will not come back.
    #[error("runtime container no longer exists")]
    ContainerGone,

    /// A bus subscriber failed during a notification raised through a
    /// module context.
    ///
    /// **Not recoverable** - re-notifying replays the same subscriber.
    #[error(transparent)]
    Handler(#[from] EventError),

    /// The global store rejected an operation.
    ///
    /// **Not recoverable** - fix the key.
    #[error("store error: {0}")]
    Store(#[from] DictionaryError),

    /// The visual-element tree rejected an operation.
    ///
    /// **Not recoverable** - the element is gone.
    #[error("view error: {0}")]
    View(#[from] ViewError),
}

impl RuntimeError {
    /// Converts into the record published on the `error` channel.
    ///
    /// [`ModuleFailed`](Self::ModuleFailed) passes its fault through
    /// unchanged; module-shaped variants carry their module annotation.
    #[must_use]
    pub fn to_fault(&self) -> Fault {
        match self {
            Self::ModuleFailed(fault) => fault.clone(),
            Self::Handler(err) => err.clone().into_fault(),
            Self::DuplicateModule(module) | Self::UnknownModule(module) => {
                Fault::new(self.code(), self.to_string()).with_module(module.clone())
            }
            Self::CyclicModule { module, .. } => {
                Fault::new(self.code(), self.to_string()).with_module(module.clone())
            }
            _ => Fault::new(self.code(), self.to_string()),
        }
    }
}

impl ErrorCode for RuntimeError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingName => "RUNTIME_MISSING_NAME",
            Self::DuplicateRuntime(_) => "RUNTIME_DUPLICATE_RUNTIME",
            Self::UnknownRuntime(_) => "RUNTIME_UNKNOWN_RUNTIME",
            Self::NoMainModule(_) => "RUNTIME_NO_MAIN",
            Self::DuplicateModule(_) => "RUNTIME_DUPLICATE_MODULE",
            Self::UnknownModule(_) => "RUNTIME_UNKNOWN_MODULE",
            Self::CyclicModule { .. } => "RUNTIME_CYCLIC_MODULE",
            Self::ModuleFailed(_) => "RUNTIME_MODULE_FAILED",
            Self::ContainerGone => "RUNTIME_CONTAINER_GONE",
            Self::Handler(_) => "RUNTIME_HANDLER_FAILED",
            Self::Store(_) => "RUNTIME_STORE",
            Self::View(_) => "RUNTIME_VIEW",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ModuleFailed(_))
    }
}
