//! The module instance trait.

use crate::ModuleError;
use serde_json::Value;

/// A started module instance.
///
/// The factory registered with the runtime returns one of these; the
/// runtime wraps it in a containment guard and hands the guard out as the
/// module's public surface. Nothing but `invoke` (and the `on_stop` hook)
/// is ever called from outside.
///
/// # Interior Mutability
///
/// `invoke` takes `&self`: a module owns its state behind whatever interior
/// mutability it prefers (atomics, `Mutex`, `RwLock`). The runtime holds no
/// lock while module code runs, so a method may freely call back into its
/// context, even triggering a sibling module's lazy start, without
/// deadlocking.
///
/// # Thread Safety
///
/// Instances must be `Send + Sync`; handles to them are shared.
pub trait Module: Send + Sync {
    /// Invokes a named method with a JSON payload.
    ///
    /// # Errors
    ///
    /// - [`ModuleError::NotSupported`] for an unknown method
    /// - [`ModuleError::InvalidPayload`] when the payload doesn't parse
    /// - [`ModuleError::ExecutionFailed`] when the method itself fails
    ///
    /// Errors never escape the runtime unguarded: in debug mode they
    /// propagate to the caller annotated with module and method, in
    /// production they are contained and published as an `error` notice.
    fn invoke(&self, method: &str, payload: Value) -> Result<Value, ModuleError>;

    /// Called by the runtime when the module is stopped, after its
    /// interaction delegates are detached and before the instance record
    /// is evicted. Default is a no-op.
    fn on_stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl Module for Echo {
        fn invoke(&self, method: &str, payload: Value) -> Result<Value, ModuleError> {
            match method {
                "echo" => Ok(payload),
                other => Err(ModuleError::NotSupported(other.to_string())),
            }
        }
    }

    #[test]
    fn invoke_dispatches_by_method() {
        let module = Echo;
        assert_eq!(
            module.invoke("echo", json!({"a": 1})).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            module.invoke("missing", Value::Null).unwrap_err(),
            ModuleError::NotSupported("missing".into())
        );
    }

    #[test]
    fn on_stop_defaults_to_noop() {
        let module = Echo;
        module.on_stop();
    }

    #[test]
    fn module_is_object_safe() {
        let module: Box<dyn Module> = Box::new(Echo);
        assert!(module.invoke("echo", Value::Null).is_ok());
    }
}
