use tracing::warn;

use crate::domain::managed::service::{ManagedObject, ManagedRuntime};
use crate::domain::managed::value_object::ManagedCall;
use crate::error;

/// Scoped registration of the current thread with the managed runtime.
/// Detaches on drop, on every exit path.
pub struct RuntimeAttachment<'a> {
    runtime: &'a dyn ManagedRuntime,
}

impl<'a> RuntimeAttachment<'a> {
    pub fn acquire(runtime: &'a dyn ManagedRuntime) -> Result<Self, error::Error> {
        runtime.attach_current_thread()?;
        Ok(RuntimeAttachment { runtime })
    }
}

impl Drop for RuntimeAttachment<'_> {
    fn drop(&mut self) {
        self.runtime.detach_current_thread();
    }
}

/// Invokes `call` on the managed counterpart.
///
/// An invalid target or a failing call is logged and swallowed; nothing is raised to the caller.
/// Returns whether the call reached the managed side.
pub fn call_managed_method(target: &dyn ManagedObject, call: &ManagedCall) -> bool {
    if !target.is_valid() {
        warn!(method = call.method, "managed object is null when calling {}", call.method);
        return false;
    }

    let signature = call.signature();
    match target.call_method(call.kind, call.method, signature.as_str(), &call.args) {
        Ok(()) => true,
        Err(e) => {
            warn!(method = call.method, "failed to call {}{}: {}", call.method, signature, e);
            false
        }
    }
}
