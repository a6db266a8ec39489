use shaku::Interface;

use crate::domain::managed::value_object::{CallKind, ManagedValue};
use crate::error;

#[cfg(test)]
use mockall::automock;

/// Durable reference to a managed-side object.
///
/// Holding one keeps the managed object alive until the reference is dropped, so a listener
/// owns exactly one of these for its whole lifetime and releases it only after disposal.
#[cfg_attr(test, automock)]
pub trait ManagedObject: Send + Sync {
    /// false once the managed object has been invalidated or was null from the start
    fn is_valid(&self) -> bool;

    /// Calls a method synchronously from the current thread and discards its result.
    /// The caller must already be attached to the managed runtime.
    fn call_method(
        &self,
        kind: CallKind,
        method: &str,
        signature: &str,
        args: &[ManagedValue],
    ) -> Result<(), error::Error>;
}

/// Thread registration with the managed runtime.
///
/// Worker threads spawned by the bridge are unknown to the managed runtime and must attach
/// before calling into it. Attach and detach are always paired through `RuntimeAttachment`.
#[cfg_attr(test, automock)]
pub trait ManagedRuntime: Interface {
    fn attach_current_thread(&self) -> Result<(), error::Error>;
    fn detach_current_thread(&self);
}
