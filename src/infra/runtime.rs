use shaku::*;

use crate::domain::managed::service::ManagedRuntime;
use crate::error;

// Runtime for hosts whose threads need no registration before calling managed code,
// such as an in-process managed side or the test harness.
#[derive(Component)]
#[shaku(interface = ManagedRuntime)]
pub struct DetachedRuntime;

impl ManagedRuntime for DetachedRuntime {
    fn attach_current_thread(&self) -> Result<(), error::Error> {
        Ok(())
    }

    fn detach_current_thread(&self) {}
}
