pub mod base;
pub mod dispatch;
pub mod dispatching;
pub mod events;
pub mod registry;
