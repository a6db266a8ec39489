//! Relays callbacks of the SkyWay native SDK to their managed-side counterparts.
//!
//! Each SDK listener interface is implemented by a listener that snapshots the callback
//! arguments on the SDK thread and replays them as managed method calls on its own worker.
//! Disposing a listener waits for that worker, so no call reaches a released managed object.

pub mod error;
pub mod prelude;

pub(crate) mod application;
pub(crate) mod di;
pub(crate) mod domain;
pub(crate) mod infra;
pub(crate) mod presentation;

pub use application::context::BridgeContext;
pub use application::websocket::{WebSocketClient, NORMAL_CLOSURE};
pub use di::RuntimeModule;
pub use domain::handle::value_object::NativeHandle;
#[cfg(feature = "jni")]
pub use infra::jni::{JniObject, JniRuntime};
pub use infra::runtime::DetachedRuntime;
pub use presentation::format_options_json;
