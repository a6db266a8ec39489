/// Configuration accepted when the context is set up
pub mod config {
    pub use crate::application::config::*;
}

/// JSON documents the managed side receives for members, publications, subscriptions and streams
pub mod document {
    pub use crate::application::dto::{
        MemberDocument, PublicationDocument, StreamDocument, SubscriptionDocument,
    };
}

/// Objects and callback interfaces of the native SDK
pub mod native {
    pub use crate::domain::native::entity::*;
    pub use crate::domain::native::listener::*;
    pub use crate::domain::native::value_object::*;
}

/// Managed-side references, runtime and call descriptions
pub mod managed {
    pub use crate::domain::managed::service::*;
    pub use crate::domain::managed::value_object::*;
}

/// Handles standing in for native objects on the managed side
pub mod handle {
    pub use crate::domain::handle::entity::HandleArena;
    pub use crate::domain::handle::service::{HandleTable, NativeObject};
    pub use crate::domain::handle::value_object::NativeHandle;
}

/// Listener machinery and the concrete listener of every SDK interface
pub mod listener {
    pub use crate::application::listener::base::EventListenerBase;
    pub use crate::application::listener::dispatch::{call_managed_method, RuntimeAttachment};
    pub use crate::application::listener::dispatching::{
        Disposable, DispatchingListener, ListenerKind, ManagedEvent,
    };
    pub use crate::application::listener::events::*;
    pub use crate::application::listener::registry::ListenerRegistry;
}
