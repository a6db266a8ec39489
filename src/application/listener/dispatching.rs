use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use crate::application::config::DispatchConfig;
use crate::application::listener::base::EventListenerBase;
use crate::application::listener::dispatch::call_managed_method;
use crate::domain::handle::service::{HandleTable, NativeObject};
use crate::domain::managed::service::{ManagedObject, ManagedRuntime};
use crate::domain::managed::value_object::ManagedCall;
use crate::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Channel,
    Member,
    LocalPerson,
    Publication,
    Subscription,
    Context,
    AuthToken,
    DataStream,
    WebSocket,
}

impl ListenerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListenerKind::Channel => "channel",
            ListenerKind::Member => "member",
            ListenerKind::LocalPerson => "local_person",
            ListenerKind::Publication => "publication",
            ListenerKind::Subscription => "subscription",
            ListenerKind::Context => "context",
            ListenerKind::AuthToken => "auth_token",
            ListenerKind::DataStream => "data_stream",
            ListenerKind::WebSocket => "websocket",
        }
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything the registry can tear down in bulk.
pub trait Disposable: Send + Sync {
    fn dispose(&self);
    fn is_disposed(&self) -> bool;
}

/// Snapshot of one SDK callback, ready to be replayed on the managed side.
pub trait ManagedEvent: Send + 'static {
    const KIND: ListenerKind;

    /// Managed method name and marshaled arguments for this event.
    fn into_call(self) -> Result<ManagedCall, error::Error>;
}

fn deliver<E: ManagedEvent>(target: &dyn ManagedObject, event: E) {
    let call = match event.into_call() {
        Ok(call) => call,
        Err(e) => {
            warn!(listener = E::KIND.as_str(), "dropping event: {}", e);
            return;
        }
    };
    call_managed_method(target, &call);
}

/// Listener forwarding every event of type `E` to one managed counterpart.
pub struct DispatchingListener<E: ManagedEvent> {
    target: Arc<dyn ManagedObject>,
    handles: Arc<HandleTable>,
    base: EventListenerBase,
    _event: PhantomData<fn(E)>,
}

impl<E: ManagedEvent> DispatchingListener<E> {
    pub fn new(
        target: Arc<dyn ManagedObject>,
        handles: Arc<HandleTable>,
        runtime: Arc<dyn ManagedRuntime>,
        config: DispatchConfig,
    ) -> Result<Self, error::Error> {
        if !target.is_valid() {
            return Err(error::Error::InvalidTarget(E::KIND.as_str()));
        }

        Ok(DispatchingListener {
            target,
            handles,
            base: EventListenerBase::new(E::KIND.as_str(), runtime, config),
            _event: PhantomData,
        })
    }

    /// Queues `event` for delivery. Dropped silently once disposed.
    pub fn notify(&self, event: E) {
        let target = self.target.clone();
        self.base.dispatch(move || deliver(target.as_ref(), event));
    }

    /// Queues `event`, then releases the handle of `object` once the managed side has seen it.
    /// The handle is released right away when the event cannot be queued.
    pub(crate) fn notify_and_release(&self, event: E, object: NativeObject) {
        let target = self.target.clone();
        let handles = self.handles.clone();
        let released = object.clone();
        let queued = self.base.dispatch(move || {
            deliver(target.as_ref(), event);
            handles.release_object(&released);
        });
        if !queued {
            self.handles.release_object(&object);
        }
    }

    pub(crate) fn handles(&self) -> &HandleTable {
        &self.handles
    }

    pub fn pending(&self) -> usize {
        self.base.pending()
    }
}

impl<E: ManagedEvent> Disposable for DispatchingListener<E> {
    fn dispose(&self) {
        self.base.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.base.is_disposed()
    }
}
