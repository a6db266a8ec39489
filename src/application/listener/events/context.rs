use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::listener::ContextEventListener;
use crate::domain::native::value_object::SdkError;
use crate::error;

/// Context events land on static methods of the managed context class.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEvent {
    ReconnectStart,
    ReconnectSuccess,
    FatalError(String),
}

impl ManagedEvent for ContextEvent {
    const KIND: ListenerKind = ListenerKind::Context;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let (method, args) = match self {
            ContextEvent::ReconnectStart => ("onReconnectStart", vec![]),
            ContextEvent::ReconnectSuccess => ("onReconnectSuccess", vec![]),
            ContextEvent::FatalError(message) => ("onFatalError", vec![message.into()]),
        };
        Ok(ManagedCall::new(method, CallKind::Static, args))
    }
}

pub type ContextListener = DispatchingListener<ContextEvent>;

impl ContextEventListener for ContextListener {
    fn on_reconnect_start(&self) {
        self.notify(ContextEvent::ReconnectStart);
    }

    fn on_reconnect_success(&self) {
        self.notify(ContextEvent::ReconnectSuccess);
    }

    fn on_fatal_error(&self, error: &SdkError) {
        self.notify(ContextEvent::FatalError(error.message.clone()));
    }
}
