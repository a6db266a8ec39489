use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::listener::SubscriptionEventListener;
use crate::domain::native::value_object::ConnectionState;
use crate::error;

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEvent {
    Canceled,
    Enabled,
    Disabled,
    ConnectionStateChanged(ConnectionState),
}

impl ManagedEvent for SubscriptionEvent {
    const KIND: ListenerKind = ListenerKind::Subscription;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let (method, args) = match self {
            SubscriptionEvent::Canceled => ("onCanceled", vec![]),
            SubscriptionEvent::Enabled => ("onEnabled", vec![]),
            SubscriptionEvent::Disabled => ("onDisabled", vec![]),
            SubscriptionEvent::ConnectionStateChanged(state) => {
                ("onConnectionStateChanged", vec![state.as_str().into()])
            }
        };
        Ok(ManagedCall::new(method, CallKind::Instance, args))
    }
}

pub type SubscriptionListener = DispatchingListener<SubscriptionEvent>;

impl SubscriptionEventListener for SubscriptionListener {
    fn on_canceled(&self) {
        self.notify(SubscriptionEvent::Canceled);
    }

    fn on_enabled(&self) {
        self.notify(SubscriptionEvent::Enabled);
    }

    fn on_disabled(&self) {
        self.notify(SubscriptionEvent::Disabled);
    }

    fn on_connection_state_changed(&self, state: ConnectionState) {
        self.notify(SubscriptionEvent::ConnectionStateChanged(state));
    }
}
