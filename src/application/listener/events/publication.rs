use std::sync::Arc;

use crate::application::dto::{to_json, SubscriptionDocument};
use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::handle::service::NativeObject;
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::entity::Subscription;
use crate::domain::native::listener::PublicationEventListener;
use crate::domain::native::value_object::ConnectionState;
use crate::error;

#[derive(Debug, Clone, PartialEq)]
pub enum PublicationEvent {
    Unpublished,
    Subscribed(SubscriptionDocument),
    Unsubscribed(SubscriptionDocument),
    SubscriptionListChanged,
    MetadataUpdated(String),
    Enabled,
    Disabled,
    ConnectionStateChanged(ConnectionState),
}

impl ManagedEvent for PublicationEvent {
    const KIND: ListenerKind = ListenerKind::Publication;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let (method, args) = match self {
            PublicationEvent::Unpublished => ("onUnpublished", vec![]),
            PublicationEvent::Subscribed(subscription) => {
                ("onSubscribed", vec![to_json(&subscription)?.into()])
            }
            PublicationEvent::Unsubscribed(subscription) => {
                ("onUnsubscribed", vec![to_json(&subscription)?.into()])
            }
            PublicationEvent::SubscriptionListChanged => ("onSubscriptionListChanged", vec![]),
            PublicationEvent::MetadataUpdated(metadata) => {
                ("onMetadataUpdated", vec![metadata.into()])
            }
            PublicationEvent::Enabled => ("onEnabled", vec![]),
            PublicationEvent::Disabled => ("onDisabled", vec![]),
            PublicationEvent::ConnectionStateChanged(state) => {
                ("onConnectionStateChanged", vec![state.as_str().into()])
            }
        };
        Ok(ManagedCall::new(method, CallKind::Instance, args))
    }
}

pub type PublicationListener = DispatchingListener<PublicationEvent>;

impl PublicationEventListener for PublicationListener {
    fn on_unpublished(&self) {
        self.notify(PublicationEvent::Unpublished);
    }

    fn on_subscribed(&self, subscription: &Arc<dyn Subscription>) {
        let document = SubscriptionDocument::capture(subscription, self.handles());
        self.notify(PublicationEvent::Subscribed(document));
    }

    // the document keeps its pointer valid until the managed side has handled it
    fn on_unsubscribed(&self, subscription: &Arc<dyn Subscription>) {
        let document = SubscriptionDocument::capture(subscription, self.handles());
        self.notify_and_release(
            PublicationEvent::Unsubscribed(document),
            NativeObject::Subscription(subscription.clone()),
        );
    }

    fn on_subscription_list_changed(&self) {
        self.notify(PublicationEvent::SubscriptionListChanged);
    }

    fn on_metadata_updated(&self, metadata: &str) {
        self.notify(PublicationEvent::MetadataUpdated(metadata.to_string()));
    }

    fn on_enabled(&self) {
        self.notify(PublicationEvent::Enabled);
    }

    fn on_disabled(&self) {
        self.notify(PublicationEvent::Disabled);
    }

    fn on_connection_state_changed(&self, state: ConnectionState) {
        self.notify(PublicationEvent::ConnectionStateChanged(state));
    }
}
