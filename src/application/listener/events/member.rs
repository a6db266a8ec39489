use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::listener::MemberEventListener;
use crate::error;

#[derive(Debug, Clone, PartialEq)]
pub enum MemberEvent {
    Left,
    MetadataUpdated(String),
    PublicationListChanged,
    SubscriptionListChanged,
}

impl ManagedEvent for MemberEvent {
    const KIND: ListenerKind = ListenerKind::Member;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let (method, args) = match self {
            MemberEvent::Left => ("onLeft", vec![]),
            MemberEvent::MetadataUpdated(metadata) => ("onMetadataUpdated", vec![metadata.into()]),
            MemberEvent::PublicationListChanged => ("onPublicationListChanged", vec![]),
            MemberEvent::SubscriptionListChanged => ("onSubscriptionListChanged", vec![]),
        };
        Ok(ManagedCall::new(method, CallKind::Instance, args))
    }
}

pub type MemberListener = DispatchingListener<MemberEvent>;

impl MemberEventListener for MemberListener {
    fn on_left(&self) {
        self.notify(MemberEvent::Left);
    }

    fn on_metadata_updated(&self, metadata: &str) {
        self.notify(MemberEvent::MetadataUpdated(metadata.to_string()));
    }

    fn on_publication_list_changed(&self) {
        self.notify(MemberEvent::PublicationListChanged);
    }

    fn on_subscription_list_changed(&self) {
        self.notify(MemberEvent::SubscriptionListChanged);
    }
}
