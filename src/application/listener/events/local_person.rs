use std::sync::Arc;

use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::handle::service::NativeObject;
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::entity::{Publication, Subscription};
use crate::domain::native::listener::LocalPersonEventListener;
use crate::error;

/// Events of the member this client joined as. Publications and subscriptions are referred to by
/// id only, the managed side already holds their documents.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalPersonEvent {
    Left,
    MetadataUpdated(String),
    StreamPublished(String),
    StreamUnpublished(String),
    PublicationSubscribed(String),
    PublicationUnsubscribed(String),
    PublicationListChanged,
    SubscriptionListChanged,
}

impl ManagedEvent for LocalPersonEvent {
    const KIND: ListenerKind = ListenerKind::LocalPerson;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let (method, args) = match self {
            LocalPersonEvent::Left => ("onLeft", vec![]),
            LocalPersonEvent::MetadataUpdated(metadata) => {
                ("onMetadataUpdated", vec![metadata.into()])
            }
            LocalPersonEvent::StreamPublished(id) => ("onStreamPublished", vec![id.into()]),
            LocalPersonEvent::StreamUnpublished(id) => ("onStreamUnpublished", vec![id.into()]),
            LocalPersonEvent::PublicationSubscribed(id) => {
                ("onPublicationSubscribed", vec![id.into()])
            }
            LocalPersonEvent::PublicationUnsubscribed(id) => {
                ("onPublicationUnsubscribed", vec![id.into()])
            }
            LocalPersonEvent::PublicationListChanged => ("onPublicationListChanged", vec![]),
            LocalPersonEvent::SubscriptionListChanged => ("onSubscriptionListChanged", vec![]),
        };
        Ok(ManagedCall::new(method, CallKind::Instance, args))
    }
}

pub type LocalPersonListener = DispatchingListener<LocalPersonEvent>;

impl LocalPersonEventListener for LocalPersonListener {
    fn on_left(&self) {
        self.notify(LocalPersonEvent::Left);
    }

    fn on_metadata_updated(&self, metadata: &str) {
        self.notify(LocalPersonEvent::MetadataUpdated(metadata.to_string()));
    }

    fn on_stream_published(&self, publication: &Arc<dyn Publication>) {
        self.notify(LocalPersonEvent::StreamPublished(publication.id()));
    }

    fn on_stream_unpublished(&self, publication: &Arc<dyn Publication>) {
        self.notify_and_release(
            LocalPersonEvent::StreamUnpublished(publication.id()),
            NativeObject::Publication(publication.clone()),
        );
    }

    fn on_publication_subscribed(&self, subscription: &Arc<dyn Subscription>) {
        self.notify(LocalPersonEvent::PublicationSubscribed(subscription.id()));
    }

    fn on_publication_unsubscribed(&self, subscription: &Arc<dyn Subscription>) {
        self.notify_and_release(
            LocalPersonEvent::PublicationUnsubscribed(subscription.id()),
            NativeObject::Subscription(subscription.clone()),
        );
    }

    fn on_publication_list_changed(&self) {
        self.notify(LocalPersonEvent::PublicationListChanged);
    }

    fn on_subscription_list_changed(&self) {
        self.notify(LocalPersonEvent::SubscriptionListChanged);
    }
}

#[cfg(test)]
mod test_local_person_listener {
    use super::*;
    use crate::application::config::DispatchConfig;
    use crate::application::listener::dispatching::Disposable;
    use crate::application::listener::test_support::*;
    use crate::domain::handle::service::HandleTable;
    use crate::domain::managed::value_object::ManagedValue;

    #[test]
    fn ids_are_forwarded() {
        let target = RecordingTarget::new();
        let handles = Arc::new(HandleTable::new());
        let listener =
            LocalPersonListener::new(target.clone(), handles.clone(), runtime(), DispatchConfig::default())
                .unwrap();
        let publication: Arc<dyn Publication> = Arc::new(TestPublication("p1"));
        let subscription: Arc<dyn Subscription> = Arc::new(TestSubscription("s1"));

        listener.on_stream_published(&publication);
        listener.on_publication_subscribed(&subscription);
        listener.on_left();
        listener.dispose();

        let calls = target.calls();
        assert_eq!(
            target.methods(),
            vec!["onStreamPublished", "onPublicationSubscribed", "onLeft"]
        );
        assert_eq!(calls[0].args, vec![ManagedValue::from("p1")]);
        assert_eq!(calls[1].args, vec![ManagedValue::from("s1")]);
        // ids only, nothing is registered
        assert!(handles.is_empty());
    }

    #[test]
    fn unpublishing_releases_what_the_channel_registered() {
        let target = RecordingTarget::new();
        let handles = Arc::new(HandleTable::new());
        let listener =
            LocalPersonListener::new(target.clone(), handles.clone(), runtime(), DispatchConfig::default())
                .unwrap();
        let publication: Arc<dyn Publication> = Arc::new(TestPublication("p1"));
        let subscription: Arc<dyn Subscription> = Arc::new(TestSubscription("s1"));
        handles.register_publication(&publication);
        handles.register_subscription(&subscription);

        listener.on_stream_unpublished(&publication);
        listener.on_publication_unsubscribed(&subscription);
        listener.dispose();

        assert_eq!(
            target.methods(),
            vec!["onStreamUnpublished", "onPublicationUnsubscribed"]
        );
        assert!(handles.is_empty());
    }
}
