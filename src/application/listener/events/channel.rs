use std::sync::Arc;

use crate::application::dto::{
    to_json, MemberDocument, PublicationDocument, SubscriptionDocument,
};
use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::handle::service::NativeObject;
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::entity::{Member, Publication, Subscription};
use crate::domain::native::listener::ChannelEventListener;
use crate::error;

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Closed,
    MetadataUpdated(String),
    MemberListChanged,
    MemberJoined(MemberDocument),
    MemberLeft(String),
    MemberMetadataUpdated { member_id: String, metadata: String },
    PublicationMetadataUpdated { publication_id: String, metadata: String },
    PublicationListChanged,
    StreamPublished(PublicationDocument),
    StreamUnpublished(String),
    PublicationEnabled(String),
    PublicationDisabled(String),
    SubscriptionListChanged,
    PublicationSubscribed(SubscriptionDocument),
    PublicationUnsubscribed(String),
    SubscriptionEnabled(String),
    SubscriptionDisabled(String),
}

impl ManagedEvent for ChannelEvent {
    const KIND: ListenerKind = ListenerKind::Channel;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let (method, args) = match self {
            ChannelEvent::Closed => ("onClosed", vec![]),
            ChannelEvent::MetadataUpdated(metadata) => ("onMetadataUpdated", vec![metadata.into()]),
            ChannelEvent::MemberListChanged => ("onMemberListChanged", vec![]),
            ChannelEvent::MemberJoined(member) => ("onMemberJoined", vec![to_json(&member)?.into()]),
            ChannelEvent::MemberLeft(member_id) => ("onMemberLeft", vec![member_id.into()]),
            ChannelEvent::MemberMetadataUpdated {
                member_id,
                metadata,
            } => (
                "onMemberMetadataUpdated",
                vec![member_id.into(), metadata.into()],
            ),
            ChannelEvent::PublicationMetadataUpdated {
                publication_id,
                metadata,
            } => (
                "onPublicationMetadataUpdated",
                vec![publication_id.into(), metadata.into()],
            ),
            ChannelEvent::PublicationListChanged => ("onPublicationListChanged", vec![]),
            ChannelEvent::StreamPublished(publication) => (
                "onStreamPublished",
                vec![to_json(&publication)?.into()],
            ),
            ChannelEvent::StreamUnpublished(id) => ("onStreamUnpublished", vec![id.into()]),
            ChannelEvent::PublicationEnabled(id) => ("onPublicationEnabled", vec![id.into()]),
            ChannelEvent::PublicationDisabled(id) => ("onPublicationDisabled", vec![id.into()]),
            ChannelEvent::SubscriptionListChanged => ("onSubscriptionListChanged", vec![]),
            ChannelEvent::PublicationSubscribed(subscription) => (
                "onPublicationSubscribed",
                vec![to_json(&subscription)?.into()],
            ),
            ChannelEvent::PublicationUnsubscribed(id) => {
                ("onPublicationUnsubscribed", vec![id.into()])
            }
            ChannelEvent::SubscriptionEnabled(id) => ("onSubscriptionEnabled", vec![id.into()]),
            ChannelEvent::SubscriptionDisabled(id) => ("onSubscriptionDisabled", vec![id.into()]),
        };
        Ok(ManagedCall::new(method, CallKind::Instance, args))
    }
}

pub type ChannelListener = DispatchingListener<ChannelEvent>;

impl ChannelEventListener for ChannelListener {
    fn on_closed(&self) {
        self.notify(ChannelEvent::Closed);
    }

    fn on_metadata_updated(&self, metadata: &str) {
        self.notify(ChannelEvent::MetadataUpdated(metadata.to_string()));
    }

    fn on_member_list_changed(&self) {
        self.notify(ChannelEvent::MemberListChanged);
    }

    fn on_member_joined(&self, member: &Arc<dyn Member>) {
        let document = MemberDocument::capture(member, self.handles());
        self.notify(ChannelEvent::MemberJoined(document));
    }

    fn on_member_left(&self, member: &Arc<dyn Member>) {
        self.notify_and_release(
            ChannelEvent::MemberLeft(member.id()),
            NativeObject::Member(member.clone()),
        );
    }

    fn on_member_metadata_updated(&self, member: &Arc<dyn Member>, metadata: &str) {
        self.notify(ChannelEvent::MemberMetadataUpdated {
            member_id: member.id(),
            metadata: metadata.to_string(),
        });
    }

    fn on_publication_metadata_updated(&self, publication: &Arc<dyn Publication>, metadata: &str) {
        self.notify(ChannelEvent::PublicationMetadataUpdated {
            publication_id: publication.id(),
            metadata: metadata.to_string(),
        });
    }

    fn on_publication_list_changed(&self) {
        self.notify(ChannelEvent::PublicationListChanged);
    }

    fn on_stream_published(&self, publication: &Arc<dyn Publication>) {
        let document = PublicationDocument::capture(publication, self.handles());
        self.notify(ChannelEvent::StreamPublished(document));
    }

    fn on_stream_unpublished(&self, publication: &Arc<dyn Publication>) {
        self.notify_and_release(
            ChannelEvent::StreamUnpublished(publication.id()),
            NativeObject::Publication(publication.clone()),
        );
    }

    fn on_publication_enabled(&self, publication: &Arc<dyn Publication>) {
        self.notify(ChannelEvent::PublicationEnabled(publication.id()));
    }

    fn on_publication_disabled(&self, publication: &Arc<dyn Publication>) {
        self.notify(ChannelEvent::PublicationDisabled(publication.id()));
    }

    fn on_subscription_list_changed(&self) {
        self.notify(ChannelEvent::SubscriptionListChanged);
    }

    fn on_publication_subscribed(&self, subscription: &Arc<dyn Subscription>) {
        let document = SubscriptionDocument::capture(subscription, self.handles());
        self.notify(ChannelEvent::PublicationSubscribed(document));
    }

    fn on_publication_unsubscribed(&self, subscription: &Arc<dyn Subscription>) {
        self.notify_and_release(
            ChannelEvent::PublicationUnsubscribed(subscription.id()),
            NativeObject::Subscription(subscription.clone()),
        );
    }

    fn on_subscription_enabled(&self, subscription: &Arc<dyn Subscription>) {
        self.notify(ChannelEvent::SubscriptionEnabled(subscription.id()));
    }

    fn on_subscription_disabled(&self, subscription: &Arc<dyn Subscription>) {
        self.notify(ChannelEvent::SubscriptionDisabled(subscription.id()));
    }
}
