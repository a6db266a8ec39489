// JSON documents handed to the managed side.
// They are built on the SDK callback thread, before the arguments go out of scope.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::handle::service::HandleTable;
use crate::domain::handle::value_object::NativeHandle;
use crate::domain::native::entity::{
    Codec, Encoding, Member, Publication, Stream, Subscription,
};
use crate::domain::native::value_object::{
    ContentType, MemberSide, MemberType, StreamSide, SubscriptionState,
};
use crate::error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberDocument {
    pub native_pointer: NativeHandle,
    pub id: String,
    pub name: String,
    pub subtype: String,
    #[serde(rename = "type")]
    pub member_type: MemberType,
    pub side: MemberSide,
}

impl MemberDocument {
    pub fn capture(member: &Arc<dyn Member>, handles: &HandleTable) -> Self {
        MemberDocument {
            native_pointer: handles.register_member(member),
            id: member.id(),
            name: member.name().unwrap_or_default(),
            subtype: member.subtype(),
            member_type: member.member_type(),
            side: member.side(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDocument {
    pub native_pointer: NativeHandle,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<String>,
    pub content_type: ContentType,
    pub origin_id: String,
    pub codec_capabilities: Vec<Codec>,
    pub encodings: Vec<Encoding>,
}

impl PublicationDocument {
    pub fn capture(publication: &Arc<dyn Publication>, handles: &HandleTable) -> Self {
        PublicationDocument {
            native_pointer: handles.register_publication(publication),
            id: publication.id(),
            publisher_id: publication.publisher_id(),
            content_type: publication.content_type(),
            origin_id: publication.origin_id().unwrap_or_default(),
            codec_capabilities: publication.codec_capabilities(),
            encodings: publication.encodings(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDocument {
    pub native_pointer: NativeHandle,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamDocument>,
}

impl SubscriptionDocument {
    /// A canceled subscription carries no stream even if the SDK still reports one.
    pub fn capture(subscription: &Arc<dyn Subscription>, handles: &HandleTable) -> Self {
        let native_pointer = handles.register_subscription(subscription);
        let stream = match subscription.state() {
            SubscriptionState::Canceled => None,
            _ => subscription
                .stream()
                .map(|stream| StreamDocument::capture(native_pointer, &stream, handles)),
        };
        SubscriptionDocument {
            native_pointer,
            id: subscription.id(),
            content_type: subscription.content_type(),
            publication_id: subscription.publication_id(),
            subscriber_id: subscription.subscriber_id(),
            stream,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamDocument {
    pub native_pointer: NativeHandle,
    pub id: String,
    pub side: StreamSide,
    pub content_type: ContentType,
}

impl StreamDocument {
    /// The stream handle is released together with `owner`.
    pub fn capture(owner: NativeHandle, stream: &Arc<dyn Stream>, handles: &HandleTable) -> Self {
        StreamDocument {
            native_pointer: handles.register_stream(owner, stream),
            id: stream.id(),
            side: stream.side(),
            content_type: stream.content_type(),
        }
    }
}

/// Serializes a document into the string argument the managed method expects.
pub(crate) fn to_json<T: Serialize>(document: &T) -> Result<String, error::Error> {
    serde_json::to_string(document).map_err(|e| error::Error::SerdeError { error: e })
}
