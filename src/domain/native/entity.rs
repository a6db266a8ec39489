// Read-only views over objects owned by the native SDK.
// The bridge only snapshots them; mutating operations stay on the SDK side.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::native::value_object::{
    ContentType, MemberSide, MemberType, StreamSide, SubscriptionState,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Codec {
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_resolution_down_by: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_framerate: Option<f64>,
}

pub trait Member: Send + Sync {
    fn id(&self) -> String;
    fn name(&self) -> Option<String>;
    fn subtype(&self) -> String;
    fn member_type(&self) -> MemberType;
    fn side(&self) -> MemberSide;
}

pub trait Publication: Send + Sync {
    fn id(&self) -> String;
    fn publisher_id(&self) -> Option<String>;
    fn content_type(&self) -> ContentType;
    /// Id of the publication this one forwards, set for SFU forwarded publications.
    fn origin_id(&self) -> Option<String>;
    fn codec_capabilities(&self) -> Vec<Codec>;
    fn encodings(&self) -> Vec<Encoding>;
}

pub trait Subscription: Send + Sync {
    fn id(&self) -> String;
    fn content_type(&self) -> Option<ContentType>;
    fn publication_id(&self) -> Option<String>;
    fn subscriber_id(&self) -> Option<String>;
    fn state(&self) -> SubscriptionState;
    /// Remote stream being received; absent until the subscription is established.
    fn stream(&self) -> Option<Arc<dyn Stream>>;
}

pub trait Stream: Send + Sync {
    fn id(&self) -> String;
    fn side(&self) -> StreamSide;
    fn content_type(&self) -> ContentType;
}

pub trait Channel: Send + Sync {
    fn id(&self) -> String;
    fn name(&self) -> Option<String>;
}
