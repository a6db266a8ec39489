// Callback interfaces defined by the native SDK.
// The SDK calls these from its own worker threads; arguments are only valid for the duration of the
// call, so implementations must copy whatever they need before returning.
// Every method defaults to a no-op, as in the SDK headers.

use std::sync::Arc;

use crate::domain::native::entity::{Member, Publication, Subscription};
use crate::domain::native::value_object::{ConnectionState, SdkError};

pub trait ChannelEventListener: Send + Sync {
    fn on_closed(&self) {}
    fn on_metadata_updated(&self, _metadata: &str) {}
    fn on_member_list_changed(&self) {}
    fn on_member_joined(&self, _member: &Arc<dyn Member>) {}
    fn on_member_left(&self, _member: &Arc<dyn Member>) {}
    fn on_member_metadata_updated(&self, _member: &Arc<dyn Member>, _metadata: &str) {}
    fn on_publication_metadata_updated(&self, _publication: &Arc<dyn Publication>, _metadata: &str) {}
    fn on_publication_list_changed(&self) {}
    fn on_stream_published(&self, _publication: &Arc<dyn Publication>) {}
    fn on_stream_unpublished(&self, _publication: &Arc<dyn Publication>) {}
    fn on_publication_enabled(&self, _publication: &Arc<dyn Publication>) {}
    fn on_publication_disabled(&self, _publication: &Arc<dyn Publication>) {}
    fn on_subscription_list_changed(&self) {}
    fn on_publication_subscribed(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_publication_unsubscribed(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_subscription_enabled(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_subscription_disabled(&self, _subscription: &Arc<dyn Subscription>) {}
}

pub trait MemberEventListener: Send + Sync {
    fn on_left(&self) {}
    fn on_metadata_updated(&self, _metadata: &str) {}
    fn on_publication_list_changed(&self) {}
    fn on_subscription_list_changed(&self) {}
}

pub trait LocalPersonEventListener: Send + Sync {
    fn on_left(&self) {}
    fn on_metadata_updated(&self, _metadata: &str) {}
    fn on_stream_published(&self, _publication: &Arc<dyn Publication>) {}
    fn on_stream_unpublished(&self, _publication: &Arc<dyn Publication>) {}
    fn on_publication_subscribed(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_publication_unsubscribed(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_publication_list_changed(&self) {}
    fn on_subscription_list_changed(&self) {}
}

pub trait PublicationEventListener: Send + Sync {
    fn on_unpublished(&self) {}
    fn on_subscribed(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_unsubscribed(&self, _subscription: &Arc<dyn Subscription>) {}
    fn on_subscription_list_changed(&self) {}
    fn on_metadata_updated(&self, _metadata: &str) {}
    fn on_enabled(&self) {}
    fn on_disabled(&self) {}
    fn on_connection_state_changed(&self, _state: ConnectionState) {}
}

pub trait SubscriptionEventListener: Send + Sync {
    fn on_canceled(&self) {}
    fn on_enabled(&self) {}
    fn on_disabled(&self) {}
    fn on_connection_state_changed(&self, _state: ConnectionState) {}
}

pub trait ContextEventListener: Send + Sync {
    fn on_reconnect_start(&self) {}
    fn on_reconnect_success(&self) {}
    fn on_fatal_error(&self, _error: &SdkError) {}
}

pub trait AuthTokenEventListener: Send + Sync {
    fn on_token_refreshing_needed(&self) {}
    fn on_token_expired(&self) {}
}

pub trait RemoteDataStreamListener: Send + Sync {
    fn on_data(&self, _data: &str) {}
    fn on_data_buffer(&self, _data: &[u8]) {}
}

/// Listener the SDK registers on a websocket whose transport lives on the managed side.
/// This is the one interface where events flow from the managed side into the SDK.
pub trait WebSocketListener: Send + Sync {
    fn on_message(&self, _message: &str) {}
    fn on_close(&self, _code: i32) {}
    fn on_error(&self, _code: i32) {}
}
