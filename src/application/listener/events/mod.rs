// One event table per SDK listener interface.
// Each table maps a callback to the managed method of the same meaning.

pub mod auth_token;
pub mod channel;
pub mod context;
pub mod data_stream;
pub mod local_person;
pub mod member;
pub mod publication;
pub mod subscription;

pub use auth_token::{AuthTokenEvent, AuthTokenListener};
pub use channel::{ChannelEvent, ChannelListener};
pub use context::{ContextEvent, ContextListener};
pub use data_stream::{DataStreamEvent, DataStreamListener};
pub use local_person::{LocalPersonEvent, LocalPersonListener};
pub use member::{MemberEvent, MemberListener};
pub use publication::{PublicationEvent, PublicationListener};
pub use subscription::{SubscriptionEvent, SubscriptionListener};
