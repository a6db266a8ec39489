use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::listener::AuthTokenEventListener;
use crate::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTokenEvent {
    TokenRefreshingNeeded,
    TokenExpired,
}

impl ManagedEvent for AuthTokenEvent {
    const KIND: ListenerKind = ListenerKind::AuthToken;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let method = match self {
            AuthTokenEvent::TokenRefreshingNeeded => "onTokenRefreshingNeeded",
            AuthTokenEvent::TokenExpired => "onTokenExpired",
        };
        Ok(ManagedCall::new(method, CallKind::Static, vec![]))
    }
}

pub type AuthTokenListener = DispatchingListener<AuthTokenEvent>;

impl AuthTokenEventListener for AuthTokenListener {
    fn on_token_refreshing_needed(&self) {
        self.notify(AuthTokenEvent::TokenRefreshingNeeded);
    }

    fn on_token_expired(&self) {
        self.notify(AuthTokenEvent::TokenExpired);
    }
}
