use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::config::DispatchConfig;
use crate::application::listener::base::EventListenerBase;
use crate::application::listener::dispatch::{call_managed_method, RuntimeAttachment};
use crate::application::listener::dispatching::{Disposable, ListenerKind};
use crate::domain::handle::value_object::NativeHandle;
use crate::domain::managed::service::{ManagedObject, ManagedRuntime};
use crate::domain::managed::value_object::{CallKind, ManagedCall, ReturnType};
use crate::domain::native::listener::WebSocketListener;
use crate::error;

pub const NORMAL_CLOSURE: i32 = 1000;

#[derive(Default)]
struct ConnectState {
    connecting: bool,
    tx: Option<oneshot::Sender<bool>>,
}

#[derive(Default)]
struct CloseState {
    closed: bool,
    closing: bool,
    tx: Option<oneshot::Sender<bool>>,
}

/// Websocket whose transport lives on the managed side.
///
/// The SDK drives it through `connect`, `send` and `close`; the managed side reports back through
/// the `on_*` entry points, which resolve pending operations or are relayed to the SDK listener.
pub struct WebSocketClient {
    target: Arc<dyn ManagedObject>,
    runtime: Arc<dyn ManagedRuntime>,
    base: EventListenerBase,
    listener: Arc<Mutex<Option<Arc<dyn WebSocketListener>>>>,
    connect_state: Mutex<ConnectState>,
    close_state: Mutex<CloseState>,
    handle: Mutex<NativeHandle>,
}

impl WebSocketClient {
    pub fn new(
        target: Arc<dyn ManagedObject>,
        runtime: Arc<dyn ManagedRuntime>,
        config: DispatchConfig,
    ) -> Result<Self, error::Error> {
        if !target.is_valid() {
            return Err(error::Error::InvalidTarget(ListenerKind::WebSocket.as_str()));
        }

        Ok(WebSocketClient {
            target,
            base: EventListenerBase::new(ListenerKind::WebSocket.as_str(), runtime.clone(), config),
            runtime,
            listener: Arc::new(Mutex::new(None)),
            connect_state: Mutex::new(ConnectState::default()),
            close_state: Mutex::new(CloseState::default()),
            handle: Mutex::new(NativeHandle::NULL),
        })
    }

    pub(crate) fn bind(&self, handle: NativeHandle) {
        *self.handle.lock() = handle;
    }

    /// Handle the managed side passes back on every report.
    pub fn handle(&self) -> NativeHandle {
        *self.handle.lock()
    }

    pub fn register_listener(&self, listener: Arc<dyn WebSocketListener>) {
        *self.listener.lock() = Some(listener);
    }

    /// Opens the socket. Resolves true once the managed side reports the connection,
    /// false on an error reported while connecting.
    pub fn connect(&self, url: &str, sub_protocol: &str) -> impl Future<Output = bool> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.connect_state.lock();
            state.connecting = true;
            state.tx = Some(tx);
        }
        self.close_state.lock().closed = false;

        let call = ManagedCall::new(
            "connect",
            CallKind::Instance,
            vec![url.into(), sub_protocol.into(), self.handle().to_raw().into()],
        );
        if !self.call(&call) {
            self.resolve_connect(false);
        }
        async move { rx.await.unwrap_or(false) }
    }

    pub fn send(&self, message: &str) -> bool {
        let call = ManagedCall::new("send", CallKind::Instance, vec![message.into()]);
        self.call(&call);
        true
    }

    /// Closes the socket. Resolves immediately when it is already closed.
    pub fn close(&self, code: i32, reason: &str) -> impl Future<Output = bool> {
        let (tx, rx) = oneshot::channel();
        let requested = {
            let mut state = self.close_state.lock();
            if state.closed {
                let _ = tx.send(true);
                false
            } else {
                state.closing = true;
                state.tx = Some(tx);
                true
            }
        };

        if requested {
            let call =
                ManagedCall::new("close", CallKind::Instance, vec![code.into(), reason.into()])
                    .returning(ReturnType::Boolean);
            if !self.call(&call) {
                self.resolve_close(false);
            }
        }
        async move { rx.await.unwrap_or(false) }
    }

    /// Closes the socket, then stops relaying events and drops the SDK listener.
    /// Nothing is torn down when the close fails.
    pub async fn destroy(&self) -> bool {
        if !self.close(NORMAL_CLOSURE, "").await {
            warn!(handle = %self.handle(), "websocket did not close, keeping listener");
            return false;
        }
        self.base.dispose();
        *self.listener.lock() = None;
        debug!(handle = %self.handle(), "websocket destroyed");
        true
    }

    pub fn on_connect(&self) {
        self.resolve_connect(true);
    }

    pub fn on_message(&self, message: &str) {
        let message = message.to_string();
        self.relay(move |listener| listener.on_message(&message));
    }

    pub fn on_close(&self, code: i32) {
        self.close_state.lock().closed = true;
        self.relay(move |listener| listener.on_close(code));
        self.resolve_close(true);
    }

    /// Errors while connecting or closing fail that operation instead of reaching the listener.
    pub fn on_error(&self, code: i32) {
        self.close_state.lock().closed = true;
        if self.resolve_connect(false) {
            return;
        }
        if self.resolve_close(false) {
            return;
        }
        self.relay(move |listener| listener.on_error(code));
    }

    fn resolve_connect(&self, result: bool) -> bool {
        let mut state = self.connect_state.lock();
        if !state.connecting {
            return false;
        }
        state.connecting = false;
        if let Some(tx) = state.tx.take() {
            let _ = tx.send(result);
        }
        true
    }

    fn resolve_close(&self, result: bool) -> bool {
        let mut state = self.close_state.lock();
        if !state.closing {
            return false;
        }
        state.closing = false;
        if let Some(tx) = state.tx.take() {
            let _ = tx.send(result);
        }
        true
    }

    // listener is read on the worker, so a listener cleared by destroy is never called
    fn relay<F>(&self, event: F)
    where
        F: FnOnce(&dyn WebSocketListener) + Send + 'static,
    {
        let listener = self.listener.clone();
        self.base.dispatch(move || {
            let listener = listener.lock().clone();
            if let Some(listener) = listener {
                event(listener.as_ref());
            }
        });
    }

    fn call(&self, call: &ManagedCall) -> bool {
        let _attachment = match RuntimeAttachment::acquire(self.runtime.as_ref()) {
            Ok(attachment) => attachment,
            Err(e) => {
                warn!("failed to attach before calling {}: {}", call.method, e);
                return false;
            }
        };
        call_managed_method(self.target.as_ref(), call)
    }
}

impl Disposable for WebSocketClient {
    fn dispose(&self) {
        self.base.dispose();
        *self.listener.lock() = None;
    }

    fn is_disposed(&self) -> bool {
        self.base.is_disposed()
    }
}

#[cfg(test)]
mod test_websocket_client {
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::*;
    use crate::application::listener::test_support::*;
    use crate::domain::managed::value_object::ManagedValue;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<String>>,
        closed: AtomicI32,
        error: AtomicI32,
    }

    impl WebSocketListener for Recorder {
        fn on_message(&self, message: &str) {
            self.messages.lock().push(message.to_string());
        }

        fn on_close(&self, code: i32) {
            self.closed.store(code, Ordering::SeqCst);
        }

        fn on_error(&self, code: i32) {
            self.error.store(code, Ordering::SeqCst);
        }
    }

    fn create_client(target: Arc<RecordingTarget>) -> Arc<WebSocketClient> {
        let client = WebSocketClient::new(target, runtime(), DispatchConfig::default()).unwrap();
        client.bind(NativeHandle::new(0, 1));
        Arc::new(client)
    }

    #[tokio::test]
    async fn connect_resolves_on_connect() {
        let target = RecordingTarget::new();
        let client = create_client(target.clone());

        let connected = client.connect("wss://example.com", "proto");
        client.on_connect();

        assert!(connected.await);
        let calls = target.calls();
        assert_eq!(calls[0].method, "connect");
        assert_eq!(calls[0].signature, "(Ljava/lang/String;Ljava/lang/String;J)V");
        assert_eq!(calls[0].args[2], ManagedValue::Long(client.handle().to_raw()));
    }

    #[tokio::test]
    async fn error_while_connecting_fails_connect() {
        let target = RecordingTarget::new();
        let client = create_client(target);
        let recorder = Arc::new(Recorder::default());
        client.register_listener(recorder.clone());

        let connected = client.connect("wss://example.com", "");
        client.on_error(1006);

        assert!(!connected.await);
        client.dispose();
        // consumed by connect, never relayed
        assert_eq!(recorder.error.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn close_resolves_on_close_and_relays() {
        let target = RecordingTarget::new();
        let client = create_client(target.clone());
        let recorder = Arc::new(Recorder::default());
        client.register_listener(recorder.clone());

        let closed = client.close(1000, "bye");
        client.on_close(1000);

        assert!(closed.await);
        client.dispose();
        assert_eq!(recorder.closed.load(Ordering::SeqCst), 1000);
        let calls = target.calls();
        assert_eq!(calls[0].method, "close");
        assert_eq!(calls[0].signature, "(ILjava/lang/String;)Z");
    }

    #[tokio::test]
    async fn close_when_already_closed() {
        let target = RecordingTarget::new();
        let client = create_client(target.clone());

        client.on_close(1000);
        assert!(client.close(1000, "").await);
        assert!(target.calls().is_empty());
    }

    #[tokio::test]
    async fn messages_are_relayed_in_order() {
        let client = create_client(RecordingTarget::new());
        let recorder = Arc::new(Recorder::default());
        client.register_listener(recorder.clone());

        client.on_message("a");
        client.on_message("b");
        client.on_error(1011);
        client.dispose();

        assert_eq!(*recorder.messages.lock(), vec!["a", "b"]);
        assert_eq!(recorder.error.load(Ordering::SeqCst), 1011);
    }

    #[test]
    fn send_forwards_message() {
        let target = RecordingTarget::new();
        let client = create_client(target.clone());

        assert!(client.send("hello"));
        assert_eq!(target.calls()[0].args, vec![ManagedValue::from("hello")]);
    }

    #[tokio::test]
    async fn destroy_drops_listener() {
        let client = create_client(RecordingTarget::new());
        let recorder = Arc::new(Recorder::default());
        client.register_listener(recorder.clone());
        client.on_close(1000);

        assert!(client.destroy().await);
        client.on_message("late");
        assert!(client.is_disposed());
        assert!(recorder.messages.lock().is_empty());
    }
}
