use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shaku::HasComponent;
use tracing::{debug, info};

use crate::application::config::{BridgeConfig, ContextOptions};
use crate::application::listener::dispatching::{Disposable, DispatchingListener, ManagedEvent};
use crate::application::listener::events::{
    AuthTokenListener, ChannelListener, ContextListener, DataStreamListener, LocalPersonListener,
    MemberListener, PublicationListener, SubscriptionListener,
};
use crate::application::listener::registry::ListenerRegistry;
use crate::application::websocket::WebSocketClient;
use crate::domain::handle::entity::HandleArena;
use crate::domain::handle::service::HandleTable;
use crate::domain::handle::value_object::NativeHandle;
use crate::domain::managed::service::{ManagedObject, ManagedRuntime};
use crate::domain::native::entity::Channel;
use crate::error;
use crate::presentation::format_options_json;

/// Everything the bridge keeps alive for one SDK context.
///
/// Channel-scoped listeners live in the registry and go away with `dispose_channel`.
/// Context-scoped listeners, websocket clients and handles go away with the context itself.
pub struct BridgeContext {
    runtime: Arc<dyn ManagedRuntime>,
    config: BridgeConfig,
    handles: Arc<HandleTable>,
    registry: ListenerRegistry,
    scoped: Mutex<Vec<Arc<dyn Disposable>>>,
    websockets: Mutex<HandleArena<Arc<WebSocketClient>>>,
    disposed: AtomicBool,
}

impl BridgeContext {
    pub fn new(runtime: Arc<dyn ManagedRuntime>, config: BridgeConfig) -> Self {
        BridgeContext {
            runtime,
            config,
            handles: Arc::new(HandleTable::new()),
            registry: ListenerRegistry::new(),
            scoped: Mutex::new(vec![]),
            websockets: Mutex::new(HandleArena::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Builds a context around the runtime registered in `module`.
    pub fn from_module<M: HasComponent<dyn ManagedRuntime>>(module: &M, config: BridgeConfig) -> Self {
        Self::new(module.resolve(), config)
    }

    /// Builds a context from the options JSON the managed side passes at setup.
    pub fn setup(runtime: Arc<dyn ManagedRuntime>, options_json: &str) -> Result<Self, error::Error> {
        let config = format_options_json(options_json)?;
        info!(
            queue_capacity = config.dispatch.queue_capacity,
            "bridge context set up"
        );
        Ok(Self::new(runtime, config))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn options(&self) -> &ContextOptions {
        &self.config.options
    }

    pub fn handles(&self) -> &Arc<HandleTable> {
        &self.handles
    }

    fn create<E: ManagedEvent>(
        &self,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<DispatchingListener<E>>, error::Error> {
        if self.is_disposed() {
            return Err(disposed());
        }
        let listener = DispatchingListener::new(
            target,
            self.handles.clone(),
            self.runtime.clone(),
            self.config.dispatch.clone(),
        )?;
        Ok(Arc::new(listener))
    }

    fn scope<L: Disposable + 'static>(&self, listener: Arc<L>) -> Result<Arc<L>, error::Error> {
        self.scoped.lock().push(listener.clone());
        self.admit(listener)
    }

    fn register<L: Disposable + 'static>(
        &self,
        channel_id: &str,
        listener: Arc<L>,
    ) -> Result<Arc<L>, error::Error> {
        self.registry.register(channel_id, listener.clone());
        self.admit(listener)
    }

    // a dispose that started after the check in `create` may already have swept past the entry
    fn admit<L: Disposable>(&self, listener: Arc<L>) -> Result<Arc<L>, error::Error> {
        if self.is_disposed() {
            listener.dispose();
            return Err(disposed());
        }
        Ok(listener)
    }

    pub fn context_listener(
        &self,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<ContextListener>, error::Error> {
        self.scope(self.create(target)?)
    }

    pub fn auth_token_listener(
        &self,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<AuthTokenListener>, error::Error> {
        self.scope(self.create(target)?)
    }

    pub fn add_channel_listener(
        &self,
        channel_id: &str,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<ChannelListener>, error::Error> {
        self.register(channel_id, self.create(target)?)
    }

    /// Members seen outside any tracked channel stay alive until the context is disposed.
    pub fn add_member_listener(
        &self,
        channel_id: Option<&str>,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<MemberListener>, error::Error> {
        let listener = self.create(target)?;
        match channel_id {
            Some(channel_id) => self.register(channel_id, listener),
            None => self.scope(listener),
        }
    }

    pub fn add_local_person_listener(
        &self,
        channel_id: &str,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<LocalPersonListener>, error::Error> {
        self.register(channel_id, self.create(target)?)
    }

    pub fn add_publication_listener(
        &self,
        channel_id: &str,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<PublicationListener>, error::Error> {
        self.register(channel_id, self.create(target)?)
    }

    pub fn add_subscription_listener(
        &self,
        channel_id: &str,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<SubscriptionListener>, error::Error> {
        self.register(channel_id, self.create(target)?)
    }

    pub fn add_data_stream_listener(
        &self,
        target: Arc<dyn ManagedObject>,
    ) -> Result<Arc<DataStreamListener>, error::Error> {
        self.scope(self.create(target)?)
    }

    pub fn register_channel(&self, channel: &Arc<dyn Channel>) -> NativeHandle {
        self.handles.register_channel(channel)
    }

    pub fn channel(&self, handle: NativeHandle) -> Result<Arc<dyn Channel>, error::Error> {
        self.handles.channel(handle)
    }

    /// Disposes every listener created for `channel_id`.
    pub fn dispose_channel(&self, channel_id: &str) {
        self.registry.dispose_all(channel_id);
    }

    pub fn channel_listener_count(&self, channel_id: &str) -> usize {
        self.registry.len(channel_id)
    }

    pub fn create_websocket_client(
        &self,
        target: Arc<dyn ManagedObject>,
    ) -> Result<(NativeHandle, Arc<WebSocketClient>), error::Error> {
        if self.is_disposed() {
            return Err(disposed());
        }
        let client = Arc::new(WebSocketClient::new(
            target,
            self.runtime.clone(),
            self.config.dispatch.clone(),
        )?);
        let handle = self.websockets.lock().insert(client.clone());
        client.bind(handle);
        let client = self.admit(client)?;
        debug!(handle = %handle, "websocket client created");
        Ok((handle, client))
    }

    /// Client the managed side refers to by `handle`.
    pub fn websocket_client(&self, handle: NativeHandle) -> Result<Arc<WebSocketClient>, error::Error> {
        self.websockets
            .lock()
            .get(handle)
            .cloned()
            .ok_or(error::Error::StaleHandle(handle))
    }

    pub fn remove_websocket_client(&self, handle: NativeHandle) -> Option<Arc<WebSocketClient>> {
        self.websockets.lock().remove(handle)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Disposes every listener and client, then forgets every handle. Runs once.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.registry.dispose_everything();
        let scoped = std::mem::take(&mut *self.scoped.lock());
        scoped.iter().for_each(|listener| listener.dispose());
        let websockets = std::mem::take(&mut *self.websockets.lock());
        websockets.values().for_each(|client| client.dispose());
        self.handles.clear();
        info!("bridge context disposed");
    }
}

fn disposed() -> error::Error {
    error::Error::create_local_error("bridge context is disposed")
}

impl Drop for BridgeContext {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod test_bridge_context {
    use super::*;
    use crate::application::listener::test_support::*;
    use crate::di::RuntimeModule;
    use crate::domain::managed::service::{MockManagedObject, MockManagedRuntime};
    use crate::domain::native::listener::AuthTokenEventListener;

    fn create_context() -> BridgeContext {
        BridgeContext::new(runtime(), BridgeConfig::default())
    }

    #[test]
    fn setup_reads_options() {
        let context = BridgeContext::setup(
            runtime(),
            r#"{ "rtcConfig": { "timeout": 10000 }, "dispatch": { "queueCapacity": 4 } }"#,
        )
        .unwrap();

        assert_eq!(context.options().rtc_config.timeout, Some(10000));
        assert_eq!(context.config().dispatch.queue_capacity, 4);
    }

    #[test]
    fn setup_rejects_invalid_json() {
        let result = BridgeContext::setup(runtime(), "{ not json");
        if let Err(error::Error::SerdeError { .. }) = result {
        } else {
            assert!(false);
        }
    }

    #[test]
    fn from_module_resolves_runtime() {
        // the overriding runtime must be the one the listeners attach through
        let mut runtime = MockManagedRuntime::default();
        runtime.expect_attach_current_thread().times(1).returning(|| Ok(()));
        runtime.expect_detach_current_thread().times(1).return_const(());
        let module = RuntimeModule::builder()
            .with_component_override::<dyn ManagedRuntime>(Box::new(runtime))
            .build();

        let context = BridgeContext::from_module(&module, BridgeConfig::default());
        let target = RecordingTarget::new();
        let listener = context.auth_token_listener(target.clone()).unwrap();
        listener.on_token_expired();
        context.dispose();

        assert_eq!(target.methods(), vec!["onTokenExpired"]);
    }

    #[test]
    fn null_target_registers_nothing() {
        let context = create_context();
        let mut target = MockManagedObject::default();
        target.expect_is_valid().return_const(false);

        let result = context.add_channel_listener("c1", Arc::new(target));

        assert!(result.is_err());
        assert_eq!(context.channel_listener_count("c1"), 0);
    }

    #[test]
    fn dispose_channel_only_touches_that_channel() {
        let context = create_context();
        let a = context.add_channel_listener("c1", RecordingTarget::new()).unwrap();
        let b = context.add_member_listener(Some("c1"), RecordingTarget::new()).unwrap();
        let c = context.add_publication_listener("c2", RecordingTarget::new()).unwrap();
        let d = context.add_member_listener(None, RecordingTarget::new()).unwrap();

        context.dispose_channel("c1");

        assert!(a.is_disposed() && b.is_disposed());
        assert!(!c.is_disposed() && !d.is_disposed());
        assert_eq!(context.channel_listener_count("c2"), 1);

        context.dispose();
        assert!(c.is_disposed() && d.is_disposed());
    }

    #[test]
    fn channel_handle_round_trip() {
        struct TestChannel;
        impl Channel for TestChannel {
            fn id(&self) -> String {
                "c1".into()
            }
            fn name(&self) -> Option<String> {
                Some("room".into())
            }
        }

        let context = create_context();
        let channel: Arc<dyn Channel> = Arc::new(TestChannel);
        let handle = context.register_channel(&channel);

        assert_eq!(context.channel(handle).unwrap().id(), "c1");
        context.dispose();
        assert!(context.channel(handle).is_err());
    }

    #[test]
    fn websocket_clients_are_found_by_handle() {
        let context = create_context();
        let (handle, client) = context.create_websocket_client(RecordingTarget::new()).unwrap();

        assert_eq!(client.handle(), handle);
        assert!(Arc::ptr_eq(&context.websocket_client(handle).unwrap(), &client));

        assert!(context.remove_websocket_client(handle).is_some());
        assert!(context.websocket_client(handle).is_err());
    }

    #[test]
    fn disposed_context_refuses_new_listeners() {
        let context = create_context();
        context.dispose();
        context.dispose();

        assert!(context.is_disposed());
        assert!(context.context_listener(RecordingTarget::new()).is_err());
        assert!(context.create_websocket_client(RecordingTarget::new()).is_err());
    }

    #[test]
    fn listener_racing_dispose_is_disposed() {
        let context = Arc::new(create_context());
        let (started_tx, started_rx) = flume::bounded::<()>(1);

        let creator = {
            let context = context.clone();
            std::thread::spawn(move || {
                let mut created = vec![];
                let _ = started_tx.send(());
                while let Ok(listener) = context.add_channel_listener("c1", RecordingTarget::new()) {
                    created.push(listener);
                }
                created
            })
        };
        started_rx.recv().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        context.dispose();

        let created = creator.join().unwrap();
        assert!(created.iter().all(|listener| listener.is_disposed()));
        assert!(context.add_channel_listener("c1", RecordingTarget::new()).is_err());
    }
}
