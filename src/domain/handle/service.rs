use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::handle::entity::HandleArena;
use crate::domain::handle::value_object::NativeHandle;
use crate::domain::native::entity::{Channel, Member, Publication, Stream, Subscription};
use crate::error;

/// SDK object the managed side may re-enter through a handle.
#[derive(Clone)]
pub enum NativeObject {
    Channel(Arc<dyn Channel>),
    Member(Arc<dyn Member>),
    Publication(Arc<dyn Publication>),
    Subscription(Arc<dyn Subscription>),
    Stream(Arc<dyn Stream>),
}

impl NativeObject {
    fn address(&self) -> usize {
        let ptr = match self {
            NativeObject::Channel(o) => Arc::as_ptr(o) as *const (),
            NativeObject::Member(o) => Arc::as_ptr(o) as *const (),
            NativeObject::Publication(o) => Arc::as_ptr(o) as *const (),
            NativeObject::Subscription(o) => Arc::as_ptr(o) as *const (),
            NativeObject::Stream(o) => Arc::as_ptr(o) as *const (),
        };
        ptr as usize
    }
}

#[derive(Default)]
struct Entries {
    arena: HandleArena<NativeObject>,
    // object address -> live handle
    index: HashMap<usize, NativeHandle>,
    // handles released together with their owner
    dependents: HashMap<NativeHandle, Vec<NativeHandle>>,
}

impl Entries {
    fn insert(&mut self, object: NativeObject) -> NativeHandle {
        let address = object.address();
        if let Some(handle) = self.index.get(&address) {
            return *handle;
        }
        let handle = self.arena.insert(object);
        self.index.insert(address, handle);
        handle
    }

    fn remove(&mut self, handle: NativeHandle) -> bool {
        let object = match self.arena.remove(handle) {
            Some(object) => object,
            None => return false,
        };
        self.index.remove(&object.address());
        for dependent in self.dependents.remove(&handle).unwrap_or_default() {
            self.remove(dependent);
        }
        true
    }
}

/// Per-context table of SDK objects exposed to the managed side.
///
/// Registering the same object twice returns the same handle, which keeps `nativePointer` stable
/// across events that mention the same member or publication. Objects stay registered until the
/// SDK reports the end of their life (member left, stream unpublished, publication unsubscribed)
/// or the context is disposed. A handle released that way goes stale; re-entering with it
/// fails with `StaleHandle` instead of reaching a freed object.
#[derive(Default)]
pub struct HandleTable {
    entries: Mutex<Entries>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, object: NativeObject) -> NativeHandle {
        self.entries.lock().insert(object)
    }

    pub fn register_channel(&self, channel: &Arc<dyn Channel>) -> NativeHandle {
        self.register(NativeObject::Channel(channel.clone()))
    }

    pub fn register_member(&self, member: &Arc<dyn Member>) -> NativeHandle {
        self.register(NativeObject::Member(member.clone()))
    }

    pub fn register_publication(&self, publication: &Arc<dyn Publication>) -> NativeHandle {
        self.register(NativeObject::Publication(publication.clone()))
    }

    pub fn register_subscription(&self, subscription: &Arc<dyn Subscription>) -> NativeHandle {
        self.register(NativeObject::Subscription(subscription.clone()))
    }

    /// Registers a stream that lives as long as `owner`; releasing the owner releases it too.
    pub fn register_stream(&self, owner: NativeHandle, stream: &Arc<dyn Stream>) -> NativeHandle {
        let mut entries = self.entries.lock();
        let handle = entries.insert(NativeObject::Stream(stream.clone()));
        let dependents = entries.dependents.entry(owner).or_default();
        if !dependents.contains(&handle) {
            dependents.push(handle);
        }
        handle
    }

    pub fn get(&self, handle: NativeHandle) -> Result<NativeObject, error::Error> {
        self.entries
            .lock()
            .arena
            .get(handle)
            .cloned()
            .ok_or(error::Error::StaleHandle(handle))
    }

    pub fn channel(&self, handle: NativeHandle) -> Result<Arc<dyn Channel>, error::Error> {
        match self.get(handle)? {
            NativeObject::Channel(channel) => Ok(channel),
            _ => Err(error::Error::StaleHandle(handle)),
        }
    }

    pub fn member(&self, handle: NativeHandle) -> Result<Arc<dyn Member>, error::Error> {
        match self.get(handle)? {
            NativeObject::Member(member) => Ok(member),
            _ => Err(error::Error::StaleHandle(handle)),
        }
    }

    pub fn publication(&self, handle: NativeHandle) -> Result<Arc<dyn Publication>, error::Error> {
        match self.get(handle)? {
            NativeObject::Publication(publication) => Ok(publication),
            _ => Err(error::Error::StaleHandle(handle)),
        }
    }

    pub fn subscription(
        &self,
        handle: NativeHandle,
    ) -> Result<Arc<dyn Subscription>, error::Error> {
        match self.get(handle)? {
            NativeObject::Subscription(subscription) => Ok(subscription),
            _ => Err(error::Error::StaleHandle(handle)),
        }
    }

    pub fn stream(&self, handle: NativeHandle) -> Result<Arc<dyn Stream>, error::Error> {
        match self.get(handle)? {
            NativeObject::Stream(stream) => Ok(stream),
            _ => Err(error::Error::StaleHandle(handle)),
        }
    }

    /// Releases the SDK object behind `handle` and its dependents. Returns false for stale handles.
    pub fn release(&self, handle: NativeHandle) -> bool {
        self.entries.lock().remove(handle)
    }

    /// Releases `object` if it is registered, returning the handle it had.
    pub fn release_object(&self, object: &NativeObject) -> Option<NativeHandle> {
        let mut entries = self.entries.lock();
        let handle = *entries.index.get(&object.address())?;
        entries.remove(handle);
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().arena.is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.arena.clear();
        entries.index.clear();
        entries.dependents.clear();
    }
}
