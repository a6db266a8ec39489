use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::application::listener::dispatching::Disposable;

/// Listeners grouped under the channel that created them.
///
/// Disposal runs outside the lock, so a slow join never holds up registrations for other parents.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Mutex<HashMap<String, Vec<Arc<dyn Disposable>>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, parent_id: &str, listener: Arc<dyn Disposable>) {
        self.entries
            .lock()
            .entry(parent_id.to_string())
            .or_default()
            .push(listener);
    }

    /// Disposes and forgets every listener registered under `parent_id`.
    pub fn dispose_all(&self, parent_id: &str) {
        let listeners = self.entries.lock().remove(parent_id);
        if let Some(listeners) = listeners {
            debug!(parent = parent_id, count = listeners.len(), "disposing listeners");
            listeners.iter().for_each(|listener| listener.dispose());
        }
    }

    pub fn dispose_everything(&self) {
        let entries = std::mem::take(&mut *self.entries.lock());
        entries
            .values()
            .flatten()
            .for_each(|listener| listener.dispose());
    }

    /// Number of listeners under `parent_id`.
    pub fn len(&self, parent_id: &str) -> usize {
        self.entries
            .lock()
            .get(parent_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn contains(&self, parent_id: &str) -> bool {
        self.entries.lock().contains_key(parent_id)
    }
}
