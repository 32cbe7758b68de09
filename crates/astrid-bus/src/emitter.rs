//! Keyed listener storage.
//!
//! [`Emitter`] is the single-channel primitive the bus is built on: an ordered
//! list of callbacks per string key. The bus treats it as opaque, so any
//! conforming implementation can be substituted. [`ListenerRegistry`] is the
//! default one.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{trace, warn};
use uuid::Uuid;

/// A registered callback receiving `&A`.
pub type Listener<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Identity of one logical subscription.
///
/// A subscription covering several keys registers the same id under each of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Create a fresh listener id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-key callback storage.
pub trait Emitter<A>: Send + Sync {
    /// Append `listener` to the list for `key`.
    fn register(&self, key: &str, id: ListenerId, listener: Listener<A>);

    /// Remove the listener registered as `id` under `key`.
    ///
    /// Returns `true` if something was removed.
    fn unregister(&self, key: &str, id: ListenerId) -> bool;

    /// Invoke every listener for `key` in registration order.
    ///
    /// Returns how many listeners were invoked.
    fn emit(&self, key: &str, args: &A) -> usize;

    /// Number of listeners currently registered for `key`.
    fn listener_count(&self, key: &str) -> usize;

    /// Ids registered for `key`, in registration order.
    fn listener_ids(&self, key: &str) -> Vec<ListenerId>;

    /// Keys that have at least one listener.
    fn keys(&self) -> Vec<String>;

    /// Drop every listener.
    fn clear(&self);

    /// Whether `id` is registered under `key`.
    fn contains(&self, key: &str, id: ListenerId) -> bool {
        self.listener_ids(key).contains(&id)
    }

    /// Number of listeners across all keys.
    fn total_count(&self) -> usize {
        self.keys().iter().map(|key| self.listener_count(key)).sum()
    }
}

type Slots<A> = BTreeMap<String, Vec<(ListenerId, Listener<A>)>>;

/// Default [`Emitter`]: a lock-guarded map of ordered listener lists.
///
/// `emit` snapshots the list for a key before invoking anything, so a
/// listener may register or unregister (itself included) while it runs. A
/// listener removed mid-emit still sees the in-progress event; one added
/// mid-emit does not. A panicking listener is logged and does not stop the
/// rest.
pub struct ListenerRegistry<A> {
    slots: RwLock<Slots<A>>,
}

impl<A> Default for ListenerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for ListenerRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let counts: BTreeMap<&str, usize> = slots
            .iter()
            .map(|(key, list)| (key.as_str(), list.len()))
            .collect();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .finish()
    }
}

impl<A> ListenerRegistry<A> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(BTreeMap::new()),
        }
    }

    fn snapshot(&self, key: &str) -> Vec<Listener<A>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(key)
            .map(|list| list.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }
}

impl<A> Emitter<A> for ListenerRegistry<A> {
    fn register(&self, key: &str, id: ListenerId, listener: Listener<A>) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(key.to_string())
            .or_default()
            .push((id, listener));
    }

    fn unregister(&self, key: &str, id: ListenerId) -> bool {
        // Listeners removed here are dropped after the lock is released, so a
        // listener whose drop touches the registry cannot deadlock.
        let removed = {
            let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
            let Some(list) = slots.get_mut(key) else {
                return false;
            };
            let removed = list
                .iter()
                .position(|(existing, _)| *existing == id)
                .map(|index| list.remove(index));
            if list.is_empty() {
                slots.remove(key);
            }
            removed
        };
        removed.is_some()
    }

    fn emit(&self, key: &str, args: &A) -> usize {
        let listeners = self.snapshot(key);
        for listener in &listeners {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener(args);
            }));
            if let Err(e) = result {
                warn!(key = %key, error = ?e, "Listener panicked");
            }
        }
        trace!(key = %key, invoked = listeners.len(), "Listeners notified");
        listeners.len()
    }

    fn listener_count(&self, key: &str) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).map_or(0, Vec::len)
    }

    fn listener_ids(&self, key: &str) -> Vec<ListenerId> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(key)
            .map(|list| list.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    fn keys(&self) -> Vec<String> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.keys().cloned().collect()
    }

    fn clear(&self) {
        let drained = {
            let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *slots)
        };
        drop(drained);
    }

    fn contains(&self, key: &str, id: ListenerId) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(key)
            .is_some_and(|list| list.iter().any(|(existing, _)| *existing == id))
    }

    fn total_count(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.values().map(Vec::len).sum()
    }
}
