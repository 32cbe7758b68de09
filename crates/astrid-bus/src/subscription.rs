//! Unsubscribe handles.

use std::fmt;
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bus::BusInner;
use crate::emitter::ListenerId;
use crate::hook::HookKind;

enum Target {
    Listeners(Vec<String>),
    Hooks(Vec<HookKind>),
}

/// Ownership of one logical subscription.
///
/// A subscription may cover several underlying registrations (one per key
/// for a key list); [`Subscription::unsubscribe`] removes all of them.
/// Unsubscribing twice, or after the bus was destroyed, does nothing.
///
/// Dropping a `Subscription` does **not** unsubscribe.
pub struct Subscription {
    id: ListenerId,
    bus: Weak<BusInner>,
    target: Target,
    done: AtomicBool,
}

impl Subscription {
    pub(crate) fn listeners(id: ListenerId, bus: Weak<BusInner>, keys: Vec<String>) -> Self {
        Self {
            id,
            bus,
            target: Target::Listeners(keys),
            done: AtomicBool::new(false),
        }
    }

    pub(crate) fn hooks(id: ListenerId, bus: Weak<BusInner>, kinds: Vec<HookKind>) -> Self {
        Self {
            id,
            bus,
            target: Target::Hooks(kinds),
            done: AtomicBool::new(false),
        }
    }

    /// Identity of this subscription, as reported by
    /// [`Bus::listeners`](crate::Bus::listeners).
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether at least one of this subscription's registrations is still
    /// held by the bus.
    ///
    /// Turns `false` on [`unsubscribe`](Self::unsubscribe), once a `once`
    /// listener has fired, after [`Bus::destroy`](crate::Bus::destroy), and
    /// when the bus is dropped.
    #[must_use]
    pub fn is_active(&self) -> bool {
        if self.done.load(Ordering::SeqCst) {
            return false;
        }
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        match &self.target {
            Target::Listeners(keys) => keys.iter().any(|key| bus.is_registered(key, self.id)),
            Target::Hooks(kinds) => kinds.iter().any(|kind| bus.hooks.contains(*kind, self.id)),
        }
    }

    /// Remove every registration this subscription made.
    pub fn unsubscribe(&self) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        match &self.target {
            Target::Listeners(keys) => bus.remove_listeners(self.id, keys),
            Target::Hooks(kinds) => {
                for kind in kinds {
                    bus.hooks.unregister(*kind, self.id);
                }
            },
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Subscription");
        debug.field("id", &self.id);
        match &self.target {
            Target::Listeners(keys) => debug.field("keys", keys),
            Target::Hooks(kinds) => debug.field("hooks", kinds),
        };
        debug.field("active", &self.is_active()).finish()
    }
}
