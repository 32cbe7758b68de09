//! Meta-events describing a bus's own lifecycle.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bus::BusId;
use crate::emitter::{Emitter, Listener, ListenerId, ListenerRegistry};

/// The lifecycle points a bus reports on its hook channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// A listener is about to be registered.
    WillAddListener,
    /// A listener has been registered.
    DidAddListener,
    /// A listener is about to be removed.
    WillRemoveListener,
    /// A listener has been removed.
    DidRemoveListener,
    /// The first direct listener arrived; `Active` follows unless a listener
    /// of this hook removes it again.
    WillActivate,
    /// The bus went from zero to one or more direct listeners.
    Active,
    /// The last direct listener left; `Idle` follows unless a listener of
    /// this hook subscribes again.
    WillIdle,
    /// The bus went back to zero direct listeners.
    Idle,
}

impl HookKind {
    /// Every hook kind, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::WillAddListener,
        Self::DidAddListener,
        Self::WillRemoveListener,
        Self::DidRemoveListener,
        Self::WillActivate,
        Self::Active,
        Self::WillIdle,
        Self::Idle,
    ];

    /// Key this kind is stored under on the hook channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WillAddListener => "will_add_listener",
            Self::DidAddListener => "did_add_listener",
            Self::WillRemoveListener => "will_remove_listener",
            Self::DidRemoveListener => "did_remove_listener",
            Self::WillActivate => "will_activate",
            Self::Active => "active",
            Self::WillIdle => "will_idle",
            Self::Idle => "idle",
        }
    }

    /// Whether this kind reports an active/idle transition.
    #[must_use]
    pub const fn is_transition(self) -> bool {
        matches!(
            self,
            Self::WillActivate | Self::Active | Self::WillIdle | Self::Idle
        )
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEvent {
    /// What happened.
    pub kind: HookKind,
    /// Event key affected, for listener add/remove hooks. `every` and `proxy`
    /// subscriptions report [`EVERY_KEY`](crate::EVERY_KEY) and
    /// [`PROXY_KEY`](crate::PROXY_KEY).
    pub key: Option<String>,
    /// The bus whose direct listeners changed. Differs from the observing bus
    /// when the event bubbled up from a delegate.
    pub origin: BusId,
}

impl HookEvent {
    pub(crate) fn listener(kind: HookKind, key: &str, origin: BusId) -> Self {
        Self {
            kind,
            key: Some(key.to_string()),
            origin,
        }
    }

    pub(crate) fn transition(kind: HookKind, origin: BusId) -> Self {
        Self {
            kind,
            key: None,
            origin,
        }
    }
}

/// A bus's private emitter for [`HookEvent`]s, keyed by [`HookKind`].
#[derive(Clone)]
pub(crate) struct HookChannel {
    emitter: Arc<dyn Emitter<HookEvent>>,
}

impl fmt::Debug for HookChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChannel")
            .field("listeners", &self.emitter.total_count())
            .finish()
    }
}

impl HookChannel {
    pub(crate) fn new() -> Self {
        Self::with_emitter(Arc::new(ListenerRegistry::<HookEvent>::new()))
    }

    pub(crate) fn with_emitter(emitter: Arc<dyn Emitter<HookEvent>>) -> Self {
        Self { emitter }
    }

    pub(crate) fn register(&self, kind: HookKind, id: ListenerId, listener: Listener<HookEvent>) {
        self.emitter.register(kind.as_str(), id, listener);
    }

    /// Register one listener under every kind.
    pub(crate) fn register_all(&self, id: ListenerId, listener: &Listener<HookEvent>) {
        for kind in HookKind::ALL {
            self.emitter.register(kind.as_str(), id, Arc::clone(listener));
        }
    }

    pub(crate) fn unregister(&self, kind: HookKind, id: ListenerId) -> bool {
        self.emitter.unregister(kind.as_str(), id)
    }

    pub(crate) fn contains(&self, kind: HookKind, id: ListenerId) -> bool {
        self.emitter.contains(kind.as_str(), id)
    }

    pub(crate) fn unregister_all(&self, id: ListenerId) {
        for kind in HookKind::ALL {
            self.emitter.unregister(kind.as_str(), id);
        }
    }

    pub(crate) fn raise(&self, event: &HookEvent) {
        self.emitter.emit(event.kind.as_str(), event);
    }

    pub(crate) fn clear(&self) {
        self.emitter.clear();
    }
}
