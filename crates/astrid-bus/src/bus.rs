//! The bus engine: subscriptions, emit, delegation and lifecycle hooks.

use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::channel::{Channel, EVERY_KEY, PROXY_KEY, Payload, WILDCARD_KEY, check_emit_key};
use crate::emitter::{Emitter, Listener, ListenerId, ListenerRegistry};
use crate::error::{BusError, BusResult};
use crate::hook::{HookChannel, HookEvent, HookKind};
use crate::options::{BusOptions, DefaultPolicy, EventPolicy};
use crate::subscription::Subscription;

/// Identity of a bus instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(Uuid);

impl BusId {
    /// Create a fresh bus id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BusId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the inner emitter hands to every listener of an emitted event.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Key the event was emitted under.
    pub key: String,
    /// The event's payload.
    pub payload: Payload,
}

struct Delegate {
    bus: Bus,
    /// Our listener on the delegate's hook channel.
    forwarder: ListenerId,
}

#[derive(Default)]
struct BusState {
    active: bool,
    delegates: Vec<Delegate>,
}

pub(crate) struct BusInner {
    id: BusId,
    options: BusOptions,
    policy: Arc<dyn EventPolicy>,
    emitter: Arc<dyn Emitter<Envelope>>,
    /// Hook listeners registered through `hook` and `monitor`.
    pub(crate) hooks: HookChannel,
    /// Forwarders registered by the buses that pipe into this one.
    upstream: HookChannel,
    state: Mutex<BusState>,
}

impl BusInner {
    fn state(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delegates(&self) -> Vec<Bus> {
        self.state().delegates.iter().map(|d| d.bus.clone()).collect()
    }

    fn raise(&self, event: &HookEvent) {
        self.hooks.raise(event);
        self.upstream.raise(event);
    }

    pub(crate) fn is_registered(&self, key: &str, id: ListenerId) -> bool {
        self.emitter.contains(key, id)
    }

    fn add_listeners(&self, id: ListenerId, keys: &[String], listener: &Listener<Envelope>) {
        for key in keys {
            self.raise(&HookEvent::listener(HookKind::WillAddListener, key, self.id));
            self.emitter.register(key, id, Arc::clone(listener));
            self.raise(&HookEvent::listener(HookKind::DidAddListener, key, self.id));
        }
        debug!(bus = %self.id, listener = %id, keys = ?keys, "Listener added");
        self.sync_activity();
    }

    pub(crate) fn remove_listeners(&self, id: ListenerId, keys: &[String]) {
        let mut removed = false;
        for key in keys {
            if !self.emitter.contains(key, id) {
                continue;
            }
            self.raise(&HookEvent::listener(HookKind::WillRemoveListener, key, self.id));
            removed |= self.emitter.unregister(key, id);
            self.raise(&HookEvent::listener(HookKind::DidRemoveListener, key, self.id));
        }
        if removed {
            debug!(bus = %self.id, listener = %id, keys = ?keys, "Listener removed");
            self.sync_activity();
        }
    }

    fn has_direct_listeners(&self) -> bool {
        self.emitter.total_count() > 0
    }

    /// Raise activate/idle hooks if the direct listener count crossed zero.
    ///
    /// The flag flips only after the `Will*` hook has run and the count still
    /// agrees. A `Will*` listener that undoes the crossing cancels the
    /// transition, and the matching `Active`/`Idle` is not raised.
    fn sync_activity(&self) {
        let target = {
            let state = self.state();
            let has_listeners = self.has_direct_listeners();
            if state.active == has_listeners {
                return;
            }
            has_listeners
        };
        let (will, done) = if target {
            (HookKind::WillActivate, HookKind::Active)
        } else {
            (HookKind::WillIdle, HookKind::Idle)
        };
        self.raise(&HookEvent::transition(will, self.id));

        let committed = {
            let mut state = self.state();
            let commit = state.active != target && self.has_direct_listeners() == target;
            if commit {
                state.active = target;
            }
            commit
        };
        if !committed {
            debug!(bus = %self.id, transition = %will, "Transition cancelled");
            return;
        }
        debug!(bus = %self.id, active = target, "Bus activity changed");
        self.raise(&HookEvent::transition(done, self.id));
    }

    /// Deliver an event here and to every delegate. Returns whether anything
    /// in this bus's subtree handled it.
    fn dispatch(&self, key: &str, payload: Payload) -> bool {
        trace!(bus = %self.id, key = %key, "Emitting event");
        let envelope = Envelope {
            key: key.to_string(),
            payload,
        };

        let direct = self.emitter.emit(key, &envelope);
        let every = self.emitter.emit(EVERY_KEY, &envelope);
        let wildcard = self.emitter.emit(WILDCARD_KEY, &envelope);
        self.emitter.emit(PROXY_KEY, &envelope);

        let delegates = self.delegates();
        for delegate in &delegates {
            trace!(bus = %self.id, delegate = %delegate.id(), key = %key, "Forwarding event");
            delegate.inner.dispatch(key, envelope.payload.clone());
        }

        let handled = direct > 0
            || every > 0
            || wildcard > 0
            || delegates.iter().any(|delegate| delegate.has_handler(key));
        if !handled && !self.options.allow_unhandled_events {
            self.policy
                .handle_unexpected_event(self.id, key, &envelope.payload);
        }
        handled
    }

    fn handles(&self, key: &str) -> bool {
        self.emitter.listener_count(key) > 0
            || self.emitter.listener_count(EVERY_KEY) > 0
            || self.emitter.listener_count(WILDCARD_KEY) > 0
            || self
                .delegates()
                .iter()
                .any(|delegate| delegate.has_handler(key))
    }
}

/// A typed, composable publish/subscribe bus.
///
/// `Bus` is a cheap handle; clones refer to the same bus. Emitting is
/// synchronous: every listener and every piped delegate has run by the time
/// [`Bus::emit`] returns. Listeners may subscribe, unsubscribe, emit, pipe or
/// unpipe from inside a callback.
///
/// For each event, listeners run in this order:
///
/// 1. listeners for the event's key
/// 2. [`every`](Bus::every) listeners
/// 3. [`wildcard`](Bus::on_wildcard) listeners
/// 4. [`proxy`](Bus::proxy) listeners
/// 5. piped delegates, in pipe order
///
/// **WARNING:** a bus holds its delegates strongly. A listener that captures
/// a clone of a bus which (transitively) holds that listener creates an
/// `Arc` cycle and leaks both. Capture a [`WeakBus`] instead.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use astrid_bus::{Bus, Channel};
///
/// const GREETING: Channel<String> = Channel::new("greeting");
///
/// let bus = Bus::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let sub = bus
///     .on(&GREETING, move |text: &String| sink.lock().unwrap().push(text.clone()))
///     .unwrap();
///
/// bus.emit(&GREETING, "hello".to_string()).unwrap();
/// sub.unsubscribe();
/// bus.emit(&GREETING, "ignored".to_string()).unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
/// ```
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

impl Bus {
    /// Create a bus with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a bus with the given options.
    #[must_use]
    pub fn with_options(options: BusOptions) -> Self {
        Self::builder().options(options).build()
    }

    /// Start building a bus.
    #[must_use]
    pub fn builder() -> BusBuilder {
        BusBuilder::default()
    }

    /// This bus's id.
    #[must_use]
    pub fn id(&self) -> BusId {
        self.inner.id
    }

    /// The name given in [`BusOptions::name`], if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.options.name.as_deref()
    }

    /// The options this bus was built with.
    #[must_use]
    pub fn options(&self) -> &BusOptions {
        &self.inner.options
    }

    /// A handle that does not keep the bus alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakBus {
        WeakBus {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn subscribe(&self, keys: Vec<String>, listener: Listener<Envelope>) -> Subscription {
        let id = ListenerId::new();
        self.inner.add_listeners(id, &keys, &listener);
        Subscription::listeners(id, Arc::downgrade(&self.inner), keys)
    }

    /// Listen on a typed channel.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ReservedKey`] or [`BusError::EmptyKey`] if the
    /// channel's key cannot be emitted on.
    pub fn on<T, F>(&self, channel: &Channel<T>, handler: F) -> BusResult<Subscription>
    where
        T: Any + Send + Sync,
        F: Fn(&T) + Send + Sync + 'static,
    {
        check_emit_key(channel.key())?;
        Ok(self.subscribe(
            vec![channel.key().to_string()],
            typed::<T, F>(handler),
        ))
    }

    /// Listen on a typed channel for a single event.
    ///
    /// The subscription removes itself before `handler` runs.
    ///
    /// # Errors
    ///
    /// Same as [`Bus::on`].
    pub fn once<T, F>(&self, channel: &Channel<T>, handler: F) -> BusResult<Subscription>
    where
        T: Any + Send + Sync,
        F: Fn(&T) + Send + Sync + 'static,
    {
        check_emit_key(channel.key())?;
        let key = channel.key().to_string();
        let id = ListenerId::new();
        let bus = Arc::downgrade(&self.inner);
        let fired = AtomicBool::new(false);
        let keys = vec![key];
        let own_keys = keys.clone();
        let handler = typed::<T, F>(handler);
        let listener: Listener<Envelope> = Arc::new(move |envelope: &Envelope| {
            if fired.swap(true, Ordering::SeqCst) {
                return;
            }
            if let Some(bus) = bus.upgrade() {
                bus.remove_listeners(id, &own_keys);
            }
            handler(envelope);
        });
        self.inner.add_listeners(id, &keys, &listener);
        Ok(Subscription::listeners(
            id,
            Arc::downgrade(&self.inner),
            keys,
        ))
    }

    /// Listen on a key with an untyped payload.
    ///
    /// Subscribing to [`WILDCARD_KEY`] behaves like [`Bus::on_wildcard`]: the
    /// handler runs for every event and receives an empty payload.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::EmptyKey`] for an empty key and
    /// [`BusError::ReservedKey`] for the internal proxy and every keys.
    pub fn on_key<F>(&self, key: &str, handler: F) -> BusResult<Subscription>
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        if key == WILDCARD_KEY {
            let empty = Payload::empty();
            return Ok(self.on_wildcard(move || handler(&empty)));
        }
        check_emit_key(key)?;
        Ok(self.subscribe(
            vec![key.to_string()],
            Arc::new(move |envelope: &Envelope| handler(&envelope.payload)),
        ))
    }

    /// Listen for any event whose key is in `keys`.
    ///
    /// The handler receives the key and the payload. One emitted event
    /// invokes it once even though it is registered once per key.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::EmptyKeyList`] if `keys` is empty, and
    /// [`BusError::ReservedKey`] or [`BusError::EmptyKey`] if any key cannot
    /// be emitted on. Nothing is registered on error.
    pub fn any<I, F>(&self, keys: I, handler: F) -> BusResult<Subscription>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: Fn(&str, &Payload) + Send + Sync + 'static,
    {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.as_ref();
            check_emit_key(key)?;
            if !unique.iter().any(|existing| existing == key) {
                unique.push(key.to_string());
            }
        }
        if unique.is_empty() {
            return Err(BusError::EmptyKeyList);
        }
        Ok(self.subscribe(
            unique,
            Arc::new(move |envelope: &Envelope| handler(&envelope.key, &envelope.payload)),
        ))
    }

    /// Run `handler` once per emitted event, whatever its key.
    pub fn every<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(
            vec![EVERY_KEY.to_string()],
            Arc::new(move |_: &Envelope| handler()),
        )
    }

    /// Subscribe to the wildcard "something happened" signal.
    pub fn on_wildcard<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(
            vec![WILDCARD_KEY.to_string()],
            Arc::new(move |_: &Envelope| handler()),
        )
    }

    /// Receive every emitted event with its key, e.g. to re-broadcast it.
    pub fn proxy<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&str, &Payload) + Send + Sync + 'static,
    {
        self.subscribe(
            vec![PROXY_KEY.to_string()],
            Arc::new(move |envelope: &Envelope| handler(&envelope.key, &envelope.payload)),
        )
    }

    /// Emit an event on a typed channel.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ReservedKey`] or [`BusError::EmptyKey`] if the
    /// channel's key is not emittable. Nothing is delivered in that case.
    pub fn emit<T>(&self, channel: &Channel<T>, payload: T) -> BusResult<()>
    where
        T: Any + Send + Sync,
    {
        self.emit_payload(channel.key(), Payload::new(payload))
    }

    /// Emit an already-erased payload.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ReservedKey`] when `key` is the wildcard, proxy or
    /// every key, whatever the bus's configuration or listeners, and
    /// [`BusError::EmptyKey`] when it is empty.
    pub fn emit_payload(&self, key: &str, payload: Payload) -> BusResult<()> {
        check_emit_key(key)?;
        self.inner.dispatch(key, payload);
        Ok(())
    }

    /// Forward every subsequent event emitted here into `other`.
    ///
    /// Returns `self` so calls can be chained; `a.pipe(&b)?.pipe(&c)?` makes
    /// both `b` and `c` direct delegates of `a`. Piping the same bus twice
    /// has no further effect. Hook events raised by `other` (and anything it
    /// pipes into) are re-raised on this bus's hook channel.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::DelegationCycle`] if this bus is `other` or is
    /// reachable from it.
    pub fn pipe(&self, other: &Bus) -> BusResult<&Self> {
        if other.reaches(self) {
            return Err(BusError::DelegationCycle {
                from: self.id(),
                to: other.id(),
            });
        }

        let mut state = self.inner.state();
        if state.delegates.iter().any(|d| d.bus == *other) {
            return Ok(self);
        }

        let parent = Arc::downgrade(&self.inner);
        let forward: Listener<HookEvent> = Arc::new(move |event: &HookEvent| {
            if let Some(parent) = parent.upgrade() {
                parent.raise(event);
            }
        });
        let forwarder = ListenerId::new();
        other.inner.upstream.register_all(forwarder, &forward);
        state.delegates.push(Delegate {
            bus: other.clone(),
            forwarder,
        });
        drop(state);

        debug!(bus = %self.id(), delegate = %other.id(), "Delegate piped");
        Ok(self)
    }

    /// Stop forwarding into `other`.
    ///
    /// `other`'s own delegates are left alone. Returns `true` if `other` was
    /// piped.
    pub fn unpipe(&self, other: &Bus) -> bool {
        let removed = {
            let mut state = self.inner.state();
            state
                .delegates
                .iter()
                .position(|d| d.bus == *other)
                .map(|index| state.delegates.remove(index))
        };
        let Some(delegate) = removed else {
            return false;
        };
        delegate.bus.inner.upstream.unregister_all(delegate.forwarder);
        debug!(bus = %self.id(), delegate = %other.id(), "Delegate unpiped");
        true
    }

    /// Whether `target` is this bus or sits anywhere below it.
    fn reaches(&self, target: &Bus) -> bool {
        self == target
            || self
                .inner
                .delegates()
                .iter()
                .any(|delegate| delegate.reaches(target))
    }

    /// Number of directly piped delegates.
    #[must_use]
    pub fn delegate_count(&self) -> usize {
        self.inner.state().delegates.len()
    }

    /// Subscribe to one kind of lifecycle event.
    pub fn hook<F>(&self, kind: HookKind, handler: F) -> Subscription
    where
        F: Fn(&HookEvent) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.inner.hooks.register(kind, id, Arc::new(handler));
        Subscription::hooks(id, Arc::downgrade(&self.inner), vec![kind])
    }

    /// Call `handler(true)` when this bus becomes active and
    /// `handler(false)` when it goes idle.
    ///
    /// Transitions of delegates are not reported, even though their hook
    /// events reach this bus's hook channel.
    pub fn monitor<F>(&self, handler: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let own = self.id();
        let listener: Listener<HookEvent> = Arc::new(move |event: &HookEvent| {
            if event.origin == own {
                handler(event.kind == HookKind::Active);
            }
        });
        let id = ListenerId::new();
        self.inner
            .hooks
            .register(HookKind::Active, id, Arc::clone(&listener));
        self.inner.hooks.register(HookKind::Idle, id, listener);
        Subscription::hooks(
            id,
            Arc::downgrade(&self.inner),
            vec![HookKind::Active, HookKind::Idle],
        )
    }

    /// Whether this bus has at least one direct listener, as of its last
    /// `Active` or `Idle` hook.
    ///
    /// Listeners on delegates do not count.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.state().active
    }

    /// Whether this bus or any delegate below it has a listener.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        self.inner.emitter.total_count() > 0
            || self
                .inner
                .delegates()
                .iter()
                .any(Bus::has_listeners)
    }

    /// Whether an event on `key` would be handled by this bus or its
    /// delegates, as reported through this bus's [`EventPolicy`].
    #[must_use]
    pub fn has_handler(&self, key: &str) -> bool {
        self.inner
            .policy
            .reports_handler(key, self.inner.handles(key))
    }

    /// Number of direct listeners registered under `key`.
    #[must_use]
    pub fn listener_count(&self, key: &str) -> usize {
        self.inner.emitter.listener_count(key)
    }

    /// Listener ids per key, this bus's own first, then each delegate's in
    /// pipe order. Keys with no listeners are left out.
    ///
    /// [`every`](Bus::every) and [`proxy`](Bus::proxy) subscriptions are
    /// listed under [`EVERY_KEY`](crate::EVERY_KEY) and
    /// [`PROXY_KEY`](crate::PROXY_KEY); wildcard ones under `"*"`.
    #[must_use]
    pub fn listeners(&self) -> BTreeMap<String, Vec<ListenerId>> {
        let mut merged: BTreeMap<String, Vec<ListenerId>> = BTreeMap::new();
        for key in self.inner.emitter.keys() {
            let ids = self.inner.emitter.listener_ids(&key);
            if !ids.is_empty() {
                merged.entry(key).or_default().extend(ids);
            }
        }
        for delegate in self.inner.delegates() {
            for (key, ids) in delegate.listeners() {
                merged.entry(key).or_default().extend(ids);
            }
        }
        merged
    }

    /// Remove every direct listener and hook, and drop every delegate.
    ///
    /// Listeners are removed with their usual remove and idle hooks. The bus
    /// remains usable and behaves as if freshly built. Buses piping into this
    /// one keep receiving its hook events.
    pub fn destroy(&self) {
        debug!(bus = %self.id(), "Destroying bus");
        for key in self.inner.emitter.keys() {
            let ids = self.inner.emitter.listener_ids(&key);
            let keys = [key];
            for id in ids {
                self.inner.remove_listeners(id, &keys);
            }
        }
        self.inner.sync_activity();
        self.inner.hooks.clear();

        let delegates = std::mem::take(&mut self.inner.state().delegates);
        for delegate in delegates {
            delegate.bus.inner.upstream.unregister_all(delegate.forwarder);
        }
    }
}

fn typed<T, F>(handler: F) -> Listener<Envelope>
where
    T: Any + Send + Sync,
    F: Fn(&T) + Send + Sync + 'static,
{
    Arc::new(move |envelope: &Envelope| {
        if let Some(value) = envelope.payload.downcast_ref::<T>() {
            handler(value);
        } else {
            warn!(
                key = %envelope.key,
                expected = type_name::<T>(),
                actual = envelope.payload.type_name(),
                "Payload type mismatch, listener skipped"
            );
        }
    })
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Bus {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Bus {}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("id", &self.inner.id)
            .field("name", &self.inner.options.name)
            .field("active", &self.is_active())
            .field("listeners", &self.inner.emitter.total_count())
            .field("delegates", &self.delegate_count())
            .finish()
    }
}

/// A non-owning [`Bus`] handle, for listeners that need to reach back.
#[derive(Clone, Debug)]
pub struct WeakBus {
    inner: Weak<BusInner>,
}

impl WeakBus {
    /// The bus, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Bus> {
        self.inner.upgrade().map(|inner| Bus { inner })
    }
}

/// Builder for [`Bus`].
#[derive(Default)]
pub struct BusBuilder {
    options: BusOptions,
    policy: Option<Arc<dyn EventPolicy>>,
    emitter: Option<Arc<dyn Emitter<Envelope>>>,
    hook_emitter: Option<Arc<dyn Emitter<HookEvent>>>,
}

impl BusBuilder {
    /// Replace all options.
    #[must_use]
    pub fn options(mut self, options: BusOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the log label.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Whether unhandled events are dropped silently.
    #[must_use]
    pub fn allow_unhandled_events(mut self, allow: bool) -> Self {
        self.options.allow_unhandled_events = allow;
        self
    }

    /// Override unhandled-event handling and reported handler presence.
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn EventPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Store event listeners in a custom emitter.
    #[must_use]
    pub fn emitter(mut self, emitter: Arc<dyn Emitter<Envelope>>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Store hook listeners in a custom emitter.
    #[must_use]
    pub fn hook_emitter(mut self, emitter: Arc<dyn Emitter<HookEvent>>) -> Self {
        self.hook_emitter = Some(emitter);
        self
    }

    /// Build the bus.
    #[must_use]
    pub fn build(self) -> Bus {
        let inner = BusInner {
            id: BusId::new(),
            options: self.options,
            policy: self.policy.unwrap_or_else(|| Arc::new(DefaultPolicy)),
            emitter: self
                .emitter
                .unwrap_or_else(|| Arc::new(ListenerRegistry::<Envelope>::new())),
            hooks: self
                .hook_emitter
                .map_or_else(HookChannel::new, HookChannel::with_emitter),
            upstream: HookChannel::new(),
            state: Mutex::new(BusState::default()),
        };
        debug!(bus = %inner.id, name = ?inner.options.name, "Bus created");
        Bus {
            inner: Arc::new(inner),
        }
    }
}

impl fmt::Debug for BusBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusBuilder")
            .field("options", &self.options)
            .field("custom_policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}
