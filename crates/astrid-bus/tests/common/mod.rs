//! Shared helpers for bus integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use astrid_bus::{Bus, BusId, Channel, EventPolicy, HookKind, Payload};

pub const FOO: Channel<u32> = Channel::new("foo");
pub const BAR: Channel<u32> = Channel::new("bar");

/// Counts invocations of the closures it hands out.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn bump(&self) -> impl Fn() + Send + Sync + 'static {
        let count = Arc::clone(&self.0);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A listener for `u32` channels.
    pub fn bump_on(&self) -> impl Fn(&u32) + Send + Sync + 'static {
        let bump = self.bump();
        move |_: &u32| bump()
    }
}

/// Policy that records unexpected events and can hide its bus's handlers
/// from the buses piping into it.
#[derive(Default)]
pub struct RecordingPolicy {
    pub unexpected: Mutex<Vec<(String, Option<u32>)>>,
    pub hide_handlers: bool,
}

impl RecordingPolicy {
    pub fn hiding() -> Self {
        Self {
            hide_handlers: true,
            ..Self::default()
        }
    }

    pub fn unexpected(&self) -> Vec<(String, Option<u32>)> {
        self.unexpected.lock().unwrap().clone()
    }
}

impl EventPolicy for RecordingPolicy {
    fn handle_unexpected_event(&self, _bus: BusId, key: &str, payload: &Payload) {
        self.unexpected
            .lock()
            .unwrap()
            .push((key.to_string(), payload.downcast_ref::<u32>().copied()));
    }

    fn reports_handler(&self, _key: &str, actual: bool) -> bool {
        actual && !self.hide_handlers
    }
}

/// A bus that reports unhandled events to a [`RecordingPolicy`].
pub fn strict_bus() -> (Bus, Arc<RecordingPolicy>) {
    let policy = Arc::new(RecordingPolicy::default());
    let bus = Bus::builder()
        .allow_unhandled_events(false)
        .policy(Arc::clone(&policy) as Arc<dyn EventPolicy>)
        .build();
    (bus, policy)
}

/// Record every hook event on `bus` as `(kind, origin)`.
pub fn record_hooks(bus: &Bus) -> Arc<Mutex<Vec<(HookKind, BusId)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in HookKind::ALL {
        let sink = Arc::clone(&seen);
        bus.hook(kind, move |event| {
            sink.lock().unwrap().push((event.kind, event.origin));
        });
    }
    seen
}
