//! Astrid Bus - typed, composable publish/subscribe.
//!
//! This crate provides:
//! - Typed channels ([`Channel`]) with type-erased delivery ([`Payload`])
//! - Per-key, key-list, every, wildcard and proxy subscriptions
//! - Delegation: piping one bus into others, with unhandled-event tracking
//!   across the whole delegate subtree
//! - Lifecycle hooks reporting listener churn and active/idle transitions
//!
//! # Architecture
//!
//! A [`Bus`] wraps two [`Emitter`]s: one for event listeners, keyed by event
//! key, and one for hook listeners, keyed by [`HookKind`]. Emitting on a bus
//! runs its own listeners and then forwards the event into every bus it pipes
//! into. Delegates report hook events back up to every bus piping into them,
//! but each bus's active/idle state counts only its own listeners.
//!
//! Owning code typically watches [`Bus::monitor`] to acquire an expensive
//! upstream resource when the first listener arrives and release it when the
//! last one leaves.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use astrid_bus::{Bus, Channel};
//!
//! const TICK: Channel<u64> = Channel::new("tick");
//!
//! let upstream = Arc::new(AtomicBool::new(false));
//! let bus = Bus::new();
//!
//! let connected = Arc::clone(&upstream);
//! bus.monitor(move |active| connected.store(active, Ordering::SeqCst));
//!
//! let audit = Bus::new();
//! bus.pipe(&audit).unwrap();
//!
//! let sub = bus.on(&TICK, |_n: &u64| {}).unwrap();
//! assert!(upstream.load(Ordering::SeqCst));
//!
//! bus.emit(&TICK, 1).unwrap();
//! sub.unsubscribe();
//! assert!(!upstream.load(Ordering::SeqCst));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod channel;
mod emitter;
mod error;
mod hook;
mod options;
mod subscription;

pub use bus::{Bus, BusBuilder, BusId, Envelope, WeakBus};
pub use channel::{Channel, EVERY_KEY, PROXY_KEY, Payload, WILDCARD_KEY, is_reserved};
pub use emitter::{Emitter, Listener, ListenerId, ListenerRegistry};
pub use error::{BusError, BusResult};
pub use hook::{HookEvent, HookKind};
pub use options::{BusOptions, DefaultPolicy, EventPolicy};
pub use subscription::Subscription;
