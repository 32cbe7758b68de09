//! Prelude module - commonly used types for convenient import.
//!
//! Use `use astrid_bus::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use astrid_bus::prelude::*;
//!
//! const READY: Channel<()> = Channel::new("ready");
//!
//! let bus = Bus::new();
//! let sub = bus.on(&READY, |_: &()| {}).unwrap();
//! assert!(bus.is_active());
//! bus.emit(&READY, ()).unwrap();
//! sub.unsubscribe();
//! ```

// Bus
pub use crate::{Bus, BusBuilder, BusId, WeakBus};

// Channels and payloads
pub use crate::{Channel, Payload};

// Configuration and policy
pub use crate::{BusOptions, DefaultPolicy, EventPolicy};

// Subscriptions and hooks
pub use crate::{HookEvent, HookKind, ListenerId, Subscription};

// Errors
pub use crate::{BusError, BusResult};
