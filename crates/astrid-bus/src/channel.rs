//! Event keys, typed channel descriptors and erased payloads.

use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{BusError, BusResult};

/// Key of the wildcard "something happened" notification.
pub const WILDCARD_KEY: &str = "*";

/// Internal key proxies are registered under.
pub const PROXY_KEY: &str = "__astrid_bus_proxy__";

/// Internal key every-listeners are registered under.
pub const EVERY_KEY: &str = "__astrid_bus_every__";

/// Whether `key` belongs to the bus's own broadcast machinery.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    matches!(key, WILDCARD_KEY | PROXY_KEY | EVERY_KEY)
}

/// Reject keys a producer may not emit on.
pub(crate) fn check_emit_key(key: &str) -> BusResult<()> {
    if key.is_empty() {
        return Err(BusError::EmptyKey);
    }
    if is_reserved(key) {
        return Err(BusError::ReservedKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// A named event channel with a statically known payload type.
///
/// Channels are plain descriptors, usually declared as constants next to the
/// producer that owns them:
///
/// ```rust
/// use astrid_bus::Channel;
///
/// pub const USER_JOINED: Channel<u64> = Channel::new("user_joined");
/// pub const SHUTDOWN: Channel<()> = Channel::new("shutdown");
///
/// assert_eq!(USER_JOINED.key(), "user_joined");
/// ```
pub struct Channel<T> {
    key: &'static str,
    _payload: PhantomData<fn(T) -> T>,
}

impl<T> Channel<T> {
    /// Declare a channel.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _payload: PhantomData,
        }
    }

    /// The key events on this channel are emitted under.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Channel<T> {}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("key", &self.key)
            .field("payload", &type_name::<T>())
            .finish()
    }
}

/// A type-erased event payload.
///
/// Cloning is cheap; all clones share the same value. Typed listeners get the
/// value back through [`Payload::downcast_ref`].
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Payload {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// An empty payload, for events that carry no data.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Borrow the value as `T`, if that is what it holds.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether the value is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Name of the wrapped type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}
