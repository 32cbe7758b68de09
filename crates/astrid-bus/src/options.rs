//! Bus configuration and extension policy.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bus::BusId;
use crate::channel::Payload;
use crate::error::{BusError, BusResult};

/// Fixed configuration captured when a bus is built.
///
/// ```rust
/// use astrid_bus::BusOptions;
///
/// let options = BusOptions::from_toml_str(r#"
///     name = "sessions"
///     allow_unhandled_events = false
/// "#).unwrap();
/// assert!(!options.allow_unhandled_events);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusOptions {
    /// Silently drop events no listener handles. When `false`, such events
    /// go to [`EventPolicy::handle_unexpected_event`].
    pub allow_unhandled_events: bool,
    /// Label used in log output.
    pub name: Option<String>,
}

impl Default for BusOptions {
    fn default() -> Self {
        Self {
            allow_unhandled_events: true,
            name: None,
        }
    }
}

impl BusOptions {
    /// Parse options from a TOML fragment. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidOptions`] if the text is not valid TOML or
    /// a field has the wrong type.
    pub fn from_toml_str(text: &str) -> BusResult<Self> {
        toml::from_str(text).map_err(|e| BusError::InvalidOptions(e.to_string()))
    }
}

/// Overridable behaviour of a bus.
pub trait EventPolicy: Send + Sync {
    /// Called for an event nobody handled, on a bus built with
    /// `allow_unhandled_events = false`. Must not emit further events.
    fn handle_unexpected_event(&self, bus: BusId, key: &str, payload: &Payload) {
        warn!(
            bus = %bus,
            key = %key,
            payload_type = payload.type_name(),
            "Unhandled event"
        );
    }

    /// What this bus tells the buses piping into it about whether it handles
    /// `key`. `actual` is the real answer from its own listeners and delegates.
    fn reports_handler(&self, key: &str, actual: bool) -> bool {
        let _ = key;
        actual
    }
}

/// The policy used when none is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl EventPolicy for DefaultPolicy {}
