//! Bus error types.

use thiserror::Error;

use crate::bus::BusId;

/// Errors raised at the call site of a bus operation.
///
/// These are programmer errors: a reserved key, a malformed subscription,
/// or a delegation edge that would form a cycle. An event nobody listens to
/// is not an error and never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// A reserved key was used where only user keys are allowed.
    #[error("reserved event key: {key}")]
    ReservedKey {
        /// The offending key.
        key: String,
    },

    /// A key list subscription was given no keys.
    #[error("key list subscription requires at least one key")]
    EmptyKeyList,

    /// An event key was the empty string.
    #[error("event key must not be empty")]
    EmptyKey,

    /// Piping would make a bus reachable from itself.
    #[error("delegation cycle: piping {from} into {to} would loop")]
    DelegationCycle {
        /// The bus that was asked to pipe.
        from: BusId,
        /// The bus it was asked to pipe into.
        to: BusId,
    },

    /// Options text could not be parsed.
    #[error("invalid bus options: {0}")]
    InvalidOptions(String),
}

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;
