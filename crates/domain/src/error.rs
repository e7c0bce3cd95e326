//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HuedError`]
//! via `#[from]` or an explicit `From` impl at the port boundary.

use std::error::Error;

use crate::light::Target;

/// Top-level error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum HuedError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The lighting service refused or failed a request.
    #[error("lighting error")]
    Lighting(#[from] LightingError),

    /// A configuration source could not be read or parsed.
    #[error("configuration error")]
    Config(#[source] Box<dyn Error + Send + Sync>),

    /// An external data source (sun times, probes) failed.
    #[error("external source error")]
    External(#[source] Box<dyn Error + Send + Sync>),

    /// The mandatory rules source does not exist.
    #[error("required rules source is missing")]
    MissingRules,
}

/// Violations of domain invariants, raised while building domain objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("an event needs exactly one of `light` or `group`")]
    InvalidEventTarget,

    #[error("a rule needs either `events` or `scene`")]
    MissingRuleTarget,

    #[error("a rule cannot have both `events` and `scene`")]
    ConflictingRuleTarget,

    #[error("invalid time expression `{0}`")]
    InvalidTime(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("invalid value for condition `{kind}`: expected {expected}")]
    InvalidConditionValue {
        kind: &'static str,
        expected: &'static str,
    },
}

/// A lookup by name or id found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failures reported by a lighting service.
///
/// [`LightingError::DeviceOff`] is the only transient variant: the engine
/// retries it after switching the target off. Everything else is final.
#[derive(Debug, thiserror::Error)]
pub enum LightingError {
    /// A light in the target is off (or unreachable) and rejected the change.
    #[error("a light in {target} is off")]
    DeviceOff { target: Target },

    /// The target matches no known light or group.
    #[error("unknown target {0}")]
    UnknownTarget(Target),

    /// The bridge answered with an error.
    #[error("bridge error {code}: {description}")]
    Bridge { code: u64, description: String },

    /// The request never got a usable answer.
    #[error("transport error")]
    Transport(#[source] Box<dyn Error + Send + Sync>),
}

impl LightingError {
    /// Whether the failure is worth retrying after a compensating power-off.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DeviceOff { .. })
    }
}
