//! Lighting port — control of the lights behind the bridge.

use std::future::Future;

use hued_domain::error::LightingError;
use hued_domain::light::{Group, Light, LightState, Target};

/// A lighting service (a Hue bridge, a simulation, …).
///
/// Implementations report a light that is off and refuses a change as
/// [`LightingError::DeviceOff`]; every other failure uses another variant.
pub trait LightingService {
    /// Every light known to the service.
    fn lights(&self) -> impl Future<Output = Result<Vec<Light>, LightingError>> + Send;

    /// Every group known to the service, with member light ids.
    fn groups(&self) -> impl Future<Output = Result<Vec<Group>, LightingError>> + Send;

    /// Put `target` into `state`.
    fn apply(
        &self,
        target: &Target,
        state: &LightState,
    ) -> impl Future<Output = Result<(), LightingError>> + Send;

    /// Switch `target` off. For a group, each member light is switched off
    /// individually.
    fn power_off(&self, target: &Target) -> impl Future<Output = Result<(), LightingError>> + Send;
}
