//! # hued-adapter-virtual
//!
//! Simulated lights and groups for demos and tests, used when no bridge is
//! configured.
//!
//! ## Provided lights
//!
//! | Id | Light | Groups |
//! |----|-------|--------|
//! | `1` | Desk lamp | Living room |
//! | `2` | Hall | Hall |
//! | `3` | TV backlight | Living room |
//!
//! Group `0` holds every light. Like a real bridge, a light that is off
//! refuses parameter changes unless the same request switches it on; the
//! adapter reports this as `LightingError::DeviceOff`.
//!
//! ## Dependency rule
//!
//! Depends on `hued-app` (port traits) and `hued-domain` only.

mod light;

pub use light::{LightStatus, VirtualLight};

use hued_app::ports::LightingService;
use hued_domain::error::LightingError;
use hued_domain::light::{Group, Light, LightState, Target};

const ALL_LIGHTS_GROUP: &str = "0";

/// In-memory lighting service.
#[derive(Debug)]
pub struct VirtualLights {
    lights: Vec<VirtualLight>,
    groups: Vec<Group>,
}

impl Default for VirtualLights {
    fn default() -> Self {
        let group = |id: &str, name: &str, lights: &[&str]| Group {
            id: id.to_string(),
            name: name.to_string(),
            lights: lights.iter().map(ToString::to_string).collect(),
        };
        Self::new(
            vec![
                VirtualLight::new("1", "Desk lamp"),
                VirtualLight::new("2", "Hall"),
                VirtualLight::new("3", "TV backlight"),
            ],
            vec![
                group("1", "Living room", &["1", "3"]),
                group("2", "Hall", &["2"]),
            ],
        )
    }
}

impl VirtualLights {
    #[must_use]
    pub fn new(lights: Vec<VirtualLight>, groups: Vec<Group>) -> Self {
        Self { lights, groups }
    }

    /// The light with this id or name.
    #[must_use]
    pub fn light(&self, reference: &str) -> Option<&VirtualLight> {
        self.lights.iter().find(|light| light.matches(reference))
    }

    fn members(&self, target: &Target) -> Result<Vec<&VirtualLight>, LightingError> {
        let unknown = || LightingError::UnknownTarget(target.clone());
        match target {
            Target::Light(reference) => self.light(reference).map(|l| vec![l]).ok_or_else(unknown),
            Target::Group(reference) if reference == ALL_LIGHTS_GROUP => {
                Ok(self.lights.iter().collect())
            }
            Target::Group(reference) => {
                let group = self
                    .groups
                    .iter()
                    .find(|g| g.id == *reference || g.name == *reference)
                    .ok_or_else(unknown)?;
                Ok(self
                    .lights
                    .iter()
                    .filter(|light| group.lights.iter().any(|id| id == light.id()))
                    .collect())
            }
        }
    }
}

impl LightingService for VirtualLights {
    async fn lights(&self) -> Result<Vec<Light>, LightingError> {
        Ok(self.lights.iter().map(VirtualLight::describe).collect())
    }

    async fn groups(&self) -> Result<Vec<Group>, LightingError> {
        Ok(self.groups.clone())
    }

    async fn apply(&self, target: &Target, state: &LightState) -> Result<(), LightingError> {
        let members = self.members(target)?;
        if members.iter().any(|light| light.refuses(state)) {
            return Err(LightingError::DeviceOff {
                target: target.clone(),
            });
        }
        for light in members {
            light.apply(state);
        }
        tracing::debug!(%target, state = %state.to_json(), "virtual lights updated");
        Ok(())
    }

    async fn power_off(&self, target: &Target) -> Result<(), LightingError> {
        let off = LightState::powered_off();
        for light in self.members(target)? {
            light.apply(&off);
        }
        Ok(())
    }
}
