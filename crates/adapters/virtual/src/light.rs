//! Virtual light — holds power and parameters, refuses changes while off.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hued_domain::light::{Light, LightState};
use serde_json::{Map, Value};

/// Power and parameters of a simulated light.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightStatus {
    pub on: bool,
    pub parameters: Map<String, Value>,
}

/// A simulated light.
#[derive(Debug)]
pub struct VirtualLight {
    id: String,
    name: String,
    status: Mutex<LightStatus>,
}

impl VirtualLight {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: Mutex::new(LightStatus::default()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `reference` names this light by id or name.
    #[must_use]
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }

    /// Snapshot as a domain [`Light`].
    #[must_use]
    pub fn describe(&self) -> Light {
        Light {
            id: self.id.clone(),
            name: self.name.clone(),
            on: self.status().on,
            reachable: true,
        }
    }

    #[must_use]
    pub fn status(&self) -> LightStatus {
        self.lock_status().clone()
    }

    /// Whether `state` would be refused: the light is off and the state
    /// changes parameters without switching it on.
    #[must_use]
    pub fn refuses(&self, state: &LightState) -> bool {
        !self.lock_status().on && state.power() != Some(true) && state.has_attributes()
    }

    /// Apply `state` unconditionally.
    pub fn apply(&self, state: &LightState) {
        let mut status = self.lock_status();
        for (key, value) in state.iter() {
            if key == LightState::ON {
                status.on = value.as_bool().unwrap_or(status.on);
            } else {
                status.parameters.insert(key.clone(), value.clone());
            }
        }
    }

    fn lock_status(&self) -> MutexGuard<'_, LightStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_off() {
        let light = VirtualLight::new("1", "Desk lamp");
        assert!(!light.describe().on);
        assert!(light.status().parameters.is_empty());
    }

    #[test]
    fn should_refuse_parameters_while_off() {
        let light = VirtualLight::new("1", "Desk lamp");
        assert!(light.refuses(&LightState::new().with("bri", 100)));
        assert!(!light.refuses(&LightState::new().with("bri", 100).with("on", true)));
        assert!(!light.refuses(&LightState::powered_off()));
    }

    #[test]
    fn should_accept_parameters_once_on() {
        let light = VirtualLight::new("1", "Desk lamp");
        light.apply(&LightState::new().with("on", true));
        assert!(!light.refuses(&LightState::new().with("bri", 100)));
    }

    #[test]
    fn should_store_power_and_parameters() {
        let light = VirtualLight::new("1", "Desk lamp");
        light.apply(&LightState::new().with("on", true).with("ct", 400));
        let status = light.status();
        assert!(status.on);
        assert_eq!(status.parameters.get("ct"), Some(&Value::from(400)));
        assert!(!status.parameters.contains_key("on"));
    }

    #[test]
    fn should_match_by_id_or_name() {
        let light = VirtualLight::new("3", "TV backlight");
        assert!(light.matches("3"));
        assert!(light.matches("TV backlight"));
        assert!(!light.matches("tv backlight"));
    }
}
