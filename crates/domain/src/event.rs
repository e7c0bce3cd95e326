//! Events — named, reusable light actions.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::light::{LightState, Target};

/// A single light action: switch `target` into the state described by
/// `actions`.
///
/// Events loaded from `events.yml` are named; events inlined in a scene may
/// be anonymous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightEvent {
    pub name: Option<String>,
    pub target: Target,
    pub actions: LightState,
}

impl LightEvent {
    /// Create an event, filling in `on = true` when the actions leave the
    /// power state unspecified.
    #[must_use]
    pub fn new(name: Option<String>, target: Target, actions: LightState) -> Self {
        Self {
            name,
            target,
            actions: actions.with_default_power(),
        }
    }

    /// Name used in logs; anonymous events show their target instead.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.target.to_string())
    }
}

/// Raw event parameters as written in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub light: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub actions: LightState,
}

impl EventDefinition {
    /// Build the [`LightEvent`], using `name` when the definition itself has
    /// none.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEventTarget`] unless exactly one of
    /// `light` or `group` is set, and [`ValidationError::EmptyName`] if a
    /// name is given but empty.
    pub fn into_event(self, name: Option<String>) -> Result<LightEvent, ValidationError> {
        let target = match (self.light, self.group) {
            (Some(light), None) => Target::Light(light),
            (None, Some(group)) => Target::Group(group),
            _ => return Err(ValidationError::InvalidEventTarget),
        };
        let name = self.name.or(name);
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::EmptyName);
        }
        Ok(LightEvent::new(name, target, self.actions))
    }
}
