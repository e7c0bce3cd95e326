//! Lights, groups and the desired-state payload sent to them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What an action is aimed at: a single light or a group of lights.
///
/// The inner string is either the bridge id or the human-readable name;
/// lighting services resolve both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Light(String),
    Group(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light(r) => write!(f, "light `{r}`"),
            Self::Group(r) => write!(f, "group `{r}`"),
        }
    }
}

/// Desired light state, as a map of bridge parameters
/// (`on`, `bri`, `hue`, `sat`, `ct`, `xy`, `transitiontime`, `alert`, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightState(Map<String, Value>);

impl LightState {
    pub const ON: &'static str = "on";

    /// An empty state (no parameters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State that only switches the target off.
    #[must_use]
    pub fn powered_off() -> Self {
        Self::new().with(Self::ON, false)
    }

    /// State that flashes the target once.
    #[must_use]
    pub fn blink() -> Self {
        Self::new().with("alert", "select")
    }

    /// Set a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Fill in `on = true` when the power parameter is absent.
    #[must_use]
    pub fn with_default_power(mut self) -> Self {
        self.0
            .entry(Self::ON)
            .or_insert_with(|| Value::Bool(true));
        self
    }

    /// The requested power state, if any.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.0.get(Self::ON).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether any parameter other than `on` is set.
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        self.0.keys().any(|k| k != Self::ON)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The parameters as a JSON object, ready to send to a bridge.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for LightState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A light discovered on the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub id: String,
    pub name: String,
    pub on: bool,
    pub reachable: bool,
}

/// A group of lights discovered on the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Ids of the member lights.
    pub lights: Vec<String>,
}
