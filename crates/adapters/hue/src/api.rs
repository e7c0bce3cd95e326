//! Bridge payloads and their translation into domain types.
//!
//! Everything here is pure so it can be tested against captured bodies.

use std::collections::BTreeMap;

use hued_domain::light::{Group, Light};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::HueError;

/// Error type the bridge uses for "device is set to off".
pub const DEVICE_OFF: u64 = 201;

#[derive(Debug, Deserialize)]
struct RawLight {
    name: String,
    #[serde(default)]
    state: RawLightState,
}

#[derive(Debug, Default, Deserialize)]
struct RawLightState {
    #[serde(default)]
    on: bool,
    #[serde(default)]
    reachable: bool,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    name: String,
    #[serde(default)]
    lights: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(rename = "type")]
    code: u64,
    #[serde(default)]
    address: String,
    #[serde(default)]
    description: String,
}

impl From<RawError> for HueError {
    fn from(raw: RawError) -> Self {
        Self::Api {
            code: raw.code,
            address: raw.address,
            description: raw.description,
        }
    }
}

/// First `{"error": {...}}` entry of a response list, if any.
fn first_error(body: &Value) -> Option<RawError> {
    body.as_array()?
        .iter()
        .filter_map(|entry| entry.get("error"))
        .find_map(|error| serde_json::from_value(error.clone()).ok())
}

/// Decode an id-keyed object. The bridge reports failures as a list of
/// error entries instead.
fn parse_keyed<T: DeserializeOwned>(body: Value) -> Result<BTreeMap<String, T>, HueError> {
    if let Some(error) = first_error(&body) {
        return Err(error.into());
    }
    serde_json::from_value(body).map_err(|err| HueError::UnexpectedResponse(err.to_string()))
}

/// Sort bridge ids numerically when they are numbers.
fn by_id<T>(entries: BTreeMap<String, T>) -> Vec<(String, T)> {
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by_key(|(id, _)| (id.parse::<u64>().unwrap_or(u64::MAX), id.clone()));
    entries
}

/// Decode `GET /lights`.
pub fn parse_lights(body: Value) -> Result<Vec<Light>, HueError> {
    let raw: BTreeMap<String, RawLight> = parse_keyed(body)?;
    Ok(by_id(raw)
        .into_iter()
        .map(|(id, light)| Light {
            id,
            name: light.name,
            on: light.state.on,
            reachable: light.state.reachable,
        })
        .collect())
}

/// Decode `GET /groups`.
pub fn parse_groups(body: Value) -> Result<Vec<Group>, HueError> {
    let raw: BTreeMap<String, RawGroup> = parse_keyed(body)?;
    Ok(by_id(raw)
        .into_iter()
        .map(|(id, group)| Group {
            id,
            name: group.name,
            lights: group.lights,
        })
        .collect())
}

/// Check the answer to a `PUT`. Any error entry fails the whole request.
pub fn parse_put_response(body: &Value) -> Result<(), HueError> {
    match first_error(body) {
        Some(error) => Err(error.into()),
        None if body.is_array() => Ok(()),
        None => Err(HueError::UnexpectedResponse(body.to_string())),
    }
}
