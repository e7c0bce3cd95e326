//! [`LightingService`] implementation over the bridge's REST API.

use std::time::Duration;

use hued_app::ports::LightingService;
use hued_domain::error::LightingError;
use hued_domain::light::{Group, Light, LightState, Target};
use serde_json::Value;

use crate::api::{DEVICE_OFF, parse_groups, parse_lights, parse_put_response};
use crate::config::BridgeConfig;
use crate::error::HueError;

/// Bridge id of the implicit group holding every light.
const ALL_LIGHTS_GROUP: &str = "0";

/// A Hue bridge reached over HTTP.
#[derive(Debug, Clone)]
pub struct HueBridge {
    client: reqwest::Client,
    base_url: String,
}

impl HueBridge {
    /// Build a client for the bridge described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HueError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &BridgeConfig) -> Result<Self, HueError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    async fn get(&self, path: &str) -> Result<Value, HueError> {
        let url = format!("{}/{path}", self.base_url);
        let body = self.client.get(&url).send().await?.json().await?;
        Ok(body)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, HueError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, %body, "bridge request");
        let answer = self.client.put(&url).json(body).send().await?.json().await?;
        Ok(answer)
    }

    async fn fetch_lights(&self) -> Result<Vec<Light>, HueError> {
        parse_lights(self.get("lights").await?)
    }

    async fn fetch_groups(&self) -> Result<Vec<Group>, HueError> {
        parse_groups(self.get("groups").await?)
    }

    /// Bridge id for a light given by id or name.
    async fn light_id(&self, target: &Target, reference: &str) -> Result<String, LightingError> {
        let lights = self.fetch_lights().await?;
        lights
            .into_iter()
            .find(|light| light.id == reference || light.name == reference)
            .map(|light| light.id)
            .ok_or_else(|| LightingError::UnknownTarget(target.clone()))
    }

    /// The group given by id or name. Group `0` is every light.
    async fn find_group(&self, target: &Target, reference: &str) -> Result<Group, LightingError> {
        if reference == ALL_LIGHTS_GROUP {
            let lights = self.fetch_lights().await?;
            return Ok(Group {
                id: ALL_LIGHTS_GROUP.to_string(),
                name: "All lights".to_string(),
                lights: lights.into_iter().map(|light| light.id).collect(),
            });
        }
        let groups = self.fetch_groups().await?;
        groups
            .into_iter()
            .find(|group| group.id == reference || group.name == reference)
            .ok_or_else(|| LightingError::UnknownTarget(target.clone()))
    }

    async fn resource_path(&self, target: &Target) -> Result<String, LightingError> {
        match target {
            Target::Light(reference) => {
                let id = self.light_id(target, reference).await?;
                Ok(format!("lights/{id}/state"))
            }
            Target::Group(reference) => {
                let group = self.find_group(target, reference).await?;
                Ok(format!("groups/{}/action", group.id))
            }
        }
    }
}

impl LightingService for HueBridge {
    async fn lights(&self) -> Result<Vec<Light>, LightingError> {
        Ok(self.fetch_lights().await?)
    }

    async fn groups(&self) -> Result<Vec<Group>, LightingError> {
        Ok(self.fetch_groups().await?)
    }

    async fn apply(&self, target: &Target, state: &LightState) -> Result<(), LightingError> {
        let path = self.resource_path(target).await?;
        let answer = self.put(&path, &state.to_json()).await?;
        match parse_put_response(&answer) {
            Ok(()) => Ok(()),
            Err(HueError::Api { code, .. }) if code == DEVICE_OFF => Err(LightingError::DeviceOff {
                target: target.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn power_off(&self, target: &Target) -> Result<(), LightingError> {
        let members = match target {
            Target::Light(_) => vec![target.clone()],
            Target::Group(reference) => self
                .find_group(target, reference)
                .await?
                .lights
                .into_iter()
                .map(Target::Light)
                .collect(),
        };

        let off = LightState::powered_off();
        let mut last_error = None;
        for member in &members {
            if let Err(err) = self.apply(member, &off).await {
                tracing::warn!(light = %member, error = %err, "could not power off");
                last_error = Some(err);
            }
        }
        last_error.map_or(Ok(()), Err)
    }
}
