//! Lighting backend selection.

use hued_adapter_files::read_yaml;
use hued_adapter_hue::{BridgeConfig, HueBridge};
use hued_adapter_virtual::VirtualLights;
use hued_app::ports::LightingService;
use hued_domain::error::LightingError;
use hued_domain::light::{Group, Light, LightState, Target};

use crate::config::{Backend, Config};

/// The lighting service the engine drives.
pub enum Lighting {
    Hue(HueBridge),
    Virtual(VirtualLights),
}

impl Lighting {
    /// Build the configured backend.
    ///
    /// The Hue backend reads `bridge.yml` from the configuration directory;
    /// when that file is missing, virtual lights are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if `bridge.yml` exists but cannot be read, or the
    /// HTTP client cannot be built.
    pub async fn connect(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        if config.lighting.backend == Backend::Virtual {
            tracing::info!("using virtual lights");
            return Ok(Self::Virtual(VirtualLights::default()));
        }

        let path = config.bridge_file();
        match read_yaml::<BridgeConfig>(&path).await? {
            Some(bridge) => {
                tracing::info!(ip = %bridge.ip, "configured bridge connection");
                Ok(Self::Hue(HueBridge::new(&bridge)?))
            }
            None => {
                tracing::warn!(path = %path.display(), "no bridge configuration, using virtual lights");
                Ok(Self::Virtual(VirtualLights::default()))
            }
        }
    }
}

impl LightingService for Lighting {
    async fn lights(&self) -> Result<Vec<Light>, LightingError> {
        match self {
            Self::Hue(bridge) => bridge.lights().await,
            Self::Virtual(lights) => lights.lights().await,
        }
    }

    async fn groups(&self) -> Result<Vec<Group>, LightingError> {
        match self {
            Self::Hue(bridge) => bridge.groups().await,
            Self::Virtual(lights) => lights.groups().await,
        }
    }

    async fn apply(&self, target: &Target, state: &LightState) -> Result<(), LightingError> {
        match self {
            Self::Hue(bridge) => bridge.apply(target, state).await,
            Self::Virtual(lights) => lights.apply(target, state).await,
        }
    }

    async fn power_off(&self, target: &Target) -> Result<(), LightingError> {
        match self {
            Self::Hue(bridge) => bridge.power_off(target).await,
            Self::Virtual(lights) => lights.power_off(target).await,
        }
    }
}
