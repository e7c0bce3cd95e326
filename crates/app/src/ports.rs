//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod config_store;
pub mod host_probe;
pub mod lighting;
pub mod sun_data;

pub use config_store::{ConfigKind, ConfigStore};
pub use host_probe::HostProbe;
pub use lighting::LightingService;
pub use sun_data::SunDataSource;
