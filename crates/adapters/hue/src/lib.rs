//! # hued-adapter-hue
//!
//! Lighting adapter for a Philips Hue bridge (REST API v1).
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list lights | `GET /api/{user}/lights` |
//! | list groups | `GET /api/{user}/groups` |
//! | apply to a light | `PUT /api/{user}/lights/{id}/state` |
//! | apply to a group | `PUT /api/{user}/groups/{id}/action` |
//!
//! Targets resolve by bridge id or by name. The bridge answers a change to a
//! light that is off with error type 201, reported as
//! `LightingError::DeviceOff`.
//!
//! ## Dependency rule
//!
//! Depends on `hued-app` (port traits) and `hued-domain` only.

mod api;
mod bridge;
mod config;
mod error;

pub use bridge::HueBridge;
pub use config::BridgeConfig;
pub use error::HueError;
