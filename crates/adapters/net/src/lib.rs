//! # hued-adapter-net
//!
//! Network-facing adapters for rule conditions:
//!
//! - [`PingProbe`] — `HostProbe` that sends one ICMP echo with the system
//!   `ping` and a bounded wait.
//! - [`SunriseSunsetApi`] — `SunDataSource` backed by the
//!   [sunrise-sunset.org](https://sunrise-sunset.org/api) JSON API.
//!
//! ## Dependency rule
//!
//! Depends on `hued-app` (port traits) and `hued-domain` only.

mod ping;
mod sun;

pub use ping::PingProbe;
pub use sun::{SunApiError, SunriseSunsetApi};
