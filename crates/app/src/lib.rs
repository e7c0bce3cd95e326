//! # hued-app
//!
//! Application layer — the rule engine and the **port definitions** (traits)
//! it drives.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ConfigStore` — events, scenes and rules sources with modification times
//!   - `LightingService` — list lights and groups, apply states, power off
//!   - `SunDataSource` — sunrise/sunset times for a place and day
//!   - `HostProbe` — bounded reachability check
//! - Evaluate rule conditions (`ConditionEvaluator`, `SunDataCache`)
//! - Build the event, scene and rule registries
//! - Run evaluation passes and execute active rules with bounded retries
//!   (`RuleEngine`)
//!
//! ## Dependency rule
//! Depends on `hued-domain` only. Never imports adapter crates. Adapters
//! depend on *this* crate, not the reverse.

pub mod condition_evaluator;
pub mod executor;
pub mod ports;
pub mod registry;
pub mod rule_engine;
pub mod sun_cache;
