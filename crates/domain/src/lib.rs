//! # hued-domain
//!
//! Pure domain model for the hued lighting rule engine.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, wall-clock timestamps
//! - Define **Lights** and **Groups** as seen through the bridge, plus the
//!   [`Target`](light::Target) an action is aimed at
//! - Define **Events** (named, reusable light actions) and **Scenes**
//!   (ordered sequences of events)
//! - Define the **condition language** (`from`, `until`, `at`, `found host`,
//!   `weekday(s)`, `dark_at`) and its parsing rules
//! - Define **Rules** and their trigger/triggered state machine
//! - Define **sun times** and the twilight-buffered darkness check
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod condition;
pub mod event;
pub mod light;
pub mod rule;
pub mod scene;
pub mod sun;
