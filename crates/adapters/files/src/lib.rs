//! # hued-adapter-files
//!
//! Configuration store backed by YAML files in a single directory:
//!
//! | File | Content |
//! |------|---------|
//! | `events.yml` | event name → `{ light \| group, actions }` (optional) |
//! | `scenes.yml` | scene name → list of inline events (optional) |
//! | `rules.yml` | rule name → `{ conditions, trigger, priority, events \| scene }` |
//!
//! Entries keep their file order. A missing file is reported as `None`; a
//! file that exists but cannot be read or parsed is an error.
//!
//! ## Dependency rule
//!
//! Depends on `hued-app` (port traits) and `hued-domain` only.

mod error;
mod store;

pub use error::FileError;
pub use store::{FileConfigStore, read_yaml};
