//! Config store port — where events, scenes and rules come from.

use std::fmt;
use std::future::Future;
use std::time::SystemTime;

use hued_domain::error::HuedError;
use hued_domain::event::EventDefinition;
use hued_domain::rule::RuleDefinition;

/// The three reloadable configuration categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Events,
    Scenes,
    Rules,
}

impl ConfigKind {
    /// Stem of the backing source, e.g. `events` for `events.yml`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Scenes => "scenes",
            Self::Rules => "rules",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named entries in source order.
pub type Definitions<T> = Vec<(String, T)>;

/// Read access to the configuration sources.
///
/// Every `load_*` method returns `Ok(None)` when the source does not exist
/// and an error when it exists but cannot be read or parsed.
pub trait ConfigStore {
    /// Last modification time of a source, `None` when it does not exist.
    fn modified(&self, kind: ConfigKind) -> impl Future<Output = Option<SystemTime>> + Send;

    /// Event name → event parameters.
    fn load_events(
        &self,
    ) -> impl Future<Output = Result<Option<Definitions<EventDefinition>>, HuedError>> + Send;

    /// Scene name → ordered inline event parameters.
    fn load_scenes(
        &self,
    ) -> impl Future<Output = Result<Option<Definitions<Vec<EventDefinition>>>, HuedError>> + Send;

    /// Rule name → rule parameters.
    fn load_rules(
        &self,
    ) -> impl Future<Output = Result<Option<Definitions<RuleDefinition>>, HuedError>> + Send;
}
