//! Condition evaluation — turns a rule's conditions into a validity verdict.

use chrono::Datelike;
use hued_domain::condition::{ConditionKind, ConditionSpec, within_at_window};
use hued_domain::time::WallClock;

use crate::ports::{HostProbe, SunDataSource};
use crate::sun_cache::SunDataCache;

/// Evaluates conditions against an instant, probing the outside world
/// through ports where needed.
///
/// Owns the [`SunDataCache`], so darkness lookups hit the sun data source
/// at most once per day.
pub struct ConditionEvaluator<P, S> {
    probe: P,
    sun_source: S,
    sun_cache: SunDataCache,
}

impl<P, S> ConditionEvaluator<P, S>
where
    P: HostProbe,
    S: SunDataSource,
{
    pub fn new(probe: P, sun_source: S) -> Self {
        Self {
            probe,
            sun_source,
            sun_cache: SunDataCache::new(),
        }
    }

    /// Read access to the sun data cache.
    pub fn sun_cache(&self) -> &SunDataCache {
        &self.sun_cache
    }

    /// Evaluate all conditions (logical AND). Returns `true` if empty.
    ///
    /// Stops at the first condition that does not hold.
    pub async fn evaluate_all(&mut self, conditions: &[ConditionSpec], now: &WallClock) -> bool {
        for condition in conditions {
            if !self.evaluate(condition, now).await {
                return false;
            }
        }
        true
    }

    /// Evaluate a single condition, applying its negation.
    ///
    /// An unknown condition is false whether negated or not.
    pub async fn evaluate(&mut self, condition: &ConditionSpec, now: &WallClock) -> bool {
        match self.evaluate_kind(&condition.kind, now).await {
            Some(result) => result != condition.negated,
            None => false,
        }
    }

    /// `None` means indeterminate (unknown kind).
    async fn evaluate_kind(&mut self, kind: &ConditionKind, now: &WallClock) -> Option<bool> {
        let local = now.naive_local();
        let result = match kind {
            ConditionKind::From(time) => local >= time.on_day_of(now),
            ConditionKind::Until(time) => local <= time.on_day_of(now),
            ConditionKind::At(time) => within_at_window(*time, now),
            ConditionKind::FoundHost(host) => {
                let found = self.probe.is_reachable(host).await;
                tracing::debug!(host = %host, found, "probed host");
                found
            }
            ConditionKind::Weekdays { days, .. } => days.contains(&now.weekday()),
            ConditionKind::DarkAt(coordinates) => {
                match self
                    .sun_cache
                    .get(&self.sun_source, *coordinates, now.date_naive())
                    .await
                {
                    Some(times) => times.is_dark_at(now),
                    None => false,
                }
            }
            ConditionKind::Unknown { name } => {
                tracing::warn!(condition = %name, "unknown condition type, treating as false");
                return None;
            }
        };
        Some(result)
    }
}
