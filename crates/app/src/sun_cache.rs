//! Per-day cache of sunrise/sunset times.
//!
//! Entries belong to one calendar day, one per location. A new day drops
//! every entry. A failed fetch stores nothing, so the next lookup retries.

use chrono::NaiveDate;
use hued_domain::sun::{Coordinates, SunTimes};

use crate::ports::SunDataSource;

/// Sun times for one day, refreshed through a [`SunDataSource`].
#[derive(Debug, Default)]
pub struct SunDataCache {
    day: Option<NaiveDate>,
    entries: Vec<(Coordinates, SunTimes)>,
}

impl SunDataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sun times for `today` at `coordinates`, fetching at most once per
    /// location and day.
    ///
    /// Returns `None` when the source fails; the caller treats that as
    /// "darkness unknown".
    pub async fn get<S: SunDataSource>(
        &mut self,
        source: &S,
        coordinates: Coordinates,
        today: NaiveDate,
    ) -> Option<SunTimes> {
        if self.day != Some(today) {
            self.day = Some(today);
            self.entries.clear();
        }
        if let Some((_, times)) = self.entries.iter().find(|(at, _)| *at == coordinates) {
            return Some(*times);
        }

        tracing::debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            %today,
            "retrieving sunrise/sunset data"
        );
        match source.sun_times(coordinates, today).await {
            Ok(times) => {
                tracing::debug!(sunrise = %times.sunrise, sunset = %times.sunset, "sun data cached");
                self.entries.push((coordinates, times));
                Some(times)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not retrieve sun data, will retry");
                None
            }
        }
    }

    /// Drop every cached entry.
    pub fn invalidate(&mut self) {
        self.day = None;
        self.entries.clear();
    }

    /// Day the cached entries belong to, if any are held.
    #[must_use]
    pub fn cached_day(&self) -> Option<NaiveDate> {
        self.day.filter(|_| !self.entries.is_empty())
    }

    /// Number of locations cached for the current day.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
