//! Sun data port — sunrise and sunset for a place and a day.

use std::future::Future;

use chrono::NaiveDate;
use hued_domain::error::HuedError;
use hued_domain::sun::{Coordinates, SunTimes};

/// Source of sunrise/sunset timestamps.
pub trait SunDataSource {
    /// Sunrise and sunset on `date` at `coordinates`.
    fn sun_times(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> impl Future<Output = Result<SunTimes, HuedError>> + Send;
}
