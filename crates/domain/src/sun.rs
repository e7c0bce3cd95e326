//! Sun times and the twilight-buffered darkness check.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// Extension of the dark period into daylight on both ends of the day.
pub const TWILIGHT_BUFFER_MINUTES: i64 = 10;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCoordinates`] when either value is
    /// not finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::InvalidCoordinates(format!(
                "latitude {latitude} out of range"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::InvalidCoordinates(format!(
                "longitude {longitude} out of range"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Sunrise and sunset for one calendar day at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: Timestamp,
    pub sunset: Timestamp,
}

impl SunTimes {
    /// Whether `now` falls in darkness, twilight buffer included.
    ///
    /// Full daylight is `[sunrise + buffer, sunset - buffer]`; everything
    /// outside it counts as dark.
    #[must_use]
    pub fn is_dark_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let now = now.with_timezone(&Utc);
        let buffer = TimeDelta::minutes(TWILIGHT_BUFFER_MINUTES);
        now < self.sunrise + buffer || now > self.sunset - buffer
    }
}
