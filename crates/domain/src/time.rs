//! Time and timestamp helpers.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// UTC timestamp used for sun times and other absolute instants.
pub type Timestamp = DateTime<Utc>;

/// Local wall-clock instant. Time-of-day conditions are evaluated against
/// the calendar day and offset carried by this value.
pub type WallClock = DateTime<FixedOffset>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current local wall-clock time.
#[must_use]
pub fn local_now() -> WallClock {
    Local::now().fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_return_local_time_for_the_same_instant() {
        let before = Utc::now();
        let local = local_now().with_timezone(&Utc);
        let after = Utc::now();
        assert!(local >= before);
        assert!(local <= after);
    }
}
