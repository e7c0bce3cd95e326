//! The condition language: what a rule checks before it is valid.
//!
//! A condition is written as a single-key mapping, e.g. `from: "18:00"`. A
//! leading `^` on the key negates it (`"^found host": phone.lan`). Keys
//! outside the known vocabulary parse into [`ConditionKind::Unknown`], which
//! always evaluates to false.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday};
use serde_json::Value;

use crate::error::ValidationError;
use crate::sun::Coordinates;
use crate::time::WallClock;

/// Prefix on a condition key that inverts its result.
pub const NEGATION_MARKER: char = '^';

/// Width of the window opened by an `at` condition.
pub const AT_WINDOW_SECONDS: i64 = 60;

/// A time of day, resolved against the calendar day of the instant it is
/// compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    #[must_use]
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    #[must_use]
    pub fn time(self) -> NaiveTime {
        self.0
    }

    /// This time of day on the local calendar day of `now`.
    #[must_use]
    pub fn on_day_of(self, now: &WallClock) -> NaiveDateTime {
        now.date_naive().and_time(self.0)
    }

    fn from_twelve_hour(hour: u32, minute: u32, pm: bool) -> Option<NaiveTime> {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        NaiveTime::from_hms_opt(hour, minute, 0)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    /// Accepts `HH:MM`, `HH:MM:SS`, `H am`, `H:MM pm`, `noon` and `midnight`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime(s.to_string());
        let text = s.trim().to_ascii_lowercase();

        match text.as_str() {
            "noon" => return Ok(Self(NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(invalid)?)),
            "midnight" => return Ok(Self(NaiveTime::MIN)),
            _ => {}
        }

        let meridiem = text
            .strip_suffix("am")
            .map(|rest| (rest, false))
            .or_else(|| text.strip_suffix("pm").map(|rest| (rest, true)));
        if let Some((clock, pm)) = meridiem {
            let clock = clock.trim();
            let (hour, minute) = match clock.split_once(':') {
                Some((h, m)) => (h.parse().map_err(|_| invalid())?, m.parse().map_err(|_| invalid())?),
                None => (clock.parse().map_err(|_| invalid())?, 0),
            };
            return Self::from_twelve_hour(hour, minute, pm)
                .map(Self)
                .ok_or_else(invalid);
        }

        NaiveTime::parse_from_str(&text, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&text, "%H:%M"))
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.second() == 0 {
            write!(f, "{}", self.0.format("%H:%M"))
        } else {
            write!(f, "{}", self.0.format("%H:%M:%S"))
        }
    }
}

/// The closed set of condition kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    /// True from the given time of day onwards.
    From(TimeOfDay),
    /// True up to and including the given time of day.
    Until(TimeOfDay),
    /// True for one minute starting at the given time of day.
    At(TimeOfDay),
    /// True when the host answers a reachability probe.
    FoundHost(String),
    /// True on any of the listed days. Tokens that name no day are kept
    /// in `unrecognised` and never match.
    Weekdays {
        days: Vec<Weekday>,
        unrecognised: Vec<String>,
    },
    /// True in darkness (twilight included) at the given location.
    DarkAt(Coordinates),
    /// Anything outside the vocabulary. Never true.
    Unknown { name: String },
}

impl ConditionKind {
    /// The configuration keyword for this kind.
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::From(_) => "from",
            Self::Until(_) => "until",
            Self::At(_) => "at",
            Self::FoundHost(_) => "found host",
            Self::Weekdays { .. } => "weekdays",
            Self::DarkAt(_) => "dark_at",
            Self::Unknown { name } => name,
        }
    }
}

/// One condition of a rule, with its optional negation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSpec {
    pub negated: bool,
    pub kind: ConditionKind,
}

impl ConditionSpec {
    #[must_use]
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            negated: false,
            kind,
        }
    }

    #[must_use]
    pub fn negated(kind: ConditionKind) -> Self {
        Self {
            negated: true,
            kind,
        }
    }

    /// Parse one `key: value` condition.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a known kind carries a payload of
    /// the wrong shape. Unknown kinds never fail.
    pub fn parse(key: &str, value: &Value) -> Result<Self, ValidationError> {
        let (negated, name) = match key.strip_prefix(NEGATION_MARKER) {
            Some(rest) => (true, rest),
            None => (false, key),
        };

        let kind = match name {
            "from" => ConditionKind::From(parse_time("from", value)?),
            "until" => ConditionKind::Until(parse_time("until", value)?),
            "at" => ConditionKind::At(parse_time("at", value)?),
            "found host" => ConditionKind::FoundHost(parse_host(value)?),
            "weekday" | "weekdays" => {
                let (days, unrecognised) = parse_weekdays(value)?;
                ConditionKind::Weekdays { days, unrecognised }
            }
            "dark_at" => ConditionKind::DarkAt(parse_coordinates(value)?),
            other => ConditionKind::Unknown {
                name: other.to_string(),
            },
        };

        Ok(Self { negated, kind })
    }

    /// Parse a condition entry as it appears in a rule's `conditions` list.
    ///
    /// Anything that is not a single-key mapping becomes an unknown
    /// condition named after its raw form.
    ///
    /// # Errors
    ///
    /// See [`ConditionSpec::parse`].
    pub fn from_value(entry: &Value) -> Result<Self, ValidationError> {
        match entry {
            Value::Object(map) if map.len() == 1 => {
                let (key, value) = map.iter().next().ok_or(ValidationError::InvalidConditionValue {
                    kind: "condition",
                    expected: "a single-key mapping",
                })?;
                Self::parse(key, value)
            }
            other => Ok(Self::new(ConditionKind::Unknown {
                name: other.to_string(),
            })),
        }
    }

    /// Whether this condition can never hold, negated or not.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, ConditionKind::Unknown { .. })
    }
}

impl fmt::Display for ConditionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "{NEGATION_MARKER}")?;
        }
        match &self.kind {
            ConditionKind::From(t) => write!(f, "from {t}"),
            ConditionKind::Until(t) => write!(f, "until {t}"),
            ConditionKind::At(t) => write!(f, "at {t}"),
            ConditionKind::FoundHost(host) => write!(f, "found host {host}"),
            ConditionKind::Weekdays { days, unrecognised } => {
                let days: Vec<_> = days
                    .iter()
                    .map(ToString::to_string)
                    .chain(unrecognised.iter().cloned())
                    .collect();
                write!(f, "weekdays {}", days.join(","))
            }
            ConditionKind::DarkAt(c) => write!(f, "dark_at ({}, {})", c.latitude, c.longitude),
            ConditionKind::Unknown { name } => write!(f, "unknown {name}"),
        }
    }
}

/// Whether `now` lies in the one-minute window opened at `time`.
#[must_use]
pub fn within_at_window(time: TimeOfDay, now: &WallClock) -> bool {
    let start = time.on_day_of(now);
    let now = now.naive_local();
    start <= now && now < start + TimeDelta::seconds(AT_WINDOW_SECONDS)
}

fn parse_time(kind: &'static str, value: &Value) -> Result<TimeOfDay, ValidationError> {
    match value {
        Value::String(s) => s.parse(),
        Value::Number(n) => n
            .as_u64()
            .and_then(|h| u32::try_from(h).ok())
            .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
            .map(TimeOfDay)
            .ok_or_else(|| ValidationError::InvalidTime(n.to_string())),
        _ => Err(ValidationError::InvalidConditionValue {
            kind,
            expected: "a time of day",
        }),
    }
}

fn parse_host(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ValidationError::InvalidConditionValue {
            kind: "found host",
            expected: "a hostname or IP address",
        }),
    }
}

fn parse_weekdays(value: &Value) -> Result<(Vec<Weekday>, Vec<String>), ValidationError> {
    let tokens: Vec<String> = match value {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => {
            return Err(ValidationError::InvalidConditionValue {
                kind: "weekdays",
                expected: "a comma-separated list of days",
            });
        }
    };

    let mut days = Vec::with_capacity(tokens.len());
    let mut unrecognised = Vec::new();
    for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        match token.parse::<Weekday>() {
            Ok(day) => days.push(day),
            Err(_) => unrecognised.push(token.to_string()),
        }
    }
    Ok((days, unrecognised))
}

fn parse_coordinates(value: &Value) -> Result<Coordinates, ValidationError> {
    let invalid = || ValidationError::InvalidConditionValue {
        kind: "dark_at",
        expected: "a [latitude, longitude] pair",
    };
    match value {
        Value::Array(pair) if pair.len() == 2 => {
            let latitude = pair[0].as_f64().ok_or_else(invalid)?;
            let longitude = pair[1].as_f64().ok_or_else(invalid)?;
            Coordinates::new(latitude, longitude)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use serde_json::json;

    fn hm(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    fn wall(hour: u32, minute: u32, second: u32) -> WallClock {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn should_parse_twenty_four_hour_times() {
        assert_eq!("18:00".parse::<TimeOfDay>().unwrap(), hm(18, 0));
        assert_eq!("07:30:15".parse::<TimeOfDay>().unwrap().to_string(), "07:30:15");
    }

    #[test]
    fn should_parse_twelve_hour_times() {
        assert_eq!("7pm".parse::<TimeOfDay>().unwrap(), hm(19, 0));
        assert_eq!("7:45 PM".parse::<TimeOfDay>().unwrap(), hm(19, 45));
        assert_eq!("12 am".parse::<TimeOfDay>().unwrap(), hm(0, 0));
        assert_eq!("12pm".parse::<TimeOfDay>().unwrap(), hm(12, 0));
    }

    #[test]
    fn should_parse_named_times() {
        assert_eq!("noon".parse::<TimeOfDay>().unwrap(), hm(12, 0));
        assert_eq!("Midnight".parse::<TimeOfDay>().unwrap(), hm(0, 0));
    }

    #[test]
    fn should_reject_garbage_time() {
        assert!("soon".parse::<TimeOfDay>().is_err());
        assert!("25:00".parse::<TimeOfDay>().is_err());
        assert!("13pm".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn should_parse_negation_marker() {
        let spec = ConditionSpec::parse("^found host", &json!("phone.lan")).unwrap();
        assert!(spec.negated);
        assert_eq!(spec.kind, ConditionKind::FoundHost("phone.lan".to_string()));
    }

    #[test]
    fn should_accept_weekday_and_weekdays_case_insensitively() {
        let single = ConditionSpec::parse("weekday", &json!("Sat")).unwrap();
        assert_eq!(
            single.kind,
            ConditionKind::Weekdays {
                days: vec![Weekday::Sat],
                unrecognised: vec![],
            }
        );

        let many = ConditionSpec::parse("weekdays", &json!("mon, TUE,wed")).unwrap();
        assert_eq!(
            many.kind,
            ConditionKind::Weekdays {
                days: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed],
                unrecognised: vec![],
            }
        );
    }

    #[test]
    fn should_keep_unknown_day_names_as_unrecognised() {
        let spec = ConditionSpec::parse("weekdays", &json!("mon, funday, mon-fri")).unwrap();
        assert_eq!(
            spec.kind,
            ConditionKind::Weekdays {
                days: vec![Weekday::Mon],
                unrecognised: vec!["funday".to_string(), "mon-fri".to_string()],
            }
        );
    }

    #[test]
    fn should_keep_non_string_list_items_as_unrecognised() {
        let spec = ConditionSpec::parse("weekdays", &json!(["sun", 3])).unwrap();
        assert_eq!(
            spec.kind,
            ConditionKind::Weekdays {
                days: vec![Weekday::Sun],
                unrecognised: vec!["3".to_string()],
            }
        );
    }

    #[test]
    fn should_parse_dark_at_coordinates() {
        let spec = ConditionSpec::parse("dark_at", &json!([52.09, 5.12])).unwrap();
        assert!(matches!(spec.kind, ConditionKind::DarkAt(c) if (c.longitude - 5.12).abs() < 1e-9));
    }

    #[test]
    fn should_reject_dark_at_without_pair() {
        assert!(ConditionSpec::parse("dark_at", &json!("52.09")).is_err());
        assert!(ConditionSpec::parse("dark_at", &json!([52.09])).is_err());
    }

    #[test]
    fn should_parse_unknown_keyword_as_unknown() {
        let spec = ConditionSpec::parse("^raining", &json!(true)).unwrap();
        assert!(spec.negated);
        assert!(spec.is_unknown());
        assert_eq!(spec.kind.keyword(), "raining");
    }

    #[test]
    fn should_treat_non_mapping_entry_as_unknown() {
        let spec = ConditionSpec::from_value(&json!("from 18:00")).unwrap();
        assert!(spec.is_unknown());

        let spec = ConditionSpec::from_value(&json!({"from": "18:00", "until": "20:00"})).unwrap();
        assert!(spec.is_unknown());
    }

    #[test]
    fn should_parse_single_key_mapping_entry() {
        let spec = ConditionSpec::from_value(&json!({"until": "23:30"})).unwrap();
        assert_eq!(spec, ConditionSpec::new(ConditionKind::Until(hm(23, 30))));
    }

    #[test]
    fn should_open_one_minute_window_for_at() {
        let time = hm(7, 0);
        assert!(!within_at_window(time, &wall(6, 59, 59)));
        assert!(within_at_window(time, &wall(7, 0, 0)));
        assert!(within_at_window(time, &wall(7, 0, 59)));
        assert!(!within_at_window(time, &wall(7, 1, 0)));
    }

    #[test]
    fn should_display_condition_with_negation() {
        let spec = ConditionSpec::negated(ConditionKind::From(hm(18, 0)));
        assert_eq!(spec.to_string(), "^from 18:00");
    }
}
