use crate::errors::AppError;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";
// Full-date form written by older dashboard builds, e.g. "Fri Oct 16 2026".
const LEGACY_FORMAT: &str = "%a %b %d %Y";

/// A local calendar day. Used for task dates, the last visit and the
/// daily focus keys alike, always written as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The day `instant` falls on in the local timezone.
    pub fn local(instant: DateTime<Utc>) -> Self {
        Self(instant.with_timezone(&Local).date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn offset(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Monday of the week containing this day.
    pub fn week_start(self) -> Self {
        self.offset(-i64::from(self.0.weekday().num_days_from_monday()))
    }

    pub fn weekday_label(self) -> String {
        self.0.format("%a").to_string()
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, CANONICAL_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(value, LEGACY_FORMAT))
            .map(Self)
            .map_err(|_| AppError::invalid_input(format!("not a calendar day: {value:?}")))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Day {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DayVisitor;

        impl de::Visitor<'_> for DayVisitor {
            type Value = Day;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a YYYY-MM-DD date string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Day, E> {
                Day::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DayVisitor)
    }
}

/// `YYYY-MM-DD` of `instant` (or of now) in the local timezone.
pub fn local_date_str(instant: Option<DateTime<Utc>>) -> String {
    Day::local(instant.unwrap_or_else(Utc::now)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_forms() {
        let expected = Day::from_ymd(2026, 10, 16).unwrap();
        assert_eq!(Day::parse("2026-10-16").unwrap(), expected);
        assert_eq!(Day::parse("Fri Oct 16 2026").unwrap(), expected);
        assert_eq!(Day::parse("Fri Oct 02 2026").unwrap(), Day::from_ymd(2026, 10, 2).unwrap());
        assert!(Day::parse("10-16").is_err());
    }

    #[test]
    fn displays_zero_padded() {
        let day = Day::from_ymd(2025, 1, 3).unwrap();
        assert_eq!(day.to_string(), "2025-01-03");
    }

    #[test]
    fn week_starts_on_monday() {
        let sunday = Day::from_ymd(2026, 1, 11).unwrap();
        assert_eq!(sunday.week_start(), Day::from_ymd(2026, 1, 5).unwrap());
        let monday = Day::from_ymd(2026, 1, 5).unwrap();
        assert_eq!(monday.week_start(), monday);
    }

    #[test]
    fn works_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Day::from_ymd(2026, 3, 1).unwrap(), 5u64);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2026-03-01":5}"#);

        let legacy: std::collections::BTreeMap<Day, u64> =
            serde_json::from_str(r#"{"Sun Mar 01 2026":7}"#).unwrap();
        assert_eq!(legacy.get(&Day::from_ymd(2026, 3, 1).unwrap()), Some(&7));
    }

    #[test]
    fn local_date_str_is_iso_shaped() {
        let text = local_date_str(None);
        assert_eq!(text.len(), 10);
        assert!(Day::parse(&text).is_ok());
    }
}
