/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core session data structures for the weekly grid.
//!
//! Two distinct types model the two sides of the layout pipeline:
//!
//! ```text
//! store / catalog  ──►  SessionRecord  ──(Session::from_record)──►  Session  ──►  grouping / layout
//!                        ↑ raw, as stored                            ↑ validated, typed day + interval
//! ```
//!
//! A [`SessionRecord`] is kept verbatim in the schedule so list views can show
//! it even when it carries an unknown day or a malformed time.  Only records
//! that validate become [`Session`]s and reach the grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::layout::SessionIssue;

// ── Day of week ───────────────────────────────────────────────────────────────

/// One column of the five-day grid.
///
/// The derived `Ord` follows declaration order, so `Monday < Friday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All grid days in display order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Zero-based column index of this day on the grid.
    pub fn index(self) -> usize {
        self as usize
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The day string is not one of the five grid days.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day '{0}' (expected Monday through Friday)")]
pub struct ParseDayError(pub String);

impl FromStr for Day {
    type Err = ParseDayError;

    /// Accepts English names and abbreviations (any case) as well as the
    /// Turkish names used by the course catalog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim() {
            "Pazartesi" => Day::Monday,
            "Salı" => Day::Tuesday,
            "Çarşamba" => Day::Wednesday,
            "Perşembe" => Day::Thursday,
            "Cuma" => Day::Friday,
            other => match other.to_ascii_lowercase().as_str() {
                "monday" | "mon" => Day::Monday,
                "tuesday" | "tue" => Day::Tuesday,
                "wednesday" | "wed" => Day::Wednesday,
                "thursday" | "thu" => Day::Thursday,
                "friday" | "fri" => Day::Friday,
                _ => return Err(ParseDayError(s.to_string())),
            },
        };
        Ok(day)
    }
}

// ── Clock time ────────────────────────────────────────────────────────────────

/// A time of day at minute resolution on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Unchecked constructor for compile-time constants.
    pub(crate) const fn hm(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    /// Build from hour (0–23) and minute (0–59).  Returns `None` when either
    /// component is out of range.
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour as u16 * 60 + minute as u16))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Fractional hours since midnight (`09:30` → `9.5`).
    pub fn as_hours(self) -> f64 {
        self.0 as f64 / 60.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Failure to read an `HH:MM` time string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTimeError {
    #[error("time '{0}' is not in HH:MM form")]
    Format(String),

    #[error("time '{0}' is out of range (00:00 to 23:59)")]
    OutOfRange(String),
}

impl FromStr for ClockTime {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let format_err = || ParseTimeError::Format(s.to_string());

        let (h, m) = trimmed.split_once(':').ok_or_else(format_err)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
            return Err(format_err());
        }

        let hour: u8 = h.parse().map_err(|_| format_err())?;
        let minute: u8 = m.parse().map_err(|_| format_err())?;
        ClockTime::from_hm(hour, minute).ok_or_else(|| ParseTimeError::OutOfRange(s.to_string()))
    }
}

// ── Time range ────────────────────────────────────────────────────────────────

/// Half-open interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: ClockTime,
    end: ClockTime,
}

impl TimeRange {
    /// Returns `None` for zero-length or reversed intervals.
    pub fn new(start: ClockTime, end: ClockTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Strict overlap: `[09:00, 10:00)` and `[10:00, 11:00)` do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ── SessionRecord (raw input) ─────────────────────────────────────────────────

/// Start/end strings exactly as stored, e.g. `{ start: "09:30", end: "11:20" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpanRecord {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// One meeting of one course section as held by the schedule store or the
/// course catalog.
///
/// Every field except `id` is optional on input.  `id` and `crn` accept
/// either strings or bare numbers since catalog exports use both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub crn: String,

    #[serde(default)]
    pub code: String,

    /// Course title; only the catalog uses it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub instructor: String,

    #[serde(default)]
    pub building: String,

    #[serde(default)]
    pub classroom: String,

    #[serde(default)]
    pub day: String,

    #[serde(default)]
    pub time: TimeSpanRecord,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

// ── Session (validated) ───────────────────────────────────────────────────────

/// A validated session: known grid day and a non-empty interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    pub crn: String,
    pub code: String,
    pub instructor: String,
    pub building: String,
    pub classroom: String,
    pub day: Day,
    pub time: TimeRange,
}

impl Session {
    /// Validate a raw record.
    ///
    /// # Errors
    /// * [`SessionIssue::UnparsableTime`] – start or end is not `HH:MM`.
    /// * [`SessionIssue::InvalidInterval`] – `start >= end`.
    /// * [`SessionIssue::UnknownDay`] – day is outside Monday–Friday.
    pub fn from_record(record: &SessionRecord) -> Result<Self, SessionIssue> {
        let parse_time = |value: &str| {
            value
                .parse::<ClockTime>()
                .map_err(|source| SessionIssue::UnparsableTime {
                    id: record.id.clone(),
                    source,
                })
        };
        let start = parse_time(&record.time.start)?;
        let end = parse_time(&record.time.end)?;

        let time = TimeRange::new(start, end).ok_or_else(|| SessionIssue::InvalidInterval {
            id: record.id.clone(),
            start,
            end,
        })?;

        let day = record
            .day
            .parse::<Day>()
            .map_err(|_| SessionIssue::UnknownDay {
                id: record.id.clone(),
                day: record.day.clone(),
            })?;

        Ok(Self {
            id: record.id.clone(),
            crn: record.crn.clone(),
            code: record.code.clone(),
            instructor: record.instructor.clone(),
            building: record.building.clone(),
            classroom: record.classroom.clone(),
            day,
            time,
        })
    }
}

// ── Test fixtures ─────────────────────────────────────────────────────────────


// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    // ── Day ───────────────────────────────────────────────────────────────────

    #[test]
    fn days_are_ordered_monday_first() {
        assert!(Day::Monday < Day::Tuesday);
        assert!(Day::Thursday < Day::Friday);
        assert_eq!(Day::Monday.index(), 0);
        assert_eq!(Day::Friday.index(), 4);
    }

    #[test]
    fn day_parses_english_and_catalog_names() {
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("Wed".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!("Pazartesi".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("Salı".parse::<Day>().unwrap(), Day::Tuesday);
        assert_eq!("Çarşamba".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!("Perşembe".parse::<Day>().unwrap(), Day::Thursday);
        assert_eq!(" Cuma ".parse::<Day>().unwrap(), Day::Friday);
    }

    #[test]
    fn weekend_is_not_a_grid_day() {
        let err = "Saturday".parse::<Day>().unwrap_err();
        assert_eq!(err, ParseDayError("Saturday".to_string()));
    }

    // ── ClockTime ─────────────────────────────────────────────────────────────

    #[test]
    fn clock_time_parses_and_displays_zero_padded() {
        assert_eq!(t("9:05").minutes(), 545);
        assert_eq!(t("09:05").to_string(), "09:05");
        assert_eq!(t("23:59").minutes(), 23 * 60 + 59);
        assert_eq!(t("00:00").minutes(), 0);
    }

    #[test]
    fn clock_time_rejects_malformed_strings() {
        for bad in ["", "0930", "9:5", "ab:cd", "09:30:00", "-1:00", "123:00"] {
            assert!(
                matches!(bad.parse::<ClockTime>(), Err(ParseTimeError::Format(_))),
                "'{bad}' should be a format error"
            );
        }
    }

    #[test]
    fn clock_time_rejects_out_of_range_values() {
        assert!(matches!(
            "24:00".parse::<ClockTime>(),
            Err(ParseTimeError::OutOfRange(_))
        ));
        assert!(matches!(
            "10:60".parse::<ClockTime>(),
            Err(ParseTimeError::OutOfRange(_))
        ));
    }

    #[test]
    fn as_hours_is_fractional() {
        assert!((t("09:30").as_hours() - 9.5).abs() < 1e-12);
    }

    // ── TimeRange ─────────────────────────────────────────────────────────────

    #[test]
    fn time_range_requires_start_before_end() {
        assert!(TimeRange::new(t("10:00"), t("10:00")).is_none());
        assert!(TimeRange::new(t("11:00"), t("10:00")).is_none());
        let r = TimeRange::new(t("10:00"), t("11:30")).unwrap();
        assert_eq!(r.duration_minutes(), 90);
        assert_eq!(r.to_string(), "10:00-11:30");
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let a = TimeRange::new(t("09:00"), t("10:00")).unwrap();
        let b = TimeRange::new(t("10:00"), t("11:00")).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn overlap_is_symmetric_and_covers_containment() {
        let outer = TimeRange::new(t("09:00"), t("12:00")).unwrap();
        let inner = TimeRange::new(t("10:00"), t("10:30")).unwrap();
        let shifted = TimeRange::new(t("11:59"), t("13:00")).unwrap();
        assert!(outer.overlaps(&inner) && inner.overlaps(&outer));
        assert!(outer.overlaps(&shifted) && shifted.overlaps(&outer));
        assert!(!inner.overlaps(&shifted));
    }

    // ── Session::from_record ──────────────────────────────────────────────────

    #[test]
    fn valid_record_becomes_session() {
        let s = Session::from_record(&record("s1", "21345", "Salı", "08:30", "10:20")).unwrap();
        assert_eq!(s.day, Day::Tuesday);
        assert_eq!(s.time.start(), t("08:30"));
        assert_eq!(s.crn, "21345");
    }

    #[test]
    fn reversed_interval_is_reported() {
        let err = Session::from_record(&record("s1", "1", "Monday", "10:00", "09:00")).unwrap_err();
        assert!(matches!(err, SessionIssue::InvalidInterval { ref id, .. } if id == "s1"));
    }

    #[test]
    fn zero_length_interval_is_reported() {
        let err = Session::from_record(&record("s1", "1", "Monday", "10:00", "10:00")).unwrap_err();
        assert!(matches!(err, SessionIssue::InvalidInterval { .. }));
    }

    #[test]
    fn unparsable_time_is_reported() {
        let err = Session::from_record(&record("s1", "1", "Monday", "ten", "11:00")).unwrap_err();
        assert!(matches!(err, SessionIssue::UnparsableTime { .. }));
    }

    #[test]
    fn unknown_day_is_reported() {
        let err = Session::from_record(&record("s1", "1", "Cumartesi", "10:00", "11:00")).unwrap_err();
        assert!(matches!(err, SessionIssue::UnknownDay { ref day, .. } if day == "Cumartesi"));
    }

    // ── serde ─────────────────────────────────────────────────────────────────

    #[test]
    fn record_accepts_numeric_crn_and_missing_fields() {
        let yaml = r#"
id: 101
crn: 21345
day: "Pazartesi"
time: { start: "09:30", end: "11:20" }
"#;
        let rec: SessionRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rec.id, "101");
        assert_eq!(rec.crn, "21345");
        assert_eq!(rec.instructor, "");
        assert!(rec.name.is_none());
    }
}
