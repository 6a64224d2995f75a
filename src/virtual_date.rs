// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar instants as seen by the rendering engine.
//!
//! A [`VirtualDate`] is a UTC, proleptic-Gregorian instant.  For ordinary
//! content it is a real date; when produced by the [`TimeCodec`](crate::TimeCodec)
//! from a Ma value it is only meaningful inside this crate.
//!
//! The engine measures time as floating-point milliseconds since the Unix
//! epoch, so every `VirtualDate` converts to and from that representation.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{GeoError, GeoResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MILLIS_PER_SECOND: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([+-]?\d+)(?:-(\d{2})(?:-(\d{2}))?)?(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?(?:Z|[+-]00:?00)?$",
    )
    .expect("static ISO date pattern")
});

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// Trait for points in time usable with [`Interval`](crate::Interval).
pub trait TimeInstant: Copy + Clone + PartialEq + PartialOrd + Sized {
    /// The duration type used for arithmetic operations.
    type Duration: Copy;

    /// Compute `self - other`.
    fn difference(&self, other: &Self) -> Self::Duration;

    /// Add a duration, or `None` when the result is not representable.
    fn checked_add(&self, duration: Self::Duration) -> Option<Self>;

    /// Subtract a duration, or `None` when the result is not representable.
    fn checked_sub(&self, duration: Self::Duration) -> Option<Self>;
}

// ═══════════════════════════════════════════════════════════════════════════
// VirtualDate
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar instant handed to the rendering engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualDate(DateTime<Utc>);

impl VirtualDate {
    /// Midnight UTC on `year-01-01`.
    ///
    /// Returns [`GeoError::Unrepresentable`] when `year` is outside the
    /// calendar backend's range.
    pub fn from_year(year: i64) -> GeoResult<Self> {
        Self::from_ymd(year, 1, 1)
    }

    /// Midnight UTC on the given calendar day.
    pub fn from_ymd(year: i64, month: u32, day: u32) -> GeoResult<Self> {
        let y = i32::try_from(year).map_err(|_| GeoError::Unrepresentable { year })?;
        NaiveDate::from_ymd_opt(y, month, day)
            .map(|date| Self(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))))
            .ok_or(GeoError::Unrepresentable { year })
    }

    #[inline]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    #[inline]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Builds an instant from engine milliseconds since the Unix epoch.
    ///
    /// Sub-millisecond fractions are kept down to nanoseconds.
    pub fn from_millis(millis: f64) -> Option<Self> {
        if !millis.is_finite() {
            return None;
        }
        let mut secs = (millis / MILLIS_PER_SECOND).floor();
        let mut nanos = ((millis - secs * MILLIS_PER_SECOND) * NANOS_PER_MILLI).round();
        if nanos >= 1e9 {
            secs += 1.0;
            nanos -= 1e9;
        }
        if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp(secs as i64, nanos.max(0.0) as u32).map(Self)
    }

    /// Milliseconds since the Unix epoch, as the engine counts them.
    pub fn as_millis(&self) -> f64 {
        self.0.timestamp() as f64 * MILLIS_PER_SECOND
            + f64::from(self.0.timestamp_subsec_nanos()) / NANOS_PER_MILLI
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Whether the year is negative, i.e. the instant encodes deep time.
    #[inline]
    pub fn is_before_common_era(&self) -> bool {
        self.year() < 0
    }

    /// Year rendered so that it round-trips unambiguously: negative years
    /// carry at least six digits, others at least four.
    pub fn padded_year(&self) -> String {
        let year = i64::from(self.year());
        if year < 0 {
            format!("-{:06}", year.unsigned_abs())
        } else {
            format!("{year:04}")
        }
    }

    /// ISO-8601 rendering with an extended (padded) year.
    ///
    /// ```
    /// use geochron::VirtualDate;
    ///
    /// let date = VirtualDate::from_year(-90_000).unwrap();
    /// assert_eq!(date.to_iso_string(), "-090000-01-01T00:00:00Z");
    /// ```
    pub fn to_iso_string(&self) -> String {
        let millis = self.0.timestamp_subsec_millis();
        let frac = if millis == 0 {
            String::new()
        } else {
            format!(".{millis:03}")
        };
        format!(
            "{}T{:02}:{:02}:{:02}{}Z",
            self.date_prefix(),
            self.0.hour(),
            self.0.minute(),
            self.0.second(),
            frac
        )
    }

    /// The calendar part of [`to_iso_string`](Self::to_iso_string).
    pub fn date_prefix(&self) -> String {
        format!("{}-{:02}-{:02}", self.padded_year(), self.month(), self.day())
    }

    /// Parses an ISO calendar date (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`, with an
    /// optional `THH:MM[:SS[.fff]]` time and a UTC designator).  Years may be
    /// signed and longer than four digits.
    pub fn parse_iso(text: &str) -> GeoResult<Self> {
        let trimmed = text.trim();
        let caps = ISO_DATE
            .captures(trimmed)
            .ok_or_else(|| GeoError::format(trimmed))?;

        let field = |idx: usize, default: u32| -> GeoResult<u32> {
            caps.get(idx)
                .map_or(Ok(default), |m| m.as_str().parse().map_err(|_| GeoError::format(trimmed)))
        };

        let year: i64 = caps[1].parse().map_err(|_| GeoError::format(trimmed))?;
        let month = field(2, 1)?;
        let day = field(3, 1)?;
        let hour = field(4, 0)?;
        let minute = field(5, 0)?;
        let second = field(6, 0)?;
        let nanos = match caps.get(7) {
            Some(m) => {
                let digits = m.as_str();
                let scale = 10u32.pow(9 - digits.len() as u32);
                digits.parse::<u32>().map_err(|_| GeoError::format(trimmed))? * scale
            }
            None => 0,
        };

        let y = i32::try_from(year).map_err(|_| GeoError::Unrepresentable { year })?;
        let date = NaiveDate::from_ymd_opt(y, month, day).ok_or_else(|| GeoError::format(trimmed))?;
        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .ok_or_else(|| GeoError::format(trimmed))?;
        Ok(Self(Utc.from_utc_datetime(&date.and_time(time))))
    }
}

impl fmt::Display for VirtualDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl From<DateTime<Utc>> for VirtualDate {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

impl TimeInstant for VirtualDate {
    /// Engine milliseconds.
    type Duration = f64;

    #[inline]
    fn difference(&self, other: &Self) -> f64 {
        self.as_millis() - other.as_millis()
    }

    #[inline]
    fn checked_add(&self, millis: f64) -> Option<Self> {
        Self::from_millis(self.as_millis() + millis)
    }

    #[inline]
    fn checked_sub(&self, millis: f64) -> Option<Self> {
        Self::from_millis(self.as_millis() - millis)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for VirtualDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for VirtualDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse_iso(&raw).map_err(serde::de::Error::custom)
    }
}
