// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Axis tick labels.
//!
//! The engine calls the formatter once per tick, so [`AxisFormatter::label`]
//! never fails: anything unexpected degrades to the ISO date prefix.

use log::error;

use crate::catalog::{self, GeologicalPeriod};
use crate::codec::{format_display, TimeCodec};
use crate::error::{GeoError, GeoResult};
use crate::virtual_date::VirtualDate;

/// Granularity of an axis tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AxisScale {
    Millisecond,
    Second,
    Minute,
    Hour,
    Weekday,
    Day,
    Week,
    Month,
    Year,
}

impl AxisScale {
    /// Maps one of the engine's label format patterns to a scale.
    ///
    /// Unknown patterns that still mention a four-digit year are treated as
    /// yearly labels.
    pub fn from_format_pattern(pattern: &str) -> Option<Self> {
        let scale = match pattern {
            "YYYY" => AxisScale::Year,
            "MMMM YYYY" | "MMM" => AxisScale::Month,
            "ddd D MMMM" | "D" => AxisScale::Day,
            "D MMMM HH:mm" => AxisScale::Minute,
            "HH:mm" => AxisScale::Hour,
            "HH:mm:ss" => AxisScale::Second,
            "SSS" => AxisScale::Millisecond,
            "ddd D" => AxisScale::Weekday,
            "w" => AxisScale::Week,
            other if other.contains("YYYY") => AxisScale::Year,
            _ => return None,
        };
        Some(scale)
    }
}

/// Per-tick label producer, borrowing an immutable codec.
#[derive(Debug, Clone, Copy)]
pub struct AxisFormatter<'a> {
    codec: &'a TimeCodec,
}

impl<'a> AxisFormatter<'a> {
    pub fn new(codec: &'a TimeCodec) -> Self {
        Self { codec }
    }

    /// Label for the tick at `date`.
    ///
    /// ```
    /// use geochron::{AxisFormatter, AxisScale, Ma, TimeCodec, VirtualDate};
    ///
    /// let codec = TimeCodec::default();
    /// let axis = AxisFormatter::new(&codec);
    ///
    /// let deep = codec.ma_to_date(Ma::new(300.0)).unwrap();
    /// assert_eq!(axis.label(&deep, AxisScale::Year), "300 Ma");
    ///
    /// let modern = VirtualDate::from_ymd(1969, 7, 20).unwrap();
    /// assert_eq!(axis.label(&modern, AxisScale::Day), "1969-07-20");
    /// ```
    pub fn label(&self, date: &VirtualDate, scale: AxisScale) -> String {
        self.try_label(date, scale).unwrap_or_else(|err| {
            error!("axis label for {date} fell back to calendar date: {err}");
            date.date_prefix()
        })
    }

    fn try_label(&self, date: &VirtualDate, scale: AxisScale) -> GeoResult<String> {
        if !self.is_geological(date) {
            return Ok(calendar_label(date, scale));
        }
        let ma = self.codec.date_to_ma(date);
        if !ma.is_finite() {
            return Err(GeoError::NotFinite {
                operation: "axis label",
                value: ma.value(),
            });
        }
        Ok(format_display(ma))
    }

    /// Negative virtual years encode deep time.
    #[inline]
    pub fn is_geological(&self, date: &VirtualDate) -> bool {
        date.is_before_common_era()
    }

    /// Catalog context for a tick or an item date, if it encodes deep time.
    pub fn period_at(&self, date: &VirtualDate) -> Option<&'static GeologicalPeriod> {
        if !self.is_geological(date) {
            return None;
        }
        catalog::period_for_ma(self.codec.date_to_ma(date))
    }
}

fn calendar_label(date: &VirtualDate, scale: AxisScale) -> String {
    let year = date.year();
    match scale {
        AxisScale::Month => format!("{year}-{:02}", date.month()),
        AxisScale::Day | AxisScale::Week | AxisScale::Weekday => {
            format!("{year}-{:02}-{:02}", date.month(), date.day())
        }
        _ => year.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ma::Ma;

    fn modern() -> VirtualDate {
        VirtualDate::from_ymd(2024, 3, 5).unwrap()
    }

    #[test]
    fn calendar_precision_follows_scale() {
        let codec = TimeCodec::default();
        let axis = AxisFormatter::new(&codec);
        assert_eq!(axis.label(&modern(), AxisScale::Year), "2024");
        assert_eq!(axis.label(&modern(), AxisScale::Month), "2024-03");
        assert_eq!(axis.label(&modern(), AxisScale::Day), "2024-03-05");
        assert_eq!(axis.label(&modern(), AxisScale::Week), "2024-03-05");
        assert_eq!(axis.label(&modern(), AxisScale::Weekday), "2024-03-05");
        assert_eq!(axis.label(&modern(), AxisScale::Hour), "2024");
    }

    #[test]
    fn geological_labels_ignore_scale() {
        let codec = TimeCodec::default();
        let axis = AxisFormatter::new(&codec);
        let date = codec.ma_to_date(Ma::new(2_000.0)).unwrap();
        for scale in [AxisScale::Year, AxisScale::Month, AxisScale::Day] {
            assert_eq!(axis.label(&date, scale), "2.00 Ga");
        }
    }

    #[test]
    fn recent_geological_values_stay_calendar() {
        // 50 Ma is year 1000 with the default codec: not negative, so calendar.
        let codec = TimeCodec::default();
        let axis = AxisFormatter::new(&codec);
        let date = codec.ma_to_date(Ma::new(50.0)).unwrap();
        assert!(!axis.is_geological(&date));
        assert_eq!(axis.label(&date, AxisScale::Year), "1000");
    }

    #[test]
    fn format_patterns() {
        assert_eq!(AxisScale::from_format_pattern("YYYY"), Some(AxisScale::Year));
        assert_eq!(
            AxisScale::from_format_pattern("MMMM YYYY"),
            Some(AxisScale::Month)
        );
        assert_eq!(AxisScale::from_format_pattern("w"), Some(AxisScale::Week));
        assert_eq!(
            AxisScale::from_format_pattern("Q YYYY"),
            Some(AxisScale::Year)
        );
        assert_eq!(AxisScale::from_format_pattern("s"), None);
    }

    #[test]
    fn period_context_for_deep_dates() {
        let codec = TimeCodec::default();
        let axis = AxisFormatter::new(&codec);
        let jurassic = codec.ma_to_date(Ma::new(150.0)).unwrap();
        assert_eq!(axis.period_at(&jurassic).unwrap().name, "Jurassic");
        assert!(axis.period_at(&modern()).is_none());
    }
}
