// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time interval implementation.
//!
//! This module provides:
//! - [`Interval<T>`]: generic interval over any [`TimeInstant`]
//! - [`ViewWindow`]: the visible range of the timeline, `Interval<VirtualDate>`

use crate::virtual_date::{TimeInstant, VirtualDate};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents an interval between two instants.
///
/// # Examples
///
/// ```
/// use geochron::{Interval, VirtualDate};
///
/// let start = VirtualDate::from_millis(10.0).unwrap();
/// let end = VirtualDate::from_millis(90.0).unwrap();
/// let window = Interval::new(start, end);
///
/// assert_eq!(window.duration(), 80.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// The visible time range of the timeline.
pub type ViewWindow = Interval<VirtualDate>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns the duration of the interval as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Moves both endpoints by `delta`.
    pub fn shifted(&self, delta: T::Duration) -> Option<Self> {
        Some(Self::new(
            self.start.checked_add(delta)?,
            self.end.checked_add(delta)?,
        ))
    }

    /// Subtracts `before` from the start and adds `after` to the end.
    pub fn padded(&self, before: T::Duration, after: T::Duration) -> Option<Self> {
        Some(Self::new(
            self.start.checked_sub(before)?,
            self.end.checked_add(after)?,
        ))
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// Engine windows are measured in milliseconds.
impl Interval<VirtualDate> {
    /// Builds a window from engine milliseconds.
    pub fn from_millis(start: f64, end: f64) -> Option<Self> {
        Some(Self::new(
            VirtualDate::from_millis(start)?,
            VirtualDate::from_millis(end)?,
        ))
    }

    /// Span in milliseconds.
    pub fn span_millis(&self) -> f64 {
        self.duration()
    }

    /// Zooms out symmetrically: the span grows by `factor - 1`, split evenly
    /// between both sides.
    pub fn zoomed_out(&self, factor: f64) -> Option<Self> {
        let half = self.span_millis() * (factor - 1.0) / 2.0;
        self.padded(half, half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64, end: f64) -> ViewWindow {
        ViewWindow::from_millis(start, end).unwrap()
    }

    #[test]
    fn test_interval_creation() {
        let w = window(0.0, 1_000.0);
        assert_eq!(w.start.as_millis(), 0.0);
        assert_eq!(w.end.as_millis(), 1_000.0);
        assert_eq!(w.span_millis(), 1_000.0);
    }

    #[test]
    fn test_zoom_out_two_percent() {
        let w = window(1_000.0, 2_000.0).zoomed_out(1.02).unwrap();
        assert!((w.start.as_millis() - 990.0).abs() < 1e-6);
        assert!((w.end.as_millis() - 2_010.0).abs() < 1e-6);
    }

    #[test]
    fn test_shift_keeps_span() {
        let w = window(100.0, 200.0).shifted(2.0).unwrap();
        assert_eq!(w, window(102.0, 202.0));
    }

    #[test]
    fn test_interval_display() {
        let display = format!("{}", window(0.0, 86_400_000.0));
        assert_eq!(display, "1970-01-01T00:00:00Z to 1970-01-02T00:00:00Z");
    }
}
