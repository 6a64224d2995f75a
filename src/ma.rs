// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Millions of years before present.
//!
//! [`Ma`] is the domain's primary time unit for deep time.  Larger values
//! are *older*: ordering on `Ma` runs against the calendar.  The struct is
//! `Copy` and layout-identical to an `f64`.

use std::fmt;
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in deep time, in millions of years before present.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Ma(f64);

impl Ma {
    /// The present (0 Ma).
    pub const PRESENT: Self = Self(0.0);

    // ── constructors ──────────────────────────────────────────────────

    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Build from thousands of years (Ka).
    #[inline]
    pub fn from_ka(ka: f64) -> Self {
        Self(ka / 1_000.0)
    }

    /// Build from billions of years (Ga).
    #[inline]
    pub fn from_ga(ga: f64) -> Self {
        Self(ga * 1_000.0)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// The same instant expressed in years before present.
    #[inline]
    pub fn years(&self) -> f64 {
        self.0 * 1_000_000.0
    }

    // ── min / max ─────────────────────────────────────────────────────

    /// The younger of two instants.
    #[inline]
    pub fn younger(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// The older of two instants.
    #[inline]
    pub fn older(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

// ── Display ───────────────────────────────────────────────────────────────

/// Renders through [`format_display`](crate::format_display).
impl fmt::Display for Ma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::format_display(*self))
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Ma {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Ma {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add for Ma {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Ma {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl From<f64> for Ma {
    #[inline]
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Ma> for f64 {
    #[inline]
    fn from(ma: Ma) -> Self {
        ma.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_helpers() {
        assert_eq!(Ma::from_ka(500.0), Ma::new(0.5));
        assert_eq!(Ma::from_ga(2.0), Ma::new(2000.0));
        assert_eq!(Ma::new(0.0042).years(), 4200.0);
    }

    #[test]
    fn older_is_larger() {
        let k_pg = Ma::new(66.0);
        let p_t = Ma::new(251.902);
        assert!(p_t > k_pg);
        assert_eq!(k_pg.older(p_t), p_t);
        assert_eq!(k_pg.younger(p_t), k_pg);
    }

    #[test]
    fn display_uses_magnitude_buckets() {
        assert_eq!(Ma::PRESENT.to_string(), "Present");
        assert_eq!(Ma::new(66.0).to_string(), "66.0 Ma");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Ma::new(10.0) - Ma::new(4.0), Ma::new(6.0));
        assert_eq!(Ma::new(1.5) + Ma::new(1.5), Ma::new(3.0));
        let raw: f64 = Ma::new(2.5).into();
        assert_eq!(raw, 2.5);
    }
}
