// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Ma ⇄ virtual-date codec
//!
//! The rendering engine only understands calendar dates, so deep time is
//! folded onto the calendar:
//!
//! ```text
//! year = present_year − round(ma × k)
//! ```
//!
//! where `k` is the compression factor ([`VIRTUAL_YEARS_PER_MA`], 20 by
//! default).  0 Ma is `2000-01-01`; 4600 Ma is year −90 000, comfortably
//! inside the calendar backend's range.
//!
//! Rounding to whole virtual years makes the mapping lossy below `1/k` Ma:
//! values that are exact multiples of `1/k` round-trip exactly, anything else
//! comes back within `0.5/k` Ma.
//!
//! ## Quick Example
//! ```rust
//! use geochron::{Ma, TimeCodec};
//!
//! let codec = TimeCodec::default();
//! let date = codec.ma_to_date(Ma::new(66.0)).unwrap();
//! assert_eq!(date.year(), 2000 - 1320);
//! assert_eq!(codec.date_to_ma(&date), Ma::new(66.0));
//! ```

use once_cell::sync::Lazy;
use qtty::{Days, Second, Years};
use regex::Regex;

use crate::config::{CodecConfig, EARTH_AGE_MA, FINEST_ZOOM_MA, PRESENT_YEAR, VIRTUAL_YEARS_PER_MA};
use crate::error::{GeoError, GeoResult};
use crate::interval::ViewWindow;
use crate::ma::Ma;
use crate::virtual_date::VirtualDate;

/// Mean Gregorian year, used to size zoom bounds in engine milliseconds.
const GREGORIAN_YEAR: Days = Days::new(365.2425);

static GEOLOGICAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(-?\d+(?:\.\d+)?)\s*Ma\s*$").expect("static geological literal pattern")
});

static LEADING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)-").expect("static leading year pattern"));

// ═══════════════════════════════════════════════════════════════════════════
// TimeCodec
// ═══════════════════════════════════════════════════════════════════════════

/// Immutable Ma ⇄ virtual-date mapping.
///
/// Built once from a [`CodecConfig`] and passed by reference to every
/// consumer; there is no process-wide codec state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeCodec {
    present_year: i64,
    virtual_years_per_ma: Years,
}

impl Default for TimeCodec {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TimeCodec {
    /// 0 Ma at year 2000, 20 virtual years per Ma.
    pub const STANDARD: Self = Self {
        present_year: PRESENT_YEAR as i64,
        virtual_years_per_ma: VIRTUAL_YEARS_PER_MA,
    };

    /// Builds a codec from configuration.
    ///
    /// Fails with [`GeoError::InvalidCompression`] unless the compression
    /// factor is positive and finite, and with
    /// [`GeoError::CompressionOutOfRange`] when the whole `[0, 4600]` Ma
    /// domain does not fit in the calendar backend.
    pub fn new(config: &CodecConfig) -> GeoResult<Self> {
        let factor = config.virtual_years_per_ma;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GeoError::InvalidCompression { factor });
        }
        let codec = Self {
            present_year: i64::from(config.present_year),
            virtual_years_per_ma: Years::new(factor),
        };
        for edge in [Ma::new(EARTH_AGE_MA), Ma::PRESENT] {
            if let Err(GeoError::Unrepresentable { year }) = codec.ma_to_date(edge) {
                return Err(GeoError::CompressionOutOfRange { factor, year });
            }
        }
        Ok(codec)
    }

    #[inline]
    pub fn present_year(&self) -> i64 {
        self.present_year
    }

    /// Compression factor `k`.
    #[inline]
    pub fn virtual_years_per_ma(&self) -> Years {
        self.virtual_years_per_ma
    }

    /// Smallest Ma step that survives encoding (`1/k`).
    #[inline]
    pub fn resolution(&self) -> Ma {
        Ma::new(1.0 / self.k())
    }

    #[inline]
    fn k(&self) -> f64 {
        self.virtual_years_per_ma.value()
    }

    // ── encoding ──────────────────────────────────────────────────────

    /// Virtual calendar year encoding `ma`.
    pub fn ma_to_year(&self, ma: Ma) -> GeoResult<i64> {
        if !ma.is_finite() {
            return Err(GeoError::NotFinite {
                operation: "ma_to_date",
                value: ma.value(),
            });
        }
        let years_ago = (ma.value() * self.k()).round();
        if years_ago.abs() >= i64::MAX as f64 {
            return Err(GeoError::Unrepresentable { year: i64::MIN });
        }
        self.present_year
            .checked_sub(years_ago as i64)
            .ok_or(GeoError::Unrepresentable { year: i64::MIN })
    }

    /// Maps `ma` to the first instant of its virtual year.
    pub fn ma_to_date(&self, ma: Ma) -> GeoResult<VirtualDate> {
        VirtualDate::from_year(self.ma_to_year(ma)?)
    }

    /// ISO-8601 string of [`ma_to_date`](Self::ma_to_date), with the year
    /// padded so it round-trips unambiguously.
    ///
    /// ```
    /// use geochron::{Ma, TimeCodec};
    ///
    /// let codec = TimeCodec::default();
    /// assert_eq!(codec.ma_to_iso(Ma::new(4600.0)).unwrap(), "-090000-01-01T00:00:00Z");
    /// assert_eq!(codec.ma_to_iso(Ma::PRESENT).unwrap(), "2000-01-01T00:00:00Z");
    /// ```
    pub fn ma_to_iso(&self, ma: Ma) -> GeoResult<String> {
        Ok(self.ma_to_date(ma)?.to_iso_string())
    }

    // ── decoding ──────────────────────────────────────────────────────

    /// Inverse of [`ma_to_year`](Self::ma_to_year).
    #[inline]
    pub fn year_to_ma(&self, year: i64) -> Ma {
        Ma::new((self.present_year - year) as f64 / self.k())
    }

    /// Decodes the virtual year of `date` back into Ma.
    #[inline]
    pub fn date_to_ma(&self, date: &VirtualDate) -> Ma {
        self.year_to_ma(i64::from(date.year()))
    }

    /// Decodes the leading signed year of an ISO date string.
    pub fn iso_to_ma(&self, text: &str) -> GeoResult<Ma> {
        let caps = LEADING_YEAR
            .captures(text)
            .ok_or_else(|| GeoError::format(text))?;
        let year: i64 = caps[1].parse().map_err(|_| GeoError::format(text))?;
        Ok(self.year_to_ma(year))
    }

    // ── literals ──────────────────────────────────────────────────────

    /// Resolves a date literal that is either geological (`"252Ma"`) or an
    /// ISO calendar date.  Geological literals are validated before encoding.
    pub fn parse_date_literal(&self, text: &str) -> GeoResult<VirtualDate> {
        if is_geological_literal(text) {
            let ma = parse_geological_literal(text)?;
            validate(ma)?;
            return self.ma_to_date(ma);
        }
        VirtualDate::parse_iso(text)
    }

    // ── engine bounds ─────────────────────────────────────────────────

    /// The whole representable domain, from the formation of the Earth to
    /// the present.
    pub fn domain(&self) -> GeoResult<ViewWindow> {
        Ok(ViewWindow::new(
            self.ma_to_date(Ma::new(EARTH_AGE_MA))?,
            self.ma_to_date(Ma::PRESENT)?,
        ))
    }

    /// Engine zoom limits in milliseconds: the finest step shows
    /// [`FINEST_ZOOM_MA`], the coarsest the whole domain.
    pub fn zoom_bounds_millis(&self) -> (f64, f64) {
        let millis = |ma: f64| {
            let days = Days::new(GREGORIAN_YEAR.value() * ma * self.k());
            days.to::<Second>().value() * 1_000.0
        };
        (millis(FINEST_ZOOM_MA), millis(EARTH_AGE_MA))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Display
// ═══════════════════════════════════════════════════════════════════════════

/// Magnitude-bucketed label for a Ma value.
///
/// | Range | Example |
/// |-------|---------|
/// | exactly 0 | `Present` |
/// | < 0.001 | `500 years ago` |
/// | < 1 | `500.0 Ka` |
/// | < 10 | `5.00 Ma` |
/// | < 100 | `50.0 Ma` |
/// | < 1000 | `500 Ma` |
/// | otherwise | `2.00 Ga` |
pub fn format_display(ma: Ma) -> String {
    let v = ma.value();
    if v == 0.0 {
        "Present".to_owned()
    } else if v < 0.001 {
        format!("{} years ago", ma.years().round() as i64)
    } else if v < 1.0 {
        format!("{:.1} Ka", v * 1_000.0)
    } else if v < 10.0 {
        format!("{v:.2} Ma")
    } else if v < 100.0 {
        format!("{v:.1} Ma")
    } else if v < 1_000.0 {
        format!("{} Ma", v.round() as i64)
    } else {
        format!("{:.2} Ga", v / 1_000.0)
    }
}

/// `"{start} - {end}"`, or a single label when both ends coincide.
pub fn format_range(start: Ma, end: Ma) -> String {
    if start == end {
        format_display(start)
    } else {
        format!("{} - {}", format_display(start), format_display(end))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Parsing & validation
// ═══════════════════════════════════════════════════════════════════════════

/// Whether `text` looks like `[-]digits[.digits]Ma`.
pub fn is_geological_literal(text: &str) -> bool {
    GEOLOGICAL_LITERAL.is_match(text)
}

/// Parses `[-]digits[.digits]Ma` (case-insensitive, surrounding whitespace
/// allowed).
///
/// ```
/// use geochron::{parse_geological_literal, Ma};
///
/// assert_eq!(parse_geological_literal("66.0Ma").unwrap(), Ma::new(66.0));
/// assert!(parse_geological_literal("66").is_err());
/// ```
pub fn parse_geological_literal(text: &str) -> GeoResult<Ma> {
    let caps = GEOLOGICAL_LITERAL
        .captures(text)
        .ok_or_else(|| GeoError::format(text.trim()))?;
    caps[1]
        .parse::<f64>()
        .map(Ma::new)
        .map_err(|_| GeoError::format(text.trim()))
}

/// Domain guard: rejects negative values and anything older than the Earth.
pub fn validate(ma: Ma) -> GeoResult<()> {
    let v = ma.value();
    if !(0.0..=EARTH_AGE_MA).contains(&v) {
        return Err(GeoError::Range {
            value: v,
            max: EARTH_AGE_MA,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_maps_to_reference_year() {
        let codec = TimeCodec::default();
        let date = codec.ma_to_date(Ma::PRESENT).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2000, 1, 1));
    }

    #[test]
    fn exact_multiples_roundtrip_exactly() {
        let codec = TimeCodec::default();
        let k = codec.virtual_years_per_ma().value();
        for n in [0_i64, 1, 7, 19, 20, 1_320, 5_038, 45_678, 92_000] {
            let ma = Ma::new(n as f64 / k);
            let back = codec.date_to_ma(&codec.ma_to_date(ma).unwrap());
            assert_eq!(back, ma, "n = {n}");
        }
    }

    #[test]
    fn arbitrary_values_stay_within_half_step() {
        let codec = TimeCodec::default();
        let half_step = 0.5 / codec.virtual_years_per_ma().value();
        for v in [0.0117, 2.58, 66.04, 251.902, 538.8, 4_599.97] {
            let back = codec.date_to_ma(&codec.ma_to_date(Ma::new(v)).unwrap());
            assert!((back.value() - v).abs() < half_step, "{v} -> {back:?}");
        }
    }

    #[test]
    fn older_means_earlier() {
        let codec = TimeCodec::default();
        let mut previous = codec.ma_to_year(Ma::PRESENT).unwrap();
        for v in [0.05, 1.0, 66.0, 541.0, 2_500.0, 4_600.0] {
            let year = codec.ma_to_year(Ma::new(v)).unwrap();
            assert!(year < previous);
            previous = year;
        }
    }

    #[test]
    fn non_finite_input_fails() {
        let codec = TimeCodec::default();
        assert!(matches!(
            codec.ma_to_date(Ma::new(f64::NAN)),
            Err(GeoError::NotFinite { .. })
        ));
        assert!(matches!(
            codec.ma_to_date(Ma::new(f64::INFINITY)),
            Err(GeoError::NotFinite { .. })
        ));
    }

    #[test]
    fn oversized_compression_is_rejected_up_front() {
        for factor in [100.0, 1_000_000.0] {
            let cfg = CodecConfig {
                present_year: 2000,
                virtual_years_per_ma: factor,
            };
            assert!(matches!(
                TimeCodec::new(&cfg),
                Err(GeoError::CompressionOutOfRange { .. })
            ));
        }
        // 56 virtual years per Ma still puts 4600 Ma inside the calendar.
        let codec = TimeCodec::new(&CodecConfig {
            present_year: 2000,
            virtual_years_per_ma: 56.0,
        })
        .unwrap();
        assert_eq!(codec.ma_to_year(Ma::new(4_600.0)).unwrap(), 2000 - 257_600);
        assert!(codec.domain().is_ok());
    }

    #[test]
    fn present_year_outside_the_calendar_is_rejected() {
        let cfg = CodecConfig {
            present_year: 300_000,
            virtual_years_per_ma: 20.0,
        };
        assert_eq!(
            TimeCodec::new(&cfg),
            Err(GeoError::CompressionOutOfRange {
                factor: 20.0,
                year: 300_000,
            })
        );
    }

    #[test]
    fn invalid_compression_rejected() {
        for factor in [0.0, -3.0, f64::NAN] {
            let cfg = CodecConfig {
                present_year: 2000,
                virtual_years_per_ma: factor,
            };
            assert!(matches!(
                TimeCodec::new(&cfg),
                Err(GeoError::InvalidCompression { .. })
            ));
        }
    }

    #[test]
    fn iso_decoding() {
        let codec = TimeCodec::default();
        assert_eq!(
            codec.iso_to_ma("-090000-01-01T00:00:00Z").unwrap(),
            Ma::new(4_600.0)
        );
        assert_eq!(codec.iso_to_ma("2000-01-01").unwrap(), Ma::PRESENT);
        assert!(codec.iso_to_ma("not a date").is_err());
    }

    #[test]
    fn display_thresholds() {
        assert_eq!(format_display(Ma::new(0.0)), "Present");
        assert_eq!(format_display(Ma::new(0.0005)), "500 years ago");
        assert_eq!(format_display(Ma::new(0.5)), "500.0 Ka");
        assert_eq!(format_display(Ma::new(5.0)), "5.00 Ma");
        assert_eq!(format_display(Ma::new(50.0)), "50.0 Ma");
        assert_eq!(format_display(Ma::new(500.0)), "500 Ma");
        assert_eq!(format_display(Ma::new(2_000.0)), "2.00 Ga");
    }

    #[test]
    fn display_bucket_edges() {
        assert_eq!(format_display(Ma::new(0.001)), "1.0 Ka");
        assert_eq!(format_display(Ma::new(1.0)), "1.00 Ma");
        assert_eq!(format_display(Ma::new(10.0)), "10.0 Ma");
        assert_eq!(format_display(Ma::new(100.0)), "100 Ma");
        assert_eq!(format_display(Ma::new(1_000.0)), "1.00 Ga");
    }

    #[test]
    fn range_formatting() {
        assert_eq!(format_range(Ma::new(66.0), Ma::new(66.0)), "66.0 Ma");
        assert_eq!(
            format_range(Ma::new(251.902), Ma::new(66.0)),
            "252 Ma - 66.0 Ma"
        );
    }

    #[test]
    fn literal_parsing() {
        assert_eq!(parse_geological_literal("66.0Ma").unwrap(), Ma::new(66.0));
        assert_eq!(parse_geological_literal("  252 ma ").unwrap(), Ma::new(252.0));
        assert_eq!(parse_geological_literal("-5MA").unwrap(), Ma::new(-5.0));
        for bad in ["66", "Ma", "66.Ma", "sixty Ma", "66.0 Ga"] {
            assert!(
                matches!(parse_geological_literal(bad), Err(GeoError::Format { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn validation_bounds() {
        assert!(validate(Ma::new(0.0)).is_ok());
        assert!(validate(Ma::new(4_600.0)).is_ok());
        assert!(matches!(
            validate(Ma::new(5_000.0)),
            Err(GeoError::Range { .. })
        ));
        assert!(matches!(validate(Ma::new(-1.0)), Err(GeoError::Range { .. })));
    }

    #[test]
    fn date_literals() {
        let codec = TimeCodec::default();
        assert_eq!(
            codec.parse_date_literal("66Ma").unwrap(),
            codec.ma_to_date(Ma::new(66.0)).unwrap()
        );
        assert_eq!(codec.parse_date_literal("1969-07-20").unwrap().year(), 1969);
        assert!(matches!(
            codec.parse_date_literal("5000Ma"),
            Err(GeoError::Range { .. })
        ));
    }

    #[test]
    fn domain_and_zoom_bounds() {
        let codec = TimeCodec::default();
        let domain = codec.domain().unwrap();
        assert_eq!(domain.start.year(), -90_000);
        assert_eq!(domain.end.year(), 2_000);

        let (finest, coarsest) = codec.zoom_bounds_millis();
        assert!(finest < coarsest);
        // The coarsest zoom must fit the whole domain.
        assert!(coarsest >= domain.span_millis() * 0.99);
    }
}
