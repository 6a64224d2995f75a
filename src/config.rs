// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Settings and domain constants.

use qtty::Years;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Age of the Earth in Ma; upper bound accepted by [`validate`](crate::validate).
pub const EARTH_AGE_MA: f64 = 4600.0;

/// Calendar year that represents 0 Ma.
pub const PRESENT_YEAR: i32 = 2000;

/// Virtual calendar years used to represent one Ma.
pub const VIRTUAL_YEARS_PER_MA: Years = Years::new(20.0);

/// Finest zoom step, in Ma (two decimal places).
pub const FINEST_ZOOM_MA: f64 = 0.01;

/// Parameters of the Ma ⇄ virtual-date mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodecConfig {
    pub present_year: i32,
    /// Compression factor `k`.
    pub virtual_years_per_ma: f64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            present_year: PRESENT_YEAR,
            virtual_years_per_ma: VIRTUAL_YEARS_PER_MA.value(),
        }
    }
}

/// Horizontal alignment of item content inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Host-provided timeline settings.
///
/// Passed by reference into the parser and the timeline; nothing here is
/// global or mutated after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimelineSettings {
    pub locale: String,
    pub use_utc: bool,
    pub align: Align,
    pub codec: CodecConfig,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            locale: "en".to_owned(),
            use_utc: true,
            align: Align::default(),
            codec: CodecConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_mapping() {
        let cfg = CodecConfig::default();
        assert_eq!(cfg.present_year, 2000);
        assert_eq!(cfg.virtual_years_per_ma, 20.0);
        assert_eq!(TimelineSettings::default().align, Align::Center);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: TimelineSettings = serde_json::from_str(r#"{"locale":"fr"}"#).unwrap();
        assert_eq!(settings.locale, "fr");
        assert_eq!(settings.codec, CodecConfig::default());
    }
}
