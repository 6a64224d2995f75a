// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! | Type | Raised by | Surfaced to the user? |
//! |------|-----------|-----------------------|
//! | [`GeoError`] | codec, catalog, overlay builder | through the parser, or as [`RenderReport::EncodingFailed`](crate::RenderReport::EncodingFailed) |
//! | [`ParseError`] | the external [`SourceParser`](crate::SourceParser) | yes, as an [`ErrorPanel`](crate::ErrorPanel) |
//! | [`EngineError`] | a [`RenderEngine`](crate::RenderEngine) adapter | never, logged and recorded |

use thiserror::Error;

/// Separator between independent messages of an aggregated parse failure.
pub const AGGREGATE_SEPARATOR: &str = ";;";

/// Failures of the geological time primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Malformed geological literal (missing `Ma` suffix, non-numeric magnitude, ...).
    #[error("Invalid geological date format: {input}. Expected format like \"252Ma\" or \"66.0Ma\"")]
    Format { input: String },

    /// Ma value outside `[0, 4600]`.
    #[error("Geological date {value} Ma is outside the supported range [0, {max}] Ma")]
    Range { value: f64, max: f64 },

    /// NaN or infinite input handed to the codec.
    #[error("{operation}: value is not finite ({value})")]
    NotFinite { operation: &'static str, value: f64 },

    /// The encoded virtual year falls outside the calendar backend's range.
    #[error("virtual year {year} cannot be represented as a calendar date")]
    Unrepresentable { year: i64 },

    /// Compression factor that is not a positive finite number.
    #[error("virtual years per Ma must be positive and finite, got {factor}")]
    InvalidCompression { factor: f64 },

    /// Compression factor that pushes part of the `[0, 4600]` Ma domain out of
    /// the calendar backend's range.
    #[error("{factor} virtual years per Ma puts the domain at year {year}, outside the calendar range")]
    CompressionOutOfRange { factor: f64, year: i64 },
}

impl GeoError {
    pub(crate) fn format(input: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
        }
    }
}

/// Convenience alias used across the crate.
pub type GeoResult<T> = Result<T, GeoError>;

/// Aggregated failure reported by the source parser.
///
/// The parser may find several independent problems in one document; they
/// travel as a single message joined by [`AGGREGATE_SEPARATOR`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .messages.join(AGGREGATE_SEPARATOR))]
pub struct ParseError {
    messages: Vec<String>,
}

impl ParseError {
    /// Builds an error from individual messages.
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a joined aggregate message back into its parts. Each part is
    /// kept verbatim, surrounding whitespace included.
    ///
    /// ```
    /// use geochron::ParseError;
    ///
    /// let err = ParseError::from_joined("bad date;; unknown flag");
    /// assert_eq!(err.messages(), ["bad date", " unknown flag"]);
    /// ```
    pub fn from_joined(message: &str) -> Self {
        Self::new(message.split(AGGREGATE_SEPARATOR))
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl From<GeoError> for ParseError {
    fn from(err: GeoError) -> Self {
        Self::new([err.to_string()])
    }
}

/// Failure reported by a rendering-engine adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("render engine: {0}")]
pub struct EngineError(pub String);
