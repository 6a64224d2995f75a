// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geological time on a calendar-native timeline.
//!
//! Timeline engines only understand calendar dates. This crate encodes ages
//! in millions of years before present ([`Ma`]) as compressed
//! [`VirtualDate`]s, formats axis ticks back into geological labels, projects
//! the ICS chronostratigraphic chart onto background lanes, and keeps grouped
//! timelines laid out correctly after their first paint.
//!
//! # Core types
//!
//! - [`Ma`]: an age in millions of years before present.
//! - [`VirtualDate`]: the calendar instant handed to the engine.
//! - [`TimeCodec`]: the `Ma ⇄ VirtualDate` codec (`k` virtual years per Ma).
//! - [`Interval<T>`] / [`ViewWindow`]: time ranges and the visible window.
//! - [`GeologicalPeriod`] / [`Rank`]: the static period catalog.
//! - [`AxisFormatter`]: per-tick axis labels.
//! - [`Timeline`]: parse, mount, stabilize, dispatch.
//!
//! # Encoding
//!
//! | Ma | Virtual year (`k = 20`) | Label |
//! |----|-------------------------|-------|
//! | 0 | 2000 | `Present` |
//! | 66 | 680 | `66.0 Ma` |
//! | 252 | −3040 | `252 Ma` |
//! | 4600 | −90000 | `4.60 Ga` |
//!
//! ```
//! use geochron::{format_display, Ma, TimeCodec};
//!
//! let codec = TimeCodec::default();
//! let date = codec.ma_to_date(Ma::new(252.0)).unwrap();
//! assert_eq!(date.year(), -3040);
//! assert_eq!(format_display(codec.date_to_ma(&date)), "252 Ma");
//! ```

mod axis;
mod catalog;
mod codec;
mod config;
mod engine;
mod error;
mod interval;
mod layout;
mod ma;
mod model;
mod overlay;
mod scheduler;
mod timeline;
mod virtual_date;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use axis::{AxisFormatter, AxisScale};
pub use catalog::{
    by_rank, children_of, find_at, lookup_by_name, period_for_ma, GeologicalPeriod, Rank,
    UnknownRank, GEOLOGICAL_TIME_SCALE,
};
pub use codec::{
    format_display, format_range, is_geological_literal, parse_geological_literal, validate,
    TimeCodec,
};
pub use config::{
    Align, CodecConfig, TimelineSettings, EARTH_AGE_MA, FINEST_ZOOM_MA, PRESENT_YEAR,
    VIRTUAL_YEARS_PER_MA,
};
pub use engine::{EngineEvent, EngineOptions, EngineResult, EventKind, RenderEngine};
pub use error::{EngineError, GeoError, GeoResult, ParseError, AGGREGATE_SEPARATOR};
pub use interval::{Interval, ViewWindow};
pub use layout::{compute_content_bounds, Diagnostic, LayoutController, LayoutPhase, LayoutStep};
pub use ma::Ma;
pub use model::{
    Flags, Group, ItemKind, Marker, OrderBy, OrderField, OrderKey, ParseOutput, SourceParser,
    TimelineItem, OVERLAY_CLASS,
};
pub use overlay::{
    build_overlay_lanes, slugify, OverlayLanes, OverlayStyle, Rgba, OVERLAY_ALPHA,
    OVERLAY_GROUP_CLASS,
};
pub use scheduler::{Scheduler, FRAME_MILLIS};
pub use timeline::{
    assign_default_lane, tooltip_text, ErrorPanel, RenderReport, RenderSummary, Timeline,
    TimelineEvent, DEFAULT_GROUP_ID,
};
pub use virtual_date::{TimeInstant, VirtualDate};
