// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The rendering-engine seam.
//!
//! The engine only understands calendar dates; everything geological has
//! already been encoded into [`VirtualDate`]s by the time it gets here.

use std::fmt;
use std::str::FromStr;

use crate::codec::TimeCodec;
use crate::config::{Align, TimelineSettings};
use crate::error::{EngineError, GeoResult};
use crate::interval::ViewWindow;
use crate::model::{Group, OrderBy, TimelineItem};
use crate::virtual_date::VirtualDate;

pub type EngineResult<T> = Result<T, EngineError>;

/// Options handed to the engine when a timeline is mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Initial window.
    pub start: Option<VirtualDate>,
    pub end: Option<VirtualDate>,
    /// Pan limits.
    pub min: Option<VirtualDate>,
    pub max: Option<VirtualDate>,
    /// Narrowest and widest visible span, in milliseconds.
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub show_current_time: bool,
    pub height: Option<String>,
    pub vertical_scroll: bool,
    pub stack: bool,
    pub order: Option<OrderBy>,
    pub min_height: String,
    pub zoomable: bool,
    pub selectable: bool,
    pub align: Align,
}

impl EngineOptions {
    /// Baseline options for a codec; no pan limits until
    /// [`with_domain`](Self::with_domain) is applied.
    pub fn new(codec: &TimeCodec, settings: &TimelineSettings) -> Self {
        let (zoom_min, zoom_max) = codec.zoom_bounds_millis();
        Self {
            start: None,
            end: None,
            min: None,
            max: None,
            zoom_min,
            zoom_max,
            show_current_time: true,
            height: None,
            vertical_scroll: false,
            stack: true,
            order: None,
            min_height: "200px".to_owned(),
            zoomable: true,
            selectable: true,
            align: settings.align,
        }
    }

    /// Restricts panning to the encoded geological domain.
    pub fn with_domain(mut self, codec: &TimeCodec) -> GeoResult<Self> {
        let domain = codec.domain()?;
        self.min = Some(domain.start);
        self.max = Some(domain.end);
        Ok(self)
    }

    pub fn set_window(&mut self, window: &ViewWindow) {
        self.start = Some(window.start);
        self.end = Some(window.end);
    }

    /// Fixed pixel height, which also turns on vertical scrolling.
    pub fn set_height(&mut self, pixels: u32) {
        self.height = Some(format!("{pixels}px"));
        self.vertical_scroll = true;
    }
}

/// A calendar-date timeline renderer.
///
/// Adapters are free to fail any call; the layout controller decides which
/// failures matter.
pub trait RenderEngine {
    /// Replaces whatever is displayed with a fresh timeline.
    fn mount(
        &mut self,
        items: &[TimelineItem],
        groups: &[Group],
        options: &EngineOptions,
    ) -> EngineResult<()>;

    fn set_groups(&mut self, groups: &[Group]) -> EngineResult<()>;

    fn set_stack(&mut self, stack: bool) -> EngineResult<()>;

    fn window(&self) -> EngineResult<ViewWindow>;

    fn set_window(&mut self, window: &ViewWindow, animate: bool) -> EngineResult<()>;

    fn redraw(&mut self) -> EngineResult<()>;

    /// Engine-chosen window covering everything.
    fn fit(&mut self) -> EngineResult<()>;

    fn add_custom_time(&mut self, at: VirtualDate, id: &str) -> EngineResult<()>;

    fn set_custom_time_marker(&mut self, id: &str, label: &str) -> EngineResult<()>;

    /// Hover text of a custom time marker.
    fn set_custom_time_title(&mut self, id: &str, title: &str) -> EngineResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════

/// Engine event kinds a host can subscribe to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    ItemOver,
    ItemOut,
    Click,
    DoubleClick,
    Select,
    RangeChanged,
}

impl EventKind {
    /// Wire name used by the engine.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventKind::ItemOver => "itemover",
            EventKind::ItemOut => "itemout",
            EventKind::Click => "click",
            EventKind::DoubleClick => "doubleClick",
            EventKind::Select => "select",
            EventKind::RangeChanged => "rangechanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "itemover" => Ok(EventKind::ItemOver),
            "itemout" => Ok(EventKind::ItemOut),
            "click" => Ok(EventKind::Click),
            "doubleClick" => Ok(EventKind::DoubleClick),
            "select" => Ok(EventKind::Select),
            "rangechanged" => Ok(EventKind::RangeChanged),
            other => Err(EngineError(format!("unknown event kind `{other}`"))),
        }
    }
}

/// Raw event as reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub kind: EventKind,
    /// Id of the item under the pointer, if any.
    pub item: Option<String>,
    /// Time under the pointer, if any.
    pub time: Option<VirtualDate>,
}

impl EngineEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            item: None,
            time: None,
        }
    }

    pub fn on_item(kind: EventKind, item: impl Into<String>) -> Self {
        Self {
            kind,
            item: Some(item.into()),
            time: None,
        }
    }
}
