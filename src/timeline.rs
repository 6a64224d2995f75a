// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The host-facing timeline.
//!
//! [`Timeline::render`] parses a document, encodes it for the engine, mounts
//! it and queues the stabilization steps. The host then feeds engine events
//! through [`Timeline::dispatch`] and the passage of time through
//! [`Timeline::advance`].

use std::collections::HashMap;
use std::fmt;

use log::{debug, info, warn};

use crate::axis::{AxisFormatter, AxisScale};
use crate::codec::{format_range, TimeCodec};
use crate::config::TimelineSettings;
use crate::engine::{EngineEvent, EngineOptions, EventKind, RenderEngine};
use crate::error::{EngineError, GeoError, GeoResult, ParseError};
use crate::interval::ViewWindow;
use crate::layout::LayoutController;
use crate::model::{Group, Marker, SourceParser, TimelineItem};
use crate::overlay::build_overlay_lanes;
use crate::virtual_date::VirtualDate;

/// Lane that collects items without an explicit group.
pub const DEFAULT_GROUP_ID: u32 = 0;

const ERROR_PANEL_HEADER: &str = "Error(s) parsing geochronos markdown. Hover to edit: \n\n";

/// Shown instead of a timeline when the document fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    messages: Vec<String>,
}

impl ErrorPanel {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl From<&ParseError> for ErrorPanel {
    fn from(err: &ParseError) -> Self {
        Self {
            messages: err.messages().to_vec(),
        }
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ERROR_PANEL_HEADER)?;
        let lines: Vec<_> = self.messages.iter().map(|m| format!("  - {m}")).collect();
        f.write_str(&lines.join("\n\n"))
    }
}

/// What a render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub items: usize,
    pub groups: usize,
    pub overlay_lanes: usize,
    pub markers: usize,
    /// Initial window, if one was chosen.
    pub window: Option<ViewWindow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderReport {
    Rendered(RenderSummary),
    ParseFailed(ErrorPanel),
    /// The document parsed but its content could not be encoded for the
    /// engine.
    EncodingFailed(GeoError),
    /// The engine refused to mount the timeline.
    EngineFailed(EngineError),
}

impl RenderReport {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderReport::Rendered(_))
    }
}

/// An engine event with the item it refers to resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub kind: EventKind,
    pub item: Option<TimelineItem>,
    /// Hover text for [`EventKind::ItemOver`].
    pub tooltip: Option<String>,
    pub time: Option<VirtualDate>,
}

type Handler = Box<dyn FnMut(&TimelineEvent)>;

/// Hover text for an item: its content, its range and its description.
///
/// ```
/// use geochron::{tooltip_text, Ma, TimeCodec, TimelineItem};
///
/// let codec = TimeCodec::default();
/// let item = TimelineItem::new("k", "K-Pg", codec.ma_to_date(Ma::new(66.0)).unwrap())
///     .geological()
///     .with_description("Non-avian dinosaurs die out");
/// assert_eq!(
///     tooltip_text(&item, &codec),
///     "K-Pg (66.0 Ma) \n Non-avian dinosaurs die out"
/// );
/// ```
pub fn tooltip_text(item: &TimelineItem, codec: &TimeCodec) -> String {
    let range = if item.is_geological {
        let start = codec.date_to_ma(&item.start);
        let end = item.end.map_or(start, |end| codec.date_to_ma(&end));
        format_range(start, end)
    } else {
        match item.end {
            Some(end) => format!("{} - {}", item.start.date_prefix(), end.date_prefix()),
            None => item.start.date_prefix(),
        }
    };
    let mut text = format!("{} ({range})", item.content);
    if let Some(description) = &item.description {
        text.push_str(" \n ");
        text.push_str(description);
    }
    text
}

/// Puts every ungrouped item into the default lane, which is prepended.
/// Nothing changes when there are no lanes at all.
pub fn assign_default_lane(items: &mut [TimelineItem], groups: Vec<Group>) -> Vec<Group> {
    if groups.is_empty() {
        return groups;
    }
    for item in items.iter_mut().filter(|i| i.group.is_none()) {
        item.group = Some(DEFAULT_GROUP_ID);
    }
    let mut lanes = Vec::with_capacity(groups.len() + 1);
    lanes.push(Group::new(DEFAULT_GROUP_ID, " "));
    lanes.extend(groups);
    lanes
}

/// A geological timeline bound to one engine and one parser.
pub struct Timeline<E, P> {
    engine: E,
    parser: P,
    settings: TimelineSettings,
    codec: TimeCodec,
    layout: LayoutController,
    items: Vec<TimelineItem>,
    handlers: HashMap<EventKind, Handler>,
    fit_after_render: bool,
}

impl<E: RenderEngine, P: SourceParser> Timeline<E, P> {
    /// Fails only when the configured codec is invalid.
    pub fn new(engine: E, parser: P, settings: TimelineSettings) -> GeoResult<Self> {
        let codec = TimeCodec::new(&settings.codec)?;
        Ok(Self {
            engine,
            parser,
            settings,
            codec,
            layout: LayoutController::new(),
            items: Vec::new(),
            handlers: HashMap::new(),
            fit_after_render: false,
        })
    }

    /// Also fit to content once the first paint has settled.
    pub fn fit_after_render(mut self, fit: bool) -> Self {
        self.fit_after_render = fit;
        self
    }

    /// Parses `source` and mounts the result, replacing any previous render
    /// and cancelling its pending stabilization steps.
    pub fn render(&mut self, source: &str) -> RenderReport {
        self.layout.begin_cycle();
        self.items.clear();

        let output = match self.parser.parse(source, &self.settings) {
            Ok(output) => output,
            Err(err) => return self.parse_failed(&err),
        };
        let flags = output.flags;

        let options = EngineOptions::new(&self.codec, &self.settings).with_domain(&self.codec);
        let mut options = match options {
            Ok(options) => options,
            Err(err) => return self.encoding_failed(err),
        };
        if let Some(order) = flags.order_by {
            options.order = Some(order);
        }
        if flags.no_today {
            options.show_current_time = false;
        }
        if let Some(height) = flags.height {
            options.set_height(height);
        }

        let mut items = output.items;
        let user_items = items.len();
        let mut groups = output.groups;
        let mut overlay_lanes = 0;
        if !flags.geology_overlays.is_empty() {
            let lanes = match build_overlay_lanes(&flags.geology_overlays, &groups, &self.codec) {
                Ok(lanes) => lanes,
                Err(err) => return self.encoding_failed(err),
            };
            overlay_lanes = lanes.groups.len();
            items.extend(lanes.items);
            groups.extend(lanes.groups);
        }

        let window = self.layout.select_window(flags.default_view, &items);
        if let Some(window) = &window {
            options.set_window(window);
        }

        let groups = assign_default_lane(&mut items, groups);
        if let Err(err) = self.engine.mount(&items, &groups, &options) {
            warn!("engine refused to mount the timeline: {err}");
            return RenderReport::EngineFailed(err);
        }

        let titles = self.add_markers(&output.markers);
        let summary = RenderSummary {
            items: items.len(),
            groups: groups.len(),
            overlay_lanes,
            markers: output.markers.len(),
            window,
        };

        let has_lanes = !groups.is_empty();
        self.items = items[..user_items].to_vec();
        self.layout.mounted(items, groups);
        self.layout.schedule_marker_titles(titles);
        self.layout
            .schedule_first_paint(has_lanes, self.fit_after_render, overlay_lanes > 0);

        info!(
            "rendered {} items in {} lanes ({} overlay lanes, {} markers)",
            summary.items, summary.groups, summary.overlay_lanes, summary.markers
        );
        RenderReport::Rendered(summary)
    }

    /// Registers `handler` for `kind`, replacing any previous one.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&TimelineEvent) + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Resolves an engine event against the rendered items and hands it to
    /// the registered handler, if any.
    pub fn dispatch(&mut self, event: EngineEvent) -> TimelineEvent {
        let item = event
            .item
            .as_deref()
            .and_then(|id| self.items.iter().find(|i| i.id == id))
            .cloned();
        let tooltip = match (event.kind, &item) {
            (EventKind::ItemOver, Some(item)) => Some(tooltip_text(item, &self.codec)),
            _ => None,
        };
        let resolved = TimelineEvent {
            kind: event.kind,
            item,
            tooltip,
            time: event.time,
        };
        if let Some(handler) = self.handlers.get_mut(&event.kind) {
            handler(&resolved);
        }
        resolved
    }

    /// Shows the canonical window again (or fits) and forces a relayout.
    pub fn fit_to_content(&mut self) {
        self.layout.fit(&mut self.engine);
    }

    /// Advances the virtual clock, running the layout steps that fall due.
    pub fn advance(&mut self, millis: f64) -> usize {
        self.layout.advance(millis, &mut self.engine)
    }

    /// User items of the last successful render, default lane applied.
    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    pub fn codec(&self) -> &TimeCodec {
        &self.codec
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn parse_failed(&mut self, err: &ParseError) -> RenderReport {
        warn!("document failed to parse: {err}");
        RenderReport::ParseFailed(ErrorPanel::from(err))
    }

    fn encoding_failed(&mut self, err: GeoError) -> RenderReport {
        warn!("content cannot be encoded for the engine: {err}");
        RenderReport::EncodingFailed(err)
    }

    /// Places the markers and returns their pending hover titles.
    fn add_markers(&mut self, markers: &[Marker]) -> Vec<(String, String)> {
        let axis = AxisFormatter::new(&self.codec);
        let mut titles = Vec::with_capacity(markers.len());
        for (index, marker) in markers.iter().enumerate() {
            let id = format!("marker_{index}");
            let placed = self
                .engine
                .add_custom_time(marker.start, &id)
                .and_then(|_| self.engine.set_custom_time_marker(&id, &marker.content));
            match placed {
                Ok(()) => {
                    debug!("placed marker {id} at {}", marker.start);
                    titles.push((id, axis.label(&marker.start, AxisScale::Day)));
                }
                Err(err) => self.layout.record("marker", err),
            }
        }
        titles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ma::Ma;

    #[test]
    fn error_panel_lists_each_message() {
        let err = ParseError::from_joined("bad date on line 2;;unknown flag ORDERBY");
        let panel = ErrorPanel::from(&err);
        assert_eq!(
            panel.to_string(),
            "Error(s) parsing geochronos markdown. Hover to edit: \n\n  - bad date on line 2\n\n  - unknown flag ORDERBY"
        );
    }

    #[test]
    fn calendar_tooltip_uses_date_prefixes() {
        let codec = TimeCodec::default();
        let start = VirtualDate::from_ymd(1914, 7, 28).unwrap();
        let end = VirtualDate::from_ymd(1918, 11, 11).unwrap();
        let item = TimelineItem::new("ww1", "WWI", start).with_end(end);
        assert_eq!(tooltip_text(&item, &codec), "WWI (1914-07-28 - 1918-11-11)");

        let point = TimelineItem::new("p", "Moon landing", VirtualDate::from_ymd(1969, 7, 20).unwrap());
        assert_eq!(tooltip_text(&point, &codec), "Moon landing (1969-07-20)");
    }

    #[test]
    fn geological_tooltip_uses_ma_range() {
        let codec = TimeCodec::default();
        let item = TimelineItem::new(
            "j",
            "Jurassic",
            codec.ma_to_date(Ma::new(201.3)).unwrap(),
        )
        .with_end(codec.ma_to_date(Ma::new(145.0)).unwrap())
        .geological();
        assert_eq!(tooltip_text(&item, &codec), "Jurassic (201 Ma - 145 Ma)");
    }

    #[test]
    fn default_lane_only_with_groups() {
        let at = VirtualDate::from_millis(0.0).unwrap();
        let mut items = vec![
            TimelineItem::new("a", "A", at),
            TimelineItem::new("b", "B", at).in_group(4),
        ];
        assert!(assign_default_lane(&mut items, Vec::new()).is_empty());
        assert_eq!(items[0].group, None);

        let lanes = assign_default_lane(&mut items, vec![Group::new(4, "Four")]);
        assert_eq!(lanes[0], Group::new(DEFAULT_GROUP_ID, " "));
        assert_eq!(lanes.len(), 2);
        assert_eq!(items[0].group, Some(DEFAULT_GROUP_ID));
        assert_eq!(items[1].group, Some(4));
    }
}
