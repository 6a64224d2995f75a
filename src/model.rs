// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Timeline content: items, lanes, markers and the parser seam.

use std::cmp::Ordering;

use crate::catalog::Rank;
use crate::config::TimelineSettings;
use crate::error::ParseError;
use crate::interval::ViewWindow;
use crate::overlay::OverlayStyle;
use crate::virtual_date::VirtualDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Class shared by every synthesized overlay item.
pub const OVERLAY_CLASS: &str = "geology-lane";

/// How the engine draws an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ItemKind {
    #[default]
    Range,
    Point,
    /// Non-interactive backdrop spanning the whole lane height.
    Background,
}

/// One entry on the timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimelineItem {
    pub id: String,
    pub content: String,
    pub start: VirtualDate,
    pub end: Option<VirtualDate>,
    pub group: Option<u32>,
    /// Dates were written in Ma.
    pub is_geological: bool,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ItemKind,
    pub class_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    pub style: Option<OverlayStyle>,
    pub description: Option<String>,
}

impl TimelineItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>, start: VirtualDate) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            start,
            end: None,
            group: None,
            is_geological: false,
            kind: ItemKind::Range,
            class_name: None,
            style: None,
            description: None,
        }
    }

    pub fn with_end(mut self, end: VirtualDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn in_group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }

    pub fn geological(mut self) -> Self {
        self.is_geological = true;
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Background or catalog overlay item; never counted as content.
    pub fn is_overlay(&self) -> bool {
        self.kind == ItemKind::Background
            || self
                .class_name
                .as_deref()
                .is_some_and(|c| c.contains(OVERLAY_CLASS))
    }

    /// Timestamps of the item in engine milliseconds.
    pub fn timestamps_millis(&self) -> impl Iterator<Item = f64> {
        std::iter::once(self.start.as_millis()).chain(self.end.map(|e| e.as_millis()))
    }
}

/// A lane.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub id: u32,
    pub content: String,
    pub class_name: Option<String>,
}

impl Group {
    pub fn new(id: u32, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            class_name: None,
        }
    }
}

/// A labelled vertical marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Marker {
    pub start: VirtualDate,
    pub content: String,
}

/// Item field used to order items stacked in the same lane.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrderField {
    Start,
    End,
    Content,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderKey {
    pub field: OrderField,
    pub descending: bool,
}

/// Sort key selector from the `orderBy` flag; keys apply left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBy {
    pub keys: Vec<OrderKey>,
}

impl OrderBy {
    pub fn compare(&self, a: &TimelineItem, b: &TimelineItem) -> Ordering {
        for key in &self.keys {
            let ord = match key.field {
                OrderField::Start => a.start.cmp(&b.start),
                OrderField::End => a.end.cmp(&b.end),
                OrderField::Content => a.content.cmp(&b.content),
            };
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Document-level flags.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Flags {
    pub order_by: Option<OrderBy>,
    /// Explicit window override.
    pub default_view: Option<ViewWindow>,
    /// Hide the current-time indicator.
    pub no_today: bool,
    /// Fixed pixel height; enables vertical scrolling.
    pub height: Option<u32>,
    /// Catalog ranks to draw as overlay lanes.
    pub geology_overlays: Vec<Rank>,
}

/// Structured output of the source parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutput {
    pub items: Vec<TimelineItem>,
    pub markers: Vec<Marker>,
    pub groups: Vec<Group>,
    pub flags: Flags,
}

/// The external markup parser.
pub trait SourceParser {
    fn parse(&self, source: &str, settings: &TimelineSettings) -> Result<ParseOutput, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: f64) -> VirtualDate {
        VirtualDate::from_millis(ms).unwrap()
    }

    #[test]
    fn overlay_detection() {
        let plain = TimelineItem::new("a", "A", at(0.0));
        assert!(!plain.is_overlay());
        assert!(plain.clone().with_kind(ItemKind::Background).is_overlay());
        assert!(plain.with_class("geology-lane geology-lane-eon").is_overlay());
    }

    #[test]
    fn timestamps_include_end_when_present() {
        let point = TimelineItem::new("p", "P", at(5.0));
        assert_eq!(point.timestamps_millis().collect::<Vec<_>>(), [5.0]);
        let range = point.with_end(at(9.0));
        assert_eq!(range.timestamps_millis().collect::<Vec<_>>(), [5.0, 9.0]);
    }

    #[test]
    fn order_by_applies_keys_in_sequence() {
        let a = TimelineItem::new("1", "beta", at(10.0));
        let b = TimelineItem::new("2", "alpha", at(10.0));
        let c = TimelineItem::new("3", "gamma", at(5.0));

        let order = OrderBy {
            keys: vec![
                OrderKey {
                    field: OrderField::Start,
                    descending: true,
                },
                OrderKey {
                    field: OrderField::Content,
                    descending: false,
                },
            ],
        };
        let mut items = vec![c.clone(), a.clone(), b.clone()];
        items.sort_by(|x, y| order.compare(x, y));
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }
}
