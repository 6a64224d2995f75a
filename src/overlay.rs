// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Catalog overlay lanes.
//!
//! Each requested [`Rank`] becomes one background lane holding one item per
//! catalog unit of that rank.  Styling travels as a structured
//! [`OverlayStyle`]; engine adapters serialize it as they need, e.g. with
//! [`OverlayStyle::to_css`].

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::catalog::{self, GeologicalPeriod, Rank};
use crate::codec::TimeCodec;
use crate::error::GeoResult;
use crate::model::{Group, ItemKind, TimelineItem, OVERLAY_CLASS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opacity of overlay background fills.
pub const OVERLAY_ALPHA: f64 = 0.25;

/// Class applied to synthesized overlay lanes.
pub const OVERLAY_GROUP_CLASS: &str = "geology-lane-group";

// ═══════════════════════════════════════════════════════════════════════════
// Styling
// ═══════════════════════════════════════════════════════════════════════════

/// An RGB color with alpha.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Parses `#RGB` / `#RRGGBB` (leading `#` optional).
    ///
    /// ```
    /// use geochron::Rgba;
    ///
    /// let c = Rgba::from_hex("#F9F97F", 0.25).unwrap();
    /// assert_eq!(c.to_string(), "rgba(249, 249, 127, 0.25)");
    /// assert!(Rgba::from_hex("#12345", 0.25).is_none());
    /// ```
    pub fn from_hex(hex: &str, alpha: f64) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: alpha,
        })
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Presentation of an overlay item.
///
/// Always synthesized, so it only serializes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OverlayStyle {
    pub border: Option<String>,
    pub display: &'static str,
    pub align_items: &'static str,
    pub justify_content: &'static str,
    pub pointer_events: Option<&'static str>,
    pub font_weight: u16,
    pub text_transform: &'static str,
    pub letter_spacing_em: f64,
    pub width_percent: u8,
    pub background: Option<Rgba>,
    pub color: &'static str,
}

impl OverlayStyle {
    /// Style for a catalog unit; the fill is omitted when the unit has no
    /// usable hex color.
    pub fn for_period(period: &GeologicalPeriod) -> Self {
        Self {
            border: None,
            display: "flex",
            align_items: "center",
            justify_content: "center",
            pointer_events: Some("none"),
            font_weight: 600,
            text_transform: "uppercase",
            letter_spacing_em: 0.02,
            width_percent: 100,
            background: period.color.and_then(|hex| Rgba::from_hex(hex, OVERLAY_ALPHA)),
            color: "var(--text-normal)",
        }
    }

    /// Inline CSS declaration list.
    pub fn to_css(&self) -> String {
        let mut decls = vec![
            format!("border: {}", self.border.as_deref().unwrap_or("none")),
            format!("align-items: {}", self.align_items),
            format!("display: {}", self.display),
        ];
        if let Some(events) = self.pointer_events {
            decls.push(format!("pointer-events: {events}"));
        }
        decls.push(format!("font-weight: {}", self.font_weight));
        decls.push(format!("text-transform: {}", self.text_transform));
        decls.push(format!("letter-spacing: {}em", self.letter_spacing_em));
        decls.push(format!("justify-content: {}", self.justify_content));
        decls.push(format!("width: {}%", self.width_percent));
        if let Some(bg) = self.background {
            decls.push(format!("background-color: {bg}"));
        }
        decls.push(format!("color: {}", self.color));
        decls.join("; ")
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Lane construction
// ═══════════════════════════════════════════════════════════════════════════

/// Lanes and items synthesized for the requested ranks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayLanes {
    pub groups: Vec<Group>,
    /// Sorted by start, ascending.
    pub items: Vec<TimelineItem>,
}

impl OverlayLanes {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.items.is_empty()
    }
}

/// Lowercases, collapses non-alphanumeric runs into `-` and trims edge dashes.
///
/// ```
/// use geochron::slugify;
///
/// assert_eq!(slugify("overlay-Epoch-Cambrian Series 2"), "overlay-epoch-cambrian-series-2");
/// assert_eq!(slugify("  --Upper  Jurassic!! "), "upper-jurassic");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Projects catalog units onto new background lanes.
///
/// Lane ids continue after the largest existing id (or start at 1), one per
/// distinct requested rank in request order.  Ranks without catalog units
/// produce no lane.
pub fn build_overlay_lanes(
    ranks: &[Rank],
    existing: &[Group],
    codec: &TimeCodec,
) -> GeoResult<OverlayLanes> {
    let mut next_id = existing.iter().map(|g| g.id).max().map_or(1, |max| max + 1);
    let mut requested = HashSet::new();
    let mut seen = HashSet::new();
    let mut lanes = OverlayLanes::default();

    for &rank in ranks.iter().filter(|r| requested.insert(**r)) {
        let periods: Vec<_> = catalog::by_rank(rank).collect();
        if periods.is_empty() {
            debug!("no catalog units of rank {rank}; skipping overlay lane");
            continue;
        }

        let group_id = next_id;
        next_id += 1;
        lanes.groups.push(Group {
            id: group_id,
            content: rank.plural().to_owned(),
            class_name: Some(OVERLAY_GROUP_CLASS.to_owned()),
        });

        for period in periods {
            let id = slugify(&format!("overlay-{rank}-{}", period.name));
            if !seen.insert(id.clone()) {
                continue;
            }
            let rank_class = rank.name().to_lowercase();
            let mut item = TimelineItem::new(id, period.name, codec.ma_to_date(period.start)?)
                .with_end(codec.ma_to_date(period.end)?)
                .in_group(group_id)
                .geological()
                .with_kind(ItemKind::Background)
                .with_class(format!("{OVERLAY_CLASS} {OVERLAY_CLASS}-{rank_class}"));
            item.style = Some(OverlayStyle::for_period(period));
            lanes.items.push(item);
        }
    }

    lanes.items.sort_by(|a, b| a.start.cmp(&b.start));
    debug!(
        "built {} overlay lanes with {} items",
        lanes.groups.len(),
        lanes.items.len()
    );
    Ok(lanes)
}
