// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Geological period catalog
//!
//! Static table of named geological time spans, taken from the ICS
//! International Chronostratigraphic Chart (2024).  Ages are in Ma; each unit
//! has an older `start` and a younger `end`.
//!
//! Within one rank, children of the same parent partition their parent's
//! `[end, start]` range without gaps or overlaps.  That is an authoring
//! invariant of the table below and is checked by the tests, not at runtime.
//!
//! ## Boundary ties
//!
//! [`find_at`] uses a closed range, so a value sitting exactly on a shared
//! boundary matches both neighbours; the first one in catalog order wins.

use std::fmt;
use std::str::FromStr;

use crate::ma::Ma;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Rank
// ═══════════════════════════════════════════════════════════════════════════

/// Hierarchy level of the geological time scale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rank {
    Supereon,
    Eon,
    Era,
    Period,
    Epoch,
    Stage,
    Age,
}

impl Rank {
    /// Every rank, from the broadest to the finest.
    pub const ALL: [Rank; 7] = [
        Rank::Supereon,
        Rank::Eon,
        Rank::Era,
        Rank::Period,
        Rank::Epoch,
        Rank::Stage,
        Rank::Age,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Rank::Supereon => "Supereon",
            Rank::Eon => "Eon",
            Rank::Era => "Era",
            Rank::Period => "Period",
            Rank::Epoch => "Epoch",
            Rank::Stage => "Stage",
            Rank::Age => "Age",
        }
    }

    /// Lane label for overlay tracks of this rank.
    pub const fn plural(&self) -> &'static str {
        match self {
            Rank::Supereon => "Supereons",
            Rank::Eon => "Eons",
            Rank::Era => "Eras",
            Rank::Period => "Periods",
            Rank::Epoch => "Epochs",
            Rank::Stage => "Stages",
            Rank::Age => "Ages",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown rank name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown geological rank `{0}`")]
pub struct UnknownRank(pub String);

/// Accepts singular or plural names, case-insensitively.
impl FromStr for Rank {
    type Err = UnknownRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Rank::ALL
            .into_iter()
            .find(|rank| {
                rank.name().eq_ignore_ascii_case(wanted) || rank.plural().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownRank(wanted.to_owned()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GeologicalPeriod
// ═══════════════════════════════════════════════════════════════════════════

/// One named unit of the geological time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeologicalPeriod {
    pub name: &'static str,
    /// Older boundary.
    pub start: Ma,
    /// Younger boundary.
    pub end: Ma,
    pub rank: Rank,
    /// Hex color from the ICS chart.
    pub color: Option<&'static str>,
    /// Name of the containing unit; a lookup key, see [`lookup_by_name`].
    pub parent: Option<&'static str>,
}

impl GeologicalPeriod {
    /// Closed-range containment, `end ≤ ma ≤ start`.
    #[inline]
    pub fn contains(&self, ma: Ma) -> bool {
        ma >= self.end && ma <= self.start
    }

    /// Length of the unit.
    #[inline]
    pub fn duration(&self) -> Ma {
        self.start - self.end
    }

    /// The containing unit, when declared.
    pub fn parent_period(&self) -> Option<&'static GeologicalPeriod> {
        self.parent.and_then(lookup_by_name)
    }
}

const fn unit(
    name: &'static str,
    start: f64,
    end: f64,
    color: &'static str,
    rank: Rank,
    parent: Option<&'static str>,
) -> GeologicalPeriod {
    GeologicalPeriod {
        name,
        start: Ma::new(start),
        end: Ma::new(end),
        rank,
        color: Some(color),
        parent,
    }
}

use Rank::{Age, Eon, Epoch, Era, Period};

/// The catalog, in declaration order (not sorted by time).
#[rustfmt::skip]
pub static GEOLOGICAL_TIME_SCALE: &[GeologicalPeriod] = &[
    // Phanerozoic
    unit("Phanerozoic",       538.8,    0.0,     "#9AD9DD", Eon,    None),
    // Cenozoic
    unit("Cenozoic",           66.0,    0.0,     "#F2F91D", Era,    Some("Phanerozoic")),
    unit("Quaternary",          2.58,   0.0,     "#F9F97F", Period, Some("Cenozoic")),
    unit("Holocene",            0.0117, 0.0,     "#FEEBD2", Epoch,  Some("Quaternary")),
    unit("Meghalayan",          0.0042, 0.0,     "#FDEDEC", Age,    Some("Holocene")),
    unit("Northgrippian",       0.0082, 0.0042,  "#FDEEE5", Age,    Some("Holocene")),
    unit("Greenlandian",        0.0117, 0.0082,  "#FEF2E9", Age,    Some("Holocene")),
    unit("Pleistocene",         2.58,   0.0117,  "#FFF2AE", Epoch,  Some("Quaternary")),
    unit("Neogene",            23.03,   2.58,    "#FFE619", Period, Some("Cenozoic")),
    unit("Pliocene",            5.333,  2.58,    "#FFFFB3", Epoch,  Some("Neogene")),
    unit("Miocene",            23.03,   5.333,   "#FFFF00", Epoch,  Some("Neogene")),
    unit("Paleogene",          66.0,   23.03,    "#FD9A52", Period, Some("Cenozoic")),
    unit("Oligocene",          33.9,   23.03,    "#FEC574", Epoch,  Some("Paleogene")),
    unit("Eocene",             56.0,   33.9,     "#FDC07A", Epoch,  Some("Paleogene")),
    unit("Paleocene",          66.0,   56.0,     "#FDA75F", Epoch,  Some("Paleogene")),
    // Mesozoic
    unit("Mesozoic",          251.902, 66.0,     "#67C5CA", Era,    Some("Phanerozoic")),
    unit("Cretaceous",        145.0,   66.0,     "#7FC64E", Period, Some("Mesozoic")),
    unit("Upper Cretaceous",  100.5,   66.0,     "#A6D84A", Epoch,  Some("Cretaceous")),
    unit("Lower Cretaceous",  145.0,  100.5,     "#8CCD57", Epoch,  Some("Cretaceous")),
    unit("Jurassic",          201.3,  145.0,     "#34B2C9", Period, Some("Mesozoic")),
    unit("Upper Jurassic",    163.5,  145.0,     "#B3E1E6", Epoch,  Some("Jurassic")),
    unit("Middle Jurassic",   174.1,  163.5,     "#80CED7", Epoch,  Some("Jurassic")),
    unit("Lower Jurassic",    201.3,  174.1,     "#66C2D7", Epoch,  Some("Jurassic")),
    unit("Triassic",          251.902, 201.3,    "#812B92", Period, Some("Mesozoic")),
    unit("Upper Triassic",    237.0,  201.3,     "#B051C5", Epoch,  Some("Triassic")),
    unit("Middle Triassic",   247.2,  237.0,     "#B051C5", Epoch,  Some("Triassic")),
    unit("Lower Triassic",    251.902, 247.2,    "#983999", Epoch,  Some("Triassic")),
    // Paleozoic
    unit("Paleozoic",         538.8,  251.902,   "#99C08D", Era,    Some("Phanerozoic")),
    unit("Permian",           298.9,  251.902,   "#F04028", Period, Some("Paleozoic")),
    unit("Lopingian",         259.1,  251.902,   "#FBA794", Epoch,  Some("Permian")),
    unit("Guadalupian",       272.95, 259.1,     "#FB745D", Epoch,  Some("Permian")),
    unit("Cisuralian",        298.9,  272.95,    "#EF5845", Epoch,  Some("Permian")),
    unit("Carboniferous",     358.9,  298.9,     "#67A599", Period, Some("Paleozoic")),
    unit("Pennsylvanian",     323.2,  298.9,     "#99C2B8", Epoch,  Some("Carboniferous")),
    unit("Mississippian",     358.9,  323.2,     "#8CB06C", Epoch,  Some("Carboniferous")),
    unit("Devonian",          419.2,  358.9,     "#CB8C37", Period, Some("Paleozoic")),
    unit("Upper Devonian",    382.7,  358.9,     "#F1D281", Epoch,  Some("Devonian")),
    unit("Middle Devonian",   393.3,  382.7,     "#F1C96B", Epoch,  Some("Devonian")),
    unit("Lower Devonian",    419.2,  393.3,     "#E5B75A", Epoch,  Some("Devonian")),
    unit("Silurian",          443.8,  419.2,     "#B3E1B6", Period, Some("Paleozoic")),
    unit("Pridoli",           423.0,  419.2,     "#E6F5E1", Epoch,  Some("Silurian")),
    unit("Ludlow",            427.4,  423.0,     "#D9EFD7", Epoch,  Some("Silurian")),
    unit("Wenlock",           433.4,  427.4,     "#CCE9CD", Epoch,  Some("Silurian")),
    unit("Llandovery",        443.8,  433.4,     "#BFE3C3", Epoch,  Some("Silurian")),
    unit("Ordovician",        485.4,  443.8,     "#009270", Period, Some("Paleozoic")),
    unit("Upper Ordovician",  458.4,  443.8,     "#5EB27E", Epoch,  Some("Ordovician")),
    unit("Middle Ordovician", 470.0,  458.4,     "#3FA755", Epoch,  Some("Ordovician")),
    unit("Lower Ordovician",  485.4,  470.0,     "#1A9D6F", Epoch,  Some("Ordovician")),
    unit("Cambrian",          538.8,  485.4,     "#7FA056", Period, Some("Paleozoic")),
    unit("Furongian",         497.0,  485.4,     "#B3E095", Epoch,  Some("Cambrian")),
    unit("Miaolingian",       509.0,  497.0,     "#A6D889", Epoch,  Some("Cambrian")),
    unit("Cambrian Series 2", 521.0,  509.0,     "#99CE80", Epoch,  Some("Cambrian")),
    unit("Terreneuvian",      538.8,  521.0,     "#8CC47E", Epoch,  Some("Cambrian")),
    // Precambrian
    unit("Precambrian",      4600.0,  538.8,     "#F74370", Eon,    None),
    unit("Proterozoic",      2500.0,  538.8,     "#F74370", Eon,    Some("Precambrian")),
    unit("Neoproterozoic",   1000.0,  538.8,     "#FED96A", Era,    Some("Proterozoic")),
    unit("Ediacaran",         635.0,  538.8,     "#FED96A", Period, Some("Neoproterozoic")),
    unit("Cryogenian",        720.0,  635.0,     "#FECC64", Period, Some("Neoproterozoic")),
    unit("Tonian",           1000.0,  720.0,     "#FEBF5E", Period, Some("Neoproterozoic")),
    unit("Mesoproterozoic",  1600.0, 1000.0,     "#FFB549", Era,    Some("Proterozoic")),
    unit("Stenian",          1200.0, 1000.0,     "#FFC846", Period, Some("Mesoproterozoic")),
    unit("Ectasian",         1400.0, 1200.0,     "#FFC140", Period, Some("Mesoproterozoic")),
    unit("Calymmian",        1600.0, 1400.0,     "#FFBA3A", Period, Some("Mesoproterozoic")),
    unit("Paleoproterozoic", 2500.0, 1600.0,     "#F74370", Era,    Some("Proterozoic")),
    unit("Statherian",       1800.0, 1600.0,     "#FFA028", Period, Some("Paleoproterozoic")),
    unit("Orosirian",        2050.0, 1800.0,     "#FF9A26", Period, Some("Paleoproterozoic")),
    unit("Rhyacian",         2300.0, 2050.0,     "#FF9322", Period, Some("Paleoproterozoic")),
    unit("Siderian",         2500.0, 2300.0,     "#FF8C1F", Period, Some("Paleoproterozoic")),
    unit("Archean",          4000.0, 2500.0,     "#F0047F", Eon,    Some("Precambrian")),
    unit("Neoarchean",       2800.0, 2500.0,     "#FFC0CB", Era,    Some("Archean")),
    unit("Mesoarchean",      3200.0, 2800.0,     "#FFA6BA", Era,    Some("Archean")),
    unit("Paleoarchean",     3600.0, 3200.0,     "#FF8CA8", Era,    Some("Archean")),
    unit("Eoarchean",        4000.0, 3600.0,     "#FF7296", Era,    Some("Archean")),
    unit("Hadean",           4600.0, 4000.0,     "#5E374E", Eon,    Some("Precambrian")),
];

// ═══════════════════════════════════════════════════════════════════════════
// Lookups
// ═══════════════════════════════════════════════════════════════════════════

/// Case-insensitive exact match on the unit name.
pub fn lookup_by_name(name: &str) -> Option<&'static GeologicalPeriod> {
    GEOLOGICAL_TIME_SCALE
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// All units of `rank`, in catalog order.
pub fn by_rank(rank: Rank) -> impl Iterator<Item = &'static GeologicalPeriod> {
    GEOLOGICAL_TIME_SCALE.iter().filter(move |p| p.rank == rank)
}

/// First unit (in catalog order, optionally restricted to `rank`) whose
/// closed range contains `ma`.
///
/// ```
/// use geochron::{find_at, Ma, Rank};
///
/// assert_eq!(find_at(Ma::new(150.0), Some(Rank::Period)).unwrap().name, "Jurassic");
/// // 66.0 is shared by the Paleogene and the Cretaceous; declaration order decides.
/// assert_eq!(find_at(Ma::new(66.0), Some(Rank::Period)).unwrap().name, "Paleogene");
/// ```
pub fn find_at(ma: Ma, rank: Option<Rank>) -> Option<&'static GeologicalPeriod> {
    GEOLOGICAL_TIME_SCALE
        .iter()
        .filter(|p| rank.map_or(true, |r| p.rank == r))
        .find(|p| p.contains(ma))
}

/// Direct children of `parent_name` (one level), in catalog order.
pub fn children_of(parent_name: &str) -> impl Iterator<Item = &'static GeologicalPeriod> + '_ {
    GEOLOGICAL_TIME_SCALE
        .iter()
        .filter(move |p| p.parent == Some(parent_name))
}

/// Context lookup for tooltips: the enclosing Period, else Epoch, else Era.
pub fn period_for_ma(ma: Ma) -> Option<&'static GeologicalPeriod> {
    [Rank::Period, Rank::Epoch, Rank::Era]
        .into_iter()
        .find_map(|rank| find_at(ma, Some(rank)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_unit_is_well_formed() {
        for p in GEOLOGICAL_TIME_SCALE {
            assert!(p.start >= p.end, "{}", p.name);
            assert!(p.end >= Ma::PRESENT, "{}", p.name);
            if let Some(parent) = p.parent {
                assert!(lookup_by_name(parent).is_some(), "{} -> {parent}", p.name);
            }
        }
    }

    #[test]
    fn names_are_unique_ignoring_case() {
        for (i, a) in GEOLOGICAL_TIME_SCALE.iter().enumerate() {
            for b in &GEOLOGICAL_TIME_SCALE[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name), "{}", a.name);
            }
        }
    }

    #[test]
    fn siblings_partition_their_parent() {
        for parent in GEOLOGICAL_TIME_SCALE {
            for rank in Rank::ALL {
                let mut kids: Vec<_> = children_of(parent.name).filter(|c| c.rank == rank).collect();
                if kids.is_empty() {
                    continue;
                }
                kids.sort_by(|a, b| a.end.partial_cmp(&b.end).unwrap());
                assert_eq!(kids[0].end, parent.end, "{} / {rank}", parent.name);
                assert_eq!(kids[kids.len() - 1].start, parent.start, "{} / {rank}", parent.name);
                for pair in kids.windows(2) {
                    assert_eq!(pair[0].start, pair[1].end, "{} / {}", pair[0].name, pair[1].name);
                }
            }
        }
    }

    #[test]
    fn boundaries_always_resolve_within_rank() {
        for p in GEOLOGICAL_TIME_SCALE {
            for edge in [p.start, p.end] {
                let hit = find_at(edge, Some(p.rank)).expect(p.name);
                assert_eq!(hit.rank, p.rank);
                assert!(hit.contains(edge));
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup_by_name("jurassic").unwrap().name, "Jurassic");
        assert_eq!(lookup_by_name("UPPER CRETACEOUS").unwrap().rank, Rank::Epoch);
        assert!(lookup_by_name("Jurassic Park").is_none());
    }

    #[test]
    fn by_rank_keeps_catalog_order() {
        let eons: Vec<_> = by_rank(Rank::Eon).map(|p| p.name).collect();
        assert_eq!(
            eons,
            ["Phanerozoic", "Precambrian", "Proterozoic", "Archean", "Hadean"]
        );
        assert_eq!(by_rank(Rank::Stage).count(), 0);
        assert_eq!(by_rank(Rank::Supereon).count(), 0);
    }

    #[test]
    fn children_are_one_level_deep() {
        let kids: Vec<_> = children_of("Cenozoic").map(|p| p.name).collect();
        assert_eq!(kids, ["Quaternary", "Neogene", "Paleogene"]);
        assert_eq!(children_of("Meghalayan").count(), 0);
    }

    #[test]
    fn find_at_without_rank_returns_first_declared() {
        assert_eq!(find_at(Ma::new(10.0), None).unwrap().name, "Phanerozoic");
        assert!(find_at(Ma::new(5_000.0), None).is_none());
    }

    #[test]
    fn period_context_prefers_period_rank() {
        assert_eq!(period_for_ma(Ma::new(150.0)).unwrap().name, "Jurassic");
        assert_eq!(period_for_ma(Ma::new(3_000.0)).unwrap().name, "Mesoarchean");
        assert!(period_for_ma(Ma::new(4_300.0)).is_none());
    }

    #[test]
    fn rank_parsing() {
        assert_eq!("eon".parse::<Rank>().unwrap(), Rank::Eon);
        assert_eq!(" Periods ".parse::<Rank>().unwrap(), Rank::Period);
        assert_eq!("EPOCHS".parse::<Rank>().unwrap(), Rank::Epoch);
        assert!("eons and eras".parse::<Rank>().is_err());
        assert_eq!(Rank::Eon.plural(), "Eons");
    }

    #[test]
    fn parent_navigation() {
        let holocene = lookup_by_name("Holocene").unwrap();
        assert_eq!(holocene.parent_period().unwrap().name, "Quaternary");
        assert!(lookup_by_name("Phanerozoic").unwrap().parent_period().is_none());
    }
}
