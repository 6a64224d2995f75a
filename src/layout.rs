// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! View window selection and first-paint stabilization.
//!
//! Grouped timelines tend to paint with overlapping lanes until the view is
//! moved once. The controller works around that with a short, fully
//! scheduled sequence of engine calls:
//!
//! ```text
//! Idle ──mount──▶ WindowSet ──150 ms──▶ Jiggling ──(+200 ms restore)──┐
//!                     │                                              │
//!                     └──fit / relayout──▶ Nudging ──140 ms──▶ Settled ◀┘
//! ```
//!
//! Every step is a [`LayoutStep`] value in a [`Scheduler`]; the host drives
//! the clock with [`LayoutController::advance`]. Engine failures inside a
//! step abort that step only. They are logged at `warn` and kept in
//! [`LayoutController::diagnostics`].

use std::fmt;

use log::{debug, warn};

use crate::engine::{EngineResult, RenderEngine};
use crate::error::EngineError;
use crate::interval::ViewWindow;
use crate::model::{Group, TimelineItem};
use crate::scheduler::Scheduler;

/// Delay before marker hover titles are rewritten.
pub const MARKER_TITLE_DELAY_MILLIS: f64 = 100.0;
/// Delay before the first-paint jiggle.
pub const JIGGLE_DELAY_MILLIS: f64 = 150.0;
/// Total zoom-out factor of the jiggle, split evenly between both sides.
pub const JIGGLE_ZOOM: f64 = 1.02;
pub const JIGGLE_RESTORE_MILLIS: f64 = 200.0;
pub const FIT_AFTER_JIGGLE_MILLIS: f64 = 250.0;
/// Delay before fitting an ungrouped timeline.
pub const FIT_DELAY_MILLIS: f64 = 100.0;
pub const RELAYOUT_DELAY_MILLIS: f64 = 60.0;
pub const NUDGE_DELAY_MILLIS: f64 = 60.0;
pub const NUDGE_RESTORE_MILLIS: f64 = 40.0;
pub const FINAL_REDRAW_MILLIS: f64 = 140.0;
/// Nudge size as a fraction of the span (at least 1 ms).
pub const NUDGE_FRACTION: f64 = 0.002;
/// Right-hand padding of computed bounds as a fraction of the span.
pub const RIGHT_PAD_FRACTION: f64 = 0.02;

/// Smallest window covering all content items.
///
/// Overlay and background items are ignored. A single instant widens to
/// 1 ms; the right edge gets [`RIGHT_PAD_FRACTION`] of padding, the left
/// edge none.
///
/// ```
/// use geochron::{compute_content_bounds, TimelineItem, VirtualDate};
///
/// let at = |ms: f64| VirtualDate::from_millis(ms).unwrap();
/// let items = [
///     TimelineItem::new("a", "A", at(10.0)).with_end(at(50.0)),
///     TimelineItem::new("b", "B", at(30.0)).with_end(at(90.0)),
/// ];
/// let window = compute_content_bounds(&items).unwrap();
/// assert_eq!(window.start.as_millis(), 10.0);
/// assert!((window.end.as_millis() - 91.6).abs() < 1e-6);
/// ```
pub fn compute_content_bounds(items: &[TimelineItem]) -> Option<ViewWindow> {
    let (min, max) = items
        .iter()
        .filter(|item| !item.is_overlay())
        .flat_map(TimelineItem::timestamps_millis)
        .fold(None, |acc: Option<(f64, f64)>, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })?;
    let max = if min == max { min + 1.0 } else { max };
    let span = (max - min).max(1.0);
    ViewWindow::from_millis(min, max + span * RIGHT_PAD_FRACTION)
}

/// Where the stabilization sequence currently is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    /// Mounted with its initial window.
    WindowSet,
    Jiggling,
    /// Forced relayout in progress.
    Nudging,
    /// Nothing pending.
    Settled,
}

/// One deferred engine interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutStep {
    /// `(marker id, hover title)` pairs.
    MarkerTitles(Vec<(String, String)>),
    Jiggle {
        fit_after: bool,
        relayout_after: bool,
    },
    RestoreAfterJiggle {
        window: ViewWindow,
        fit_after: bool,
        relayout_after: bool,
    },
    Fit,
    ForceRelayout,
    StackOn,
    Nudge { target: ViewWindow },
    RestoreAfterNudge { target: ViewWindow },
    FinalRedraw,
}

impl LayoutStep {
    pub const fn name(&self) -> &'static str {
        match self {
            LayoutStep::MarkerTitles(_) => "marker titles",
            LayoutStep::Jiggle { .. } => "jiggle",
            LayoutStep::RestoreAfterJiggle { .. } => "restore after jiggle",
            LayoutStep::Fit => "fit",
            LayoutStep::ForceRelayout => "force relayout",
            LayoutStep::StackOn => "stack on",
            LayoutStep::Nudge { .. } => "nudge",
            LayoutStep::RestoreAfterNudge { .. } => "restore after nudge",
            LayoutStep::FinalRedraw => "final redraw",
        }
    }
}

/// A swallowed engine failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Virtual time of the failure.
    pub at_millis: f64,
    pub step: &'static str,
    pub error: EngineError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ms] {}: {}", self.at_millis, self.step, self.error)
    }
}

/// Owns the canonical window and the pending stabilization steps of one
/// render cycle.
#[derive(Debug, Default)]
pub struct LayoutController {
    scheduler: Scheduler<LayoutStep>,
    phase: LayoutPhase,
    canonical: Option<ViewWindow>,
    items: Vec<TimelineItem>,
    groups: Vec<Group>,
    diagnostics: Vec<Diagnostic>,
    cycle: u64,
}

impl LayoutController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new render cycle, dropping every step still pending from the
    /// previous one. Returns the number of dropped steps.
    pub fn begin_cycle(&mut self) -> usize {
        let dropped = self.scheduler.cancel_all();
        if dropped > 0 {
            debug!(
                "render cycle {} cancelled {dropped} pending layout steps",
                self.cycle
            );
        }
        self.cycle += 1;
        self.phase = LayoutPhase::Idle;
        self.canonical = None;
        self.items.clear();
        self.groups.clear();
        self.diagnostics.clear();
        dropped
    }

    /// Picks the initial window: the explicit one verbatim, otherwise the
    /// content bounds. The result becomes the canonical window.
    pub fn select_window(
        &mut self,
        explicit: Option<ViewWindow>,
        items: &[TimelineItem],
    ) -> Option<ViewWindow> {
        self.canonical = explicit.or_else(|| compute_content_bounds(items));
        self.canonical
    }

    /// Records what the engine was mounted with.
    pub fn mounted(&mut self, items: Vec<TimelineItem>, groups: Vec<Group>) {
        self.items = items;
        self.groups = groups;
        self.phase = LayoutPhase::WindowSet;
    }

    pub fn schedule_marker_titles(&mut self, titles: Vec<(String, String)>) {
        if !titles.is_empty() {
            self.scheduler
                .schedule(MARKER_TITLE_DELAY_MILLIS, LayoutStep::MarkerTitles(titles));
        }
    }

    /// Queues the first-paint workaround.
    ///
    /// With lanes the view is jiggled; `fit_after` fits once it has been
    /// restored, otherwise `relayout_after` forces a relayout. Without lanes
    /// only a requested fit is queued.
    pub fn schedule_first_paint(&mut self, has_lanes: bool, fit_after: bool, relayout_after: bool) {
        if has_lanes {
            self.scheduler.schedule(
                JIGGLE_DELAY_MILLIS,
                LayoutStep::Jiggle {
                    fit_after,
                    relayout_after,
                },
            );
        } else if fit_after {
            self.scheduler.schedule(FIT_DELAY_MILLIS, LayoutStep::Fit);
        }
        self.settle_if_idle();
    }

    /// Runs the fit action now.
    pub fn fit<E: RenderEngine>(&mut self, engine: &mut E) {
        self.run(LayoutStep::Fit, engine);
    }

    /// Advances the virtual clock by `millis`, running every step that falls
    /// due, including steps scheduled along the way. Returns how many ran.
    pub fn advance<E: RenderEngine>(&mut self, millis: f64, engine: &mut E) -> usize {
        let until = self.scheduler.now() + millis.max(0.0);
        let mut ran = 0;
        while let Some(step) = self.scheduler.pop_due(until) {
            self.run(step, engine);
            ran += 1;
        }
        self.scheduler.settle(until);
        ran
    }

    /// Logs and keeps an engine failure that should not abort rendering.
    pub fn record(&mut self, step: &'static str, error: EngineError) {
        warn!("{step} failed: {error}");
        self.diagnostics.push(Diagnostic {
            at_millis: self.scheduler.now(),
            step,
            error,
        });
    }

    #[inline]
    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// The window the view returns to once stabilization settles.
    #[inline]
    pub fn canonical_window(&self) -> Option<ViewWindow> {
        self.canonical
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn pending_steps(&self) -> Vec<(f64, &LayoutStep)> {
        self.scheduler.pending()
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Number of render cycles begun so far.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    fn settle_if_idle(&mut self) {
        if self.phase != LayoutPhase::Idle && self.scheduler.is_idle() {
            self.phase = LayoutPhase::Settled;
        }
    }

    fn run<E: RenderEngine>(&mut self, step: LayoutStep, engine: &mut E) {
        let name = step.name();
        debug!("layout step `{name}` at {} ms", self.scheduler.now());
        if let Err(error) = self.execute(step, engine) {
            self.record(name, error);
        }
        self.settle_if_idle();
    }

    fn execute<E: RenderEngine>(&mut self, step: LayoutStep, engine: &mut E) -> EngineResult<()> {
        match step {
            LayoutStep::MarkerTitles(titles) => {
                for (id, title) in &titles {
                    engine.set_custom_time_title(id, title)?;
                }
            }
            LayoutStep::Jiggle {
                fit_after,
                relayout_after,
            } => {
                self.phase = LayoutPhase::Jiggling;
                let prior = engine.window().or_else(|err| self.canonical.ok_or(err))?;
                let wide = prior
                    .zoomed_out(JIGGLE_ZOOM)
                    .ok_or_else(|| EngineError(format!("cannot widen {prior}")))?;
                engine.set_window(&wide, true)?;
                self.scheduler.schedule(
                    JIGGLE_RESTORE_MILLIS,
                    LayoutStep::RestoreAfterJiggle {
                        window: prior,
                        fit_after,
                        relayout_after,
                    },
                );
            }
            LayoutStep::RestoreAfterJiggle {
                window,
                fit_after,
                relayout_after,
            } => {
                engine.set_window(&window, true)?;
                if fit_after {
                    self.scheduler
                        .schedule(FIT_AFTER_JIGGLE_MILLIS, LayoutStep::Fit);
                } else if relayout_after {
                    self.scheduler
                        .schedule(RELAYOUT_DELAY_MILLIS, LayoutStep::ForceRelayout);
                }
            }
            LayoutStep::Fit => {
                if self.canonical.is_none() {
                    self.canonical = compute_content_bounds(&self.items);
                }
                match self.canonical {
                    Some(window) => engine.set_window(&window, false)?,
                    None => engine.fit()?,
                }
                self.scheduler
                    .schedule(RELAYOUT_DELAY_MILLIS, LayoutStep::ForceRelayout);
            }
            LayoutStep::ForceRelayout => {
                self.phase = LayoutPhase::Nudging;
                if !self.groups.is_empty() {
                    engine.set_groups(&self.groups)?;
                }
                let target = match self.canonical {
                    Some(window) => window,
                    None => engine.window()?,
                };
                engine.set_stack(false)?;
                // Stacking must come back even if the redraw below fails.
                self.scheduler.next_frame(LayoutStep::StackOn);
                engine.redraw()?;
                self.scheduler
                    .schedule(NUDGE_DELAY_MILLIS, LayoutStep::Nudge { target });
                self.scheduler
                    .schedule(FINAL_REDRAW_MILLIS, LayoutStep::FinalRedraw);
            }
            LayoutStep::StackOn => {
                engine.set_stack(true)?;
                engine.redraw()?;
            }
            LayoutStep::Nudge { target } => {
                let delta = (target.span_millis() * NUDGE_FRACTION).floor().max(1.0);
                let nudged = target
                    .shifted(delta)
                    .ok_or_else(|| EngineError(format!("cannot shift {target}")))?;
                engine.set_window(&nudged, false)?;
                self.scheduler.schedule(
                    NUDGE_RESTORE_MILLIS,
                    LayoutStep::RestoreAfterNudge { target },
                );
            }
            LayoutStep::RestoreAfterNudge { target } => {
                engine.set_window(&target, false)?;
                engine.redraw()?;
            }
            LayoutStep::FinalRedraw => engine.redraw()?,
        }
        Ok(())
    }
}
