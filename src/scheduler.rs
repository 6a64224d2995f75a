// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Cancellable deferred steps on a virtual clock.
//!
//! Nothing here sleeps or spawns: the host advances the clock and pops the
//! steps that fell due, in due order (ties in scheduling order).

/// Delay standing in for "the next painted frame".
pub const FRAME_MILLIS: f64 = 16.0;

#[derive(Debug, Clone)]
struct Pending<S> {
    due: f64,
    seq: u64,
    step: S,
}

/// Queue of steps keyed by virtual time in milliseconds.
#[derive(Debug, Clone)]
pub struct Scheduler<S> {
    now: f64,
    next_seq: u64,
    pending: Vec<Pending<S>>,
}

impl<S> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Scheduler<S> {
    pub const fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queues `step` to fall due `delay` milliseconds from now.
    pub fn schedule(&mut self, delay: f64, step: S) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay.max(0.0),
            seq,
            step,
        });
    }

    /// Queues `step` for the next frame.
    pub fn next_frame(&mut self, step: S) {
        self.schedule(FRAME_MILLIS, step);
    }

    /// Pops the earliest step due at or before `until`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: f64) -> Option<S> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        let pending = self.pending.swap_remove(index);
        self.now = self.now.max(pending.due);
        Some(pending.step)
    }

    /// Moves the clock forward to `until` without running anything.
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }

    /// Drops every pending step, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }

    /// Pending steps with their due times, earliest first.
    pub fn pending(&self) -> Vec<(f64, &S)> {
        let mut out: Vec<_> = self.pending.iter().collect();
        out.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        out.into_iter().map(|p| (p.due, &p.step)).collect()
    }
}
