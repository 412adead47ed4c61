//! Frame and logical-clock time model.
//!
//! # Design
//!
//! The driver counts integer **frames** (the animation's nominal timeline).
//! Each unit additionally owns a [`LogicalClock`], the scalar parameter it
//! actually feeds into its motion curve.  Under a drift-free policy the two
//! agree; under clock drift they diverge, which is the whole point of the
//! simulation.
//!
//! Clock values are `f64` because they are passed straight into curve
//! formulas.  The built-in drift policies only ever add small integers, so
//! clock arithmetic stays exact (integers below 2^53 are representable).

use std::fmt;

// ── Frame ─────────────────────────────────────────────────────────────────────

/// An absolute animation frame number.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame(pub i64);

impl Frame {
    /// Return the frame `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Frame {
        Frame(self.0 + n as i64)
    }

    /// Frames elapsed from `earlier` to `self` (negative if `earlier > self`).
    #[inline]
    pub fn since(self, earlier: Frame) -> i64 {
        self.0 - earlier.0
    }

    /// The frame as a curve parameter.
    #[inline]
    pub fn as_param(self) -> f64 {
        self.0 as f64
    }
}

impl std::ops::Add<u64> for Frame {
    type Output = Frame;
    #[inline]
    fn add(self, rhs: u64) -> Frame {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Frame {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Frame) -> i64 {
        self.since(rhs)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// ── LogicalClock ──────────────────────────────────────────────────────────────

/// A unit's own notion of time.
///
/// `local` is the parameter the unit evaluates its curve at; `prev` is the
/// value used as the lower bound of the last integration step.  Both are
/// refreshed together on every tick, even when the clock does not move, so
/// `[prev, local]` always describes exactly the interval covered by the most
/// recent tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalClock {
    /// Current clock value.
    pub local: f64,
    /// Clock value at the start of the most recent tick.
    pub prev: f64,
    /// Ticks observed since the last reset.
    advance_count: u64,
}

impl LogicalClock {
    /// A clock parked at `frame` with no history.
    pub fn at(frame: Frame) -> Self {
        Self {
            local:         frame.as_param(),
            prev:          frame.as_param(),
            advance_count: 0,
        }
    }

    /// Re-seed to `frame` (segment entry).
    pub fn reset(&mut self, frame: Frame) {
        *self = Self::at(frame);
    }

    /// Move forward by `dt`, remembering the old value as `prev`.
    #[inline]
    pub fn advance_by(&mut self, dt: f64) {
        self.prev = self.local;
        self.local += dt;
    }

    /// A tick on which the clock does not move.
    #[inline]
    pub fn hold(&mut self) {
        self.prev = self.local;
    }

    /// Record one observed tick and return the new count.
    #[inline]
    pub fn count_tick(&mut self) -> u64 {
        self.advance_count += 1;
        self.advance_count
    }

    /// Ticks observed since the last reset.
    #[inline]
    pub fn advance_count(&self) -> u64 {
        self.advance_count
    }

    /// Clamp `local` (and `prev`) to at most `end`.  Returns `true` if the
    /// clock had overrun.
    pub fn saturate_at(&mut self, end: Frame) -> bool {
        let end = end.as_param();
        let overran = self.local > end;
        if overran {
            self.local = end;
        }
        self.prev = self.prev.min(end);
        overran
    }

    /// Length of the interval covered by the last tick.
    #[inline]
    pub fn step(&self) -> f64 {
        self.local - self.prev
    }
}

impl fmt::Display for LogicalClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock {} (prev {}, {} ticks)", self.local, self.prev, self.advance_count)
    }
}
