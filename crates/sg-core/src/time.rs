//! Simulation time model.
//!
//! # Design
//!
//! Time is an absolute count of simulated **microseconds** since the start of
//! the run.  Integer time keeps event ordering exact (no floating-point
//! drift) and gives the µs resolution the contention timers need.  Protocol
//! formulas that want seconds go through [`SimTime::as_secs_f64`].

use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp in microseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const MICROS_PER_SEC: u64 = 1_000_000;

    #[inline]
    pub const fn from_micros(us: u64) -> SimTime {
        SimTime(us)
    }

    #[inline]
    pub const fn from_millis(ms: u64) -> SimTime {
        SimTime(ms * 1_000)
    }

    /// Convert fractional seconds, rounding to the nearest microsecond.
    /// Negative inputs clamp to zero.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> SimTime {
        SimTime((secs.max(0.0) * Self::MICROS_PER_SEC as f64).round() as u64)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / Self::MICROS_PER_SEC as f64
    }

    /// Seconds elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn secs_since(self, earlier: SimTime) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / Self::MICROS_PER_SEC as f64
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs_us: u64) -> SimTime {
        SimTime(self.0 + rhs_us)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.as_secs_f64())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The virtual clock driven by the event loop.
///
/// Time only moves forward: [`advance_to`](Self::advance_to) ignores
/// timestamps in the past so a misbehaving event source cannot rewind it.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        if t > self.now {
            self.now = t;
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.now)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically filled from a TOML file plus CLI overrides by the application
/// crate and passed to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Simulated seconds to run; events after this are discarded and the
    /// delivery logs are written.
    pub duration_secs: f64,

    /// Offset added to every flow start time, giving beacons time to fill
    /// the neighbor tables first.
    pub flow_start_secs: f64,
}

impl SimConfig {
    /// The timestamp at which the simulation ends (inclusive).
    #[inline]
    pub fn end_time(&self) -> SimTime {
        SimTime::from_secs_f64(self.duration_secs)
    }

    #[inline]
    pub fn flow_start(&self) -> SimTime {
        SimTime::from_secs_f64(self.flow_start_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:            1,
            duration_secs:   60.0,
            flow_start_secs: 10.0,
        }
    }
}
