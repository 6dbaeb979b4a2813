//! Link-quality estimation from beacon reception counts.
//!
//! `rt` is the fraction of expected Hello beacons that actually arrived
//! inside the sliding window, with elapsed time measured in hello intervals
//! so a loss-free link scores `1.0`.  `etx = 1 / rt²` is the penalty the
//! priority engine divides by.

use sg_core::SimTime;

/// ETX assigned to a link with `rt == 0`.  Finite so priorities stay
/// comparable.
pub const ETX_CEILING: f64 = 1.0e6;

/// Expected transmission rate in `[0, 1]`.
///
/// `count` beacons were heard since `first_in_window`.  A window with no
/// elapsed time (the only beacon arrived `now`) yields `0.0`.
pub fn transmission_rate(
    count: usize,
    first_in_window: SimTime,
    now: SimTime,
    hello_interval_secs: f64,
) -> f64 {
    let elapsed = now.secs_since(first_in_window);
    if count == 0 || elapsed <= 0.0 || hello_interval_secs <= 0.0 {
        return 0.0;
    }
    let expected = elapsed / hello_interval_secs;
    (count as f64 / expected).clamp(0.0, 1.0)
}

/// `1 / rt²`, clamped to `[1, ETX_CEILING]`.
pub fn etx(rt: f64) -> f64 {
    if rt <= 0.0 || !rt.is_finite() {
        return ETX_CEILING;
    }
    (1.0 / (rt * rt)).clamp(1.0, ETX_CEILING)
}
