//! Dead-reckoning of neighbor positions between beacons.

use sg_core::{Point, SimTime};

use crate::NeighborRecord;

/// Extrapolate `rec` to `now` along its last heading.
///
/// Displacement is `speed·Δt + ½·a·Δt²`.  For a braking neighbor `Δt` stops
/// at the instant its speed reaches zero, so it is never predicted to drive
/// backwards.
pub fn predict_position(rec: &NeighborRecord, now: SimTime) -> Point {
    let mut dt = now.secs_since(rec.last_heard);
    if rec.acceleration < 0.0 {
        dt = dt.min(rec.speed.max(0.0) / -rec.acceleration);
    }
    let advance = (rec.speed * dt + 0.5 * rec.acceleration * dt * dt).max(0.0);
    rec.last_position.offset(rec.heading, advance)
}
