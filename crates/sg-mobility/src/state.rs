//! Per-vehicle kinematic state.

use sg_core::{Point, SimTime};

/// Straight-line motion with constant acceleration, anchored at `since`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kinematics {
    /// Position at `since`.
    pub origin: Point,
    /// Direction of travel in radians (0 = +x, counter-clockwise).
    pub heading: f64,
    /// Speed at `since`, m/s.
    pub speed: f64,
    /// Constant acceleration along `heading`, m/s².
    pub acceleration: f64,
    pub since: SimTime,
}

impl Kinematics {
    /// A parked vehicle at `pos`.
    pub fn stationary(pos: Point, since: SimTime) -> Self {
        Self { origin: pos, heading: 0.0, speed: 0.0, acceleration: 0.0, since }
    }

    /// Constant-velocity motion.
    pub fn cruising(origin: Point, heading: f64, speed: f64, since: SimTime) -> Self {
        Self { origin, heading, speed, acceleration: 0.0, since }
    }

    /// Seconds of motion from `since` to `now`, capped at the instant a
    /// decelerating vehicle comes to rest.
    fn moving_secs(&self, now: SimTime) -> f64 {
        let dt = now.secs_since(self.since);
        if self.acceleration < 0.0 && self.speed > 0.0 {
            dt.min(self.speed / -self.acceleration)
        } else if self.acceleration < 0.0 {
            0.0
        } else {
            dt
        }
    }

    /// Distance travelled from `origin` by `now`.  Never negative.
    pub fn displacement_at(&self, now: SimTime) -> f64 {
        let dt = self.moving_secs(now);
        (self.speed * dt + 0.5 * self.acceleration * dt * dt).max(0.0)
    }

    pub fn position_at(&self, now: SimTime) -> Point {
        self.origin.offset(self.heading, self.displacement_at(now))
    }

    pub fn speed_at(&self, now: SimTime) -> f64 {
        (self.speed + self.acceleration * self.moving_secs(now)).max(0.0)
    }

    /// Acceleration currently in effect; zero once a braking vehicle stopped.
    pub fn acceleration_at(&self, now: SimTime) -> f64 {
        if self.acceleration < 0.0 && self.speed_at(now) == 0.0 {
            0.0
        } else {
            self.acceleration
        }
    }
}
