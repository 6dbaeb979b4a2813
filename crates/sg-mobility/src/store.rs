//! The `MobilityStore` — kinematic state for every vehicle.

use sg_core::{NodeId, Point, SimTime};

use crate::{Kinematics, MobilityError, MobilityResult};

/// Holds one [`Kinematics`] per node, indexed by `NodeId`.
pub struct MobilityStore {
    pub states: Vec<Kinematics>,
}

impl MobilityStore {
    /// Create a store with `count` vehicles parked at the origin.
    pub fn new(count: usize) -> Self {
        Self { states: vec![Kinematics::stationary(Point::ORIGIN, SimTime::ZERO); count] }
    }

    /// Build directly from per-node motion.
    pub fn from_states(states: Vec<Kinematics>) -> Self {
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Replace the motion of `node`.
    ///
    /// # Errors
    ///
    /// `UnknownNode` for an out-of-range id; `InvalidMotion` for non-finite
    /// parameters or a negative speed.
    pub fn set_motion(&mut self, node: NodeId, motion: Kinematics) -> MobilityResult<()> {
        let Kinematics { origin, heading, speed, acceleration, .. } = motion;
        let finite =
            [origin.x, origin.y, heading, speed, acceleration].iter().all(|v| v.is_finite());
        if !finite || motion.speed < 0.0 {
            return Err(MobilityError::InvalidMotion {
                node,
                reason: format!("{motion:?}"),
            });
        }
        let slot = self.states.get_mut(node.index()).ok_or(MobilityError::UnknownNode(node))?;
        *slot = motion;
        Ok(())
    }

    #[inline]
    pub fn position_at(&self, node: NodeId, now: SimTime) -> Point {
        self.states[node.index()].position_at(now)
    }

    #[inline]
    pub fn acceleration_at(&self, node: NodeId, now: SimTime) -> f64 {
        self.states[node.index()].acceleration_at(now)
    }
}
