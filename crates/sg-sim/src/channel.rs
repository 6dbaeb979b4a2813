//! Disc radio channel with distance-based loss.
//!
//! ```text
//!  p(d) = 1                                   d ≤ reliable_fraction · range
//!       = (range − d) / (range − reliable)    reliable < d ≤ range
//!       = 0                                   d > range
//! ```
//!
//! Each receiver draws independently, so a single broadcast can reach any
//! subset of the nodes in range.  This is the only source of beacon loss the
//! link estimator sees.

use sg_core::SimRng;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelConfig {
    /// Radio range in metres.
    pub range: f64,
    /// Fraction of `range` inside which every transmission is received.
    pub reliable_fraction: f64,
    /// Air time plus propagation, applied to every delivery.
    pub tx_delay_us: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            range:             250.0,
            reliable_fraction: 0.6,
            tx_delay_us:       200,
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(SimError::Config(format!(
                "channel range must be positive, got {}",
                self.range
            )));
        }
        if !(0.0..=1.0).contains(&self.reliable_fraction) {
            return Err(SimError::Config(format!(
                "reliable_fraction must lie in [0, 1], got {}",
                self.reliable_fraction
            )));
        }
        Ok(())
    }

    /// Probability that a frame sent over `distance` metres is received.
    pub fn delivery_probability(&self, distance: f64) -> f64 {
        let reliable = self.range * self.reliable_fraction;
        if distance <= reliable {
            1.0
        } else if distance > self.range {
            0.0
        } else {
            (self.range - distance) / (self.range - reliable)
        }
    }

    /// Draw whether one receiver at `distance` hears the frame.
    pub fn draw(&self, distance: f64, rng: &mut SimRng) -> bool {
        match self.delivery_probability(distance) {
            p if p >= 1.0 => true,
            p if p <= 0.0 => false,
            p => rng.gen_bool(p),
        }
    }
}
