//! Protocol configuration.

use sg_core::SimTime;

use crate::{RoutingError, RoutingResult};

/// Strategy applied when greedy forwarding reaches a local optimum.
///
/// The numeric values are the ones accepted on the command line and in
/// scenario files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum RecoveryMode {
    /// Broadcast once with an empty candidate list, then drop.
    None = 0,
    /// Geometric recovery with contention among re-ranked candidates.
    #[default]
    Sigo = 1,
    /// Deterministic unicast next-hop selection.
    Jbr = 2,
}

impl TryFrom<u8> for RecoveryMode {
    type Error = RoutingError;

    fn try_from(v: u8) -> RoutingResult<Self> {
        match v {
            0 => Ok(RecoveryMode::None),
            1 => Ok(RecoveryMode::Sigo),
            2 => Ok(RecoveryMode::Jbr),
            other => {
                Err(RoutingError::Config(format!("recovery mode must be 0, 1 or 2, got {other}")))
            }
        }
    }
}

impl From<RecoveryMode> for u8 {
    fn from(m: RecoveryMode) -> u8 {
        m as u8
    }
}

/// Tunable SIGO parameters, shared by every node of a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SigoConfig {
    /// Period of Hello beacons.
    pub hello_interval_secs: f64,
    /// Upper bound of the random delay added to every beacon.
    pub beacon_jitter_us: u64,
    /// Sliding window over which beacon receptions are counted.
    pub window_secs: f64,
    /// A neighbor silent for this many hello intervals is evicted.
    pub neighbor_ttl_beacons: u32,
    /// Contention slot: rank `r` waits `(r − 1)` slots before relaying.
    pub wait_t_us: u64,
    pub forward_jitter_min_us: u64,
    pub forward_jitter_max_us: u64,
    /// Neighbors predicted farther than this are never candidates.
    pub max_range: f64,
    /// Target cumulative delivery probability of the addressed candidates.
    pub trans_probability: f64,
    /// Packets that would be relayed beyond this hop count are dropped.
    pub max_hop: u32,
    pub inter_point_weight: f64,
    pub angle_gamma: f64,
    pub rp_gamma: f64,
    pub recovery_mode: RecoveryMode,
    /// Distance bonus in SIGO recovery for neighbors on self's road or at a
    /// junction.
    pub recovery_road_bonus: f64,
}

impl Default for SigoConfig {
    fn default() -> Self {
        Self {
            hello_interval_secs:   1.0,
            beacon_jitter_us:      50_000,
            window_secs:           5.0,
            neighbor_ttl_beacons:  3,
            wait_t_us:             10_000,
            forward_jitter_min_us: 100,
            forward_jitter_max_us: 500,
            max_range:             250.0,
            trans_probability:     0.9,
            max_hop:               32,
            inter_point_weight:    1.0,
            angle_gamma:           1.0,
            rp_gamma:              1.0,
            recovery_mode:         RecoveryMode::Sigo,
            recovery_road_bonus:   50.0,
        }
    }
}

impl SigoConfig {
    #[inline]
    pub fn hello_interval_us(&self) -> u64 {
        SimTime::from_secs_f64(self.hello_interval_secs).0
    }

    #[inline]
    pub fn window_us(&self) -> u64 {
        SimTime::from_secs_f64(self.window_secs).0
    }

    /// Silence after which a neighbor is evicted.
    #[inline]
    pub fn neighbor_ttl_us(&self) -> u64 {
        self.hello_interval_us() * u64::from(self.neighbor_ttl_beacons)
    }

    /// Reject parameter combinations the protocol cannot run with.
    pub fn validate(&self) -> RoutingResult<()> {
        let positive = [
            ("hello_interval_secs", self.hello_interval_secs),
            ("window_secs", self.window_secs),
            ("max_range", self.max_range),
            ("angle_gamma", self.angle_gamma),
            ("rp_gamma", self.rp_gamma),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(RoutingError::Config(format!("{name} must be positive, got {v}")));
            }
        }
        if self.window_secs < self.hello_interval_secs {
            return Err(RoutingError::Config(
                "window_secs must cover at least one hello interval".into(),
            ));
        }
        if self.neighbor_ttl_beacons == 0 {
            return Err(RoutingError::Config("neighbor_ttl_beacons must be at least 1".into()));
        }
        if !(self.trans_probability > 0.0 && self.trans_probability <= 1.0) {
            return Err(RoutingError::Config(format!(
                "trans_probability must be in (0, 1], got {}",
                self.trans_probability
            )));
        }
        if self.forward_jitter_min_us > self.forward_jitter_max_us {
            return Err(RoutingError::Config("forward jitter bounds are inverted".into()));
        }
        if self.max_hop == 0 {
            return Err(RoutingError::Config("max_hop must be at least 1".into()));
        }
        if !self.inter_point_weight.is_finite() || !self.recovery_road_bonus.is_finite() {
            return Err(RoutingError::Config("bonus weights must be finite".into()));
        }
        Ok(())
    }
}
