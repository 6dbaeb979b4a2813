//! TOML scenario file.
//!
//! Every table and key is optional; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [simulation]
//! seed = 3
//! duration_secs = 90.0
//! flow_start_secs = 10.0
//!
//! [protocol]
//! recovery_mode = 2        # 0 = none, 1 = SIGO, 2 = JBR
//! max_range = 250.0
//!
//! [channel]
//! range = 250.0
//! reliable_fraction = 0.6
//!
//! [grid]
//! rows = 5
//! cols = 5
//! vehicles = 120
//!
//! [traffic]
//! sources = 20
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use sg_core::SimConfig;
use sg_routing::SigoConfig;
use sg_sim::ChannelConfig;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub simulation: SimConfig,
    pub protocol:   SigoConfig,
    pub channel:    ChannelConfig,
    pub grid:       GridSettings,
    pub traffic:    TrafficSettings,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GridSettings {
    pub rows:            usize,
    pub cols:            usize,
    /// Junction spacing in metres.
    pub block_m:         f64,
    pub junction_radius: f64,
    pub vehicles:        usize,
    pub max_speed_mps:   f64,
    /// Share of vehicles that brake from their initial speed.
    pub braking_share:   f64,
    /// Load this topology instead of generating the grid.
    pub topology_file:   Option<PathBuf>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows:            5,
            cols:            5,
            block_m:         300.0,
            junction_radius: 20.0,
            vehicles:        100,
            max_speed_mps:   15.0,
            braking_share:   0.2,
            topology_file:   None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TrafficSettings {
    /// Number of generated flows.
    pub sources:       usize,
    /// Gap between consecutive generated flows.
    pub interval_secs: f64,
    /// Load `source,destination,start_secs` rows instead of generating.
    pub flows_file:    Option<PathBuf>,
}

impl Default for TrafficSettings {
    fn default() -> Self {
        Self { sources: 10, interval_secs: 2.0, flows_file: None }
    }
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("parsing scenario file {}", path.display()))?;
        Ok(config)
    }
}
