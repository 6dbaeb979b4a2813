//! Scenario generation: grid topology, vehicle placement and flows.
//!
//! Junction `J<r>.<c>` sits at `(c · block, r · block)`; every pair of
//! horizontally or vertically adjacent junctions is joined by a road.
//!
//! ```text
//!  J2.0 ── J2.1 ── J2.2
//!   │       │       │
//!  J1.0 ── J1.1 ── J1.2
//!   │       │       │
//!  J0.0 ── J0.1 ── J0.2
//! ```

use std::fmt::Write as _;
use std::io::Cursor;

use anyhow::{Result, bail};

use sg_core::{NodeId, Point, SimRng, SimTime};
use sg_mobility::{Kinematics, MobilityStore};
use sg_schedule::Flow;
use sg_topology::{RoadTopology, load_topology_file, load_topology_reader};

use crate::config::{GridSettings, TrafficSettings};

/// Topology file text for a `rows × cols` grid.
pub fn grid_topology_text(rows: usize, cols: usize, block_m: f64) -> String {
    let mut out = format!("# {rows}x{cols} grid, {block_m} m blocks\n");
    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = (c as f64 * block_m, r as f64 * block_m);
            let _ = writeln!(out, "junction J{r}.{c} {x} {y}");
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                let _ = writeln!(out, "road H{r}.{c} J{r}.{c}_J{r}.{}", c + 1);
            }
            if r + 1 < rows {
                let _ = writeln!(out, "road V{r}.{c} J{r}.{c}_J{}.{c}", r + 1);
            }
        }
    }
    out
}

/// The configured topology file, or the generated grid.
pub fn load_topology(grid: &GridSettings) -> Result<RoadTopology> {
    let topology = match &grid.topology_file {
        Some(path) => load_topology_file(path, grid.junction_radius)?,
        None => {
            let text = grid_topology_text(grid.rows, grid.cols, grid.block_m);
            load_topology_reader(Cursor::new(text), grid.junction_radius)?
        }
    };
    if topology.road_count() == 0 {
        bail!("topology has no roads to place vehicles on");
    }
    Ok(topology)
}

/// Drop `grid.vehicles` vehicles at uniform points of uniformly chosen
/// roads, each heading along its road in a random direction.
pub fn place_vehicles(
    topology: &RoadTopology,
    grid: &GridSettings,
    rng: &mut SimRng,
) -> Result<MobilityStore> {
    let roads: Vec<(Point, Point)> = topology
        .roads()
        .map(|(_, road)| (topology.junction_pos(road.from), topology.junction_pos(road.to)))
        .collect();
    if roads.is_empty() {
        bail!("topology has no roads to place vehicles on");
    }
    if !(grid.max_speed_mps.is_finite() && grid.max_speed_mps >= 0.0) {
        bail!("max_speed_mps must be non-negative, got {}", grid.max_speed_mps);
    }

    let states = (0..grid.vehicles)
        .map(|_| {
            let (a, b) = roads[rng.gen_range(0..roads.len())];
            let t: f64 = rng.gen_range(0.0..1.0);
            let origin = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            let heading = if rng.gen_bool(0.5) { a.bearing_to(b) } else { b.bearing_to(a) };
            let speed = rng.gen_range(0.0..=grid.max_speed_mps);
            let mut k = Kinematics::cruising(origin, heading, speed, SimTime::ZERO);
            if rng.gen_bool(grid.braking_share) {
                k.acceleration = -rng.gen_range(0.5_f64..2.0);
            }
            k
        })
        .collect();
    Ok(MobilityStore::from_states(states))
}

/// `traffic.sources` flows between distinct random vehicles, spaced
/// `interval_secs` apart.
pub fn generate_flows(
    traffic: &TrafficSettings,
    vehicles: usize,
    rng: &mut SimRng,
) -> Result<Vec<Flow>> {
    if traffic.sources == 0 {
        return Ok(Vec::new());
    }
    if vehicles < 2 {
        bail!("at least two vehicles are needed to generate flows");
    }
    let flows = (0..traffic.sources)
        .map(|i| {
            let source = rng.gen_range(0..vehicles);
            // Shift past the source so the destination is always distinct.
            let destination = (source + rng.gen_range(1..vehicles)) % vehicles;
            Flow::new(
                NodeId(source as u32),
                NodeId(destination as u32),
                SimTime::from_secs_f64(i as f64 * traffic.interval_secs),
            )
        })
        .collect();
    Ok(flows)
}
