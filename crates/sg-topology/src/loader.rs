//! Topology file loader.
//!
//! # File format
//!
//! Plain text, one record per line, whitespace-separated tokens:
//!
//! ```text
//! junction J0 0 0
//! junction J1 500 0
//! road R0 J0_J1
//! ```
//!
//! Blank lines and lines starting with `#` are skipped; trailing whitespace
//! is ignored.  All junctions are registered before any road is resolved, so
//! records may appear in any order.
//!
//! Junction ids may themselves contain `_`.  A road's endpoint token is
//! split at every `_` position and the unique split whose halves are both
//! known junctions wins.
//!
//! Any other deviation (wrong token count, unparsable coordinate, unknown
//! record kind, duplicate id, unresolvable endpoints) rejects the whole file.

use std::io::BufRead;
use std::path::Path;

use log::debug;

use sg_core::{JunctionId, Point};

use crate::{RoadTopology, RoadTopologyBuilder, TopologyError, TopologyResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a topology from a file on disk.
pub fn load_topology_file(path: &Path, junction_radius: f64) -> TopologyResult<RoadTopology> {
    let file = std::fs::File::open(path)?;
    load_topology_reader(std::io::BufReader::new(file), junction_radius)
}

/// Like [`load_topology_file`] but accepts any `BufRead` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or generated scenarios.
pub fn load_topology_reader<R: BufRead>(
    reader: R,
    junction_radius: f64,
) -> TopologyResult<RoadTopology> {
    let mut builder = RoadTopologyBuilder::new().junction_radius(junction_radius);
    let mut pending_roads: Vec<(usize, String, String)> = Vec::new();

    // ── Pass 1: junctions (roads are buffered) ────────────────────────────
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            [first, ..] if first.starts_with('#') => continue,
            ["junction", id, x, y] => {
                let pos = Point::new(parse_coord(x, line_no)?, parse_coord(y, line_no)?);
                builder.add_junction(*id, pos).ok_or_else(|| TopologyError::Duplicate {
                    line: line_no,
                    kind: "junction",
                    name: id.to_string(),
                })?;
            }
            ["road", id, endpoints] => {
                pending_roads.push((line_no, id.to_string(), endpoints.to_string()));
            }
            ["junction", ..] => return Err(malformed(line_no, "expected `junction <id> <x> <y>`")),
            ["road", ..] => return Err(malformed(line_no, "expected `road <id> <from>_<to>`")),
            [kind, ..] => return Err(malformed(line_no, &format!("unknown record kind {kind:?}"))),
        }
    }

    // ── Pass 2: resolve road endpoints ────────────────────────────────────
    for (line_no, id, endpoints) in pending_roads {
        let (from, to) = resolve_endpoints(&builder, &endpoints)
            .ok_or(TopologyError::UnknownJunction { line: line_no, endpoints })?;
        builder.add_road(id.clone(), from, to).ok_or(TopologyError::Duplicate {
            line: line_no,
            kind: "road",
            name: id,
        })?;
    }

    debug!(
        "loaded topology: {} junctions, {} roads",
        builder.junction_count(),
        builder.road_count()
    );
    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn malformed(line: usize, reason: &str) -> TopologyError {
    TopologyError::Malformed { line, reason: reason.to_string() }
}

fn parse_coord(token: &str, line: usize) -> TopologyResult<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed(line, &format!("invalid coordinate {token:?}")))
}

/// Find the unique `_` split of `token` whose halves are both known
/// junctions.  Ambiguous or unresolvable tokens yield `None`.
fn resolve_endpoints(
    builder: &RoadTopologyBuilder,
    token: &str,
) -> Option<(JunctionId, JunctionId)> {
    let mut found = None;
    for (pos, _) in token.match_indices('_') {
        let (a, b) = (&token[..pos], &token[pos + 1..]);
        if let (Some(from), Some(to)) = (builder.junction_id(a), builder.junction_id(b)) {
            if found.is_some() {
                return None;
            }
            found = Some((from, to));
        }
    }
    found
}
