//! Packet headers and their on-air encoding.
//!
//! # Layout
//!
//! ```text
//!   [tag: u8]  HELLO = 1 | SEND = 2 | RECOVER = 3 | JBR_RECOVER = 4
//!   [fields: i32 big-endian ...]
//!
//!   HELLO        sender, x, y, prev_x, prev_y, acceleration (mm/s²)
//!   SEND         dest, dest_x, dest_y, sender, sender_x, sender_y, hop,
//!                candidate_1 .. candidate_5
//!   RECOVER      SEND fields, local_source_x, local_source_y,
//!                previous_x, previous_y
//!   JBR_RECOVER  sender, sender_x, sender_y, next_hop, local_source_x,
//!                local_source_y, previous_x, previous_y, dest, dest_x,
//!                dest_y, hop
//! ```
//!
//! Coordinates travel as whole metres.  An absent node id (an empty
//! candidate slot or a missing JBR next hop) is written as
//! [`WIRE_NO_NODE`]; in memory it is always `Option::None`.

use sg_core::{NodeId, Point};

use crate::{WireError, WireResult};

/// Wire value standing for "no node".  No real node may use this id.
pub const WIRE_NO_NODE: i32 = 10_000_000;

const TAG_HELLO: u8 = 1;
const TAG_SEND: u8 = 2;
const TAG_RECOVER: u8 = 3;
const TAG_JBR_RECOVER: u8 = 4;

/// A coordinate pair as carried on the wire.
pub type WirePos = (i32, i32);

/// Discriminant of a [`Packet`], also used by the delivery logs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketKind {
    Hello,
    Send,
    Recover,
    JbrRecover,
}

impl PacketKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PacketKind::Hello => "hello",
            PacketKind::Send => "send",
            PacketKind::Recover => "recover",
            PacketKind::JbrRecover => "jbr_recover",
        }
    }
}

// ── Headers ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HelloHeader {
    pub sender: NodeId,
    pub position: WirePos,
    /// Position carried by the sender's previous beacon.
    pub previous: WirePos,
    /// Longitudinal acceleration in mm/s².
    pub acceleration_mm: i32,
}

impl HelloHeader {
    /// Acceleration in m/s².
    pub fn acceleration(&self) -> f64 {
        f64::from(self.acceleration_mm) / 1000.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SendHeader {
    pub dest: NodeId,
    pub dest_pos: WirePos,
    pub sender: NodeId,
    pub sender_pos: WirePos,
    pub hop_count: u32,
    pub candidates: [Option<NodeId>; 5],
}

impl SendHeader {
    /// 1-based rank of `id` in the candidate list.
    pub fn rank_of(&self, id: NodeId) -> Option<usize> {
        self.candidates.iter().position(|c| *c == Some(id)).map(|i| i + 1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecoverHeader {
    pub send: SendHeader,
    /// Where recovery started.  Fixed for the whole recovery walk.
    pub local_source: WirePos,
    pub previous: WirePos,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JbrHeader {
    pub sender: NodeId,
    pub sender_pos: WirePos,
    pub next_hop: Option<NodeId>,
    pub local_source: WirePos,
    pub previous: WirePos,
    pub dest: NodeId,
    pub dest_pos: WirePos,
    pub hop_count: u32,
}

/// Every packet the protocol puts on the channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Packet {
    Hello(HelloHeader),
    Send(SendHeader),
    Recover(RecoverHeader),
    JbrRecover(JbrHeader),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Hello(_) => PacketKind::Hello,
            Packet::Send(_) => PacketKind::Send,
            Packet::Recover(_) => PacketKind::Recover,
            Packet::JbrRecover(_) => PacketKind::JbrRecover,
        }
    }

    /// Destination of a data packet; `None` for beacons.
    pub fn dest(&self) -> Option<NodeId> {
        match self {
            Packet::Hello(_) => None,
            Packet::Send(h) => Some(h.dest),
            Packet::Recover(h) => Some(h.send.dest),
            Packet::JbrRecover(h) => Some(h.dest),
        }
    }

    /// Exact encoded size in bytes.
    pub fn wire_size(&self) -> usize {
        1 + 4 * match self {
            Packet::Hello(_) => 6,
            Packet::Send(_) => 12,
            Packet::Recover(_) => 16,
            Packet::JbrRecover(_) => 12,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter(Vec::with_capacity(self.wire_size()));
        match self {
            Packet::Hello(h) => {
                w.u8(TAG_HELLO);
                w.node(h.sender);
                w.pos(h.position);
                w.pos(h.previous);
                w.i32(h.acceleration_mm);
            }
            Packet::Send(h) => {
                w.u8(TAG_SEND);
                w.send(h);
            }
            Packet::Recover(h) => {
                w.u8(TAG_RECOVER);
                w.send(&h.send);
                w.pos(h.local_source);
                w.pos(h.previous);
            }
            Packet::JbrRecover(h) => {
                w.u8(TAG_JBR_RECOVER);
                w.node(h.sender);
                w.pos(h.sender_pos);
                w.opt_node(h.next_hop);
                w.pos(h.local_source);
                w.pos(h.previous);
                w.node(h.dest);
                w.pos(h.dest_pos);
                w.hop(h.hop_count);
            }
        }
        w.0
    }

    /// Decode exactly one packet occupying all of `buf`.
    pub fn decode(buf: &[u8]) -> WireResult<Packet> {
        let (&tag, rest) = buf.split_first().ok_or(WireError::Empty)?;
        let mut r = ByteReader { buf: rest, off: 0 };
        let packet = match tag {
            TAG_HELLO => Packet::Hello(HelloHeader {
                sender:          r.node("sender")?,
                position:        r.pos()?,
                previous:        r.pos()?,
                acceleration_mm: r.i32()?,
            }),
            TAG_SEND => Packet::Send(r.send()?),
            TAG_RECOVER => Packet::Recover(RecoverHeader {
                send:         r.send()?,
                local_source: r.pos()?,
                previous:     r.pos()?,
            }),
            TAG_JBR_RECOVER => Packet::JbrRecover(JbrHeader {
                sender:       r.node("sender")?,
                sender_pos:   r.pos()?,
                next_hop:     r.opt_node("next_hop")?,
                local_source: r.pos()?,
                previous:     r.pos()?,
                dest:         r.node("dest")?,
                dest_pos:     r.pos()?,
                hop_count:    r.hop()?,
            }),
            other => return Err(WireError::UnknownTag(other)),
        };
        r.finish()?;
        Ok(packet)
    }
}

/// Convert a wire position back to a planar point.
#[inline]
pub fn point(p: WirePos) -> Point {
    Point::from_wire(p.0, p.1)
}

// ── Writer ────────────────────────────────────────────────────────────────────

struct ByteWriter(Vec<u8>);

impl ByteWriter {
    fn u8(&mut self, v: u8) {
        self.0.push(v);
    }

    fn i32(&mut self, v: i32) {
        self.0.extend_from_slice(&v.to_be_bytes());
    }

    fn pos(&mut self, p: WirePos) {
        self.i32(p.0);
        self.i32(p.1);
    }

    fn node(&mut self, id: NodeId) {
        // Ids are bounded below WIRE_NO_NODE when the simulation is built.
        self.i32(id.0 as i32);
    }

    fn opt_node(&mut self, id: Option<NodeId>) {
        match id {
            Some(id) => self.node(id),
            None => self.i32(WIRE_NO_NODE),
        }
    }

    fn hop(&mut self, hop: u32) {
        self.i32(hop.min(i32::MAX as u32) as i32);
    }

    fn send(&mut self, h: &SendHeader) {
        self.node(h.dest);
        self.pos(h.dest_pos);
        self.node(h.sender);
        self.pos(h.sender_pos);
        self.hop(h.hop_count);
        for c in h.candidates {
            self.opt_node(c);
        }
    }
}

// ── Reader ────────────────────────────────────────────────────────────────────

struct ByteReader<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> ByteReader<'a> {
    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.off)
    }

    fn i32(&mut self) -> WireResult<i32> {
        let remaining = self.remaining();
        let bytes: [u8; 4] = self
            .buf
            .get(self.off..self.off + 4)
            .and_then(|s| s.try_into().ok())
            .ok_or(WireError::Truncated { needed: 4, remaining })?;
        self.off += 4;
        Ok(i32::from_be_bytes(bytes))
    }

    fn pos(&mut self) -> WireResult<WirePos> {
        Ok((self.i32()?, self.i32()?))
    }

    fn opt_node(&mut self, field: &'static str) -> WireResult<Option<NodeId>> {
        match self.i32()? {
            WIRE_NO_NODE => Ok(None),
            v if (0..WIRE_NO_NODE).contains(&v) => Ok(Some(NodeId(v as u32))),
            value => Err(WireError::InvalidField { field, value }),
        }
    }

    fn node(&mut self, field: &'static str) -> WireResult<NodeId> {
        match self.opt_node(field)? {
            Some(id) => Ok(id),
            None => Err(WireError::InvalidField { field, value: WIRE_NO_NODE }),
        }
    }

    fn hop(&mut self) -> WireResult<u32> {
        let value = self.i32()?;
        u32::try_from(value).map_err(|_| WireError::InvalidField { field: "hop_count", value })
    }

    fn send(&mut self) -> WireResult<SendHeader> {
        let dest = self.node("dest")?;
        let dest_pos = self.pos()?;
        let sender = self.node("sender")?;
        let sender_pos = self.pos()?;
        let hop_count = self.hop()?;
        let mut candidates = [None; 5];
        for slot in &mut candidates {
            *slot = self.opt_node("candidate")?;
        }
        Ok(SendHeader { dest, dest_pos, sender, sender_pos, hop_count, candidates })
    }

    fn finish(&self) -> WireResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(WireError::Trailing(n)),
        }
    }
}
