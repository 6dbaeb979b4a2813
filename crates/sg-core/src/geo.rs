//! Planar coordinate type and the geometry helpers the routing layer uses.
//!
//! Positions are simulation-plane metres stored as `f64`.  Every helper here
//! is a pure function of its arguments.

/// A point in the simulation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Heading from `self` towards `other` in radians, `atan2(Δy, Δx)`.
    #[inline]
    pub fn bearing_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Move `dist` along `heading` (radians).
    #[inline]
    pub fn offset(self, heading: f64, dist: f64) -> Point {
        Point::new(self.x + dist * heading.cos(), self.y + dist * heading.sin())
    }

    /// Truncate to the integer coordinates carried in packet headers.
    #[inline]
    pub fn to_wire(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    #[inline]
    pub fn from_wire(x: i32, y: i32) -> Point {
        Point::new(x as f64, y as f64)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Unsigned angle in degrees (`[0, 180]`) at `vertex` between the rays
/// `vertex → a` and `vertex → b`.
///
/// Returns `0.0` when either ray is degenerate (zero length).
pub fn angle_between(a: Point, vertex: Point, b: Point) -> f64 {
    let (ux, uy) = (a.x - vertex.x, a.y - vertex.y);
    let (vx, vy) = (b.x - vertex.x, b.y - vertex.y);
    if (ux == 0.0 && uy == 0.0) || (vx == 0.0 && vy == 0.0) {
        return 0.0;
    }
    signed_angle((ux, uy), (vx, vy)).abs().to_degrees()
}

/// Signed angle in radians (`(−π, π]`) rotating vector `u` onto vector `v`.
///
/// Uses `atan2(cross, dot)` so the result never wraps around the ±π seam the
/// way a difference of two bearings can.
#[inline]
pub fn signed_angle(u: (f64, f64), v: (f64, f64)) -> f64 {
    let cross = u.0 * v.1 - u.1 * v.0;
    let dot = u.0 * v.0 + u.1 * v.1;
    cross.atan2(dot)
}

/// Shortest distance from `p` to the segment `a`–`b`.
///
/// Degenerates to point distance when `a == b`.
pub fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
