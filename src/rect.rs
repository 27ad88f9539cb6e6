use glam::DVec2;

/// Floating-point margin used for every containment/overlap test in the crate.
pub const EPSILON: f64 = 1e-5;

/// An axis-aligned box given by its top-left corner and extents. `w`/`h` are
/// expected to be non-negative; the type itself doesn't enforce that so that
/// degenerate zero-width probes (used e.g. by `queryPoint`) stay cheap to build.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.w, self.y + self.h)
    }

    /// Strict containment with the crate's `EPSILON` margin, per §3: points
    /// exactly on an edge are *not* contained.
    pub fn contains_point_margin(&self, px: f64, py: f64) -> bool {
        px - self.x > EPSILON
            && py - self.y > EPSILON
            && (self.x + self.w) - px > EPSILON
            && (self.y + self.h) - py > EPSILON
    }

    /// Open-interval overlap test used by `queryRect` (§4.3): touching edges
    /// do not count as intersecting.
    pub fn intersects_open(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// The nearest corner of `self` to the point `(px, py)`, per
    /// `rect_getNearestCorner` in the source algorithm: each axis picks
    /// whichever of the rect's two edges on that axis is closer to the point.
    pub fn nearest_corner(&self, px: f64, py: f64) -> (f64, f64) {
        let nx = nearest(px, self.x, self.x + self.w);
        let ny = nearest(py, self.y, self.y + self.h);
        (nx, ny)
    }

    /// Bounding rect of `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.w).max(other.x + other.w);
        let bottom = (self.y + self.h).max(other.y + other.h);
        Rect::new(x, y, right - x, bottom - y)
    }
}

fn nearest(v: f64, a: f64, b: f64) -> f64 {
    if (a - v).abs() < (b - v).abs() { a } else { b }
}

/// Minkowski difference of `a` and `b`: "does `a` moving by `(dx,dy)` hit `b`?"
/// reduces to "does the segment from the origin to `(dx,dy)` enter this rect?"
pub fn minkowski_diff(a: Rect, b: Rect) -> Rect {
    Rect::new(b.x - a.x - a.w, b.y - a.y - a.h, a.w + b.w, a.h + b.h)
}
