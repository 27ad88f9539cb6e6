//! Exact geometric tests on a single pair of AABBs: the Minkowski-difference
//! reduction, the generalized Liang-Barsky segment/rect clip it is built on,
//! and `detect_collision`, the continuous (swept) AABB-vs-AABB test that
//! drives the whole movement pipeline.

use crate::rect::{EPSILON, Rect, minkowski_diff};

/// Integer unit normal, one of `(-1,0) (1,0) (0,-1) (0,1)`.
pub type Normal = (i32, i32);

/// Result of clipping a segment against a rect's four half-planes. Entry/exit
/// normals are only meaningful when the input range was unbounded on that side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipHit {
    pub ti1: f64,
    pub ti2: f64,
    pub n1: Normal,
    pub n2: Normal,
}

/// Generalized Liang-Barsky: clip the segment `(x1,y1) -> (x1+dx, y1+dy)`
/// against `rect`'s four half-planes (left, right, top, bottom, in that fixed
/// order), narrowing the caller-supplied range `[ti1, ti2]`. Returns `None`
/// when the segment misses the rect entirely within that range.
pub fn segment_intersect_rect(
    rect: Rect,
    x1: f64,
    y1: f64,
    dx: f64,
    dy: f64,
    ti1: f64,
    ti2: f64,
) -> Option<ClipHit> {
    let mut ti1 = ti1;
    let mut ti2 = ti2;
    let mut n1: Normal = (0, 0);
    let mut n2: Normal = (0, 0);

    // side = (normal, p, q), processed left, right, top, bottom.
    let sides: [(Normal, f64, f64); 4] = [
        ((-1, 0), -dx, x1 - rect.x),
        ((1, 0), dx, rect.x + rect.w - x1),
        ((0, -1), -dy, y1 - rect.y),
        ((0, 1), dy, rect.y + rect.h - y1),
    ];

    for (normal, p, q) in sides {
        if p == 0.0 {
            if q <= 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > ti2 {
                return None;
            }
            if r > ti1 {
                ti1 = r;
                n1 = normal;
            }
        } else {
            if r < ti1 {
                return None;
            }
            if r < ti2 {
                ti2 = r;
                n2 = normal;
            }
        }
    }

    Some(ClipHit { ti1, ti2, n1, n2 })
}

/// Raw narrowphase output before a `Collision` record is assembled with
/// item identities — see `detect_collision`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub overlaps: bool,
    pub ti: f64,
    pub normal: Normal,
    pub touch: (f64, f64),
}

/// Continuous collision between a moving `item` rect and a static `other`
/// rect, given the item's goal position. Two regimes:
///
/// - already overlapping at the start of the step (origin lies strictly
///   inside the Minkowski difference): `ti` is the negative area of the
///   (approximate) intersection, used purely as a deepest-first sort key;
/// - tunneling: clip the segment against the difference with an unbounded
///   range and accept only if the segment actually crosses into the rect
///   before `ti=1` without grazing a corner.
pub fn detect_collision(item: Rect, other: Rect, goal_x: f64, goal_y: f64) -> Option<Hit> {
    let dx = goal_x - item.x;
    let dy = goal_y - item.y;
    let diff = minkowski_diff(item, other);

    if diff.contains_point_margin(0.0, 0.0) {
        let (px, py) = diff.nearest_corner(0.0, 0.0);
        let wi = item.w.min(px.abs());
        let hi = item.h.min(py.abs());
        let ti = -(wi * hi);

        if dx == 0.0 && dy == 0.0 {
            let (nx, ny, tx, ty) = if px.abs() < py.abs() {
                (px.signum() as i32, 0, item.x + px, item.y)
            } else {
                (0, py.signum() as i32, item.x, item.y + py)
            };
            return Some(Hit {
                overlaps: true,
                ti,
                normal: (nx, ny),
                touch: (tx, ty),
            });
        }

        let clip = segment_intersect_rect(diff, 0.0, 0.0, dx, dy, f64::NEG_INFINITY, 1.0)?;
        let touch = (item.x + dx * clip.ti1, item.y + dy * clip.ti1);
        return Some(Hit {
            overlaps: true,
            ti,
            normal: clip.n1,
            touch,
        });
    }

    let clip = segment_intersect_rect(diff, 0.0, 0.0, dx, dy, f64::NEG_INFINITY, f64::INFINITY)?;
    let grazes_corner = (clip.ti1 - clip.ti2).abs() < EPSILON;
    let enters_before_goal = clip.ti1 < 1.0;
    let enters_going_forward = clip.ti1 > -EPSILON || (clip.ti1 == 0.0 && clip.ti2 > 0.0);
    if enters_before_goal && !grazes_corner && enters_going_forward {
        let ti = clip.ti1;
        let touch = (item.x + dx * ti, item.y + dy * ti);
        Some(Hit {
            overlaps: false,
            ti,
            normal: clip.n1,
            touch,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_intersect_rect_basic_hit() {
        let rect = Rect::new(-1.0, -1.0, 2.0, 2.0);
        let hit = segment_intersect_rect(rect, -5.0, 0.0, 10.0, 0.0, 0.0, 1.0).unwrap();
        assert!((hit.ti1 - 0.4).abs() < 1e-9);
        assert_eq!(hit.n1, (-1, 0));
    }

    #[test]
    fn segment_intersect_rect_parallel_miss() {
        let rect = Rect::new(-1.0, -1.0, 2.0, 2.0);
        assert!(segment_intersect_rect(rect, -5.0, 5.0, 10.0, 0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn detect_collision_tunnel_prevention() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(500.0, 0.0, 2.0, 2.0);
        let hit = detect_collision(a, b, 1000.0, 0.0).unwrap();
        assert!(!hit.overlaps);
        assert!((hit.ti - 0.498).abs() < 1e-9);
        assert_eq!(hit.touch, (498.0, 0.0));
    }

    #[test]
    fn detect_collision_slide_wall_tangent() {
        let a = Rect::new(0.0, 0.0, 8.0, 8.0);
        let b = Rect::new(8.0, 0.0, 100.0, 8.0);
        let hit = detect_collision(a, b, 64.0, 4.0).unwrap();
        assert!(!hit.overlaps);
        assert_eq!(hit.ti, 0.0);
        assert_eq!(hit.normal, (-1, 0));
        assert_eq!(hit.touch, (0.0, 0.0));
    }

    #[test]
    fn detect_collision_overlapping_stationary_picks_smaller_axis() {
        // a sits mostly inside b, closer to b's right edge than its bottom edge
        let a = Rect::new(9.0, 0.0, 2.0, 2.0);
        let b = Rect::new(0.0, 0.0, 10.0, 20.0);
        let hit = detect_collision(a, b, 9.0, 0.0).unwrap();
        assert!(hit.overlaps);
        assert!(hit.ti < 0.0);
        assert_eq!(hit.normal.1, 0); // resolved along x, not y
    }

    #[test]
    fn detect_collision_no_overlap_no_tunnel_is_none() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(500.0, 500.0, 2.0, 2.0);
        assert!(detect_collision(a, b, 0.0, 0.0).is_none());
    }

    #[test]
    fn detect_collision_corner_graze_is_rejected() {
        // Moving exactly through the corner of `b`: ti1 == ti2, must be rejected.
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 1.0, 1.0, 1.0);
        let hit = detect_collision(a, b, 2.0, 2.0);
        assert!(hit.is_none());
    }
}
