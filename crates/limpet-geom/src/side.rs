//! Side classification (outcodes), vertex detection, projection and reflection.

use crate::{E2, EPSILON, Point, Rect, clamp, point};
use std::f64::consts::{FRAC_PI_2, PI};

pub const OUT_LEFT: i32 = 1;
pub const OUT_TOP: i32 = 2;
pub const OUT_RIGHT: i32 = 4;
pub const OUT_BOTTOM: i32 = 8;

pub fn on_left_side(x: f64, r: &Rect) -> bool {
    (x - r.min_x()).abs() < EPSILON
}

pub fn on_right_side(x: f64, r: &Rect) -> bool {
    (x - r.max_x()).abs() < EPSILON
}

pub fn on_top_side(y: f64, r: &Rect) -> bool {
    (y - r.min_y()).abs() < EPSILON
}

pub fn on_bottom_side(y: f64, r: &Rect) -> bool {
    (y - r.max_y()).abs() < EPSILON
}

/// Bitmask of every side of `r` that `p` lies on (within `EPSILON`).
pub fn find_side(p: Point, r: &Rect) -> i32 {
    let mut side = 0;
    if on_left_side(p.x, r) {
        side |= OUT_LEFT;
    }
    if on_right_side(p.x, r) {
        side |= OUT_RIGHT;
    }
    if on_top_side(p.y, r) {
        side |= OUT_TOP;
    }
    if on_bottom_side(p.y, r) {
        side |= OUT_BOTTOM;
    }
    side
}

/// True when `p` is on a left/right side and a top/bottom side at once.
pub fn is_vertex_point(p: Point, r: &Rect) -> bool {
    (on_left_side(p.x, r) || on_right_side(p.x, r))
        && (on_top_side(p.y, r) || on_bottom_side(p.y, r))
}

/// Moves a vertex point off one of its two sides.
///
/// With `on_left_right == keep_side` the point keeps its left/right classification and slides
/// along the vertical side; otherwise it keeps top/bottom and slides horizontally. The move is
/// exactly `E2 - EPSILON`, which puts the point outside the `EPSILON` band of the side it leaves.
/// Points that are not vertex points are returned unchanged.
pub fn make_non_vertex(p: Point, r: &Rect, on_left_right: bool, keep_side: bool) -> Point {
    if !is_vertex_point(p, r) {
        return p;
    }
    let nudge = E2 - EPSILON;
    if on_left_right == keep_side {
        let y = if r.height() <= 2.0 * E2 {
            r.center().y
        } else if on_top_side(p.y, r) {
            p.y + nudge
        } else {
            p.y - nudge
        };
        point(p.x, y)
    } else {
        let x = if r.width() <= 2.0 * E2 {
            r.center().x
        } else if on_left_side(p.x, r) {
            p.x + nudge
        } else {
            p.x - nudge
        };
        point(x, p.y)
    }
}

/// Position of a point relative to a rectangle: the sides it lies beyond.
pub fn outcode(r: &Rect, p: Point) -> i32 {
    let mut code = 0;
    if p.x < r.min_x() {
        code |= OUT_LEFT;
    } else if p.x > r.max_x() {
        code |= OUT_RIGHT;
    }
    if p.y < r.min_y() {
        code |= OUT_TOP;
    } else if p.y > r.max_y() {
        code |= OUT_BOTTOM;
    }
    code
}

/// Sides of `stationary` beyond which `moving` lies entirely. Overlap on an axis contributes
/// nothing for that axis, so overlapping rectangles yield 0.
pub fn rect_outcode(stationary: &Rect, moving: &Rect) -> i32 {
    let mut code = 0;
    if moving.max_x() <= stationary.min_x() + EPSILON {
        code |= OUT_LEFT;
    } else if moving.min_x() >= stationary.max_x() - EPSILON {
        code |= OUT_RIGHT;
    }
    if moving.max_y() <= stationary.min_y() + EPSILON {
        code |= OUT_TOP;
    } else if moving.min_y() >= stationary.max_y() - EPSILON {
        code |= OUT_BOTTOM;
    }
    code
}

pub fn opposite_side(side: i32) -> i32 {
    let mut out = 0;
    if side & OUT_LEFT != 0 {
        out |= OUT_RIGHT;
    }
    if side & OUT_RIGHT != 0 {
        out |= OUT_LEFT;
    }
    if side & OUT_TOP != 0 {
        out |= OUT_BOTTOM;
    }
    if side & OUT_BOTTOM != 0 {
        out |= OUT_TOP;
    }
    out
}

/// Direction of a single side's outward normal, y axis pointing down.
pub fn side_angle(side: i32) -> Option<f64> {
    match side {
        OUT_RIGHT => Some(0.0),
        OUT_BOTTOM => Some(FRAC_PI_2),
        OUT_LEFT => Some(PI),
        OUT_TOP => Some(-FRAC_PI_2),
        _ => None,
    }
}

/// Orthogonal projection of `p` onto the infinite line through `a` and `b`.
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len2 = ab.square_length();
    if len2 <= 0.0 {
        return a;
    }
    a + ab * ((p - a).dot(ab) / len2)
}

/// Nearest point on the perimeter of `r`.
pub fn project_onto_bounds(p: Point, r: &Rect) -> Point {
    let inside = p.x > r.min_x() && p.x < r.max_x() && p.y > r.min_y() && p.y < r.max_y();
    if !inside {
        return point(
            clamp(p.x, r.min_x(), r.max_x()),
            clamp(p.y, r.min_y(), r.max_y()),
        );
    }
    let d_left = p.x - r.min_x();
    let d_right = r.max_x() - p.x;
    let d_top = p.y - r.min_y();
    let d_bottom = r.max_y() - p.y;
    let min = d_left.min(d_right).min(d_top).min(d_bottom);
    if min == d_left {
        point(r.min_x(), p.y)
    } else if min == d_right {
        point(r.max_x(), p.y)
    } else if min == d_top {
        point(p.x, r.min_y())
    } else {
        point(p.x, r.max_y())
    }
}

/// Point reflection through `about`.
pub fn reflect_point(p: Point, about: Point) -> Point {
    point(2.0 * about.x - p.x, 2.0 * about.y - p.y)
}

/// Mirror image of `p` across the line through `a` and `b`.
pub fn reflect_across_line(p: Point, a: Point, b: Point) -> Point {
    reflect_point(p, project_onto_line(p, a, b))
}
