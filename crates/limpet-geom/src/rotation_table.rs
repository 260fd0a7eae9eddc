//! Quarter/half-turn lookup for side-pinned connectors and center-line angle tracking.
//!
//! Rows are indexed by the side of the stationary rectangle that faces the moving one (the
//! outcode of the moving rectangle relative to the stationary one), columns by the side the
//! connectors currently sit on. Index order is left, top, right, bottom.
//!
//! Every entry is at most a quarter turn. Connectors never swing across their figure in one
//! step: a side opposite the target turns `+π/2` onto an adjacent side first, and a second
//! lookup from there finishes the pass.

use crate::rotate::phase_normalize;
use crate::side::{OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, opposite_side, rect_outcode};
use crate::{E2, EPSILON, Point, Rect, clamp, point};
use std::f64::consts::FRAC_PI_2;

const Q: f64 = FRAC_PI_2;

/// Quarter turn that moves the connected side of the stationary rectangle toward its facing side.
pub const ROTATION_GROUP: [[f64; 4]; 4] = [
    [0.0, -Q, Q, Q],
    [Q, 0.0, -Q, Q],
    [Q, Q, 0.0, -Q],
    [-Q, Q, Q, 0.0],
];

/// Quarter turn that moves the connected side of the moving rectangle toward its facing side,
/// which is the opposite of the stationary rectangle's facing side.
pub const ROTATION_GROUP_2: [[f64; 4]; 4] = [
    [Q, Q, 0.0, -Q],
    [-Q, Q, Q, 0.0],
    [0.0, -Q, Q, Q],
    [Q, 0.0, -Q, Q],
];

/// Table index of a single-side outcode; multi-side (vertex) and empty outcodes have none.
pub fn base_outcode_index(side: i32) -> Option<usize> {
    match side {
        OUT_LEFT => Some(0),
        OUT_TOP => Some(1),
        OUT_RIGHT => Some(2),
        OUT_BOTTOM => Some(3),
        _ => None,
    }
}

fn lookup(table: &[[f64; 4]; 4], stationary_side: i32, connected_side: i32) -> f64 {
    match (
        base_outcode_index(stationary_side),
        base_outcode_index(connected_side),
    ) {
        (Some(row), Some(col)) => table[row][col],
        _ => 0.0,
    }
}

/// Rotation for connectors on `connected_side` of the stationary rectangle after `moving` moved.
///
/// Vertex regions (the moving rectangle is diagonal to the stationary one) and overlapping
/// rectangles return 0: the connectors stay put until a single side faces the other figure.
pub fn calculate_rotation_angle_for_side(connected_side: i32, moving: &Rect, stationary: &Rect) -> f64 {
    lookup(&ROTATION_GROUP, rect_outcode(stationary, moving), connected_side)
}

/// Rotation for connectors on `connected_side` of the moving rectangle itself.
pub fn calculate_rotation_angle_for_moving_side(
    connected_side: i32,
    moving: &Rect,
    stationary: &Rect,
) -> f64 {
    lookup(&ROTATION_GROUP_2, rect_outcode(stationary, moving), connected_side)
}

/// Change of the angle of the line joining both centers between the previous and current bounds.
pub fn calculate_cl_angle_change(r1: &Rect, prev_r1: &Rect, r2: &Rect, prev_r2: &Rect) -> f64 {
    let (c1, p1, c2, p2) = (r1.center(), prev_r1.center(), r2.center(), prev_r2.center());
    let d1 = c1 - p1;
    let d2 = c2 - p2;
    if (d1.x - d2.x).abs() < EPSILON && (d1.y - d2.y).abs() < EPSILON {
        return 0.0;
    }
    let now = c2 - c1;
    let before = p2 - p1;
    if now.square_length() < EPSILON * EPSILON || before.square_length() < EPSILON * EPSILON {
        return 0.0;
    }
    phase_normalize(now.y.atan2(now.x) - before.y.atan2(before.x))
}

/// Single side of `r1` that should face `r2`.
///
/// In a diagonal region `left_right` picks the vertical side; when the rectangles overlap the
/// dominant center offset decides, with `left_right` breaking ties.
pub fn find_preferred_connecting_side(r1: &Rect, r2: &Rect, left_right: bool) -> i32 {
    let code = rect_outcode(r2, r1);
    let horizontal = code & (OUT_LEFT | OUT_RIGHT);
    let vertical = code & (OUT_TOP | OUT_BOTTOM);
    match (horizontal != 0, vertical != 0) {
        (true, false) => opposite_side(horizontal),
        (false, true) => opposite_side(vertical),
        (true, true) => {
            if left_right {
                opposite_side(horizontal)
            } else {
                opposite_side(vertical)
            }
        }
        (false, false) => {
            let d = r2.center() - r1.center();
            let use_x = if (d.x.abs() - d.y.abs()).abs() < EPSILON {
                left_right
            } else {
                d.x.abs() > d.y.abs()
            };
            match (use_x, d.x >= 0.0, d.y >= 0.0) {
                (true, true, _) => OUT_RIGHT,
                (true, false, _) => OUT_LEFT,
                (false, _, true) => OUT_BOTTOM,
                (false, _, false) => OUT_TOP,
            }
        }
    }
}

/// Point on the preferred side of `r1` lined up with `r2`: the middle of the rectangles' shared
/// span on the side's axis, or the position nearest `r2`'s center when they don't share one.
/// The result stays `E2` away from the corners.
pub fn find_preferred_position(r1: &Rect, r2: &Rect, left_right: bool) -> Point {
    let side = find_preferred_connecting_side(r1, r2, left_right);
    let along = |lo1: f64, hi1: f64, lo2: f64, hi2: f64, target: f64| {
        let lo = lo1.max(lo2);
        let hi = hi1.min(hi2);
        let v = if lo <= hi {
            (lo + hi) / 2.0
        } else {
            clamp(target, lo1, hi1)
        };
        clamp(v, lo1 + E2, hi1 - E2)
    };
    let c2 = r2.center();
    match side {
        OUT_LEFT | OUT_RIGHT => {
            let x = if side == OUT_LEFT { r1.min_x() } else { r1.max_x() };
            point(x, along(r1.min_y(), r1.max_y(), r2.min_y(), r2.max_y(), c2.y))
        }
        _ => {
            let y = if side == OUT_TOP { r1.min_y() } else { r1.max_y() };
            point(along(r1.min_x(), r1.max_x(), r2.min_x(), r2.max_x(), c2.x), y)
        }
    }
}
