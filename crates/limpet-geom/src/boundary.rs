//! Boundary points: nearest intersection, ray from the center, chop points.

use crate::intersect::find_intersection_points;
use crate::rotate::{angle_to_point, phase_normalize, point_to_angle};
use crate::shape::Shape;
use crate::side::{OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, find_side, project_onto_bounds};
use crate::{EPSILON, Point, Rect, approx_eq, distance, is_degenerate, point};
use std::f64::consts::FRAC_PI_2;

/// Intersection of the line `p1`-`p2` with the outline of `shape` nearest to `nearest_to`.
///
/// With `filter_by_direction` only intersections on the `p1 -> p2` side of `p1` qualify (the
/// angle from `p1` must be within a quarter turn of the line's direction); candidates are then
/// ordered by angular deviation and, on ties, by distance. `None` means the line misses.
pub fn calculate_boundary_point(
    shape: &Shape,
    p1: Point,
    p2: Point,
    nearest_to: Point,
    filter_by_direction: bool,
) -> Option<Point> {
    let hits = find_intersection_points(shape, p1, p2);
    if !filter_by_direction {
        return hits.into_iter().min_by(|a, b| {
            distance(*a, nearest_to).total_cmp(&distance(*b, nearest_to))
        });
    }

    let heading = (p2.y - p1.y).atan2(p2.x - p1.x);
    hits.into_iter()
        .filter_map(|q| {
            if approx_eq(q, p1) {
                return Some((0.0, q));
            }
            let deviation = phase_normalize((q.y - p1.y).atan2(q.x - p1.x) - heading).abs();
            (deviation < FRAC_PI_2).then_some((deviation, q))
        })
        .min_by(|(da, a), (db, b)| {
            if (da - db).abs() < EPSILON {
                distance(*a, nearest_to).total_cmp(&distance(*b, nearest_to))
            } else {
                da.total_cmp(db)
            }
        })
        .map(|(_, q)| q)
}

/// Boundary point on the ray from the center of `shape` through `p`.
///
/// Rectangles use the closed-form polar mapping. A `p` at the center picks the middle of the
/// right side. Degenerate shapes yield `None`.
pub fn calculate_boundary_point_thru_center(shape: &Shape, p: Point) -> Option<Point> {
    let bounds = shape.bounds();
    if is_degenerate(&bounds) {
        return None;
    }
    let center = bounds.center();
    let through = if approx_eq(p, center) {
        point(center.x + 1.0, center.y)
    } else {
        p
    };
    match shape {
        Shape::Rect(r) => Some(angle_to_point(r, point_to_angle(r, through))),
        _ => calculate_boundary_point(shape, center, through, through, true),
    }
}

/// Boundary point of `f1` on the line joining the centers of both shapes.
pub fn calculate_chop_point(f1: &Shape, f2: &Shape) -> Option<Point> {
    calculate_boundary_point_thru_center(f1, f2.center())
}

/// Carries a point of the bounds perimeter onto the true outline along the perpendicular of the
/// side it sits on.
///
/// A point on a corner belongs to both a vertical and a horizontal side; `left_right` selects the
/// vertical one. Points off the perimeter are projected onto it first. Falls back to the ray from
/// the center when the perpendicular misses the outline.
pub fn calculate_boundary_point_thru_bounds_point(
    shape: &Shape,
    bounds: &Rect,
    p: Point,
    left_right: bool,
) -> Option<Point> {
    if is_degenerate(bounds) {
        return None;
    }
    let on_bounds = project_onto_bounds(p, bounds);
    if shape.is_rectangular() {
        return Some(on_bounds);
    }
    let side = find_side(on_bounds, bounds);
    let horizontal_side = side & (OUT_TOP | OUT_BOTTOM) != 0;
    let vertical_side = side & (OUT_LEFT | OUT_RIGHT) != 0;
    let use_horizontal_line = match (vertical_side, horizontal_side) {
        (true, true) => left_right,
        (true, false) => true,
        _ => false,
    };
    let other = if use_horizontal_line {
        point(on_bounds.x + 1.0, on_bounds.y)
    } else {
        point(on_bounds.x, on_bounds.y + 1.0)
    };
    calculate_boundary_point(shape, on_bounds, other, on_bounds, false)
        .or_else(|| calculate_boundary_point_thru_center(shape, on_bounds))
}
