#![forbid(unsafe_code)]

//! Geometry kernel for connector placement.
//!
//! Everything in this crate is a pure function over `euclid` value types. Degenerate input
//! (zero-size rectangles, zero-length lines) yields `None` or an empty `Vec`; callers pick the
//! fallback.

pub mod boundary;
pub mod intersect;
pub mod rotate;
pub mod rotation_table;
pub mod shape;
pub mod side;
pub mod sub_rect;

pub use boundary::{
    calculate_boundary_point, calculate_boundary_point_thru_bounds_point,
    calculate_boundary_point_thru_center, calculate_chop_point,
};
pub use intersect::{find_intersection_points, solve_cubic, solve_quadratic};
pub use rotate::{
    angle_to_point, phase_normalize, point_to_angle, rotate_ellipse_point,
    rotate_normalized_ellipse_point, rotate_normalized_rect_point, rotate_rect_point,
};
pub use rotation_table::{
    ROTATION_GROUP, ROTATION_GROUP_2, base_outcode_index, calculate_cl_angle_change,
    calculate_rotation_angle_for_moving_side, calculate_rotation_angle_for_side,
    find_preferred_connecting_side, find_preferred_position,
};
pub use shape::{Path, PathSegment, Shape};
pub use side::{
    OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, find_side, is_vertex_point, make_non_vertex,
    on_bottom_side, on_left_side, on_right_side, on_top_side, opposite_side, outcode,
    project_onto_bounds, project_onto_line, rect_outcode, reflect_across_line, reflect_point,
    side_angle,
};
pub use sub_rect::{build_minimum_sub_rectangle, map_into_sub_rectangle, map_sub_rectangle};

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

/// Tolerance for side classification and intersection comparisons.
pub const EPSILON: f64 = 1e-6;
/// Distance a vertex point is moved off a side.
pub const E2: f64 = 1e-4;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    euclid::rect(x, y, width, height)
}

/// A rectangle without area can't host a boundary point.
pub fn is_degenerate(r: &Rect) -> bool {
    !(r.width() > 0.0 && r.height() > 0.0) || !r.width().is_finite() || !r.height().is_finite()
}

pub fn is_square(r: &Rect) -> bool {
    (r.width() - r.height()).abs() < EPSILON
}

pub fn approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

/// Range limit, tolerant of `lo > hi` (returns the midpoint).
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        return (lo + hi) / 2.0;
    }
    v.max(lo).min(hi)
}

/// Clamps a point into a rectangle on both axes.
pub fn clamp_to_rect(p: Point, r: &Rect) -> Point {
    point(
        clamp(p.x, r.min_x(), r.max_x()),
        clamp(p.y, r.min_y(), r.max_y()),
    )
}
