//! Polar mappings and rotations about a rectangle's or ellipse's center.
//!
//! Rotations move a point around the center without projecting it back onto the outline, so a
//! rotation followed by its inverse returns the original point. Callers that need a boundary
//! point project afterwards.

use crate::{EPSILON, Point, Rect, clamp, is_degenerate, is_square, point};
use std::f64::consts::{PI, TAU};

/// Normalizes an angle into `(-PI, PI]`.
pub fn phase_normalize(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Angle of `p` around the center of `r`, measured in the rectangle's own proportions so that
/// `angle_to_point(r, point_to_angle(r, p))` lies on the ray from the center through `p`.
pub fn point_to_angle(r: &Rect, p: Point) -> f64 {
    let c = r.center();
    ((p.y - c.y) * r.width()).atan2((p.x - c.x) * r.height())
}

/// Boundary point of `r` for an angle produced by [`point_to_angle`].
pub fn angle_to_point(r: &Rect, angle: f64) -> Point {
    let si = angle.sin();
    let co = angle.cos();
    let e = 1e-4;
    let w = r.width();
    let h = r.height();

    let x = if si.abs() > e {
        clamp((1.0 + co / si.abs()) / 2.0 * w, 0.0, w)
    } else if co >= 0.0 {
        w
    } else {
        0.0
    };
    let y = if co.abs() > e {
        clamp((1.0 + si / co.abs()) / 2.0 * h, 0.0, h)
    } else if si >= 0.0 {
        h
    } else {
        0.0
    };
    point(r.min_x() + x, r.min_y() + y)
}

fn rotate_about(center: Point, p: Point, angle: f64) -> Point {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let radius = (dx * dx + dy * dy).sqrt();
    if radius < EPSILON {
        return p;
    }
    let theta = dy.atan2(dx) + angle;
    point(center.x + radius * theta.cos(), center.y + radius * theta.sin())
}

/// Distance from the center of `r` to its outline along polar angle `theta`.
fn rect_radius(r: &Rect, theta: f64) -> f64 {
    let (hw, hh) = (r.width() / 2.0, r.height() / 2.0);
    let (cos, sin) = (theta.cos().abs(), theta.sin().abs());
    match (cos > EPSILON, sin > EPSILON) {
        (true, true) => (hw / cos).min(hh / sin),
        (true, false) => hw,
        _ => hh,
    }
}

/// Rotates `p` about the center of `r` by `angle` (radians, y axis down).
///
/// A square turns rigidly. Any other rectangle turns by polar angle: the point keeps its
/// distance relative to the outline along its ray, so outline points stay on the outline.
pub fn rotate_rect_point(angle: f64, r: &Rect, p: Point) -> Point {
    let c = r.center();
    if is_square(r) || is_degenerate(r) {
        return rotate_about(c, p, angle);
    }
    let (dx, dy) = (p.x - c.x, p.y - c.y);
    let radius = (dx * dx + dy * dy).sqrt();
    if radius < EPSILON {
        return p;
    }
    let theta = dy.atan2(dx);
    let ratio = radius / rect_radius(r, theta);
    let turned = theta + angle;
    let new_radius = ratio * rect_radius(r, turned);
    point(c.x + new_radius * turned.cos(), c.y + new_radius * turned.sin())
}

/// Rotates `p` in the unit-square image of `r` and maps the result back.
///
/// Two rectangles of different proportions get the same angular spacing this way. Squares need
/// no normalization and use [`rotate_rect_point`]. Returns `None` for degenerate rectangles.
pub fn rotate_normalized_rect_point(angle: f64, r: &Rect, p: Point) -> Option<Point> {
    if is_degenerate(r) {
        return None;
    }
    if is_square(r) {
        return Some(rotate_rect_point(angle, r, p));
    }
    let c = r.center();
    let u = point((p.x - c.x) / r.width(), (p.y - c.y) / r.height());
    let rotated = rotate_about(point(0.0, 0.0), u, angle);
    Some(point(
        c.x + rotated.x * r.width(),
        c.y + rotated.y * r.height(),
    ))
}

/// Distance from the center to the ellipse inscribed in `r` at polar angle `theta`.
fn ellipse_radius(r: &Rect, theta: f64) -> f64 {
    let a = r.width() / 2.0;
    let b = r.height() / 2.0;
    let (major, minor, phi) = if a >= b {
        (a, b, theta)
    } else {
        (b, a, theta - PI / 2.0)
    };
    if major <= 0.0 {
        return 0.0;
    }
    let ecc2 = 1.0 - (minor * minor) / (major * major);
    let cos = phi.cos();
    minor / (1.0 - ecc2 * cos * cos).sqrt()
}

/// Rotates `p` around the ellipse inscribed in `r`, keeping its radius proportional to the
/// ellipse radius so that outline points stay on the outline.
pub fn rotate_ellipse_point(angle: f64, r: &Rect, p: Point) -> Option<Point> {
    if is_degenerate(r) {
        return None;
    }
    let c = r.center();
    let dx = p.x - c.x;
    let dy = p.y - c.y;
    let radius = (dx * dx + dy * dy).sqrt();
    if radius < EPSILON {
        return Some(p);
    }
    let theta = dy.atan2(dx);
    let ratio = radius / ellipse_radius(r, theta);
    let turned = theta + angle;
    let new_radius = ratio * ellipse_radius(r, turned);
    Some(point(
        c.x + new_radius * turned.cos(),
        c.y + new_radius * turned.sin(),
    ))
}

/// Normalized counterpart of [`rotate_ellipse_point`]: the ellipse is mapped onto the unit
/// circle, rotated there and mapped back.
pub fn rotate_normalized_ellipse_point(angle: f64, r: &Rect, p: Point) -> Option<Point> {
    if is_square(r) {
        return rotate_ellipse_point(angle, r, p);
    }
    rotate_normalized_rect_point(angle, r, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect;

    #[test]
    fn phase_normalize_maps_into_half_open_range() {
        assert!((phase_normalize(-PI) - PI).abs() < 1e-12);
        assert!((phase_normalize(2.5 * PI) - PI / 2.0).abs() < 1e-9);
        assert!((phase_normalize(-1.5 * PI) - PI / 2.0).abs() < 1e-9);
        assert!((phase_normalize(0.5 + TAU) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn angle_to_point_follows_the_ray_through_the_point() {
        let r = rect(0.0, 0.0, 40.0, 10.0);
        let p = point(30.0, 7.0);
        let b = angle_to_point(&r, point_to_angle(&r, p));
        // (20,5) -> (30,7) has slope 0.2; the ray leaves through the right side at y = 5 + 4.
        assert!((b.x - 40.0).abs() < 1e-9);
        assert!((b.y - 9.0).abs() < 1e-9);
    }
}
