//! Minimum sub-rectangle used to rotate side-pinned connectors of two figures by the same amount.

use crate::side::{OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, find_side, project_onto_bounds};
use crate::{Point, Rect, clamp, clamp_to_rect, point, rect};

/// Builds a rectangle of the smaller width and the smaller height of `own` and `other`, placed
/// inside `own`.
///
/// The placement centers the sub-rectangle on `span` (the extent of the connectors being
/// rotated) and clamps it into `own`, so connectors on one side end up on the matching side of
/// the sub-rectangle. Without a span it is centered in `own`.
pub fn build_minimum_sub_rectangle(own: &Rect, other: &Rect, span: Option<&Rect>) -> Rect {
    let w = own.width().min(other.width()).max(0.0);
    let h = own.height().min(other.height()).max(0.0);
    let target = span.map(|s| s.center()).unwrap_or_else(|| own.center());
    let cx = clamp(target.x, own.min_x() + w / 2.0, own.max_x() - w / 2.0);
    let cy = clamp(target.y, own.min_y() + h / 2.0, own.max_y() - h / 2.0);
    rect(cx - w / 2.0, cy - h / 2.0, w, h)
}

/// Carries a point of `parent`'s outline onto the matching side of `sub`.
///
/// The coordinate along the side is clamped into the sub-rectangle. Points that sit on no side
/// of `parent` are projected onto the nearest side of `sub`.
pub fn map_into_sub_rectangle(parent: &Rect, sub: &Rect, p: Point) -> Point {
    let side = find_side(p, parent);
    if side == 0 {
        return project_onto_bounds(clamp_to_rect(p, sub), sub);
    }
    let mut out = clamp_to_rect(p, sub);
    if side & OUT_LEFT != 0 {
        out.x = sub.min_x();
    } else if side & OUT_RIGHT != 0 {
        out.x = sub.max_x();
    }
    if side & OUT_TOP != 0 {
        out.y = sub.min_y();
    } else if side & OUT_BOTTOM != 0 {
        out.y = sub.max_y();
    }
    out
}

/// Translates a point of `sub`'s outline onto the same side of `parent`.
///
/// Only the coordinate across the side changes. A point on a corner of `sub` is moved with its
/// left/right side when `left_right` is set and with its top/bottom side otherwise.
pub fn map_sub_rectangle(sub: &Rect, parent: &Rect, p: Point, left_right: bool) -> Point {
    let side = find_side(p, sub);
    let horizontal = side & (OUT_LEFT | OUT_RIGHT);
    let vertical = side & (OUT_TOP | OUT_BOTTOM);
    let mut out = p;
    if horizontal != 0 && (vertical == 0 || left_right) {
        out.x = if horizontal & OUT_LEFT != 0 {
            parent.min_x()
        } else {
            parent.max_x()
        };
    } else if vertical != 0 {
        out.y = if vertical & OUT_TOP != 0 {
            parent.min_y()
        } else {
            parent.max_y()
        };
    }
    point(
        clamp(out.x, parent.min_x(), parent.max_x()),
        clamp(out.y, parent.min_y(), parent.max_y()),
    )
}
