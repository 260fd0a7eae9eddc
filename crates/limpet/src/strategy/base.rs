//! Behavior shared by every strategy unless it overrides it.

use crate::coordinator::ConnectorCoordinator;
use crate::error::Result;
use crate::geom::{
    OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, Point, Rect, Shape, Vector,
    calculate_boundary_point, calculate_boundary_point_thru_bounds_point,
    calculate_boundary_point_thru_center, clamp_to_rect, find_side, is_degenerate,
    make_non_vertex, point, project_onto_bounds, rotate_normalized_ellipse_point,
    rotate_normalized_rect_point, vector,
};
use crate::model::{ConnectorRef, FigureId, FigureModel};
use crate::strategy::{ConnectorStrategy, Modifiers};

/// Single side of `bounds` that `p` belongs to after projecting it onto the bounds.
///
/// Points of a non-rectangular outline are classified by the rectangle side they project to. A
/// corner resolves to its left/right side when `prefer_left_right` is set.
pub fn side_of(bounds: &Rect, p: Point, prefer_left_right: bool) -> i32 {
    let side = find_side(project_onto_bounds(p, bounds), bounds);
    let horizontal = side & (OUT_LEFT | OUT_RIGHT);
    let vertical = side & (OUT_TOP | OUT_BOTTOM);
    match (horizontal, vertical) {
        (0, v) => v,
        (h, 0) => h,
        (h, v) => {
            if prefer_left_right {
                h
            } else {
                v
            }
        }
    }
}

pub fn is_left_right(side: i32) -> bool {
    side & (OUT_LEFT | OUT_RIGHT) != 0
}

pub fn avoid_vertex<S>(strategy: &S, bounds: &Rect, p: Point) -> Point
where
    S: ConnectorStrategy + ?Sized,
{
    if strategy.permits_vertex_points() {
        return p;
    }
    make_non_vertex(p, bounds, true, strategy.options().prefer_left_right)
}

/// Carries a point of the bounds perimeter onto `shape`.
pub fn onto_outline(shape: &Shape, bounds: &Rect, on_bounds: Point, left_right: bool) -> Point {
    if shape.is_rectangular() {
        return on_bounds;
    }
    calculate_boundary_point_thru_bounds_point(shape, bounds, on_bounds, left_right)
        .unwrap_or(on_bounds)
}

/// Nearest outline point for a candidate anywhere near the owner.
pub fn boundary_point<S>(strategy: &S, shape: &Shape, bounds: &Rect, candidate: Point) -> Point
where
    S: ConnectorStrategy + ?Sized,
{
    if is_degenerate(bounds) {
        tracing::debug!(?bounds, "degenerate owner bounds, clamping connector point");
        return clamp_to_rect(candidate, bounds);
    }
    let prefer = strategy.options().prefer_left_right;
    let on_bounds = avoid_vertex(strategy, bounds, project_onto_bounds(candidate, bounds));
    let p = onto_outline(shape, bounds, on_bounds, prefer);
    avoid_vertex(strategy, bounds, p)
}

pub fn find_connector_point<S>(
    strategy: &S,
    co: &ConnectorCoordinator<'_>,
    at: ConnectorRef,
    owner: FigureId,
    candidate: Point,
) -> Result<Point>
where
    S: ConnectorStrategy + ?Sized,
{
    let current = co.point(at)?;
    if co.connector(at)?.owner != owner {
        tracing::debug!(?at, %owner, "candidate offered for another owner");
        return Ok(current);
    }
    if !co.effective_shape(at)?.contains(candidate) {
        return Ok(current);
    }
    let bounds = co.bounds_of(at)?;
    Ok(clamp_to_rect(
        strategy.derive_point(co, at, candidate)?,
        &bounds,
    ))
}

/// Boundary point for a new connection end; the candidate must lie on or inside the owner.
pub fn new_connection_point<S>(
    strategy: &S,
    model: &dyn FigureModel,
    owner: FigureId,
    _opposite_owner: FigureId,
    candidate: Point,
) -> Option<Point>
where
    S: ConnectorStrategy + ?Sized,
{
    let (bounds, shape) = owner_geometry(strategy, model, owner)?;
    if !shape.contains(candidate) {
        tracing::debug!(%owner, ?candidate, "new connection point outside its owner");
        return None;
    }
    Some(boundary_point(strategy, &shape, &bounds, candidate))
}

/// Bounds and effective shape of a figure, `None` when it is missing or degenerate.
pub fn owner_geometry<S>(strategy: &S, model: &dyn FigureModel, owner: FigureId) -> Option<(Rect, Shape)>
where
    S: ConnectorStrategy + ?Sized,
{
    let bounds = model.bounds(owner)?;
    if is_degenerate(&bounds) {
        return None;
    }
    let shape = if strategy.is_bounds_mode() {
        Shape::Rect(bounds)
    } else {
        model
            .connectible_shape(owner)
            .unwrap_or(Shape::Rect(bounds))
    };
    Some((bounds, shape))
}

pub fn touch_connector<S>(
    strategy: &S,
    co: &mut ConnectorCoordinator<'_>,
    at: ConnectorRef,
    p: Point,
) -> Result<Point>
where
    S: ConnectorStrategy + ?Sized,
{
    let owner = co.connector(at)?.owner;
    let found = strategy.find_connector_point(co, at, owner, p)?;
    let stored = co.set_point(at, found)?;
    after_point_change(co, at)?;
    Ok(stored)
}

/// Shift keeps only the dominant axis of a drag.
pub fn constrain_delta(delta: Vector, shift: bool) -> Vector {
    if !shift {
        return delta;
    }
    if delta.x.abs() >= delta.y.abs() {
        vector(delta.x, 0.0)
    } else {
        vector(0.0, delta.y)
    }
}

pub fn drag_connector<S>(
    strategy: &S,
    co: &mut ConnectorCoordinator<'_>,
    at: ConnectorRef,
    from: Point,
    to: Point,
    modifiers: Modifiers,
) -> Result<Point>
where
    S: ConnectorStrategy + ?Sized,
{
    if modifiers.alt {
        return strategy.slide_connector(co, at, from, to);
    }
    let delta = constrain_delta(to - from, modifiers.shift);
    let candidate = co.point(at)? + delta;
    let derived = strategy.derive_point(co, at, candidate)?;
    let stored = co.set_point(at, derived)?;
    after_point_change(co, at)?;
    Ok(stored)
}

/// Moves the connector along the outline, following the ray from the center through the
/// dragged position.
pub fn slide_connector<S>(
    strategy: &S,
    co: &mut ConnectorCoordinator<'_>,
    at: ConnectorRef,
    from: Point,
    to: Point,
) -> Result<Point>
where
    S: ConnectorStrategy + ?Sized,
{
    let current = co.point(at)?;
    let bounds = co.bounds_of(at)?;
    let shape = co.effective_shape(at)?;
    let target = current + (to - from);
    let slid = calculate_boundary_point_thru_center(&shape, target).unwrap_or_else(|| {
        tracing::debug!(?at, "no outline to slide along, keeping connector point");
        current
    });
    let stored = co.set_point(at, avoid_vertex(strategy, &bounds, slid))?;
    after_point_change(co, at)?;
    Ok(stored)
}

/// Keeps the neighbor of a multi-point connector aligned to the connector's axis: it takes the
/// connector's x on a left/right side and its y on a top/bottom side.
pub fn modify_opposite_connection_point_multi(
    co: &mut ConnectorCoordinator<'_>,
    at: ConnectorRef,
) -> Result<()> {
    let connection = co.connection(at.connection)?;
    if !connection.is_multi_point() {
        return Ok(());
    }
    let mut neighbor = connection.neighbor(at.end);
    let p = co.point(at)?;
    let bounds = co.bounds_of(at)?;
    let prefer = co.connector(at)?.strategy.options().prefer_left_right;
    let side = side_of(&bounds, p, prefer);
    if is_left_right(side) {
        neighbor.x = p.x;
    } else if side != 0 {
        neighbor.y = p.y;
    } else {
        return Ok(());
    }
    co.set_neighbor(at, neighbor)
}

/// Neighbor alignment plus the single-fire symmetric adjustment.
pub fn after_point_change(co: &mut ConnectorCoordinator<'_>, at: ConnectorRef) -> Result<()> {
    modify_opposite_connection_point_multi(co, at)?;
    co.apply_symmetric_adjustments()
}

/// Keeps a connector attached after its owner was resized.
///
/// The point before the resize is intersected with the outline along the line toward the
/// opposite end (or the neighbor point of a multi-point connection), falling back to the ray
/// from the center. A self-connection instead keeps its relative position in the bounds.
pub fn preserve_connection<S>(
    strategy: &S,
    co: &mut ConnectorCoordinator<'_>,
    at: ConnectorRef,
    previous: &Rect,
) -> Result<()>
where
    S: ConnectorStrategy + ?Sized,
{
    let connector = *co.connector(at)?;
    let bounds = co.bounds_of(at)?;
    let shape = co.effective_shape(at)?;
    let old = previous.origin + connector.local;
    let connection = co.connection(at.connection)?;
    let preserved = if connection.is_self_connection() {
        let relative = scale_into(previous, &bounds, old);
        boundary_point(strategy, &shape, &bounds, relative)
    } else {
        let toward = if connection.is_multi_point() {
            connection.neighbor(at.end)
        } else {
            co.point(at.opposite())?
        };
        calculate_boundary_point(&shape, old, toward, old, false)
            .or_else(|| {
                tracing::debug!(?at, "no intersection toward the opposite end, using the center ray");
                calculate_boundary_point_thru_center(&shape, old)
            })
            .unwrap_or_else(|| clamp_to_rect(old, &bounds))
    };
    co.set_point(at, avoid_vertex(strategy, &bounds, preserved))?;
    modify_opposite_connection_point_multi(co, at)
}

/// Position with the same fractions of `to` as `p` has of `from`.
pub fn scale_into(from: &Rect, to: &Rect, p: Point) -> Point {
    let fx = if from.width() > 0.0 {
        (p.x - from.min_x()) / from.width()
    } else {
        0.5
    };
    let fy = if from.height() > 0.0 {
        (p.y - from.min_y()) / from.height()
    } else {
        0.5
    };
    point(to.min_x() + fx * to.width(), to.min_y() + fy * to.height())
}

/// Rotates a point about the owner in normalized space and puts it back on the outline.
pub fn rotate_about_owner<S>(
    strategy: &S,
    shape: &Shape,
    bounds: &Rect,
    angle: f64,
    p: Point,
) -> Option<Point>
where
    S: ConnectorStrategy + ?Sized,
{
    let rotated = match shape {
        Shape::Ellipse(_) => rotate_normalized_ellipse_point(angle, bounds, p)?,
        _ => rotate_normalized_rect_point(angle, bounds, p)?,
    };
    let on_outline = calculate_boundary_point_thru_center(shape, rotated)?;
    Some(avoid_vertex(strategy, bounds, on_outline))
}

pub fn rotate_on_outline<S>(
    strategy: &S,
    co: &mut ConnectorCoordinator<'_>,
    at: ConnectorRef,
    angle: f64,
) -> Result<()>
where
    S: ConnectorStrategy + ?Sized,
{
    let bounds = co.bounds_of(at)?;
    let shape = co.effective_shape(at)?;
    let p = co.point(at)?;
    match rotate_about_owner(strategy, &shape, &bounds, angle, p) {
        Some(rotated) => {
            co.set_point(at, rotated)?;
        }
        None => tracing::debug!(?at, ?bounds, "degenerate owner, connector not rotated"),
    }
    Ok(())
}
