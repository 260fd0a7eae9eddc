//! Side-pinned connectors.
//!
//! An edge connector lives on one side of its owner's bounds. When the figures move past each
//! other so that a different single side faces the other figure, every connector of the group
//! turns onto the new facing side, one quarter turn per table step. The turn happens about a minimum
//! sub-rectangle shared by both figures so that the spacing between connectors changes by the
//! same amount on each.

use std::f64::consts::FRAC_PI_2;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coordinator::{Compatibility, ConnectorCoordinator};
use crate::error::Result;
use crate::geom::{
    EPSILON, OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, Point, Rect, Shape, base_outcode_index,
    build_minimum_sub_rectangle, calculate_rotation_angle_for_moving_side,
    calculate_rotation_angle_for_side, clamp_to_rect, find_preferred_connecting_side,
    make_non_vertex, map_into_sub_rectangle, map_sub_rectangle,
    phase_normalize, point, project_onto_bounds, rect, rect_outcode,
    rotate_normalized_rect_point, side_angle,
};
use crate::model::{ConnectorRef, FigureId, FigureModel};
use crate::options::StrategyOptions;
use crate::strategy::base::{self, is_left_right};
use crate::strategy::{ConnectorStrategy, EDGE, Strategy};
use crate::tracker::PreviousBoundsTracker;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStrategy {
    #[serde(default)]
    pub options: StrategyOptions,
}

/// Side reached by turning `side` by `angle`.
fn rotated_side(side: i32, angle: f64) -> Option<i32> {
    let target = phase_normalize(side_angle(side)? + angle);
    [OUT_LEFT, OUT_TOP, OUT_RIGHT, OUT_BOTTOM]
        .into_iter()
        .find(|s| {
            side_angle(*s)
                .map(|a| phase_normalize(a - target).abs() < EPSILON)
                .unwrap_or(false)
        })
}

/// Chains quarter-turn lookups from `side` until the lookup reports no further turn. Returns the
/// side reached and the summed angle, or `None` when the side does not turn at all.
fn turn_toward_facing(side: i32, angle_for: impl Fn(i32) -> f64) -> Option<(i32, f64)> {
    let (mut target, mut angle) = (side, 0.0);
    // An opposite side needs two quarter turns; an adjacent one needs one.
    for _ in 0..2 {
        let step = angle_for(target);
        if step == 0.0 {
            break;
        }
        target = rotated_side(target, step)?;
        angle += step;
    }
    (angle != 0.0).then_some((target, phase_normalize(angle)))
}

/// A single side of `stationary` faces `moving` now, and it is not the side that faced it
/// before.
fn facing_side_changed(stationary: &Rect, moving: &Rect, prev_stationary: &Rect, prev_moving: &Rect) -> bool {
    let now = rect_outcode(stationary, moving);
    base_outcode_index(now).is_some() && now != rect_outcode(prev_stationary, prev_moving)
}

impl EdgeStrategy {
    /// Point on `side` of `bounds` at coordinate `along`, kept off the corners and carried onto
    /// the outline.
    fn place_on_side(&self, shape: &Shape, bounds: &Rect, side: i32, along: f64) -> Point {
        let p = match side {
            OUT_LEFT => point(bounds.min_x(), along),
            OUT_RIGHT => point(bounds.max_x(), along),
            OUT_TOP => point(along, bounds.min_y()),
            _ => point(along, bounds.max_y()),
        };
        let left_right = is_left_right(side);
        let p = make_non_vertex(clamp_to_rect(p, bounds), bounds, left_right, true);
        base::onto_outline(shape, bounds, p, left_right)
    }

    fn along(side: i32, p: Point) -> f64 {
        if is_left_right(side) { p.y } else { p.x }
    }

    fn rotate_side_groups(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        own: &Rect,
        other: &Rect,
        angle_for: impl Fn(i32) -> f64,
    ) -> Result<()> {
        let prefer = self.options.prefer_left_right;
        let mut sides: IndexMap<i32, Vec<(ConnectorRef, Point)>> = IndexMap::new();
        for &at in group {
            let p = co.point(at)?;
            sides
                .entry(base::side_of(own, p, prefer))
                .or_default()
                .push((at, project_onto_bounds(p, own)));
        }

        for (side, members) in sides {
            let Some((target, angle)) = turn_toward_facing(side, &angle_for) else {
                continue;
            };
            let refs: Vec<ConnectorRef> = members.iter().map(|(at, _)| *at).collect();
            let (min_x, min_y, max_x, max_y) = co.find_max_min_connector_points(&refs)?;
            let span = rect(min_x, min_y, max_x - min_x, max_y - min_y);
            let sub = build_minimum_sub_rectangle(own, other, Some(&span));
            tracing::debug!(side, target, angle, ?sub, count = refs.len(), "turning edge connectors");

            let shape = co.effective_shape(refs[0])?;
            for (at, on_bounds) in members {
                let inside = map_into_sub_rectangle(own, &sub, on_bounds);
                let Some(turned) = rotate_normalized_rect_point(angle, &sub, inside) else {
                    tracing::debug!(?at, ?sub, "degenerate sub-rectangle, connector not turned");
                    continue;
                };
                let back = map_sub_rectangle(
                    &sub,
                    own,
                    project_onto_bounds(turned, &sub),
                    is_left_right(target),
                );
                let placed = self.place_on_side(&shape, own, target, Self::along(target, back));
                co.set_point(at, placed)?;
            }
        }
        Ok(())
    }

    fn group_figures(
        co: &ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
    ) -> Result<Option<(FigureId, FigureId)>> {
        let Some(&first) = group.first() else {
            return Ok(None);
        };
        let owner = co.connector(first)?.owner;
        let other = co.connector(first.opposite())?.owner;
        Ok(Some((owner, other)))
    }
}

impl ConnectorStrategy for EdgeStrategy {
    fn name(&self) -> &'static str {
        EDGE
    }

    fn options(&self) -> StrategyOptions {
        self.options
    }

    /// Projects the candidate onto the nearest side of the bounds; that side becomes the
    /// connector's side.
    fn derive_point(
        &self,
        co: &ConnectorCoordinator<'_>,
        at: ConnectorRef,
        candidate: Point,
    ) -> Result<Point> {
        let bounds = co.bounds_of(at)?;
        let shape = co.effective_shape(at)?;
        let on_bounds = project_onto_bounds(candidate, &bounds);
        let side = base::side_of(&bounds, on_bounds, self.options.prefer_left_right);
        Ok(self.place_on_side(&shape, &bounds, side, Self::along(side, on_bounds)))
    }

    /// The side facing the other figure, at the candidate's position along that side.
    fn find_connector_point_new_connection(
        &self,
        model: &dyn FigureModel,
        owner: FigureId,
        opposite_owner: FigureId,
        candidate: Point,
    ) -> Option<Point> {
        let (bounds, shape) = base::owner_geometry(self, model, owner)?;
        if !shape.contains(candidate) {
            return None;
        }
        let other = model.bounds(opposite_owner)?;
        let side = find_preferred_connecting_side(&bounds, &other, self.options.prefer_left_right);
        Some(self.place_on_side(&shape, &bounds, side, Self::along(side, candidate)))
    }

    /// Slides along the current side only.
    fn slide_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        from: Point,
        to: Point,
    ) -> Result<Point> {
        let bounds = co.bounds_of(at)?;
        let shape = co.effective_shape(at)?;
        let current = co.point(at)?;
        let side = base::side_of(&bounds, current, self.options.prefer_left_right);
        let moved = project_onto_bounds(current, &bounds) + (to - from);
        let placed = self.place_on_side(&shape, &bounds, side, Self::along(side, moved));
        let stored = co.set_point(at, placed)?;
        base::after_point_change(co, at)?;
        Ok(stored)
    }

    fn adjust_connectors_for_moving(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        let Some((owner, other)) = Self::group_figures(co, group)? else {
            return Ok(());
        };
        let moving = co.owner_bounds(owner)?;
        let stationary = co.owner_bounds(other)?;
        if !facing_side_changed(
            &stationary,
            &moving,
            &tracker.previous_or(other, stationary),
            &tracker.previous_or(owner, moving),
        ) {
            return Ok(());
        }
        self.rotate_side_groups(co, group, &moving, &stationary, |side| {
            calculate_rotation_angle_for_moving_side(side, &moving, &stationary)
        })
    }

    fn adjust_connectors_for_moving_opposite(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        let Some((owner, other)) = Self::group_figures(co, group)? else {
            return Ok(());
        };
        let stationary = co.owner_bounds(owner)?;
        let moving = co.owner_bounds(other)?;
        if !facing_side_changed(
            &stationary,
            &moving,
            &tracker.previous_or(owner, stationary),
            &tracker.previous_or(other, moving),
        ) {
            return Ok(());
        }
        self.rotate_side_groups(co, group, &stationary, &moving, |side| {
            calculate_rotation_angle_for_side(side, &moving, &stationary)
        })
    }

    /// Keeps the side and the relative position along it.
    fn adjust_connector_for_resizing(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        previous: &Rect,
    ) -> Result<()> {
        let local = co.connector(at)?.local;
        let bounds = co.bounds_of(at)?;
        let shape = co.effective_shape(at)?;
        let old = previous.origin + local;
        let side = base::side_of(previous, old, self.options.prefer_left_right);
        let scaled = base::scale_into(previous, &bounds, project_onto_bounds(old, previous));
        co.set_point(at, self.place_on_side(&shape, &bounds, side, Self::along(side, scaled)))?;
        base::modify_opposite_connection_point_multi(co, at)
    }

    /// Turns by the nearest whole number of quarter turns.
    fn rotate_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        angle: f64,
    ) -> Result<()> {
        let quarters = (phase_normalize(angle) / FRAC_PI_2).round();
        if quarters == 0.0 {
            return Ok(());
        }
        let turn = phase_normalize(quarters * FRAC_PI_2);
        let bounds = co.bounds_of(at)?;
        let shape = co.effective_shape(at)?;
        let current = project_onto_bounds(co.point(at)?, &bounds);
        let side = base::side_of(&bounds, current, self.options.prefer_left_right);
        let (Some(target), Some(turned)) = (
            rotated_side(side, turn),
            rotate_normalized_rect_point(turn, &bounds, current),
        ) else {
            tracing::debug!(?at, ?bounds, "edge connector not rotated");
            return Ok(());
        };
        co.set_point(at, self.place_on_side(&shape, &bounds, target, Self::along(target, turned)))?;
        Ok(())
    }

    fn compatible_with_new_opposite_strategy(&self, opposite: &Strategy) -> Compatibility {
        match opposite {
            Strategy::Rotational(_) => Compatibility::NeedsConfirmation(vec![
                "edge connectors turn in quarter steps while rotational connectors turn \
                 continuously, so the two ends may disagree about which sides face each other"
                    .to_string(),
            ]),
            _ => Compatibility::Compatible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn rotated_side_follows_quarter_and_half_turns() {
        assert_eq!(rotated_side(OUT_RIGHT, FRAC_PI_2), Some(OUT_BOTTOM));
        assert_eq!(rotated_side(OUT_LEFT, FRAC_PI_2), Some(OUT_TOP));
        assert_eq!(rotated_side(OUT_TOP, PI), Some(OUT_BOTTOM));
        assert_eq!(rotated_side(OUT_LEFT | OUT_TOP, PI), None);
    }

    #[test]
    fn opposite_sides_turn_in_two_quarter_steps() {
        let stationary = rect(100.0, 0.0, 50.0, 50.0);
        let moving = rect(0.0, 0.0, 50.0, 50.0);
        let angle_for = |side| calculate_rotation_angle_for_side(side, &moving, &stationary);
        let (target, angle) = turn_toward_facing(OUT_RIGHT, angle_for).unwrap();
        assert_eq!(target, OUT_LEFT);
        assert!((angle.abs() - PI).abs() < 1e-12);
        assert_eq!(
            turn_toward_facing(OUT_TOP, angle_for),
            Some((OUT_LEFT, -FRAC_PI_2))
        );
        assert_eq!(turn_toward_facing(OUT_LEFT, angle_for), None);
    }

    #[test]
    fn facing_side_change_requires_a_single_side() {
        let stationary = rect(100.0, 0.0, 50.0, 50.0);
        let left = rect(0.0, 0.0, 50.0, 50.0);
        let right = rect(200.0, 0.0, 50.0, 50.0);
        let diagonal = rect(200.0, 100.0, 50.0, 50.0);
        assert!(facing_side_changed(&stationary, &right, &stationary, &left));
        assert!(!facing_side_changed(&stationary, &right, &stationary, &right));
        assert!(!facing_side_changed(&stationary, &diagonal, &stationary, &left));
    }
}
