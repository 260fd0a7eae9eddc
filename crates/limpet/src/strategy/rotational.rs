use serde::{Deserialize, Serialize};

use crate::coordinator::ConnectorCoordinator;
use crate::error::Result;
use crate::geom::{EPSILON, Point, calculate_cl_angle_change};
use crate::model::ConnectorRef;
use crate::options::StrategyOptions;
use crate::strategy::{ConnectorStrategy, ROTATIONAL, base};
use crate::tracker::PreviousBoundsTracker;

/// Connectors turn with the line between both figures' centers and may end up on any side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationalStrategy {
    #[serde(default)]
    pub options: StrategyOptions,
}

impl RotationalStrategy {
    /// Turns every connector of a group by the change of the center-line angle, measured from the
    /// group's owner toward the figure at the other end.
    fn follow_center_line(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        let Some(&first) = group.first() else {
            return Ok(());
        };
        let owner = co.connector(first)?.owner;
        let other = co.connector(first.opposite())?.owner;
        let own_now = co.owner_bounds(owner)?;
        let other_now = co.owner_bounds(other)?;
        let angle = calculate_cl_angle_change(
            &own_now,
            &tracker.previous_or(owner, own_now),
            &other_now,
            &tracker.previous_or(other, other_now),
        );
        if angle.abs() < EPSILON {
            return Ok(());
        }
        tracing::debug!(%owner, %other, angle, count = group.len(), "turning rotational connectors");
        for at in group {
            base::rotate_on_outline(self, co, *at, angle)?;
        }
        Ok(())
    }
}

impl ConnectorStrategy for RotationalStrategy {
    fn name(&self) -> &'static str {
        ROTATIONAL
    }

    fn options(&self) -> StrategyOptions {
        self.options
    }

    fn derive_point(
        &self,
        co: &ConnectorCoordinator<'_>,
        at: ConnectorRef,
        candidate: Point,
    ) -> Result<Point> {
        let bounds = co.bounds_of(at)?;
        let shape = co.effective_shape(at)?;
        Ok(base::boundary_point(self, &shape, &bounds, candidate))
    }

    fn adjust_connectors_for_moving(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        self.follow_center_line(co, group, tracker)
    }

    fn adjust_connectors_for_moving_opposite(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        self.follow_center_line(co, group, tracker)
    }
}
