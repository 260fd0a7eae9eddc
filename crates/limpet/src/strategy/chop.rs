use serde::{Deserialize, Serialize};

use crate::coordinator::ConnectorCoordinator;
use crate::error::Result;
use crate::geom::{Point, Rect, calculate_boundary_point_thru_center, calculate_chop_point};
use crate::model::{ConnectorRef, FigureId, FigureModel};
use crate::options::StrategyOptions;
use crate::strategy::{CHOP, ConnectorStrategy, Modifiers, base};
use crate::tracker::PreviousBoundsTracker;

/// The connector sits where the line between both figures' centers leaves the owner. A
/// multi-point connection aims at its neighbor point instead of the other center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChopStrategy {
    #[serde(default)]
    pub options: StrategyOptions,
}

impl ChopStrategy {
    fn recompute(&self, co: &mut ConnectorCoordinator<'_>, at: ConnectorRef) -> Result<Point> {
        let current = co.point(at)?;
        let p = self.derive_point(co, at, current)?;
        co.set_point(at, p)
    }

    fn recompute_all(&self, co: &mut ConnectorCoordinator<'_>, group: &[ConnectorRef]) -> Result<()> {
        for at in group {
            self.recompute(co, *at)?;
        }
        Ok(())
    }
}

impl ConnectorStrategy for ChopStrategy {
    fn name(&self) -> &'static str {
        CHOP
    }

    fn options(&self) -> StrategyOptions {
        self.options
    }

    fn has_singular_connector_point(&self) -> bool {
        true
    }

    fn is_connector_tightly_coupled(&self) -> bool {
        true
    }

    fn permits_vertex_points(&self) -> bool {
        true
    }

    fn derive_point(
        &self,
        co: &ConnectorCoordinator<'_>,
        at: ConnectorRef,
        _candidate: Point,
    ) -> Result<Point> {
        let shape = co.effective_shape(at)?;
        let connection = co.connection(at.connection)?;
        let chopped = if connection.is_multi_point() {
            calculate_boundary_point_thru_center(&shape, connection.neighbor(at.end))
        } else {
            calculate_chop_point(&shape, &co.effective_shape(at.opposite())?)
        };
        match chopped {
            Some(p) => Ok(p),
            None => {
                tracing::debug!(?at, "no chop point, keeping connector point");
                co.point(at)
            }
        }
    }

    fn find_connector_point(
        &self,
        co: &ConnectorCoordinator<'_>,
        at: ConnectorRef,
        _owner: FigureId,
        candidate: Point,
    ) -> Result<Point> {
        self.derive_point(co, at, candidate)
    }

    fn find_connector_point_new_connection(
        &self,
        model: &dyn FigureModel,
        owner: FigureId,
        opposite_owner: FigureId,
        _candidate: Point,
    ) -> Option<Point> {
        let (_, shape) = base::owner_geometry(self, model, owner)?;
        let (_, opposite) = base::owner_geometry(self, model, opposite_owner)?;
        calculate_chop_point(&shape, &opposite)
    }

    fn drag_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        _from: Point,
        _to: Point,
        _modifiers: Modifiers,
    ) -> Result<Point> {
        self.recompute(co, at)
    }

    fn slide_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        _from: Point,
        _to: Point,
    ) -> Result<Point> {
        self.recompute(co, at)
    }

    fn adjust_connectors_for_moving(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        self.recompute_all(co, group)
    }

    fn adjust_connectors_for_moving_opposite(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        self.recompute_all(co, group)
    }

    fn adjust_connectors_multi_for_moving(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        self.recompute_all(co, group)
    }

    fn adjust_connector_for_resizing(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        _previous: &Rect,
    ) -> Result<()> {
        self.recompute(co, at).map(|_| ())
    }

    fn rotate_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        _angle: f64,
    ) -> Result<()> {
        self.recompute(co, at).map(|_| ())
    }
}
