//! Connector strategies.
//!
//! A strategy decides where a connector's point goes when its owner moves, when the figure at
//! the other end moves, when the owner is resized or rotated, and while the user drags the
//! connector. [`Strategy`] is the closed set of variants stored on each connector;
//! [`ConnectorStrategy`] is the behavior each variant implements. Defaults on the trait are the
//! shared boundary behavior in [`base`].

pub mod base;
pub mod boundary;
pub mod chop;
pub mod edge;
pub mod rotational;

use serde::{Deserialize, Serialize};

use crate::coordinator::{Compatibility, ConnectorCoordinator};
use crate::error::{Error, Result};
use crate::geom::{Point, Rect};
use crate::model::{ConnectorRef, FigureId, FigureModel};
use crate::options::StrategyOptions;
use crate::tracker::PreviousBoundsTracker;

pub use boundary::BoundaryStrategy;
pub use chop::ChopStrategy;
pub use edge::EdgeStrategy;
pub use rotational::RotationalStrategy;

pub const CHOP: &str = "chop";
pub const BOUNDARY: &str = "boundary";
pub const EDGE: &str = "edge";
pub const ROTATIONAL: &str = "rotational";

/// Keyboard modifiers held during a connector drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Slide along the owner's outline instead of following the pointer.
    pub alt: bool,
    /// Constrain the drag to its dominant axis.
    pub shift: bool,
}

pub trait ConnectorStrategy {
    fn name(&self) -> &'static str;

    fn options(&self) -> StrategyOptions;

    fn is_bounds_mode(&self) -> bool {
        self.options().bounds_mode
    }

    /// Only one point per figure pair makes sense (a second connection would overlap the first).
    fn has_singular_connector_point(&self) -> bool {
        false
    }

    /// The point depends on the figure at the other end and must follow its changes.
    fn is_connector_tightly_coupled(&self) -> bool {
        false
    }

    fn permits_vertex_points(&self) -> bool {
        false
    }

    /// Where this strategy puts the connector `at` for a candidate point near its owner.
    fn derive_point(
        &self,
        co: &ConnectorCoordinator<'_>,
        at: ConnectorRef,
        candidate: Point,
    ) -> Result<Point>;

    /// Validates a candidate for an existing connector: candidates outside the owner's shape, or
    /// offered for another owner, leave the current point in place.
    fn find_connector_point(
        &self,
        co: &ConnectorCoordinator<'_>,
        at: ConnectorRef,
        owner: FigureId,
        candidate: Point,
    ) -> Result<Point> {
        base::find_connector_point(self, co, at, owner, candidate)
    }

    /// Point for the end of a connection that is being created; `None` vetoes the creation.
    fn find_connector_point_new_connection(
        &self,
        model: &dyn FigureModel,
        owner: FigureId,
        opposite_owner: FigureId,
        candidate: Point,
    ) -> Option<Point> {
        base::new_connection_point(self, model, owner, opposite_owner, candidate)
    }

    fn touch_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        p: Point,
    ) -> Result<Point> {
        base::touch_connector(self, co, at, p)
    }

    fn drag_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        from: Point,
        to: Point,
        modifiers: Modifiers,
    ) -> Result<Point> {
        base::drag_connector(self, co, at, from, to, modifiers)
    }

    fn slide_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        from: Point,
        to: Point,
    ) -> Result<Point> {
        base::slide_connector(self, co, at, from, to)
    }

    /// Connectors of one group whose owner moved. Points travel with the owner already.
    fn adjust_connectors_for_moving(
        &self,
        _co: &mut ConnectorCoordinator<'_>,
        _group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        Ok(())
    }

    /// Connectors of one group whose opposite owner moved.
    fn adjust_connectors_for_moving_opposite(
        &self,
        _co: &mut ConnectorCoordinator<'_>,
        _group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        Ok(())
    }

    fn adjust_connectors_multi_for_moving(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        group
            .iter()
            .try_for_each(|at| base::modify_opposite_connection_point_multi(co, *at))
    }

    fn adjust_connectors_multi_for_moving_opposite(
        &self,
        _co: &mut ConnectorCoordinator<'_>,
        _group: &[ConnectorRef],
        _tracker: &PreviousBoundsTracker,
    ) -> Result<()> {
        Ok(())
    }

    fn adjust_connector_for_resizing(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        previous: &Rect,
    ) -> Result<()> {
        base::preserve_connection(self, co, at, previous)
    }

    /// The owner turned by `angle` radians about its center.
    fn rotate_connector(
        &self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        angle: f64,
    ) -> Result<()> {
        base::rotate_on_outline(self, co, at, angle)
    }

    fn compatible_with_new_opposite_strategy(&self, _opposite: &Strategy) -> Compatibility {
        Compatibility::Compatible
    }
}

/// Strategy stored on a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Strategy {
    Chop(ChopStrategy),
    Boundary(BoundaryStrategy),
    Edge(EdgeStrategy),
    Rotational(RotationalStrategy),
}

impl Strategy {
    pub fn chop() -> Self {
        Strategy::Chop(ChopStrategy::default())
    }

    pub fn boundary() -> Self {
        Strategy::Boundary(BoundaryStrategy::default())
    }

    pub fn edge() -> Self {
        Strategy::Edge(EdgeStrategy::default())
    }

    pub fn rotational() -> Self {
        Strategy::Rotational(RotationalStrategy::default())
    }

    /// Resolves a persisted strategy name.
    pub fn from_name(name: &str, options: StrategyOptions) -> Result<Self> {
        match name.trim() {
            "" => Err(Error::BlankStrategyName),
            CHOP => Ok(Strategy::Chop(ChopStrategy { options })),
            BOUNDARY => Ok(Strategy::Boundary(BoundaryStrategy { options })),
            EDGE => Ok(Strategy::Edge(EdgeStrategy { options })),
            ROTATIONAL => Ok(Strategy::Rotational(RotationalStrategy { options })),
            other => Err(Error::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }

    pub fn as_dyn(&self) -> &dyn ConnectorStrategy {
        match self {
            Strategy::Chop(s) => s,
            Strategy::Boundary(s) => s,
            Strategy::Edge(s) => s,
            Strategy::Rotational(s) => s,
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_dyn().name()
    }

    pub fn options(&self) -> StrategyOptions {
        self.as_dyn().options()
    }
}
