use serde::{Deserialize, Serialize};

use crate::coordinator::ConnectorCoordinator;
use crate::error::Result;
use crate::geom::Point;
use crate::model::ConnectorRef;
use crate::options::StrategyOptions;
use crate::strategy::{BOUNDARY, ConnectorStrategy, base};

/// Connectors stay wherever they were put on the owner's outline (or its bounds in bounds mode)
/// and travel with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryStrategy {
    #[serde(default)]
    pub options: StrategyOptions,
}

impl ConnectorStrategy for BoundaryStrategy {
    fn name(&self) -> &'static str {
        BOUNDARY
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
}
