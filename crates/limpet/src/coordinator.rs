//! Orchestrates strategies when figures change.
//!
//! The coordinator borrows the host's figure model and the connection store for the duration of
//! one notification. A bounds change is processed in a fixed order: the changed figure's own
//! connectors (grouped by opposite owner and strategy pair), then the connectors at the other
//! ends, then one round of symmetric adjustments, then the path end points are synced with
//! their connectors.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::connection::{Connection, Connections, Connector};
use crate::error::{Error, Result};
use crate::geom::{EPSILON, Point, Rect, Shape};
use crate::model::{ConnectionId, ConnectorRef, End, FigureId, FigureModel};
use crate::strategy::Strategy;
use crate::tracker::PreviousBoundsTracker;

/// Connectors adjusted together: same owner, same opposite owner, same strategy pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub owner: FigureId,
    pub opposite_owner: FigureId,
    pub strategy: &'static str,
    pub opposite_strategy: &'static str,
    pub multi_point: bool,
}

/// Verdict on a new connection between two figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    /// Allowed if the user confirms.
    NeedsConfirmation(Vec<String>),
    Vetoed(Vec<String>),
}

impl Compatibility {
    /// Combines two verdicts; the stricter one wins and reasons of equal severity accumulate.
    pub fn and(self, other: Compatibility) -> Compatibility {
        use Compatibility::*;
        match (self, other) {
            (Vetoed(mut a), Vetoed(b)) => {
                a.extend(b);
                Vetoed(a)
            }
            (Vetoed(a), _) | (_, Vetoed(a)) => Vetoed(a),
            (NeedsConfirmation(mut a), NeedsConfirmation(b)) => {
                a.extend(b);
                NeedsConfirmation(a)
            }
            (NeedsConfirmation(a), Compatible) | (Compatible, NeedsConfirmation(a)) => {
                NeedsConfirmation(a)
            }
            (Compatible, Compatible) => Compatible,
        }
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            Compatibility::Compatible => &[],
            Compatibility::NeedsConfirmation(r) | Compatibility::Vetoed(r) => r,
        }
    }
}

/// One end of a connection about to be created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewEnd {
    pub figure: FigureId,
    pub strategy: Strategy,
    /// Where the user attached the end.
    pub at: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Created(ConnectionId),
    Vetoed(Vec<String>),
}

pub struct ConnectorCoordinator<'a> {
    model: &'a dyn FigureModel,
    connections: &'a mut Connections,
    changed: Vec<ConnectorRef>,
}

impl<'a> ConnectorCoordinator<'a> {
    pub fn new(model: &'a dyn FigureModel, connections: &'a mut Connections) -> Self {
        Self {
            model,
            connections,
            changed: Vec::new(),
        }
    }

    pub fn model(&self) -> &dyn FigureModel {
        self.model
    }

    pub fn connections(&self) -> &Connections {
        &*self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Result<&Connection> {
        self.connections
            .get(id)
            .ok_or(Error::UnknownConnection(id))
    }

    pub fn connector(&self, at: ConnectorRef) -> Result<&Connector> {
        Ok(self.connection(at.connection)?.connector(at.end))
    }

    pub fn strategy(&self, at: ConnectorRef) -> Result<Strategy> {
        Ok(self.connector(at)?.strategy)
    }

    pub fn owner_bounds(&self, figure: FigureId) -> Result<Rect> {
        self.model
            .bounds(figure)
            .ok_or(Error::UnknownFigure(figure))
    }

    pub fn bounds_of(&self, at: ConnectorRef) -> Result<Rect> {
        self.owner_bounds(self.connector(at)?.owner)
    }

    /// Current absolute point of a connector.
    pub fn point(&self, at: ConnectorRef) -> Result<Point> {
        let connector = self.connector(at)?;
        Ok(connector.position(&self.owner_bounds(connector.owner)?))
    }

    /// Outline the connector attaches to: the bounds in bounds mode, the connectible shape
    /// otherwise.
    pub fn effective_shape(&self, at: ConnectorRef) -> Result<Shape> {
        let connector = self.connector(at)?;
        let bounds = self.owner_bounds(connector.owner)?;
        if connector.strategy.as_dyn().is_bounds_mode() {
            return Ok(Shape::Rect(bounds));
        }
        Ok(self
            .model
            .connectible_shape(connector.owner)
            .unwrap_or(Shape::Rect(bounds)))
    }

    /// Stores a connector point, clamped into the owner's bounds, and updates the path end
    /// point. Returns the stored point.
    pub fn set_point(&mut self, at: ConnectorRef, p: Point) -> Result<Point> {
        let bounds = self.bounds_of(at)?;
        let connection = self
            .connections
            .get_mut(at.connection)
            .ok_or(Error::UnknownConnection(at.connection))?;
        let stored = connection.connector_mut(at.end).set_position(p, &bounds);
        connection.set_endpoint(at.end, stored);
        tracing::trace!(?at, x = stored.x, y = stored.y, "connector point updated");
        if !self.changed.contains(&at) {
            self.changed.push(at);
        }
        Ok(stored)
    }

    pub fn set_neighbor(&mut self, at: ConnectorRef, p: Point) -> Result<()> {
        let connection = self
            .connections
            .get_mut(at.connection)
            .ok_or(Error::UnknownConnection(at.connection))?;
        connection.set_neighbor(at.end, p);
        Ok(())
    }

    /// Connectors on `owner` whose connection leads to `opposite_owner` with the given strategy
    /// pair. Multi-point connections are left out unless `include_multi_point` is set.
    pub fn find_connectors(
        &self,
        owner: FigureId,
        opposite_owner: FigureId,
        strategy_name: &str,
        opposite_strategy_name: &str,
        include_multi_point: bool,
    ) -> Result<Vec<ConnectorRef>> {
        if strategy_name.trim().is_empty() || opposite_strategy_name.trim().is_empty() {
            return Err(Error::BlankStrategyName);
        }
        let mut found = Vec::new();
        for (id, connection) in self.connections.iter() {
            if connection.is_multi_point() && !include_multi_point {
                continue;
            }
            for end in [End::Start, End::End] {
                let own = connection.connector(end);
                let other = connection.connector(end.opposite());
                if own.owner == owner
                    && other.owner == opposite_owner
                    && own.strategy.name() == strategy_name
                    && other.strategy.name() == opposite_strategy_name
                {
                    found.push(ConnectorRef::new(id, end));
                }
            }
        }
        Ok(found)
    }

    /// `(min_x, min_y, max_x, max_y)` of the current points of connectors sharing one owner.
    pub fn find_max_min_connector_points(
        &self,
        connectors: &[ConnectorRef],
    ) -> Result<(f64, f64, f64, f64)> {
        let Some(&first) = connectors.first() else {
            return Err(Error::EmptyConnectors);
        };
        let owner = self.connector(first)?.owner;
        let mut extent = (
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for &at in connectors {
            if self.connector(at)?.owner != owner {
                return Err(Error::MixedOwners);
            }
            let p = self.point(at)?;
            extent.0 = extent.0.min(p.x);
            extent.1 = extent.1.min(p.y);
            extent.2 = extent.2.max(p.x);
            extent.3 = extent.3.max(p.y);
        }
        Ok(extent)
    }

    fn group_by(
        &self,
        figure: FigureId,
        on_figure: bool,
    ) -> IndexMap<GroupKey, Vec<ConnectorRef>> {
        let mut groups: IndexMap<GroupKey, Vec<ConnectorRef>> = IndexMap::new();
        for (id, connection) in self.connections.iter() {
            for end in [End::Start, End::End] {
                let own = connection.connector(end);
                let other = connection.connector(end.opposite());
                let selected = if on_figure {
                    own.owner == figure
                } else {
                    own.owner != figure && other.owner == figure
                };
                if !selected {
                    continue;
                }
                let key = GroupKey {
                    owner: own.owner,
                    opposite_owner: other.owner,
                    strategy: own.strategy.name(),
                    opposite_strategy: other.strategy.name(),
                    multi_point: connection.is_multi_point(),
                };
                groups
                    .entry(key)
                    .or_default()
                    .push(ConnectorRef::new(id, end));
            }
        }
        groups
    }

    /// Connectors owned by `figure`, grouped.
    pub fn group_connectors(&self, figure: FigureId) -> IndexMap<GroupKey, Vec<ConnectorRef>> {
        self.group_by(figure, true)
    }

    /// Connectors at the far end of `figure`'s connections, grouped by their own owner.
    pub fn group_opposite_connectors(
        &self,
        figure: FigureId,
    ) -> IndexMap<GroupKey, Vec<ConnectorRef>> {
        self.group_by(figure, false)
    }

    pub fn figure_bounds_changed(
        &mut self,
        figure: FigureId,
        previous: Rect,
        tracker: &mut PreviousBoundsTracker,
    ) -> Result<()> {
        self.figures_bounds_changed(&[(figure, previous)], tracker)
    }

    /// Processes one step of a gesture that changed the bounds of several figures at once (a
    /// multi-selection drag). Connectors whose owner and opposite owner both changed are
    /// adjusted once, as part of their owner's groups.
    pub fn figures_bounds_changed(
        &mut self,
        changes: &[(FigureId, Rect)],
        tracker: &mut PreviousBoundsTracker,
    ) -> Result<()> {
        for &(figure, previous) in changes {
            tracker.record(figure, previous);
        }
        self.changed.clear();

        for &(figure, previous) in changes {
            let Some(current) = self.model.bounds(figure) else {
                tracing::warn!(%figure, "bounds changed for a figure the model does not know");
                continue;
            };
            let resized = (current.width() - previous.width()).abs() > EPSILON
                || (current.height() - previous.height()).abs() > EPSILON;
            tracing::debug!(%figure, resized, ?previous, ?current, "figure bounds changed");

            for (key, group) in self.group_connectors(figure) {
                if resized {
                    for at in group {
                        let strategy = self.strategy(at)?;
                        strategy
                            .as_dyn()
                            .adjust_connector_for_resizing(self, at, &previous)?;
                    }
                } else {
                    self.adjust_group(key, &group, tracker, false)?;
                }
            }
            for (key, group) in self.group_opposite_connectors(figure) {
                if changes.iter().any(|(f, _)| *f == key.owner) {
                    continue;
                }
                self.adjust_group(key, &group, tracker, true)?;
            }
        }

        self.apply_symmetric_adjustments()?;
        for &(figure, _) in changes {
            self.sync_endpoints(figure)?;
            if let Some(current) = self.model.bounds(figure) {
                tracker.record(figure, current);
            }
        }
        Ok(())
    }

    fn adjust_group(
        &mut self,
        key: GroupKey,
        group: &[ConnectorRef],
        tracker: &PreviousBoundsTracker,
        opposite_moved: bool,
    ) -> Result<()> {
        if self.model.bounds(key.owner).is_none() || self.model.bounds(key.opposite_owner).is_none()
        {
            tracing::warn!(
                owner = %key.owner,
                opposite_owner = %key.opposite_owner,
                "figure geometry unavailable, connectors left unchanged"
            );
            return Ok(());
        }
        let Some(&first) = group.first() else {
            return Ok(());
        };
        let strategy = self.strategy(first)?;
        let s = strategy.as_dyn();
        tracing::debug!(?key, opposite_moved, count = group.len(), "adjusting connector group");
        match (key.multi_point, opposite_moved) {
            (false, false) => s.adjust_connectors_for_moving(self, group, tracker),
            (false, true) => s.adjust_connectors_for_moving_opposite(self, group, tracker),
            (true, false) => s.adjust_connectors_multi_for_moving(self, group, tracker),
            (true, true) => s.adjust_connectors_multi_for_moving_opposite(self, group, tracker),
        }
    }

    /// The host turned `figure` by `angle` radians about its center.
    pub fn figure_rotated(&mut self, figure: FigureId, angle: f64) -> Result<()> {
        self.owner_bounds(figure)?;
        self.changed.clear();
        for (_, group) in self.group_connectors(figure) {
            for at in group {
                let strategy = self.strategy(at)?;
                strategy.as_dyn().rotate_connector(self, at, angle)?;
            }
        }
        self.apply_symmetric_adjustments()?;
        self.sync_endpoints(figure)
    }

    /// Recomputes, once, the opposite end of every connector changed since the last round,
    /// when the connection is direct (2 points), the opposite strategy is tightly coupled and
    /// the changed one is not singular. Points set here do not start another round.
    pub fn apply_symmetric_adjustments(&mut self) -> Result<()> {
        let changed = std::mem::take(&mut self.changed);
        let mut done: FxHashSet<ConnectorRef> = FxHashSet::default();
        for at in changed {
            let opposite = at.opposite();
            let (direct, this, other, other_owner) = match self.connections.get(at.connection) {
                Some(c) => (
                    c.points().len() == 2,
                    c.connector(at.end).strategy,
                    c.connector(opposite.end).strategy,
                    c.connector(opposite.end).owner,
                ),
                None => continue,
            };
            if !direct
                || this.as_dyn().has_singular_connector_point()
                || !other.as_dyn().is_connector_tightly_coupled()
                || !done.insert(opposite)
            {
                continue;
            }
            if self.model.bounds(other_owner).is_none() {
                tracing::warn!(owner = %other_owner, "opposite owner unavailable, symmetric adjustment skipped");
                continue;
            }
            let current = self.point(opposite)?;
            let p = other.as_dyn().derive_point(self, opposite, current)?;
            self.set_point(opposite, p)?;
            tracing::trace!(?at, ?opposite, "symmetric adjustment");
        }
        self.changed.clear();
        Ok(())
    }

    fn sync_endpoints(&mut self, figure: FigureId) -> Result<()> {
        for id in self.connections.connections_of(figure) {
            for end in [End::Start, End::End] {
                let at = ConnectorRef::new(id, end);
                let connector = *self.connector(at)?;
                let Some(bounds) = self.model.bounds(connector.owner) else {
                    tracing::warn!(owner = %connector.owner, %id, "owner unavailable, end point not synced");
                    continue;
                };
                if let Some(connection) = self.connections.get_mut(id) {
                    connection.set_endpoint(end, connector.position(&bounds));
                }
            }
        }
        Ok(())
    }

    /// Veto protocol for a new direct connection between two figures.
    ///
    /// A second direct connection with the same strategy pair between the same figures is
    /// vetoed when both strategies are singular, or one is singular and the other tightly
    /// coupled. Otherwise each strategy may still object to the other.
    pub fn compatible_with_opposite(
        &self,
        start_owner: FigureId,
        start: &Strategy,
        end_owner: FigureId,
        end: &Strategy,
    ) -> Compatibility {
        self.compatibility(start_owner, start, end_owner, end, None)
    }

    pub(crate) fn compatibility(
        &self,
        start_owner: FigureId,
        start: &Strategy,
        end_owner: FigureId,
        end: &Strategy,
        exclude: Option<ConnectionId>,
    ) -> Compatibility {
        let (s, e) = (start.as_dyn(), end.as_dyn());
        let exclusive = (s.has_singular_connector_point() && e.has_singular_connector_point())
            || (s.has_singular_connector_point() && e.is_connector_tightly_coupled())
            || (e.has_singular_connector_point() && s.is_connector_tightly_coupled());
        if exclusive {
            let existing = self
                .connections
                .iter()
                .filter(|(id, c)| Some(*id) != exclude && !c.is_multi_point())
                .filter(|(_, c)| {
                    let (a, b) = (c.start(), c.end());
                    (a.owner == start_owner
                        && b.owner == end_owner
                        && a.strategy.name() == s.name()
                        && b.strategy.name() == e.name())
                        || (a.owner == end_owner
                            && b.owner == start_owner
                            && a.strategy.name() == e.name()
                            && b.strategy.name() == s.name())
                })
                .count();
            if existing > 0 {
                return Compatibility::Vetoed(vec![format!(
                    "{start_owner} and {end_owner} are already joined by a {}-{} connection; \
                     another one would share its connector points",
                    s.name(),
                    e.name()
                )]);
            }
        }
        s.compatible_with_new_opposite_strategy(end)
            .and(e.compatible_with_new_opposite_strategy(start))
    }

    /// Creates a direct connection unless a strategy or the user vetoes it. A veto leaves the
    /// store untouched.
    pub fn connect(
        &mut self,
        start: NewEnd,
        end: NewEnd,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<ConnectOutcome> {
        let start_bounds = self.owner_bounds(start.figure)?;
        let end_bounds = self.owner_bounds(end.figure)?;

        match self.compatible_with_opposite(start.figure, &start.strategy, end.figure, &end.strategy)
        {
            Compatibility::Compatible => {}
            Compatibility::NeedsConfirmation(reasons) => {
                if !confirm(&reasons.join("\n")) {
                    tracing::debug!(start = %start.figure, end = %end.figure, "connection declined");
                    return Ok(ConnectOutcome::Vetoed(reasons));
                }
            }
            Compatibility::Vetoed(reasons) => {
                tracing::debug!(start = %start.figure, end = %end.figure, ?reasons, "connection vetoed");
                return Ok(ConnectOutcome::Vetoed(reasons));
            }
        }

        let Some(start_point) = start
            .strategy
            .as_dyn()
            .find_connector_point_new_connection(self.model, start.figure, end.figure, start.at)
        else {
            return Ok(ConnectOutcome::Vetoed(vec![format!(
                "the {} strategy cannot attach a connection to {} at ({}, {})",
                start.strategy.name(),
                start.figure,
                start.at.x,
                start.at.y
            )]));
        };
        let Some(end_point) = end
            .strategy
            .as_dyn()
            .find_connector_point_new_connection(self.model, end.figure, start.figure, end.at)
        else {
            return Ok(ConnectOutcome::Vetoed(vec![format!(
                "the {} strategy cannot attach a connection to {} at ({}, {})",
                end.strategy.name(),
                end.figure,
                end.at.x,
                end.at.y
            )]));
        };

        let start_connector = Connector::new(start.figure, start.strategy, start_point, &start_bounds);
        let end_connector = Connector::new(end.figure, end.strategy, end_point, &end_bounds);
        let points = vec![
            start_connector.position(&start_bounds),
            end_connector.position(&end_bounds),
        ];
        let id = self
            .connections
            .insert(Connection::new(points, start_connector, end_connector)?);
        tracing::debug!(%id, start = %start.figure, end = %end.figure, "connection created");

        self.changed.clear();
        self.changed
            .extend([ConnectorRef::start(id), ConnectorRef::end(id)]);
        self.apply_symmetric_adjustments()?;
        Ok(ConnectOutcome::Created(id))
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        self.changed.retain(|at| at.connection != id);
        self.connections.remove(id)
    }

    /// Drops the connections of a figure that left the drawing.
    pub fn remove_figure(&mut self, figure: FigureId) -> Vec<ConnectionId> {
        let removed = self.connections.remove_figure(figure);
        self.changed.retain(|at| !removed.contains(&at.connection));
        tracing::debug!(%figure, count = removed.len(), "connections removed with their figure");
        removed
    }
}
