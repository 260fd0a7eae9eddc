//! Connectors, connections and the connection store.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::geom::{Point, Rect, Vector, clamp_to_rect};
use crate::model::{ConnectionId, ConnectorRef, End, FigureId};
use crate::strategy::Strategy;

/// Attachment of one connection end to a figure.
///
/// The point is stored as an offset from the owner's bounds origin, so moving the owner carries
/// the point along; [`Connector::position`] clamps it into the owner's current bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub owner: FigureId,
    pub local: Vector,
    pub strategy: Strategy,
}

impl Connector {
    pub fn new(owner: FigureId, strategy: Strategy, at: Point, bounds: &Rect) -> Self {
        Self {
            owner,
            local: clamp_to_rect(at, bounds) - bounds.origin,
            strategy,
        }
    }

    pub fn position(&self, bounds: &Rect) -> Point {
        clamp_to_rect(bounds.origin + self.local, bounds)
    }

    /// Stores `p` clamped into `bounds` and returns the stored position.
    pub fn set_position(&mut self, p: Point, bounds: &Rect) -> Point {
        let clamped = clamp_to_rect(p, bounds);
        self.local = clamped - bounds.origin;
        clamped
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    points: Vec<Point>,
    start: Connector,
    end: Connector,
}

impl Connection {
    pub fn new(points: Vec<Point>, start: Connector, end: Connector) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::TooFewPoints {
                count: points.len(),
            });
        }
        Ok(Self { points, start, end })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start(&self) -> &Connector {
        &self.start
    }

    pub fn end(&self) -> &Connector {
        &self.end
    }

    pub fn connector(&self, end: End) -> &Connector {
        match end {
            End::Start => &self.start,
            End::End => &self.end,
        }
    }

    pub fn connector_mut(&mut self, end: End) -> &mut Connector {
        match end {
            End::Start => &mut self.start,
            End::End => &mut self.end,
        }
    }

    pub fn start_strategy_name(&self) -> &'static str {
        self.start.strategy.name()
    }

    pub fn end_strategy_name(&self) -> &'static str {
        self.end.strategy.name()
    }

    pub fn is_multi_point(&self) -> bool {
        self.points.len() > 2
    }

    pub fn is_self_connection(&self) -> bool {
        self.start.owner == self.end.owner
    }

    pub fn attaches_to(&self, figure: FigureId) -> bool {
        self.start.owner == figure || self.end.owner == figure
    }

    fn endpoint_index(&self, end: End) -> usize {
        match end {
            End::Start => 0,
            End::End => self.points.len() - 1,
        }
    }

    fn neighbor_index(&self, end: End) -> usize {
        match end {
            End::Start => 1,
            End::End => self.points.len() - 2,
        }
    }

    pub fn endpoint(&self, end: End) -> Point {
        self.points[self.endpoint_index(end)]
    }

    /// The path point next to an end (index 1 or `len - 2`).
    pub fn neighbor(&self, end: End) -> Point {
        self.points[self.neighbor_index(end)]
    }

    pub(crate) fn set_endpoint(&mut self, end: End, p: Point) {
        let i = self.endpoint_index(end);
        self.points[i] = p;
    }

    pub(crate) fn set_neighbor(&mut self, end: End, p: Point) {
        let i = self.neighbor_index(end);
        self.points[i] = p;
    }
}

/// All connections of a drawing, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    map: IndexMap<ConnectionId, Connection>,
    next_id: u64,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connection: Connection) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.map.insert(id, connection);
        id
    }

    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        self.map.shift_remove(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.map.get(&id)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.map.get_mut(&id)
    }

    pub fn connector(&self, at: ConnectorRef) -> Option<&Connector> {
        self.get(at.connection).map(|c| c.connector(at.end))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.map.iter().map(|(id, c)| (*id, c))
    }

    pub fn connections_of(&self, figure: FigureId) -> Vec<ConnectionId> {
        self.iter()
            .filter(|(_, c)| c.attaches_to(figure))
            .map(|(id, _)| id)
            .collect()
    }

    /// Drops every connection attached to a removed figure and returns their ids.
    pub fn remove_figure(&mut self, figure: FigureId) -> Vec<ConnectionId> {
        let doomed = self.connections_of(figure);
        for id in &doomed {
            self.map.shift_remove(id);
        }
        doomed
    }

    /// Moves a routing point; the two end points belong to the connectors.
    pub fn set_interior_point(&mut self, id: ConnectionId, index: usize, p: Point) -> Result<()> {
        let connection = self.map.get_mut(&id).ok_or(Error::UnknownConnection(id))?;
        let len = connection.points.len();
        if index == 0 || index + 1 >= len {
            return Err(Error::NotInteriorPoint { index, len });
        }
        connection.points[index] = p;
        Ok(())
    }
}
