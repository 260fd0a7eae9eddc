//! Handles and the host-side figure model.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::{Point, Rect, Shape, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FigureId(pub u64);

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "figure#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum End {
    Start,
    End,
}

impl End {
    pub fn opposite(self) -> Self {
        match self {
            End::Start => End::End,
            End::End => End::Start,
        }
    }

    pub fn is_start(self) -> bool {
        self == End::Start
    }
}

/// One end of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorRef {
    pub connection: ConnectionId,
    pub end: End,
}

impl ConnectorRef {
    pub fn new(connection: ConnectionId, end: End) -> Self {
        Self { connection, end }
    }

    pub fn start(connection: ConnectionId) -> Self {
        Self::new(connection, End::Start)
    }

    pub fn end(connection: ConnectionId) -> Self {
        Self::new(connection, End::End)
    }

    pub fn opposite(self) -> Self {
        Self::new(self.connection, self.end.opposite())
    }
}

/// What the connector machinery needs to know about the host's figures.
pub trait FigureModel {
    /// Effective bounds of a figure, `None` if the figure is gone.
    fn bounds(&self, figure: FigureId) -> Option<Rect>;

    /// Outline connectors attach to when a strategy is not in bounds mode.
    fn connectible_shape(&self, figure: FigureId) -> Option<Shape>;
}

/// Figures stored by id, for hosts without a scene graph of their own.
#[derive(Debug, Clone, Default)]
pub struct FigureTable {
    figures: FxHashMap<FigureId, Shape>,
    next_id: u64,
}

impl FigureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a figure under a fresh id.
    pub fn add(&mut self, shape: Shape) -> FigureId {
        let id = FigureId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.figures.insert(id, shape);
        id
    }

    pub fn insert(&mut self, id: FigureId, shape: Shape) -> Option<Shape> {
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.figures.insert(id, shape)
    }

    pub fn remove(&mut self, id: FigureId) -> Option<Shape> {
        self.figures.remove(&id)
    }

    pub fn shape(&self, id: FigureId) -> Option<&Shape> {
        self.figures.get(&id)
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Replaces the bounds of a figure and returns the previous ones.
    pub fn set_bounds(&mut self, id: FigureId, bounds: Rect) -> Result<Rect> {
        let shape = self.figures.get_mut(&id).ok_or(Error::UnknownFigure(id))?;
        let previous = shape.bounds();
        *shape = shape.fit_to(bounds);
        Ok(previous)
    }

    pub fn move_to(&mut self, id: FigureId, origin: Point) -> Result<Rect> {
        let current = self.shape(id).ok_or(Error::UnknownFigure(id))?.bounds();
        self.set_bounds(id, Rect::new(origin, current.size))
    }

    pub fn move_by(&mut self, id: FigureId, delta: Vector) -> Result<Rect> {
        let current = self.shape(id).ok_or(Error::UnknownFigure(id))?.bounds();
        self.set_bounds(id, current.translate(delta))
    }
}

impl FigureModel for FigureTable {
    fn bounds(&self, figure: FigureId) -> Option<Rect> {
        self.figures.get(&figure).map(Shape::bounds)
    }

    fn connectible_shape(&self, figure: FigureId) -> Option<Shape> {
        self.figures.get(&figure).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point, rect, vector};

    #[test]
    fn set_bounds_refits_the_outline() {
        let mut table = FigureTable::new();
        let id = table.add(Shape::Ellipse(rect(0.0, 0.0, 10.0, 10.0)));
        let prev = table.move_by(id, vector(5.0, 0.0)).unwrap();
        assert_eq!(prev, rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(table.bounds(id), Some(rect(5.0, 0.0, 10.0, 10.0)));
        table.move_to(id, point(0.0, 20.0)).unwrap();
        assert_eq!(
            table.connectible_shape(id),
            Some(Shape::Ellipse(rect(0.0, 20.0, 10.0, 10.0)))
        );
        assert!(matches!(
            table.set_bounds(FigureId(99), rect(0.0, 0.0, 1.0, 1.0)),
            Err(Error::UnknownFigure(FigureId(99)))
        ));
    }

    #[test]
    fn inserting_the_largest_id_does_not_overflow() {
        let mut table = FigureTable::new();
        assert!(table.insert(FigureId(u64::MAX), Shape::Rect(rect(0.0, 0.0, 1.0, 1.0))).is_none());
        assert_eq!(table.len(), 1);
        assert!(table.shape(FigureId(u64::MAX)).is_some());
    }
}
