#![forbid(unsafe_code)]

//! Connector strategies for diagram editors.
//!
//! A [`Connection`] joins two figures; each end is a [`Connector`] that belongs to one figure and
//! follows one [`Strategy`]. When the host reports that a figure moved, resized or rotated, the
//! [`ConnectorCoordinator`] regroups the affected connectors and lets each strategy recompute
//! their points with the `limpet-geom` kernel. Everything runs synchronously inside the call.

pub mod connection;
pub mod coordinator;
pub mod error;
pub mod gesture;
pub mod model;
pub mod options;
pub mod strategy;
pub mod tracker;

pub use connection::{Connection, Connections, Connector};
pub use coordinator::{Compatibility, ConnectOutcome, ConnectorCoordinator, GroupKey, NewEnd};
pub use error::{Error, Result};
pub use gesture::{ConnectorGesture, GestureState};
pub use model::{ConnectionId, ConnectorRef, End, FigureId, FigureModel, FigureTable};
pub use options::StrategyOptions;
pub use strategy::{
    BoundaryStrategy, ChopStrategy, ConnectorStrategy, EdgeStrategy, Modifiers,
    RotationalStrategy, Strategy,
};
pub use tracker::PreviousBoundsTracker;

pub use limpet_geom as geom;
