use crate::model::{ConnectionId, FigureId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("connector strategy name must not be blank")]
    BlankStrategyName,

    #[error("unknown connector strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("connector collection is empty")]
    EmptyConnectors,

    #[error("connectors belong to more than one owner")]
    MixedOwners,

    #[error("unknown figure: {0}")]
    UnknownFigure(FigureId),

    #[error("unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("a connection needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("point {index} is not an interior point of a {len}-point connection")]
    NotInteriorPoint { index: usize, len: usize },

    #[error("cannot {action} a connector gesture that is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("invalid strategy options: {0}")]
    Options(#[from] serde_json::Error),
}
