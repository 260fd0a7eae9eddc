use rustc_hash::FxHashMap;

use crate::geom::Rect;
use crate::model::FigureId;

/// Bounds of figures before the current move/resize step.
///
/// One tracker lives for one gesture. The coordinator records the previous bounds of every
/// figure it is told about and, once the step is processed, replaces them with the current
/// bounds so the next step measures its own delta.
#[derive(Debug, Clone, Default)]
pub struct PreviousBoundsTracker {
    previous: FxHashMap<FigureId, Rect>,
}

impl PreviousBoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, figure: FigureId, bounds: Rect) {
        self.previous.insert(figure, bounds);
    }

    pub fn previous(&self, figure: FigureId) -> Option<Rect> {
        self.previous.get(&figure).copied()
    }

    /// Previous bounds, or `current` for a figure that has not changed during the gesture.
    pub fn previous_or(&self, figure: FigureId, current: Rect) -> Rect {
        self.previous(figure).unwrap_or(current)
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}
