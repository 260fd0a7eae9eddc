//! Interactive lifecycle of one connector: touch, drag, then confirm or veto.

use crate::coordinator::{Compatibility, ConnectorCoordinator};
use crate::error::{Error, Result};
use crate::geom::Point;
use crate::model::ConnectorRef;
use crate::strategy::Modifiers;
use crate::tracker::PreviousBoundsTracker;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Touched,
    Dragging,
    Confirmed,
    Vetoed,
}

impl GestureState {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Touched => "touched",
            GestureState::Dragging => "dragging",
            GestureState::Confirmed => "confirmed",
            GestureState::Vetoed => "vetoed",
        }
    }

    fn is_active(self) -> bool {
        matches!(self, GestureState::Touched | GestureState::Dragging)
    }
}

/// Drives one connector through `Idle -> Touched -> Dragging -> Confirmed | Vetoed -> Idle`.
///
/// The gesture remembers the point the connector had when it was touched; a veto or a cancel
/// puts it back. Its [`PreviousBoundsTracker`] serves figure moves made during the same gesture
/// and is dropped with it.
#[derive(Debug, Clone, Default)]
pub struct ConnectorGesture {
    state: GestureState,
    connector: Option<ConnectorRef>,
    original: Option<Point>,
    tracker: PreviousBoundsTracker,
}

impl ConnectorGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn connector(&self) -> Option<ConnectorRef> {
        self.connector
    }

    pub fn tracker(&self) -> &PreviousBoundsTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut PreviousBoundsTracker {
        &mut self.tracker
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            state: self.state.as_str(),
            action,
        }
    }

    fn active_connector(&self, action: &'static str) -> Result<ConnectorRef> {
        if !self.state.is_active() {
            return Err(self.invalid(action));
        }
        self.connector.ok_or_else(|| self.invalid(action))
    }

    pub fn touch(
        &mut self,
        co: &mut ConnectorCoordinator<'_>,
        at: ConnectorRef,
        p: Point,
    ) -> Result<Point> {
        if self.state != GestureState::Idle {
            return Err(self.invalid("touch"));
        }
        let original = co.point(at)?;
        let strategy = co.strategy(at)?;
        let stored = strategy.as_dyn().touch_connector(co, at, p)?;
        self.state = GestureState::Touched;
        self.connector = Some(at);
        self.original = Some(original);
        Ok(stored)
    }

    pub fn drag(
        &mut self,
        co: &mut ConnectorCoordinator<'_>,
        from: Point,
        to: Point,
        modifiers: Modifiers,
    ) -> Result<Point> {
        let at = self.active_connector("drag")?;
        let strategy = co.strategy(at)?;
        let p = strategy
            .as_dyn()
            .drag_connector(co, at, from, to, modifiers)?;
        self.state = GestureState::Dragging;
        Ok(p)
    }

    /// Ends the drag. The connection's strategy pair is checked again against the other
    /// connections between the same figures; soft objections go to `confirm`. A veto restores
    /// the point the connector had when it was touched.
    pub fn confirm_or_veto(
        &mut self,
        co: &mut ConnectorCoordinator<'_>,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<GestureState> {
        let at = self.active_connector("confirm")?;
        let connection = co.connection(at.connection)?;
        let (start, end) = (*connection.start(), *connection.end());
        let verdict = co.compatibility(
            start.owner,
            &start.strategy,
            end.owner,
            &end.strategy,
            Some(at.connection),
        );
        let accepted = match verdict {
            Compatibility::Compatible => true,
            Compatibility::NeedsConfirmation(reasons) => confirm(&reasons.join("\n")),
            Compatibility::Vetoed(reasons) => {
                tracing::debug!(?at, ?reasons, "connector drag vetoed");
                false
            }
        };
        if accepted {
            self.state = GestureState::Confirmed;
        } else {
            self.restore(co)?;
            self.state = GestureState::Vetoed;
        }
        Ok(self.state)
    }

    /// Abandons the gesture: an active drag is rolled back and the tracker is dropped.
    pub fn cancel(&mut self, co: &mut ConnectorCoordinator<'_>) -> Result<()> {
        if self.state.is_active() {
            self.restore(co)?;
        }
        self.clear();
        Ok(())
    }

    /// Returns a finished gesture to idle.
    pub fn reset(&mut self) -> Result<()> {
        if self.state.is_active() {
            return Err(self.invalid("reset"));
        }
        self.clear();
        Ok(())
    }

    fn restore(&mut self, co: &mut ConnectorCoordinator<'_>) -> Result<()> {
        if let (Some(at), Some(original)) = (self.connector, self.original) {
            co.set_point(at, original)?;
            co.apply_symmetric_adjustments()?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.state = GestureState::Idle;
        self.connector = None;
        self.original = None;
        self.tracker.clear();
    }
}
