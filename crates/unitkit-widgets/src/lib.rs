#![forbid(unsafe_code)]

//! Widgets for unitkit: a hover tooltip and a unit-value stepper.

pub mod config;
pub mod numeric;
pub mod text_field;
pub mod tooltip;
pub mod unit_value;

use unitkit_core::event::{Event, EventContext};
use unitkit_core::geometry::Rect;
use unitkit_render::{NodeId, Scene};

pub use tooltip::{Placement, Tooltip, TooltipState};
pub use unit_value::{CommitOutcome, Unit, UnitValue, UnitValueState};

/// A `StatefulWidget` renders from configuration plus mutable state.
///
/// For wrappers such as [`Tooltip`], `area` is the bounds of the wrapped
/// element.
pub trait StatefulWidget {
    type State;
    /// Render into the scene, updating any layout-derived state.
    fn render(&self, area: Rect, scene: &mut Scene, state: &mut Self::State);
}

/// A mounted, interactive widget that a host (or the test harness) drives.
///
/// The host renders, routes events to the node ids the last render produced,
/// and calls [`tick`](Self::tick) from its loop so deferred work can fire.
/// Every state change is visible in the next render.
pub trait Component {
    /// Render the current state into the scene.
    fn render(&mut self, area: Rect, scene: &mut Scene);

    /// Handle an event targeted at `target` (or at no node, for viewport
    /// changes). Returns whether any state changed.
    fn handle_event(&mut self, target: Option<NodeId>, event: &Event, ctx: &EventContext)
    -> bool;

    /// Advance time to `ctx.now`. Returns whether any state changed.
    fn tick(&mut self, ctx: &EventContext) -> bool;

    /// Release everything tied to the mount (pending timers, tracking).
    fn unmount(&mut self) {}
}
