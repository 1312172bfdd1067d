#![forbid(unsafe_code)]

//! Hover tooltip for any rendered element.
//!
//! [`Tooltip`] is the configuration (content, enabled, delay, forced open);
//! [`TooltipState`] is the per-mount state machine. The wrapped element's
//! bounds arrive through [`StatefulWidget::render`], and the floating label
//! is pushed into the scene's overlay layer so no ancestor clips it.
//!
//! # State machine
//!
//! ```text
//!            pointer_enter                 tick (delay elapsed)
//!   Idle ─────────────────▶ Pending ─────────────────────────▶ Visible
//!    ▲                         │                                  │
//!    └──────── pointer_leave ──┴────────── pointer_leave ─────────┘
//! ```
//!
//! With `open` set the tooltip is shown regardless of the pointer, and the
//! pointer handlers do nothing.
//!
//! # Positioning
//!
//! On becoming visible, and on every scroll/resize while visible, the anchor
//! is converted to client space. If there is room above it for the tooltip
//! height plus the gap, the tooltip goes above, otherwise below; it is
//! always centered horizontally on the anchor. Until the first successful
//! computation the overlay node is transparent so it never flashes at a stale
//! position.

use unitkit_core::event::EventContext;
use unitkit_core::geometry::{Point, Rect, Viewport};
use unitkit_core::timer::DeferredSlot;
use unitkit_render::{Node, NodeFlags, Role, Scene, text_width};
use web_time::{Duration, Instant};

use crate::StatefulWidget;

/// Hover delay before the tooltip appears.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);
/// Height reserved above the anchor when choosing a placement.
pub const TOOLTIP_HEIGHT: f64 = 40.0;
/// Distance between anchor and tooltip.
pub const TOOLTIP_GAP: f64 = 12.0;

const CHAR_WIDTH: f64 = 7.0;
const PADDING_X: f64 = 24.0;
const LABEL_HEIGHT: f64 = 28.0;

/// Side of the anchor the tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Above,
    Below,
}

/// Tooltip configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    content: String,
    enabled: bool,
    delay: Duration,
    open: bool,
    height: f64,
    gap: f64,
}

impl Tooltip {
    /// Create an enabled tooltip with the default delay.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            enabled: true,
            delay: DEFAULT_DELAY,
            open: false,
            height: TOOLTIP_HEIGHT,
            gap: TOOLTIP_GAP,
        }
    }

    /// Enable or disable (builder).
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the hover delay (builder).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Force visibility (builder).
    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Override the reserved height and the gap (builder).
    #[must_use]
    pub fn geometry(mut self, height: f64, gap: f64) -> Self {
        self.height = height;
        self.gap = gap;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn hover_delay(&self) -> Duration {
        self.delay
    }

    /// Disabled or blank content: renders nothing and ignores the pointer.
    pub fn is_suppressed(&self) -> bool {
        !self.enabled || self.content.trim().is_empty()
    }

    /// Whether the tooltip shows for the given state.
    pub fn is_visible(&self, state: &TooltipState) -> bool {
        (state.hover_visible || self.open) && !self.is_suppressed()
    }

    /// Anchor point and placement for a document-space anchor rect.
    ///
    /// The returned point is the tooltip's horizontal center and the edge
    /// nearest the anchor (its bottom when above, its top when below).
    pub fn compute_position(&self, anchor: Rect, viewport: Viewport) -> (Point, Placement) {
        let client = viewport.to_client(anchor);
        let left = client.left() + viewport.scroll_x + client.width / 2.0;
        if client.top() > self.height + self.gap {
            let top = client.top() + viewport.scroll_y - self.gap;
            (Point::new(left, top), Placement::Above)
        } else {
            let top = client.bottom() + viewport.scroll_y + self.gap;
            (Point::new(left, top), Placement::Below)
        }
    }

    /// Document-space bounds of the floating label for the given state.
    pub fn label_rect(&self, state: &TooltipState) -> Rect {
        let width = text_width(&self.content) as f64 * CHAR_WIDTH + PADDING_X;
        let x = state.coords.x - width / 2.0;
        let y = match state.placement {
            Placement::Above => state.coords.y - LABEL_HEIGHT,
            Placement::Below => state.coords.y,
        };
        Rect::new(x, y, width, LABEL_HEIGHT)
    }
}

/// Per-mount tooltip state.
#[derive(Debug, Default)]
pub struct TooltipState {
    hover_visible: bool,
    coords: Point,
    placement: Placement,
    positioned: bool,
    pending: DeferredSlot,
    anchor: Option<Rect>,
    tracking: bool,
}

impl TooltipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered the wrapped element: schedule the reveal.
    ///
    /// Returns whether a timer was started.
    pub fn pointer_enter(&mut self, tooltip: &Tooltip, ctx: &EventContext) -> bool {
        if tooltip.open || tooltip.is_suppressed() {
            return false;
        }
        self.pending.start(ctx.now, tooltip.delay);
        true
    }

    /// Pointer left the wrapped element: cancel and hide.
    ///
    /// Returns whether anything changed.
    pub fn pointer_leave(&mut self, tooltip: &Tooltip, ctx: &EventContext) -> bool {
        if tooltip.open {
            return false;
        }
        let cancelled = self.pending.cancel();
        let was_visible = self.hover_visible;
        self.hover_visible = false;
        self.positioned = false;
        self.sync(tooltip, ctx.viewport);
        cancelled || was_visible
    }

    /// Fire the hover timer if it is due. Returns whether the tooltip appeared.
    pub fn tick(&mut self, tooltip: &Tooltip, ctx: &EventContext) -> bool {
        if !self.pending.poll(ctx.now) {
            return false;
        }
        self.hover_visible = true;
        self.sync(tooltip, ctx.viewport);
        tooltip.is_visible(self)
    }

    /// Scroll or resize: re-position while visible.
    pub fn viewport_changed(&mut self, tooltip: &Tooltip, viewport: Viewport) -> bool {
        if !self.tracking {
            return false;
        }
        self.update_position(tooltip, viewport)
    }

    /// Reconcile visibility after any configuration or state change.
    ///
    /// Attaches position tracking (and positions) when the tooltip becomes
    /// visible, and detaches it when it stops being visible.
    pub fn sync(&mut self, tooltip: &Tooltip, viewport: Viewport) {
        if tooltip.is_suppressed() {
            self.pending.cancel();
            self.hover_visible = false;
        }
        let visible = tooltip.is_visible(self);
        if visible && !self.tracking {
            self.tracking = true;
            self.update_position(tooltip, viewport);
        } else if !visible && self.tracking {
            self.tracking = false;
            self.positioned = false;
            #[cfg(feature = "tracing")]
            tracing::trace!(content = tooltip.content(), "tooltip tracking detached");
        }
    }

    /// Cancel everything tied to the mount.
    pub fn unmount(&mut self) {
        self.pending.cancel();
        self.hover_visible = false;
        self.tracking = false;
        self.positioned = false;
    }

    fn update_position(&mut self, tooltip: &Tooltip, viewport: Viewport) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        let (coords, placement) = tooltip.compute_position(anchor, viewport);
        self.coords = coords;
        self.placement = placement;
        self.positioned = true;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            x = coords.x,
            y = coords.y,
            placement = ?placement,
            "tooltip positioned"
        );
        true
    }

    pub fn is_hover_visible(&self) -> bool {
        self.hover_visible
    }

    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    /// Whether scroll/resize tracking is attached.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// When the pending reveal fires, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    pub fn coords(&self) -> Point {
        self.coords
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Last laid-out bounds of the wrapped element.
    pub fn anchor(&self) -> Option<Rect> {
        self.anchor
    }
}

impl StatefulWidget for Tooltip {
    type State = TooltipState;

    /// `area` is the wrapped element's document-space bounds; an empty area
    /// means nothing was rendered to anchor to.
    fn render(&self, area: Rect, scene: &mut Scene, state: &mut TooltipState) {
        state.anchor = (!area.is_empty()).then_some(area);
        let viewport = scene.viewport();
        state.sync(self, viewport);
        if state.tracking && !state.positioned {
            state.update_position(self, viewport);
        }
        if !self.is_visible(state) {
            return;
        }
        let node = Node::new(Role::Tooltip, self.label_rect(state))
            .name(self.content.clone())
            .flag_if(NodeFlags::TRANSPARENT, !state.positioned)
            .flag_if(NodeFlags::BELOW, state.placement == Placement::Below);
        scene.push_overlay(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn ctx(now: Instant) -> EventContext {
        EventContext::new(now, vp())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn anchored(tip: &Tooltip, anchor: Rect) -> (TooltipState, Scene) {
        let mut state = TooltipState::new();
        let mut scene = Scene::new(vp());
        tip.render(anchor, &mut scene, &mut state);
        (state, scene)
    }

    #[test]
    fn defaults() {
        let tip = Tooltip::new("hello");
        assert!(tip.is_enabled());
        assert!(!tip.is_open());
        assert_eq!(tip.hover_delay(), ms(200));
    }

    #[test]
    fn blank_or_disabled_is_suppressed() {
        assert!(Tooltip::new("").is_suppressed());
        assert!(Tooltip::new("  \t").is_suppressed());
        assert!(Tooltip::new("x").enabled(false).is_suppressed());
        assert!(!Tooltip::new("x").is_suppressed());
    }

    #[test]
    fn hover_reveals_after_delay() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));

        assert!(state.pointer_enter(&tip, &ctx(t0)));
        assert!(state.is_pending());
        assert!(!state.tick(&tip, &ctx(t0 + ms(199))));
        assert!(!tip.is_visible(&state));

        assert!(state.tick(&tip, &ctx(t0 + ms(200))));
        assert!(tip.is_visible(&state));
        assert!(state.is_positioned());
        assert!(state.is_tracking());
    }

    #[test]
    fn leave_before_delay_cancels() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        state.pointer_enter(&tip, &ctx(t0));
        assert!(state.pointer_leave(&tip, &ctx(t0 + ms(100))));
        assert!(!state.is_pending());
        assert!(!state.tick(&tip, &ctx(t0 + ms(1_000))));
        assert!(!tip.is_visible(&state));
    }

    #[test]
    fn leave_hides_immediately() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        state.pointer_enter(&tip, &ctx(t0));
        state.tick(&tip, &ctx(t0 + ms(200)));
        assert!(state.pointer_leave(&tip, &ctx(t0 + ms(201))));
        assert!(!tip.is_visible(&state));
        assert!(!state.is_positioned());
        assert!(!state.is_tracking());
    }

    #[test]
    fn reenter_supersedes_timer() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        state.pointer_enter(&tip, &ctx(t0));
        state.pointer_enter(&tip, &ctx(t0 + ms(150)));
        assert_eq!(state.deadline(), Some(t0 + ms(350)));
        assert!(!state.tick(&tip, &ctx(t0 + ms(200))));
        assert!(state.tick(&tip, &ctx(t0 + ms(350))));
    }

    #[test]
    fn suppressed_ignores_pointer() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint").enabled(false);
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        assert!(!state.pointer_enter(&tip, &ctx(t0)));
        assert!(!state.is_pending());
    }

    #[test]
    fn becoming_suppressed_clears_hover() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        state.pointer_enter(&tip, &ctx(t0));
        state.tick(&tip, &ctx(t0 + ms(200)));

        let disabled = tip.clone().enabled(false);
        state.sync(&disabled, vp());
        assert!(!state.is_hover_visible());
        assert!(!state.is_tracking());

        // Re-enabling does not bring it back without a new hover.
        state.sync(&tip, vp());
        assert!(!tip.is_visible(&state));
    }

    #[test]
    fn open_forces_visibility_and_ignores_pointer() {
        let t0 = Instant::now();
        let tip = Tooltip::new("forced").open(true);
        let (mut state, scene) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        assert!(tip.is_visible(&state));
        assert!(state.is_positioned());
        assert_eq!(scene.overlays().count(), 1);

        assert!(!state.pointer_enter(&tip, &ctx(t0)));
        assert!(!state.pointer_leave(&tip, &ctx(t0)));
        assert!(tip.is_visible(&state));
    }

    #[test]
    fn open_with_blank_content_renders_nothing() {
        let tip = Tooltip::new("   ").open(true);
        let (state, scene) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        assert!(!tip.is_visible(&state));
        assert_eq!(scene.overlays().count(), 0);
    }

    #[test]
    fn placement_above_when_room() {
        let tip = Tooltip::new("x");
        let (coords, placement) = tip.compute_position(Rect::new(100.0, 53.0, 40.0, 20.0), vp());
        assert_eq!(placement, Placement::Above);
        assert_eq!(coords, Point::new(120.0, 41.0));
    }

    #[test]
    fn placement_below_near_top() {
        let tip = Tooltip::new("x");
        // 52 is not strictly greater than 40 + 12.
        let (coords, placement) = tip.compute_position(Rect::new(100.0, 52.0, 40.0, 20.0), vp());
        assert_eq!(placement, Placement::Below);
        assert_eq!(coords, Point::new(120.0, 84.0));
    }

    #[test]
    fn placement_uses_client_space() {
        let tip = Tooltip::new("x");
        let anchor = Rect::new(100.0, 300.0, 40.0, 20.0);
        let scrolled = vp().scrolled_to(10.0, 280.0);
        let (coords, placement) = tip.compute_position(anchor, scrolled);
        // Client top is 20: flips below, coordinates stay in document space.
        assert_eq!(placement, Placement::Below);
        assert_eq!(coords, Point::new(120.0, 332.0));
    }

    #[test]
    fn scroll_while_visible_repositions() {
        let tip = Tooltip::new("x").open(true);
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 300.0, 40.0, 20.0));
        assert_eq!(state.placement(), Placement::Above);

        assert!(state.viewport_changed(&tip, vp().scrolled_to(0.0, 280.0)));
        assert_eq!(state.placement(), Placement::Below);
        assert_eq!(state.coords(), Point::new(120.0, 332.0));
    }

    #[test]
    fn scroll_while_hidden_is_ignored() {
        let tip = Tooltip::new("x");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 300.0, 40.0, 20.0));
        assert!(!state.viewport_changed(&tip, vp().scrolled_to(0.0, 280.0)));
        assert!(!state.is_positioned());
    }

    #[test]
    fn no_anchor_stays_unpositioned() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let mut state = TooltipState::new();
        state.pointer_enter(&tip, &ctx(t0));
        assert!(state.tick(&tip, &ctx(t0 + ms(200))));
        assert!(state.is_tracking());
        assert!(!state.is_positioned());

        // The next render supplies the anchor and positions.
        let mut scene = Scene::new(vp());
        tip.render(Rect::new(100.0, 200.0, 36.0, 36.0), &mut scene, &mut state);
        assert!(state.is_positioned());
        let overlay = scene.overlays().next().expect("overlay");
        assert!(overlay.is_opaque());
    }

    #[test]
    fn unpositioned_overlay_is_transparent() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let mut state = TooltipState::new();
        state.pointer_enter(&tip, &ctx(t0));
        state.tick(&tip, &ctx(t0 + ms(200)));
        let mut scene = Scene::new(vp());
        tip.render(Rect::default(), &mut scene, &mut state);
        assert!(!state.is_positioned());
        let overlay = scene.overlays().next().expect("overlay");
        assert!(!overlay.is_opaque());
    }

    #[test]
    fn label_rect_is_centered() {
        let tip = Tooltip::new("abcd").open(true);
        let (state, scene) = anchored(&tip, Rect::new(100.0, 200.0, 40.0, 20.0));
        let overlay = scene.overlays().next().expect("overlay");
        assert_eq!(overlay.name, "abcd");
        // 4 columns * 7 + 24 = 52 wide, centered on x = 120.
        assert_eq!(overlay.rect, Rect::new(94.0, 188.0 - 28.0, 52.0, 28.0));
        assert_eq!(state.coords(), Point::new(120.0, 188.0));
    }

    #[test]
    fn unmount_cancels_pending() {
        let t0 = Instant::now();
        let tip = Tooltip::new("hint");
        let (mut state, _) = anchored(&tip, Rect::new(100.0, 200.0, 36.0, 36.0));
        state.pointer_enter(&tip, &ctx(t0));
        state.unmount();
        assert!(!state.is_pending());
        assert!(!state.tick(&tip, &ctx(t0 + ms(500))));
    }
}
