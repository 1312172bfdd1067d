#![forbid(unsafe_code)]

//! Test driver for unitkit components.
//!
//! [`Screen`] mounts a [`Component`], renders it into a [`Scene`], and
//! exposes the queries and interactions a user-level test needs: find nodes
//! by role, accessible name or visible text; click, focus, type and hover;
//! and advance a fake clock so hover delays fire deterministically.
//!
//! Every interaction re-renders, so queries always observe the state after
//! the last event.
//!
//! ```
//! use unitkit_harness::Screen;
//! use unitkit_render::Role;
//! use unitkit_widgets::UnitValue;
//!
//! let mut screen = Screen::render(UnitValue::new());
//! let input = screen.textbox()?;
//! assert_eq!(screen.value(input)?, "1");
//!
//! let increase = screen.get_by_name(Role::Button, "Increase value")?;
//! screen.click(increase)?;
//! assert_eq!(screen.value(input)?, "1.1");
//! # Ok::<(), unitkit_harness::QueryError>(())
//! ```

use std::fmt;

use tracing::{debug, trace};
use unitkit_core::event::{
    Event, EventContext, KeyCode, KeyEvent, PasteEvent, PointerEvent, PointerEventKind,
};
use unitkit_core::geometry::{Point, Rect, Viewport};
use unitkit_render::{Node, NodeId, Role, Scene};
use unitkit_widgets::Component;
use web_time::{Duration, Instant};

/// A query that matched nothing, or an id that no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// No node matched.
    NotFound {
        /// Human-readable description of the query.
        query: String,
        /// Scene dump at the time of the query.
        scene: String,
    },
    /// The id is out of range for the current scene.
    Stale(NodeId),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { query, scene } => {
                write!(f, "unable to find node {query}\n{scene}")
            }
            Self::Stale(id) => write!(f, "node #{} is not in the current scene", id.id()),
        }
    }
}

impl std::error::Error for QueryError {}

/// A mounted component plus a fake clock and a focus cursor.
#[derive(Debug)]
pub struct Screen<C: Component> {
    component: C,
    scene: Scene,
    area: Rect,
    viewport: Viewport,
    epoch: Instant,
    elapsed: Duration,
    focused: Option<NodeId>,
}

impl<C: Component> Screen<C> {
    /// Mount into the default 1024x768 viewport.
    pub fn render(component: C) -> Self {
        Self::with_viewport(component, Viewport::default())
    }

    /// Mount into a custom viewport. The component's area is the viewport's
    /// size at the document origin.
    pub fn with_viewport(component: C, viewport: Viewport) -> Self {
        let mut screen = Self {
            component,
            scene: Scene::new(viewport),
            area: Rect::from_size(viewport.width, viewport.height),
            viewport,
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
            focused: None,
        };
        screen.rerender();
        screen
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current fake time.
    pub fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }

    /// Node that currently has focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Deterministic text dump of the current scene.
    pub fn snapshot(&self) -> String {
        self.scene.to_string()
    }

    /// Unmount the component and hand it back.
    pub fn unmount(mut self) -> C {
        self.component.unmount();
        self.component
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn get_by_role(&self, role: Role) -> Result<NodeId, QueryError> {
        self.scene
            .find_by_role(role)
            .ok_or_else(|| self.not_found(format!("with role {}", role.as_str())))
    }

    /// First node with the given role and accessible name.
    pub fn get_by_name(&self, role: Role, name: &str) -> Result<NodeId, QueryError> {
        self.scene
            .find_by_name(role, name)
            .ok_or_else(|| self.not_found(format!("{} named {name:?}", role.as_str())))
    }

    /// First node whose visible text is `text`.
    pub fn get_by_text(&self, text: &str) -> Result<NodeId, QueryError> {
        self.query_by_text(text)
            .ok_or_else(|| self.not_found(format!("with text {text:?}")))
    }

    /// Like [`get_by_text`](Self::get_by_text), for asserting absence.
    pub fn query_by_text(&self, text: &str) -> Option<NodeId> {
        self.scene.find_by_text(text)
    }

    /// The first text box.
    pub fn textbox(&self) -> Result<NodeId, QueryError> {
        self.get_by_role(Role::TextBox)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, QueryError> {
        self.scene.node(id).ok_or(QueryError::Stale(id))
    }

    /// Value of a text box (empty for nodes without one).
    pub fn value(&self, id: NodeId) -> Result<&str, QueryError> {
        Ok(self.node(id)?.value.as_deref().unwrap_or_default())
    }

    pub fn is_disabled(&self, id: NodeId) -> Result<bool, QueryError> {
        Ok(self.node(id)?.is_disabled())
    }

    pub fn is_selected(&self, id: NodeId) -> Result<bool, QueryError> {
        Ok(self.node(id)?.is_selected())
    }

    pub fn is_focused(&self, id: NodeId) -> Result<bool, QueryError> {
        Ok(self.node(id)?.is_focused())
    }

    // ---------------------------------------------------------------------
    // Interactions
    // ---------------------------------------------------------------------

    /// Click a node. Disabled nodes swallow the click; otherwise focus moves
    /// to the node first.
    pub fn click(&mut self, id: NodeId) -> Result<bool, QueryError> {
        let node = self.node(id)?;
        if node.is_disabled() {
            debug!(node = id.id(), "click on disabled node ignored");
            return Ok(false);
        }
        let position = self.viewport.to_client(node.rect);
        let center = Point::new(position.center_x(), position.top() + position.height / 2.0);
        let focus_changed = self.focus(id)?;
        let clicked = self.dispatch(
            Some(id),
            Event::Pointer(PointerEvent::new(PointerEventKind::Click, center)),
        );
        Ok(focus_changed || clicked)
    }

    /// Click whatever interactive node is under a client-space point.
    pub fn click_at(&mut self, x: f64, y: f64) -> Result<bool, QueryError> {
        let id = self
            .scene
            .hit_test(Point::new(x, y))
            .ok_or_else(|| self.not_found(format!("under ({x}, {y})")))?;
        self.click(id)
    }

    /// Move focus to `id`, blurring whatever had it.
    pub fn focus(&mut self, id: NodeId) -> Result<bool, QueryError> {
        self.node(id)?;
        if self.focused == Some(id) {
            return Ok(false);
        }
        let blurred = self.blur();
        self.focused = Some(id);
        let focused = self.dispatch(Some(id), Event::Focus(true));
        Ok(blurred || focused)
    }

    /// Drop focus from the focused node, if any.
    pub fn blur(&mut self) -> bool {
        match self.focused.take() {
            Some(id) => self.dispatch(Some(id), Event::Focus(false)),
            None => false,
        }
    }

    /// Replace the text of a field wholesale, without moving focus.
    pub fn change(&mut self, id: NodeId, text: &str) -> Result<bool, QueryError> {
        self.node(id)?;
        Ok(self.dispatch(Some(id), Event::Change(text.to_string())))
    }

    /// Focus a field and empty it.
    pub fn clear(&mut self, id: NodeId) -> Result<bool, QueryError> {
        let focused = self.focus(id)?;
        Ok(self.change(id, "")? || focused)
    }

    /// Focus a field and type `text` one key at a time at the cursor.
    pub fn type_text(&mut self, id: NodeId, text: &str) -> Result<bool, QueryError> {
        let mut changed = self.focus(id)?;
        for c in text.chars() {
            changed |= self.dispatch(Some(id), Event::Key(KeyEvent::new(KeyCode::Char(c))));
        }
        Ok(changed)
    }

    /// Press a key on the focused node.
    pub fn press(&mut self, code: KeyCode) -> bool {
        let target = self.focused;
        self.dispatch(target, Event::Key(KeyEvent::new(code)))
    }

    /// Paste text into the focused node.
    pub fn paste(&mut self, text: &str) -> bool {
        let target = self.focused;
        self.dispatch(target, Event::Paste(PasteEvent::new(text)))
    }

    pub fn pointer_enter(&mut self, id: NodeId) -> Result<bool, QueryError> {
        self.pointer(id, PointerEventKind::Enter)
    }

    pub fn pointer_leave(&mut self, id: NodeId) -> Result<bool, QueryError> {
        self.pointer(id, PointerEventKind::Leave)
    }

    /// Advance the fake clock and run due deferred work.
    pub fn advance_timers(&mut self, by: Duration) -> bool {
        self.elapsed += by;
        trace!(elapsed_ms = self.elapsed.as_millis() as u64, "timers advanced");
        let ctx = self.ctx();
        let changed = self.component.tick(&ctx);
        self.rerender();
        changed
    }

    /// Scroll the document to an absolute offset.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> bool {
        self.viewport = self.viewport.scrolled_to(x, y);
        self.dispatch(None, Event::Scroll { x, y })
    }

    /// Resize the viewport, keeping the scroll offset.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.viewport.width = width;
        self.viewport.height = height;
        self.dispatch(None, Event::Resize { width, height })
    }

    fn pointer(&mut self, id: NodeId, kind: PointerEventKind) -> Result<bool, QueryError> {
        let rect = self.viewport.to_client(self.node(id)?.rect);
        let at = Point::new(rect.left(), rect.top());
        Ok(self.dispatch(Some(id), Event::Pointer(PointerEvent::new(kind, at))))
    }

    fn dispatch(&mut self, target: Option<NodeId>, event: Event) -> bool {
        debug!(node = ?target.map(NodeId::id), event = ?event, "dispatch");
        let ctx = self.ctx();
        let changed = self.component.handle_event(target, &event, &ctx);
        self.rerender();
        changed
    }

    fn ctx(&self) -> EventContext {
        EventContext::new(self.now(), self.viewport)
    }

    fn rerender(&mut self) {
        self.scene.reset(self.viewport);
        self.component.render(self.area, &mut self.scene);
    }

    fn not_found(&self, query: String) -> QueryError {
        QueryError::NotFound {
            query,
            scene: self.snapshot(),
        }
    }
}
