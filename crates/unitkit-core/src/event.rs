#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts translate whatever their platform delivers into these events and
//! route them to a target node (see `unitkit_render::NodeId`). Every event is
//! handled together with an [`EventContext`] carrying the current instant and
//! viewport.
//!
//! # Design Notes
//!
//! - Pointer events carry client coordinates; enter/leave are delivered to
//!   the node the pointer crossed into or out of
//! - `KeyEventKind` defaults to `Press`
//! - `Modifiers` use bitflags for easy combination
//! - `Change` replaces a text field's whole value in one step, the way a form
//!   library's change event does

use bitflags::bitflags;
use web_time::Instant;

use crate::geometry::{Point, Viewport};

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event, delivered to the focused node.
    Key(KeyEvent),

    /// A pointer event.
    Pointer(PointerEvent),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),

    /// The target text field's value was replaced wholesale.
    Change(String),

    /// Paste event.
    Paste(PasteEvent),

    /// The document was scrolled to a new offset.
    Scroll {
        /// New horizontal scroll offset.
        x: f64,
        /// New vertical scroll offset.
        y: f64,
    },

    /// The viewport was resized.
    Resize {
        /// New viewport width in pixels.
        width: f64,
        /// New viewport height in pixels.
        height: f64,
    },
}

impl Event {
    /// Whether this event changes the viewport rather than targeting a node.
    #[must_use]
    pub const fn is_viewport_change(&self) -> bool {
        matches!(self, Self::Scroll { .. } | Self::Resize { .. })
    }
}

/// Per-dispatch context handed to widgets alongside an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventContext {
    /// The instant at which the event is handled.
    pub now: Instant,
    /// Viewport at the time of the event (after any scroll/resize applied).
    pub viewport: Viewport,
}

impl EventContext {
    /// Create a context.
    #[must_use]
    pub const fn new(now: Instant, viewport: Viewport) -> Self {
        Self { now, viewport }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Whether this event should act (press or auto-repeat).
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Delete key.
    Delete,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguished).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Client position of the pointer.
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer crossed into the target.
    Enter,

    /// Pointer crossed out of the target.
    Leave,

    /// Primary button pressed and released over the target.
    Click,
}

/// A paste event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    /// The pasted text content.
    pub text: String,
}

impl PasteEvent {
    /// Create a new paste event.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
