#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS-style pixels. Rectangles stored in a scene use document
//! coordinates (origin at the top-left of the scrollable document); the
//! [`Viewport`] converts them to client coordinates.

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle for layout bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Translate by the given offset.
    #[inline]
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Create a new rectangle inside the current one with the given margin.
    #[must_use]
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: (self.width - margin.left - margin.right).max(0.0),
            height: (self.height - margin.top - margin.bottom).max(0.0),
        }
    }

    /// Split off a column of `width` pixels from the left edge.
    ///
    /// Returns `(left, rest)`; `width` is clamped to the available space.
    pub fn split_left(&self, width: f64) -> (Rect, Rect) {
        let w = width.clamp(0.0, self.width);
        (
            Rect::new(self.x, self.y, w, self.height),
            Rect::new(self.x + w, self.y, self.width - w, self.height),
        )
    }

    /// Split off a column of `width` pixels from the right edge.
    ///
    /// Returns `(rest, right)`.
    pub fn split_right(&self, width: f64) -> (Rect, Rect) {
        let w = width.clamp(0.0, self.width);
        (
            Rect::new(self.x, self.y, self.width - w, self.height),
            Rect::new(self.right() - w, self.y, w, self.height),
        )
    }

    /// Split off a row of `height` pixels from the top edge.
    ///
    /// Returns `(top, rest)`.
    pub fn split_top(&self, height: f64) -> (Rect, Rect) {
        let h = height.clamp(0.0, self.height);
        (
            Rect::new(self.x, self.y, self.width, h),
            Rect::new(self.x, self.y + h, self.width, self.height - h),
        )
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Same value on every side.
    #[inline]
    pub const fn all(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// The visible window onto the document.
///
/// `scroll_x`/`scroll_y` are the document offsets of the viewport's top-left
/// corner, matching `window.scrollX`/`window.scrollY` in a browser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    /// An unscrolled viewport of the given size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Same viewport, scrolled to the given document offset.
    #[inline]
    #[must_use]
    pub const fn scrolled_to(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// Convert a document rect to client (viewport-relative) coordinates.
    #[inline]
    pub fn to_client(&self, rect: Rect) -> Rect {
        rect.offset(-self.scroll_x, -self.scroll_y)
    }

    /// Convert a client point to document coordinates.
    #[inline]
    pub fn to_document(&self, point: Point) -> Point {
        Point::new(point.x + self.scroll_x, point.y + self.scroll_y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}
