#![forbid(unsafe_code)]

//! Scene = flat list of accessible nodes + overlay layer for one render pass.
//!
//! # Design
//!
//! Node ids are assigned in push order and are only meaningful for the
//! render pass that produced them. Since rendering is a pure function of
//! widget state, re-rendering unchanged state yields the same ids, which is
//! what lets widgets route events to the ids they recorded last frame.
//!
//! The overlay layer is the portal: overlay nodes are laid out in document
//! space with no parent clipping and are never hit-tested (tooltips do not
//! intercept the pointer).
//!
//! # Usage
//!
//! ```
//! use unitkit_core::geometry::{Rect, Viewport};
//! use unitkit_render::scene::{Node, NodeFlags, Role, Scene};
//!
//! let mut scene = Scene::new(Viewport::new(800.0, 600.0));
//! let group = scene.push(Node::new(Role::Group, Rect::new(0.0, 0.0, 200.0, 40.0)));
//! let button = scene.push(
//!     Node::new(Role::Button, Rect::new(0.0, 0.0, 36.0, 36.0))
//!         .name("Decrease value")
//!         .parent(group)
//!         .flags(NodeFlags::DISABLED),
//! );
//!
//! assert_eq!(scene.find_by_name(Role::Button, "Decrease value"), Some(button));
//! assert!(scene.node(button).unwrap().is_disabled());
//! ```

use std::fmt;

use bitflags::bitflags;
use unicode_width::UnicodeWidthStr;
use unitkit_core::geometry::{Point, Rect, Viewport};

/// Identifier of a node within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a node id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Accessible role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Layout container without semantics of its own.
    Group,
    /// Static text.
    Label,
    /// A pressable button; its accessible name is its label.
    Button,
    /// A single-line editable text field.
    TextBox,
    /// Floating descriptive text.
    Tooltip,
}

impl Role {
    /// Lower-case role name used in scene dumps.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Label => "label",
            Self::Button => "button",
            Self::TextBox => "textbox",
            Self::Tooltip => "tooltip",
        }
    }

    /// Whether nodes of this role accept pointer input.
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Button | Self::TextBox)
    }
}

bitflags! {
    /// Node state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Control does not accept activation.
        const DISABLED    = 0b0000_0001;
        /// Option is the active one in its group.
        const SELECTED    = 0b0000_0010;
        /// Node holds keyboard focus.
        const FOCUSED     = 0b0000_0100;
        /// Node is laid out but fully transparent.
        const TRANSPARENT = 0b0000_1000;
        /// Overlay sits below its anchor rather than above it.
        const BELOW       = 0b0001_0000;
    }
}

/// Which layer a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Normal content, clipped by and hit-tested through its parents.
    Content,
    /// Top-level floating layer.
    Overlay,
}

/// One accessible node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    layer: Layer,
    /// Accessible role.
    pub role: Role,
    /// Accessible name (button label, static text, tooltip text).
    pub name: String,
    /// Current value for editable nodes.
    pub value: Option<String>,
    /// Document-space bounds.
    pub rect: Rect,
    /// Logical parent.
    pub parent: Option<NodeId>,
    /// State flags.
    pub flags: NodeFlags,
}

impl Node {
    /// Start building a node with the given role and bounds.
    #[must_use]
    pub fn new(role: Role, rect: Rect) -> Self {
        Self {
            id: NodeId::default(),
            layer: Layer::Content,
            role,
            name: String::new(),
            value: None,
            rect,
            parent: None,
            flags: NodeFlags::empty(),
        }
    }

    /// Set the accessible name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the logical parent.
    #[must_use]
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set state flags.
    #[must_use]
    pub fn flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Add state flags when `on` holds.
    #[must_use]
    pub fn flag_if(mut self, flag: NodeFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }

    /// Id assigned when the node was pushed.
    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Layer the node was pushed into.
    #[inline]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(NodeFlags::DISABLED)
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.flags.contains(NodeFlags::SELECTED)
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.flags.contains(NodeFlags::FOCUSED)
    }

    /// Laid out and not transparent.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        !self.flags.contains(NodeFlags::TRANSPARENT)
    }

    /// Text a reader would see: the value for editable nodes, else the name.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.name)
    }
}

/// Display width of `text` in columns (East Asian wide chars count 2).
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    viewport: Viewport,
    nodes: Vec<Node>,
}

impl Scene {
    /// Create an empty scene for the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: Vec::new(),
        }
    }

    /// Viewport this scene was rendered for.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Drop all nodes and adopt a new viewport, keeping the allocation.
    pub fn reset(&mut self, viewport: Viewport) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            previous_nodes = self.nodes.len(),
            width = viewport.width,
            height = viewport.height,
            "scene reset"
        );
        self.viewport = viewport;
        self.nodes.clear();
    }

    /// Push a content node and return its id.
    pub fn push(&mut self, node: Node) -> NodeId {
        self.push_into(Layer::Content, node)
    }

    /// Push an overlay node and return its id.
    pub fn push_overlay(&mut self, node: Node) -> NodeId {
        self.push_into(Layer::Overlay, node)
    }

    fn push_into(&mut self, layer: Layer, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        node.layer = layer;
        self.nodes.push(node);
        id
    }

    /// Look up a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Number of nodes across both layers.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been pushed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content nodes in push order.
    pub fn content(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.layer == Layer::Content)
    }

    /// Overlay nodes in push order.
    pub fn overlays(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.layer == Layer::Overlay)
    }

    /// All nodes in push order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Children of `parent` in push order.
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.parent == Some(parent))
    }

    /// First node matching role and accessible name.
    pub fn find_by_name(&self, role: Role, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.role == role && n.name == name)
            .map(Node::id)
    }

    /// First node whose visible text equals `text`.
    pub fn find_by_text(&self, text: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.text() == text).map(Node::id)
    }

    /// First node with the given role.
    pub fn find_by_role(&self, role: Role) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.role == role).map(Node::id)
    }

    /// Topmost interactive content node under a client-space point.
    ///
    /// Overlay nodes never take the pointer.
    pub fn hit_test(&self, client: Point) -> Option<NodeId> {
        let point = self.viewport.to_document(client);
        self.nodes
            .iter()
            .rev()
            .filter(|n| n.layer == Layer::Content && n.role.is_interactive())
            .find(|n| n.rect.contains(point))
            .map(Node::id)
    }
}

impl fmt::Display for Scene {
    /// Deterministic text dump, one node per line, content before overlays.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.content() {
            let depth = self.depth(node);
            write_node(f, node, depth)?;
        }
        let mut overlays = self.overlays().peekable();
        if overlays.peek().is_some() {
            writeln!(f, "-- overlay --")?;
            for node in overlays {
                write_node(f, node, 0)?;
            }
        }
        Ok(())
    }
}

impl Scene {
    fn depth(&self, node: &Node) -> usize {
        let mut depth = 0;
        let mut cur = node.parent;
        while let Some(id) = cur {
            depth += 1;
            cur = self.node(id).and_then(|n| n.parent);
        }
        depth
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    write!(f, "{:indent$}{}", "", node.role.as_str(), indent = depth * 2)?;
    if !node.name.is_empty() {
        write!(f, " {:?}", node.name)?;
    }
    if let Some(value) = &node.value {
        write!(f, " value={value:?}")?;
    }
    let mut states = Vec::new();
    if node.is_disabled() {
        states.push("disabled");
    }
    if node.is_selected() {
        states.push("selected");
    }
    if node.is_focused() {
        states.push("focused");
    }
    if !node.is_opaque() {
        states.push("transparent");
    }
    if node.flags.contains(NodeFlags::BELOW) {
        states.push("below");
    }
    if !states.is_empty() {
        write!(f, " [{}]", states.join(", "))?;
    }
    let r = node.rect;
    writeln!(f, " @{},{} {}x{}", r.x, r.y, r.width, r.height)
}
