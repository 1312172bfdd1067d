#![forbid(unsafe_code)]

//! Render target for unitkit widgets.
//!
//! # Role in unitkit
//! Widgets do not paint pixels. They describe what they show as a flat list
//! of accessible [`scene::Node`]s (role, accessible name, value, state flags,
//! and a document-space rectangle) pushed into a [`scene::Scene`]. Floating
//! content such as tooltips goes into the scene's overlay layer, which is
//! positioned independently of any content node.
//!
//! Hosts read the scene to paint, hit-test pointer input, and route events
//! back to the node ids widgets recorded while rendering. Tests query it the
//! way a DOM testing library queries a document.

pub mod scene;

pub use scene::{Layer, Node, NodeFlags, NodeId, Role, Scene, text_width};
