#![forbid(unsafe_code)]

//! Core: geometry, canonical events, deferred tasks, and logging.
//!
//! # Role in unitkit
//! `unitkit-core` is the input layer. It owns the pixel geometry that widgets
//! lay themselves out in, the normalized event types that hosts route to
//! widgets, and the single-slot deferred task used for hover delays.
//!
//! # How it fits in the system
//! The render target (`unitkit-render`) stores [`geometry::Rect`]s for every
//! node it holds. Widgets (`unitkit-widgets`) consume [`event::Event`] values
//! together with an [`event::EventContext`] that carries the current instant
//! and viewport, so nothing in the widget layer reads a wall clock.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod timer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, trace_span, warn};
