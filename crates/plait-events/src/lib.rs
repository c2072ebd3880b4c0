//! Typed event model for agent execution streams
//!
//! This crate defines the shared contract between the stream parser and the
//! renderer front ends: a closed set of typed events, each carrying enough
//! information to be rendered without looking at the raw input again. The
//! design mirrors the rest of the workspace's protocol-first philosophy —
//! renderers match exhaustively over [`StreamEvent`], so the compiler flags
//! every dispatch site when a new event kind is added.
//!
//! ## Example
//!
//! ```rust
//! use plait_events::{StreamEvent, TextEvent};
//!
//! let event = StreamEvent::Text(TextEvent::new("Hello").with_source("web-research"));
//! assert_eq!(event.source(), Some("web-research"));
//! ```

pub mod events;
pub mod output;

pub use events::*;
pub use output::*;
