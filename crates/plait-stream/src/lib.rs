//! Stream machinery for agent execution events
//!
//! An agent runtime emits a heterogeneous feed of loosely-typed event
//! mappings: text deltas, accumulating tool-use descriptors, tool results
//! buried in message content, relayed sub-agent streams, lifecycle markers,
//! and orchestration signals — unordered beyond arrival order, partially
//! duplicated, and with no schema guarantee. This crate reduces that feed
//! to the typed event model of `plait-events` and renders it for different
//! front ends.
//!
//! - [`parser::StreamParser`] is the stateful reducer: one raw event in,
//!   zero or more typed events out, with exactly-once tool-call
//!   announcements and consistent sub-agent attribution across a turn.
//! - [`render::StreamRenderer`] dispatches typed events to per-kind
//!   handlers and owns the single expansion site for nested node streams.
//! - [`render::TerminalRenderer`], [`render::MarkdownRenderer`], and
//!   [`render::SseRenderer`] format events for a terminal, a web
//!   dashboard, and an SSE response body.
//!
//! The reducers are synchronous; [`render::drive`] adapts them to an
//! asynchronous runtime feed.

pub mod parser;
pub mod render;

pub use parser::StreamParser;
pub use render::{
    drive, MarkdownRenderer, SseRenderer, StreamRenderer, TerminalRenderer,
    MAX_NODE_STREAM_DEPTH,
};
