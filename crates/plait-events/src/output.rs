//! Structured renderer output with source tracking.

use serde::{Deserialize, Serialize};

/// The kind of output a renderer produced for one typed event.
///
/// Finer-grained than [`crate::EventKind`]: the first announcement of a
/// tool call and a later input-accumulation update are the same event kind
/// but different output kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Assistant text content.
    Text,
    /// First announcement of a tool call.
    ToolStart,
    /// Accumulated tool input grew during streaming.
    ToolInputUpdate,
    /// Completed tool output.
    ToolResult,
    /// Mid-execution tool streaming data.
    ToolStream,
    /// Reasoning trace content.
    Reasoning,
    /// Session lifecycle transition.
    Lifecycle,
    /// Orchestration node started.
    MultiagentNodeStart,
    /// Orchestration node stopped.
    MultiagentNodeStop,
    /// Orchestration handoff.
    MultiagentHandoff,
    /// Final orchestration result.
    MultiagentResult,
}

/// One unit of rendered output, ready for a front end to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOutput {
    /// The rendered content fragment.
    pub content: String,
    /// Originating sub-agent, or `None` for the top-level agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// What the fragment represents.
    pub kind: OutputKind,
}

impl StreamOutput {
    /// Create an output unit.
    pub fn new(content: impl Into<String>, source: Option<String>, kind: OutputKind) -> Self {
        Self {
            content: content.into(),
            source,
            kind,
        }
    }
}
