//! Typed events reconstructed from an agent execution stream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object payload carried by an event.
pub type JsonMap = Map<String, Value>;

/// The kind of a stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A chunk of assistant-generated text.
    Text,
    /// A tool invocation in progress (first announcement or input update).
    CurrentToolUse,
    /// The completed output of a tool call.
    ToolResult,
    /// Raw data streamed by a tool mid-execution.
    ToolStreamEvent,
    /// A chunk of the agent's visible reasoning trace.
    Reasoning,
    /// A coarse session-level transition.
    Lifecycle,
    /// An orchestration node has started.
    MultiagentNodeStart,
    /// An orchestration node forwarded an inner event.
    MultiagentNodeStream,
    /// An orchestration node has stopped.
    MultiagentNodeStop,
    /// Control handed off between orchestration nodes.
    MultiagentHandoff,
    /// The final aggregated orchestration result.
    MultiagentResult,
}

/// The stage of a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    /// The event loop was initialized.
    Init,
    /// An event loop cycle is starting.
    Start,
    /// A cycle completed.
    Complete,
    /// The event loop was force-stopped.
    ForceStop,
}

/// A chunk of assistant-generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEvent {
    /// The text chunk.
    pub data: String,
    /// Originating sub-agent, or `None` for the top-level agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A tool invocation in progress.
///
/// Emitted once when a tool call is first seen, and again whenever the
/// accumulated input snapshot grows during streaming. Renderers tell the
/// two apart with their own first-sight bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseEvent {
    /// The name of the tool being invoked.
    pub tool_name: String,
    /// The tool-call id, when the runtime provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    /// The accumulated input snapshot at this point in the stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<JsonMap>,
    /// Originating sub-agent, or `None` for the top-level agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The completed output of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultEvent {
    /// The textual result content.
    pub data: String,
    /// The tool name, recovered from the matching tool-use announcement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// The tool-call id this result answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    /// Extra result attributes (e.g. completion status).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonMap>,
    /// Originating sub-agent, or `None` for the top-level agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Raw pass-through data streamed by a tool mid-execution.
///
/// Carries no source attribution: it surfaces top-level tool streaming
/// before any sub-agent attribution is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStreamEvent {
    /// The tool-use descriptor of the streaming tool.
    pub tool_use: JsonMap,
    /// The streamed payload, verbatim.
    pub data: Value,
}

/// A chunk of the agent's visible reasoning trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningEvent {
    /// The reasoning text chunk.
    pub data: String,
    /// Extra reasoning attributes (e.g. a signature).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonMap>,
}

/// A coarse session-level transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Which transition occurred.
    #[serde(rename = "lifecycle_type")]
    pub stage: LifecycleStage,
    /// Message payload attached to the transition, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    /// Why the loop was force-stopped, for [`LifecycleStage::ForceStop`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_stop_reason: Option<String>,
    /// Final result payload, for [`LifecycleStage::Complete`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// An orchestration node has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStartEvent {
    /// The node identifier.
    pub node_id: String,
    /// The node type (e.g. agent, swarm, graph).
    pub node_type: String,
}

/// An orchestration node forwarded an inner raw event.
///
/// The inner payload is kept raw here: it is expanded exactly once, by the
/// renderer dispatch stage, never at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStreamEvent {
    /// The forwarding node.
    pub node_id: String,
    /// The wrapped raw event, unexpanded.
    pub inner_event: Value,
}

/// An orchestration node has stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStopEvent {
    /// The node identifier.
    pub node_id: String,
    /// The node's result payload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_result: Option<Value>,
}

/// Control handed off between orchestration nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffEvent {
    /// The nodes handing off.
    pub from_node_ids: Vec<String>,
    /// The nodes receiving control.
    pub to_node_ids: Vec<String>,
    /// Optional handoff message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The final aggregated orchestration result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResultEvent {
    /// The aggregated result payload.
    pub result: Value,
}

/// An event reconstructed from the agent execution stream.
///
/// The variant set is closed: renderers match exhaustively, so adding a
/// kind is a compile-checked single point of change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    /// A chunk of assistant-generated text.
    #[serde(rename = "text")]
    Text(TextEvent),
    /// A tool invocation in progress.
    #[serde(rename = "current_tool_use")]
    ToolUse(ToolUseEvent),
    /// The completed output of a tool call.
    #[serde(rename = "tool_result")]
    ToolResult(ToolResultEvent),
    /// Raw data streamed by a tool mid-execution.
    #[serde(rename = "tool_stream_event")]
    ToolStream(ToolStreamEvent),
    /// A chunk of the agent's visible reasoning trace.
    #[serde(rename = "reasoning")]
    Reasoning(ReasoningEvent),
    /// A coarse session-level transition.
    #[serde(rename = "lifecycle")]
    Lifecycle(LifecycleEvent),
    /// An orchestration node has started.
    #[serde(rename = "multiagent_node_start")]
    NodeStart(NodeStartEvent),
    /// An orchestration node forwarded an inner event.
    #[serde(rename = "multiagent_node_stream")]
    NodeStream(NodeStreamEvent),
    /// An orchestration node has stopped.
    #[serde(rename = "multiagent_node_stop")]
    NodeStop(NodeStopEvent),
    /// Control handed off between orchestration nodes.
    #[serde(rename = "multiagent_handoff")]
    Handoff(HandoffEvent),
    /// The final aggregated orchestration result.
    #[serde(rename = "multiagent_result")]
    FinalResult(FinalResultEvent),
}

impl StreamEvent {
    /// Get the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            StreamEvent::Text(_) => EventKind::Text,
            StreamEvent::ToolUse(_) => EventKind::CurrentToolUse,
            StreamEvent::ToolResult(_) => EventKind::ToolResult,
            StreamEvent::ToolStream(_) => EventKind::ToolStreamEvent,
            StreamEvent::Reasoning(_) => EventKind::Reasoning,
            StreamEvent::Lifecycle(_) => EventKind::Lifecycle,
            StreamEvent::NodeStart(_) => EventKind::MultiagentNodeStart,
            StreamEvent::NodeStream(_) => EventKind::MultiagentNodeStream,
            StreamEvent::NodeStop(_) => EventKind::MultiagentNodeStop,
            StreamEvent::Handoff(_) => EventKind::MultiagentHandoff,
            StreamEvent::FinalResult(_) => EventKind::MultiagentResult,
        }
    }

    /// Get the sub-agent attribution of this event, if it carries one.
    ///
    /// Tool-stream, lifecycle, and orchestration events have no attribution
    /// and always return `None`, as do top-level text/tool events.
    pub fn source(&self) -> Option<&str> {
        match self {
            StreamEvent::Text(e) => e.source.as_deref(),
            StreamEvent::ToolUse(e) => e.source.as_deref(),
            StreamEvent::ToolResult(e) => e.source.as_deref(),
            _ => None,
        }
    }
}

// Convenience constructors for events
impl TextEvent {
    /// Create a top-level text event.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            source: None,
        }
    }

    /// Attribute this event to a sub-agent.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl ToolUseEvent {
    /// Create a tool-use event with no id or input.
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_id: None,
            tool_input: None,
            source: None,
        }
    }
}

impl ToolResultEvent {
    /// Create a tool-result event carrying only result content.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            tool_name: None,
            tool_id: None,
            metadata: None,
            source: None,
        }
    }
}

impl ReasoningEvent {
    /// Create a reasoning event without metadata.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            metadata: None,
        }
    }
}

impl LifecycleEvent {
    /// Create a lifecycle event for the given stage.
    pub fn new(stage: LifecycleStage) -> Self {
        Self {
            stage,
            message: None,
            force_stop_reason: None,
            result: None,
        }
    }
}

impl NodeStartEvent {
    /// Create a node-start event.
    pub fn new(node_id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            node_type: node_type.into(),
        }
    }
}

impl NodeStreamEvent {
    /// Create a node-stream event wrapping a raw inner event.
    pub fn new(node_id: impl Into<String>, inner_event: Value) -> Self {
        Self {
            node_id: node_id.into(),
            inner_event,
        }
    }
}

impl NodeStopEvent {
    /// Create a node-stop event.
    pub fn new(node_id: impl Into<String>, node_result: Option<Value>) -> Self {
        Self {
            node_id: node_id.into(),
            node_result,
        }
    }
}

impl HandoffEvent {
    /// Create a handoff event.
    pub fn new(from_node_ids: Vec<String>, to_node_ids: Vec<String>) -> Self {
        Self {
            from_node_ids,
            to_node_ids,
            message: None,
        }
    }
}

impl FinalResultEvent {
    /// Create a final-result event.
    pub fn new(result: Value) -> Self {
        Self { result }
    }
}
