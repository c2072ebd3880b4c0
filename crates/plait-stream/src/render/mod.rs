//! Renderer dispatch over typed stream events.
//!
//! A renderer bridges typed events to one output format. The dispatch is an
//! exhaustive match over the closed event set, so every renderer is checked
//! at compile time when an event kind is added. Nested node-stream events
//! are expanded here — and only here — by recursively processing the
//! wrapped raw event, regardless of how many renderer types exist.

pub mod markdown;
pub mod sse;
pub mod terminal;

pub use markdown::MarkdownRenderer;
pub use sse::SseRenderer;
pub use terminal::TerminalRenderer;

use futures_util::{Stream, StreamExt};
use plait_events::{
    FinalResultEvent, HandoffEvent, LifecycleEvent, NodeStartEvent, NodeStopEvent,
    NodeStreamEvent, ReasoningEvent, StreamEvent, TextEvent, ToolResultEvent, ToolStreamEvent,
    ToolUseEvent,
};
use serde_json::Value;

use crate::parser::StreamParser;

/// Maximum nesting depth for node-stream expansion.
///
/// Real orchestrations nest one level; the guard only exists so a
/// malformed cyclic wrapping cannot recurse unboundedly.
pub const MAX_NODE_STREAM_DEPTH: usize = 8;

/// An output-format-specific renderer over a parsed event stream.
///
/// Implementors provide handlers for the four event kinds present in every
/// single-agent interaction (text, tool use, tool result, reasoning); the
/// rarely-relevant kinds default to no-ops.
pub trait StreamRenderer {
    /// The output unit this renderer produces.
    type Output;

    /// The parser holding this renderer's session state.
    fn parser(&mut self) -> &mut StreamParser;

    /// Parse one raw event and render every resulting typed event.
    fn process(&mut self, raw: &Value) -> Vec<Self::Output> {
        self.process_at_depth(raw, 0)
    }

    /// [`StreamRenderer::process`] at a given node-stream nesting depth.
    fn process_at_depth(&mut self, raw: &Value, depth: usize) -> Vec<Self::Output> {
        let events = self.parser().parse(raw);
        let mut outputs = Vec::new();
        for event in events {
            outputs.extend(self.dispatch(event, depth));
        }
        outputs
    }

    /// Route one typed event to its handler.
    fn dispatch(&mut self, event: StreamEvent, depth: usize) -> Vec<Self::Output> {
        match event {
            StreamEvent::Text(e) => self.on_text(e).into_iter().collect(),
            StreamEvent::ToolUse(e) => self.on_tool_use(e).into_iter().collect(),
            StreamEvent::ToolResult(e) => self.on_tool_result(e).into_iter().collect(),
            StreamEvent::ToolStream(e) => self.on_tool_stream(e).into_iter().collect(),
            StreamEvent::Reasoning(e) => self.on_reasoning(e).into_iter().collect(),
            StreamEvent::Lifecycle(e) => self.on_lifecycle(e).into_iter().collect(),
            StreamEvent::NodeStart(e) => self.on_node_start(e).into_iter().collect(),
            StreamEvent::NodeStream(e) => self.on_node_stream(e, depth),
            StreamEvent::NodeStop(e) => self.on_node_stop(e).into_iter().collect(),
            StreamEvent::Handoff(e) => self.on_handoff(e).into_iter().collect(),
            StreamEvent::FinalResult(e) => self.on_final_result(e).into_iter().collect(),
        }
    }

    /// Handle a text event.
    fn on_text(&mut self, event: TextEvent) -> Option<Self::Output>;

    /// Handle a tool-use event (announcement or input update).
    fn on_tool_use(&mut self, event: ToolUseEvent) -> Option<Self::Output>;

    /// Handle a tool-result event.
    fn on_tool_result(&mut self, event: ToolResultEvent) -> Option<Self::Output>;

    /// Handle a reasoning event.
    fn on_reasoning(&mut self, event: ReasoningEvent) -> Option<Self::Output>;

    /// Handle a tool-stream event.
    fn on_tool_stream(&mut self, _event: ToolStreamEvent) -> Option<Self::Output> {
        None
    }

    /// Handle a lifecycle event.
    fn on_lifecycle(&mut self, _event: LifecycleEvent) -> Option<Self::Output> {
        None
    }

    /// Handle an orchestration node start.
    fn on_node_start(&mut self, _event: NodeStartEvent) -> Option<Self::Output> {
        None
    }

    /// Expand a forwarded node-stream event by processing the wrapped raw
    /// event — the single deferred-expansion site.
    fn on_node_stream(&mut self, event: NodeStreamEvent, depth: usize) -> Vec<Self::Output> {
        if depth >= MAX_NODE_STREAM_DEPTH {
            log::warn!(
                "node stream for {} exceeded nesting depth {}, dropping",
                event.node_id,
                MAX_NODE_STREAM_DEPTH
            );
            return Vec::new();
        }
        self.process_at_depth(&event.inner_event, depth + 1)
    }

    /// Handle an orchestration node stop.
    fn on_node_stop(&mut self, _event: NodeStopEvent) -> Option<Self::Output> {
        None
    }

    /// Handle an orchestration handoff.
    fn on_handoff(&mut self, _event: HandoffEvent) -> Option<Self::Output> {
        None
    }

    /// Handle the final orchestration result.
    fn on_final_result(&mut self, _event: FinalResultEvent) -> Option<Self::Output> {
        None
    }

    /// Reset for a new conversational turn.
    ///
    /// Renderers with their own dedup state must clear it in addition to
    /// delegating here.
    fn reset(&mut self) {
        self.parser().reset();
    }
}

/// Feed an asynchronous raw-event stream through a renderer, collecting
/// every output unit.
///
/// The renderer itself stays a synchronous reducer; only the iteration
/// over the runtime feed suspends.
pub async fn drive<R, S>(renderer: &mut R, stream: S) -> Vec<R::Output>
where
    R: StreamRenderer,
    S: Stream<Item = Value>,
{
    futures_util::pin_mut!(stream);
    let mut outputs = Vec::new();
    while let Some(raw) = stream.next().await {
        outputs.extend(renderer.process(&raw));
    }
    outputs
}
