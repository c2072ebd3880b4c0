//! Server-sent-events renderer producing `data:` frames.
//!
//! Every typed event is serialized to its wire JSON and framed for an SSE
//! response body. The renderer emits frames only — serving them over HTTP
//! belongs to the embedding application.

use plait_events::{
    FinalResultEvent, HandoffEvent, LifecycleEvent, NodeStartEvent, NodeStopEvent, ReasoningEvent,
    StreamEvent, TextEvent, ToolResultEvent, ToolStreamEvent, ToolUseEvent,
};

use crate::parser::StreamParser;
use crate::render::StreamRenderer;

/// Renderer emitting SSE `data:` frames, one per typed event.
pub struct SseRenderer {
    parser: StreamParser,
}

impl SseRenderer {
    /// Create an SSE renderer.
    pub fn new() -> Self {
        Self {
            parser: StreamParser::new(),
        }
    }

    fn frame(event: &StreamEvent) -> String {
        match serde_json::to_string(event) {
            Ok(json) => format!("data: {json}\n\n"),
            Err(e) => {
                log::error!("failed to serialize stream event for SSE: {e}");
                "data: {\"type\":\"error\",\"message\":\"failed to serialize event\"}\n\n"
                    .to_string()
            }
        }
    }
}

impl Default for SseRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRenderer for SseRenderer {
    type Output = String;

    fn parser(&mut self) -> &mut StreamParser {
        &mut self.parser
    }

    fn on_text(&mut self, event: TextEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::Text(event)))
    }

    fn on_tool_use(&mut self, event: ToolUseEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::ToolUse(event)))
    }

    fn on_tool_result(&mut self, event: ToolResultEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::ToolResult(event)))
    }

    fn on_tool_stream(&mut self, event: ToolStreamEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::ToolStream(event)))
    }

    fn on_reasoning(&mut self, event: ReasoningEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::Reasoning(event)))
    }

    fn on_lifecycle(&mut self, event: LifecycleEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::Lifecycle(event)))
    }

    fn on_node_start(&mut self, event: NodeStartEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::NodeStart(event)))
    }

    fn on_node_stop(&mut self, event: NodeStopEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::NodeStop(event)))
    }

    fn on_handoff(&mut self, event: HandoffEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::Handoff(event)))
    }

    fn on_final_result(&mut self, event: FinalResultEvent) -> Option<String> {
        Some(Self::frame(&StreamEvent::FinalResult(event)))
    }
}
