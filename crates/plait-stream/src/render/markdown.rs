//! Markdown renderer producing structured fragments for web front ends.

use std::collections::{HashMap, HashSet};

use plait_events::{
    FinalResultEvent, HandoffEvent, LifecycleEvent, LifecycleStage, NodeStartEvent, NodeStopEvent,
    OutputKind, ReasoningEvent, StreamOutput, TextEvent, ToolResultEvent, ToolStreamEvent,
    ToolUseEvent,
};
use serde_json::Value;

use crate::parser::StreamParser;
use crate::render::StreamRenderer;

const RESULT_PREVIEW_CHARS: usize = 500;

/// Renderer emitting [`StreamOutput`] markdown fragments.
///
/// A web dashboard routes each fragment to the pane for its source and
/// appends the content; the output kind lets it style tool headers and
/// input updates differently from flowing text.
pub struct MarkdownRenderer {
    parser: StreamParser,
    /// First-sight tracking per (source, call id), independent from the
    /// parser's dedup.
    displayed_tool_calls: HashSet<(Option<String>, String)>,
    /// Whether a reasoning run is open, per source.
    reasoning_active: HashMap<Option<String>, bool>,
}

impl MarkdownRenderer {
    /// Create a markdown renderer.
    pub fn new() -> Self {
        Self {
            parser: StreamParser::new(),
            displayed_tool_calls: HashSet::new(),
            reasoning_active: HashMap::new(),
        }
    }

    fn close_reasoning(&mut self, source: &Option<String>) {
        if let Some(active) = self.reasoning_active.get_mut(source) {
            *active = false;
        }
    }

    fn preview(data: &str, limit: usize) -> String {
        if data.chars().count() > limit {
            let clipped: String = data.chars().take(limit).collect();
            format!("{clipped}\n...(truncated)")
        } else {
            data.to_string()
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRenderer for MarkdownRenderer {
    type Output = StreamOutput;

    fn parser(&mut self) -> &mut StreamParser {
        &mut self.parser
    }

    fn on_text(&mut self, event: TextEvent) -> Option<StreamOutput> {
        self.close_reasoning(&event.source);
        Some(StreamOutput::new(event.data, event.source, OutputKind::Text))
    }

    fn on_tool_use(&mut self, event: ToolUseEvent) -> Option<StreamOutput> {
        self.close_reasoning(&event.source);

        let dedup_key = (
            event.source.clone(),
            event.tool_id.clone().unwrap_or_else(|| event.tool_name.clone()),
        );
        if self.displayed_tool_calls.insert(dedup_key) {
            // First sight: announce the call.
            let mut content = String::from("\n\n**⚙️ Tool call:**");
            match &event.tool_id {
                Some(tool_id) => {
                    content.push_str(&format!(" **`{}`** (`{tool_id}`)\n\n", event.tool_name))
                }
                None => content.push_str(&format!(" **`{}`**\n\n", event.tool_name)),
            }
            return Some(StreamOutput::new(content, event.source, OutputKind::ToolStart));
        }

        // Streaming accumulation: surface the grown input snapshot.
        let input = event.tool_input.filter(|input| !input.is_empty())?;
        let json = serde_json::to_string_pretty(&input).unwrap_or_default();
        Some(StreamOutput::new(
            format!("\n```json\n{json}\n```\n\n"),
            event.source,
            OutputKind::ToolInputUpdate,
        ))
    }

    fn on_tool_result(&mut self, event: ToolResultEvent) -> Option<StreamOutput> {
        self.close_reasoning(&event.source);

        if event.data.is_empty() {
            return None;
        }

        let preview = Self::preview(&event.data, RESULT_PREVIEW_CHARS);
        let content = format!(
            "\n\n**✅ Tool result:** {} chars\n\n```\n{preview}\n```\n\n\n\n---\n\n",
            event.data.chars().count()
        );
        Some(StreamOutput::new(content, event.source, OutputKind::ToolResult))
    }

    fn on_tool_stream(&mut self, event: ToolStreamEvent) -> Option<StreamOutput> {
        let tool_name = event
            .tool_use
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let tool_id = event.tool_use.get("toolUseId").and_then(Value::as_str);
        let tool_input = event.tool_use.get("input").and_then(Value::as_object);

        let mut content = format!("\n\n**📡 Tool stream: `{tool_name}`**");
        if let Some(id) = tool_id {
            content.push_str(&format!(" (`{id}`)"));
        }
        content.push_str("\n\n");

        if let Some(input) = tool_input {
            if !input.is_empty() {
                let json = serde_json::to_string_pretty(input).unwrap_or_default();
                content.push_str(&format!("```json\n{json}\n```\n\n"));
            }
        }

        match &event.data {
            Value::Null => {}
            Value::String(text) => {
                let preview = Self::preview(text, RESULT_PREVIEW_CHARS);
                content.push_str(&format!("```\n{preview}\n```\n\n"));
            }
            other => {
                let json = serde_json::to_string_pretty(other).unwrap_or_default();
                content.push_str(&format!("```json\n{json}\n```\n\n"));
            }
        }

        Some(StreamOutput::new(content, None, OutputKind::ToolStream))
    }

    fn on_reasoning(&mut self, event: ReasoningEvent) -> Option<StreamOutput> {
        // Reasoning carries no attribution; it renders into the top-level
        // pane as a blockquote.
        let source: Option<String> = None;
        let text = event.data.replace('\n', "\n> ");

        let active = self.reasoning_active.entry(source.clone()).or_insert(false);
        let content = if *active {
            text
        } else {
            *active = true;
            format!("> 💭 {text}")
        };
        Some(StreamOutput::new(content, source, OutputKind::Reasoning))
    }

    fn on_lifecycle(&mut self, event: LifecycleEvent) -> Option<StreamOutput> {
        let content = match event.stage {
            LifecycleStage::Init => "\n\n> 🔄 **Event loop initialized**\n\n".to_string(),
            LifecycleStage::Start => "\n\n> ▶️ **Event loop cycle starting**\n\n".to_string(),
            LifecycleStage::Complete => "\n\n> ✅ **Cycle completed**\n\n".to_string(),
            LifecycleStage::ForceStop => {
                let reason = event.force_stop_reason.as_deref().unwrap_or("unknown reason");
                format!("\n\n> 🛑 **Event loop force-stopped**: {reason}\n\n")
            }
        };
        Some(StreamOutput::new(content, None, OutputKind::Lifecycle))
    }

    fn on_node_start(&mut self, event: NodeStartEvent) -> Option<StreamOutput> {
        Some(StreamOutput::new(
            format!(
                "\n\n🔄 **Node [{}]** ({}) starting\n\n",
                event.node_id, event.node_type
            ),
            None,
            OutputKind::MultiagentNodeStart,
        ))
    }

    fn on_node_stop(&mut self, event: NodeStopEvent) -> Option<StreamOutput> {
        let content = match event
            .node_result
            .as_ref()
            .and_then(|r| r.get("execution_time"))
        {
            Some(execution_time) => format!(
                "\n\n✅ **Node [{}]** completed in {execution_time} ms\n\n",
                event.node_id
            ),
            None => format!("\n\n✅ **Node [{}]** completed\n\n", event.node_id),
        };
        Some(StreamOutput::new(content, None, OutputKind::MultiagentNodeStop))
    }

    fn on_handoff(&mut self, event: HandoffEvent) -> Option<StreamOutput> {
        let mut content = format!(
            "\n\n🔀 **Handoff**: {} → {}\n\n",
            event.from_node_ids.join(", "),
            event.to_node_ids.join(", ")
        );
        if let Some(message) = &event.message {
            content.push_str(&format!("Message: {message}\n\n"));
        }
        Some(StreamOutput::new(content, None, OutputKind::MultiagentHandoff))
    }

    fn on_final_result(&mut self, event: FinalResultEvent) -> Option<StreamOutput> {
        let content = match event.result.get("status").and_then(Value::as_str) {
            Some(status) => format!("\n\n📊 **Multi-agent completed**: {status}\n\n"),
            None => "\n\n📊 **Multi-agent completed**\n\n".to_string(),
        };
        Some(StreamOutput::new(content, None, OutputKind::MultiagentResult))
    }

    fn reset(&mut self) {
        self.parser.reset();
        self.displayed_tool_calls.clear();
        self.reasoning_active.clear();
    }
}
