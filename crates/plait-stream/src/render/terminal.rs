//! Terminal renderer producing ANSI-styled text chunks.

use std::collections::HashMap;

use crossterm::style::{style, Attribute, Color, Stylize};
use plait_events::{
    FinalResultEvent, HandoffEvent, LifecycleEvent, LifecycleStage, NodeStartEvent, NodeStopEvent,
    ReasoningEvent, TextEvent, ToolResultEvent, ToolStreamEvent, ToolUseEvent,
};
use serde_json::Value;

use crate::parser::StreamParser;
use crate::render::StreamRenderer;

const SEPARATOR_WIDTH: usize = 60;
const RESULT_PREVIEW_CHARS: usize = 1000;

/// Whose text is currently flowing, so the source header prints on
/// attribution changes rather than on every chunk. `ResetPending` forces
/// the next text chunk to re-establish itself after tool output.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TextAttribution {
    Agent(Option<String>),
    ResetPending,
}

/// Renderer for terminal output with ANSI colors.
///
/// Output units are ready-to-print string chunks; text chunks carry no
/// trailing newline so streamed tokens join seamlessly.
pub struct TerminalRenderer {
    parser: StreamParser,
    use_colors: bool,
    tool_call_counter: usize,
    displayed_tool_calls: HashMap<String, usize>,
    text_attribution: TextAttribution,
    reasoning_active: bool,
}

impl TerminalRenderer {
    /// Create a terminal renderer with colors enabled.
    pub fn new() -> Self {
        Self {
            parser: StreamParser::new(),
            use_colors: true,
            tool_call_counter: 0,
            displayed_tool_calls: HashMap::new(),
            text_attribution: TextAttribution::Agent(None),
            reasoning_active: false,
        }
    }

    /// Toggle ANSI coloring.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn colorize_bold(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).with(color).attribute(Attribute::Bold).to_string()
        } else {
            text.to_string()
        }
    }

    fn separator() -> String {
        "─".repeat(SEPARATOR_WIDTH)
    }

    /// Newlines owed before block output when streamed reasoning was
    /// interrupted.
    fn close_reasoning(&mut self) -> &'static str {
        if self.reasoning_active {
            self.reasoning_active = false;
            "\n\n"
        } else {
            self.reasoning_active = false;
            ""
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

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRenderer for TerminalRenderer {
    type Output = String;

    fn parser(&mut self) -> &mut StreamParser {
        &mut self.parser
    }

    fn on_text(&mut self, event: TextEvent) -> Option<String> {
        let mut out = String::from(self.close_reasoning());

        // Header only when attribution changes, not on every token.
        if self.text_attribution != TextAttribution::Agent(event.source.clone()) {
            let was_reset_pending = self.text_attribution == TextAttribution::ResetPending;
            self.text_attribution = TextAttribution::Agent(event.source.clone());
            if let Some(source) = &event.source {
                out.push('\n');
                out.push_str(&self.colorize(&format!("[Sub-Agent ⚡ {source}] "), Color::Yellow));
            } else if was_reset_pending {
                out.push('\n');
            }
        }

        if event.source.is_some() {
            out.push_str(&self.colorize(&event.data, Color::Magenta));
        } else {
            out.push_str(&event.data);
        }
        Some(out)
    }

    fn on_tool_use(&mut self, event: ToolUseEvent) -> Option<String> {
        self.text_attribution = TextAttribution::ResetPending;
        let mut out = String::from(self.close_reasoning());

        let tool_key = event
            .tool_id
            .clone()
            .unwrap_or_else(|| event.tool_name.clone());
        let is_new_call = !self.displayed_tool_calls.contains_key(&tool_key);
        if is_new_call {
            self.tool_call_counter += 1;
            self.displayed_tool_calls
                .insert(tool_key.clone(), self.tool_call_counter);
        }
        let number = self.displayed_tool_calls[&tool_key];

        let separator = Self::separator();
        if is_new_call {
            let mut header = format!("Tool #{number}: {}", event.tool_name);
            if let Some(source) = &event.source {
                header = format!("[Sub-Agent: {source}] {header}");
            }
            out.push_str(&format!("\n{separator}\n"));
            out.push_str(&self.colorize_bold(&header, Color::Blue));
            out.push('\n');
        }

        if let Some(input) = &event.tool_input {
            if !input.is_empty() {
                let json = serde_json::to_string_pretty(input).unwrap_or_default();
                out.push_str(&self.colorize_bold(&json, Color::Cyan));
                out.push('\n');
            }
        }

        out.push_str(&separator);
        out.push('\n');
        Some(out)
    }

    fn on_tool_result(&mut self, event: ToolResultEvent) -> Option<String> {
        self.text_attribution = TextAttribution::ResetPending;
        let mut out = String::from(self.close_reasoning());

        let separator = Self::separator();
        out.push_str(&separator);
        out.push('\n');

        let mut header_lines = vec![match &event.source {
            Some(source) => format!("[Sub-Agent: {source}] Tool Result:"),
            None => "Tool Result:".to_string(),
        }];
        if let Some(tool_id) = &event.tool_id {
            header_lines.push(format!("[toolUseId] {tool_id}"));
        }
        if let Some(status) = event
            .metadata
            .as_ref()
            .and_then(|m| m.get("status"))
            .and_then(Value::as_str)
        {
            header_lines.push(format!("[status] {status}"));
        }
        header_lines.push(format!(
            "[content length] {} characters",
            event.data.chars().count()
        ));

        out.push_str(&self.colorize_bold(&header_lines.join("\n"), Color::Green));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');

        if !event.data.is_empty() {
            out.push_str(&Self::preview(&event.data, RESULT_PREVIEW_CHARS));
            out.push('\n');
        }
        out.push_str(&separator);
        out.push_str("\n\n");
        Some(out)
    }

    fn on_tool_stream(&mut self, event: ToolStreamEvent) -> Option<String> {
        self.text_attribution = TextAttribution::ResetPending;
        let mut out = String::from(self.close_reasoning());

        let tool_name = event
            .tool_use
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let tool_id = event.tool_use.get("toolUseId").and_then(Value::as_str);
        let tool_input = event.tool_use.get("input").and_then(Value::as_object);

        let separator = Self::separator();
        let mut header = format!("Tool Stream: {tool_name}");
        if let Some(id) = tool_id {
            header.push_str(&format!(" [toolUseId: {id}]"));
        }
        out.push_str(&format!("\n{separator}\n"));
        out.push_str(&self.colorize_bold(&header, Color::Magenta));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');

        if let Some(input) = tool_input {
            if !input.is_empty() {
                let json = serde_json::to_string_pretty(input).unwrap_or_default();
                out.push_str(&self.colorize_bold(&json, Color::Cyan));
                out.push('\n');
                out.push_str(&separator);
                out.push('\n');
            }
        }

        if !event.data.is_null() {
            let rendered = match &event.data {
                Value::String(text) => text.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_default(),
            };
            out.push_str(&self.colorize_bold(&rendered, Color::Cyan));
            out.push('\n');
        }
        out.push_str(&separator);
        out.push_str("\n\n");
        Some(out)
    }

    fn on_reasoning(&mut self, event: ReasoningEvent) -> Option<String> {
        // The marker goes on the first chunk only, so later tokens are not
        // interleaved with inserted characters.
        let text = if self.reasoning_active {
            event.data
        } else {
            self.reasoning_active = true;
            format!("💭 {}", event.data)
        };
        Some(self.colorize(&text, Color::Magenta))
    }

    fn on_lifecycle(&mut self, event: LifecycleEvent) -> Option<String> {
        let line = match event.stage {
            LifecycleStage::Init => self.colorize("🔄 Event loop initialized", Color::Yellow),
            LifecycleStage::Start => self.colorize("▶️ Event loop cycle starting", Color::Yellow),
            LifecycleStage::Complete => self.colorize("✅ Cycle completed", Color::Green),
            LifecycleStage::ForceStop => {
                let reason = event.force_stop_reason.as_deref().unwrap_or("unknown reason");
                self.colorize(&format!("🛑 Event loop force-stopped: {reason}"), Color::Red)
            }
        };
        Some(format!("{line}\n"))
    }

    fn on_node_start(&mut self, event: NodeStartEvent) -> Option<String> {
        let message = format!(
            "🔄 Node [{}] ({}) starting",
            event.node_id, event.node_type
        );
        Some(format!("\n{}\n", self.colorize(&message, Color::Cyan)))
    }

    fn on_node_stop(&mut self, event: NodeStopEvent) -> Option<String> {
        let message = match event
            .node_result
            .as_ref()
            .and_then(|r| r.get("execution_time"))
        {
            Some(execution_time) => format!(
                "✅ Node [{}] completed in {} ms",
                event.node_id, execution_time
            ),
            None => format!("✅ Node [{}] completed", event.node_id),
        };
        Some(format!("\n{}\n", self.colorize(&message, Color::Green)))
    }

    fn on_handoff(&mut self, event: HandoffEvent) -> Option<String> {
        let message = format!(
            "🔀 Handoff: {} → {}",
            event.from_node_ids.join(", "),
            event.to_node_ids.join(", ")
        );
        let mut out = format!("\n{}\n", self.colorize(&message, Color::Magenta));
        if let Some(note) = &event.message {
            out.push_str(&self.colorize(&format!("   Message: {note}"), Color::Magenta));
            out.push('\n');
        }
        Some(out)
    }

    fn on_final_result(&mut self, event: FinalResultEvent) -> Option<String> {
        let message = match event.result.get("status").and_then(Value::as_str) {
            Some(status) => format!("📊 Multi-agent completed: {status}"),
            None => "📊 Multi-agent completed".to_string(),
        };
        Some(format!("\n{}\n", self.colorize(&message, Color::Green)))
    }

    fn reset(&mut self) {
        self.parser.reset();
        self.tool_call_counter = 0;
        self.displayed_tool_calls.clear();
        self.text_attribution = TextAttribution::Agent(None);
        self.reasoning_active = false;
    }
}
