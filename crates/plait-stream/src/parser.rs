//! Stateful reducer from raw runtime events to typed stream events.
//!
//! The runtime feed is an untyped protocol: loosely structured JSON objects
//! whose interpretation depends on which keys are present. [`StreamParser`]
//! consumes one raw event at a time and emits zero or more typed events,
//! holding the cross-call state needed to reconstruct tool-call lifecycles
//! and nested sub-agent streams — announced call ids, accumulated input
//! snapshots, and the set of calls currently relaying an isolated sub-agent.
//!
//! The parser is infallible by design: a malformed event contributes no
//! events for the rule it fails, and never aborts the stream.

use std::collections::{HashMap, HashSet};

use plait_events::{
    FinalResultEvent, HandoffEvent, JsonMap, LifecycleEvent, LifecycleStage, NodeStartEvent,
    NodeStopEvent, NodeStreamEvent, ReasoningEvent, StreamEvent, TextEvent, ToolResultEvent,
    ToolStreamEvent, ToolUseEvent,
};
use serde_json::Value;

/// Key into the last-seen input snapshots: sub-agent name (or `None` for
/// the top-level agent) plus tool-call id.
type ToolKey = (Option<String>, String);

/// Stateful parser turning raw runtime events into [`StreamEvent`]s.
///
/// One parser instance serves exactly one in-flight conversational turn;
/// call [`StreamParser::reset`] before starting the next turn, or stale
/// dedup state will suppress legitimate re-announcements.
#[derive(Debug, Default)]
pub struct StreamParser {
    /// Tool-call ids already announced, so each call starts exactly once.
    displayed_tool_calls: HashSet<String>,
    /// Tool-call id → tool name, so a later result-only event can recover
    /// the name.
    tool_use_mapping: HashMap<String, String>,
    /// Last accumulated input snapshot per (source, call id), to detect
    /// growth during streamed input accumulation.
    last_tool_input: HashMap<ToolKey, JsonMap>,
    /// Calls currently relaying an isolated sub-agent stream; drained
    /// exactly once when the matching tool result arrives.
    active_subagent_tools: HashSet<String>,
}

impl StreamParser {
    /// Create a parser with empty session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one raw event into an ordered list of typed events.
    pub fn parse(&mut self, raw: &Value) -> Vec<StreamEvent> {
        let Some(event) = raw.as_object() else {
            return Vec::new();
        };

        let mut parsed = Vec::new();

        // Orchestration events short-circuit everything else. An unknown
        // type tag is not an orchestration event and falls through.
        if let Some(tag) = event.get("type").and_then(Value::as_str) {
            if let Some(orchestration) = parse_orchestration(tag, event) {
                parsed.push(orchestration);
                return parsed;
            }
        }

        // Lifecycle markers are independent flags, not mutually exclusive.
        if flag(event, "init_event_loop") {
            let mut lifecycle = LifecycleEvent::new(LifecycleStage::Init);
            lifecycle.message = event.get("message").cloned();
            parsed.push(StreamEvent::Lifecycle(lifecycle));
        }
        if flag(event, "start_event_loop") {
            let mut lifecycle = LifecycleEvent::new(LifecycleStage::Start);
            lifecycle.message = event.get("message").cloned();
            parsed.push(StreamEvent::Lifecycle(lifecycle));
        }
        if flag(event, "complete") {
            let mut lifecycle = LifecycleEvent::new(LifecycleStage::Complete);
            lifecycle.result = event.get("result").cloned();
            parsed.push(StreamEvent::Lifecycle(lifecycle));
        }
        if flag(event, "force_stop") {
            let mut lifecycle = LifecycleEvent::new(LifecycleStage::ForceStop);
            lifecycle.force_stop_reason = event
                .get("force_stop_reason")
                .and_then(Value::as_str)
                .map(str::to_string);
            parsed.push(StreamEvent::Lifecycle(lifecycle));
        }

        // Tool-stream envelope: either a sub-agent relay or plain
        // pass-through streaming data.
        if let Some(envelope) = event.get("tool_stream_event").and_then(Value::as_object) {
            if !envelope.is_empty() {
                let tool_use = envelope.get("tool_use").and_then(Value::as_object);
                let stream_data = envelope.get("data");

                if let Some((inner, skill_name)) = relay_payload(stream_data) {
                    // The relayed stream surfaces the sub-agent's own
                    // events; the envelope itself is suppressed so the
                    // activity is not shown at two levels.
                    if let Some(id) = tool_use
                        .and_then(|t| t.get("toolUseId"))
                        .and_then(Value::as_str)
                    {
                        if !id.is_empty() {
                            self.active_subagent_tools.insert(id.to_string());
                        }
                    }
                    parsed.extend(self.parse_relayed(inner, skill_name));
                    return parsed;
                }

                let has_tool_use = tool_use.is_some_and(|t| !t.is_empty());
                let has_data = stream_data.is_some_and(|d| !d.is_null());
                if has_tool_use || has_data {
                    parsed.push(StreamEvent::ToolStream(ToolStreamEvent {
                        tool_use: tool_use.cloned().unwrap_or_default(),
                        data: stream_data.cloned().unwrap_or(Value::Null),
                    }));
                    return parsed;
                }
            }
        }

        // Top-level text. No grouping-id dedup: legitimate streaming emits
        // multiple chunks under one grouping id.
        if let Some(text) = event.get("data").and_then(Value::as_str) {
            if !text.is_empty() {
                parsed.push(StreamEvent::Text(TextEvent::new(text)));
            }
        }

        // Top-level tool use, suppressed while a sub-agent tool is active:
        // the runtime echoes sub-agent tool activity at the top level and
        // the relay path already surfaces it.
        if let Some(tool_use) = extract_tool_use(event) {
            if self.active_subagent_tools.is_empty() {
                self.emit_tool_use(&tool_use, None, &mut parsed);
            }
        }

        // Tool result.
        if let Some(tool_result) = extract_tool_result(event) {
            let tool_id = tool_result
                .get("toolUseId")
                .and_then(Value::as_str)
                .unwrap_or("");
            if !tool_id.is_empty() && self.active_subagent_tools.remove(tool_id) {
                // The sub-agent call completed; its result was surfaced
                // through the relay path.
            } else {
                let tool_name = self
                    .tool_use_mapping
                    .get(tool_id)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                parsed.push(StreamEvent::ToolResult(ToolResultEvent {
                    data: extract_result_content(&tool_result),
                    tool_name: Some(tool_name),
                    tool_id: non_empty(tool_id),
                    metadata: status_metadata(&tool_result),
                    source: None,
                }));
            }
        }

        // Reasoning trace.
        if let Some(text) = event.get("reasoningText").and_then(Value::as_str) {
            if !text.is_empty() {
                let metadata = event.contains_key("reasoning_signature").then(|| {
                    let signature = event
                        .get("reasoning_signature")
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    let mut map = JsonMap::new();
                    map.insert("signature".to_string(), Value::String(signature.to_string()));
                    map
                });
                parsed.push(StreamEvent::Reasoning(ReasoningEvent {
                    data: text.to_string(),
                    metadata,
                }));
            }
        }

        parsed
    }

    /// Parse an event relayed from an isolated sub-agent stream.
    ///
    /// Same extraction as the top level for text, tool use, and tool
    /// result, with every emitted event stamped with the sub-agent's name.
    /// Reasoning from sub-agents is not attributed and is left to the
    /// top-level rule.
    fn parse_relayed(&mut self, inner: &Value, skill_name: &str) -> Vec<StreamEvent> {
        let Some(event) = inner.as_object() else {
            return Vec::new();
        };

        let mut parsed = Vec::new();

        if let Some(text) = event.get("data").and_then(Value::as_str) {
            if !text.is_empty() {
                parsed.push(StreamEvent::Text(
                    TextEvent::new(text).with_source(skill_name),
                ));
            }
        }

        if let Some(tool_use) = extract_tool_use(event) {
            self.emit_tool_use(&tool_use, Some(skill_name), &mut parsed);
        }

        if let Some(tool_result) = extract_tool_result(event) {
            let tool_id = tool_result
                .get("toolUseId")
                .and_then(Value::as_str)
                .unwrap_or("");
            let tool_name = self
                .tool_use_mapping
                .get(tool_id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            parsed.push(StreamEvent::ToolResult(ToolResultEvent {
                data: extract_result_content(&tool_result),
                tool_name: Some(tool_name),
                tool_id: non_empty(tool_id),
                metadata: status_metadata(&tool_result),
                source: Some(skill_name.to_string()),
            }));
        }

        parsed
    }

    /// Shared emission rule for tool-use descriptors.
    ///
    /// The runtime re-sends the descriptor with a growing accumulated input
    /// rather than deltas: the first sighting of a call id announces the
    /// call, a changed snapshot for the same (source, id) emits an update,
    /// and an unchanged repeat emits nothing. Descriptors without an id are
    /// always treated as novel.
    fn emit_tool_use(
        &mut self,
        tool_use: &JsonMap,
        source: Option<&str>,
        parsed: &mut Vec<StreamEvent>,
    ) {
        let tool_id = tool_use
            .get("toolUseId")
            .and_then(Value::as_str)
            .unwrap_or("");
        let tool_name = tool_use
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let tool_input = tool_use
            .get("input")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        if !tool_id.is_empty() {
            self.tool_use_mapping
                .insert(tool_id.to_string(), tool_name.to_string());
        }

        let is_new_call = !tool_id.is_empty() && !self.displayed_tool_calls.contains(tool_id);

        let input_changed = if tool_id.is_empty() {
            true
        } else {
            let key = (source.map(str::to_string), tool_id.to_string());
            match self.last_tool_input.get(&key) {
                Some(last) if *last == tool_input => false,
                _ => {
                    self.last_tool_input.insert(key, tool_input.clone());
                    true
                }
            }
        };

        if is_new_call {
            self.displayed_tool_calls.insert(tool_id.to_string());
        }
        if is_new_call || input_changed {
            parsed.push(StreamEvent::ToolUse(ToolUseEvent {
                tool_name: tool_name.to_string(),
                tool_id: non_empty(tool_id),
                tool_input: (!tool_input.is_empty()).then_some(tool_input),
                source: source.map(str::to_string),
            }));
        }
    }

    /// Reset all session state for a new conversational turn.
    pub fn reset(&mut self) {
        self.displayed_tool_calls.clear();
        self.tool_use_mapping.clear();
        self.last_tool_input.clear();
        self.active_subagent_tools.clear();
    }
}

/// Read a lifecycle marker as a boolean flag.
fn flag(event: &JsonMap, key: &str) -> bool {
    event.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Wrap a possibly-empty id string into an optional field.
fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Match a tool-stream payload that is a sub-agent relay: an object
/// carrying both the wrapped inner `event` and the `skill_name` tag.
fn relay_payload(stream_data: Option<&Value>) -> Option<(&Value, &str)> {
    let data = stream_data?.as_object()?;
    let inner = data.get("event")?;
    let skill_name = data.get("skill_name")?.as_str()?;
    Some((inner, skill_name))
}

/// Build an orchestration event from an explicit type tag, if the tag names
/// one.
fn parse_orchestration(tag: &str, event: &JsonMap) -> Option<StreamEvent> {
    match tag {
        "multiagent_node_start" => Some(StreamEvent::NodeStart(NodeStartEvent::new(
            string_or_unknown(event, "node_id"),
            string_or_unknown(event, "node_type"),
        ))),
        "multiagent_node_stream" => Some(StreamEvent::NodeStream(NodeStreamEvent::new(
            string_or_unknown(event, "node_id"),
            // Deferred: the renderer dispatch stage expands the inner
            // event, so inspecting parse() output directly cannot
            // double-process it.
            event
                .get("event")
                .cloned()
                .unwrap_or(Value::Object(JsonMap::new())),
        ))),
        "multiagent_node_stop" => Some(StreamEvent::NodeStop(NodeStopEvent::new(
            string_or_unknown(event, "node_id"),
            event.get("node_result").cloned(),
        ))),
        "multiagent_handoff" => Some(StreamEvent::Handoff(HandoffEvent {
            from_node_ids: string_list(event, "from_node_ids"),
            to_node_ids: string_list(event, "to_node_ids"),
            message: event
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        })),
        "multiagent_result" => Some(StreamEvent::FinalResult(FinalResultEvent::new(
            event.get("result").cloned().unwrap_or(Value::Null),
        ))),
        _ => None,
    }
}

fn string_or_unknown(event: &JsonMap, key: &str) -> String {
    event
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn string_list(event: &JsonMap, key: &str) -> Vec<String> {
    event
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Extract a tool-use descriptor from a raw event.
///
/// Key presence commits: a `toolUse` key holding a non-object yields no
/// descriptor rather than falling through to the next location.
fn extract_tool_use(event: &JsonMap) -> Option<JsonMap> {
    let candidate = if event.contains_key("toolUse") {
        event.get("toolUse")
    } else if event.contains_key("current_tool_use") {
        event.get("current_tool_use")
    } else {
        event
            .get("message")
            .and_then(Value::as_object)
            .and_then(|message| message.get("content"))
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .find_map(|content| content.get("toolUse"))
            })
    };
    candidate.and_then(Value::as_object).cloned()
}

/// Extract a tool-result descriptor from a message's content list.
fn extract_tool_result(event: &JsonMap) -> Option<JsonMap> {
    let content_list = event
        .get("message")?
        .as_object()?
        .get("content")?
        .as_array()?;
    content_list.iter().find_map(|content| {
        content
            .get("toolResult")
            .and_then(Value::as_object)
            .cloned()
    })
}

/// Extract displayable text from a tool-result descriptor.
///
/// Prefers the first text block of a content list, then a bare string
/// content, then a top-level text field; anything else is surfaced as
/// serialized JSON so no payload is ever dropped.
fn extract_result_content(tool_result: &JsonMap) -> String {
    if let Some(content) = tool_result.get("content") {
        if let Some(items) = content.as_array() {
            if let Some(first) = items.first() {
                if let Some(text) = first.get("text").and_then(Value::as_str) {
                    return text.to_string();
                }
                return value_to_display(first);
            }
        } else if let Some(text) = content.as_str() {
            return text.to_string();
        }
        return value_to_display(content);
    }

    if let Some(text) = tool_result.get("text").and_then(Value::as_str) {
        return text.to_string();
    }

    serde_json::to_string_pretty(tool_result).unwrap_or_default()
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Pull a `{"status": ...}` metadata map out of a tool result, when a
/// non-empty status is present.
fn status_metadata(tool_result: &JsonMap) -> Option<JsonMap> {
    let status = tool_result.get("status").and_then(Value::as_str)?;
    if status.is_empty() {
        return None;
    }
    let mut metadata = JsonMap::new();
    metadata.insert("status".to_string(), Value::String(status.to_string()));
    Some(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plait_events::EventKind;
    use serde_json::json;

    fn parse_one(parser: &mut StreamParser, raw: serde_json::Value) -> Vec<StreamEvent> {
        parser.parse(&raw)
    }

    #[test]
    fn test_plain_text_event() {
        let mut parser = StreamParser::new();
        let events = parse_one(&mut parser, json!({"data": "Hello"}));
        assert_eq!(
            events,
            vec![StreamEvent::Text(TextEvent::new("Hello"))]
        );
    }

    #[test]
    fn test_empty_text_suppressed() {
        let mut parser = StreamParser::new();
        assert!(parse_one(&mut parser, json!({"data": ""})).is_empty());
    }

    #[test]
    fn test_non_object_input_yields_nothing() {
        let mut parser = StreamParser::new();
        assert!(parser.parse(&json!("data")).is_empty());
        assert!(parser.parse(&json!(null)).is_empty());
        assert!(parser.parse(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_tool_use_announced_exactly_once() {
        let mut parser = StreamParser::new();
        let raw = json!({"toolUse": {"toolUseId": "t1", "name": "search", "input": {"q": "x"}}});

        let first = parser.parse(&raw);
        assert_eq!(first.len(), 1);
        match &first[0] {
            StreamEvent::ToolUse(e) => {
                assert_eq!(e.tool_name, "search");
                assert_eq!(e.tool_id.as_deref(), Some("t1"));
                assert_eq!(e.tool_input, json!({"q": "x"}).as_object().cloned());
                assert_eq!(e.source, None);
            }
            other => panic!("expected tool use, got {:?}", other.kind()),
        }

        // Identical repeat: no output at all.
        assert!(parser.parse(&raw).is_empty());
    }

    #[test]
    fn test_monotonic_input_accumulation() {
        let mut parser = StreamParser::new();
        let snapshots = [json!({}), json!({"a": 1}), json!({"a": 1, "b": 2})];

        let mut emitted = Vec::new();
        for input in &snapshots {
            let raw = json!({"current_tool_use": {"toolUseId": "t1", "name": "calc", "input": input}});
            emitted.extend(parser.parse(&raw));
        }

        // One announcement plus two updates, each carrying the full
        // snapshot at that point.
        assert_eq!(emitted.len(), 3);
        match &emitted[0] {
            StreamEvent::ToolUse(e) => assert_eq!(e.tool_input, None),
            other => panic!("expected tool use, got {:?}", other.kind()),
        }
        match &emitted[2] {
            StreamEvent::ToolUse(e) => {
                assert_eq!(e.tool_input, json!({"a": 1, "b": 2}).as_object().cloned())
            }
            other => panic!("expected tool use, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_tool_use_without_id_always_emits() {
        let mut parser = StreamParser::new();
        let raw = json!({"toolUse": {"name": "search", "input": {"q": "x"}}});
        assert_eq!(parser.parse(&raw).len(), 1);
        assert_eq!(parser.parse(&raw).len(), 1);
    }

    #[test]
    fn test_tool_use_nested_in_message_content() {
        let mut parser = StreamParser::new();
        let raw = json!({"message": {"content": [
            {"text": "thinking"},
            {"toolUse": {"toolUseId": "t2", "name": "fetch", "input": {"url": "u"}}}
        ]}});
        let events = parser.parse(&raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::CurrentToolUse);
    }

    #[test]
    fn test_mistyped_tool_use_skips_rule() {
        let mut parser = StreamParser::new();
        assert!(parser.parse(&json!({"toolUse": "not a mapping"})).is_empty());
        // Key presence commits: nothing falls through to other locations.
        let raw = json!({"toolUse": 7, "current_tool_use": {"toolUseId": "t1", "name": "x"}});
        assert!(parser.parse(&raw).is_empty());
    }

    #[test]
    fn test_tool_result_resolves_recorded_name() {
        let mut parser = StreamParser::new();
        parser.parse(&json!({"toolUse": {"toolUseId": "t1", "name": "search", "input": {}}}));

        let events = parser.parse(&json!({"message": {"content": [{"toolResult": {
            "toolUseId": "t1",
            "status": "success",
            "content": [{"text": "answer"}]
        }}]}}));
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::ToolResult(e) => {
                assert_eq!(e.tool_name.as_deref(), Some("search"));
                assert_eq!(e.tool_id.as_deref(), Some("t1"));
                assert_eq!(e.data, "answer");
                assert_eq!(
                    e.metadata.as_ref().and_then(|m| m.get("status")),
                    Some(&json!("success"))
                );
                assert_eq!(e.source, None);
            }
            other => panic!("expected tool result, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_unseen_tool_result_degrades_to_unknown() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({"message": {"content": [{"toolResult": {
            "toolUseId": "never-announced",
            "content": "raw output"
        }}]}}));
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::ToolResult(e) => {
                assert_eq!(e.tool_name.as_deref(), Some("unknown"));
                assert_eq!(e.data, "raw output");
            }
            other => panic!("expected tool result, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_lifecycle_markers_not_mutually_exclusive() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({
            "complete": true,
            "force_stop": true,
            "force_stop_reason": "budget",
            "result": {"ok": true}
        }));
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (StreamEvent::Lifecycle(complete), StreamEvent::Lifecycle(stopped)) => {
                assert_eq!(complete.stage, LifecycleStage::Complete);
                assert_eq!(complete.result, Some(json!({"ok": true})));
                assert_eq!(stopped.stage, LifecycleStage::ForceStop);
                assert_eq!(stopped.force_stop_reason.as_deref(), Some("budget"));
            }
            _ => panic!("expected two lifecycle events"),
        }
    }

    #[test]
    fn test_orchestration_events_return_immediately() {
        let mut parser = StreamParser::new();
        // The text rule must not run for a tagged orchestration event.
        let events = parser.parse(&json!({
            "type": "multiagent_node_start",
            "node_id": "n1",
            "node_type": "agent",
            "data": "should be ignored"
        }));
        assert_eq!(
            events,
            vec![StreamEvent::NodeStart(NodeStartEvent::new("n1", "agent"))]
        );
    }

    #[test]
    fn test_node_stream_inner_event_not_expanded() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({
            "type": "multiagent_node_stream",
            "node_id": "n1",
            "event": {"data": "inner text"}
        }));
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::NodeStream(e) => {
                assert_eq!(e.node_id, "n1");
                assert_eq!(e.inner_event, json!({"data": "inner text"}));
            }
            other => panic!("expected node stream, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_type_tag_falls_through() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({"type": "heartbeat", "data": "hi"}));
        assert_eq!(events, vec![StreamEvent::Text(TextEvent::new("hi"))]);
    }

    #[test]
    fn test_plain_tool_stream_envelope() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({"tool_stream_event": {
            "tool_use": {"toolUseId": "t1", "name": "tail"},
            "data": "line 1"
        }}));
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::ToolStream(e) => {
                assert_eq!(e.data, json!("line 1"));
                assert_eq!(e.tool_use.get("name"), Some(&json!("tail")));
            }
            other => panic!("expected tool stream, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_empty_tool_stream_envelope_falls_through() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({"tool_stream_event": {}, "data": "hi"}));
        assert_eq!(events, vec![StreamEvent::Text(TextEvent::new("hi"))]);
    }

    #[test]
    fn test_subagent_relay_stamps_source_and_marks_active() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({"tool_stream_event": {
            "tool_use": {"toolUseId": "t9", "name": "web-research"},
            "data": {"event": {"data": "sub text"}, "skill_name": "web-research"}
        }}));
        assert_eq!(
            events,
            vec![StreamEvent::Text(
                TextEvent::new("sub text").with_source("web-research")
            )]
        );

        // The echoed top-level tool use is suppressed while the relay is
        // active.
        let echo = parser.parse(&json!({"toolUse": {"toolUseId": "t9", "name": "web-research"}}));
        assert!(echo.is_empty());

        // The matching top-level result is suppressed exactly once.
        let result_raw = json!({"message": {"content": [{"toolResult": {
            "toolUseId": "t9", "content": [{"text": "done"}]
        }}]}});
        assert!(parser.parse(&result_raw).is_empty());

        // A second arrival is no longer relayed and degrades gracefully.
        let second = parser.parse(&result_raw);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].kind(), EventKind::ToolResult);
    }

    #[test]
    fn test_relayed_tool_use_tracked_per_source() {
        let mut parser = StreamParser::new();
        let relay = |input: serde_json::Value| {
            json!({"tool_stream_event": {
                "tool_use": {"toolUseId": "outer", "name": "skill"},
                "data": {"event": {"current_tool_use": {
                    "toolUseId": "inner-1", "name": "fetch", "input": input
                }}, "skill_name": "researcher"}
            }})
        };

        let first = parser.parse(&relay(json!({"url": "a"})));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].source(), Some("researcher"));

        // Unchanged relayed snapshot: suppressed like any repeat.
        assert!(parser.parse(&relay(json!({"url": "a"}))).is_empty());

        // Grown snapshot: surfaced as an update, still attributed.
        let update = parser.parse(&relay(json!({"url": "a", "depth": 2})));
        assert_eq!(update.len(), 1);
        assert_eq!(update[0].source(), Some("researcher"));
    }

    #[test]
    fn test_relay_with_non_string_skill_name_is_plain_stream() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({"tool_stream_event": {
            "tool_use": {"toolUseId": "t1", "name": "x"},
            "data": {"event": {"data": "text"}, "skill_name": 42}
        }}));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::ToolStreamEvent);
    }

    #[test]
    fn test_reasoning_with_signature_metadata() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({
            "reasoningText": "thinking...",
            "reasoning_signature": "sig-1"
        }));
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::Reasoning(e) => {
                assert_eq!(e.data, "thinking...");
                assert_eq!(
                    e.metadata.as_ref().and_then(|m| m.get("signature")),
                    Some(&json!("sig-1"))
                );
            }
            other => panic!("expected reasoning, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_one_raw_event_can_emit_multiple_kinds() {
        let mut parser = StreamParser::new();
        let events = parser.parse(&json!({
            "data": "answer so far",
            "reasoningText": "because...",
            "toolUse": {"toolUseId": "t1", "name": "search", "input": {"q": "x"}}
        }));
        let kinds: Vec<EventKind> = events.iter().map(StreamEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Text,
                EventKind::CurrentToolUse,
                EventKind::Reasoning
            ]
        );
    }

    #[test]
    fn test_reset_clears_dedup_state() {
        let mut parser = StreamParser::new();
        let raw = json!({"toolUse": {"toolUseId": "t1", "name": "search", "input": {"q": "x"}}});
        assert_eq!(parser.parse(&raw).len(), 1);
        assert!(parser.parse(&raw).is_empty());

        parser.reset();

        // A previously-seen call id is brand new again.
        assert_eq!(parser.parse(&raw).len(), 1);
    }

    #[test]
    fn test_result_content_fallbacks() {
        let pretty = |value: serde_json::Value| {
            extract_result_content(value.as_object().unwrap())
        };
        assert_eq!(pretty(json!({"content": [{"text": "plain"}]})), "plain");
        assert_eq!(pretty(json!({"content": "bare string"})), "bare string");
        assert_eq!(pretty(json!({"content": [{"json": {"a": 1}}]})), "{\"json\":{\"a\":1}}");
        assert_eq!(pretty(json!({"text": "top-level"})), "top-level");
        let dumped = pretty(json!({"code": 3}));
        assert!(dumped.contains("\"code\": 3"));
    }
}
