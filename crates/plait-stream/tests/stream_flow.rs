//! End-to-end flows: a full conversational turn fed through renderers the
//! way the runtime delivers it — as an asynchronous event feed.

use plait_events::OutputKind;
use plait_stream::{drive, MarkdownRenderer, SseRenderer, StreamRenderer, TerminalRenderer};
use serde_json::{json, Value};

/// A realistic single-agent turn: lifecycle, streamed text, a tool call
/// with accumulating input, its result, and a closing summary.
fn single_agent_turn() -> Vec<Value> {
    vec![
        json!({"init_event_loop": true}),
        json!({"data": "Let me look that up. "}),
        json!({"current_tool_use": {"toolUseId": "t1", "name": "search", "input": {}}}),
        json!({"current_tool_use": {"toolUseId": "t1", "name": "search", "input": {"q": "rust"}}}),
        json!({"current_tool_use": {"toolUseId": "t1", "name": "search", "input": {"q": "rust streams"}}}),
        json!({"message": {"content": [{"toolResult": {
            "toolUseId": "t1",
            "status": "success",
            "content": [{"text": "three results"}]
        }}]}}),
        json!({"data": "Found three results."}),
        json!({"complete": true}),
    ]
}

/// A turn where a skill tool relays an isolated sub-agent, and the runtime
/// also echoes the sub-agent's activity at the top level.
fn subagent_turn() -> Vec<Value> {
    vec![
        json!({"data": "Delegating to the researcher. "}),
        json!({"tool_stream_event": {
            "tool_use": {"toolUseId": "outer", "name": "skill"},
            "data": {"event": {"data": "Reading sources. "}, "skill_name": "web-research"}
        }}),
        // Top-level echo of the delegated call: must be suppressed.
        json!({"toolUse": {"toolUseId": "outer", "name": "skill", "input": {"skill_name": "web-research"}}}),
        json!({"tool_stream_event": {
            "tool_use": {"toolUseId": "outer", "name": "skill"},
            "data": {"event": {"current_tool_use": {
                "toolUseId": "inner", "name": "fetch", "input": {"url": "https://example.com"}
            }}, "skill_name": "web-research"}
        }}),
        // The relayed result for the outer call, then its top-level echo.
        json!({"tool_stream_event": {
            "tool_use": {"toolUseId": "outer", "name": "skill"},
            "data": {"event": {"message": {"content": [{"toolResult": {
                "toolUseId": "inner", "content": [{"text": "page body"}]
            }}]}}, "skill_name": "web-research"}
        }}),
        json!({"message": {"content": [{"toolResult": {
            "toolUseId": "outer", "content": [{"text": "summary from sub-agent"}]
        }}]}}),
        json!({"data": "Done."}),
    ]
}

fn feed(events: Vec<Value>) -> impl futures_util::Stream<Item = Value> {
    async_stream::stream! {
        for event in events {
            yield event;
        }
    }
}

#[tokio::test]
async fn terminal_renders_single_agent_turn() {
    let mut renderer = TerminalRenderer::new().with_colors(false);
    let output = drive(&mut renderer, feed(single_agent_turn())).await.concat();

    assert!(output.contains("Event loop initialized"));
    assert!(output.contains("Let me look that up. "));
    // Announced once, numbered once.
    assert_eq!(output.matches("Tool #1: search").count(), 1);
    // The final accumulated snapshot is shown.
    assert!(output.contains("rust streams"));
    assert!(output.contains("Tool Result:"));
    assert!(output.contains("three results"));
    assert!(output.contains("Cycle completed"));
}

#[tokio::test]
async fn markdown_suppresses_top_level_echoes_of_subagent_activity() {
    let mut renderer = MarkdownRenderer::new();
    let outputs = drive(&mut renderer, feed(subagent_turn())).await;

    // Everything between delegation and completion is attributed to the
    // sub-agent; the echoed outer tool call never surfaces.
    let sources: Vec<Option<&str>> = outputs.iter().map(|o| o.source.as_deref()).collect();
    assert_eq!(
        sources,
        vec![
            None,
            Some("web-research"),
            Some("web-research"),
            Some("web-research"),
            None,
        ]
    );

    let kinds: Vec<OutputKind> = outputs.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![
            OutputKind::Text,
            OutputKind::Text,
            OutputKind::ToolStart,
            OutputKind::ToolResult,
            OutputKind::Text,
        ]
    );

    // The outer result was consumed as the sub-agent completion marker.
    assert!(!outputs.iter().any(|o| o.content.contains("summary from sub-agent")));
}

#[tokio::test]
async fn sse_frames_roundtrip_and_preserve_order() {
    let mut renderer = SseRenderer::new();
    let frames = drive(&mut renderer, feed(single_agent_turn())).await;

    let types: Vec<String> = frames
        .iter()
        .map(|frame| {
            let body = frame
                .strip_prefix("data: ")
                .and_then(|rest| rest.strip_suffix("\n\n"))
                .expect("SSE framing");
            let value: Value = serde_json::from_str(body).expect("valid JSON payload");
            value["type"].as_str().expect("type tag").to_string()
        })
        .collect();

    assert_eq!(
        types,
        vec![
            "lifecycle",
            "text",
            "current_tool_use",
            "current_tool_use",
            "current_tool_use",
            "tool_result",
            "text",
            "lifecycle",
        ]
    );
}

#[tokio::test]
async fn reset_between_turns_reannounces_tools() {
    let mut renderer = TerminalRenderer::new().with_colors(false);

    let first = drive(&mut renderer, feed(single_agent_turn())).await.concat();
    assert!(first.contains("Tool #1: search"));

    renderer.reset();

    let second = drive(&mut renderer, feed(single_agent_turn())).await.concat();
    assert!(second.contains("Tool #1: search"));
}
