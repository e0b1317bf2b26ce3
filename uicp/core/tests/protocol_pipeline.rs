//! End-to-end tests for the embedded block protocol
//!
//! Covers the path an agent response takes: Construct produces a block, the
//! model streams it inside prose, and a surface composes the growing text on
//! every chunk.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use uicp_core::{
    construct, extract_blocks, ComponentDisplay, ComponentResolver, Composer, ConstructParams,
    ContentSegment, JsonMap, Registry, StreamingMessage, ToolSet, CONSTRUCT_TOOL_NAME,
    DISCOVER_TOOL_NAME, OPENING_MARKER,
};

// =============================================================================
// Helpers
// =============================================================================

fn object(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

fn score_data() -> JsonMap {
    object(json!({
        "homeTeam": "Lakers",
        "awayTeam": "Celtics",
        "homeScore": 112,
        "awayScore": 108,
        "gameStatus": "final"
    }))
}

fn composer_with_score_renderer() -> Composer {
    let resolver = ComponentResolver::new();
    resolver.register("NBAGameScore", |data: &JsonMap| {
        format!(
            "{} {} - {} {}",
            data["homeTeam"].as_str().unwrap_or("?"),
            data["homeScore"],
            data["awayScore"],
            data["awayTeam"].as_str().unwrap_or("?"),
        )
    });
    Composer::new(Arc::new(Registry::builtin().unwrap()), resolver)
}

fn constructed_block(uid: &str, data: JsonMap) -> String {
    let response = construct(
        &Registry::builtin().unwrap(),
        &ConstructParams {
            uid: uid.to_string(),
            data,
        },
    );
    response.block().unwrap().to_string()
}

// =============================================================================
// Construct -> Extract
// =============================================================================

#[test]
fn constructed_block_round_trips() {
    let data = score_data();
    let block = constructed_block("NBAGameScore", data.clone());

    let extraction = extract_blocks(&block);
    assert_eq!(extraction.blocks.len(), 1);
    assert_eq!(extraction.blocks[0].uid, "NBAGameScore");
    assert_eq!(extraction.blocks[0].data, data);
    assert!(!extraction.truncated);
}

#[test]
fn constructed_block_renders_in_prose() {
    let text = format!(
        "Last night's game:\n\n{}\n\nWhat a finish.",
        constructed_block("NBAGameScore", score_data())
    );
    let segments = composer_with_score_renderer().compose(&text);

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].as_text(), Some("Last night's game:\n\n"));
    assert_eq!(
        segments[1].display(),
        Some(&ComponentDisplay::Rendered {
            output: "Lakers 112 - 108 Celtics".to_string()
        })
    );
    assert_eq!(segments[2].as_text(), Some("\n\nWhat a finish."));
}

// =============================================================================
// Streaming
// =============================================================================

#[test]
fn streaming_never_shows_partial_protocol_syntax() {
    let text = format!(
        "Here it is: {} and a chart {}",
        constructed_block("NBAGameScore", score_data()),
        constructed_block(
            "LineChart",
            object(json!({"data": [{"x": 1, "y": 2}], "dataKeys": ["y"]}))
        ),
    );

    let composer = composer_with_score_renderer();
    let mut message = StreamingMessage::new(composer);
    let mut max_components = 0;

    // Feed one char at a time; char boundaries keep every chunk valid UTF-8.
    for c in text.chars() {
        let segments = message.push(c.encode_utf8(&mut [0; 4])).unwrap();

        for segment in &segments {
            if let ContentSegment::Text { text, .. } = segment {
                assert!(!text.contains(OPENING_MARKER), "leaked marker in {text:?}");
            }
        }

        let components = segments
            .iter()
            .filter(|s| matches!(s, ContentSegment::Component { .. }))
            .count();
        assert!(components >= max_components, "component disappeared mid-stream");
        max_components = components;
    }

    let segments = message.finish();
    let displays: Vec<_> = segments.iter().filter_map(ContentSegment::display).collect();
    assert_eq!(displays.len(), 2);
    assert!(displays[0].is_rendered());
    assert_eq!(
        displays[1],
        &ComponentDisplay::Unavailable {
            uid: "LineChart".to_string()
        }
    );
}

#[test]
fn truncation_strips_marker_and_trailing_whitespace() {
    for tail in ["```uicp", "```uicp\n", "```uicp\n{\"uid\":\"NBAGameScore\",", "```uicp \n {}"] {
        let text = format!("Intro text  \n\t{tail}");
        let extraction = extract_blocks(&text);

        assert!(extraction.truncated, "not truncated: {text:?}");
        assert!(!extraction.content_with_placeholders.contains(OPENING_MARKER));
        assert_eq!(extraction.content_with_placeholders, "Intro text");
    }
}

#[test]
fn pending_block_hides_every_unresolved_marker() {
    let text = "Intro text ```uicp\n{not json}\n``` B ```uicp``` C ```uicp\n{\"uid\":";
    let extraction = extract_blocks(text);

    assert!(extraction.truncated);
    assert_eq!(extraction.content_with_placeholders, "Intro text");

    // Once nothing is pending the malformed block is visible again.
    let closed = format!("{text}\"X\",\"data\":{{}}}}\n```");
    let extraction = extract_blocks(&closed);
    assert!(!extraction.truncated);
    assert_eq!(extraction.blocks.len(), 1);
    assert!(extraction
        .content_with_placeholders
        .starts_with("Intro text ```uicp\n{not json}\n```"));
}

// =============================================================================
// Composition properties
// =============================================================================

#[test]
fn text_without_markers_is_identity() {
    let composer = composer_with_score_renderer();
    for text in ["", "   ", "plain", "```json\n{}\n```", "code ``` fences ``` only"] {
        assert_eq!(
            composer.compose(text),
            vec![ContentSegment::Text {
                key: "text-0".to_string(),
                text: text.to_string(),
            }]
        );
    }
}

#[test]
fn schema_valid_unregistered_component_is_unavailable() {
    let registry = Registry::from_json_str(
        r#"{"version":"t","components":[{"uid":"X","type":"misc","inputs":{}}]}"#,
    )
    .unwrap();
    let composer = Composer::new(Arc::new(registry), ComponentResolver::new());

    let segments = composer.compose("Hello ```uicp\n{\"uid\":\"X\",\"data\":{}}\n``` world");

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].as_text(), Some("Hello "));
    assert_eq!(
        segments[1].display(),
        Some(&ComponentDisplay::Unavailable {
            uid: "X".to_string()
        })
    );
    assert_eq!(segments[2].as_text(), Some(" world"));
}

#[test]
fn invalid_block_never_exposes_raw_json() {
    let text = "Result:\n```uicp\n{\"uid\":\"NBAGameScore\",\"data\":{\"secret\":\"value\"}}\n```";
    let segments = composer_with_score_renderer().compose(text);

    let rendered = serde_json::to_string(&segments[1].display()).unwrap();
    assert!(!rendered.contains("secret"));
    let Some(ComponentDisplay::Invalid { errors, .. }) = segments[1].display() else {
        panic!("expected invalid display");
    };
    assert_eq!(errors.len(), 4);
}

#[test]
fn segments_serialize_tagged() {
    let segments = composer_with_score_renderer()
        .compose("a ```uicp\n{\"uid\":\"Nope\",\"data\":{}}\n```");
    let value = serde_json::to_value(&segments).unwrap();

    assert_eq!(value[0]["type"], json!("text"));
    assert_eq!(value[1]["type"], json!("component"));
    assert_eq!(value[1]["key"], json!("component-0"));
    assert_eq!(value[1]["display"]["status"], json!("invalid"));
    assert_eq!(value[1]["block"]["uid"], json!("Nope"));
}

// =============================================================================
// Tool dispatch
// =============================================================================

#[test]
fn agent_tool_flow() {
    let tools = ToolSet::new(Arc::new(Registry::builtin().unwrap()));

    let discovered = tools
        .call(DISCOVER_TOOL_NAME, json!({"uid": "NewsArticlePreview"}))
        .unwrap();
    let example = discovered["components"][0]["example"].clone();
    assert!(example.is_object());

    let created = tools
        .call(
            CONSTRUCT_TOOL_NAME,
            json!({"uid": "NewsArticlePreview", "data": example}),
        )
        .unwrap();
    assert_eq!(created["success"], json!(true));

    let block = created["uicp_block"].as_str().unwrap();
    let extraction = extract_blocks(block);
    assert_eq!(Value::Object(extraction.blocks[0].data.clone()), example);
}

#[test]
fn discover_miss_reports_every_category() {
    let tools = ToolSet::new(Arc::new(Registry::builtin().unwrap()));
    let value = tools
        .call(DISCOVER_TOOL_NAME, json!({"uid": "DoesNotExist"}))
        .unwrap();

    assert_eq!(value["success"], json!(false));
    assert_eq!(value["available_types"], json!(["sports", "news", "chart"]));
}
