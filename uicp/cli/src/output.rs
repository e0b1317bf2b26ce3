//! Segment Output
//!
//! Formats composed segments for the terminal, or as JSON for piping into
//! another surface.

use anyhow::Result;

use uicp_core::{ComponentDisplay, ContentSegment};

/// Render segments as terminal text
///
/// Text segments are printed verbatim; each component sits on its own lines.
pub fn format_segments(segments: &[ContentSegment]) -> String {
    let mut out = String::new();

    for segment in segments {
        match segment {
            ContentSegment::Text { text, .. } => out.push_str(text),
            ContentSegment::Component { display, .. } => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&format_display(display));
                out.push('\n');
            }
        }
    }

    out
}

/// Terminal text for one component display
pub fn format_display(display: &ComponentDisplay) -> String {
    match display {
        ComponentDisplay::Rendered { output } => output.clone(),
        ComponentDisplay::Invalid { uid, errors } => {
            let mut out = format!("⚠ Invalid UICP component: {uid}");
            for error in errors {
                out.push_str(&format!("\n  - {error}"));
            }
            out
        }
        ComponentDisplay::Unavailable { uid } => format!(
            "⚠ Component not available: {uid}\n  No renderer is registered for it on this surface."
        ),
    }
}

/// Segments as pretty JSON
pub fn segments_json(segments: &[ContentSegment]) -> Result<String> {
    Ok(serde_json::to_string_pretty(segments)?)
}

/// Segments as one compact JSON line (for streaming output)
pub fn segments_json_line(segments: &[ContentSegment]) -> Result<String> {
    Ok(serde_json::to_string(segments)?)
}
