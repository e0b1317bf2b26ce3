//! Terminal Card Renderers
//!
//! Plain-text renderers for the components this surface can draw. Each one
//! turns a block's `data` into a boxed card sized by display width, so wide
//! glyphs and emoji line up.
//!
//! `LineChart` has no terminal renderer; blocks for it compose as
//! "unavailable".

use serde_json::Value;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use uicp_core::{ComponentResolver, JsonMap};

/// Total card width in columns, borders included
pub const CARD_WIDTH: usize = 48;

/// Inner width: border + one space padding on each side
const INNER_WIDTH: usize = CARD_WIDTH - 4;

/// Register every renderer this surface supports
pub fn register_builtin_renderers(resolver: &ComponentResolver) {
    resolver.register("NBAGameScore", render_game_score);
    resolver.register("NewsArticlePreview", render_article_preview);
}

// =============================================================================
// Component Renderers
// =============================================================================

/// Score card: status header, away team, home team, optional clock
pub fn render_game_score(data: &JsonMap) -> String {
    let home = field_text(data, "homeTeam");
    let away = field_text(data, "awayTeam");
    let home_score = data.get("homeScore").and_then(Value::as_f64);
    let away_score = data.get("awayScore").and_then(Value::as_f64);

    let status = match data.get("gameStatus").and_then(Value::as_str) {
        Some("live") => "● LIVE",
        None | Some("final") => "FINAL",
        Some(_) => "SCHEDULED",
    };

    let mut lines = vec![split_row(status, &optional_text(data, "gameDate").unwrap_or_default())];
    lines.push(String::new());

    let away_wins = matches!((away_score, home_score), (Some(a), Some(h)) if a > h);
    let home_wins = matches!((away_score, home_score), (Some(a), Some(h)) if h > a);
    lines.push(team_row(&away, &field_text(data, "awayScore"), away_wins));
    lines.push(team_row(&home, &field_text(data, "homeScore"), home_wins));

    let clock: Vec<String> = ["quarter", "timeRemaining"]
        .iter()
        .filter_map(|key| optional_text(data, key))
        .collect();
    if !clock.is_empty() {
        lines.push(String::new());
        lines.push(clock.join(" · "));
    }

    boxed(&lines)
}

/// Article card: headline, description, byline, link
pub fn render_article_preview(data: &JsonMap) -> String {
    let mut lines = vec![field_text(data, "headline"), String::new()];
    lines.push(field_text(data, "description"));
    lines.push(String::new());

    let mut byline = vec![field_text(data, "source"), field_text(data, "publishedDate")];
    if let Some(author) = optional_text(data, "author") {
        byline.push(format!("By {author}"));
    }
    lines.push(byline.join(" • "));

    if let Some(image) = optional_text(data, "imageUrl") {
        lines.push(format!("Image: {image}"));
    }
    if let Some(url) = optional_text(data, "url") {
        lines.push(format!("→ {url}"));
    }

    boxed(&lines)
}

// =============================================================================
// Card Layout
// =============================================================================

/// Draw lines inside a box, wrapping each to the inner width
pub fn boxed(lines: &[String]) -> String {
    let horizontal = "─".repeat(CARD_WIDTH - 2);
    let mut out = format!("┌{horizontal}┐\n");

    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("│ {} │\n", " ".repeat(INNER_WIDTH)));
            continue;
        }
        for wrapped in wrap(line, INNER_WIDTH) {
            let padding = INNER_WIDTH.saturating_sub(wrapped.width());
            out.push_str(&format!("│ {wrapped}{} │\n", " ".repeat(padding)));
        }
    }

    out.push_str(&format!("└{horizontal}┘"));
    out
}

/// Left and right text on one line, right-aligned; falls back to a single
/// space-separated line when both do not fit
fn split_row(left: &str, right: &str) -> String {
    let used = left.width() + right.width();
    if used >= INNER_WIDTH {
        return format!("{left} {right}");
    }
    format!("{left}{}{right}", " ".repeat(INNER_WIDTH - used))
}

fn team_row(team: &str, score: &str, winning: bool) -> String {
    let abbreviation: String = team.chars().take(3).collect::<String>().to_uppercase();
    let marker = if winning { "▸" } else { " " };
    split_row(&format!("{marker} {abbreviation}  {team}"), score)
}

// =============================================================================
// Data Access
// =============================================================================

/// Display text for a field that may be absent; `None` for missing or null
fn optional_text(data: &JsonMap, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Display text for a required field; `?` when unusable
fn field_text(data: &JsonMap, key: &str) -> String {
    optional_text(data, key).unwrap_or_else(|| "?".to_string())
}
