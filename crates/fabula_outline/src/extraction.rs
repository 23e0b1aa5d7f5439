//! Lenient parsing of AI outline responses.

use crate::records::ChapterRecord;
use fabula_core::truncate_chars;
use serde_json::Value;
use tracing::warn;

/// Characters of raw response kept when parsing fails outright.
const FALLBACK_EXCERPT_CHARS: usize = 1000;

/// Parse an AI response into chapter records, never failing.
///
/// Markdown code fences are stripped first. A JSON array is taken as the
/// chapter list; a JSON object is unwrapped through its `chapters` field when
/// present and otherwise treated as a single chapter. Anything that cannot be
/// read as chapters at all degrades to one synthetic record titled
/// `AI-generated outline` carrying the first [`FALLBACK_EXCERPT_CHARS`]
/// characters of the raw response, so a non-empty response always yields at
/// least one reviewable entry.
///
/// # Examples
///
/// ```
/// use fabula_outline::parse_outline_response;
///
/// let records = parse_outline_response(
///     "```json\n[{\"chapter_number\":1,\"title\":\"Dawn\",\"summary\":\"s\"}]\n```",
/// );
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].title.as_deref(), Some("Dawn"));
/// ```
pub fn parse_outline_response(raw: &str) -> Vec<ChapterRecord> {
    let cleaned = strip_code_fence(raw);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Array(items)) => records_from_array(items, raw),
        Ok(Value::Object(map)) => {
            if let Some(Value::Array(items)) = map.get("chapters") {
                records_from_array(items.clone(), raw)
            } else {
                records_from_array(vec![Value::Object(map)], raw)
            }
        }
        // Scalars get wrapped like any other stray value and fall out below.
        Ok(other) => records_from_array(vec![other], raw),
        Err(error) => {
            warn!(%error, "response is not valid JSON, keeping raw excerpt");
            vec![fallback_record(raw)]
        }
    }
}

/// Strip a leading ```` ```json ```` or ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, then trim whitespace.
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn records_from_array(items: Vec<Value>, raw: &str) -> Vec<ChapterRecord> {
    let had_elements = !items.is_empty();
    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ChapterRecord>(item) {
            Ok(record) => records.push(record),
            Err(error) => warn!(position, %error, "skipping malformed chapter element"),
        }
    }
    // An explicitly empty array stands; losing every element does not.
    if had_elements && records.is_empty() {
        warn!("no usable chapter elements, keeping raw excerpt");
        return vec![fallback_record(raw)];
    }
    records
}

fn fallback_record(raw: &str) -> ChapterRecord {
    let excerpt = truncate_chars(raw, FALLBACK_EXCERPT_CHARS);
    ChapterRecord {
        title: Some("AI-generated outline".to_string()),
        summary: Some(excerpt.clone()),
        content: Some(excerpt),
        ..ChapterRecord::default()
    }
}
