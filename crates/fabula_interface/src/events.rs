//! Progress event contract for streaming delivery.

use serde::{Deserialize, Serialize};

/// One event in a generation progress stream.
///
/// A successful run emits `Progress` events with non-decreasing percentages,
/// then exactly one `Result` followed by exactly one `Done`. A failed run
/// ends with exactly one `Error` and nothing after it. The wire framing is
/// transport-specific; this type fixes only the payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Milestone update
    Progress {
        /// Human-readable milestone description
        message: String,
        /// Completion percentage, 0 to 100
        percent: u8,
        /// Optional status tag, e.g. `"success"`
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
    /// Terminal payload of a successful run
    Result {
        /// Structured result payload
        data: serde_json::Value,
    },
    /// Terminal failure notice
    Error {
        /// Failure description
        message: String,
        /// HTTP-equivalent status code when the failure maps to one
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<u16>,
    },
    /// End-of-stream marker
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_serializes_with_type_tag() {
        let event = ProgressEvent::Progress {
            message: "Saving outline".to_string(),
            percent: 80,
            status: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"progress","message":"Saving outline","percent":80}"#);
    }

    #[test]
    fn status_tag_appears_when_set() {
        let event = ProgressEvent::Progress {
            message: "Generation complete".to_string(),
            percent: 100,
            status: Some("success".to_string()),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""status":"success""#));
    }

    #[test]
    fn done_is_a_bare_marker() {
        let json = serde_json::to_string(&ProgressEvent::Done).unwrap();
        assert_eq!(json, r#"{"type":"done"}"#);
    }

    #[test]
    fn error_roundtrips() {
        let event = ProgressEvent::Error {
            message: "Project not found".to_string(),
            code: Some(404),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
