//! Best-effort merging of manual edits into structure snapshots.

use serde_json::{Map, Value};

/// Fields to overwrite in a structure snapshot.
///
/// A title edit lands in the snapshot's `title` key; a content edit lands in
/// both `summary` and `content` so the snapshot stays interchangeable with
/// freshly generated records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotMerge<'a> {
    /// New title, when the title changed
    pub title: Option<&'a str>,
    /// New content, when the content changed
    pub content: Option<&'a str>,
}

/// Merge edited fields into a serialized structure snapshot.
///
/// A missing snapshot starts from an empty object, so manually created
/// entries gain one on their first edit. A snapshot that does not parse as a
/// JSON object is reported as an error; callers skip the merge with a warning
/// instead of failing the surrounding update.
///
/// # Examples
///
/// ```
/// use fabula_core::{SnapshotMerge, merge_snapshot};
///
/// let merged = merge_snapshot(
///     Some(r#"{"title":"old","emotion":"tense"}"#),
///     &SnapshotMerge { title: Some("new"), content: None },
/// )
/// .unwrap();
/// assert!(merged.contains(r#""title":"new""#));
/// assert!(merged.contains(r#""emotion":"tense""#));
/// ```
pub fn merge_snapshot(
    existing: Option<&str>,
    merge: &SnapshotMerge<'_>,
) -> Result<String, serde_json::Error> {
    let mut snapshot: Map<String, Value> = match existing {
        Some(raw) => serde_json::from_str(raw)?,
        None => Map::new(),
    };
    if let Some(title) = merge.title {
        snapshot.insert("title".to_string(), Value::String(title.to_string()));
    }
    if let Some(content) = merge.content {
        snapshot.insert("summary".to_string(), Value::String(content.to_string()));
        snapshot.insert("content".to_string(), Value::String(content.to_string()));
    }
    serde_json::to_string(&snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_unrelated_keys() {
        let merged = merge_snapshot(
            Some(r#"{"chapter_number":3,"key_events":["duel"]}"#),
            &SnapshotMerge {
                title: Some("The Duel"),
                content: None,
            },
        )
        .unwrap();
        let value: Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(value["title"], "The Duel");
        assert_eq!(value["chapter_number"], 3);
        assert_eq!(value["key_events"][0], "duel");
    }

    #[test]
    fn content_edit_writes_summary_and_content() {
        let merged = merge_snapshot(
            None,
            &SnapshotMerge {
                title: None,
                content: Some("revised synopsis"),
            },
        )
        .unwrap();
        let value: Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(value["summary"], "revised synopsis");
        assert_eq!(value["content"], "revised synopsis");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn missing_snapshot_starts_empty() {
        let merged = merge_snapshot(None, &SnapshotMerge::default()).unwrap();
        assert_eq!(merged, "{}");
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let result = merge_snapshot(
            Some("not json"),
            &SnapshotMerge {
                title: Some("x"),
                content: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn non_object_snapshot_is_an_error() {
        let result = merge_snapshot(Some("[1,2,3]"), &SnapshotMerge::default());
        assert!(result.is_err());
    }
}
