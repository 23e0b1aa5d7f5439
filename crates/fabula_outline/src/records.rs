//! Chapter records decoded from AI outline responses.

use fabula_core::NewOutlineRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One chapter as described by an AI outline response.
///
/// Every field is optional so imperfect provider output still maps to a
/// usable record. Fields outside the known set are retained in `extra` and
/// survive the round trip into the structure snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterRecord {
    /// Explicit chapter number, when the model provided one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<i32>,
    /// Chapter title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Chapter synopsis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Alternate synopsis field some models emit instead of `summary`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Key plot events of the chapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_events: Option<Vec<String>>,
    /// Characters appearing in the chapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters_involved: Option<Vec<String>>,
    /// Unrecognized fields, kept for the structure snapshot
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChapterRecord {
    /// Map this record to a persistable outline row.
    ///
    /// `fallback_index` numbers the record when it carries no explicit
    /// chapter number. The title falls back to `Chapter {index}`, the
    /// content prefers `summary` over `content`, and key events and cast
    /// lists are appended to the content so nothing the model said is lost
    /// even before consulting the structure snapshot.
    pub fn to_new_record(&self, fallback_index: i32) -> NewOutlineRecord {
        let order = self.chapter_number.unwrap_or(fallback_index);
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("Chapter {order}"));

        let mut content = non_empty(self.summary.as_deref())
            .or_else(|| non_empty(self.content.as_deref()))
            .unwrap_or_default()
            .to_string();
        if let Some(events) = &self.key_events
            && !events.is_empty()
        {
            content.push_str("\n\nKey events: ");
            content.push_str(&events.join("、"));
        }
        if let Some(cast) = &self.characters_involved
            && !cast.is_empty()
        {
            content.push_str("\nCharacters involved: ");
            content.push_str(&cast.join("、"));
        }

        NewOutlineRecord {
            title,
            content,
            structure: serde_json::to_string(self).ok(),
            chapter_number: self.chapter_number,
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_a_complete_record() {
        let record = ChapterRecord {
            chapter_number: Some(3),
            title: Some("The Siege".to_string()),
            summary: Some("The city gates fall.".to_string()),
            content: Some("ignored when summary is present".to_string()),
            key_events: Some(vec!["breach".to_string(), "retreat".to_string()]),
            characters_involved: Some(vec!["Mara".to_string()]),
            extra: Map::new(),
        };
        let row = record.to_new_record(1);
        assert_eq!(row.title, "The Siege");
        assert_eq!(row.chapter_number, Some(3));
        assert_eq!(
            row.content,
            "The city gates fall.\n\nKey events: breach、retreat\nCharacters involved: Mara"
        );
    }

    #[test]
    fn title_falls_back_to_chapter_number() {
        let record = ChapterRecord {
            chapter_number: Some(7),
            ..ChapterRecord::default()
        };
        assert_eq!(record.to_new_record(2).title, "Chapter 7");

        let unnumbered = ChapterRecord::default();
        assert_eq!(unnumbered.to_new_record(2).title, "Chapter 2");
    }

    #[test]
    fn empty_summary_falls_through_to_content() {
        let record = ChapterRecord {
            summary: Some(String::new()),
            content: Some("the real synopsis".to_string()),
            ..ChapterRecord::default()
        };
        assert_eq!(record.to_new_record(1).content, "the real synopsis");
    }

    #[test]
    fn empty_lists_add_no_labels() {
        let record = ChapterRecord {
            summary: Some("plain".to_string()),
            key_events: Some(Vec::new()),
            characters_involved: Some(Vec::new()),
            ..ChapterRecord::default()
        };
        assert_eq!(record.to_new_record(1).content, "plain");
    }

    #[test]
    fn structure_snapshot_retains_unknown_fields() {
        let raw = r#"{"chapter_number":1,"title":"Dawn","summary":"s","emotion":"hopeful","goal":"establish the town"}"#;
        let record: ChapterRecord = serde_json::from_str(raw).unwrap();
        let row = record.to_new_record(1);
        let snapshot: Value = serde_json::from_str(row.structure.as_deref().unwrap()).unwrap();
        assert_eq!(snapshot["emotion"], "hopeful");
        assert_eq!(snapshot["goal"], "establish the town");
        assert_eq!(snapshot["title"], "Dawn");
    }
}
