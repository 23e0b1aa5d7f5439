//! Chapter-level outline entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One chapter-level outline entry.
///
/// `order_index` is 1-based and contiguous within a project. Every store
/// mutation preserves that invariant, renumbering neighbors when entries
/// are removed or moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Unique outline identifier
    pub id: Uuid,
    /// Owning project
    pub project_id: Uuid,
    /// Chapter title
    pub title: String,
    /// Chapter summary shown to the author
    pub content: String,
    /// 1-based position within the project outline
    pub order_index: i32,
    /// JSON snapshot of the generation record this entry was built from
    pub structure: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Seed values for manually creating one outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOutline {
    /// Owning project
    pub project_id: Uuid,
    /// Chapter title
    pub title: String,
    /// Chapter summary
    pub content: String,
    /// 1-based position to insert at
    pub order_index: i32,
    /// Optional pre-built structure snapshot
    pub structure: Option<String>,
}

/// Partial update of an outline entry.
///
/// `None` fields are left untouched. Title and content changes propagate to
/// the paired chapter and, best effort, into the structure snapshot so later
/// regeneration sees the edited text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineChanges {
    /// Replacement title
    pub title: Option<String>,
    /// Replacement content
    pub content: Option<String>,
    /// Replacement structure snapshot, applied before any title/content merge
    pub structure: Option<String>,
}

/// One generation-derived outline row awaiting persistence.
///
/// Produced by mapping a parsed chapter record. The store numbers it with
/// `chapter_number` when the record carried one and falls back to the
/// record's position in its batch otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOutlineRecord {
    /// Chapter title
    pub title: String,
    /// Chapter summary, with key events and cast appended when present
    pub content: String,
    /// Serialized snapshot of the full generation record
    pub structure: Option<String>,
    /// Explicit chapter number from the generation record, if any
    pub chapter_number: Option<i32>,
}
