//! Chapter stubs paired with outline entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters kept in a chapter summary.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Workflow status assigned to freshly created chapters.
pub const DRAFT_STATUS: &str = "draft";

/// Writing-workflow stub mirroring one outline entry.
///
/// Chapters pair with outlines by (`project_id`, `chapter_number`) convention
/// rather than a foreign key. Outline mutations keep the pair numbered and
/// titled consistently; a missing pair is tolerated with a warning because
/// the writing workflow may retire chapters independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique chapter identifier
    pub id: Uuid,
    /// Owning project
    pub project_id: Uuid,
    /// 1-based position mirroring the paired outline's order index
    pub chapter_number: i32,
    /// Title mirrored from the paired outline
    pub title: String,
    /// Outline content truncated to [`SUMMARY_MAX_CHARS`] characters
    pub summary: Option<String>,
    /// Draft text, owned by the writing workflow
    pub content: Option<String>,
    /// Word count of the draft text
    pub word_count: i32,
    /// Workflow status, [`DRAFT_STATUS`] on creation
    pub status: String,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}
