//! Database models for projects, outlines, and their paired chapters.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use fabula_core::{
    Chapter, Character, DRAFT_STATUS, GenerationHistory, HistoryEntry, NewOutlineRecord, Outline,
    Project, SUMMARY_MAX_CHARS, truncate_chars,
};
use uuid::Uuid;

use crate::schema::{chapters, characters, generation_history, outlines, projects};

/// A stored novel project.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub theme: Option<String>,
    pub genre: Option<String>,
    pub narrative_perspective: Option<String>,
    pub target_words: Option<i32>,
    pub world_time_period: Option<String>,
    pub world_location: Option<String>,
    pub world_atmosphere: Option<String>,
    pub world_rules: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            theme: row.theme,
            genre: row.genre,
            narrative_perspective: row.narrative_perspective,
            target_words: row.target_words,
            world_time_period: row.world_time_period,
            world_location: row.world_location,
            world_atmosphere: row.world_atmosphere,
            world_rules: row.world_rules,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A stored character or organization sheet.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub role_type: Option<String>,
    pub personality: Option<String>,
    pub is_organization: bool,
    pub created_at: NaiveDateTime,
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Character {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            role_type: row.role_type,
            personality: row.personality,
            is_organization: row.is_organization,
            created_at: row.created_at,
        }
    }
}

/// A stored outline entry.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = outlines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutlineRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub order_index: i32,
    pub structure: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<OutlineRow> for Outline {
    fn from(row: OutlineRow) -> Self {
        Outline {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            content: row.content,
            order_index: row.order_index,
            structure: row.structure,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// New outline entry for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = outlines)]
pub struct NewOutlineRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub order_index: i32,
    pub structure: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A stored chapter stub.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = chapters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChapterRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub chapter_number: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub word_count: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ChapterRow> for Chapter {
    fn from(row: ChapterRow) -> Self {
        Chapter {
            id: row.id,
            project_id: row.project_id,
            chapter_number: row.chapter_number,
            title: row.title,
            summary: row.summary,
            content: row.content,
            word_count: row.word_count,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// New chapter stub for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chapters)]
pub struct NewChapterRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub chapter_number: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub word_count: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Updateable struct mirroring outline edits into the paired chapter.
///
/// Only the fields that actually changed on the outline are written;
/// `None` leaves the chapter column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = chapters)]
pub struct UpdateChapterRow {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// A stored generation audit record.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = generation_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationHistoryRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub prompt: String,
    pub generated_content: String,
    pub model: String,
    pub created_at: NaiveDateTime,
}

impl From<GenerationHistoryRow> for GenerationHistory {
    fn from(row: GenerationHistoryRow) -> Self {
        GenerationHistory {
            id: row.id,
            project_id: row.project_id,
            prompt: row.prompt,
            generated_content: row.generated_content,
            model: row.model,
            created_at: row.created_at,
        }
    }
}

/// New generation audit record for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = generation_history)]
pub struct NewGenerationHistoryRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub prompt: String,
    pub generated_content: String,
    pub model: String,
    pub created_at: NaiveDateTime,
}

impl NewGenerationHistoryRow {
    /// Build an insertable history row from a write entry.
    pub fn from_entry(project_id: Uuid, entry: HistoryEntry, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            prompt: entry.prompt,
            generated_content: entry.generated_content,
            model: entry.model,
            created_at: now,
        }
    }
}

/// Build the insertable outline/chapter pair for one generated record.
pub(crate) fn generation_rows(
    project_id: Uuid,
    record: NewOutlineRecord,
    order_index: i32,
    now: NaiveDateTime,
) -> (NewOutlineRow, NewChapterRow) {
    let summary = truncate_chars(&record.content, SUMMARY_MAX_CHARS);
    let outline = NewOutlineRow {
        id: Uuid::new_v4(),
        project_id,
        title: record.title.clone(),
        content: record.content,
        order_index,
        structure: record.structure,
        created_at: now,
        updated_at: now,
    };
    let chapter = NewChapterRow {
        id: Uuid::new_v4(),
        project_id,
        chapter_number: order_index,
        title: record.title,
        summary: Some(summary),
        content: None,
        word_count: 0,
        status: DRAFT_STATUS.to_string(),
        created_at: now,
        updated_at: now,
    };
    (outline, chapter)
}
