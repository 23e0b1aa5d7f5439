//! Storage trait for outline entries and their paired chapters.

use async_trait::async_trait;
use fabula_core::{
    Character, GenerationHistory, HistoryEntry, NewOutline, NewOutlineRecord, Outline,
    OutlineChanges, Project,
};
use fabula_error::FabulaResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One requested position change in a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    /// Outline to move
    pub outline_id: Uuid,
    /// 1-based position the outline should take
    pub new_order_index: i32,
}

/// Counts of rows a reorder actually touched.
///
/// Unresolvable entries are skipped rather than failing the batch, so the
/// counts can be lower than the number of entries requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderOutcome {
    /// Outlines whose order index was reassigned
    pub outlines_updated: usize,
    /// Paired chapters renumbered alongside their outline
    pub chapters_updated: usize,
}

/// Persistence seam owning the outline/chapter pairing invariants.
///
/// Implementations keep `order_index` values contiguous from 1 within a
/// project after every successful mutation, and apply each operation as a
/// single atomic unit: a failed mutation never leaves partial renumbering
/// behind. Chapters pair with outlines by (project, chapter number)
/// convention; a missing pair is tolerated with a warning because other
/// workflows may retire chapters independently.
#[async_trait]
pub trait OutlineStore: Send + Sync {
    /// Fetch a project, erroring with a not-found kind when absent.
    async fn project(&self, project_id: Uuid) -> FabulaResult<Project>;

    /// Characters attached to a project, oldest first.
    async fn characters(&self, project_id: Uuid) -> FabulaResult<Vec<Character>>;

    /// All outline entries of a project, ordered by `order_index`.
    ///
    /// An unknown project yields an empty list; callers needing existence
    /// validation go through [`OutlineStore::project`] first.
    async fn list_outlines(&self, project_id: Uuid) -> FabulaResult<Vec<Outline>>;

    /// Fetch one outline entry by id.
    async fn get_outline(&self, outline_id: Uuid) -> FabulaResult<Outline>;

    /// Create an outline entry together with its paired chapter stub.
    async fn create_outline(&self, outline: NewOutline) -> FabulaResult<Outline>;

    /// Apply a partial update, mirroring title and content into the paired
    /// chapter and, best effort, into the structure snapshot.
    async fn update_outline(
        &self,
        outline_id: Uuid,
        changes: OutlineChanges,
    ) -> FabulaResult<Outline>;

    /// Delete an outline entry and its paired chapter, shifting every later
    /// entry down by one so positions stay contiguous.
    async fn delete_outline(&self, outline_id: Uuid) -> FabulaResult<()>;

    /// Reassign positions in bulk.
    ///
    /// Every entry is resolved before any write, so permuted indexes never
    /// collide mid-apply. Entries naming unknown outlines are skipped with a
    /// warning instead of aborting the batch.
    async fn reorder_outlines(
        &self,
        project_id: Uuid,
        entries: Vec<ReorderEntry>,
    ) -> FabulaResult<ReorderOutcome>;

    /// Replace a project's entire outline with freshly generated records.
    ///
    /// Deletes all existing outlines and chapters, inserts the records
    /// numbered from 1, and appends one history record, all in one atomic
    /// unit. Returns the inserted outlines in order.
    async fn replace_outline(
        &self,
        project_id: Uuid,
        records: Vec<NewOutlineRecord>,
        history: HistoryEntry,
    ) -> FabulaResult<Vec<Outline>>;

    /// Append generated records numbered from `start_index`, with one
    /// history record, in one atomic unit. Returns only the outlines this
    /// call inserted.
    async fn append_outline(
        &self,
        project_id: Uuid,
        records: Vec<NewOutlineRecord>,
        start_index: i32,
        history: HistoryEntry,
    ) -> FabulaResult<Vec<Outline>>;

    /// Generation audit records for a project, newest first.
    async fn generation_history(&self, project_id: Uuid) -> FabulaResult<Vec<GenerationHistory>>;
}
