//! PostgreSQL implementation of the outline store.

use crate::models::{
    CharacterRow, GenerationHistoryRow, NewGenerationHistoryRow, OutlineRow, ProjectRow,
    UpdateChapterRow, generation_rows,
};
use crate::schema::{chapters, characters, generation_history, outlines, projects};

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use fabula_core::{
    Character, GenerationHistory, HistoryEntry, NewOutline, NewOutlineRecord, Outline,
    OutlineChanges, Project, SUMMARY_MAX_CHARS, SnapshotMerge, merge_snapshot, truncate_chars,
};
use fabula_error::{FabulaResult, StoreError, StoreErrorKind};
use fabula_interface::{OutlineStore, ReorderEntry, ReorderOutcome};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

/// PostgreSQL implementation of OutlineStore using Diesel ORM.
///
/// Every mutation that touches an outline entry and its paired chapter
/// stub runs inside one transaction, so the two tables never drift apart.
///
/// # Example
/// ```no_run
/// use fabula_database::{PgOutlineStore, establish_connection};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let conn = establish_connection()?;
///     let store = PgOutlineStore::new(conn);
///     // Use store.list_outlines(), replace_outline(), etc.
///     Ok(())
/// }
/// ```
pub struct PgOutlineStore {
    /// Database connection wrapped in Arc<Mutex> for async safety.
    ///
    /// Note: This is a simple implementation. For production use, consider using
    /// a connection pool like r2d2 or deadpool.
    conn: Arc<Mutex<PgConnection>>,
}

impl PgOutlineStore {
    /// Create a new PostgreSQL outline store.
    ///
    /// # Note
    /// The connection is wrapped in Arc<Mutex> to allow async access.
    /// For better performance with concurrent access, consider using a connection pool.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a store from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OutlineStore for PgOutlineStore {
    async fn project(&self, project_id: Uuid) -> FabulaResult<Project> {
        let mut conn = self.conn.lock().await;

        let row: Option<ProjectRow> = projects::table
            .find(project_id)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)?;

        row.map(Project::from)
            .ok_or_else(|| StoreError::new(StoreErrorKind::ProjectNotFound(project_id)).into())
    }

    async fn characters(&self, project_id: Uuid) -> FabulaResult<Vec<Character>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<CharacterRow> = characters::table
            .filter(characters::project_id.eq(project_id))
            .order(characters::created_at.asc())
            .load(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(Character::from).collect())
    }

    async fn list_outlines(&self, project_id: Uuid) -> FabulaResult<Vec<Outline>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<OutlineRow> = outlines::table
            .filter(outlines::project_id.eq(project_id))
            .order(outlines::order_index.asc())
            .load(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(Outline::from).collect())
    }

    async fn get_outline(&self, outline_id: Uuid) -> FabulaResult<Outline> {
        let mut conn = self.conn.lock().await;

        let row: Option<OutlineRow> = outlines::table
            .find(outline_id)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)?;

        row.map(Outline::from)
            .ok_or_else(|| StoreError::new(StoreErrorKind::OutlineNotFound(outline_id)).into())
    }

    async fn create_outline(&self, outline: NewOutline) -> FabulaResult<Outline> {
        let mut conn = self.conn.lock().await;

        let project_exists: bool =
            diesel::select(diesel::dsl::exists(projects::table.find(outline.project_id)))
                .get_result(&mut *conn)
                .map_err(StoreError::from)?;
        if !project_exists {
            return Err(
                StoreError::new(StoreErrorKind::ProjectNotFound(outline.project_id)).into(),
            );
        }

        let now = Utc::now().naive_utc();
        let record = NewOutlineRecord {
            title: outline.title,
            content: outline.content,
            structure: outline.structure,
            chapter_number: None,
        };
        let (outline_row, chapter_row) =
            generation_rows(outline.project_id, record, outline.order_index, now);

        let created = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let row: OutlineRow = diesel::insert_into(outlines::table)
                    .values(&outline_row)
                    .get_result(conn)?;
                diesel::insert_into(chapters::table)
                    .values(&chapter_row)
                    .execute(conn)?;
                Ok(row)
            })
            .map_err(StoreError::from)?;

        Ok(created.into())
    }

    async fn update_outline(
        &self,
        outline_id: Uuid,
        changes: OutlineChanges,
    ) -> FabulaResult<Outline> {
        let mut conn = self.conn.lock().await;

        let row: Option<OutlineRow> = outlines::table
            .find(outline_id)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)?;
        let Some(row) = row else {
            return Err(StoreError::new(StoreErrorKind::OutlineNotFound(outline_id)).into());
        };

        let title_changed = changes.title.is_some();
        let content_changed = changes.content.is_some();
        let title = changes.title.unwrap_or(row.title);
        let content = changes.content.unwrap_or(row.content);
        let mut structure = changes.structure.or(row.structure);

        if title_changed || content_changed {
            let merge = SnapshotMerge {
                title: title_changed.then_some(title.as_str()),
                content: content_changed.then_some(content.as_str()),
            };
            match merge_snapshot(structure.as_deref(), &merge) {
                Ok(merged) => structure = Some(merged),
                Err(error) => {
                    warn!(%outline_id, %error, "structure snapshot not mergeable, skipping")
                }
            }
        }

        let now = Utc::now().naive_utc();
        // Mirror only the fields that changed; an independently edited
        // chapter title survives a content-only outline update.
        let mirror = UpdateChapterRow {
            title: title_changed.then(|| title.clone()),
            summary: content_changed.then(|| truncate_chars(&content, SUMMARY_MAX_CHARS)),
            updated_at: now,
        };
        let updated = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let updated: OutlineRow = diesel::update(outlines::table.find(outline_id))
                    .set((
                        outlines::title.eq(&title),
                        outlines::content.eq(&content),
                        outlines::structure.eq(&structure),
                        outlines::updated_at.eq(now),
                    ))
                    .get_result(conn)?;

                if title_changed || content_changed {
                    let mirrored = diesel::update(
                        chapters::table
                            .filter(chapters::project_id.eq(row.project_id))
                            .filter(chapters::chapter_number.eq(row.order_index)),
                    )
                    .set(&mirror)
                    .execute(conn)?;
                    if mirrored == 0 {
                        warn!(
                            project_id = %row.project_id,
                            order_index = row.order_index,
                            "no paired chapter for updated outline"
                        );
                    }
                }

                Ok(updated)
            })
            .map_err(StoreError::from)?;

        Ok(updated.into())
    }

    async fn delete_outline(&self, outline_id: Uuid) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;

        let row: Option<OutlineRow> = outlines::table
            .find(outline_id)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)?;
        let Some(row) = row else {
            return Err(StoreError::new(StoreErrorKind::OutlineNotFound(outline_id)).into());
        };

        let now = Utc::now().naive_utc();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(outlines::table.find(outline_id)).execute(conn)?;

            let removed = diesel::delete(
                chapters::table
                    .filter(chapters::project_id.eq(row.project_id))
                    .filter(chapters::chapter_number.eq(row.order_index)),
            )
            .execute(conn)?;
            if removed == 0 {
                warn!(
                    project_id = %row.project_id,
                    order_index = row.order_index,
                    "no paired chapter for deleted outline"
                );
            }

            // Shift everything after the gap down by one, lowest index first.
            let following: Vec<OutlineRow> = outlines::table
                .filter(outlines::project_id.eq(row.project_id))
                .filter(outlines::order_index.gt(row.order_index))
                .order(outlines::order_index.asc())
                .load(conn)?;
            for entry in following {
                diesel::update(outlines::table.find(entry.id))
                    .set((
                        outlines::order_index.eq(entry.order_index - 1),
                        outlines::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                let renumbered = diesel::update(
                    chapters::table
                        .filter(chapters::project_id.eq(row.project_id))
                        .filter(chapters::chapter_number.eq(entry.order_index)),
                )
                .set((
                    chapters::chapter_number.eq(entry.order_index - 1),
                    chapters::updated_at.eq(now),
                ))
                .execute(conn)?;
                if renumbered == 0 {
                    warn!(
                        project_id = %row.project_id,
                        order_index = entry.order_index,
                        "no paired chapter to renumber"
                    );
                }
            }

            Ok(())
        })
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn reorder_outlines(
        &self,
        project_id: Uuid,
        entries: Vec<ReorderEntry>,
    ) -> FabulaResult<ReorderOutcome> {
        let mut conn = self.conn.lock().await;

        // A repeated outline id collapses to its last requested position
        // and counts once.
        let mut deduped: Vec<ReorderEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.iter_mut().find(|e| e.outline_id == entry.outline_id) {
                Some(existing) => existing.new_order_index = entry.new_order_index,
                None => deduped.push(entry),
            }
        }

        // Resolve every entry before touching anything so swapped positions
        // are looked up against the pre-reorder numbering.
        struct Planned {
            outline_id: Uuid,
            chapter_id: Option<Uuid>,
            title: String,
            new_index: i32,
        }
        let mut plan = Vec::with_capacity(deduped.len());
        for entry in &deduped {
            let row: Option<OutlineRow> = outlines::table
                .find(entry.outline_id)
                .first(&mut *conn)
                .optional()
                .map_err(StoreError::from)?;
            let Some(row) = row else {
                warn!(outline_id = %entry.outline_id, "outline missing, skipping reorder entry");
                continue;
            };
            if row.project_id != project_id {
                warn!(
                    outline_id = %entry.outline_id,
                    "outline belongs to another project, skipping reorder entry"
                );
                continue;
            }
            let chapter_id: Option<Uuid> = chapters::table
                .filter(chapters::project_id.eq(project_id))
                .filter(chapters::chapter_number.eq(row.order_index))
                .select(chapters::id)
                .first(&mut *conn)
                .optional()
                .map_err(StoreError::from)?;
            if chapter_id.is_none() {
                warn!(
                    order_index = row.order_index,
                    "no paired chapter for reorder entry"
                );
            }
            plan.push(Planned {
                outline_id: row.id,
                chapter_id,
                title: row.title,
                new_index: entry.new_order_index,
            });
        }

        let now = Utc::now().naive_utc();
        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let mut outcome = ReorderOutcome::default();
                for item in &plan {
                    diesel::update(outlines::table.find(item.outline_id))
                        .set((
                            outlines::order_index.eq(item.new_index),
                            outlines::updated_at.eq(now),
                        ))
                        .execute(conn)?;
                    outcome.outlines_updated += 1;
                    if let Some(chapter_id) = item.chapter_id {
                        diesel::update(chapters::table.find(chapter_id))
                            .set((
                                chapters::chapter_number.eq(item.new_index),
                                chapters::title.eq(item.title.as_str()),
                                chapters::updated_at.eq(now),
                            ))
                            .execute(conn)?;
                        outcome.chapters_updated += 1;
                    }
                }
                Ok(outcome)
            })
            .map_err(StoreError::from)?;

        Ok(outcome)
    }

    async fn replace_outline(
        &self,
        project_id: Uuid,
        records: Vec<NewOutlineRecord>,
        history: HistoryEntry,
    ) -> FabulaResult<Vec<Outline>> {
        let mut conn = self.conn.lock().await;

        let now = Utc::now().naive_utc();
        let rows: Vec<_> = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let order_index = record.chapter_number.unwrap_or(position as i32 + 1);
                generation_rows(project_id, record, order_index, now)
            })
            .collect();
        let history_row = NewGenerationHistoryRow::from_entry(project_id, history, now);

        let inserted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(chapters::table.filter(chapters::project_id.eq(project_id)))
                    .execute(conn)?;
                diesel::delete(outlines::table.filter(outlines::project_id.eq(project_id)))
                    .execute(conn)?;

                let mut inserted = Vec::with_capacity(rows.len());
                for (outline_row, chapter_row) in &rows {
                    let row: OutlineRow = diesel::insert_into(outlines::table)
                        .values(outline_row)
                        .get_result(conn)?;
                    diesel::insert_into(chapters::table)
                        .values(chapter_row)
                        .execute(conn)?;
                    inserted.push(Outline::from(row));
                }

                diesel::insert_into(generation_history::table)
                    .values(&history_row)
                    .execute(conn)?;

                Ok(inserted)
            })
            .map_err(StoreError::from)?;

        Ok(inserted)
    }

    async fn append_outline(
        &self,
        project_id: Uuid,
        records: Vec<NewOutlineRecord>,
        start_index: i32,
        history: HistoryEntry,
    ) -> FabulaResult<Vec<Outline>> {
        let mut conn = self.conn.lock().await;

        let now = Utc::now().naive_utc();
        let rows: Vec<_> = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let order_index = record
                    .chapter_number
                    .unwrap_or(start_index + position as i32);
                generation_rows(project_id, record, order_index, now)
            })
            .collect();
        let history_row = NewGenerationHistoryRow::from_entry(project_id, history, now);

        let inserted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let mut inserted = Vec::with_capacity(rows.len());
                for (outline_row, chapter_row) in &rows {
                    let row: OutlineRow = diesel::insert_into(outlines::table)
                        .values(outline_row)
                        .get_result(conn)?;
                    diesel::insert_into(chapters::table)
                        .values(chapter_row)
                        .execute(conn)?;
                    inserted.push(Outline::from(row));
                }

                diesel::insert_into(generation_history::table)
                    .values(&history_row)
                    .execute(conn)?;

                Ok(inserted)
            })
            .map_err(StoreError::from)?;

        Ok(inserted)
    }

    async fn generation_history(&self, project_id: Uuid) -> FabulaResult<Vec<GenerationHistory>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<GenerationHistoryRow> = generation_history::table
            .filter(generation_history::project_id.eq(project_id))
            .order(generation_history::created_at.desc())
            .load(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(GenerationHistory::from).collect())
    }
}
