//! In-memory outline store for tests and offline development.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use fabula_core::{
    Chapter, Character, DRAFT_STATUS, GenerationHistory, HistoryEntry, NewOutline,
    NewOutlineRecord, Outline, OutlineChanges, Project, SUMMARY_MAX_CHARS, SnapshotMerge,
    merge_snapshot, truncate_chars,
};
use fabula_error::{FabulaResult, StoreError, StoreErrorKind};
use fabula_interface::{OutlineStore, ReorderEntry, ReorderOutcome};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    projects: HashMap<Uuid, Project>,
    characters: Vec<Character>,
    outlines: Vec<Outline>,
    chapters: Vec<Chapter>,
    history: Vec<GenerationHistory>,
}

/// In-memory [`OutlineStore`] holding everything behind one lock.
///
/// Each operation takes the write lock for its whole body, which gives the
/// same per-operation atomicity the database store gets from transactions.
/// Useful for tests and for running the generation pipeline without
/// PostgreSQL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOutlineStore {
    inner: Arc<RwLock<StoreState>>,
}

impl InMemoryOutlineStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully specified project (for testing).
    pub async fn insert_project(&self, project: Project) {
        self.inner.write().await.projects.insert(project.id, project);
    }

    /// Create and insert a minimal project with the given title (for testing).
    pub async fn add_project(&self, title: &str) -> Project {
        let now = Utc::now().naive_utc();
        let project = Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            theme: None,
            genre: None,
            narrative_perspective: None,
            target_words: None,
            world_time_period: None,
            world_location: None,
            world_atmosphere: None,
            world_rules: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_project(project.clone()).await;
        project
    }

    /// Insert a fully specified character (for testing).
    pub async fn insert_character(&self, character: Character) {
        self.inner.write().await.characters.push(character);
    }

    /// Create and insert a character sheet (for testing).
    pub async fn add_character(
        &self,
        project_id: Uuid,
        name: &str,
        role_type: Option<&str>,
        personality: Option<&str>,
        is_organization: bool,
    ) -> Character {
        let character = Character {
            id: Uuid::new_v4(),
            project_id,
            name: name.to_string(),
            role_type: role_type.map(str::to_string),
            personality: personality.map(str::to_string),
            is_organization,
            created_at: Utc::now().naive_utc(),
        };
        self.insert_character(character.clone()).await;
        character
    }

    /// Chapter stubs of a project ordered by chapter number (for testing).
    pub async fn chapters_for(&self, project_id: Uuid) -> Vec<Chapter> {
        let state = self.inner.read().await;
        let mut chapters: Vec<Chapter> = state
            .chapters
            .iter()
            .filter(|chapter| chapter.project_id == project_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|chapter| chapter.chapter_number);
        chapters
    }

    /// Number of outline entries a project holds (for testing).
    pub async fn outline_count(&self, project_id: Uuid) -> usize {
        self.inner
            .read()
            .await
            .outlines
            .iter()
            .filter(|outline| outline.project_id == project_id)
            .count()
    }
}

/// Build the outline/chapter pair for one generated record.
fn generation_pair(
    project_id: Uuid,
    record: NewOutlineRecord,
    order_index: i32,
    now: NaiveDateTime,
) -> (Outline, Chapter) {
    let summary = truncate_chars(&record.content, SUMMARY_MAX_CHARS);
    let outline = Outline {
        id: Uuid::new_v4(),
        project_id,
        title: record.title.clone(),
        content: record.content,
        order_index,
        structure: record.structure,
        created_at: now,
        updated_at: now,
    };
    let chapter = Chapter {
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

fn history_row(project_id: Uuid, entry: HistoryEntry, now: NaiveDateTime) -> GenerationHistory {
    GenerationHistory {
        id: Uuid::new_v4(),
        project_id,
        prompt: entry.prompt,
        generated_content: entry.generated_content,
        model: entry.model,
        created_at: now,
    }
}

#[async_trait]
impl OutlineStore for InMemoryOutlineStore {
    async fn project(&self, project_id: Uuid) -> FabulaResult<Project> {
        let state = self.inner.read().await;
        state
            .projects
            .get(&project_id)
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorKind::ProjectNotFound(project_id)).into())
    }

    async fn characters(&self, project_id: Uuid) -> FabulaResult<Vec<Character>> {
        let state = self.inner.read().await;
        Ok(state
            .characters
            .iter()
            .filter(|character| character.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_outlines(&self, project_id: Uuid) -> FabulaResult<Vec<Outline>> {
        let state = self.inner.read().await;
        let mut outlines: Vec<Outline> = state
            .outlines
            .iter()
            .filter(|outline| outline.project_id == project_id)
            .cloned()
            .collect();
        outlines.sort_by_key(|outline| outline.order_index);
        Ok(outlines)
    }

    async fn get_outline(&self, outline_id: Uuid) -> FabulaResult<Outline> {
        let state = self.inner.read().await;
        state
            .outlines
            .iter()
            .find(|outline| outline.id == outline_id)
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorKind::OutlineNotFound(outline_id)).into())
    }

    async fn create_outline(&self, outline: NewOutline) -> FabulaResult<Outline> {
        let mut state = self.inner.write().await;
        if !state.projects.contains_key(&outline.project_id) {
            return Err(StoreError::new(StoreErrorKind::ProjectNotFound(outline.project_id)).into());
        }
        let now = Utc::now().naive_utc();
        let record = NewOutlineRecord {
            title: outline.title,
            content: outline.content,
            structure: outline.structure,
            chapter_number: None,
        };
        let (entry, chapter) =
            generation_pair(outline.project_id, record, outline.order_index, now);
        state.outlines.push(entry.clone());
        state.chapters.push(chapter);
        Ok(entry)
    }

    async fn update_outline(
        &self,
        outline_id: Uuid,
        changes: OutlineChanges,
    ) -> FabulaResult<Outline> {
        let mut state = self.inner.write().await;
        let Some(position) = state
            .outlines
            .iter()
            .position(|outline| outline.id == outline_id)
        else {
            return Err(StoreError::new(StoreErrorKind::OutlineNotFound(outline_id)).into());
        };

        let now = Utc::now().naive_utc();
        let title_changed = changes.title.is_some();
        let content_changed = changes.content.is_some();
        {
            let outline = &mut state.outlines[position];
            if let Some(title) = changes.title {
                outline.title = title;
            }
            if let Some(content) = changes.content {
                outline.content = content;
            }
            if let Some(structure) = changes.structure {
                outline.structure = Some(structure);
            }
            outline.updated_at = now;
        }

        if title_changed || content_changed {
            let snapshot = state.outlines[position].clone();
            let merge = SnapshotMerge {
                title: title_changed.then_some(snapshot.title.as_str()),
                content: content_changed.then_some(snapshot.content.as_str()),
            };
            match merge_snapshot(snapshot.structure.as_deref(), &merge) {
                Ok(merged) => state.outlines[position].structure = Some(merged),
                Err(error) => {
                    warn!(%outline_id, %error, "structure snapshot not mergeable, skipping")
                }
            }

            let paired = state.chapters.iter_mut().find(|chapter| {
                chapter.project_id == snapshot.project_id
                    && chapter.chapter_number == snapshot.order_index
            });
            match paired {
                Some(chapter) => {
                    if title_changed {
                        chapter.title = snapshot.title.clone();
                    }
                    if content_changed {
                        chapter.summary =
                            Some(truncate_chars(&snapshot.content, SUMMARY_MAX_CHARS));
                    }
                    chapter.updated_at = now;
                }
                None => warn!(
                    project_id = %snapshot.project_id,
                    order_index = snapshot.order_index,
                    "no paired chapter for updated outline"
                ),
            }
        }

        Ok(state.outlines[position].clone())
    }

    async fn delete_outline(&self, outline_id: Uuid) -> FabulaResult<()> {
        let mut state = self.inner.write().await;
        let Some(position) = state
            .outlines
            .iter()
            .position(|outline| outline.id == outline_id)
        else {
            return Err(StoreError::new(StoreErrorKind::OutlineNotFound(outline_id)).into());
        };
        let removed = state.outlines.remove(position);
        let now = Utc::now().naive_utc();

        match state.chapters.iter().position(|chapter| {
            chapter.project_id == removed.project_id
                && chapter.chapter_number == removed.order_index
        }) {
            Some(chapter_position) => {
                state.chapters.remove(chapter_position);
            }
            None => warn!(
                project_id = %removed.project_id,
                order_index = removed.order_index,
                "no paired chapter for deleted outline"
            ),
        }

        // Shift everything after the gap down by one, lowest index first.
        let mut following: Vec<usize> = state
            .outlines
            .iter()
            .enumerate()
            .filter(|(_, outline)| {
                outline.project_id == removed.project_id
                    && outline.order_index > removed.order_index
            })
            .map(|(index, _)| index)
            .collect();
        following.sort_by_key(|&index| state.outlines[index].order_index);
        for index in following {
            let old_index = state.outlines[index].order_index;
            state.outlines[index].order_index = old_index - 1;
            state.outlines[index].updated_at = now;
            let paired = state.chapters.iter_mut().find(|chapter| {
                chapter.project_id == removed.project_id && chapter.chapter_number == old_index
            });
            match paired {
                Some(chapter) => {
                    chapter.chapter_number = old_index - 1;
                    chapter.updated_at = now;
                }
                None => warn!(
                    project_id = %removed.project_id,
                    order_index = old_index,
                    "no paired chapter to renumber"
                ),
            }
        }
        Ok(())
    }

    async fn reorder_outlines(
        &self,
        project_id: Uuid,
        entries: Vec<ReorderEntry>,
    ) -> FabulaResult<ReorderOutcome> {
        let mut state = self.inner.write().await;

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
            outline_position: usize,
            chapter_position: Option<usize>,
            new_index: i32,
        }
        let mut plan = Vec::with_capacity(deduped.len());
        for entry in &deduped {
            let Some(outline_position) = state
                .outlines
                .iter()
                .position(|o| o.id == entry.outline_id && o.project_id == project_id)
            else {
                warn!(outline_id = %entry.outline_id, "outline missing, skipping reorder entry");
                continue;
            };
            let old_index = state.outlines[outline_position].order_index;
            let chapter_position = state.chapters.iter().position(|chapter| {
                chapter.project_id == project_id && chapter.chapter_number == old_index
            });
            if chapter_position.is_none() {
                warn!(order_index = old_index, "no paired chapter for reorder entry");
            }
            plan.push(Planned {
                outline_position,
                chapter_position,
                new_index: entry.new_order_index,
            });
        }

        let now = Utc::now().naive_utc();
        let mut outcome = ReorderOutcome::default();
        for item in &plan {
            let title = {
                let outline = &mut state.outlines[item.outline_position];
                outline.order_index = item.new_index;
                outline.updated_at = now;
                outline.title.clone()
            };
            outcome.outlines_updated += 1;
            if let Some(chapter_position) = item.chapter_position {
                let chapter = &mut state.chapters[chapter_position];
                chapter.chapter_number = item.new_index;
                chapter.title = title;
                chapter.updated_at = now;
                outcome.chapters_updated += 1;
            }
        }
        Ok(outcome)
    }

    async fn replace_outline(
        &self,
        project_id: Uuid,
        records: Vec<NewOutlineRecord>,
        history: HistoryEntry,
    ) -> FabulaResult<Vec<Outline>> {
        let mut state = self.inner.write().await;
        let now = Utc::now().naive_utc();
        state.outlines.retain(|outline| outline.project_id != project_id);
        state.chapters.retain(|chapter| chapter.project_id != project_id);

        let mut inserted = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let order_index = record.chapter_number.unwrap_or(position as i32 + 1);
            let (outline, chapter) = generation_pair(project_id, record, order_index, now);
            inserted.push(outline.clone());
            state.outlines.push(outline);
            state.chapters.push(chapter);
        }
        state.history.push(history_row(project_id, history, now));
        Ok(inserted)
    }

    async fn append_outline(
        &self,
        project_id: Uuid,
        records: Vec<NewOutlineRecord>,
        start_index: i32,
        history: HistoryEntry,
    ) -> FabulaResult<Vec<Outline>> {
        let mut state = self.inner.write().await;
        let now = Utc::now().naive_utc();

        let mut inserted = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let order_index = record.chapter_number.unwrap_or(start_index + position as i32);
            let (outline, chapter) = generation_pair(project_id, record, order_index, now);
            inserted.push(outline.clone());
            state.outlines.push(outline);
            state.chapters.push(chapter);
        }
        state.history.push(history_row(project_id, history, now));
        Ok(inserted)
    }

    async fn generation_history(&self, project_id: Uuid) -> FabulaResult<Vec<GenerationHistory>> {
        let state = self.inner.read().await;
        Ok(state
            .history
            .iter()
            .filter(|record| record.project_id == project_id)
            .rev()
            .cloned()
            .collect())
    }
}
