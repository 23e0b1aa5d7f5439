//! Integration tests for the PostgreSQL outline store.
//!
//! These tests require a running PostgreSQL instance with the fabula schema
//! applied, reachable through the `DATABASE_URL` environment variable. Each
//! test seeds its own project and cleans up after itself.
//!
//! Run with: `cargo test --package fabula_database -- --ignored`

use anyhow::Result;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use fabula_core::{HistoryEntry, NewOutline, NewOutlineRecord, OutlineChanges};
use fabula_database::schema::{chapters, generation_history, outlines, projects};
use fabula_database::{PgOutlineStore, establish_connection};
use fabula_interface::{OutlineStore, ReorderEntry};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Connect and seed a throwaway project, returning the store and project id.
async fn store_with_project() -> Result<(PgOutlineStore, Arc<Mutex<PgConnection>>, Uuid)> {
    let conn = Arc::new(Mutex::new(establish_connection()?));
    let project_id = Uuid::new_v4();
    {
        let mut conn = conn.lock().await;
        let now = Utc::now().naive_utc();
        diesel::insert_into(projects::table)
            .values((
                projects::id.eq(project_id),
                projects::title.eq("pg store test project"),
                projects::created_at.eq(now),
                projects::updated_at.eq(now),
            ))
            .execute(&mut *conn)?;
    }
    Ok((PgOutlineStore::from_arc(conn.clone()), conn, project_id))
}

/// Remove everything the test project owns.
async fn cleanup(conn: &Arc<Mutex<PgConnection>>, project_id: Uuid) -> Result<()> {
    let mut conn = conn.lock().await;
    diesel::delete(
        generation_history::table.filter(generation_history::project_id.eq(project_id)),
    )
    .execute(&mut *conn)?;
    diesel::delete(chapters::table.filter(chapters::project_id.eq(project_id)))
        .execute(&mut *conn)?;
    diesel::delete(outlines::table.filter(outlines::project_id.eq(project_id)))
        .execute(&mut *conn)?;
    diesel::delete(projects::table.find(project_id)).execute(&mut *conn)?;
    Ok(())
}

fn record(title: &str, content: &str) -> NewOutlineRecord {
    NewOutlineRecord {
        title: title.to_string(),
        content: content.to_string(),
        structure: None,
        chapter_number: None,
    }
}

fn history() -> HistoryEntry {
    HistoryEntry {
        prompt: "test prompt".to_string(),
        generated_content: "test response".to_string(),
        model: "test-model".to_string(),
    }
}

#[tokio::test]
#[ignore] // Requires PostgreSQL with DATABASE_URL set
async fn create_pairs_outline_with_chapter() -> Result<()> {
    let (store, conn, project_id) = store_with_project().await?;

    let created = store
        .create_outline(NewOutline {
            project_id,
            title: "The Hook".to_string(),
            content: "A stranger arrives at midnight.".to_string(),
            order_index: 1,
            structure: None,
        })
        .await?;
    assert_eq!(created.order_index, 1);

    let chapter_titles: Vec<String> = {
        let mut conn = conn.lock().await;
        chapters::table
            .filter(chapters::project_id.eq(project_id))
            .filter(chapters::chapter_number.eq(1))
            .select(chapters::title)
            .load(&mut *conn)?
    };
    assert_eq!(chapter_titles, vec!["The Hook".to_string()]);

    cleanup(&conn, project_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires PostgreSQL with DATABASE_URL set
async fn delete_renumbers_following_entries() -> Result<()> {
    let (store, conn, project_id) = store_with_project().await?;

    let inserted = store
        .replace_outline(
            project_id,
            vec![
                record("One", "first"),
                record("Two", "second"),
                record("Three", "third"),
            ],
            history(),
        )
        .await?;
    assert_eq!(inserted.len(), 3);

    store.delete_outline(inserted[0].id).await?;

    let remaining = store.list_outlines(project_id).await?;
    let indices: Vec<i32> = remaining.iter().map(|o| o.order_index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(remaining[0].title, "Two");

    let chapter_numbers: Vec<i32> = {
        let mut conn = conn.lock().await;
        chapters::table
            .filter(chapters::project_id.eq(project_id))
            .order(chapters::chapter_number.asc())
            .select(chapters::chapter_number)
            .load(&mut *conn)?
    };
    assert_eq!(chapter_numbers, vec![1, 2]);

    cleanup(&conn, project_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires PostgreSQL with DATABASE_URL set
async fn reorder_swaps_pairs_together() -> Result<()> {
    let (store, conn, project_id) = store_with_project().await?;

    let inserted = store
        .replace_outline(
            project_id,
            vec![record("One", "first"), record("Two", "second")],
            history(),
        )
        .await?;

    // The first entry is superseded by the later one for the same id; it
    // must not inflate the counts.
    let outcome = store
        .reorder_outlines(
            project_id,
            vec![
                ReorderEntry {
                    outline_id: inserted[0].id,
                    new_order_index: 1,
                },
                ReorderEntry {
                    outline_id: inserted[0].id,
                    new_order_index: 2,
                },
                ReorderEntry {
                    outline_id: inserted[1].id,
                    new_order_index: 1,
                },
            ],
        )
        .await?;
    assert_eq!(outcome.outlines_updated, 2);
    assert_eq!(outcome.chapters_updated, 2);

    let reordered = store.list_outlines(project_id).await?;
    assert_eq!(reordered[0].title, "Two");
    assert_eq!(reordered[1].title, "One");

    let chapter_pairs: Vec<(i32, String)> = {
        let mut conn = conn.lock().await;
        chapters::table
            .filter(chapters::project_id.eq(project_id))
            .order(chapters::chapter_number.asc())
            .select((chapters::chapter_number, chapters::title))
            .load(&mut *conn)?
    };
    assert_eq!(
        chapter_pairs,
        vec![(1, "Two".to_string()), (2, "One".to_string())]
    );

    cleanup(&conn, project_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires PostgreSQL with DATABASE_URL set
async fn replace_then_append_extends_numbering() -> Result<()> {
    let (store, conn, project_id) = store_with_project().await?;

    store
        .replace_outline(
            project_id,
            vec![record("One", "first"), record("Two", "second")],
            history(),
        )
        .await?;

    let appended = store
        .append_outline(
            project_id,
            vec![record("Three", "third"), record("Four", "fourth")],
            3,
            history(),
        )
        .await?;
    let indices: Vec<i32> = appended.iter().map(|o| o.order_index).collect();
    assert_eq!(indices, vec![3, 4]);

    let all = store.list_outlines(project_id).await?;
    assert_eq!(all.len(), 4);

    let audit = store.generation_history(project_id).await?;
    assert_eq!(audit.len(), 2);

    cleanup(&conn, project_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires PostgreSQL with DATABASE_URL set
async fn update_mirrors_title_and_summary() -> Result<()> {
    let (store, conn, project_id) = store_with_project().await?;

    let inserted = store
        .replace_outline(project_id, vec![record("One", "first")], history())
        .await?;

    let updated = store
        .update_outline(
            inserted[0].id,
            OutlineChanges {
                title: Some("Renamed".to_string()),
                content: Some("rewritten content".to_string()),
                structure: None,
            },
        )
        .await?;
    assert_eq!(updated.title, "Renamed");
    let snapshot = updated.structure.as_deref().unwrap_or_default();
    assert!(snapshot.contains("Renamed"));
    assert!(snapshot.contains("rewritten content"));

    let mirrored: Vec<(String, Option<String>)> = {
        let mut conn = conn.lock().await;
        chapters::table
            .filter(chapters::project_id.eq(project_id))
            .filter(chapters::chapter_number.eq(1))
            .select((chapters::title, chapters::summary))
            .load(&mut *conn)?
    };
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].0, "Renamed");
    assert_eq!(mirrored[0].1.as_deref(), Some("rewritten content"));

    cleanup(&conn, project_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires PostgreSQL with DATABASE_URL set
async fn content_only_update_preserves_a_chapter_rename() -> Result<()> {
    let (store, conn, project_id) = store_with_project().await?;

    let inserted = store
        .replace_outline(project_id, vec![record("One", "first")], history())
        .await?;

    // Rename the paired chapter directly, as the chapters API allows.
    {
        let mut conn = conn.lock().await;
        diesel::update(
            chapters::table
                .filter(chapters::project_id.eq(project_id))
                .filter(chapters::chapter_number.eq(1)),
        )
        .set(chapters::title.eq("Renamed by hand"))
        .execute(&mut *conn)?;
    }

    store
        .update_outline(
            inserted[0].id,
            OutlineChanges {
                title: None,
                content: Some("rewritten content".to_string()),
                structure: None,
            },
        )
        .await?;

    let (title, summary): (String, Option<String>) = {
        let mut conn = conn.lock().await;
        chapters::table
            .filter(chapters::project_id.eq(project_id))
            .filter(chapters::chapter_number.eq(1))
            .select((chapters::title, chapters::summary))
            .first(&mut *conn)?
    };
    assert_eq!(title, "Renamed by hand");
    assert_eq!(summary.as_deref(), Some("rewritten content"));

    cleanup(&conn, project_id).await?;
    Ok(())
}
