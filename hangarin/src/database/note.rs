// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use super::rows_per_statement;

use anyhow::{Context, Result};
use chrono::Utc;
use common::{validate_content, NewNote, Note};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

const NOTE_INSERT_COLUMNS: usize = 4;

pub async fn create_note_in_db(pool: &SqlitePool, payload: NewNote) -> Result<Note> {
    payload.validate()?;
    let now = Utc::now();

    debug!("Insert note for task_id={}", payload.task_id);

    let id = sqlx::query(
        "INSERT INTO notes (task_id, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.task_id)
    .bind(&payload.content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert note into DB")?
    .last_insert_rowid();

    Ok(Note {
        id,
        task_id: payload.task_id,
        content: payload.content,
        created_at: now,
        updated_at: now,
    })
}

/// Inserts many notes in one transaction, returning them in input order.
pub async fn bulk_create_notes_in_db(pool: &SqlitePool, payloads: &[NewNote]) -> Result<Vec<Note>> {
    if payloads.is_empty() {
        return Ok(Vec::new());
    }
    for payload in payloads {
        payload.validate()?;
    }

    let now = Utc::now();
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin note bulk insert")?;
    let mut created = Vec::with_capacity(payloads.len());

    for chunk in payloads.chunks(rows_per_statement(NOTE_INSERT_COLUMNS)) {
        debug!("Bulk inserting {} notes", chunk.len());

        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO notes (task_id, content, created_at, updated_at) ",
        );
        builder.push_values(chunk, |mut row, note| {
            row.push_bind(note.task_id)
                .push_bind(&note.content)
                .push_bind(now)
                .push_bind(now);
        });
        builder.push(" RETURNING *");

        let mut rows = builder
            .build_query_as::<Note>()
            .fetch_all(&mut *tx)
            .await
            .context("Failed to bulk insert notes into DB")?;
        rows.sort_by_key(|note| note.id);
        created.extend(rows);
    }

    tx.commit()
        .await
        .context("Failed to commit note bulk insert")?;

    info!("Bulk inserted {} notes.", created.len());
    Ok(created)
}

pub async fn get_note_from_db(pool: &SqlitePool, note_id: i64) -> Result<Option<Note>> {
    sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
        .bind(note_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to fetch note with ID: {note_id}"))
}

pub async fn list_notes_for_task_from_db(pool: &SqlitePool, task_id: i64) -> Result<Vec<Note>> {
    sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE task_id = ? ORDER BY id ASC")
        .bind(task_id)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to list notes of task {task_id}"))
}

/// Replaces the note's content and refreshes `updated_at`.
pub async fn update_note_in_db(pool: &SqlitePool, note_id: i64, content: &str) -> Result<Option<Note>> {
    validate_content(content)?;

    sqlx::query_as::<_, Note>(
        "UPDATE notes SET content = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(content)
    .bind(Utc::now())
    .bind(note_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to update note with ID: {note_id}"))
}

pub async fn delete_note_from_db(pool: &SqlitePool, note_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(note_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete note with ID: {note_id}"))?;

    Ok(result.rows_affected() > 0)
}
