// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use super::rows_per_statement;

use anyhow::{Context, Result};
use chrono::Utc;
use common::{NewSubTask, SubTask, UpdateSubTask};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

const SUBTASK_INSERT_COLUMNS: usize = 5;

/// Inserts a subtask. Fails if the parent task does not exist.
pub async fn create_subtask_in_db(pool: &SqlitePool, payload: NewSubTask) -> Result<SubTask> {
    payload.validate()?;
    let now = Utc::now();

    debug!(
        "Insert values: parent_task_id={}, title={}, status={}",
        payload.parent_task_id, payload.title, payload.status
    );

    let id = sqlx::query(
        "INSERT INTO subtasks (parent_task_id, title, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(payload.parent_task_id)
    .bind(&payload.title)
    .bind(payload.status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert subtask into DB")?
    .last_insert_rowid();

    Ok(SubTask {
        id,
        parent_task_id: payload.parent_task_id,
        title: payload.title,
        status: payload.status,
        created_at: now,
        updated_at: now,
    })
}

/// Inserts many subtasks in one transaction, returning them in input order.
pub async fn bulk_create_subtasks_in_db(
    pool: &SqlitePool,
    payloads: &[NewSubTask],
) -> Result<Vec<SubTask>> {
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
        .context("Failed to begin subtask bulk insert")?;
    let mut created = Vec::with_capacity(payloads.len());

    for chunk in payloads.chunks(rows_per_statement(SUBTASK_INSERT_COLUMNS)) {
        debug!("Bulk inserting {} subtasks", chunk.len());

        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO subtasks (parent_task_id, title, status, created_at, updated_at) ",
        );
        builder.push_values(chunk, |mut row, subtask| {
            row.push_bind(subtask.parent_task_id)
                .push_bind(&subtask.title)
                .push_bind(subtask.status)
                .push_bind(now)
                .push_bind(now);
        });
        builder.push(" RETURNING *");

        let mut rows = builder
            .build_query_as::<SubTask>()
            .fetch_all(&mut *tx)
            .await
            .context("Failed to bulk insert subtasks into DB")?;
        rows.sort_by_key(|subtask| subtask.id);
        created.extend(rows);
    }

    tx.commit()
        .await
        .context("Failed to commit subtask bulk insert")?;

    info!("Bulk inserted {} subtasks.", created.len());
    Ok(created)
}

pub async fn get_subtask_from_db(pool: &SqlitePool, subtask_id: i64) -> Result<Option<SubTask>> {
    sqlx::query_as::<_, SubTask>("SELECT * FROM subtasks WHERE id = ?")
        .bind(subtask_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to fetch subtask with ID: {subtask_id}"))
}

pub async fn list_subtasks_for_task_from_db(pool: &SqlitePool, task_id: i64) -> Result<Vec<SubTask>> {
    sqlx::query_as::<_, SubTask>("SELECT * FROM subtasks WHERE parent_task_id = ? ORDER BY id ASC")
        .bind(task_id)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to list subtasks of task {task_id}"))
}

/// Applies a partial update and refreshes `updated_at`.
pub async fn update_subtask_in_db(
    pool: &SqlitePool,
    subtask_id: i64,
    changes: UpdateSubTask,
) -> Result<Option<SubTask>> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin subtask update")?;

    let Some(mut subtask) = sqlx::query_as::<_, SubTask>("SELECT * FROM subtasks WHERE id = ?")
        .bind(subtask_id)
        .fetch_optional(&mut *tx)
        .await
        .with_context(|| format!("Failed to fetch subtask with ID: {subtask_id}"))?
    else {
        return Ok(None);
    };

    changes.apply_to(&mut subtask)?;
    subtask.updated_at = Utc::now();

    sqlx::query("UPDATE subtasks SET title = ?, status = ?, updated_at = ? WHERE id = ?")
        .bind(&subtask.title)
        .bind(subtask.status)
        .bind(subtask.updated_at)
        .bind(subtask_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to update subtask with ID: {subtask_id}"))?;

    tx.commit()
        .await
        .context("Failed to commit subtask update")?;

    Ok(Some(subtask))
}

pub async fn delete_subtask_from_db(pool: &SqlitePool, subtask_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM subtasks WHERE id = ?")
        .bind(subtask_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete subtask with ID: {subtask_id}"))?;

    Ok(result.rows_affected() > 0)
}
