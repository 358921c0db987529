// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use super::rows_per_statement;

use anyhow::{Context, Result};
use chrono::Utc;
use common::{NewTask, Task, UpdateTask};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

/// Bound values per row in a task INSERT.
const TASK_INSERT_COLUMNS: usize = 8;

/// Inserts a new task into the database.
pub async fn create_task_in_db(pool: &SqlitePool, payload: NewTask) -> Result<Task> {
    payload.validate()?;
    let now = Utc::now();

    debug!(
        "Insert values: title={}, status={}, deadline={:?}, priority_id={:?}, category_id={:?}, created_at={}",
        payload.title, payload.status, payload.deadline, payload.priority_id, payload.category_id, now
    );

    let id = sqlx::query(
        "INSERT INTO tasks (title, description, status, deadline, priority_id, category_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.status)
    .bind(payload.deadline)
    .bind(payload.priority_id)
    .bind(payload.category_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert task into DB")?
    .last_insert_rowid();

    Ok(Task {
        id,
        title: payload.title,
        description: payload.description,
        status: payload.status,
        deadline: payload.deadline,
        priority_id: payload.priority_id,
        category_id: payload.category_id,
        created_at: now,
        updated_at: now,
    })
}

/// Inserts many tasks with multi-row INSERT statements inside one transaction.
/// Returns the created rows in the same order as `payloads`.
///
/// Every payload is validated before the first statement runs, so a bad
/// entry leaves the table untouched.
pub async fn bulk_create_tasks_in_db(pool: &SqlitePool, payloads: &[NewTask]) -> Result<Vec<Task>> {
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
        .context("Failed to begin task bulk insert")?;
    let mut created = Vec::with_capacity(payloads.len());

    for chunk in payloads.chunks(rows_per_statement(TASK_INSERT_COLUMNS)) {
        debug!("Bulk inserting {} tasks", chunk.len());

        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO tasks (title, description, status, deadline, priority_id, category_id, created_at, updated_at) ",
        );
        builder.push_values(chunk, |mut row, task| {
            row.push_bind(&task.title)
                .push_bind(&task.description)
                .push_bind(task.status)
                .push_bind(task.deadline)
                .push_bind(task.priority_id)
                .push_bind(task.category_id)
                .push_bind(now)
                .push_bind(now);
        });
        builder.push(" RETURNING *");

        let mut rows = builder
            .build_query_as::<Task>()
            .fetch_all(&mut *tx)
            .await
            .context("Failed to bulk insert tasks into DB")?;

        // AUTOINCREMENT ids grow in VALUES order within one statement.
        rows.sort_by_key(|task| task.id);
        created.extend(rows);
    }

    tx.commit()
        .await
        .context("Failed to commit task bulk insert")?;

    info!("Bulk inserted {} tasks.", created.len());
    Ok(created)
}

pub async fn get_task_from_db(pool: &SqlitePool, task_id: i64) -> Result<Option<Task>> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to fetch task with ID: {task_id}"))
}

/// Lists every task, oldest first.
pub async fn list_tasks_from_db(pool: &SqlitePool) -> Result<Vec<Task>> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to retrieve tasks from DB")
}

/// Applies a partial update and refreshes `updated_at`.
/// Returns `None` if no task with the given ID exists.
pub async fn update_task_in_db(
    pool: &SqlitePool,
    task_id: i64,
    changes: UpdateTask,
) -> Result<Option<Task>> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin task update")?;

    let Some(mut task) = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await
        .with_context(|| format!("Failed to fetch task with ID: {task_id}"))?
    else {
        return Ok(None);
    };

    changes.apply_to(&mut task)?;
    task.updated_at = Utc::now();

    sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, status = ?, deadline = ?, priority_id = ?, category_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.deadline)
    .bind(task.priority_id)
    .bind(task.category_id)
    .bind(task.updated_at)
    .bind(task_id)
    .execute(&mut *tx)
    .await
    .with_context(|| format!("Failed to update task with ID: {task_id}"))?;

    tx.commit().await.context("Failed to commit task update")?;

    debug!("Updated task {} (status={})", task_id, task.status);
    Ok(Some(task))
}

/// Deletes a task together with its subtasks and notes.
/// Returns true if the task existed.
pub async fn delete_task_from_db(pool: &SqlitePool, task_id: i64) -> Result<bool> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin task delete")?;

    let subtasks = sqlx::query("DELETE FROM subtasks WHERE parent_task_id = ?")
        .bind(task_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to delete subtasks of task {task_id}"))?
        .rows_affected();

    let notes = sqlx::query("DELETE FROM notes WHERE task_id = ?")
        .bind(task_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to delete notes of task {task_id}"))?
        .rows_affected();

    let deleted = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to delete task with ID: {task_id}"))?
        .rows_affected();

    tx.commit().await.context("Failed to commit task delete")?;

    info!(
        "Deleted {} task row(s) for ID {} along with {} subtasks and {} notes.",
        deleted, task_id, subtasks, notes
    );

    Ok(deleted > 0)
}
