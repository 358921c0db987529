// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Categories and priorities: name-only lookup rows that tasks point at.
//! Both tables share their shape, so the queries are written once against
//! [`Reference`] and exposed through typed wrappers.

use anyhow::{Context, Result};
use chrono::Utc;
use common::{validate_name, Category, Priority};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
enum Reference {
    Category,
    Priority,
}

impl Reference {
    fn table(self) -> &'static str {
        match self {
            Reference::Category => "categories",
            Reference::Priority => "priorities",
        }
    }

    /// The nullable column on `tasks` that points at this table.
    fn task_column(self) -> &'static str {
        match self {
            Reference::Category => "category_id",
            Reference::Priority => "priority_id",
        }
    }
}

async fn create_reference<T>(pool: &SqlitePool, reference: Reference, name: &str) -> Result<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    validate_name(name)?;
    debug!("Insert into {}: name={}", reference.table(), name);

    sqlx::query_as::<_, T>(&format!(
        "INSERT INTO {} (name) VALUES (?) RETURNING id, name",
        reference.table()
    ))
    .bind(name)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Failed to insert into '{}'", reference.table()))
}

async fn get_reference<T>(pool: &SqlitePool, reference: Reference, id: i64) -> Result<Option<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    sqlx::query_as::<_, T>(&format!(
        "SELECT id, name FROM {} WHERE id = ?",
        reference.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to fetch id {} from '{}'", id, reference.table()))
}

async fn list_references<T>(pool: &SqlitePool, reference: Reference) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    sqlx::query_as::<_, T>(&format!(
        "SELECT id, name FROM {} ORDER BY id ASC",
        reference.table()
    ))
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to list '{}'", reference.table()))
}

async fn rename_reference<T>(
    pool: &SqlitePool,
    reference: Reference,
    id: i64,
    name: &str,
) -> Result<Option<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    validate_name(name)?;

    sqlx::query_as::<_, T>(&format!(
        "UPDATE {} SET name = ? WHERE id = ? RETURNING id, name",
        reference.table()
    ))
    .bind(name)
    .bind(id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to rename id {} in '{}'", id, reference.table()))
}

/// Clears the reference on every task pointing at `id`, then deletes the row.
/// Returns true if a row was deleted.
async fn delete_reference(pool: &SqlitePool, reference: Reference, id: i64) -> Result<bool> {
    let table = reference.table();
    let column = reference.task_column();

    let mut tx = pool
        .begin()
        .await
        .with_context(|| format!("Failed to begin delete from '{table}'"))?;

    let cleared = sqlx::query(&format!(
        "UPDATE tasks SET {column} = NULL, updated_at = ? WHERE {column} = ?"
    ))
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await
    .with_context(|| format!("Failed to clear tasks.{column} for id {id}"))?
    .rows_affected();

    let deleted = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
        .bind(id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to delete id {id} from '{table}'"))?
        .rows_affected();

    tx.commit()
        .await
        .with_context(|| format!("Failed to commit delete from '{table}'"))?;

    info!(
        "Deleted {} row(s) from '{}' for id {}, cleared {} task reference(s).",
        deleted, table, id, cleared
    );

    Ok(deleted > 0)
}

pub async fn create_category_in_db(pool: &SqlitePool, name: &str) -> Result<Category> {
    create_reference(pool, Reference::Category, name).await
}

pub async fn get_category_from_db(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    get_reference(pool, Reference::Category, id).await
}

pub async fn list_categories_from_db(pool: &SqlitePool) -> Result<Vec<Category>> {
    list_references(pool, Reference::Category).await
}

/// Returns `None` when no category has that id.
pub async fn rename_category_in_db(
    pool: &SqlitePool,
    id: i64,
    name: &str,
) -> Result<Option<Category>> {
    rename_reference(pool, Reference::Category, id, name).await
}

/// Deletes a category. Tasks that used it keep existing with no category.
pub async fn delete_category_from_db(pool: &SqlitePool, id: i64) -> Result<bool> {
    delete_reference(pool, Reference::Category, id).await
}

pub async fn create_priority_in_db(pool: &SqlitePool, name: &str) -> Result<Priority> {
    create_reference(pool, Reference::Priority, name).await
}

pub async fn get_priority_from_db(pool: &SqlitePool, id: i64) -> Result<Option<Priority>> {
    get_reference(pool, Reference::Priority, id).await
}

pub async fn list_priorities_from_db(pool: &SqlitePool) -> Result<Vec<Priority>> {
    list_references(pool, Reference::Priority).await
}

pub async fn rename_priority_in_db(
    pool: &SqlitePool,
    id: i64,
    name: &str,
) -> Result<Option<Priority>> {
    rename_reference(pool, Reference::Priority, id, name).await
}

/// Deletes a priority. Tasks that used it keep existing with no priority.
pub async fn delete_priority_from_db(pool: &SqlitePool, id: i64) -> Result<bool> {
    delete_reference(pool, Reference::Priority, id).await
}
