// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
mod note;
mod reference;
mod subtask;
mod task;

pub use note::*;
pub use reference::*;
pub use subtask::*;
pub use task::*;

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::{debug, info};

/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER` since 3.32.
const SQLITE_BIND_LIMIT: usize = 32766;

/// How many rows of `columns` bound values fit in a single INSERT statement.
fn rows_per_statement(columns: usize) -> usize {
    (SQLITE_BIND_LIMIT / columns).max(1)
}

const SCHEMA: [&str; 7] = [
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(trim(name)) > 0)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS priorities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(trim(name)) > 0)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (status IN ('Pending', 'In Progress', 'Completed')),
        deadline TIMESTAMP WITH TIME ZONE NULL,
        priority_id INTEGER NULL REFERENCES priorities(id) ON DELETE SET NULL,
        category_id INTEGER NULL REFERENCES categories(id) ON DELETE SET NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL,
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subtasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (status IN ('Pending', 'In Progress', 'Completed')),
        created_at TIMESTAMP WITH TIME ZONE NOT NULL,
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL,
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_subtasks_parent_task_id ON subtasks (parent_task_id);",
    "CREATE INDEX IF NOT EXISTS idx_notes_task_id ON notes (task_id);",
];

/// Establishes the database connection pool.
/// If the database (or the directory holding it) does not exist, it creates it,
/// then makes sure every table is in place.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        ensure_parent_dir(database_url)?;
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Opens a private in-memory database with the full schema.
///
/// The pool is capped at one connection that never expires: every new
/// SQLite connection to `:memory:` would otherwise see its own empty database.
pub async fn open_in_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory SQLite database")?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Creates every table and index if missing. Safe to run repeatedly.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to apply schema statement: {}", statement.trim()))?;
    }

    info!("Schema is ready.");
    Ok(())
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        debug!("Ensuring database directory {}", parent.display());
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Row counts of every table, mostly useful for reporting and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub categories: i64,
    pub priorities: i64,
    pub tasks: i64,
    pub subtasks: i64,
    pub notes: i64,
}

pub async fn count_entities(pool: &SqlitePool) -> Result<EntityCounts> {
    async fn count(pool: &SqlitePool, table: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .with_context(|| format!("Failed to count rows in '{table}'"))
    }

    Ok(EntityCounts {
        categories: count(pool, "categories").await?,
        priorities: count(pool, "priorities").await?,
        tasks: count(pool, "tasks").await?,
        subtasks: count(pool, "subtasks").await?,
        notes: count(pool, "notes").await?,
    })
}
