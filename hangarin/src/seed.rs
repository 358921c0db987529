// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Demo data generation.
//!
//! A run plans every row up front from an injected random source, then
//! persists them with three bulk inserts: tasks, subtasks, notes. Each bulk
//! insert is atomic on its own; the run as a whole is not, so a failure in the
//! subtask or note insert leaves the already-committed tasks in place.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, DateTime, Duration, TimeZone, Utc};
use common::{Category, NewNote, NewSubTask, NewTask, Priority, Task, TaskStatus};
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database;
use crate::error::SeedError;
use crate::lorem;

pub const DEFAULT_TASK_COUNT: usize = 10;
pub const SUBTASKS_PER_TASK: RangeInclusive<usize> = 1..=3;
pub const NOTES_PER_TASK: RangeInclusive<usize> = 0..=2;

const TITLE_WORDS: usize = 5;
const DESCRIPTION_SENTENCES: usize = 3;
const NOTE_SENTENCES: usize = 2;

/// How many rows a run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub tasks: usize,
    pub subtasks: usize,
    pub notes: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seeded {} tasks, {} subtasks, {} notes.",
            self.tasks, self.subtasks, self.notes
        )
    }
}

pub fn random_status<R: Rng + ?Sized>(rng: &mut R) -> TaskStatus {
    match rng.gen_range(0..3) {
        0 => TaskStatus::Pending,
        1 => TaskStatus::InProgress,
        _ => TaskStatus::Completed,
    }
}

/// Midnight on the first day of `now`'s month, in `now`'s timezone.
///
/// Falls back to `now` itself if that midnight does not exist locally
/// (a DST jump at 00:00).
pub fn month_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let local_midnight = now
        .date_naive()
        .with_day(1)
        .and_then(|first| first.and_hms_opt(0, 0, 0));

    match local_midnight.and_then(|naive| now.timezone().from_local_datetime(&naive).earliest()) {
        Some(start) => start.with_timezone(&Utc),
        None => now.with_timezone(&Utc),
    }
}

/// A whole-second instant between the start of the current month and `now`,
/// both inclusive.
pub fn random_deadline<R: Rng + ?Sized, Tz: TimeZone>(rng: &mut R, now: &DateTime<Tz>) -> DateTime<Utc> {
    let start = month_start(now);
    let span = (now.with_timezone(&Utc) - start).num_seconds().max(0);
    start + Duration::seconds(rng.gen_range(0..=span))
}

fn ensure_reference_data(categories: &[Category], priorities: &[Priority]) -> Result<(), SeedError> {
    if categories.is_empty() || priorities.is_empty() {
        return Err(SeedError::MissingReferenceData {
            categories: categories.len(),
            priorities: priorities.len(),
        });
    }
    Ok(())
}

/// Plans `count` tasks, each pointing at an independently drawn priority and
/// category from the given sets.
pub fn plan_tasks<R: Rng + ?Sized, Tz: TimeZone>(
    rng: &mut R,
    now: &DateTime<Tz>,
    count: usize,
    categories: &[Category],
    priorities: &[Priority],
) -> Result<Vec<NewTask>, SeedError> {
    ensure_reference_data(categories, priorities)?;

    let mut tasks = Vec::with_capacity(count);
    for _ in 0..count {
        let title = lorem::sentence(rng, TITLE_WORDS);
        let description = lorem::paragraph(rng, DESCRIPTION_SENTENCES);
        let status = random_status(rng);
        let deadline = random_deadline(rng, now);
        let priority = priorities.choose(rng).map(|priority| priority.id);
        let category = categories.choose(rng).map(|category| category.id);

        tasks.push(NewTask {
            title,
            description,
            status,
            deadline: Some(deadline),
            priority_id: priority,
            category_id: category,
        });
    }
    Ok(tasks)
}

/// Plans the subtasks and notes for already persisted tasks.
pub fn plan_children<R: Rng + ?Sized>(rng: &mut R, tasks: &[Task]) -> (Vec<NewSubTask>, Vec<NewNote>) {
    let mut subtasks = Vec::new();
    let mut notes = Vec::new();

    for task in tasks {
        for _ in 0..rng.gen_range(SUBTASKS_PER_TASK) {
            subtasks.push(NewSubTask {
                parent_task_id: task.id,
                title: lorem::sentence(rng, TITLE_WORDS),
                status: random_status(rng),
            });
        }
        for _ in 0..rng.gen_range(NOTES_PER_TASK) {
            notes.push(NewNote {
                task_id: task.id,
                content: lorem::paragraph(rng, NOTE_SENTENCES),
            });
        }
    }

    (subtasks, notes)
}

/// Seeds `count` tasks against the given reference rows.
pub async fn seed_with_references<R: Rng + ?Sized, Tz: TimeZone>(
    pool: &SqlitePool,
    rng: &mut R,
    now: &DateTime<Tz>,
    count: usize,
    categories: &[Category],
    priorities: &[Priority],
) -> Result<SeedSummary, SeedError> {
    let planned = plan_tasks(rng, now, count, categories, priorities)?;
    info!(
        "Seeding {} tasks across {} categories and {} priorities.",
        count,
        categories.len(),
        priorities.len()
    );

    let tasks = database::bulk_create_tasks_in_db(pool, &planned).await?;

    let (subtasks, notes) = plan_children(rng, &tasks);
    debug!(
        "Planned {} subtasks and {} notes for {} tasks.",
        subtasks.len(),
        notes.len(),
        tasks.len()
    );

    let subtasks = database::bulk_create_subtasks_in_db(pool, &subtasks).await?;
    let notes = database::bulk_create_notes_in_db(pool, &notes).await?;

    Ok(SeedSummary {
        tasks: tasks.len(),
        subtasks: subtasks.len(),
        notes: notes.len(),
    })
}

/// Loads every category and priority from the store and seeds against them.
pub async fn seed_database<R: Rng + ?Sized, Tz: TimeZone>(
    pool: &SqlitePool,
    rng: &mut R,
    now: &DateTime<Tz>,
    count: usize,
) -> Result<SeedSummary, SeedError> {
    let categories = database::list_categories_from_db(pool).await?;
    let priorities = database::list_priorities_from_db(pool).await?;

    seed_with_references(pool, rng, now, count, &categories, &priorities).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn categories() -> Vec<Category> {
        ["Work", "School"]
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: i as i64 + 10,
                name: name.to_string(),
            })
            .collect()
    }

    fn priorities() -> Vec<Priority> {
        ["High", "Low"]
            .iter()
            .enumerate()
            .map(|(i, name)| Priority {
                id: i as i64 + 20,
                name: name.to_string(),
            })
            .collect()
    }

    fn tokyo_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 14, 10, 0, 0)
            .unwrap()
    }

    fn persisted(id: i64) -> Task {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        Task {
            id,
            title: format!("Task {id}"),
            description: String::new(),
            status: TaskStatus::Pending,
            deadline: None,
            priority_id: None,
            category_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_summary_message() {
        let summary = SeedSummary {
            tasks: 3,
            subtasks: 7,
            notes: 2,
        };
        assert_eq!(summary.to_string(), "Seeded 3 tasks, 7 subtasks, 2 notes.");
    }

    #[test]
    fn test_month_start_uses_the_callers_timezone() {
        let expected = Utc.with_ymd_and_hms(2025, 2, 28, 15, 0, 0).unwrap();
        assert_eq!(month_start(&tokyo_now()), expected);

        // Already March in Tokyo while still February in UTC.
        let early = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 1, 5, 0, 0)
            .unwrap();
        assert_eq!(month_start(&early), expected);
    }

    #[test]
    fn test_deadline_stays_within_month_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = tokyo_now();
        let start = month_start(&now);
        for _ in 0..500 {
            let deadline = random_deadline(&mut rng, &now);
            assert!(deadline >= start && deadline <= now.with_timezone(&Utc));
        }
    }

    #[test]
    fn test_deadline_at_month_start_is_month_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(random_deadline(&mut rng, &now), now);
    }

    #[test]
    fn test_plan_tasks_draws_from_supplied_references() {
        let mut rng = StdRng::seed_from_u64(42);
        let categories = categories();
        let priorities = priorities();

        let planned = plan_tasks(&mut rng, &tokyo_now(), 50, &categories, &priorities).unwrap();

        assert_eq!(planned.len(), 50);
        for task in &planned {
            assert!(categories.iter().any(|c| Some(c.id) == task.category_id));
            assert!(priorities.iter().any(|p| Some(p.id) == task.priority_id));
            assert!(TaskStatus::ALL.contains(&task.status));
            assert!(task.deadline.is_some());
            assert!(task.validate().is_ok());
        }
    }

    #[test]
    fn test_plan_tasks_covers_every_status() {
        let mut rng = StdRng::seed_from_u64(5);
        let planned = plan_tasks(&mut rng, &tokyo_now(), 60, &categories(), &priorities()).unwrap();
        for status in TaskStatus::ALL {
            assert!(planned.iter().any(|task| task.status == status));
        }
    }

    #[test]
    fn test_plan_tasks_requires_reference_data() {
        let mut rng = StdRng::seed_from_u64(0);

        let err = plan_tasks(&mut rng, &tokyo_now(), 3, &[], &priorities()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::MissingReferenceData {
                categories: 0,
                priorities: 2
            }
        ));

        let err = plan_tasks(&mut rng, &tokyo_now(), 3, &categories(), &[]).unwrap_err();
        assert!(matches!(err, SeedError::MissingReferenceData { priorities: 0, .. }));
    }

    #[test]
    fn test_plan_zero_tasks() {
        let mut rng = StdRng::seed_from_u64(0);
        let planned = plan_tasks(&mut rng, &tokyo_now(), 0, &categories(), &priorities()).unwrap();
        assert!(planned.is_empty());
    }

    #[test]
    fn test_plan_children_counts_per_task() {
        let mut rng = StdRng::seed_from_u64(9);
        let tasks: Vec<Task> = (1..=40).map(persisted).collect();

        let (subtasks, notes) = plan_children(&mut rng, &tasks);

        for task in &tasks {
            let subtask_count = subtasks.iter().filter(|s| s.parent_task_id == task.id).count();
            let note_count = notes.iter().filter(|n| n.task_id == task.id).count();
            assert!(SUBTASKS_PER_TASK.contains(&subtask_count));
            assert!(NOTES_PER_TASK.contains(&note_count));
        }
        assert!(subtasks.iter().all(|s| s.validate().is_ok()));
        assert!(notes.iter().all(|n| n.validate().is_ok()));
    }

    #[test]
    fn test_planning_is_reproducible_with_a_seed() {
        let plan = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            plan_tasks(&mut rng, &tokyo_now(), 5, &categories(), &priorities()).unwrap()
        };
        assert_eq!(plan(123), plan(123));
        assert_ne!(plan(123), plan(124));
    }
}
