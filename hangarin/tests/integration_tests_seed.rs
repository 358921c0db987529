use chrono::{Local, TimeZone, Utc};
use common::{Category, Priority, TaskStatus};
use hangarin::database::{
    count_entities, create_category_in_db, create_priority_in_db, delete_category_from_db,
    delete_task_from_db, get_task_from_db, list_notes_for_task_from_db,
    list_subtasks_for_task_from_db, list_tasks_from_db, open_in_memory_pool,
};
use hangarin::error::SeedError;
use hangarin::seed::{
    month_start, seed_database, seed_with_references, SeedSummary, NOTES_PER_TASK,
    SUBTASKS_PER_TASK,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::SqlitePool;

/// Helper function to set up a fresh, in-memory database with two categories
/// and two priorities.
async fn setup_seeded_references() -> (SqlitePool, Vec<Category>, Vec<Priority>) {
    let pool = open_in_memory_pool()
        .await
        .expect("Failed to open in-memory SQLite");

    let mut categories = Vec::new();
    for name in ["Work", "School"] {
        categories.push(create_category_in_db(&pool, name).await.unwrap());
    }
    let mut priorities = Vec::new();
    for name in ["High", "Low"] {
        priorities.push(create_priority_in_db(&pool, name).await.unwrap());
    }

    (pool, categories, priorities)
}

#[tokio::test]
async fn test_seed_three_tasks() {
    let (pool, categories, priorities) = setup_seeded_references().await;
    let mut rng = StdRng::seed_from_u64(2025);
    let now = Local::now();

    let summary = seed_database(&pool, &mut rng, &now, 3).await.unwrap();

    // Assert: the reported counts match what landed in the tables.
    let counts = count_entities(&pool).await.unwrap();
    assert_eq!(summary.tasks, 3);
    assert_eq!(counts.tasks, 3);
    assert!((3..=9).contains(&summary.subtasks));
    assert!((0..=6).contains(&summary.notes));
    assert_eq!(counts.subtasks as usize, summary.subtasks);
    assert_eq!(counts.notes as usize, summary.notes);
    assert_eq!(
        summary.to_string(),
        format!(
            "Seeded 3 tasks, {} subtasks, {} notes.",
            summary.subtasks, summary.notes
        )
    );

    let window_start = month_start(&now);
    for task in list_tasks_from_db(&pool).await.unwrap() {
        assert!(TaskStatus::ALL.contains(&task.status));
        assert!(categories.iter().any(|c| Some(c.id) == task.category_id));
        assert!(priorities.iter().any(|p| Some(p.id) == task.priority_id));

        let deadline = task.deadline.expect("seeded tasks always have a deadline");
        assert!(deadline >= window_start);
        assert!(deadline <= Utc::now());

        let subtasks = list_subtasks_for_task_from_db(&pool, task.id).await.unwrap();
        let notes = list_notes_for_task_from_db(&pool, task.id).await.unwrap();
        assert!(SUBTASKS_PER_TASK.contains(&subtasks.len()));
        assert!(NOTES_PER_TASK.contains(&notes.len()));
        assert!(subtasks.iter().all(|s| TaskStatus::ALL.contains(&s.status)));
        assert!(notes.iter().all(|n| !n.content.trim().is_empty()));
    }
}

#[tokio::test]
async fn test_seed_exact_task_count_for_several_sizes() {
    for count in [0, 1, 10, 57] {
        let (pool, categories, priorities) = setup_seeded_references().await;
        let mut rng = StdRng::seed_from_u64(count as u64);

        let summary =
            seed_with_references(&pool, &mut rng, &Utc::now(), count, &categories, &priorities)
                .await
                .unwrap();

        assert_eq!(summary.tasks, count);
        assert_eq!(count_entities(&pool).await.unwrap().tasks as usize, count);
        assert!(summary.subtasks >= count && summary.subtasks <= count * 3);
        assert!(summary.notes <= count * 2);
    }
}

#[tokio::test]
async fn test_seed_without_categories_writes_nothing() {
    let pool = open_in_memory_pool().await.unwrap();
    create_priority_in_db(&pool, "High").await.unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let err = seed_database(&pool, &mut rng, &Utc::now(), 5)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SeedError::MissingReferenceData {
            categories: 0,
            priorities: 1
        }
    ));
    assert!(err.to_string().contains("add Categories and Priorities first"));

    let counts = count_entities(&pool).await.unwrap();
    assert_eq!((counts.tasks, counts.subtasks, counts.notes), (0, 0, 0));
}

#[tokio::test]
async fn test_seed_without_priorities_writes_nothing() {
    let pool = open_in_memory_pool().await.unwrap();
    create_category_in_db(&pool, "Work").await.unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let result = seed_database(&pool, &mut rng, &Utc::now(), 5).await;

    assert!(matches!(
        result,
        Err(SeedError::MissingReferenceData { priorities: 0, .. })
    ));
    assert_eq!(count_entities(&pool).await.unwrap().tasks, 0);
}

#[tokio::test]
async fn test_seed_with_stale_reference_is_a_persistence_error() {
    let (pool, mut categories, priorities) = setup_seeded_references().await;
    // Only a category that no longer exists in the store.
    categories.truncate(1);
    categories[0].id = 9_999;
    let mut rng = StdRng::seed_from_u64(3);

    let result =
        seed_with_references(&pool, &mut rng, &Utc::now(), 4, &categories, &priorities).await;

    assert!(matches!(result, Err(SeedError::Persistence(_))));
    assert_eq!(count_entities(&pool).await.unwrap().tasks, 0);
}

#[tokio::test]
async fn test_same_seed_produces_same_rows() {
    let now = Utc.with_ymd_and_hms(2025, 5, 20, 8, 0, 0).unwrap();
    let mut snapshots = Vec::new();

    for _ in 0..2 {
        let (pool, _, _) = setup_seeded_references().await;
        let mut rng = StdRng::seed_from_u64(77);
        let summary: SeedSummary = seed_database(&pool, &mut rng, &now, 6).await.unwrap();

        let tasks: Vec<_> = list_tasks_from_db(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.title, t.description, t.status, t.deadline, t.category_id, t.priority_id))
            .collect();
        snapshots.push((summary, tasks));
    }

    assert_eq!(snapshots[0], snapshots[1]);
}

#[tokio::test]
async fn test_deleting_seeded_task_cascades() {
    let (pool, _, _) = setup_seeded_references().await;
    let mut rng = StdRng::seed_from_u64(8);
    seed_database(&pool, &mut rng, &Utc::now(), 2).await.unwrap();

    let tasks = list_tasks_from_db(&pool).await.unwrap();
    let target = &tasks[0];
    let other_subtasks = list_subtasks_for_task_from_db(&pool, tasks[1].id)
        .await
        .unwrap()
        .len();
    let other_notes = list_notes_for_task_from_db(&pool, tasks[1].id)
        .await
        .unwrap()
        .len();

    assert!(delete_task_from_db(&pool, target.id).await.unwrap());

    let counts = count_entities(&pool).await.unwrap();
    assert_eq!(counts.tasks, 1);
    assert_eq!(counts.subtasks as usize, other_subtasks);
    assert_eq!(counts.notes as usize, other_notes);
}

#[tokio::test]
async fn test_deleting_category_keeps_seeded_tasks() {
    let (pool, categories, _) = setup_seeded_references().await;
    let mut rng = StdRng::seed_from_u64(13);
    seed_database(&pool, &mut rng, &Utc::now(), 10).await.unwrap();

    for category in &categories {
        assert!(delete_category_from_db(&pool, category.id).await.unwrap());
    }

    let tasks = list_tasks_from_db(&pool).await.unwrap();
    assert_eq!(tasks.len(), 10);
    for task in tasks {
        assert_eq!(task.category_id, None);
        assert!(task.priority_id.is_some());
        let reloaded = get_task_from_db(&pool, task.id).await.unwrap().unwrap();
        assert_eq!(reloaded, task);
    }
}
