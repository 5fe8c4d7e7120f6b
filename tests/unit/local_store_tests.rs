/// Unit tests for the local (guest mode) persistence adapter
use islamic_tracker::*;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> LocalStore {
    LocalStore::open(dir.path()).expect("Failed to open local store")
}

#[tokio::test]
async fn test_create_then_list_returns_the_entity() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    let draft = TaskDraft {
        title: "Memorize Al-Mulk".to_string(),
        description: Some("Two ayahs a day".to_string()),
        category: Category::Study,
        priority: Priority::High,
        due_date: None,
    };
    let created = store
        .create_task(&Identity::Guest, &draft)
        .await
        .expect("create");

    let listed = store.list_tasks(&Identity::Guest).await.expect("list");
    assert_eq!(listed.len(), 1);
    // Field-for-field: what list returns is exactly what create returned.
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].title, "Memorize Al-Mulk");
    assert_eq!(listed[0].description, Some("Two ayahs a day".to_string()));
    assert!(!listed[0].completed);
    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    let first = store
        .create_task(&Identity::Guest, &TaskDraft::new("first"))
        .await
        .expect("create");
    let second = store
        .create_task(&Identity::Guest, &TaskDraft::new("second"))
        .await
        .expect("create");
    let third = store
        .create_task(&Identity::Guest, &TaskDraft::new("third"))
        .await
        .expect("create");

    let listed = store.list_tasks(&Identity::Guest).await.expect("list");
    let ids: Vec<_> = listed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_same_tick_creates_get_distinct_ids() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    // Back-to-back creates land in the same clock tick often enough to
    // exercise the collision bump.
    let mut ids = Vec::new();
    for i in 0..5 {
        let task = store
            .create_task(&Identity::Guest, &TaskDraft::new(format!("task {}", i)))
            .await
            .expect("create");
        ids.push(task.id);
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn test_update_applies_only_supplied_fields() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    let created = store
        .create_task(&Identity::Guest, &TaskDraft::new("Pray Fajr"))
        .await
        .expect("create");

    let updated = store
        .update_task(&Identity::Guest, &created.id, &TaskPatch::completion(true))
        .await
        .expect("update");

    assert!(updated.completed);
    assert_eq!(updated.title, "Pray Fajr");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    // Applying the same completion patch again converges on the same state.
    let again = store
        .update_task(&Identity::Guest, &created.id, &TaskPatch::completion(true))
        .await
        .expect("update");
    assert!(again.completed);
    assert_eq!(again.title, updated.title);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    let err = store
        .update_task(&Identity::Guest, "missing", &TaskPatch::completion(true))
        .await
        .expect_err("should fail");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_second_delete_fails() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    let created = store
        .create_task(&Identity::Guest, &TaskDraft::new("once"))
        .await
        .expect("create");

    store
        .delete_task(&Identity::Guest, &created.id)
        .await
        .expect("first delete");
    let err = store
        .delete_task(&Identity::Guest, &created.id)
        .await
        .expect_err("second delete should fail");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_collections_survive_reopening_the_store() {
    let dir = TempDir::new().expect("temp dir");

    let created = {
        let store = open_store(&dir);
        store
            .create_reminder(
                &Identity::Guest,
                &ReminderDraft::new(67, 1, 30),
                "Al-Mulk",
            )
            .await
            .expect("create")
    };

    // A fresh adapter over the same directory sees the same collection,
    // field for field.
    let store = open_store(&dir);
    let listed = store.list_reminders(&Identity::Guest).await.expect("list");
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_corrupt_blob_lists_empty_without_failing() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    store
        .create_reminder(&Identity::Guest, &ReminderDraft::new(2, 1, 5), "Al-Baqarah")
        .await
        .expect("create");

    let blob = dir.path().join(format!("{}.json", REMINDERS_KEY));
    std::fs::write(&blob, "[{\"id\": truncated").expect("corrupt blob");

    let listed = store.list_reminders(&Identity::Guest).await.expect("list");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_task_and_reminder_blobs_are_independent() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir);

    store
        .create_task(&Identity::Guest, &TaskDraft::new("task"))
        .await
        .expect("create task");
    store
        .create_reminder(&Identity::Guest, &ReminderDraft::new(1, 1, 7), "Al-Fatihah")
        .await
        .expect("create reminder");

    assert!(dir.path().join(format!("{}.json", TASKS_KEY)).exists());
    assert!(dir.path().join(format!("{}.json", REMINDERS_KEY)).exists());

    std::fs::remove_file(dir.path().join(format!("{}.json", TASKS_KEY))).unwrap();
    assert!(store
        .list_tasks(&Identity::Guest)
        .await
        .expect("list")
        .is_empty());
    assert_eq!(
        store
            .list_reminders(&Identity::Guest)
            .await
            .expect("list")
            .len(),
        1
    );
}
