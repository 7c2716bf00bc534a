use chrono::{NaiveDate, NaiveTime};
use daybook_core::{CategoryFilter, ImageRef, NewTask, Priority, TaskStore, TaskStoreError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(text: &str, category: &str, time: &str) -> NewTask {
    NewTask::new(text, Priority::Medium, date(2024, 6, 1), time, category)
}

#[test]
fn new_store_starts_empty_and_defaults_are_seeded_in_order() {
    let empty = TaskStore::new();
    assert!(empty.categories().is_empty());
    assert!(empty.tasks().is_empty());

    let seeded = TaskStore::with_default_categories();
    assert_eq!(seeded.categories(), &["仕事", "学業", "趣味", "その他"]);
}

#[test]
fn add_task_combines_date_and_time_exactly() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    for (raw, hour, minute) in [("00:00", 0, 0), ("7:45", 7, 45), ("23:59", 23, 59)] {
        let mut request = task("report", "Work", raw);
        request.date = date(2025, 2, 28);
        let created = store.add_task(request).unwrap();
        assert_eq!(created.deadline.date(), date(2025, 2, 28));
        assert_eq!(
            created.deadline.time(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
        );
        assert!(!created.done);
    }
    assert_eq!(store.tasks().len(), 3);
}

#[test]
fn invalid_time_leaves_tasks_unchanged() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    store.add_task(task("existing", "Work", "09:00")).unwrap();

    for raw in ["25:00", "9:5", "abc", "", "24:00", "12:3a"] {
        let err = store.add_task(task("later", "Work", raw)).unwrap_err();
        assert_eq!(err, TaskStoreError::InvalidTime(raw.to_string()));
        assert_eq!(store.tasks().len(), 1);
    }
}

#[test]
fn empty_text_is_rejected_without_mutation() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    for text in ["", "   "] {
        let err = store.add_task(task(text, "Work", "09:00")).unwrap_err();
        assert_eq!(err, TaskStoreError::EmptyText);
    }
    assert!(store.tasks().is_empty());
}

#[test]
fn duplicate_category_is_rejected() {
    let mut store = TaskStore::new();
    store.add_category("Work").unwrap();
    let err = store.add_category("Work").unwrap_err();
    assert_eq!(err, TaskStoreError::DuplicateCategory("Work".to_string()));
    assert_eq!(store.categories(), &["Work"]);

    assert!(matches!(
        TaskStore::with_categories(["A", "A"]),
        Err(TaskStoreError::DuplicateCategory(_))
    ));
}

#[test]
fn blank_and_reserved_category_names_are_rejected() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    for blank in ["", "  "] {
        assert_eq!(
            store.add_category(blank).unwrap_err(),
            TaskStoreError::EmptyCategoryName
        );
    }
    for reserved in ["すべて", "all", "All", "ALL"] {
        assert_eq!(
            store.add_category(reserved).unwrap_err(),
            TaskStoreError::ReservedCategoryName(reserved.to_string())
        );
    }
    assert_eq!(store.categories(), &["Work"]);
}

#[test]
fn category_in_use_blocks_delete_until_task_is_removed() {
    let mut store = TaskStore::new();
    store.add_category("Work").unwrap();
    let updated = store.add_category("Study").unwrap();
    assert_eq!(updated, &["Work", "Study"]);

    let t1 = store.add_task(task("T1", "Work", "09:00")).unwrap().id;
    let err = store.delete_category("Work").unwrap_err();
    assert_eq!(err, TaskStoreError::CategoryInUse("Work".to_string()));
    assert_eq!(store.categories(), &["Work", "Study"]);

    store.delete_task(t1).unwrap();
    store.delete_category("Work").unwrap();
    assert_eq!(store.categories(), &["Study"]);
}

#[test]
fn toggle_done_is_idempotent_and_unknown_ids_fail() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    let id = store.add_task(task("a", "Work", "09:00")).unwrap().id;

    assert!(store.toggle_done(id, true).unwrap().done);
    assert!(store.toggle_done(id, true).unwrap().done);
    assert!(!store.toggle_done(id, false).unwrap().done);

    let removed = store.delete_task(id).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(
        store.toggle_done(id, true).unwrap_err(),
        TaskStoreError::TaskNotFound(id)
    );
    assert_eq!(
        store.delete_task(id).unwrap_err(),
        TaskStoreError::TaskNotFound(id)
    );
}

#[test]
fn delete_task_removes_exactly_one_of_identical_entries() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    let first = store.add_task(task("same", "Work", "09:00")).unwrap().id;
    let second = store.add_task(task("same", "Work", "09:00")).unwrap().id;

    store.delete_task(first).unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].id, second);
}

#[test]
fn set_all_done_then_clear_completed_is_idempotent() {
    let mut store = TaskStore::with_categories(["Work", "Home"]).unwrap();
    let keep = store.add_task(task("keep", "Home", "08:00")).unwrap().id;
    let finish = store.add_task(task("finish", "Work", "09:00")).unwrap().id;
    store.toggle_done(finish, true).unwrap();

    assert_eq!(store.clear_completed(), 1);
    let after_once: Vec<_> = store.tasks().to_vec();
    assert_eq!(store.clear_completed(), 0);
    assert_eq!(store.tasks(), after_once.as_slice());
    assert_eq!(store.tasks()[0].id, keep);

    store.add_task(task("another", "Work", "10:00")).unwrap();
    assert_eq!(store.set_all_done(), 2);
    assert_eq!(store.set_all_done(), 0);
    assert!(store.tasks().iter().all(|task| task.done));
    assert_eq!(store.clear_completed(), 2);
    assert!(store.tasks().is_empty());
}

#[test]
fn filter_by_category_preserves_insertion_order() {
    let mut store = TaskStore::with_categories(["Work", "Home"]).unwrap();
    let a = store.add_task(task("a", "Work", "09:00")).unwrap().id;
    let b = store.add_task(task("b", "Home", "07:00")).unwrap().id;
    let c = store.add_task(task("c", "Work", "06:00")).unwrap().id;

    let all: Vec<_> = store
        .filter_by_category(&CategoryFilter::parse("すべて"))
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(all, vec![a, b, c]);
    assert_eq!(
        store.filter_by_category(&CategoryFilter::All).len(),
        store.tasks().len()
    );

    let work: Vec<_> = store
        .filter_by_category(&CategoryFilter::parse("Work"))
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(work, vec![a, c]);
    assert!(store
        .filter_by_category(&CategoryFilter::parse("Other"))
        .is_empty());
}

#[test]
fn memo_and_image_reference_are_kept_on_task() {
    let mut store = TaskStore::with_default_categories();
    let mut request = NewTask::new("buy milk", Priority::Low, date(2024, 1, 2), "18:30", "その他");
    request.memo = Some("low fat".to_string());
    request.image = Some(ImageRef::new("uploads/milk.png"));

    let created = store.add_task(request).unwrap();
    assert_eq!(created.memo.as_deref(), Some("low fat"));
    assert_eq!(created.image.as_ref().map(ImageRef::as_str), Some("uploads/milk.png"));
    assert_eq!(created.priority, Priority::Low);
}

#[test]
fn task_serializes_deadline_and_priority() {
    let mut store = TaskStore::with_categories(["Work"]).unwrap();
    let created = store.add_task(task("a", "Work", "09:05")).unwrap();
    let json = serde_json::to_value(created).unwrap();
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["deadline"], "2024-06-01T09:05:00");
    assert_eq!(json["done"], false);
}
