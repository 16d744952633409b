use daybook_core::db::open_db_in_memory;
use daybook_core::model::entity::{EntityKind, ValidationError};
use daybook_core::model::list::{ListDraft, ListPatch};
use daybook_core::model::note::{NoteDraft, NotePatch};
use daybook_core::model::palette::Swatch;
use daybook_core::model::tag::{TagDraft, TagPatch};
use daybook_core::model::task::{TaskDraft, TaskPatch, TaskType};
use daybook_core::repo::list_repo::SqliteListRepository;
use daybook_core::repo::note_repo::SqliteNoteRepository;
use daybook_core::repo::tag_repo::SqliteTagRepository;
use daybook_core::repo::task_repo::SqliteTaskRepository;
use daybook_core::repo::{RepoError, Repository};
use std::collections::HashSet;

#[test]
fn create_task_fills_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let task = repo
        .create(TaskDraft::new("  Standup  ", "2024-06-10").with_kind(TaskType::Work))
        .unwrap();

    assert!(task.id.starts_with("task_"));
    assert_eq!(task.title, "Standup");
    assert_eq!(task.description, "");
    assert_eq!(task.time, None);
    assert_eq!(task.kind, TaskType::Work);
    assert!(!task.completed);
    assert!(task.tags.is_empty());
    assert!(!task.created_at.is_empty());
    assert_eq!(repo.get(&task.id).unwrap(), Some(task));
}

#[test]
fn create_rejects_missing_required_fields_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let tasks = SqliteTaskRepository::new(&conn);

    let err = tasks.create(TaskDraft::new("   ", "2024-06-10")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField {
            kind: EntityKind::Task,
            field: "title"
        })
    ));
    let err = tasks.create(TaskDraft::new("No date", "")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField { field: "date", .. })
    ));
    let err = tasks.create(TaskDraft::new("Bad date", "10/06/2024")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidDate(_))
    ));
    assert!(tasks.list().unwrap().is_empty());

    let notes = SqliteNoteRepository::new(&conn);
    assert!(notes.create(NoteDraft::new("", "body")).is_err());
    let lists = SqliteListRepository::new(&conn);
    assert!(lists.create(ListDraft::new(" ")).is_err());
    let tags = SqliteTagRepository::new(&conn);
    assert!(tags.create(TagDraft::new("")).is_err());
}

#[test]
fn generated_ids_are_unique() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let ids: HashSet<String> = (0..50)
        .map(|i| {
            repo.create(TaskDraft::new(format!("Task {i}"), "2024-06-10"))
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn client_supplied_id_is_kept_and_duplicates_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);

    let mut draft = NoteDraft::new("Ideas", "");
    draft.id = Some("note_custom".to_string());
    let note = repo.create(draft.clone()).unwrap();
    assert_eq!(note.id, "note_custom");

    let err = repo.create(draft).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn partial_update_preserves_absent_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let task = repo
        .create(
            TaskDraft::new("Write report", "2024-06-10")
                .with_time("09:30")
                .with_kind(TaskType::Work)
                .with_tags(["tag_1"]),
        )
        .unwrap();

    let updated = repo.update(&task.id, &TaskPatch::completed(true)).unwrap();
    assert!(updated.completed);

    let reread = repo.get(&task.id).unwrap().unwrap();
    assert_eq!(reread.title, "Write report");
    assert_eq!(reread.date, "2024-06-10");
    assert_eq!(reread.time.as_deref(), Some("09:30"));
    assert_eq!(reread.kind, TaskType::Work);
    assert!(reread.has_tag("tag_1"));
    assert_eq!(reread.created_at, task.created_at);

    let cleared = repo
        .update(
            &task.id,
            &TaskPatch {
                time: Some(None),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(cleared.time, None);
    assert!(cleared.completed);
}

#[test]
fn update_missing_record_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let err = SqliteListRepository::new(&conn)
        .update("list_missing", &ListPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::List,
            ..
        }
    ));
}

#[test]
fn invalid_update_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let note = repo.create(NoteDraft::new("Keep", "me")).unwrap();

    let patch = NotePatch {
        content: Some("changed".to_string()),
        color: Some("#123456".to_string()),
        ..NotePatch::default()
    };
    assert!(repo.update(&note.id, &patch).is_err());
    assert_eq!(repo.get(&note.id).unwrap(), Some(note));
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let task = repo.create(TaskDraft::new("Once", "2024-06-10")).unwrap();

    assert!(repo.delete(&task.id).unwrap());
    assert!(!repo.delete(&task.id).unwrap());
    assert_eq!(repo.get(&task.id).unwrap(), None);
}

#[test]
fn note_defaults_to_yellow_and_normalizes_color() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);

    let plain = repo.create(NoteDraft::new("Plain", "")).unwrap();
    assert_eq!(plain.color, Swatch::Yellow.hex());

    let mut draft = NoteDraft::new("Pink", "");
    draft.color = Some("#ff1493".to_string());
    assert_eq!(repo.create(draft).unwrap().color, "#FF1493");
}

#[test]
fn list_task_ids_follow_task_list_id() {
    let conn = open_db_in_memory().unwrap();
    let lists = SqliteListRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);

    let groceries = lists
        .create(ListDraft::new("Groceries").with_color(Swatch::Green))
        .unwrap();
    assert_eq!(groceries.color, "#4CAF50");
    assert!(groceries.task_ids.is_empty());

    let milk = tasks
        .create(TaskDraft::new("Buy milk", "2024-06-10").in_list(groceries.id.clone()))
        .unwrap();
    let bread = tasks
        .create(TaskDraft::new("Buy bread", "2024-06-10").in_list(groceries.id.clone()))
        .unwrap();
    tasks.create(TaskDraft::new("Loose", "2024-06-10")).unwrap();

    let reread = lists.get(&groceries.id).unwrap().unwrap();
    assert_eq!(reread.task_ids, vec![milk.id.clone(), bread.id.clone()]);

    tasks
        .update(
            &milk.id,
            &TaskPatch {
                list_id: Some(None),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    let all = lists.list().unwrap();
    assert_eq!(all[0].task_ids, vec![bread.id.clone()]);

    lists.delete(&groceries.id).unwrap();
    let orphan = tasks.get(&bread.id).unwrap().unwrap();
    assert_eq!(orphan.list_id.as_deref(), Some(groceries.id.as_str()));
}

#[test]
fn deleting_a_tag_keeps_references() {
    let conn = open_db_in_memory().unwrap();
    let tags = SqliteTagRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let tag = tags.create(TagDraft::new("errands")).unwrap();
    let task = tasks
        .create(TaskDraft::new("Post office", "2024-06-10").with_tags([tag.id.clone()]))
        .unwrap();
    let note = notes
        .create(NoteDraft::new("Stamps", "").with_tags([tag.id.clone()]))
        .unwrap();

    assert!(tags.delete(&tag.id).unwrap());
    assert!(tasks.get(&task.id).unwrap().unwrap().has_tag(&tag.id));
    assert!(notes.get(&note.id).unwrap().unwrap().has_tag(&tag.id));
}

#[test]
fn tag_names_are_unique_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let tags = SqliteTagRepository::new(&conn);

    let home = tags.create(TagDraft::new("Home")).unwrap();
    let err = tags.create(TagDraft::new("home")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::DuplicateTagName(_))
    ));
    assert_eq!(tags.find_by_name("HOME").unwrap(), Some(home.clone()));

    let work = tags.create(TagDraft::new("work")).unwrap();
    let rename = TagPatch {
        name: Some("HOME".to_string()),
    };
    assert!(tags.update(&work.id, &rename).is_err());
    let renamed = tags
        .update(
            &home.id,
            &TagPatch {
                name: Some("House".to_string()),
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "House");
}

#[test]
fn list_where_filters_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    repo.create(TaskDraft::new("Work", "2024-06-10").with_kind(TaskType::Work))
        .unwrap();
    repo.create(TaskDraft::new("Home", "2024-06-10")).unwrap();

    let work = repo.list_where(|task| task.kind == TaskType::Work).unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].title, "Work");
}
