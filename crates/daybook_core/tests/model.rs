use daybook_core::model::entity::{Entity, ValidationError};
use daybook_core::model::list::{List, ListDraft, ListPatch};
use daybook_core::model::note::{Note, NoteDraft, NotePatch};
use daybook_core::model::palette::{color_name, Swatch};
use daybook_core::model::task::{Task, TaskDraft, TaskPatch, TaskType};
use serde_json::json;

#[test]
fn task_reads_loosely_typed_rows() {
    let task: Task = serde_json::from_value(json!({
        "id": "task_1",
        "title": "Imported",
        "date": "2024-06-10",
        "time": "",
        "type": "errand",
        "completed": 1,
        "createdAt": "2024-06-01T08:00:00.000Z",
        "listId": ""
    }))
    .unwrap();

    assert_eq!(task.time, None);
    assert_eq!(task.kind, TaskType::Unknown);
    assert!(task.completed);
    assert_eq!(task.list_id, None);
    assert!(task.tags.is_empty());
    assert_eq!(task.kind.badge_color(), "#666");
}

#[test]
fn task_serializes_in_client_shape() {
    let task = Task::from_draft(
        TaskDraft::new("Standup", "2024-06-10")
            .with_kind(TaskType::Work)
            .with_time("09:30:00")
            .with_tags(["tag_b", "tag_a"]),
    )
    .unwrap();
    let value = serde_json::to_value(&task).unwrap();

    assert_eq!(value["type"], json!("work"));
    assert_eq!(value["time"], json!("09:30"));
    assert_eq!(value["completed"], json!(false));
    assert_eq!(value["tags"], json!(["tag_a", "tag_b"]));
    assert_eq!(value["listId"], json!(null));
    assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn unknown_type_is_rejected_on_write() {
    let draft: TaskDraft = serde_json::from_value(json!({
        "title": "Mystery",
        "date": "2024-06-10",
        "type": "chores"
    }))
    .unwrap();
    assert_eq!(Task::from_draft(draft), Err(ValidationError::InvalidType));

    let mut task = Task::from_draft(TaskDraft::new("Known", "2024-06-10")).unwrap();
    let patch = TaskPatch {
        kind: Some(TaskType::Unknown),
        ..TaskPatch::default()
    };
    assert_eq!(task.apply_patch(&patch), Err(ValidationError::InvalidType));
    assert_eq!(task.kind, TaskType::Personal);
}

#[test]
fn patch_distinguishes_absent_from_null() {
    let absent: TaskPatch = serde_json::from_value(json!({ "title": "x" })).unwrap();
    assert_eq!(absent.time, None);
    assert_eq!(absent.list_id, None);

    let cleared: TaskPatch =
        serde_json::from_value(json!({ "time": null, "listId": null })).unwrap();
    assert_eq!(cleared.time, Some(None));
    assert_eq!(cleared.list_id, Some(None));
}

#[test]
fn tasks_sort_by_date_then_time() {
    let make = |title: &str, date: &str, time: Option<&str>| {
        let mut draft = TaskDraft::new(title, date);
        if let Some(time) = time {
            draft = draft.with_time(time);
        }
        Task::from_draft(draft).unwrap()
    };
    let mut tasks = vec![
        make("evening", "2024-06-10", Some("18:00")),
        make("next day", "2024-06-11", None),
        make("all day", "2024-06-10", None),
        make("morning", "2024-06-10", Some("08:00")),
    ];
    tasks.sort_by(Task::listing_order);
    let titles: Vec<_> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, ["all day", "morning", "evening", "next day"]);
}

#[test]
fn notes_and_lists_sort_newest_first() {
    let older = Note::from_draft(NoteDraft {
        created_at: Some("2024-06-01T08:00:00Z".to_string()),
        ..NoteDraft::new("older", "")
    })
    .unwrap();
    let newer = Note::from_draft(NoteDraft {
        created_at: Some("2024-06-02T08:00:00Z".to_string()),
        ..NoteDraft::new("newer", "")
    })
    .unwrap();
    let mut notes = vec![older, newer];
    notes.sort_by(Note::listing_order);
    assert_eq!(notes[0].title, "newer");

    let list: List = serde_json::from_value(json!({
        "id": "list_1",
        "name": "Groceries",
        "color": "#4CAF50"
    }))
    .unwrap();
    assert!(list.task_ids.is_empty());
    assert_eq!(color_name(&list.color), "Green");
}

#[test]
fn palette_lookups() {
    assert_eq!(Swatch::from_hex("#ff5252"), Some(Swatch::Red));
    assert_eq!(color_name("#123456"), "Custom");
    assert_eq!(Swatch::ALL.len(), 7);
    assert_eq!(TaskType::Work.emoji(), TaskType::parse(" WORK ").emoji());
    assert_ne!(TaskType::Unknown.emoji(), TaskType::Personal.emoji());
}

#[test]
fn rejected_patch_leaves_every_field_untouched() {
    let mut note = Note::from_draft(NoteDraft::new("Shopping", "eggs")).unwrap();
    let before = note.clone();
    let patch = NotePatch {
        title: Some("Renamed".to_string()),
        content: Some("milk".to_string()),
        color: Some("#123456".to_string()),
        ..NotePatch::default()
    };
    assert!(note.apply_patch(&patch).is_err());
    assert_eq!(note, before);

    let mut list = List::from_draft(ListDraft::new("Errands")).unwrap();
    let before = list.clone();
    let patch = ListPatch {
        name: Some("Chores".to_string()),
        color: Some("not-a-color".to_string()),
    };
    assert!(list.apply_patch(&patch).is_err());
    assert_eq!(list, before);

    let patch = ListPatch {
        name: Some("Chores".to_string()),
        ..ListPatch::default()
    };
    list.apply_patch(&patch).unwrap();
    assert_eq!(list.name, "Chores");
    assert_eq!(list.color, before.color);
}
