use daybook_core::db::migrations::latest_version;
use daybook_core::db::{open_db, open_db_in_memory, DbError};
use daybook_core::model::task::TaskDraft;
use daybook_core::repo::task_repo::SqliteTaskRepository;
use daybook_core::repo::Repository;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["tasks", "notes", "lists", "tags", "task_tags", "note_tags"] {
        assert_table_exists(&conn, table);
    }
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daybook.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "tasks");
}

#[test]
fn rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daybook.sqlite3");

    let conn = open_db(&path).unwrap();
    let task = SqliteTaskRepository::new(&conn)
        .create(TaskDraft::new("Standup", "2024-06-10"))
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let reread = SqliteTaskRepository::new(&conn).get(&task.id).unwrap();
    assert_eq!(reread, Some(task));
}

#[test]
fn deleting_a_task_cascades_its_tag_links_only() {
    let conn = open_db_in_memory().unwrap();
    let tasks = SqliteTaskRepository::new(&conn);
    let task = tasks
        .create(TaskDraft::new("Tagged", "2024-06-10").with_tags(["tag_a", "tag_b"]))
        .unwrap();
    assert_eq!(count_rows(&conn, "task_tags"), 2);

    tasks.delete(&task.id).unwrap();
    assert_eq!(count_rows(&conn, "task_tags"), 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}
