use petstore_core::db::migrations::latest_version;
use petstore_core::db::{open_db, open_db_in_memory, open_db_with_timeout, DbError};
use std::time::Duration;
use petstore_core::{DatabaseLocation, StoreConfig};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "pets");
}

#[test]
fn pets_table_uses_expected_column_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO pets (name) VALUES ('Tom');", [])
        .unwrap();

    let (breed, gender, weight): (String, i64, i64) = conn
        .query_row("SELECT breed, gender, weight FROM pets;", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .unwrap();
    assert_eq!(breed, "");
    assert_eq!(gender, 0);
    assert_eq!(weight, 0);
}

#[test]
fn opened_connections_carry_busy_timeout_and_default_pragmas() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_with_timeout(dir.path().join("pets.db"), Duration::from_millis(750)).unwrap();

    let busy_timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(busy_timeout, 750);
    assert_eq!(foreign_keys, 0);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pets.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO pets (name) VALUES ('Rex');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
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

#[test]
fn store_config_opens_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = StoreConfig::with_file(&path);
    assert_eq!(
        config.database,
        DatabaseLocation::File { path: path.clone() }
    );

    let conn = config.open_database().unwrap();
    assert_table_exists(&conn, "pets");
    assert!(path.exists());
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
