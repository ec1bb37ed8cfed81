//! Pets schema migrations, tracked through `PRAGMA user_version`.
//!
//! # Invariants
//! - Versions in [`MIGRATIONS`] start at 1 and increase by one.
//! - A run is all-or-nothing: a failing script leaves `user_version` and
//!   the schema exactly as they were before the run.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this binary migrates databases to.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the pets schema on `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this binary.
/// - `MigrationFailed` naming the first script that did not apply.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_migrations(conn, MIGRATIONS)
}

fn run_migrations(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let target = migrations.last().map_or(0, |migration| migration.version);

    if from > target {
        error!(
            "event=db_migrate module=db status=error error_code=schema_too_new db_version={from} latest_supported={target}"
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: target,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let version = migration.version;
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| {
                error!(
                    "event=db_migrate module=db status=error error_code=migration_failed version={version} error={source}"
                );
                DbError::MigrationFailed { version, source }
            })?;
        info!("event=db_migrate module=db status=applied version={version}");
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={target}");
    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
