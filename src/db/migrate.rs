use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Applied migrations are recorded in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_attendance_events",
        description: "Created attendance_events table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance_events (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            context     TEXT NOT NULL,
            date        TEXT NOT NULL,
            ts          TEXT NOT NULL,
            kind        TEXT NOT NULL CHECK(kind IN ('in','out')),
            source      TEXT NOT NULL DEFAULT 'cli',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_ctx_date ON attendance_events(context, date, ts);
        "#,
    },
    Migration {
        version: "20250301_0002_create_kv_store",
        description: "Created kv_store table for session markers",
        sql: r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [migration.version, migration.description],
    )?;
    tx.commit()?;

    success(format!("Migration applied: {}", migration.version));
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
///
/// Returns how many migrations were applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if !is_applied(conn, migration.version)? {
            apply(conn, migration)?;
            applied += 1;
        }
    }

    Ok(applied)
}
