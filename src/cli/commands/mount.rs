//! Mount a clock against the local database, the way every clock command does.

use crate::config::Config;
use crate::core::clock::WorkSessionClock;
use crate::core::ticker::ThreadScheduler;
use crate::db::attendance::SqliteAttendance;
use crate::db::kv::SqliteStore;
use crate::errors::AppResult;
use crate::models::context::ContextId;
use chrono::Utc;
use rusqlite::Connection;

pub type CliClock<'a> = WorkSessionClock<SqliteStore<'a>, ThreadScheduler>;

pub fn new_clock<'a>(conn: &'a Connection, cfg: &Config) -> AppResult<CliClock<'a>> {
    let context = ContextId::new(&cfg.context)?;
    Ok(WorkSessionClock::new(
        context,
        SqliteStore::new(conn),
        ThreadScheduler,
        cfg.clock_settings(),
    ))
}

/// Fresh clock, already loaded from today's record.
pub fn mount<'a>(
    conn: &'a Connection,
    cfg: &Config,
) -> AppResult<(CliClock<'a>, SqliteAttendance<'a>)> {
    let mut clock = new_clock(conn, cfg)?;
    let mut api = SqliteAttendance::new(conn);
    clock.load(&mut api, Utc::now())?;
    Ok((clock, api))
}
