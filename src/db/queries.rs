use crate::errors::{AppError, AppResult};
use crate::models::context::ContextId;
use crate::models::event::AttendanceEvent;
use crate::models::event_type::EventType;
use crate::utils::time::parse_instant;
use chrono::NaiveDate;
use rusqlite::params;
use rusqlite::{Connection, Result, Row};

fn conversion_error(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

pub fn map_row(row: &Row) -> Result<AttendanceEvent> {
    let ctx_str: String = row.get("context")?;
    let context = ContextId::new(&ctx_str).map_err(conversion_error)?;

    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidTime(date_str.clone())))?;

    let ts_str: String = row.get("ts")?;
    let ts = parse_instant(&ts_str).map_err(conversion_error)?;

    let kind_str: String = row.get("kind")?;
    let kind = EventType::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(AppError::InvalidTime(format!("Invalid kind: {}", kind_str)))
    })?;

    Ok(AttendanceEvent {
        id: row.get("id")?,
        context,
        date,
        ts,
        kind,
        source: row.get("source")?,
        created_at: row.get("created_at")?,
    })
}

pub fn load_events_for_day(
    conn: &Connection,
    context: &ContextId,
    date: &NaiveDate,
) -> AppResult<Vec<AttendanceEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, context, date, ts, kind, source, created_at
         FROM attendance_events
         WHERE context = ?1 AND date = ?2
         ORDER BY ts ASC, id ASC",
    )?;

    let date_str = date.format("%Y-%m-%d").to_string();
    let rows = stmt.query_map(params![context.as_str(), date_str], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Most recent event of `context` dated before `date`, if any.
pub fn load_last_event_before(
    conn: &Connection,
    context: &ContextId,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, context, date, ts, kind, source, created_at
         FROM attendance_events
         WHERE context = ?1 AND date < ?2
         ORDER BY ts DESC, id DESC
         LIMIT 1",
    )?;

    let date_str = date.format("%Y-%m-%d").to_string();
    let mut rows = stmt.query_map(params![context.as_str(), date_str], map_row)?;
    Ok(rows.next().transpose()?)
}

pub fn insert_event(conn: &Connection, ev: &AttendanceEvent) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance_events (context, date, ts, kind, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            ev.context.as_str(),
            ev.date_str(),
            ev.ts.to_rfc3339(),
            ev.kind.to_db_str(),
            ev.source,
            ev.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Distinct contexts with at least one event, alphabetically.
pub fn load_contexts(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT context FROM attendance_events ORDER BY context ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
