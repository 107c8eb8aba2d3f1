//! Local attendance backend: check-ins and check-outs stored as events,
//! paired into sessions per context and local day.
//!
//! A session still open from the previous day is carried into today, as long
//! as it started less than [`CARRY_OVER_MAX_HOURS`] ago; its whole duration counts
//! toward the day it is closed on.

use crate::api::AttendanceApi;
use crate::core::timeline::build_timeline;
use crate::db::log::ttlog;
use crate::db::queries::{insert_event, load_events_for_day, load_last_event_before};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, CheckInReceipt, CheckOutReceipt};
use crate::models::context::ContextId;
use crate::models::event::AttendanceEvent;
use crate::models::event_type::EventType;
use crate::utils::time::format_elapsed;
use chrono::{DateTime, Duration, Local, Utc};
use rusqlite::Connection;

/// Open sessions older than this many hours are abandoned, not carried over.
pub const CARRY_OVER_MAX_HOURS: i64 = 24;

type NowFn<'a> = Box<dyn Fn() -> DateTime<Utc> + 'a>;

pub struct SqliteAttendance<'a> {
    conn: &'a Connection,
    now: NowFn<'a>,
}

impl<'a> SqliteAttendance<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            now: Box::new(Utc::now),
        }
    }

    /// Use a custom time source instead of the system clock.
    pub fn with_clock<F>(conn: &'a Connection, now: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + 'a,
    {
        Self {
            conn,
            now: Box::new(now),
        }
    }

    fn today_events(
        &self,
        context: &ContextId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AttendanceEvent>> {
        let today = now.with_timezone(&Local).date_naive();
        let mut events = load_events_for_day(self.conn, context, &today)?;

        if let Some(open) = load_last_event_before(self.conn, context, &today)?
            && open.kind.is_in()
            && open.ts <= now
            && now - open.ts < Duration::hours(CARRY_OVER_MAX_HOURS)
        {
            events.insert(0, open);
        }
        Ok(events)
    }
}

impl AttendanceApi for SqliteAttendance<'_> {
    fn fetch_today(&mut self, context: &ContextId) -> AppResult<Option<AttendanceRecord>> {
        let now = (self.now)();
        let events = self.today_events(context, now)?;
        if events.is_empty() {
            return Ok(None);
        }

        let timeline = build_timeline(&events);
        let open = timeline.open_session().map(|s| s.start);

        Ok(Some(AttendanceRecord::from_seconds(
            timeline.closed_seconds,
            open.is_some(),
            open,
        )))
    }

    fn check_in(&mut self, context: &ContextId) -> AppResult<CheckInReceipt> {
        let now = (self.now)();
        let timeline = build_timeline(&self.today_events(context, now)?);
        if timeline.open_session().is_some() {
            return Err(AppError::AlreadyActive(context.to_string()));
        }

        insert_event(
            self.conn,
            &AttendanceEvent::new(context.clone(), now, EventType::In),
        )?;
        ttlog(
            self.conn,
            "check_in",
            context.as_str(),
            &format!("Session opened at {}", now.to_rfc3339()),
        )?;

        Ok(CheckInReceipt {
            active_session_start_time: Some(now),
        })
    }

    fn check_out(&mut self, context: &ContextId) -> AppResult<CheckOutReceipt> {
        let now = (self.now)();
        let mut events = self.today_events(context, now)?;
        if build_timeline(&events).open_session().is_none() {
            return Err(AppError::NotActive(context.to_string()));
        }

        let mut out = AttendanceEvent::new(context.clone(), now, EventType::Out);
        out.id = insert_event(self.conn, &out)?;
        events.push(out);

        let total = build_timeline(&events).closed_seconds;
        ttlog(
            self.conn,
            "check_out",
            context.as_str(),
            &format!("Session closed, today's total {}", format_elapsed(total)),
        )?;

        Ok(CheckOutReceipt::from_seconds(total))
    }
}
