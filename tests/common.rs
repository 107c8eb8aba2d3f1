#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rworkclock::api::AttendanceApi;
use rworkclock::core::clock::{ClockSettings, WorkSessionClock};
use rworkclock::core::ticker::ManualScheduler;
use rworkclock::errors::{AppError, AppResult};
use rworkclock::models::attendance::{AttendanceRecord, CheckInReceipt, CheckOutReceipt};
use rworkclock::models::context::ContextId;
use rworkclock::store::MemoryStore;
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rwc() -> Command {
    cargo_bin_cmd!("rworkclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rworkclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a fresh test DB through the CLI
pub fn init_test_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    rwc()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// Fixed reference instant: 2025-03-10 09:00:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

/// 10:00 local time on 2025-03-10, so that a few hours of events stay on one local day.
pub fn local_morning() -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2025, 3, 10, 10, 0, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn ctx(name: &str) -> ContextId {
    ContextId::new(name).unwrap()
}

pub type TestClock = WorkSessionClock<MemoryStore, ManualScheduler>;

pub fn clock_with(store: MemoryStore, scheduler: ManualScheduler) -> TestClock {
    WorkSessionClock::new(ctx("team-a"), store, scheduler, ClockSettings::default())
}

pub fn new_clock() -> (TestClock, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    (clock_with(MemoryStore::new(), scheduler.clone()), scheduler)
}

pub fn idle_record(seconds: u64) -> AttendanceRecord {
    AttendanceRecord::from_seconds(seconds, false, None)
}

/// Scripted attendance backend. Empty queues answer with a default success.
#[derive(Default)]
pub struct FakeApi {
    pub today: Option<AttendanceRecord>,
    pub fail_fetch: bool,
    pub check_in_results: VecDeque<AppResult<CheckInReceipt>>,
    pub check_out_results: VecDeque<AppResult<CheckOutReceipt>>,
    pub calls: Vec<String>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(record: AttendanceRecord) -> Self {
        Self {
            today: Some(record),
            ..Self::default()
        }
    }

    pub fn fail_next_check_in(&mut self) {
        self.check_in_results
            .push_back(Err(AppError::Api("connection reset".into())));
    }

    pub fn fail_next_check_out(&mut self) {
        self.check_out_results
            .push_back(Err(AppError::Api("gateway timeout".into())));
    }

    pub fn next_check_out_total(&mut self, seconds: u64) {
        self.check_out_results
            .push_back(Ok(CheckOutReceipt::from_seconds(seconds)));
    }
}

impl AttendanceApi for FakeApi {
    fn fetch_today(&mut self, context: &ContextId) -> AppResult<Option<AttendanceRecord>> {
        self.calls.push(format!("fetch:{}", context));
        if self.fail_fetch {
            return Err(AppError::Api("network unreachable".into()));
        }
        Ok(self.today.clone())
    }

    fn check_in(&mut self, context: &ContextId) -> AppResult<CheckInReceipt> {
        self.calls.push(format!("in:{}", context));
        self.check_in_results
            .pop_front()
            .unwrap_or_else(|| Ok(CheckInReceipt::default()))
    }

    fn check_out(&mut self, context: &ContextId) -> AppResult<CheckOutReceipt> {
        self.calls.push(format!("out:{}", context));
        self.check_out_results
            .pop_front()
            .unwrap_or_else(|| Ok(CheckOutReceipt::default()))
    }
}
