//! The work-session clock.
//!
//! Keeps `accumulated` (closed sessions, as confirmed by the server) apart
//! from the running session, which is always computed live from its start
//! instant. Server calls are split in two halves (`begin_*` / `finish_*`) so
//! that the response of a request can arrive after other things happened;
//! every request captures the clock epoch and its response is discarded
//! when the epoch or the context moved on in the meantime.

use crate::api::AttendanceApi;
use crate::core::notify::StatusBus;
use crate::core::ticker::{Scheduler, TickHandle};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, CheckInReceipt, CheckOutReceipt};
use crate::models::context::ContextId;
use crate::models::status::WorkStatus;
use crate::models::work_session::{ClockPhase, SessionMarker, WorkSession};
use crate::store::KeyValueStore;
use crate::utils::time::{format_elapsed, seconds_between};
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSettings {
    pub tick_interval: Duration,
    /// Markers older than this are ignored on reload.
    pub marker_max_age: chrono::Duration,
    /// Largest accepted distance between a marker and the server's start time.
    pub marker_tolerance: chrono::Duration,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            marker_max_age: chrono::Duration::hours(24),
            marker_tolerance: chrono::Duration::minutes(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Load,
    CheckIn,
    CheckOut,
}

/// Token for a server request that has been issued but not answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOp {
    pub id: u64,
    pub kind: OpKind,
    pub context: ContextId,
    epoch: u64,
}

/// What the clock did with a server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The response belonged to a session, context or mount that is gone.
    Discarded,
}

pub struct WorkSessionClock<K: KeyValueStore, S: Scheduler> {
    context: ContextId,
    store: K,
    scheduler: S,
    settings: ClockSettings,
    bus: StatusBus,

    accumulated: u64,
    phase: ClockPhase,
    initialized: bool,
    mounted: bool,

    epoch: u64,
    next_op: u64,
    ticker: Option<TickHandle>,
    display: String,
}

impl<K: KeyValueStore, S: Scheduler> WorkSessionClock<K, S> {
    pub fn new(context: ContextId, store: K, scheduler: S, settings: ClockSettings) -> Self {
        Self {
            context,
            store,
            scheduler,
            settings,
            bus: StatusBus::new(),
            accumulated: 0,
            phase: ClockPhase::Idle,
            initialized: false,
            mounted: true,
            epoch: 0,
            next_op: 0,
            ticker: None,
            display: format_elapsed(0),
        }
    }

    /// Publish status changes on a shared bus instead of a private one.
    pub fn with_bus(mut self, bus: StatusBus) -> Self {
        self.bus = bus;
        self
    }

    // ------------------------------------------------
    // Accessors
    // ------------------------------------------------

    pub fn context(&self) -> &ContextId {
        &self.context
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn accumulated_seconds(&self) -> u64 {
        self.accumulated
    }

    /// Last rendered value.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn bus(&self) -> &StatusBus {
        &self.bus
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn into_store(self) -> K {
        let Self { store, .. } = self;
        store
    }

    pub fn snapshot(&self) -> WorkSession {
        WorkSession {
            context: self.context.clone(),
            accumulated_seconds: self.accumulated,
            is_active: self.phase.is_active(),
            active_session_start: self.phase.started_at(),
        }
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        match self.phase {
            ClockPhase::Idle => self.accumulated,
            ClockPhase::Running { started_at } => {
                self.accumulated
                    .saturating_add(seconds_between(started_at, now))
            }
            ClockPhase::Frozen { frozen_seconds, .. } => frozen_seconds,
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> WorkStatus {
        WorkStatus {
            total_seconds: self.elapsed_seconds(now),
            is_active: self.phase.is_active(),
        }
    }

    // ------------------------------------------------
    // Initialization
    // ------------------------------------------------

    /// Seed local state from today's server record (`None` = no record yet).
    pub fn initialize(&mut self, record: Option<AttendanceRecord>, now: DateTime<Utc>) -> AppResult<()> {
        self.ensure_mounted()?;
        if self.initialized {
            return Err(AppError::AlreadyInitialized(self.context.to_string()));
        }

        self.accumulated = record
            .as_ref()
            .and_then(AttendanceRecord::accumulated_total)
            .unwrap_or(0);

        let result = match record {
            Some(r) if r.is_active => {
                let server_start = r.active_session_start_time.filter(|s| *s <= now);
                match self.usable_marker(now, server_start) {
                    Some(marker) => {
                        self.phase = ClockPhase::Running {
                            started_at: marker.started_at,
                        };
                        Ok(())
                    }
                    None => {
                        let started_at = server_start.unwrap_or(now);
                        self.phase = ClockPhase::Running { started_at };
                        self.write_marker(started_at)
                    }
                }
            }
            _ => {
                self.phase = ClockPhase::Idle;
                self.clear_marker()
            }
        };

        self.initialized = true;
        if self.phase.is_active() {
            self.start_ticker()?;
        } else {
            self.stop_ticker();
        }
        self.refresh(now);
        self.publish(now);
        result
    }

    /// Issue today's fetch. Complete it with [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self) -> AppResult<PendingOp> {
        self.ensure_mounted()?;
        if self.initialized {
            return Err(AppError::AlreadyInitialized(self.context.to_string()));
        }
        Ok(self.new_op(OpKind::Load))
    }

    /// A failed fetch leaves the clock uninitialized so the load can be retried.
    pub fn finish_load(
        &mut self,
        op: PendingOp,
        result: AppResult<Option<AttendanceRecord>>,
        now: DateTime<Utc>,
    ) -> AppResult<Completion> {
        if op.kind != OpKind::Load || !self.is_current(&op) || self.initialized {
            return Ok(Completion::Discarded);
        }
        let record = result?;
        self.initialize(record, now)?;
        Ok(Completion::Applied)
    }

    pub fn load<A: AttendanceApi>(&mut self, api: &mut A, now: DateTime<Utc>) -> AppResult<()> {
        let op = self.begin_load()?;
        let result = api.fetch_today(&op.context);
        self.finish_load(op, result, now).map(|_| ())
    }

    // ------------------------------------------------
    // Ticking
    // ------------------------------------------------

    /// Recompute the display for `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> &str {
        self.refresh(now);
        &self.display
    }

    /// Block until the next tick is due. `false` when not ticking or on timeout.
    pub fn wait_tick(&self, timeout: Duration) -> bool {
        match &self.ticker {
            Some(ticker) => ticker.wait(timeout),
            None => false,
        }
    }

    // ------------------------------------------------
    // Check-in
    // ------------------------------------------------

    /// Optimistically open a session at `now`.
    pub fn begin_check_in(&mut self, now: DateTime<Utc>) -> AppResult<PendingOp> {
        self.ensure_mounted()?;
        if !self.initialized {
            return Err(AppError::NotInitialized(self.context.to_string()));
        }
        if self.phase.is_active() {
            return Err(AppError::AlreadyActive(self.context.to_string()));
        }

        self.epoch += 1;
        self.phase = ClockPhase::Running { started_at: now };

        if let Err(e) = self.write_marker(now).and_then(|_| self.start_ticker()) {
            self.roll_back_check_in(now);
            return Err(e);
        }

        self.refresh(now);
        self.publish(now);
        Ok(self.new_op(OpKind::CheckIn))
    }

    /// Apply the server's answer to a check-in. The local start instant is
    /// kept on success; a failure rolls the clock back and is returned.
    pub fn finish_check_in(
        &mut self,
        op: PendingOp,
        result: AppResult<CheckInReceipt>,
        now: DateTime<Utc>,
    ) -> AppResult<Completion> {
        if op.kind != OpKind::CheckIn || !self.is_current(&op) {
            return Ok(Completion::Discarded);
        }

        match result {
            Ok(_) => Ok(Completion::Applied),
            Err(e) => {
                self.roll_back_check_in(now);
                Err(e)
            }
        }
    }

    pub fn check_in<A: AttendanceApi>(&mut self, api: &mut A, now: DateTime<Utc>) -> AppResult<()> {
        let op = self.begin_check_in(now)?;
        let result = api.check_in(&op.context);
        self.finish_check_in(op, result, now).map(|_| ())
    }

    // ------------------------------------------------
    // Check-out
    // ------------------------------------------------

    /// Freeze the display and stop ticking. Retrying a failed check-out keeps
    /// the value frozen by the first attempt.
    pub fn begin_check_out(&mut self, now: DateTime<Utc>) -> AppResult<PendingOp> {
        self.ensure_mounted()?;

        match self.phase {
            ClockPhase::Idle => return Err(AppError::NotActive(self.context.to_string())),
            ClockPhase::Running { started_at } => {
                self.phase = ClockPhase::Frozen {
                    started_at,
                    frozen_seconds: self
                        .accumulated
                        .saturating_add(seconds_between(started_at, now)),
                };
            }
            ClockPhase::Frozen { .. } => {}
        }

        self.stop_ticker();
        self.refresh(now);
        self.publish(now);
        Ok(self.new_op(OpKind::CheckOut))
    }

    /// Adopt the server total (or the frozen value when the server sent none).
    /// A failure leaves the session frozen, pending reconciliation.
    pub fn finish_check_out(
        &mut self,
        op: PendingOp,
        result: AppResult<CheckOutReceipt>,
        now: DateTime<Utc>,
    ) -> AppResult<Completion> {
        if op.kind != OpKind::CheckOut || !self.is_current(&op) {
            return Ok(Completion::Discarded);
        }
        let ClockPhase::Frozen { frozen_seconds, .. } = self.phase else {
            return Ok(Completion::Discarded);
        };

        let receipt = result?;

        self.accumulated = receipt.accumulated_total().unwrap_or(frozen_seconds);
        self.phase = ClockPhase::Idle;
        self.epoch += 1;
        self.refresh(now);
        self.publish(now);

        self.clear_marker()?;
        Ok(Completion::Applied)
    }

    pub fn check_out<A: AttendanceApi>(&mut self, api: &mut A, now: DateTime<Utc>) -> AppResult<()> {
        let op = self.begin_check_out(now)?;
        let result = api.check_out(&op.context);
        self.finish_check_out(op, result, now).map(|_| ())
    }

    // ------------------------------------------------
    // Lifecycle
    // ------------------------------------------------

    /// Drop everything tied to the current context and start over, uninitialized,
    /// for `context`. Responses for the old context are discarded from now on.
    pub fn switch_context(&mut self, context: ContextId) -> AppResult<()> {
        self.ensure_mounted()?;
        self.stop_ticker();
        self.epoch += 1;
        self.context = context;
        self.accumulated = 0;
        self.phase = ClockPhase::Idle;
        self.initialized = false;
        self.display = format_elapsed(0);
        self.bus.publish(WorkStatus {
            total_seconds: 0,
            is_active: false,
        });
        Ok(())
    }

    /// Stop ticking. Every later completion is a no-op.
    pub fn unmount(&mut self) {
        self.stop_ticker();
        self.mounted = false;
        self.epoch += 1;
    }

    // ------------------------------------------------
    // Internals
    // ------------------------------------------------

    fn ensure_mounted(&self) -> AppResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(AppError::Unmounted)
        }
    }

    fn new_op(&mut self, kind: OpKind) -> PendingOp {
        self.next_op += 1;
        PendingOp {
            id: self.next_op,
            kind,
            context: self.context.clone(),
            epoch: self.epoch,
        }
    }

    fn is_current(&self, op: &PendingOp) -> bool {
        self.mounted && op.epoch == self.epoch && op.context == self.context
    }

    fn roll_back_check_in(&mut self, now: DateTime<Utc>) {
        self.stop_ticker();
        self.phase = ClockPhase::Idle;
        self.epoch += 1;
        // a marker left behind is cleared by the next initialize, since the
        // server reports no open session
        let _ = self.clear_marker();
        self.refresh(now);
        self.publish(now);
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        self.display = format_elapsed(self.elapsed_seconds(now));
    }

    fn publish(&self, now: DateTime<Utc>) {
        self.bus.publish(self.status(now));
    }

    fn start_ticker(&mut self) -> AppResult<()> {
        if self.ticker.is_none() {
            self.ticker = Some(self.scheduler.start(self.settings.tick_interval)?);
        }
        Ok(())
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    /// Marker for this context that can anchor the running session, if any.
    /// Unreadable markers count as absent.
    fn usable_marker(
        &self,
        now: DateTime<Utc>,
        server_start: Option<DateTime<Utc>>,
    ) -> Option<SessionMarker> {
        let raw = self.store.get(&self.context.marker_key()).ok().flatten()?;
        let marker: SessionMarker = serde_json::from_str(&raw).ok()?;

        if marker.context != self.context
            || marker.started_at > now
            || now - marker.started_at > self.settings.marker_max_age
        {
            return None;
        }
        if let Some(server) = server_start
            && (server - marker.started_at).abs() > self.settings.marker_tolerance
        {
            return None;
        }
        Some(marker)
    }

    fn write_marker(&mut self, started_at: DateTime<Utc>) -> AppResult<()> {
        let marker = SessionMarker {
            context: self.context.clone(),
            started_at,
        };
        let json = serde_json::to_string(&marker)?;
        self.store.set(&self.context.marker_key(), &json)
    }

    fn clear_marker(&mut self) -> AppResult<()> {
        self.store.remove(&self.context.marker_key())
    }
}
