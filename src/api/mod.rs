//! Contract of the attendance backend consumed by the clock.

use crate::errors::AppResult;
use crate::models::attendance::{AttendanceRecord, CheckInReceipt, CheckOutReceipt};
use crate::models::context::ContextId;

pub trait AttendanceApi {
    /// Today's record for `context`. `Ok(None)` means no record yet, which is
    /// not an error.
    fn fetch_today(&mut self, context: &ContextId) -> AppResult<Option<AttendanceRecord>>;

    fn check_in(&mut self, context: &ContextId) -> AppResult<CheckInReceipt>;

    /// Close the open session. The returned total may be absent.
    fn check_out(&mut self, context: &ContextId) -> AppResult<CheckOutReceipt>;
}
