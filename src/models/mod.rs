pub mod attendance;
pub mod context;
pub mod event;
pub mod event_type;
pub mod status;
pub mod work_session;
