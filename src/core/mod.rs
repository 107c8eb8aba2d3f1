pub mod clock;
pub mod config;
pub mod log;
pub mod notify;
pub mod ticker;
pub mod timeline;
