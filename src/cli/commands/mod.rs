pub mod clock;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod mount;
pub mod status;
pub mod watch;
