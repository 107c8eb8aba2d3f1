pub mod colors;
pub mod time;

pub use time::format_elapsed;
