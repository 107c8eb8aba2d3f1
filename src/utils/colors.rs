/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Running → green, pending check-out → yellow, idle → grey.
pub fn color_for_phase(phase: &str) -> &'static str {
    match phase {
        "running" => GREEN,
        "idle" => GREY,
        _ => YELLOW,
    }
}
