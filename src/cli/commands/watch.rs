use crate::cli::commands::mount::new_clock;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::attendance::SqliteAttendance;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::format_elapsed;
use chrono::Utc;
use std::io::{self, Write};
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Watch { ticks } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open_initialized(&cfg.database)?;
    let mut clock = new_clock(&pool.conn, cfg)?;
    let mut api = SqliteAttendance::new(&pool.conn);

    let subscription = clock.bus().subscribe(|status| {
        let state = if status.is_active { "active" } else { "idle" };
        info(format!(
            "Work status: {} ({})",
            state,
            format_elapsed(status.total_seconds)
        ));
    });

    clock.load(&mut api, Utc::now())?;

    if !clock.is_active() {
        println!("⏱  {}", clock.display());
        clock.bus().unsubscribe(subscription);
        clock.unmount();
        return Ok(());
    }

    // Generous timeout: a missing tick means the ticker is gone.
    let timeout = Duration::from_millis(cfg.tick_interval_ms.saturating_mul(5).max(1000));
    let mut seen = 0u64;
    let mut stdout = io::stdout();

    while ticks.is_none_or(|limit| seen < limit) {
        if !clock.wait_tick(timeout) {
            break;
        }
        seen += 1;
        writeln!(stdout, "⏱  {}", clock.tick(Utc::now()))?;
        stdout.flush()?;
    }

    clock.bus().unsubscribe(subscription);
    clock.unmount();
    Ok(())
}
