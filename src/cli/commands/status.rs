use crate::cli::commands::mount::mount;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::work_session::WorkSession;
use crate::ui::messages::warning;
use crate::utils::colors::{GREY, RESET, color_for_phase};
use crate::utils::time::format_elapsed;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    #[serde(flatten)]
    session: WorkSession,
    phase: &'a str,
    elapsed_seconds: u64,
    elapsed: &'a str,
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Status { json } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open_initialized(&cfg.database)?;
    let (mut clock, _api) = match mount(&pool.conn, cfg) {
        Ok(mounted) => mounted,
        Err(e) => {
            warning(format!("Could not load today's attendance: {}", e));
            println!("Today: {GREY}{}{RESET}", format_elapsed(0));
            return Err(e);
        }
    };

    let now = Utc::now();
    let elapsed_seconds = clock.elapsed_seconds(now);
    let display = clock.tick(now).to_string();
    let phase = clock.phase();

    if *json {
        let view = StatusView {
            session: clock.snapshot(),
            phase: phase.as_str(),
            elapsed_seconds,
            elapsed: &display,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let color = color_for_phase(phase.as_str());
        println!("Context: {}", clock.context());
        println!("State:   {}{}{}", color, phase.as_str(), RESET);
        if let Some(start) = phase.started_at() {
            println!(
                "Since:   {}",
                start.with_timezone(&chrono::Local).format("%H:%M:%S")
            );
        }
        println!("Today:   {}", display);
    }

    clock.unmount();
    Ok(())
}
