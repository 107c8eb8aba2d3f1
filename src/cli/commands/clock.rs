use crate::cli::commands::mount::mount;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use chrono::Utc;

/// Handle `in` and `out`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open_initialized(&cfg.database)?;
    let (mut clock, mut api) = mount(&pool.conn, cfg)?;
    let ctx = clock.context().to_string();

    let result = match cmd {
        Commands::In => clock.check_in(&mut api, Utc::now()).map(|_| {
            success(format!(
                "Checked in ({}). Today so far: {}",
                ctx,
                clock.display()
            ));
        }),
        Commands::Out => clock.check_out(&mut api, Utc::now()).map(|_| {
            success(format!(
                "Checked out ({}). Today's total: {}",
                ctx,
                clock.display()
            ));
        }),
        _ => Ok(()),
    };

    if let Err(e) = &result {
        match cmd {
            Commands::In if !clock.is_active() => {
                ttlog_quiet(&pool.conn, "rollback", &ctx, &e.to_string());
            }
            Commands::Out if clock.is_active() => warning(format!(
                "Session still open, pending reconciliation at {}",
                clock.display()
            )),
            _ => {}
        }
    }

    clock.unmount();
    result
}
