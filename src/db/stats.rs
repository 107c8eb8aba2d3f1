use crate::db::pool::DbPool;
use crate::db::queries::load_contexts;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL EVENTS
    //
    let count: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM attendance_events", [], |row| {
            row.get(0)
        })?;
    println!(
        "{}• Total events:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );

    //
    // 3) DATE RANGE
    //
    let range: Option<(Option<String>, Option<String>)> = pool
        .conn
        .query_row(
            "SELECT MIN(date), MAX(date) FROM attendance_events",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (first, last) = range.unwrap_or((None, None));

    println!("{}• Date range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) CONTEXTS AND OPEN MARKERS
    //
    let contexts = load_contexts(&pool.conn)?;
    let markers: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM kv_store WHERE key LIKE 'work_session:%'",
        [],
        |row| row.get(0),
    )?;

    if contexts.is_empty() {
        println!("{}• Contexts:{} {GREY}--{RESET}", CYAN, RESET);
    } else {
        println!("{}• Contexts:{} {}", CYAN, RESET, contexts.join(", "));
    }
    println!("{}• Session markers:{} {}", CYAN, RESET, markers);

    println!();
    Ok(())
}
