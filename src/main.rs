//! rworkclock main entrypoint.

use rworkclock::run;
use rworkclock::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
