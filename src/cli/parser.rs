use clap::{Parser, Subcommand};

/// Command-line interface definition for rworkclock
#[derive(Parser)]
#[command(
    name = "rworkclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A work-session clock: check in, check out and watch today's elapsed work time",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Context (team) the work session belongs to
    #[arg(global = true, long = "context", short = 'c')]
    pub context: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $VISUAL, $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Show today's elapsed work time
    Status {
        #[arg(long = "json", help = "Print the session snapshot as JSON")]
        json: bool,
    },

    /// Check in: open a work session now
    In,

    /// Check out: close the open work session now
    Out,

    /// Render the live counter once per tick
    Watch {
        #[arg(long = "ticks", help = "Stop after this many ticks")]
        ticks: Option<u64>,
    },
}
