mod commands;
mod dates;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use daybook_core::Daybook;
use daybook_core::layout::ViewMode;
use daybook_core::transfer::CollectionKind;
use tracing_subscriber::EnvFilter;

use commands::config::ConfigCommand;
use commands::event::EventCommand;
use commands::goal::GoalCommand;
use commands::note::NoteCommand;
use commands::profile::ProfileCommand;
use commands::task::TaskCommand;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Calendar, tasks, notes and goals in your terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calendar as a month grid, week, day or agenda
    Cal {
        /// month, week, day or agenda
        #[arg(default_value = "month")]
        view: ViewMode,

        /// Any day inside the period to show (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Periods to move from --date, e.g. -1 for the previous month
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,

        /// Agenda window in days (default from config)
        #[arg(long)]
        days: Option<i64>,
    },
    /// Create, list, edit and delete events
    #[command(subcommand)]
    Event(EventCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Manage goals and habits
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Your profile, preferences and achievements
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Export a collection as JSON
    Export {
        /// tasks, notes, goals or events
        collection: CollectionKind,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge a JSON export into a collection (records are matched by id)
    Import {
        /// tasks, notes, goals or events
        collection: CollectionKind,

        file: PathBuf,
    },
    /// Save everything into one JSON backup
    Backup {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Overwrite stored data with a backup
    Restore {
        file: PathBuf,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let daybook = Daybook::load()?;

    match cli.command {
        Commands::Cal {
            view,
            date,
            offset,
            days,
        } => commands::calendar::run(&daybook, view, date, offset, days),
        Commands::Event(command) => commands::event::run(&daybook, command),
        Commands::Task(command) => commands::task::run(&daybook, command),
        Commands::Note(command) => commands::note::run(&daybook, command),
        Commands::Goal(command) => commands::goal::run(&daybook, command),
        Commands::Profile(command) => commands::profile::run(&daybook, command),
        Commands::Export { collection, output } => {
            commands::transfer::export(&daybook, collection, output)
        }
        Commands::Import { collection, file } => {
            commands::transfer::import(&daybook, collection, file)
        }
        Commands::Backup { output } => commands::transfer::backup(&daybook, output),
        Commands::Restore { file, force } => commands::transfer::restore(&daybook, file, force),
        Commands::Config(command) => commands::config::run(&daybook, command),
    }
}

/// Log to stderr, filtered by `DAYBOOK_LOG` (e.g. `DAYBOOK_LOG=debug`), warnings by default.
fn init_logging() {
    let filter = EnvFilter::try_from_env("DAYBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cal_accepts_negative_offset() {
        let cli = Cli::try_parse_from(["daybook", "cal", "week", "--offset", "-2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cal {
                view: ViewMode::Week,
                offset: -2,
                ..
            }
        ));
    }

    #[test]
    fn enum_arguments_parse() {
        let cli = Cli::try_parse_from(["daybook", "export", "notes"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Export {
                collection: CollectionKind::Notes,
                output: None
            }
        ));

        assert!(Cli::try_parse_from(["daybook", "export", "photos"]).is_err());
        assert!(Cli::try_parse_from(["daybook", "config", "set", "agenda_days", "30"]).is_ok());
        assert!(Cli::try_parse_from(["daybook", "config", "set", "colour", "red"]).is_err());
        assert!(Cli::try_parse_from(["daybook", "event", "new", "Call", "--on", "fri"]).is_ok());
        assert!(
            Cli::try_parse_from(["daybook", "event", "new", "Call", "--on", "fri", "-s", "3pm"]).is_err()
        );
        assert!(Cli::try_parse_from(["daybook", "goal", "add", "Run", "--type", "numeric"]).is_err());
    }
}
