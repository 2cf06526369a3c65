mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default location of the holiday definitions.
const DEFAULT_HOLIDAYS_FILE: &str = "config/holidays.json";

#[derive(Parser)]
#[command(name = "holidays")]
#[command(about = "Generate an iCalendar file of US holidays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the holiday calendar
    Generate {
        /// First year to generate (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Last year to generate (defaults to year + default_year_range - 1)
        #[arg(long)]
        end_year: Option<i32>,

        /// Compute everything but don't write the .ics file
        #[arg(long)]
        dry_run: bool,

        /// Log every holiday and cache operation
        #[arg(short, long)]
        verbose: bool,

        #[arg(long, default_value = DEFAULT_HOLIDAYS_FILE)]
        holidays_file: PathBuf,

        /// Config file (defaults to config/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Add a fixed-date holiday and approve it
    AddHoliday {
        name: String,
        month: u32,
        day: u32,

        #[arg(long)]
        description: Option<String>,

        /// Days before the holiday to show a reminder
        #[arg(long)]
        reminder_days: Option<u32>,

        #[arg(long, default_value = DEFAULT_HOLIDAYS_FILE)]
        holidays_file: PathBuf,
    },
    /// Remove a holiday from every group and from the approved list
    RemoveHoliday {
        name: String,

        #[arg(long, default_value = DEFAULT_HOLIDAYS_FILE)]
        holidays_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Generate { verbose: true, .. });
    init_tracing(verbose);

    match cli.command {
        Commands::Generate {
            year,
            end_year,
            dry_run,
            verbose: _,
            holidays_file,
            config,
        } => commands::generate::run(commands::generate::GenerateArgs {
            year,
            end_year,
            dry_run,
            holidays_file,
            config,
        }),
        Commands::AddHoliday {
            name,
            month,
            day,
            description,
            reminder_days,
            holidays_file,
        } => commands::add_holiday::run(
            &holidays_file,
            name,
            month,
            day,
            description,
            reminder_days,
        ),
        Commands::RemoveHoliday {
            name,
            holidays_file,
        } => commands::remove_holiday::run(&holidays_file, &name),
    }
}

/// Log to stderr. `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
