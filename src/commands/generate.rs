use std::path::PathBuf;

use anyhow::Result;
use chrono::Datelike;
use holidays_core::{AppConfig, GenerateOptions, HolidaySet, YearRange, generate};
use owo_colors::OwoColorize;

pub struct GenerateArgs {
    pub year: Option<i32>,
    pub end_year: Option<i32>,
    pub dry_run: bool,
    pub holidays_file: PathBuf,
    pub config: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let start = args.year.unwrap_or_else(|| chrono::Local::now().year());

    // An explicit range can be rejected before touching any file.
    if let Some(end) = args.end_year {
        YearRange::new(start, end)?;
    }

    let config = AppConfig::load(args.config.as_deref())?;
    let range = resolve_range(start, args.end_year, config.default_year_range)?;

    let set = HolidaySet::load(&args.holidays_file)?;

    let report = generate(
        &set,
        &GenerateOptions {
            range,
            dry_run: args.dry_run,
            output_file: config.output_file,
            cache_file: config.cache_file,
        },
    )?;

    println!();
    println!(
        "{} {} events for {}",
        "Generated".green(),
        report.events.len(),
        range
    );
    if !report.warnings.is_empty() {
        println!("{}", format!("{} warnings", report.warnings.len()).yellow());
    }
    match report.written {
        Some(path) => println!("Saved to {}", path.display()),
        None => println!("{}", "Dry run, nothing written".dimmed()),
    }

    Ok(())
}

/// Range from `start` to `end`, or across `default_year_range` years.
fn resolve_range(start: i32, end: Option<i32>, default_year_range: u32) -> Result<YearRange> {
    let span = i32::try_from(default_year_range).unwrap_or(i32::MAX);
    let end = end.unwrap_or_else(|| start.saturating_add(span - 1));
    Ok(YearRange::new(start, end)?)
}
