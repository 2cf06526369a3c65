use std::path::Path;

use anyhow::Result;
use holidays_core::HolidayFile;
use owo_colors::OwoColorize;

/// Remove `name` everywhere. A name that isn't defined only warns.
pub fn run(holidays_file: &Path, name: &str) -> Result<()> {
    let mut file = HolidayFile::load(holidays_file)?;

    if !file.remove(name) {
        tracing::warn!("Holiday '{name}' not found.");
        return Ok(());
    }
    file.save(holidays_file)?;

    tracing::info!("Removed holiday {name}");
    println!("{} {name}", "Removed".red());

    Ok(())
}
