//! End-to-end generation: definitions in, .ics file out.

use std::path::PathBuf;

use crate::assemble::{AssemblyWarning, YearRange, assemble};
use crate::cache::DateCache;
use crate::definitions::HolidaySet;
use crate::error::{HolidayError, HolidayResult};
use crate::ics::generate_ics;
use crate::project::{HolidayEvent, project};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub range: YearRange,
    /// Compute and report, but leave the output file untouched.
    pub dry_run: bool,
    pub output_file: PathBuf,
    pub cache_file: PathBuf,
}

/// What a generation run produced.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub events: Vec<HolidayEvent>,
    pub warnings: Vec<AssemblyWarning>,
    /// Instances computed before approval filtering.
    pub computed: usize,
    /// Path of the written calendar, `None` on a dry run.
    pub written: Option<PathBuf>,
}

/// Generate the holiday calendar for `options.range`.
///
/// The date cache is loaded and saved around the computation, dry run or
/// not; a cache that cannot be read or written only produces a warning.
pub fn generate(set: &HolidaySet, options: &GenerateOptions) -> HolidayResult<GenerateReport> {
    let mut cache = DateCache::load_or_default(&options.cache_file);

    let assembly = assemble(options.range, set, &mut cache);

    if cache.is_dirty() {
        if let Err(e) = cache.save(&options.cache_file) {
            tracing::warn!("{e}");
        }
    }

    let events = project(&assembly.holidays);
    let content = generate_ics(&events);
    tracing::info!(
        "Projected {} events from {} computed holidays",
        events.len(),
        assembly.computed
    );

    let written = if options.dry_run {
        tracing::info!("Dry run complete, iCal file not written.");
        None
    } else {
        crate::fs::write_atomic(&options.output_file, &content).map_err(|source| {
            HolidayError::OutputWriteFailure {
                path: options.output_file.clone(),
                source,
            }
        })?;
        tracing::info!("iCal file saved to {}", options.output_file.display());
        Some(options.output_file.clone())
    };

    Ok(GenerateReport {
        events,
        warnings: assembly.warnings,
        computed: assembly.computed,
        written,
    })
}
