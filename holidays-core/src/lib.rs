//! Core of the US holidays calendar generator.
//!
//! - `definitions` loads and edits the holiday definition file
//! - `rule` and `cache` compute individual dates
//! - `assemble`, `project` and `ics` turn definitions into a calendar
//! - `generator` runs the whole pipeline

pub mod assemble;
pub mod cache;
pub mod config;
pub mod definitions;
pub mod error;
mod fs;
pub mod generator;
pub mod ics;
pub mod project;
pub mod rule;

pub use assemble::{Assembly, AssemblyWarning, ResolvedHoliday, YearRange};
pub use cache::DateCache;
pub use config::AppConfig;
pub use definitions::{HolidayFile, HolidaySet, ManualHoliday};
pub use error::{HolidayError, HolidayResult};
pub use generator::{GenerateOptions, GenerateReport, generate};
pub use project::HolidayEvent;
pub use rule::HolidayRule;
