//! Holiday definition file (`holidays.json`).
//!
//! [`HolidayFile`] mirrors the on-disk JSON and is what the add/remove
//! commands edit. [`HolidaySet`] is the validated, typed snapshot used for
//! generation: every definition's shape is resolved into a [`HolidayRule`]
//! once, here, so nothing downstream inspects raw fields.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HolidayError, HolidayResult};
use crate::rule::{HolidayRule, weekday_from_index};

/// Leap year used to validate month/day pairs, so Feb 29 is accepted.
const VALIDATION_YEAR: i32 = 2024;

/// Highest `nth` a weekday rule may ask for.
const MAX_NTH: u32 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayFile {
    #[serde(default)]
    pub approved_holidays: Vec<String>,
    #[serde(default)]
    pub manual_holidays: Vec<ManualHoliday>,
    #[serde(default)]
    pub calculated_holidays: Vec<CalculatedHoliday>,
    #[serde(default)]
    pub federal_holidays: Vec<FederalHoliday>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualHoliday {
    pub name: String,
    pub month: u32,
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    Easter,
    NthWeekday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedHoliday {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CalculationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_days: Option<u32>,
}

/// A federal holiday: `day` for fixed dates, `weekday` + `nth` or
/// `weekday` + `last` for weekday rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederalHoliday {
    pub name: String,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_days: Option<u32>,
}

impl HolidayFile {
    pub fn load(path: &Path) -> HolidayResult<Self> {
        if !path.exists() {
            return Err(HolidayError::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| HolidayError::malformed(path, e.to_string()))
    }

    /// Save with two-space indentation, omitting absent optional fields.
    pub fn save(&self, path: &Path) -> HolidayResult<()> {
        let mut content = serde_json::to_string_pretty(self)
            .map_err(|e| HolidayError::malformed(path, e.to_string()))?;
        content.push('\n');
        crate::fs::write_atomic(path, &content)?;
        Ok(())
    }

    /// Whether `name` is defined in any of the holiday groups.
    pub fn contains(&self, name: &str) -> bool {
        self.manual_holidays.iter().any(|h| h.name == name)
            || self.calculated_holidays.iter().any(|h| h.name == name)
            || self.federal_holidays.iter().any(|h| h.name == name)
    }

    /// Add a manual holiday and approve it.
    ///
    /// The month/day pair is validated against a leap year, so Feb 29 is
    /// allowed (it is skipped in common years at generation time).
    pub fn add_manual(&mut self, holiday: ManualHoliday) -> HolidayResult<()> {
        validate_month_day(holiday.month, holiday.day)?;

        if self.contains(&holiday.name) {
            return Err(HolidayError::HolidayExists(holiday.name));
        }

        if !self.approved_holidays.contains(&holiday.name) {
            self.approved_holidays.push(holiday.name.clone());
        }
        self.manual_holidays.push(holiday);
        Ok(())
    }

    /// Remove `name` from every group and from the approved list.
    ///
    /// Returns false when nothing matched.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.len_with_approved();

        self.manual_holidays.retain(|h| h.name != name);
        self.calculated_holidays.retain(|h| h.name != name);
        self.federal_holidays.retain(|h| h.name != name);
        self.approved_holidays.retain(|h| h != name);

        self.len_with_approved() != before
    }

    fn len_with_approved(&self) -> usize {
        self.approved_holidays.len()
            + self.manual_holidays.len()
            + self.calculated_holidays.len()
            + self.federal_holidays.len()
    }
}

/// Validate a month/day pair independent of year.
pub fn validate_month_day(month: u32, day: u32) -> HolidayResult<()> {
    match NaiveDate::from_ymd_opt(VALIDATION_YEAR, month, day) {
        Some(_) => Ok(()),
        None => Err(HolidayError::InvalidDate {
            year: None,
            month,
            day,
        }),
    }
}

/// A single holiday with its resolved rule.
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayDefinition {
    pub name: String,
    pub rule: HolidayRule,
    pub description: Option<String>,
    pub reminder_days: Option<u32>,
}

/// Validated snapshot of a holiday file, ready for generation.
#[derive(Debug, Clone, Default)]
pub struct HolidaySet {
    pub federal: Vec<HolidayDefinition>,
    pub manual: Vec<HolidayDefinition>,
    pub calculated: Vec<HolidayDefinition>,
    pub approved: HashSet<String>,
}

impl HolidaySet {
    /// Load and validate a holiday file.
    pub fn load(path: &Path) -> HolidayResult<Self> {
        let file = HolidayFile::load(path)?;
        Self::from_file(&file, path)
    }

    /// Resolve every definition in `file` into a typed rule.
    ///
    /// `source` is only used for error messages.
    pub fn from_file(file: &HolidayFile, source: &Path) -> HolidayResult<Self> {
        let resolver = Resolver { source };

        let federal = file
            .federal_holidays
            .iter()
            .map(|h| resolver.federal(h))
            .collect::<HolidayResult<Vec<_>>>()?;
        let manual = file
            .manual_holidays
            .iter()
            .map(|h| resolver.manual(h))
            .collect::<HolidayResult<Vec<_>>>()?;
        let calculated = file
            .calculated_holidays
            .iter()
            .map(|h| resolver.calculated(h))
            .collect::<HolidayResult<Vec<_>>>()?;

        Ok(HolidaySet {
            federal,
            manual,
            calculated,
            approved: file.approved_holidays.iter().cloned().collect(),
        })
    }

    pub fn is_approved(&self, name: &str) -> bool {
        self.approved.contains(name)
    }
}

struct Resolver<'a> {
    source: &'a Path,
}

impl Resolver<'_> {
    fn federal(&self, h: &FederalHoliday) -> HolidayResult<HolidayDefinition> {
        let rule = if let Some(day) = h.day {
            self.fixed(&h.name, h.month, day)?
        } else if h.last.is_some() {
            HolidayRule::LastWeekday {
                month: self.month(&h.name, h.month)?,
                weekday: self.weekday(&h.name, h.weekday)?,
            }
        } else {
            self.nth_weekday(&h.name, Some(h.month), h.weekday, h.nth)?
        };

        Ok(definition(&h.name, rule, &h.description, h.reminder_days))
    }

    fn manual(&self, h: &ManualHoliday) -> HolidayResult<HolidayDefinition> {
        let rule = self.fixed(&h.name, h.month, h.day)?;
        Ok(definition(&h.name, rule, &h.description, h.reminder_days))
    }

    fn calculated(&self, h: &CalculatedHoliday) -> HolidayResult<HolidayDefinition> {
        let rule = match h.kind {
            CalculationKind::Easter => HolidayRule::Easter,
            CalculationKind::NthWeekday => self.nth_weekday(&h.name, h.month, h.weekday, h.nth)?,
        };
        Ok(definition(&h.name, rule, &h.description, h.reminder_days))
    }

    fn fixed(&self, name: &str, month: u32, day: u32) -> HolidayResult<HolidayRule> {
        validate_month_day(month, day)
            .map_err(|e| self.malformed(format!("holiday '{name}': {e}")))?;
        Ok(HolidayRule::Fixed { month, day })
    }

    fn nth_weekday(
        &self,
        name: &str,
        month: Option<u32>,
        weekday: Option<u32>,
        nth: Option<u32>,
    ) -> HolidayResult<HolidayRule> {
        let month = month.ok_or_else(|| self.missing(name, "month"))?;
        let nth = nth.ok_or_else(|| self.missing(name, "nth"))?;
        if !(1..=MAX_NTH).contains(&nth) {
            return Err(self.malformed(format!(
                "holiday '{name}': nth must be between 1 and {MAX_NTH}, got {nth}"
            )));
        }

        Ok(HolidayRule::NthWeekday {
            month: self.month(name, month)?,
            weekday: self.weekday(name, weekday)?,
            nth,
        })
    }

    fn month(&self, name: &str, month: u32) -> HolidayResult<u32> {
        if (1..=12).contains(&month) {
            Ok(month)
        } else {
            Err(self.malformed(format!(
                "holiday '{name}': month must be between 1 and 12, got {month}"
            )))
        }
    }

    fn weekday(&self, name: &str, weekday: Option<u32>) -> HolidayResult<chrono::Weekday> {
        let index = weekday.ok_or_else(|| self.missing(name, "weekday"))?;
        weekday_from_index(index).ok_or_else(|| {
            self.malformed(format!(
                "holiday '{name}': weekday must be between 0 (Monday) and 6 (Sunday), got {index}"
            ))
        })
    }

    fn missing(&self, name: &str, field: &str) -> HolidayError {
        self.malformed(format!("holiday '{name}' is missing '{field}'"))
    }

    fn malformed(&self, reason: String) -> HolidayError {
        HolidayError::malformed(PathBuf::from(self.source), reason)
    }
}

fn definition(
    name: &str,
    rule: HolidayRule,
    description: &Option<String>,
    reminder_days: Option<u32>,
) -> HolidayDefinition {
    HolidayDefinition {
        name: name.to_string(),
        rule,
        description: description.clone(),
        reminder_days,
    }
}
