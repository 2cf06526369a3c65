//! Expand holiday definitions across a range of years.

use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::cache::DateCache;
use crate::definitions::{HolidayDefinition, HolidaySet};
use crate::error::{HolidayError, HolidayResult};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Holidays moved off weekends: Saturday to Friday, Sunday to Monday.
pub const OBSERVED_HOLIDAYS: [&str; 4] = [
    "New Year's Day",
    "Independence Day",
    "Veterans Day",
    "Christmas Day",
];

/// Inclusive span of years, validated to lie within 1900-2100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> HolidayResult<Self> {
        if start > end || start < MIN_YEAR || end > MAX_YEAR {
            return Err(HolidayError::InvalidRange { start, end });
        }
        Ok(YearRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A holiday resolved for one concrete year.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHoliday {
    pub name: String,
    /// Date the holiday is emitted on, after observance adjustment.
    pub date: NaiveDate,
    /// The rule's own date, when observance moved it.
    pub observed_from: Option<NaiveDate>,
    pub description: Option<String>,
    pub reminder_days: Option<u32>,
}

/// Non-fatal conditions encountered while assembling.
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblyWarning {
    /// A later `(name, date)` pair identical to an earlier one was dropped.
    DuplicateHoliday { name: String, date: NaiveDate },
    /// A definition could not be resolved for one year and was skipped.
    SkippedInstance {
        name: String,
        year: i32,
        reason: String,
    },
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyWarning::DuplicateHoliday { name, date } => {
                write!(f, "Skipping duplicate: {name} on {date}")
            }
            AssemblyWarning::SkippedInstance { name, year, reason } => {
                write!(f, "Skipping {name} for {year}: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Approved, deduplicated holidays in emission order.
    pub holidays: Vec<ResolvedHoliday>,
    pub warnings: Vec<AssemblyWarning>,
    /// Number of holiday instances computed before filtering.
    pub computed: usize,
}

/// Weekend observance: Saturday moves to the preceding Friday, Sunday to the
/// following Monday.
pub fn observed_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Days::new(1),
        Weekday::Sun => date + Days::new(1),
        _ => date,
    }
}

/// Resolve one group of definitions for a single year, without observance
/// adjustment or filtering.
pub fn resolve_year(
    year: i32,
    definitions: &[HolidayDefinition],
    cache: &mut DateCache,
) -> Vec<HolidayResult<ResolvedHoliday>> {
    definitions
        .iter()
        .map(|def| {
            let date = def.rule.resolve(year, cache)?;
            Ok(ResolvedHoliday {
                name: def.name.clone(),
                date,
                observed_from: None,
                description: def.description.clone(),
                reminder_days: def.reminder_days,
            })
        })
        .collect()
}

/// Expand `set` over `range`.
///
/// Per year the order is federal, manual, calculated. Duplicates by
/// `(name, observed date)` are dropped after the first, and only approved
/// names are returned.
pub fn assemble(range: YearRange, set: &HolidaySet, cache: &mut DateCache) -> Assembly {
    let mut assembly = Assembly::default();
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();

    tracing::info!("Generating holidays for years {range}");

    for year in range.years() {
        tracing::debug!("Processing year {year}");

        let groups = [
            ("federal", &set.federal),
            ("manual", &set.manual),
            ("calculated", &set.calculated),
        ];

        for (group, definitions) in groups {
            let resolved = resolve_year(year, definitions, cache);
            tracing::debug!("Resolved {} {group} holidays for {year}", resolved.len());

            for (def, result) in definitions.iter().zip(resolved) {
                let holiday = match result {
                    Ok(holiday) => holiday,
                    Err(e) => {
                        let warning = AssemblyWarning::SkippedInstance {
                            name: def.name.clone(),
                            year,
                            reason: e.to_string(),
                        };
                        tracing::warn!("{warning}");
                        assembly.warnings.push(warning);
                        continue;
                    }
                };
                assembly.computed += 1;

                let holiday = apply_observance(holiday);

                if !seen.insert((holiday.name.clone(), holiday.date)) {
                    let warning = AssemblyWarning::DuplicateHoliday {
                        name: holiday.name,
                        date: holiday.date,
                    };
                    tracing::warn!("{warning}");
                    assembly.warnings.push(warning);
                    continue;
                }

                if set.is_approved(&holiday.name) {
                    assembly.holidays.push(holiday);
                } else {
                    tracing::debug!("Not approved: {} on {}", holiday.name, holiday.date);
                }
            }
        }
    }

    assembly
}

fn apply_observance(mut holiday: ResolvedHoliday) -> ResolvedHoliday {
    if !OBSERVED_HOLIDAYS.contains(&holiday.name.as_str()) {
        return holiday;
    }

    let observed = observed_date(holiday.date);
    if observed != holiday.date {
        tracing::debug!(
            "{} falls on {}, observed {}",
            holiday.name,
            holiday.date,
            observed
        );
        holiday.observed_from = Some(holiday.date);
        holiday.date = observed;
    }
    holiday
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::HolidayRule;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed(name: &str, month: u32, day: u32) -> HolidayDefinition {
        HolidayDefinition {
            name: name.to_string(),
            rule: HolidayRule::Fixed { month, day },
            description: None,
            reminder_days: None,
        }
    }

    fn approve_all(mut set: HolidaySet) -> HolidaySet {
        set.approved = set
            .federal
            .iter()
            .chain(&set.manual)
            .chain(&set.calculated)
            .map(|d| d.name.clone())
            .collect();
        set
    }

    fn sample_set() -> HolidaySet {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/holidays.json");
        HolidaySet::load(&path).unwrap()
    }

    fn assemble_years(set: &HolidaySet, start: i32, end: i32) -> Assembly {
        let range = YearRange::new(start, end).unwrap();
        assemble(range, set, &mut DateCache::default())
    }

    fn pairs(assembly: &Assembly) -> Vec<(String, NaiveDate)> {
        assembly
            .holidays
            .iter()
            .map(|h| (h.name.clone(), h.date))
            .collect()
    }

    #[test]
    fn range_must_be_ordered_and_bounded() {
        assert!(YearRange::new(2025, 2026).is_ok());
        assert!(YearRange::new(1900, 2100).is_ok());
        for (start, end) in [
            (2026, 2025),
            (1800, 2025),
            (1899, 1899),
            (2101, 2101),
            (2025, 2101),
        ] {
            assert!(
                matches!(
                    YearRange::new(start, end),
                    Err(HolidayError::InvalidRange { .. })
                ),
                "{start}..{end}"
            );
        }
    }

    #[test]
    fn federal_holidays_2025() {
        let set = sample_set();
        let mut cache = DateCache::default();
        let actual: BTreeMap<String, String> = resolve_year(2025, &set.federal, &mut cache)
            .into_iter()
            .map(|r| r.unwrap())
            .map(|h| (h.name, h.date.format("%Y-%m-%d").to_string()))
            .collect();

        let expected: BTreeMap<String, String> = [
            ("New Year's Day", "2025-01-01"),
            ("Martin Luther King Jr. Day", "2025-01-20"),
            ("Presidents' Day", "2025-02-17"),
            ("Memorial Day", "2025-05-26"),
            ("Juneteenth", "2025-06-19"),
            ("Independence Day", "2025-07-04"),
            ("Labor Day", "2025-09-01"),
            ("Columbus Day", "2025-10-13"),
            ("Veterans Day", "2025-11-11"),
            ("Thanksgiving Day", "2025-11-27"),
            ("Christmas Day", "2025-12-25"),
        ]
        .into_iter()
        .map(|(n, d)| (n.to_string(), d.to_string()))
        .collect();

        assert_eq!(actual, expected);
    }

    #[test]
    fn observance_moves_weekends_only() {
        // 2026-07-04 is a Saturday, 2022-12-25 a Sunday, 2025-12-25 a Thursday.
        assert_eq!(observed_date(date(2026, 7, 4)), date(2026, 7, 3));
        assert_eq!(observed_date(date(2022, 12, 25)), date(2022, 12, 26));
        assert_eq!(observed_date(date(2025, 12, 25)), date(2025, 12, 25));
    }

    #[test]
    fn independence_day_2026_is_observed_on_friday() {
        let set = approve_all(HolidaySet {
            federal: vec![fixed("Independence Day", 7, 4)],
            ..Default::default()
        });
        let assembly = assemble_years(&set, 2026, 2026);

        let holiday = &assembly.holidays[0];
        assert_eq!(holiday.date, date(2026, 7, 3));
        assert_eq!(holiday.observed_from, Some(date(2026, 7, 4)));
    }

    #[test]
    fn observance_is_limited_to_allow_list() {
        // Halloween 2026 is a Saturday but is not an observed holiday.
        let set = approve_all(HolidaySet {
            manual: vec![fixed("Halloween", 10, 31)],
            ..Default::default()
        });
        let assembly = assemble_years(&set, 2026, 2026);
        assert_eq!(assembly.holidays[0].date, date(2026, 10, 31));
        assert_eq!(assembly.holidays[0].observed_from, None);
    }

    #[test]
    fn order_is_federal_manual_calculated_per_year() {
        let set = approve_all(HolidaySet {
            federal: vec![fixed("Juneteenth", 6, 19)],
            manual: vec![fixed("Halloween", 10, 31)],
            calculated: vec![HolidayDefinition {
                name: "Easter Sunday".into(),
                rule: HolidayRule::Easter,
                description: None,
                reminder_days: None,
            }],
            ..Default::default()
        });
        let assembly = assemble_years(&set, 2025, 2026);

        let names: Vec<_> = assembly
            .holidays
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "Juneteenth",
                "Halloween",
                "Easter Sunday",
                "Juneteenth",
                "Halloween",
                "Easter Sunday",
            ]
        );
        assert_eq!(assembly.holidays[2].date, date(2025, 4, 20));
        assert_eq!(assembly.holidays[5].date, date(2026, 4, 5));
    }

    #[test]
    fn duplicate_name_and_date_is_dropped_with_warning() {
        let mut halloween = fixed("Halloween", 10, 31);
        halloween.description = Some("first".into());
        let mut again = fixed("Halloween", 10, 31);
        again.description = Some("second".into());

        let set = approve_all(HolidaySet {
            manual: vec![halloween, again],
            ..Default::default()
        });
        let assembly = assemble_years(&set, 2025, 2025);

        assert_eq!(assembly.holidays.len(), 1);
        assert_eq!(assembly.holidays[0].description.as_deref(), Some("first"));
        assert_eq!(
            assembly.warnings,
            vec![AssemblyWarning::DuplicateHoliday {
                name: "Halloween".into(),
                date: date(2025, 10, 31)
            }]
        );
    }

    #[test]
    fn unapproved_holidays_are_computed_but_not_emitted() {
        let mut set = HolidaySet {
            manual: vec![fixed("Halloween", 10, 31), fixed("Festivus", 12, 23)],
            ..Default::default()
        };
        set.approved.insert("Festivus".into());

        let assembly = assemble_years(&set, 2025, 2025);
        assert_eq!(assembly.computed, 2);
        let festivus = ("Festivus".to_string(), date(2025, 12, 23));
        assert_eq!(pairs(&assembly), vec![festivus]);
    }

    #[test]
    fn leap_day_is_skipped_in_common_years() {
        let set = approve_all(HolidaySet {
            manual: vec![fixed("Leap Day", 2, 29)],
            ..Default::default()
        });
        let assembly = assemble_years(&set, 2024, 2025);

        let leap_day = ("Leap Day".to_string(), date(2024, 2, 29));
        assert_eq!(pairs(&assembly), vec![leap_day]);
        assert!(matches!(
            assembly.warnings.as_slice(),
            [AssemblyWarning::SkippedInstance { year: 2025, .. }]
        ));
    }

    #[test]
    fn attributes_propagate_from_definitions() {
        let set = sample_set();
        let assembly = assemble_years(&set, 2025, 2025);

        let halloween = assembly
            .holidays
            .iter()
            .find(|h| h.name == "Halloween")
            .unwrap();
        assert!(halloween.description.is_some());
        assert_eq!(halloween.reminder_days, Some(1));
    }

    #[test]
    fn results_do_not_depend_on_cache_state() {
        let set = sample_set();
        let range = YearRange::new(2024, 2030).unwrap();

        let mut cache = DateCache::default();
        let cold = assemble(range, &set, &mut cache);
        assert!(!cache.is_empty());

        let warm = assemble(range, &set, &mut cache);
        let fresh = assemble(range, &set, &mut DateCache::default());

        assert_eq!(pairs(&cold), pairs(&warm));
        assert_eq!(pairs(&cold), pairs(&fresh));
    }
}
