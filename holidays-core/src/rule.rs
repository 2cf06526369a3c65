//! Holiday rules and the evaluators that turn them into dates.
//!
//! Weekdays in configuration are numbered 0=Monday..6=Sunday. Easter,
//! nth-weekday and last-weekday results are memoized in a [`DateCache`].

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::cache::DateCache;
use crate::error::{HolidayError, HolidayResult};

/// First year for which the Gregorian Easter computation is meaningful.
pub const FIRST_GREGORIAN_YEAR: i32 = 1583;

/// How a holiday's date is derived for a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    /// Same calendar date every year.
    Fixed { month: u32, day: u32 },
    /// The `nth` occurrence of `weekday` in `month` (e.g. 3rd Monday in January).
    NthWeekday {
        month: u32,
        weekday: Weekday,
        nth: u32,
    },
    /// The last occurrence of `weekday` in `month` (e.g. last Monday in May).
    LastWeekday { month: u32, weekday: Weekday },
    /// Gregorian Easter Sunday.
    Easter,
}

impl HolidayRule {
    /// Resolve the rule for `year`.
    pub fn resolve(&self, year: i32, cache: &mut DateCache) -> HolidayResult<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day } => fixed_date(year, month, day),
            HolidayRule::NthWeekday {
                month,
                weekday,
                nth,
            } => nth_weekday(year, month, weekday, nth, cache),
            HolidayRule::LastWeekday { month, weekday } => {
                last_weekday(year, month, weekday, cache)
            }
            HolidayRule::Easter => easter_sunday(year, cache),
        }
    }
}

/// Map a 0=Monday..6=Sunday index to a weekday.
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn fixed_date(year: i32, month: u32, day: u32) -> HolidayResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(HolidayError::InvalidDate {
        year: Some(year),
        month,
        day,
    })
}

/// Easter Sunday for `year` using Gauss's algorithm (anonymous Gregorian form).
pub fn easter_sunday(year: i32, cache: &mut DateCache) -> HolidayResult<NaiveDate> {
    let key = format!("easter_{year}");
    if let Some(date) = cache.get(&key) {
        return Ok(date);
    }

    if year < FIRST_GREGORIAN_YEAR {
        return Err(HolidayError::InvalidDate {
            year: Some(year),
            month: 4,
            day: 1,
        });
    }

    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    let date = fixed_date(year, month as u32, day as u32)?;
    cache.insert(key, date);
    Ok(date)
}

/// The `nth` (1-based) `weekday` of `month`.
///
/// Fails with `NoSuchOccurrence` when the month has fewer than `nth` such
/// weekdays instead of spilling into the following month.
pub fn nth_weekday(
    year: i32,
    month: u32,
    weekday: Weekday,
    nth: u32,
    cache: &mut DateCache,
) -> HolidayResult<NaiveDate> {
    let key = format!(
        "nth_{year}_{month}_{}_{nth}",
        weekday.num_days_from_monday()
    );
    if let Some(date) = cache.get(&key) {
        return Ok(date);
    }

    let no_such = HolidayError::NoSuchOccurrence {
        year,
        month,
        weekday,
        nth,
    };
    if nth == 0 {
        return Err(no_such);
    }

    let first_day = fixed_date(year, month, 1)?;
    let target = weekday.num_days_from_monday();
    let offset = (target + 7 - first_day.weekday().num_days_from_monday()) % 7;
    let date = first_day
        .checked_add_days(Days::new(u64::from(offset + 7 * (nth - 1))))
        .filter(|d| d.month() == month)
        .ok_or(no_such)?;

    cache.insert(key, date);
    Ok(date)
}

/// The last `weekday` of `month`.
pub fn last_weekday(
    year: i32,
    month: u32,
    weekday: Weekday,
    cache: &mut DateCache,
) -> HolidayResult<NaiveDate> {
    let key = format!("last_{year}_{month}_{}", weekday.num_days_from_monday());
    if let Some(date) = cache.get(&key) {
        return Ok(date);
    }

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let invalid = HolidayError::InvalidDate {
        year: Some(year),
        month,
        day: 1,
    };
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or(invalid)?;

    let back = (last_day.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    let date = last_day - Days::new(u64::from(back));

    cache.insert(key, date);
    Ok(date)
}
