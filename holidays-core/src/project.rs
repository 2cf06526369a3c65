//! Turn resolved holidays into calendar events.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::assemble::ResolvedHoliday;

/// Holidays emitted once as a yearly-recurring event when they carry no reminder.
pub const RECURRING_HOLIDAYS: [&str; 3] = ["New Year's Day", "Independence Day", "Christmas Day"];

const UID_DOMAIN: &str = "us-holidays";

/// An all-day calendar event for one holiday.
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayEvent {
    pub uid: String,
    pub summary: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub reminder: Option<Reminder>,
    /// Event repeats every year on the same month/day.
    pub yearly: bool,
}

/// A display alarm triggered a number of days before the event.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub days_before: u32,
    pub message: String,
}

impl Reminder {
    pub fn for_holiday(name: &str, days_before: u32) -> Self {
        let message = if days_before == 1 {
            format!("Reminder: {name} is tomorrow")
        } else {
            format!("Reminder: {name} is in {days_before} days")
        };
        Reminder {
            days_before,
            message,
        }
    }
}

/// Stable event UID for a holiday on a given date.
pub fn event_uid(date: NaiveDate, name: &str) -> String {
    let slug = slug::slugify(name);
    format!("{}-{slug}@{UID_DOMAIN}", date.format("%Y-%m-%d"))
}

/// Project assembled holidays into events, preserving order.
///
/// Recurring-eligible holidays collapse into a single yearly event anchored on
/// their first occurrence, as long as every occurrence shares that month/day.
pub fn project(holidays: &[ResolvedHoliday]) -> Vec<HolidayEvent> {
    let collapsible = collapsible_names(holidays);
    let mut anchored: Vec<&str> = Vec::new();
    let mut events = Vec::with_capacity(holidays.len());

    for holiday in holidays {
        let yearly = collapsible.contains(&holiday.name.as_str());
        if yearly {
            if anchored.contains(&holiday.name.as_str()) {
                tracing::debug!(
                    "{} on {} covered by yearly recurrence",
                    holiday.name,
                    holiday.date
                );
                continue;
            }
            anchored.push(&holiday.name);
        }

        let reminder = holiday
            .reminder_days
            .filter(|days| *days > 0)
            .map(|days| Reminder::for_holiday(&holiday.name, days));

        events.push(HolidayEvent {
            uid: event_uid(holiday.date, &holiday.name),
            summary: holiday.name.clone(),
            date: holiday.date,
            description: holiday.description.clone(),
            reminder,
            yearly,
        });
        tracing::info!("Added: {}", log_label(holiday));
    }

    events
}

/// `Name on date`, noting the actual date when observance moved it.
fn log_label(holiday: &ResolvedHoliday) -> String {
    let ResolvedHoliday { name, date, .. } = holiday;
    match holiday.observed_from {
        Some(actual) => format!("{name} on {date} (observed, falls on {actual})"),
        None => format!("{name} on {date}"),
    }
}

/// Names eligible for a yearly recurrence whose dates agree on month/day.
fn collapsible_names(holidays: &[ResolvedHoliday]) -> Vec<&str> {
    let mut month_days: HashMap<&str, Vec<(u32, u32)>> = HashMap::new();

    for holiday in holidays {
        let recurring = RECURRING_HOLIDAYS.contains(&holiday.name.as_str());
        if recurring && holiday.reminder_days.is_none() {
            month_days
                .entry(holiday.name.as_str())
                .or_default()
                .push((holiday.date.month(), holiday.date.day()));
        }
    }

    month_days
        .into_iter()
        .filter(|(name, dates)| {
            let uniform = dates.windows(2).all(|w| w[0] == w[1]);
            if !uniform {
                tracing::debug!("{name} moves between years, emitting one event per year");
            }
            uniform
        })
        .map(|(name, _)| name)
        .collect()
}
