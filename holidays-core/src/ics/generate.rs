//! ICS calendar generation.

use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};

use crate::project::HolidayEvent;

pub const PRODUCT_ID: &str = "//US Holidays Calendar//github.com/aaronshivers//";
pub const ICAL_VERSION: &str = "2.0";
/// Hint to subscribing clients to refresh the calendar monthly.
pub const REFRESH_INTERVAL: &str = "P1M";

/// Generate the .ics content for a whole holiday calendar.
pub fn generate_ics(events: &[HolidayEvent]) -> String {
    let mut cal = Calendar::new();

    let mut refresh = Property::new("REFRESH-INTERVAL", REFRESH_INTERVAL);
    refresh.append_parameter(ValueType::Duration);
    cal.append_property(refresh);

    for event in events {
        cal.push(build_event(event));
    }
    let cal = cal.done();

    normalize_ics(&cal.to_string())
}

fn build_event(event: &HolidayEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    // DTSTAMP is derived from the event date so regenerating an unchanged
    // calendar is byte-identical.
    let stamp = format!("{}T000000Z", event.date.format("%Y%m%d"));
    ics_event.add_property("DTSTAMP", stamp);

    let mut dtstart = Property::new("DTSTART", event.date.format("%Y%m%d").to_string());
    dtstart.append_parameter(ValueType::Date);
    ics_event.append_property(dtstart);

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if event.yearly {
        ics_event.add_property("RRULE", "FREQ=YEARLY");
    }

    if let Some(ref reminder) = event.reminder {
        let lead = chrono::Duration::days(i64::from(reminder.days_before));
        let trigger = Trigger::before_start(lead);
        ics_event.alarm(Alarm::display(&reminder.message, trigger));
    }

    ics_event.done()
}

/// Clean up ICS output from the icalendar crate
/// - Emit our own VERSION and PRODID right after BEGIN:VCALENDAR
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
fn normalize_ics(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut depth = 0usize;
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("BEGIN:") {
            depth += 1;
        }

        let calendar_level = depth == 1;
        if calendar_level
            && (line.starts_with("PRODID:")
                || line.starts_with("VERSION:")
                || line == "CALSCALE:GREGORIAN")
        {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");

        if line == "BEGIN:VCALENDAR" {
            result.push_str(&format!("VERSION:{ICAL_VERSION}\r\n"));
            result.push_str(&format!("PRODID:{PRODUCT_ID}\r\n"));
        }

        if line.starts_with("END:") {
            depth = depth.saturating_sub(1);
        }
    }

    result
}
