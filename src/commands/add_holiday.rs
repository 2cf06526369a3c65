use std::path::Path;

use anyhow::Result;
use holidays_core::{HolidayFile, ManualHoliday};
use owo_colors::OwoColorize;

pub fn run(
    holidays_file: &Path,
    name: String,
    month: u32,
    day: u32,
    description: Option<String>,
    reminder_days: Option<u32>,
) -> Result<()> {
    let mut file = HolidayFile::load(holidays_file)?;

    file.add_manual(ManualHoliday {
        name: name.clone(),
        month,
        day,
        description,
        reminder_days,
    })?;
    file.save(holidays_file)?;

    tracing::info!("Added holiday {name} on {month:02}-{day:02}");
    println!("{} {name} ({month}/{day})", "Added".green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holidays_core::HolidayError;

    fn holidays_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("holidays.json");
        HolidayFile::default().save(&path).unwrap();
        path
    }

    #[test]
    fn adds_and_approves() {
        let dir = tempfile::tempdir().unwrap();
        let path = holidays_file(dir.path());

        run(&path, "Leap Day".into(), 2, 29, None, Some(1)).unwrap();

        let file = HolidayFile::load(&path).unwrap();
        assert_eq!(file.manual_holidays.len(), 1);
        assert_eq!(file.manual_holidays[0].reminder_days, Some(1));
        assert_eq!(file.approved_holidays, vec!["Leap Day".to_string()]);
    }

    #[test]
    fn rejects_invalid_dates_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = holidays_file(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();

        for (month, day) in [(2, 30), (13, 1)] {
            let err = run(&path, "Nope".into(), month, day, None, None).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<HolidayError>(),
                Some(HolidayError::InvalidDate { .. })
            ));
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = holidays_file(dir.path());

        run(&path, "Festivus".into(), 12, 23, None, None).unwrap();
        let err = run(&path, "Festivus".into(), 12, 24, None, None).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<HolidayError>(),
            Some(HolidayError::HolidayExists(_))
        ));
    }
}
