use chrono::{Datelike, NaiveDate};

use crate::models::Holiday;

pub const BIRTHDAY_ICON: &str = "🎂";
pub const CHRISTMAS_ICON: &str = "🎄";

// Feb 29 falls back to Feb 28 outside leap years
pub fn birthday_in(birthday: NaiveDate, year: i32) -> NaiveDate {
    birthday
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(birthday)
}

pub fn birthday_holiday(parent_user_id: &str, kid_name: &str, birthday: NaiveDate, year: i32) -> Holiday {
    Holiday {
        parent_user_id: parent_user_id.to_string(),
        name: format!("{}'s Birthday", kid_name),
        date: birthday_in(birthday, year),
        recurring: true,
        icon: BIRTHDAY_ICON.to_string(),
    }
}

pub fn christmas(parent_user_id: &str, year: i32) -> Holiday {
    Holiday {
        parent_user_id: parent_user_id.to_string(),
        name: format!("Christmas {}", year),
        date: NaiveDate::from_ymd_opt(year, 12, 25).unwrap_or_default(),
        recurring: false,
        icon: CHRISTMAS_ICON.to_string(),
    }
}

// Regular add: birthday this year and next. Onboarding: this year's birthday plus Christmas.
pub fn derived_holidays(
    parent_user_id: &str,
    kid_name: &str,
    birthday: Option<NaiveDate>,
    today: NaiveDate,
    onboarding: bool,
) -> Vec<Holiday> {
    let year = today.year();
    let mut holidays = Vec::new();

    if let Some(birthday) = birthday {
        holidays.push(birthday_holiday(parent_user_id, kid_name, birthday, year));
        if !onboarding {
            holidays.push(birthday_holiday(parent_user_id, kid_name, birthday, year + 1));
        }
    }

    if onboarding {
        holidays.push(christmas(parent_user_id, year));
    }

    holidays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn regular_add_schedules_two_birthdays() {
        let holidays = derived_holidays("u1", "Emma", Some(date(2019, 4, 3)), date(2025, 10, 1), false);
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].name, "Emma's Birthday");
        assert_eq!(holidays[0].date, date(2025, 4, 3));
        assert_eq!(holidays[1].date, date(2026, 4, 3));
        assert!(holidays.iter().all(|h| h.recurring && h.icon == BIRTHDAY_ICON));
    }

    #[test]
    fn onboarding_adds_christmas() {
        let holidays = derived_holidays("u1", "Leo", Some(date(2020, 1, 15)), date(2025, 3, 9), true);
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].date, date(2025, 1, 15));
        assert_eq!(holidays[1].name, "Christmas 2025");
        assert_eq!(holidays[1].date, date(2025, 12, 25));
        assert!(!holidays[1].recurring);
    }

    #[test]
    fn no_birthday_means_no_birthday_entries() {
        assert!(derived_holidays("u1", "Ava", None, date(2025, 3, 9), false).is_empty());

        let holidays = derived_holidays("u1", "Ava", None, date(2025, 3, 9), true);
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].icon, CHRISTMAS_ICON);
    }

    #[test]
    fn leap_day_birthdays_fall_back() {
        let leap = date(2020, 2, 29);
        assert_eq!(birthday_in(leap, 2025), date(2025, 2, 28));
        assert_eq!(birthday_in(leap, 2028), date(2028, 2, 29));
    }
}
