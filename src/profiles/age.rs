use chrono::{Datelike, NaiveDate};

/// Parses a birthday such as `MM/DD/YYYY` and returns the age in whole years.
///
/// Accepts `/`, `-` or `.` separators and two-digit years (pivot at 50).
/// When the first part cannot be a month the input is read as `DD/MM/YYYY`.
/// Returns `None` for unparseable dates and ages outside `0..120`.
pub fn age_from_birthday(birthday: &str, today: NaiveDate) -> Option<u32> {
    let trimmed = birthday.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<u32> = trimmed
        .split(['/', '-', '.'])
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() < 3 {
        return None;
    }
    let (mut month, mut day) = (parts[0], parts[1]);
    if month > 12 {
        std::mem::swap(&mut month, &mut day);
    }
    let year = expand_year(parts[2]);
    let birth = NaiveDate::from_ymd_opt(year, month, day)?;

    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok().filter(|age| *age < 120)
}

fn expand_year(year: u32) -> i32 {
    let year = year as i32;
    match year {
        0..=49 => 2000 + year,
        50..=99 => 1900 + year,
        _ => year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn counts_whole_years() {
        assert_eq!(age_from_birthday("10/18/2006", today()), Some(20));
        assert_eq!(age_from_birthday("10/19/2006", today()), Some(19));
        assert_eq!(age_from_birthday("03-02-2007", today()), Some(19));
    }

    #[test]
    fn expands_two_digit_years() {
        assert_eq!(age_from_birthday("1.1.05", today()), Some(21));
        assert_eq!(age_from_birthday("1/1/99", today()), Some(27));
    }

    #[test]
    fn swaps_day_first_dates() {
        assert_eq!(age_from_birthday("25/12/2004", today()), Some(21));
    }

    #[test]
    fn rejects_garbage_and_future_dates() {
        assert_eq!(age_from_birthday("", today()), None);
        assert_eq!(age_from_birthday("soon", today()), None);
        assert_eq!(age_from_birthday("12/2004", today()), None);
        assert_eq!(age_from_birthday("02/30/2004", today()), None);
        assert_eq!(age_from_birthday("01/01/2030", today()), None);
        assert_eq!(age_from_birthday("01/01/1850", today()), None);
    }
}
