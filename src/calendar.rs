use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Map a spreadsheet weekday number (1 = Monday … 7 = Sunday) to a `Weekday`.
pub fn weekday_from_number(number: u8) -> Option<Weekday> {
    match number {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_number(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// First calendar date on or after `start` that falls on `target`.
///
/// Zero look-ahead: when `start` already falls on `target`, `start` itself is
/// the first occurrence rather than the same weekday one week later.
pub fn first_on_or_after(start: NaiveDate, target: Weekday) -> NaiveDate {
    let days_ahead =
        (target.num_days_from_monday() + 7 - start.weekday().num_days_from_monday()) % 7;
    start + Duration::days(i64::from(days_ahead))
}

/// Expand a first occurrence into `weeks` dates spaced exactly seven days apart.
pub fn weekly_occurrences(first: NaiveDate, weeks: u32) -> Vec<NaiveDate> {
    (0..weeks)
        .map(|week| first + Duration::weeks(i64::from(week)))
        .collect()
}
