//! Date-grid arithmetic for a Monday-first month layout.

use crate::models::DisplayCursor;
use chrono::{Datelike, Local, NaiveDate, Weekday};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Source of the current date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Probes day numbers until the date stops being valid for the month.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    if month0 > 11 {
        return 0;
    }
    (1..=31)
        .take_while(|day| NaiveDate::from_ymd_opt(year, month0 + 1, *day).is_some())
        .count() as u32
}

pub fn month_days(year: i32, month0: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month0))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month0 + 1, day))
        .collect()
}

/// Leading blank cells before day 1 in a Monday-first grid.
pub fn first_weekday_offset(year: i32, month0: u32) -> u32 {
    if month0 > 11 {
        return 0;
    }
    match NaiveDate::from_ymd_opt(year, month0 + 1, 1) {
        Some(first) => {
            let sunday_first = first.weekday().num_days_from_sunday();
            (sunday_first + 6) % 7
        }
        None => 0,
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_same_month(a: DisplayCursor, b: DisplayCursor) -> bool {
    a.year == b.year && a.month0 == b.month0
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES.get(month0 as usize).copied().unwrap_or("?")
}

pub fn month_title(cursor: DisplayCursor) -> String {
    format!("{} {}", month_name(cursor.month0), cursor.year)
}

pub fn short_label(cursor: DisplayCursor) -> String {
    let name = month_name(cursor.month0);
    format!("{} {}", name.get(..3).unwrap_or(name), cursor.year)
}
