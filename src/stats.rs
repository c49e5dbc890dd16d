use crate::calendar::{date_key, month_days, short_label};
use crate::models::{AttendanceRecord, CountScope, DisplayCursor, MonthCount};
use crate::store::total_on_site;

pub const DEFAULT_TREND_MONTHS: usize = 6;

pub fn count_on_site(record: &AttendanceRecord, year: i32, month0: u32) -> usize {
    month_days(year, month0)
        .into_iter()
        .filter(|date| record.get(&date_key(*date)))
        .count()
}

/// One point per month, oldest first, ending at `cursor`'s own month.
pub fn trailing_monthly_counts(
    record: &AttendanceRecord,
    cursor: DisplayCursor,
    window: usize,
) -> Vec<MonthCount> {
    let mut points = Vec::with_capacity(window);
    for offset in (0..window).rev() {
        let month = cursor.shifted(-(offset as i32));
        points.push(MonthCount {
            year: month.year,
            month0: month.month0,
            label: short_label(month),
            count: count_on_site(record, month.year, month.month0),
        });
    }
    points
}

pub fn counter(record: &AttendanceRecord, cursor: DisplayCursor, scope: CountScope) -> usize {
    match scope {
        CountScope::Month => count_on_site(record, cursor.year, cursor.month0),
        CountScope::AllTime => total_on_site(record),
    }
}
