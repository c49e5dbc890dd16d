use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted on-site flags keyed by `YYYY-MM-DD`. An absent key means `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AttendanceRecord {
    pub days: BTreeMap<String, bool>,
}

impl AttendanceRecord {
    pub fn get(&self, key: &str) -> bool {
        self.days.get(key).copied().unwrap_or(false)
    }
}

/// The month shown in the grid. `month0` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCursor {
    pub year: i32,
    pub month0: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountScope {
    #[default]
    Month,
    AllTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "prev", alias = "previous")]
    Previous,
    #[serde(rename = "next")]
    Next,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub key: String,
    pub day: u32,
    /// Monday-first, 0 = Monday .. 6 = Sunday.
    pub weekday_index: u32,
    pub is_weekend: bool,
    pub is_today: bool,
    pub is_on_site: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub year: i32,
    pub month0: u32,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub cursor: DisplayCursor,
    pub title: String,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub on_site_count: usize,
    pub scope: CountScope,
    pub quota: Option<u32>,
    pub trend: Vec<MonthCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Opened(DisplayCursor),
    Toggled { key: String, on_site: bool },
    Navigated(DisplayCursor),
    Closed,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayFlagResponse {
    pub date: String,
    pub on_site: bool,
}
