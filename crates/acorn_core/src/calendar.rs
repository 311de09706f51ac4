use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::TodoError;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day used to index the task store. Always date-only, so any two
/// instants on the same day resolve to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for DayKey {
    fn from(instant: NaiveDateTime) -> Self {
        Self(instant.date())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_| TodoError::InvalidDayKey {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for DayKey {
    type Error = TodoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day_of_month: u32,
    pub weekday_label: &'static str,
    pub date: NaiveDate,
}

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        let weekday = date.weekday().num_days_from_sunday() as usize;
        Self {
            day_of_month: date.day(),
            weekday_label: WEEKDAY_LABELS[weekday],
            date,
        }
    }

    pub fn key(&self) -> DayKey {
        DayKey(self.date)
    }
}

/// Which days the picker offers. The two policies are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarWindow {
    Fixed { start: NaiveDate, end: NaiveDate },
    Rolling { radius: u32 },
}

impl CalendarWindow {
    pub const DEFAULT_RADIUS: u32 = 2;
    /// Widest rolling window offered, a year either side of today.
    pub const MAX_RADIUS: u32 = 366;

    pub fn days(&self, today: NaiveDate) -> Vec<CalendarDay> {
        match *self {
            CalendarWindow::Fixed { start, end } => days_in_range(start, end),
            CalendarWindow::Rolling { radius } => days_around(today, radius),
        }
    }
}

impl Default for CalendarWindow {
    fn default() -> Self {
        NaiveDate::from_ymd_opt(2025, 5, 1)
            .zip(NaiveDate::from_ymd_opt(2025, 7, 31))
            .map(|(start, end)| CalendarWindow::Fixed { start, end })
            .unwrap_or(CalendarWindow::Rolling {
                radius: Self::DEFAULT_RADIUS,
            })
    }
}

/// Every day from `start` through `end`, both inclusive. Empty when `end < start`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<CalendarDay> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(CalendarDay::new(current));
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

pub fn days_around(today: NaiveDate, radius: u32) -> Vec<CalendarDay> {
    let span = Duration::days(i64::from(radius));
    let start = today.checked_sub_signed(span).unwrap_or(NaiveDate::MIN);
    let end = today.checked_add_signed(span).unwrap_or(NaiveDate::MAX);
    days_in_range(start, end)
}

/// The generated day sequence. Built once at start-up and handed to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    days: Vec<CalendarDay>,
}

impl Calendar {
    pub fn new(window: CalendarWindow, today: NaiveDate) -> Self {
        Self {
            days: window.days(today),
        }
    }

    /// Sorted and deduplicated by date, so lookups can binary search.
    pub fn from_days(mut days: Vec<CalendarDay>) -> Self {
        days.sort_by_key(|day| day.date);
        days.dedup_by_key(|day| day.date);
        Self { days }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn position(&self, key: DayKey) -> Option<usize> {
        self.days
            .binary_search_by_key(&key.date(), |day| day.date)
            .ok()
    }

    pub fn contains(&self, key: DayKey) -> bool {
        self.position(key).is_some()
    }

    /// Today when it falls inside the range, otherwise the first day.
    pub fn default_selection(&self, today: NaiveDate) -> Option<DayKey> {
        let today = DayKey(today);
        if self.contains(today) {
            return Some(today);
        }
        self.days.first().map(CalendarDay::key)
    }
}
