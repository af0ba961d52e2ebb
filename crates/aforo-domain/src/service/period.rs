//! Period (first-of-month date) from raw year and month cells

use chrono::NaiveDate;
use thiserror::Error;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Spanish month names, fixed and exhaustive
pub const MONTH_NAMES: [(&str, u32); 12] = [
    ("ENERO", 1),
    ("FEBRERO", 2),
    ("MARZO", 3),
    ("ABRIL", 4),
    ("MAYO", 5),
    ("JUNIO", 6),
    ("JULIO", 7),
    ("AGOSTO", 8),
    ("SEPTIEMBRE", 9),
    ("OCTUBRE", 10),
    ("NOVIEMBRE", 11),
    ("DICIEMBRE", 12),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("year '{0}' is not a number")]
    InvalidYear(String),

    #[error("year {0} outside {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange(i32),

    #[error("month '{0}' is not recognized")]
    InvalidMonth(String),
}

/// Month number from `"3"`, `"03"`, `"3.0"` or a month name in any case
pub fn parse_month(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if let Some(n) = parse_whole_number(s) {
        return u32::try_from(n).ok().filter(|m| (1..=12).contains(m));
    }
    let upper = s.to_uppercase();
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, month)| *month)
}

pub fn parse_year(raw: &str) -> Result<i32, PeriodError> {
    let year = parse_whole_number(raw.trim())
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| PeriodError::InvalidYear(raw.to_string()))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(PeriodError::YearOutOfRange(year));
    }
    Ok(year)
}

/// First day of the month described by `year` and `month`
pub fn resolve_period(year: &str, month: &str) -> Result<NaiveDate, PeriodError> {
    let year = parse_year(year)?;
    let month_num = parse_month(month).ok_or_else(|| PeriodError::InvalidMonth(month.to_string()))?;
    NaiveDate::from_ymd_opt(year, month_num, 1)
        .ok_or_else(|| PeriodError::InvalidMonth(month.to_string()))
}

/// Integers, also written as floats with no fractional part ("2024.0")
fn parse_whole_number(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f: f64 = s.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}
