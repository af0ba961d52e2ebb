//! Long-format observations produced by the reshaper

use aforo_types::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation: a station's count for one vehicle category in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRecord {
    pub entity_id: String,
    /// First day of the month
    pub period: NaiveDate,
    pub category: String,
    /// Always > 0
    pub count: f64,
}

/// A source row dropped because its period could not be built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub year: String,
    pub month: String,
    pub reason: String,
}

impl SkippedRow {
    pub fn error(&self) -> Error {
        Error::InvalidPeriod {
            row: self.row,
            reason: self.reason.clone(),
        }
    }
}

/// Materialized result of one reshape, with its skip report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TidyBatch {
    pub records: Vec<TidyRecord>,
    pub skipped_rows: Vec<SkippedRow>,
    /// Cells that were empty, non-numeric or not positive
    pub dropped_cells: usize,
}

impl TidyBatch {
    pub fn skip_count(&self) -> usize {
        self.skipped_rows.len()
    }
}
