//! Wide-to-long reshape ("melt") of a resolved source table
//!
//! Output order is source-row order, then configured category order within a
//! row. Rows whose period cannot be built are skipped as a whole and
//! reported; empty, non-numeric and non-positive cells are dropped and
//! counted.

use chrono::NaiveDate;

use aforo_types::Result;

use super::period::resolve_period;
use crate::model::{FieldMapping, LogicalField, RawTable, SkippedRow, TidyBatch, TidyRecord};

/// Reshaper bound to one table and its mapping
#[derive(Debug, Clone)]
pub struct TidyReshaper<'a> {
    table: &'a RawTable,
    entity_idx: usize,
    year_idx: usize,
    month_idx: usize,
    /// (label, column index) in melt order
    categories: Vec<(String, usize)>,
}

impl<'a> TidyReshaper<'a> {
    /// Fails with `UnresolvedField` when entity, year or month has no column.
    ///
    /// Category fields in `melt` that the mapping did not resolve are left out.
    pub fn new(table: &'a RawTable, mapping: &FieldMapping, melt: &[LogicalField]) -> Result<Self> {
        let index_of = |field: &LogicalField| -> Result<usize> {
            let column = mapping.require(field)?;
            table
                .column_index(column)
                .ok_or_else(|| aforo_types::Error::UnresolvedField {
                    field: field.to_string(),
                })
        };

        let entity_idx = index_of(&LogicalField::Entity)?;
        let year_idx = index_of(&LogicalField::Year)?;
        let month_idx = index_of(&LogicalField::Month)?;

        let categories = melt
            .iter()
            .filter_map(|field| match field {
                LogicalField::Category(label) => mapping
                    .get(field)
                    .and_then(|column| table.column_index(column))
                    .map(|idx| (label.clone(), idx)),
                _ => None,
            })
            .collect();

        Ok(Self {
            table,
            entity_idx,
            year_idx,
            month_idx,
            categories,
        })
    }

    /// A fresh lazy pass over the table; every call yields the same sequence
    pub fn records(&self) -> TidyRecords<'_, 'a> {
        TidyRecords {
            reshaper: self,
            row: 0,
            next_category: 0,
            period: None,
            skipped_rows: Vec::new(),
            dropped_cells: 0,
        }
    }

    pub fn collect_batch(&self) -> TidyBatch {
        let mut iter = self.records();
        let records: Vec<TidyRecord> = iter.by_ref().collect();
        TidyBatch {
            records,
            skipped_rows: iter.skipped_rows,
            dropped_cells: iter.dropped_cells,
        }
    }
}

/// Resolve, then reshape in one call
pub fn reshape(table: &RawTable, mapping: &FieldMapping, melt: &[LogicalField]) -> Result<TidyBatch> {
    Ok(TidyReshaper::new(table, mapping, melt)?.collect_batch())
}

/// Lazy iterator over tidy records, carrying the skip report so far
#[derive(Debug)]
pub struct TidyRecords<'r, 'a> {
    reshaper: &'r TidyReshaper<'a>,
    row: usize,
    next_category: usize,
    /// Period of the current row, once resolved
    period: Option<NaiveDate>,
    skipped_rows: Vec<SkippedRow>,
    dropped_cells: usize,
}

impl TidyRecords<'_, '_> {
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped_rows
    }

    pub fn dropped_cells(&self) -> usize {
        self.dropped_cells
    }

    fn advance_row(&mut self) {
        self.row += 1;
        self.next_category = 0;
        self.period = None;
    }
}

impl Iterator for TidyRecords<'_, '_> {
    type Item = TidyRecord;

    fn next(&mut self) -> Option<TidyRecord> {
        let reshaper = self.reshaper;
        loop {
            let cells = reshaper.table.rows().get(self.row)?;

            let period = match self.period {
                Some(period) => period,
                None => {
                    let year = cells.get(reshaper.year_idx).map(String::as_str).unwrap_or("");
                    let month = cells.get(reshaper.month_idx).map(String::as_str).unwrap_or("");
                    match resolve_period(year, month) {
                        Ok(period) => {
                            self.period = Some(period);
                            period
                        }
                        Err(e) => {
                            self.skipped_rows.push(SkippedRow {
                                row: self.row + 1,
                                year: year.to_string(),
                                month: month.to_string(),
                                reason: e.to_string(),
                            });
                            self.advance_row();
                            continue;
                        }
                    }
                }
            };

            let Some((label, idx)) = reshaper.categories.get(self.next_category) else {
                self.advance_row();
                continue;
            };
            self.next_category += 1;

            match cells.get(*idx).and_then(|v| parse_count(v)) {
                Some(count) => {
                    let entity_id = cells
                        .get(reshaper.entity_idx)
                        .cloned()
                        .unwrap_or_default();
                    return Some(TidyRecord {
                        entity_id,
                        period,
                        category: label.clone(),
                        count,
                    });
                }
                None => self.dropped_cells += 1,
            }
        }
    }
}

/// Positive count from a cell; `None` for missing, non-numeric or <= 0
fn parse_count(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || matches!(s.to_lowercase().as_str(), "nan" | "na" | "null" | "-") {
        return None;
    }
    let value: f64 = s.replace(',', "").parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
