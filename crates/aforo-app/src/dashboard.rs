//! Dashboard Service - read-only views over one loaded dataset
//!
//! Everything here is a pure function of the shared `Dataset`, so one
//! instance serves concurrent requests without locking.

use std::path::Path;
use std::sync::Arc;

use aforo_domain::forecast::{run_forecast, series_from_totals, ForecastOutcome, ForecastProvider};
use aforo_domain::model::{FieldMapping, LogicalField, ResolvedColumn, SkippedRow, TidyRecord};
use aforo_domain::service::{
    available_years, extremes, filter_by_year, parse_year, totals_by_category, totals_by_entity,
    totals_by_period, CategoryTotal, EntityTotal, Extremes, PeriodTotal,
};
use aforo_infra::forecast::LinearTrendForecaster;
use aforo_types::Result;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsView {
    pub year: Option<i32>,
    /// Every melted category, zero when it has no observations
    pub totals: Vec<CategoryTotal>,
    pub grand_total: f64,
    pub extremes: Option<Extremes>,
    /// Per toll station, only stations with observations in the year
    pub by_entity: Vec<EntityTotal>,
}

/// Wide rows limited to year, month and category columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub year: Option<i32>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub year: Option<i32>,
    pub horizon: usize,
    /// Observed monthly totals the forecast was fitted on
    pub history: Vec<PeriodTotal>,
    pub forecast: ForecastOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnsView {
    pub resolved: Vec<ResolvedColumn>,
    pub unresolved: Vec<String>,
}

impl ColumnsView {
    pub fn from_mapping(mapping: &FieldMapping) -> Self {
        Self {
            resolved: mapping.resolved().to_vec(),
            unresolved: mapping.unresolved().iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityView {
    pub source_rows: usize,
    pub records: usize,
    pub dropped_cells: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

pub struct DashboardService {
    dataset: Arc<Dataset>,
    provider: Box<dyn ForecastProvider + Send + Sync>,
    horizon: usize,
}

impl DashboardService {
    pub fn new(
        dataset: Arc<Dataset>,
        provider: Box<dyn ForecastProvider + Send + Sync>,
        horizon: usize,
    ) -> Self {
        Self {
            dataset,
            provider,
            horizon,
        }
    }

    /// Load the configured dataset and serve it with the linear-trend forecaster
    pub fn open(config: &Config, path: Option<&Path>) -> Result<Self> {
        let dataset = Dataset::from_config(config, path)?;
        Ok(Self::new(
            Arc::new(dataset),
            Box::new(LinearTrendForecaster::default()),
            config.forecast_horizon,
        ))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn default_horizon(&self) -> usize {
        self.horizon
    }

    pub fn years(&self) -> Vec<i32> {
        available_years(self.dataset.records())
    }

    /// Tidy records of one year, or all of them
    pub fn records(&self, year: Option<i32>) -> Vec<TidyRecord> {
        match year {
            Some(year) => filter_by_year(self.dataset.records(), year),
            None => self.dataset.records().to_vec(),
        }
    }

    pub fn totals(&self, year: Option<i32>) -> TotalsView {
        let records = self.records(year);
        let observed = totals_by_category(&records);
        let totals: Vec<CategoryTotal> = self
            .dataset
            .category_labels()
            .into_iter()
            .map(|label| CategoryTotal {
                category: label.to_string(),
                total: observed
                    .iter()
                    .find(|t| t.category == label)
                    .map(|t| t.total)
                    .unwrap_or(0.0),
            })
            .collect();

        TotalsView {
            year,
            grand_total: totals.iter().map(|t| t.total).sum(),
            extremes: extremes(&totals),
            by_entity: totals_by_entity(&records),
            totals,
        }
    }

    pub fn table(&self, year: Option<i32>) -> TableView {
        let table = self.dataset.table();
        let mapping = self.dataset.mapping();

        let mut columns: Vec<&str> = Vec::new();
        for field in [LogicalField::Year, LogicalField::Month] {
            if let Some(column) = mapping.get(&field) {
                columns.push(column);
            }
        }
        columns.extend(mapping.category_columns().map(|(_, column)| column));

        let indices: Vec<Option<usize>> = columns.iter().map(|c| table.column_index(c)).collect();
        let year_idx = mapping
            .get(&LogicalField::Year)
            .and_then(|c| table.column_index(c));

        let rows = table
            .rows()
            .iter()
            .filter(|row| match (year, year_idx) {
                (Some(year), Some(idx)) => row
                    .get(idx)
                    .and_then(|v| parse_year(v).ok())
                    .is_some_and(|y| y == year),
                _ => true,
            })
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        TableView {
            year,
            columns: columns.into_iter().map(String::from).collect(),
            rows,
        }
    }

    /// Forecast of total monthly traffic; unavailable rather than invented
    pub fn forecast(&self, year: Option<i32>, horizon: Option<usize>) -> ForecastView {
        let horizon = horizon.unwrap_or(self.horizon);
        let history = totals_by_period(&self.records(year));
        let series = series_from_totals(&history);

        let forecast = run_forecast(self.provider.as_ref(), &series, horizon);
        if let ForecastOutcome::Unavailable { reason } = &forecast {
            warn!(?year, horizon, %reason, "forecast unavailable");
        }

        ForecastView {
            year,
            horizon,
            history,
            forecast,
        }
    }

    pub fn columns(&self) -> ColumnsView {
        ColumnsView::from_mapping(self.dataset.mapping())
    }

    pub fn quality(&self) -> QualityView {
        let batch = self.dataset.batch();
        QualityView {
            source_rows: self.dataset.table().row_count(),
            records: batch.records.len(),
            dropped_cells: batch.dropped_cells,
            skipped_rows: batch.skipped_rows.clone(),
        }
    }
}
