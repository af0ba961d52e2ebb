//! Forecast provider contract
//!
//! The domain only knows the data shape a provider consumes and returns.
//! Any model (built-in or external) plugs in behind `ForecastProvider`.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::aggregation::PeriodTotal;

/// One observed (period, value) pair of the input series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: NaiveDate,
    pub value: f64,
}

/// Point forecast with its confidence bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Longest forecast any caller may request, in months
pub const MAX_HORIZON: usize = 120;

#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("series is empty")]
    EmptySeries,

    #[error("series is not sorted by period (at {0})")]
    Unsorted(NaiveDate),

    #[error("horizon must be at least 1")]
    ZeroHorizon,

    #[error("horizon {0} exceeds the maximum of {max} months", max = MAX_HORIZON)]
    HorizonTooLong(usize),

    #[error("need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("model failed: {0}")]
    Model(String),
}

pub trait ForecastProvider {
    /// `series` is ascending by period. Returns exactly `horizon` points.
    fn forecast(&self, series: &[SeriesPoint], horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError>;
}

/// What the presentation layer gets: numbers, or a visible reason why not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ForecastOutcome {
    Available { points: Vec<ForecastPoint> },
    Unavailable { reason: String },
}

impl ForecastOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ForecastOutcome::Available { .. })
    }

    /// For consumers that cannot render a reason in place of numbers
    pub fn into_points(self) -> aforo_types::Result<Vec<ForecastPoint>> {
        match self {
            ForecastOutcome::Available { points } => Ok(points),
            ForecastOutcome::Unavailable { reason } => Err(aforo_types::Error::ForecastUnavailable(reason)),
        }
    }
}

/// Validate the series, call the provider, and never substitute made-up data
pub fn run_forecast(
    provider: &dyn ForecastProvider,
    series: &[SeriesPoint],
    horizon: usize,
) -> ForecastOutcome {
    match validate(series, horizon).and_then(|_| provider.forecast(series, horizon)) {
        Ok(points) if points.len() == horizon => ForecastOutcome::Available { points },
        Ok(points) => ForecastOutcome::Unavailable {
            reason: format!("provider returned {} points, expected {}", points.len(), horizon),
        },
        Err(e) => ForecastOutcome::Unavailable {
            reason: e.to_string(),
        },
    }
}

pub fn series_from_totals(totals: &[PeriodTotal]) -> Vec<SeriesPoint> {
    totals
        .iter()
        .map(|t| SeriesPoint {
            period: t.period,
            value: t.total,
        })
        .collect()
}

/// First day of the month `n` months after `period`
pub fn months_after(period: NaiveDate, n: u32) -> Option<NaiveDate> {
    period.checked_add_months(Months::new(n))
}

fn validate(series: &[SeriesPoint], horizon: usize) -> Result<(), ForecastError> {
    if horizon == 0 {
        return Err(ForecastError::ZeroHorizon);
    }
    if horizon > MAX_HORIZON {
        return Err(ForecastError::HorizonTooLong(horizon));
    }
    if series.is_empty() {
        return Err(ForecastError::EmptySeries);
    }
    if let Some(w) = series.windows(2).find(|w| w[0].period >= w[1].period) {
        return Err(ForecastError::Unsorted(w[1].period));
    }
    Ok(())
}
