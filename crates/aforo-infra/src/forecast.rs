//! Built-in forecast provider: ordinary least-squares linear trend
//!
//! The fit is delegated to `linregress` (`count ~ month`), where `month` is
//! the offset from the first observation, so gaps in the series keep their
//! spacing. Bounds are the regression prediction interval
//! `ŷ ± t·s·√(1 + 1/n + (x - x̄)²/Sxx)` with the Student-t quantile from
//! `statrs`, clamped at zero.

use aforo_domain::forecast::{months_after, ForecastError, ForecastPoint, ForecastProvider, SeriesPoint};
use chrono::{Datelike, NaiveDate};
use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided coverage of the prediction interval
pub const DEFAULT_LEVEL: f64 = 0.8;

const MIN_POINTS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct LinearTrendForecaster {
    level: f64,
}

impl Default for LinearTrendForecaster {
    fn default() -> Self {
        Self { level: DEFAULT_LEVEL }
    }
}

impl ForecastProvider for LinearTrendForecaster {
    fn forecast(&self, series: &[SeriesPoint], horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError> {
        let n = series.len();
        if n < MIN_POINTS {
            return Err(ForecastError::InsufficientData {
                needed: MIN_POINTS,
                got: n,
            });
        }

        let origin = series[0].period;
        let xs: Vec<f64> = series.iter().map(|p| month_offset(origin, p.period) as f64).collect();
        let ys: Vec<f64> = series.iter().map(|p| p.value).collect();

        let nf = n as f64;
        let x_mean = xs.iter().sum::<f64>() / nf;
        let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return Err(ForecastError::Model("all observations share one period".to_string()));
        }

        let data = RegressionDataBuilder::new()
            .build_from(vec![("count", ys), ("month", xs.clone())])
            .map_err(model_error)?;
        let model = FormulaRegressionBuilder::new()
            .data(&data)
            .formula("count ~ month")
            .fit()
            .map_err(model_error)?;

        let last = series[n - 1].period;
        let last_x = xs[n - 1];
        let future_xs: Vec<f64> = (1..=horizon).map(|k| last_x + k as f64).collect();
        let values = model
            .predict(vec![("month", future_xs.clone())])
            .map_err(model_error)?;

        let t = StudentsT::new(0.0, 1.0, nf - 2.0)
            .map_err(model_error)?
            .inverse_cdf(0.5 + self.level / 2.0);
        let s2 = model.scale();

        (1..=horizon)
            .zip(future_xs.into_iter().zip(values))
            .map(|(k, (x, value))| {
                let period = u32::try_from(k)
                    .ok()
                    .and_then(|k| months_after(last, k))
                    .ok_or_else(|| ForecastError::Model("forecast period out of range".to_string()))?;
                let half = t * (s2 * (1.0 + 1.0 / nf + (x - x_mean).powi(2) / sxx)).sqrt();
                Ok(ForecastPoint {
                    period,
                    value: value.max(0.0),
                    lower: (value - half).max(0.0),
                    upper: (value + half).max(0.0),
                })
            })
            .collect()
    }
}

fn model_error(e: impl std::fmt::Display) -> ForecastError {
    ForecastError::Model(e.to_string())
}

fn month_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}
