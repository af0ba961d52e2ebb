//! Domain services

pub mod aggregation;
pub mod column_resolver;
pub mod period;
pub mod tidy_reshaper;

pub use aggregation::{
    available_years, extremes, filter_by_year, regroup, totals_by_category, totals_by_entity,
    totals_by_period, CategoryTotal, EntityTotal, Extremes, PeriodTotal,
};
pub use column_resolver::resolve_columns;
pub use period::{parse_month, parse_year, resolve_period, PeriodError};
pub use tidy_reshaper::{reshape, TidyRecords, TidyReshaper};
