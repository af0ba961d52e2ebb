//! Read-only aggregation views over tidy records

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::TidyRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTotal {
    pub entity_id: String,
    pub total: f64,
}

/// Busiest and quietest vehicle category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub busiest: CategoryTotal,
    pub quietest: CategoryTotal,
}

/// Sorted, unique years present in the records
pub fn available_years(records: &[TidyRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.period.year()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

pub fn filter_by_year(records: &[TidyRecord], year: i32) -> Vec<TidyRecord> {
    records
        .iter()
        .filter(|r| r.period.year() == year)
        .cloned()
        .collect()
}

/// Sum of counts per category, in first-seen order
pub fn totals_by_category(records: &[TidyRecord]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for r in records {
        match index.get(r.category.as_str()) {
            Some(&i) => totals[i].total += r.count,
            None => {
                index.insert(&r.category, totals.len());
                totals.push(CategoryTotal {
                    category: r.category.clone(),
                    total: r.count,
                });
            }
        }
    }
    totals
}

/// Sum of counts per period, ascending. This is the forecast input series.
pub fn totals_by_period(records: &[TidyRecord]) -> Vec<PeriodTotal> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in records {
        *sums.entry(r.period).or_insert(0.0) += r.count;
    }
    sums.into_iter()
        .map(|(period, total)| PeriodTotal { period, total })
        .collect()
}

/// Sum of counts per station, sorted by station
pub fn totals_by_entity(records: &[TidyRecord]) -> Vec<EntityTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        *sums.entry(r.entity_id.as_str()).or_insert(0.0) += r.count;
    }
    sums.into_iter()
        .map(|(entity_id, total)| EntityTotal {
            entity_id: entity_id.to_string(),
            total,
        })
        .collect()
}

/// Busiest and quietest category; ties keep the earlier category
pub fn extremes(totals: &[CategoryTotal]) -> Option<Extremes> {
    let first = totals.first()?;
    let mut busiest = first;
    let mut quietest = first;
    for t in &totals[1..] {
        if t.total > busiest.total {
            busiest = t;
        }
        if t.total < quietest.total {
            quietest = t;
        }
    }
    Some(Extremes {
        busiest: busiest.clone(),
        quietest: quietest.clone(),
    })
}

/// Sum of counts per (entity, period, category)
pub fn regroup(records: &[TidyRecord]) -> BTreeMap<(String, NaiveDate, String), f64> {
    let mut sums = BTreeMap::new();
    for r in records {
        *sums
            .entry((r.entity_id.clone(), r.period, r.category.clone()))
            .or_insert(0.0) += r.count;
    }
    sums
}
