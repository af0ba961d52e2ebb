//! Application service layer - config, dataset initialization, dashboard queries, export

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod export;
