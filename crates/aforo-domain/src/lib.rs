//! Domain layer for toll-booth vehicle counts
//!
//! Pure functions and types only: no file access, no logging.

pub mod forecast;
pub mod model;
pub mod service;
