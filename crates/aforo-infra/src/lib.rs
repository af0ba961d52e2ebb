//! Infrastructure layer - file formats and the built-in forecast provider

pub mod catalogue_loader;
pub mod csv_source;
pub mod forecast;
pub mod tidy_writer;
