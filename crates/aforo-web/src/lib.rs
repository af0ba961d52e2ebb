//! JSON HTTP API over one loaded dataset

pub mod routes;

pub use routes::router;
