//! Domain model types

pub mod catalogue;
pub mod field;
pub mod raw_table;
pub mod tidy_record;

pub use catalogue::{Catalogue, CategorySpec, FieldSpec};
pub use field::{FieldMapping, LogicalField, MatchSource, ResolvedColumn};
pub use raw_table::RawTable;
pub use tidy_record::{SkippedRow, TidyBatch, TidyRecord};
