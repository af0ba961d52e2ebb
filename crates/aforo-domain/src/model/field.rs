//! Logical fields and their resolution to physical columns

use aforo_types::{Error, Result};
use serde::Serialize;

/// A fixed domain concept that different exports spell differently
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum LogicalField {
    /// Toll station or source identity
    Entity,
    Year,
    Month,
    /// Vehicle category, by its logical label
    Category(String),
}

impl LogicalField {
    pub fn category(label: impl Into<String>) -> Self {
        LogicalField::Category(label.into())
    }
}

impl std::fmt::Display for LogicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalField::Entity => write!(f, "ENTITY"),
            LogicalField::Year => write!(f, "YEAR"),
            LogicalField::Month => write!(f, "MONTH"),
            LogicalField::Category(label) => write!(f, "{}", label),
        }
    }
}

impl From<LogicalField> for String {
    fn from(field: LogicalField) -> Self {
        field.to_string()
    }
}

/// How a column was picked for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Literal candidate name, case-sensitive
    Exact,
    /// Case-insensitive keyword substring
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub field: LogicalField,
    pub column: String,
    pub source: MatchSource,
}

/// Field → column mapping for one source table.
///
/// Built only by the column resolver, so every column is present in the
/// header it was resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    resolved: Vec<ResolvedColumn>,
    unresolved: Vec<LogicalField>,
}

impl FieldMapping {
    pub(crate) fn from_parts(resolved: Vec<ResolvedColumn>, unresolved: Vec<LogicalField>) -> Self {
        Self {
            resolved,
            unresolved,
        }
    }

    pub fn get(&self, field: &LogicalField) -> Option<&str> {
        self.entry(field).map(|r| r.column.as_str())
    }

    pub fn source(&self, field: &LogicalField) -> Option<MatchSource> {
        self.entry(field).map(|r| r.source)
    }

    /// Column for a field the caller cannot do without
    pub fn require(&self, field: &LogicalField) -> Result<&str> {
        self.get(field).ok_or_else(|| Error::UnresolvedField {
            field: field.to_string(),
        })
    }

    pub fn is_resolved(&self, field: &LogicalField) -> bool {
        self.entry(field).is_some()
    }

    /// Resolved fields, in catalogue order
    pub fn resolved(&self) -> &[ResolvedColumn] {
        &self.resolved
    }

    /// Fields with no matching column, in catalogue order
    pub fn unresolved(&self) -> &[LogicalField] {
        &self.unresolved
    }

    /// (label, column) of every resolved category, in catalogue order
    pub fn category_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.resolved.iter().filter_map(|r| match &r.field {
            LogicalField::Category(label) => Some((label.as_str(), r.column.as_str())),
            _ => None,
        })
    }

    fn entry(&self, field: &LogicalField) -> Option<&ResolvedColumn> {
        self.resolved.iter().find(|r| &r.field == field)
    }
}
