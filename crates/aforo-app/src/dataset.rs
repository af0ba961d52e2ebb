//! Explicit dataset initialization
//!
//! The process entry point loads the CSV once and hands the resulting
//! immutable `Dataset` to whatever serves queries.

use std::path::{Path, PathBuf};

use aforo_domain::model::{Catalogue, FieldMapping, RawTable, TidyBatch, TidyRecord};
use aforo_domain::service::{resolve_columns, TidyReshaper};
use aforo_infra::csv_source;
use aforo_types::{Result, SourceEncoding};
use tracing::{debug, info, warn};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Dataset {
    source: Option<PathBuf>,
    table: RawTable,
    catalogue: Catalogue,
    mapping: FieldMapping,
    batch: TidyBatch,
}

impl Dataset {
    /// Load using the configured encoding and catalogue
    pub fn from_config(config: &Config, path: Option<&Path>) -> Result<Self> {
        let path = config.data_path(path)?;
        Self::load(path, config.encoding, config.catalogue()?)
    }

    pub fn load(path: &Path, encoding: SourceEncoding, catalogue: Catalogue) -> Result<Self> {
        info!(path = %path.display(), %encoding, "loading dataset");
        let table = csv_source::load_table(path, encoding)?;
        let mut dataset = Self::from_table(table, catalogue)?;
        dataset.source = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Resolve columns and reshape an already loaded table.
    ///
    /// Fails when the entity, year or month column cannot be found.
    pub fn from_table(table: RawTable, catalogue: Catalogue) -> Result<Self> {
        let mapping = resolve_columns(table.headers(), &catalogue);
        for r in mapping.resolved() {
            debug!(field = %r.field, column = %r.column, source = ?r.source, "resolved column");
        }
        if !mapping.unresolved().is_empty() {
            let missing: Vec<String> = mapping.unresolved().iter().map(|f| f.to_string()).collect();
            warn!(fields = %missing.join(", "), "no column found for some fields");
        }

        let batch = TidyReshaper::new(&table, &mapping, &catalogue.category_fields())?.collect_batch();

        for skipped in &batch.skipped_rows {
            debug!("{}", skipped.error());
        }
        if batch.skip_count() > 0 {
            warn!(
                skipped = batch.skip_count(),
                "rows skipped because their year/month could not be read"
            );
        }
        info!(
            rows = table.row_count(),
            records = batch.records.len(),
            dropped_cells = batch.dropped_cells,
            "reshaped to tidy records"
        );

        Ok(Self {
            source: None,
            table,
            catalogue,
            mapping,
            batch,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn batch(&self) -> &TidyBatch {
        &self.batch
    }

    pub fn records(&self) -> &[TidyRecord] {
        &self.batch.records
    }

    /// Category labels with a resolved column, in catalogue order
    pub fn category_labels(&self) -> Vec<&str> {
        self.mapping.category_columns().map(|(label, _)| label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aforo_types::Error;
    use std::io::Write;

    const SAMPLE: &str = "NOMBRE,AÑO,MES,AUTOS,MOTOS\n\
                          Toll-5,2024,MARZO,1500,0\n\
                          Toll-5,2024,13,10,10\n";

    #[test]
    fn test_load_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path(), SourceEncoding::Utf8, Catalogue::default()).unwrap();
        assert_eq!(dataset.records().len(), 1);
        assert_eq!(dataset.batch().skip_count(), 1);
        assert_eq!(dataset.source(), Some(file.path()));
        assert_eq!(dataset.category_labels(), vec!["Automobile", "Motorcycle"]);
    }

    #[test]
    fn test_missing_year_column_aborts() {
        let table = csv_source::parse_table("NOMBRE,MES,AUTOS\nA,1,1\n").unwrap();
        let err = Dataset::from_table(table, Catalogue::default()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedField { .. }));
    }

    #[test]
    fn test_from_config_requires_path() {
        let err = Dataset::from_config(&Config::default(), None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
