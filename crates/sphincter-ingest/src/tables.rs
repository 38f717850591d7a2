use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::DataFrame;
use sphincter_model::RawSource;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::reader::read_csv_table;

/// The raw tables of one run, keyed by source.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    tables: BTreeMap<RawSource, DataFrame>,
}

impl RawTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: RawSource, table: DataFrame) {
        self.tables.insert(source, table);
    }

    /// Reads `path` as the table for `source`.
    pub fn load(&mut self, source: RawSource, path: &Path) -> Result<&DataFrame> {
        let table = read_csv_table(path)?;
        info!(
            source = source.as_str(),
            path = %path.display(),
            rows = table.height(),
            "raw table loaded"
        );
        self.tables.insert(source, table);
        self.get(source)
    }

    pub fn get(&self, source: RawSource) -> Result<&DataFrame> {
        self.tables
            .get(&source)
            .ok_or(IngestError::SourceNotLoaded { table: source })
    }

    pub fn contains(&self, source: RawSource) -> bool {
        self.tables.contains_key(&source)
    }

    pub fn sources(&self) -> impl Iterator<Item = RawSource> + '_ {
        self.tables.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn missing_source_is_reported() {
        let mut tables = RawTables::new();
        let df = DataFrame::new(vec![Column::new("Date".into(), &[20230201i64])]).unwrap();
        tables.insert(RawSource::Collaterals, df);

        assert!(tables.contains(RawSource::Collaterals));
        assert!(tables.get(RawSource::Collaterals).is_ok());
        assert!(matches!(
            tables.get(RawSource::Branchpoints),
            Err(IngestError::SourceNotLoaded {
                table: RawSource::Branchpoints
            })
        ));
        assert_eq!(tables.sources().collect::<Vec<_>>(), vec![RawSource::Collaterals]);
    }
}
