use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::values::{ConfigValues, OptionValue};
use crate::error::ConfigError;
use crate::table::TableStore;

#[derive(Debug, Clone, PartialEq)]
pub struct TableWrite {
    pub path: String,
    pub table: DMatrix<f64>,
}

/// What re-emitting a value would produce: the option map plus the tables
/// its file-backed options point at. Nothing is written until
/// [`EmitPlan::write_tables`] is called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitPlan {
    pub options: ConfigValues,
    pub tables: Vec<TableWrite>,
}

impl EmitPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(mut self, heading: &str, name: &str, value: OptionValue) -> Self {
        self.options.set(heading, name, value);
        self
    }

    pub fn table(mut self, path: impl Into<String>, table: DMatrix<f64>) -> Self {
        self.tables.push(TableWrite {
            path: path.into(),
            table,
        });
        self
    }

    pub fn column(self, path: impl Into<String>, column: &DVector<f64>) -> Self {
        let table = DMatrix::from_column_slice(column.len(), 1, column.as_slice());
        self.table(path, table)
    }

    pub fn merge(&mut self, other: EmitPlan) {
        self.options.merge(other.options);
        self.tables.extend(other.tables);
    }

    pub fn write_tables(&self, store: &dyn TableStore) -> Result<(), ConfigError> {
        for write in &self.tables {
            debug!(path = %write.path, rows = write.table.nrows(), "writing table");
            store.write_matrix(&write.path, &write.table)?;
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        self.options.to_toml_string()
    }
}
