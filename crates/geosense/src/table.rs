//! Numeric tables behind file-backed options (sensor locations, readings).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use nalgebra::{DMatrix, DVector};

use crate::error::ConfigError;

pub trait TableStore {
    fn read_matrix(&self, path: &str, cols: usize) -> Result<DMatrix<f64>, ConfigError>;
    fn write_matrix(&self, path: &str, matrix: &DMatrix<f64>) -> Result<(), ConfigError>;

    fn read_vector(&self, path: &str) -> Result<DVector<f64>, ConfigError> {
        let column = self.read_matrix(path, 1)?;
        Ok(DVector::from_column_slice(column.as_slice()))
    }
}

/// Comma separated text, one record per line. Blank lines and `#` comments
/// are skipped. Relative paths resolve against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct CsvTableStore {
    root: Option<PathBuf>,
}

impl CsvTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl TableStore for CsvTableStore {
    fn read_matrix(&self, path: &str, cols: usize) -> Result<DMatrix<f64>, ConfigError> {
        let resolved = self.resolve(path);
        let content = fs::read_to_string(&resolved)
            .map_err(|err| ConfigError::table(resolved.display().to_string(), err.to_string()))?;
        parse_csv(&content, cols).map_err(|message| ConfigError::table(path, message))
    }

    fn write_matrix(&self, path: &str, matrix: &DMatrix<f64>) -> Result<(), ConfigError> {
        let resolved = self.resolve(path);
        let table_error = |err: std::io::Error| {
            ConfigError::table(resolved.display().to_string(), err.to_string())
        };
        if let Some(parent) = resolved.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(table_error)?;
            }
        }
        fs::write(&resolved, render_csv(matrix)).map_err(table_error)
    }
}

pub fn parse_csv(content: &str, cols: usize) -> Result<DMatrix<f64>, String> {
    let mut values = Vec::new();
    let mut rows = 0usize;
    for (line_index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut row_len = 0usize;
        for cell in line.split(',') {
            let cell = cell.trim();
            let value = cell
                .parse::<f64>()
                .map_err(|err| format!("line {}: {cell:?}: {err}", line_index + 1))?;
            values.push(value);
            row_len += 1;
        }
        if row_len != cols {
            return Err(format!(
                "line {}: expected {cols} columns, found {row_len}",
                line_index + 1
            ));
        }
        rows += 1;
    }
    Ok(DMatrix::from_row_slice(rows, cols, &values))
}

/// `f64` Display is the shortest text that parses back to the same bits.
pub fn render_csv(matrix: &DMatrix<f64>) -> String {
    let mut out = String::new();
    for row in matrix.row_iter() {
        let cells: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Keeps tables in memory, for workers that never touch disk and for tests.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: Mutex<BTreeMap<String, DMatrix<f64>>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, matrix: DMatrix<f64>) {
        self.tables().insert(path.into(), matrix);
    }

    pub fn get(&self, path: &str) -> Option<DMatrix<f64>> {
        self.tables().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.tables().keys().cloned().collect()
    }

    // Every update is a single insert, so a poisoned map is still consistent.
    fn tables(&self) -> MutexGuard<'_, BTreeMap<String, DMatrix<f64>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TableStore for MemoryTableStore {
    fn read_matrix(&self, path: &str, cols: usize) -> Result<DMatrix<f64>, ConfigError> {
        let matrix = self
            .get(path)
            .ok_or_else(|| ConfigError::table(path, "no such table"))?;
        if matrix.ncols() != cols && matrix.nrows() > 0 {
            return Err(ConfigError::table(
                path,
                format!("expected {cols} columns, found {}", matrix.ncols()),
            ));
        }
        if matrix.nrows() == 0 {
            return Ok(DMatrix::zeros(0, cols));
        }
        Ok(matrix)
    }

    fn write_matrix(&self, path: &str, matrix: &DMatrix<f64>) -> Result<(), ConfigError> {
        self.insert(path, matrix.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_keeps_working_after_a_panicking_holder() {
        let store = MemoryTableStore::new();
        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.tables.lock();
            panic!("holder panicked");
        }));
        assert!(poisoned.is_err());
        assert!(store.tables.is_poisoned());

        store.insert("a.csv", DMatrix::from_row_slice(1, 1, &[1.0]));
        store
            .write_matrix("b.csv", &DMatrix::from_row_slice(1, 1, &[2.0]))
            .expect("write after poison");
        assert_eq!(store.paths(), vec!["a.csv".to_string(), "b.csv".to_string()]);
        assert_eq!(store.read_vector("b.csv").expect("read").as_slice(), &[2.0]);
    }

    #[test]
    fn parse_skips_blank_lines_and_comments() {
        let matrix = parse_csv("# x,y,z\n1,2,3\n\n 4.5 , -6 , 7e2 \n", 3).expect("parse");
        assert_eq!(matrix, DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.5, -6.0, 700.0]));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = parse_csv("1,2,3\n4,5\n", 3).expect_err("ragged");
        assert_eq!(err, "line 2: expected 3 columns, found 2");
        assert!(parse_csv("1,two,3\n", 3).is_err());
    }

    #[test]
    fn empty_file_is_zero_rows() {
        let matrix = parse_csv("", 3).expect("parse empty");
        assert_eq!(matrix.shape(), (0, 3));
    }

    #[test]
    fn csv_file_round_trip_is_exact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvTableStore::with_root(dir.path());
        let matrix =
            DMatrix::from_row_slice(2, 3, &[0.1, 1.0 / 3.0, -1.0e-300, 6.02e23, 0.0, 42.0]);

        store
            .write_matrix("out/run_sensorLocations.csv", &matrix)
            .expect("write");
        assert!(dir.path().join("out/run_sensorLocations.csv").exists());

        let read = store
            .read_matrix("out/run_sensorLocations.csv", 3)
            .expect("read");
        assert_eq!(read, matrix);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvTableStore::with_root(dir.path());
        let err = store.read_vector("absent.csv").expect_err("missing");
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn memory_store_reads_back_what_was_written() {
        let store = MemoryTableStore::new();
        let readings = DMatrix::from_column_slice(3, 1, &[1.0, 2.0, 3.0]);
        store.write_matrix("readings.csv", &readings).expect("write");
        assert_eq!(
            store.read_vector("readings.csv").expect("read"),
            DVector::from_vec(vec![1.0, 2.0, 3.0])
        );
        assert!(store.read_matrix("readings.csv", 3).is_err());
        assert_eq!(store.paths(), vec!["readings.csv".to_string()]);
    }
}
