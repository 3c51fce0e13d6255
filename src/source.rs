//! Row sources feeding the cellar.
//!
//! The store only needs a sequence of rows of raw text cells; where they
//! come from is behind [`RowSource`]. The network-backed spreadsheet client
//! (and its credential handling) lives outside this crate and plugs in
//! through the same trait.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::{CellariumError, Result};

pub trait RowSource: Send + Sync {
    /// Fetches the full row set. Called once at startup and again on every
    /// refresh; the result replaces the previous snapshot wholesale.
    fn fetch(&self) -> Result<Vec<Vec<String>>>;
}

// ------------- JsonFileSource -------------

/// Reads rows from a JSON file holding an array of arrays of cells, the
/// shape a spreadsheet values export produces. Non-string cells are
/// stringified, nulls become empty cells.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Vec<String>>> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| CellariumError::Source(format!("{}: {e}", self.path.display())))?;
        let rows: Vec<Vec<Value>> = serde_json::from_str(&text)
            .map_err(|e| CellariumError::Source(format!("{}: {e}", self.path.display())))?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ------------- StaticSource -------------

/// A fixed in-memory row set.
pub struct StaticSource {
    rows: Vec<Vec<String>>,
}

impl StaticSource {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

impl RowSource for StaticSource {
    fn fetch(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.rows.clone())
    }
}
