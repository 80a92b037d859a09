use csv::{ReaderBuilder, Trim};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;

use crate::error::{Result, SiteError};

/// A single cell. Numbers keep the text they were written with; the parsed
/// value is only used for ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number { value: f64, raw: String },
    Text(String),
}

impl CellValue {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return CellValue::Empty;
        }
        // "nan" and "inf" parse as f64 but are names, not numbers
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => CellValue::Number {
                value,
                raw: raw.to_string(),
            },
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The trimmed CSV text, used for display and for case-insensitive comparison.
    pub fn as_text(&self) -> &str {
        match self {
            CellValue::Empty => "",
            CellValue::Number { raw, .. } => raw,
            CellValue::Text(s) => s,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Ascending order: empties, then numbers by value, then text.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &CellValue) -> u8 {
            match v {
                CellValue::Empty => 0,
                CellValue::Number { .. } => 1,
                CellValue::Text(_) => 2,
            }
        }
        match (self, other) {
            (CellValue::Number { value: a, raw: ra }, CellValue::Number { value: b, raw: rb }) => {
                a.total_cmp(b).then_with(|| ra.cmp(rb))
            }
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_text())
    }
}

/// One CSV record, one cell per table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// The whole CSV in memory: header columns plus rows in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl DataTable {
    /// Parse CSV text. Every record must have exactly as many fields as the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(false)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| SiteError::DataUnavailable(format!("Failed to read CSV header: {e}")))?
            .clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(SiteError::DataUnavailable("CSV has no header row".to_string()));
        }
        let columns: Vec<String> = headers.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                SiteError::DataUnavailable(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(Row::new(record.iter().map(CellValue::parse).collect()));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// `None` when the column is not part of the table.
    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a CellValue> {
        self.column_index(column).and_then(|i| row.get(i))
    }
}
