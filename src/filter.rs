use std::collections::BTreeMap;

use crate::constants::{ALL_SENTINEL, FACET_COLUMNS};
use crate::table::{CellValue, DataTable, Row};

pub fn is_all(selection: &str) -> bool {
    selection.trim().eq_ignore_ascii_case(ALL_SENTINEL)
}

/// Facet selections taken from a request. Facets with no entry mean `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    selections: BTreeMap<String, String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, facet: &str, selection: &str) -> Self {
        self.select(facet, selection);
        self
    }

    /// Blank selections are ignored, same as an absent query parameter.
    pub fn select(&mut self, facet: &str, selection: &str) {
        let selection = selection.trim();
        if selection.is_empty() {
            self.selections.remove(facet);
        } else {
            self.selections.insert(facet.to_string(), selection.to_string());
        }
    }

    /// The raw selection for a facet, `all` when none was made.
    pub fn selection(&self, facet: &str) -> &str {
        self.selections
            .get(facet)
            .map(String::as_str)
            .unwrap_or(ALL_SENTINEL)
    }

    /// Selections that actually constrain rows.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .filter(|(_, v)| !is_all(v))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Distinct non-empty values of one facet column.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub column: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetValues {
    facets: Vec<Facet>,
}

impl FacetValues {
    /// Values for `column`; empty when the column is not a facet or is missing from the table.
    pub fn values(&self, column: &str) -> &[String] {
        self.facets
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }
}

/// Sorted, de-duplicated, non-empty values for each known facet column.
pub fn extract_facets(table: &DataTable) -> FacetValues {
    let facets = FACET_COLUMNS
        .iter()
        .map(|column| Facet {
            column: column.to_string(),
            values: distinct_values(table, column),
        })
        .collect();
    FacetValues { facets }
}

fn distinct_values(table: &DataTable, column: &str) -> Vec<String> {
    let Some(index) = table.column_index(column) else {
        return Vec::new();
    };

    let mut values: Vec<&CellValue> = table
        .rows()
        .iter()
        .filter_map(|row| row.get(index))
        .filter(|v| !v.is_empty())
        .collect();
    values.sort_by(|a, b| a.sort_cmp(b));

    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let text = value.as_text();
        if text.is_empty() || out.iter().any(|seen| seen == text) {
            continue;
        }
        out.push(text.to_string());
    }
    out
}

/// Case-insensitive equality between a cell's text and a facet selection.
pub fn matches_selection(text: &str, selection: &str) -> bool {
    text.to_lowercase() == selection.trim().to_lowercase()
}

/// Whether `row` satisfies every active selection. A column missing from
/// the table compares as the empty string.
pub fn row_matches(table: &DataTable, row: &Row, spec: &FilterSpec) -> bool {
    spec.active().all(|(facet, selection)| {
        let cell = table.value(row, facet).map(CellValue::as_text).unwrap_or("");
        matches_selection(cell, selection)
    })
}

/// Rows satisfying `spec`, in original table order.
pub fn apply_filter<'a>(table: &'a DataTable, spec: &FilterSpec) -> Vec<&'a Row> {
    table
        .rows()
        .iter()
        .filter(|row| row_matches(table, row, spec))
        .collect()
}
