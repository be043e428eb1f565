//! Raw and typed tabular data.
//!
//! `RawTable` is the shape every upstream provider hands us: one HTML
//! `<table>`'s header row and body rows, already text-extracted. The
//! pipeline immediately converts it into a `TypedRecordSet`, the working
//! entity every stage transforms.

use crate::error::{PipelineError, Result};

/// One scraped table, exactly as the source page claims it.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Column names from the header row.
    pub headers: Vec<String>,
    /// Each body row, one `String` per cell.
    pub rows: Vec<Vec<String>>,
}

/// A single column of values. All columns in a record set share one length.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Str(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Str(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of one cell. `None` for string columns.
    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        match self {
            Column::Str(_) => None,
            Column::Int(v) => v.get(row).map(|&x| x as f64),
            Column::Float(v) => v.get(row).copied(),
        }
    }

    /// Cell rendered for CSV output.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Str(v) => v[row].clone(),
            Column::Int(v) => v[row].to_string(),
            Column::Float(v) => v[row].to_string(),
        }
    }

    /// New column containing `rows` (in order) from this one.
    fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Str(v) => Column::Str(rows.iter().map(|&i| v[i].clone()).collect()),
            Column::Int(v) => Column::Int(rows.iter().map(|&i| v[i]).collect()),
            Column::Float(v) => Column::Float(rows.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// Ordered mapping from unique column name to a column of values.
///
/// Row order is insertion order from the raw source until the ranker
/// reorders it. Owned exclusively by the pipeline invocation that created
/// it; never shared across concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct TypedRecordSet {
    columns: Vec<(String, Column)>,
}

impl TypedRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Append a column. Names must stay unique and lengths must agree.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(PipelineError::RecordSet(format!(
                "duplicate column `{name}`"
            )));
        }
        if !self.columns.is_empty() && column.len() != self.num_rows() {
            return Err(PipelineError::RecordSet(format!(
                "column `{}` has {} rows, expected {}",
                name,
                column.len(),
                self.num_rows()
            )));
        }
        self.columns.push((name, column));
        Ok(())
    }

    /// Rename the column at `index`, keeping its position.
    pub fn rename_column(&mut self, index: usize, to: impl Into<String>) {
        if let Some(entry) = self.columns.get_mut(index) {
            entry.0 = to.into();
        }
    }

    /// Replace the values of an existing column, keeping name and position.
    pub fn replace_column(&mut self, name: &str, column: Column) {
        if let Some(entry) = self.columns.iter_mut().find(|(n, _)| n == name) {
            entry.1 = column;
        }
    }

    /// Indices of columns whose name is `base` or a disambiguated
    /// `base.N` duplicate, left to right.
    pub fn duplicate_indices(&self, base: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, (n, _))| {
                n == base
                    || n.strip_prefix(base)
                        .and_then(|rest| rest.strip_prefix('.'))
                        .is_some_and(|suffix| suffix.chars().all(|c| c.is_ascii_digit()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// New record set containing `rows` (in order) from this one.
    pub fn select_rows(&self, rows: &[usize]) -> TypedRecordSet {
        TypedRecordSet {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.select(rows)))
                .collect(),
        }
    }
}
