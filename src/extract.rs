//! Raw-table ingestion: duplicate-header disambiguation and malformed-row
//! filtering.

use tracing::{debug, instrument};

use crate::error::{PipelineError, Result};
use crate::table::{Column, RawTable, TypedRecordSet};

/// Turn a raw scraped table into an all-string record set.
///
/// Duplicate header names get a numeric suffix on the second and later
/// occurrences ("YDS", "YDS.2", "YDS.3"), preserving left-to-right order;
/// the first occurrence keeps the bare name. Rows whose length does not
/// match the header count are scrape debris and are dropped whole, never
/// partially absorbed.
#[instrument(level = "debug", skip(table), fields(headers = table.headers.len(), rows = table.rows.len()))]
pub fn extract(table: &RawTable) -> Result<TypedRecordSet> {
    if table.headers.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let headers = disambiguate_headers(&table.headers);
    let width = headers.len();

    let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(table.rows.len()); width];
    let mut dropped = 0usize;
    for row in &table.rows {
        if row.len() != width {
            dropped += 1;
            continue;
        }
        for (col, value) in cells.iter_mut().zip(row) {
            col.push(value.clone());
        }
    }
    if dropped > 0 {
        debug!(dropped, "dropped malformed rows");
    }

    if cells[0].is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut records = TypedRecordSet::new();
    for (name, values) in headers.into_iter().zip(cells) {
        records.push_column(name, Column::Str(values))?;
    }
    Ok(records)
}

/// "YDS", "TD", "YDS" becomes "YDS", "TD", "YDS.2".
fn disambiguate_headers(headers: &[String]) -> Vec<String> {
    let mut seen: Vec<(&str, usize)> = Vec::new();
    let mut out = Vec::with_capacity(headers.len());
    for h in headers {
        let name = h.trim();
        match seen.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => {
                *count += 1;
                out.push(format!("{}.{}", name, count));
            }
            None => {
                seen.push((name, 1));
                out.push(name.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let table = raw(&["YDS", "TD", "YDS"], &[&["100", "1", "50"]]);
        let records = extract(&table).unwrap();
        let names: Vec<&str> = records.column_names().collect();
        assert_eq!(names, vec!["YDS", "TD", "YDS.2"]);
    }

    #[test]
    fn triple_duplicate_counts_upward() {
        let table = raw(&["A", "A", "A"], &[&["1", "2", "3"]]);
        let records = extract(&table).unwrap();
        let names: Vec<&str> = records.column_names().collect();
        assert_eq!(names, vec!["A", "A.2", "A.3"]);
    }

    #[test]
    fn malformed_rows_are_dropped_whole() {
        let table = raw(
            &["Player", "YDS"],
            &[&["A. Runner", "100"], &["broken"], &["B. Back", "150"]],
        );
        let records = extract(&table).unwrap();
        assert_eq!(records.num_rows(), 2);
        assert_eq!(
            records.column("Player"),
            Some(&Column::Str(vec!["A. Runner".into(), "B. Back".into()]))
        );
    }

    #[test]
    fn empty_headers_is_empty_input() {
        let table = raw(&[], &[&["1"]]);
        assert!(matches!(extract(&table), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn all_rows_malformed_is_empty_input() {
        let table = raw(&["A", "B"], &[&["1"], &["1", "2", "3"]]);
        assert!(matches!(extract(&table), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn no_rows_is_empty_input() {
        let table = raw(&["A", "B"], &[]);
        assert!(matches!(extract(&table), Err(PipelineError::EmptyInput)));
    }
}
