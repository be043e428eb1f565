//! HTML `<table>` to `RawTable` extraction.
//!
//! Deliberately thin: the first table on the page, header cell text, body
//! cell text. Robustness against site redesigns is an upstream concern; a
//! layout change shows up downstream as a `MissingColumn` with the column
//! and position named.

use scraper::{ElementRef, Html, Selector};

use crate::error::{PipelineError, Result};
use crate::table::RawTable;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PipelineError::fetch(format!("bad selector `{css}`: {e:?}")))
}

/// Extract the first `<table>` of `html` as a raw table.
///
/// Headers come from `thead th` (falling back to any `th` when the table
/// has no `thead`); rows come from `tbody tr` / `td`. Cell text is
/// whitespace-collapsed. Row-length validation happens later, in the
/// extractor.
pub fn first_table(html: &str) -> Result<RawTable> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| PipelineError::fetch("no <table> found in page"))?;

    let thead_th = selector("thead th")?;
    let th = selector("th")?;
    let mut headers: Vec<String> = table.select(&thead_th).map(cell_text).collect();
    if headers.is_empty() {
        headers = table.select(&th).map(cell_text).collect();
    }

    let tbody_tr = selector("tbody tr")?;
    let td = selector("td")?;
    let rows: Vec<Vec<String>> = table
        .select(&tbody_tr)
        .map(|tr| tr.select(&td).map(cell_text).collect::<Vec<String>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<Vec<_>>().join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="table">
          <thead><tr><th>Player</th><th>YDS</th><th>TD</th></tr></thead>
          <tbody>
            <tr><td>A. Runner
                </td><td>1,024</td><td>7</td></tr>
            <tr><td>B. Back</td><td>988</td><td>9</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn extracts_headers_and_rows() {
        let table = first_table(PAGE).unwrap();
        assert_eq!(table.headers, vec!["Player", "YDS", "TD"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["A. Runner", "1,024", "7"]);
    }

    #[test]
    fn falls_back_to_plain_th_headers() {
        let page = r#"<table><tr><th>Team</th><th>Yds</th></tr>
            <tbody><tr><td>KC</td><td>301</td></tr></tbody></table>"#;
        let table = first_table(page).unwrap();
        assert_eq!(table.headers, vec!["Team", "Yds"]);
        assert_eq!(table.rows, vec![vec!["KC".to_string(), "301".to_string()]]);
    }

    #[test]
    fn page_without_table_is_a_fetch_error() {
        assert!(matches!(
            first_table("<html><body><p>maintenance</p></body></html>"),
            Err(PipelineError::Fetch(_))
        ));
    }
}
