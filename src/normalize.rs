//! Column normalization: duplicate-semantic renames, value cleanup, and
//! numeric coercion.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::instrument;

use crate::error::{PipelineError, Result};
use crate::profile::{NumericKind, PositionProfile};
use crate::table::{Column, TypedRecordSet};

/// Parenthetical team/bye suffixes: "Justin Jefferson (MIN)".
static PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)").expect("parenthetical pattern"));

/// ADP-style "Player TEAM" concatenations: a whitespace-separated run of
/// two-plus uppercase letters and everything after it. The leading
/// whitespace requirement keeps initials like "DJ Moore" intact.
static TEAM_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[A-Z]{2,}.*$").expect("team suffix pattern"));

/// Apply the profile's duplicate-rename map and coerce declared numeric
/// columns.
///
/// Renames run before coercion: a renamed duplicate ("YDS.2" becoming
/// "R_YDS") carries a different weight in the score formula than the
/// primary column of the same original name. A required column missing from
/// the input is the single most common real-world failure (site layout
/// drift) and is surfaced with the column name and position.
#[instrument(level = "debug", skip(records, profile), fields(position = %profile.position))]
pub fn normalize(
    mut records: TypedRecordSet,
    profile: &PositionProfile,
) -> Result<TypedRecordSet> {
    apply_renames(&mut records, profile)?;

    for numeric in &profile.numeric_columns {
        let Some(column) = records.column(&numeric.name) else {
            if profile.is_optional(&numeric.name) {
                continue;
            }
            return Err(PipelineError::missing_column(
                &numeric.name,
                profile.position.code(),
            ));
        };
        let Column::Str(values) = column else {
            continue; // already typed
        };
        let coerced = match numeric.kind {
            NumericKind::Integer => Column::Int(values.iter().map(|v| parse_int(v)).collect()),
            NumericKind::Float => Column::Float(values.iter().map(|v| parse_float(v)).collect()),
        };
        records.replace_column(&numeric.name, coerced);
    }

    // Remaining string columns get display cleanup (team suffixes, bye
    // weeks) so "Justin Jefferson MIN (14)" ranks as "Justin Jefferson".
    let cleaned: Vec<(String, Column)> = records
        .columns()
        .filter_map(|(name, col)| match col {
            Column::Str(values) => Some((
                name.to_string(),
                Column::Str(values.iter().map(|v| clean_label(v)).collect()),
            )),
            Column::Int(_) | Column::Float(_) => None,
        })
        .collect();
    for (name, col) in cleaned {
        records.replace_column(&name, col);
    }

    // NFL.com team cells repeat the club name ("Bills Bills"); team-level
    // profiles keep the first word only.
    if profile.position.is_team_stats() {
        let deduped = match records.column(TEAM_COLUMN) {
            Some(Column::Str(values)) => Some(Column::Str(
                values.iter().map(|v| first_word(v)).collect(),
            )),
            _ => None,
        };
        if let Some(column) = deduped {
            records.replace_column(TEAM_COLUMN, column);
        }
    }

    Ok(records)
}

fn apply_renames(records: &mut TypedRecordSet, profile: &PositionProfile) -> Result<()> {
    for rename in &profile.renames {
        let indices = records.duplicate_indices(&rename.column);
        if indices.is_empty() {
            return Err(PipelineError::missing_column(
                &rename.column,
                profile.position.code(),
            ));
        }
        // Only tables that actually carry the duplicate get the rename;
        // the coercion step decides whether its absence is fatal.
        if let Some(&index) = indices.get(rename.occurrence - 1) {
            records.rename_column(index, &rename.to);
        }
    }
    Ok(())
}

/// Strip thousands separators and whitespace, then parse. Unparseable
/// values become zero — deliberately, so partial scrape rows stay rankable
/// and ranking totals stay comparable. Not an oversight to fix.
fn parse_int(value: &str) -> i64 {
    let cleaned = value.trim().replace(',', "");
    cleaned
        .parse::<i64>()
        .or_else(|_| cleaned.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

fn parse_float(value: &str) -> f64 {
    value.trim().replace(',', "").parse::<f64>().unwrap_or(0.0)
}

/// Team column on the NFL.com team stats pages.
const TEAM_COLUMN: &str = "Team";

fn first_word(value: &str) -> String {
    value.split_whitespace().next().unwrap_or("").to_string()
}

/// Cleanup for name-like string values.
fn clean_label(value: &str) -> String {
    let no_parens = PARENS.replace_all(value, "");
    let trimmed = no_parens.trim();
    TEAM_SUFFIX.replace(trimmed, "").trim().to_string()
}
