//! Composite scoring: the position profile's weighted linear formula.

use tracing::instrument;

use crate::error::{PipelineError, Result};
use crate::profile::PositionProfile;
use crate::table::{Column, TypedRecordSet};

/// Column appended by [`score`].
pub const RAW_SCORE: &str = "raw_score";

/// Append `raw_score`: the profile's weighted linear combination over the
/// coerced numeric columns. Row-independent and deterministic — identical
/// input and profile always produce identical scores, which is what makes
/// repeated runs diffable.
///
/// A formula column absent from this particular dataset contributes zero
/// only when the profile marks it optional; otherwise the normalizer has
/// already rejected the input. Weights are relative rankers, not calibrated
/// point totals, so no sum constraint is enforced.
#[instrument(level = "debug", skip(records, profile), fields(position = %profile.position))]
pub fn score(mut records: TypedRecordSet, profile: &PositionProfile) -> Result<TypedRecordSet> {
    let rows = records.num_rows();
    let mut scores = vec![0.0f64; rows];

    for term in &profile.formula {
        let Some(column) = records.column(&term.column) else {
            if term.optional {
                continue;
            }
            // Normally caught in normalization; kept for callers that skip it.
            return Err(PipelineError::missing_column(
                &term.column,
                profile.position.code(),
            ));
        };
        for (row, total) in scores.iter_mut().enumerate() {
            *total += term.weight * column.numeric_at(row).unwrap_or(0.0);
        }
    }

    records.push_column(RAW_SCORE, Column::Float(scores))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::normalize::normalize;
    use crate::profile::{NumericColumn, NumericKind, Orientation, Position, PositionProfile, Term};
    use crate::table::RawTable;

    fn rush_profile() -> PositionProfile {
        let num = |name: &str| NumericColumn {
            name: name.into(),
            kind: NumericKind::Integer,
        };
        let term = |column: &str, weight: f64| Term {
            column: column.into(),
            weight,
            optional: false,
        };
        PositionProfile {
            position: Position::Rb,
            numeric_columns: vec![num("ATT"), num("YDS"), num("TD")],
            renames: vec![],
            formula: vec![term("YDS", 0.45), term("TD", 0.4), term("ATT", 0.1)],
            orientation: Orientation::Descending,
            cohort_size: 2,
        }
    }

    fn scored() -> TypedRecordSet {
        let table = RawTable {
            headers: vec!["Player".into(), "ATT".into(), "YDS".into(), "TD".into()],
            rows: vec![
                vec!["A. Runner".into(), "20".into(), "100".into(), "1".into()],
                vec!["B. Back".into(), "25".into(), "150".into(), "2".into()],
            ],
        };
        let profile = rush_profile();
        let records = normalize(extract(&table).unwrap(), &profile).unwrap();
        score(records, &profile).unwrap()
    }

    fn floats(records: &TypedRecordSet, name: &str) -> Vec<f64> {
        match records.column(name) {
            Some(Column::Float(v)) => v.clone(),
            other => panic!("expected float column {name}, got {other:?}"),
        }
    }

    #[test]
    fn weighted_linear_combination() {
        let records = scored();
        // A = 100*0.45 + 1*0.4 + 20*0.1 = 47.4; B = 150*0.45 + 2*0.4 + 25*0.1 = 70.8
        let scores = floats(&records, RAW_SCORE);
        assert!((scores[0] - 47.4).abs() < 1e-9);
        assert!((scores[1] - 70.8).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_deterministic() {
        let a = scored();
        let b = scored();
        assert_eq!(a.column(RAW_SCORE), b.column(RAW_SCORE));
    }

    #[test]
    fn optional_absent_column_contributes_zero() {
        let mut profile = rush_profile();
        profile.numeric_columns.push(NumericColumn {
            name: "REC".into(),
            kind: NumericKind::Integer,
        });
        profile.formula.push(Term {
            column: "REC".into(),
            weight: 10.0,
            optional: true,
        });
        let table = RawTable {
            headers: vec!["Player".into(), "ATT".into(), "YDS".into(), "TD".into()],
            rows: vec![vec!["A".into(), "20".into(), "100".into(), "1".into()]],
        };
        let records = normalize(extract(&table).unwrap(), &profile).unwrap();
        let records = score(records, &profile).unwrap();
        let scores = floats(&records, RAW_SCORE);
        assert!((scores[0] - 47.4).abs() < 1e-9);
    }
}
