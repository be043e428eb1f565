//! Ranking: stable sort, cohort truncation, and 0–100 normalization.

use tracing::instrument;

use crate::error::{PipelineError, Result};
use crate::profile::{Orientation, Position, PositionProfile};
use crate::score::RAW_SCORE;
use crate::table::{Column, TypedRecordSet};

/// Columns appended by [`rank`].
pub const NORMALIZED_SCORE: &str = "normalized_score";
pub const RANK: &str = "rank";

/// The top-N records retained for one position, rank-ascending, with
/// `raw_score`, `normalized_score`, and `rank` columns appended. Immutable
/// once built.
#[derive(Debug, Clone)]
pub struct RankedCohort {
    pub position: Position,
    records: TypedRecordSet,
}

impl RankedCohort {
    pub fn records(&self) -> &TypedRecordSet {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.records.num_rows() == 0
    }
}

/// Sort best-first by `raw_score`, truncate to the profile's cohort size,
/// then min-max rescale onto [0, 100] over the *retained* cohort.
///
/// The sort is stable by requirement, not convenience: ties keep their
/// original row order so repeated runs produce identical cohorts.
/// Truncation happens before normalization so the 0–100 band reflects
/// spread within the cohort the consumer actually sees. When every
/// retained score is equal, every row normalizes to 100.
///
/// Ascending-orientation profiles (defensive "allowed" stats) rank the
/// lowest composite first, and the rescale flips so rank 1 is still 100.
#[instrument(level = "debug", skip(records, profile), fields(position = %profile.position))]
pub fn rank(records: &TypedRecordSet, profile: &PositionProfile) -> Result<RankedCohort> {
    let scores = match records.column(RAW_SCORE) {
        Some(Column::Float(v)) => v,
        _ => {
            return Err(PipelineError::missing_column(
                RAW_SCORE,
                profile.position.code(),
            ))
        }
    };
    if scores.is_empty() {
        return Err(PipelineError::EmptyCohort {
            position: profile.position.code().to_string(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    match profile.orientation {
        Orientation::Descending => order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a])),
        Orientation::Ascending => order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b])),
    }
    order.truncate(profile.cohort_size);

    let mut cohort = records.select_rows(&order);
    let retained: Vec<f64> = order.iter().map(|&i| scores[i]).collect();

    let best = retained[0];
    let worst = retained[retained.len() - 1];
    let normalized: Vec<f64> = if best == worst {
        vec![100.0; retained.len()]
    } else {
        retained
            .iter()
            .map(|s| 100.0 * (s - worst) / (best - worst))
            .collect()
    };
    cohort.push_column(NORMALIZED_SCORE, Column::Float(normalized))?;

    let ranks: Vec<i64> = (1..=order.len() as i64).collect();
    cohort.push_column(RANK, Column::Int(ranks))?;

    Ok(RankedCohort {
        position: profile.position,
        records: cohort,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{NumericColumn, NumericKind, Term};

    fn profile(orientation: Orientation, cohort_size: usize) -> PositionProfile {
        PositionProfile {
            position: Position::Rb,
            numeric_columns: vec![NumericColumn {
                name: "YDS".into(),
                kind: NumericKind::Integer,
            }],
            renames: vec![],
            formula: vec![Term {
                column: "YDS".into(),
                weight: 1.0,
                optional: false,
            }],
            orientation,
            cohort_size,
        }
    }

    fn with_scores(scores: Vec<f64>) -> TypedRecordSet {
        let mut rs = TypedRecordSet::new();
        let names: Vec<String> = (0..scores.len()).map(|i| format!("P{i}")).collect();
        rs.push_column("Player", Column::Str(names)).unwrap();
        rs.push_column(RAW_SCORE, Column::Float(scores)).unwrap();
        rs
    }

    fn floats(cohort: &RankedCohort, name: &str) -> Vec<f64> {
        match cohort.records().column(name) {
            Some(Column::Float(v)) => v.clone(),
            other => panic!("expected float column {name}, got {other:?}"),
        }
    }

    #[test]
    fn ranks_are_dense_and_scores_monotone() {
        let records = with_scores(vec![47.4, 70.8, 12.0, 70.8, 33.3]);
        let cohort = rank(&records, &profile(Orientation::Descending, 5)).unwrap();
        assert_eq!(
            cohort.records().column(RANK),
            Some(&Column::Int(vec![1, 2, 3, 4, 5]))
        );
        let raw = floats(&cohort, RAW_SCORE);
        assert!(raw.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn ties_keep_original_row_order() {
        let records = with_scores(vec![10.0, 50.0, 50.0, 50.0]);
        let cohort = rank(&records, &profile(Orientation::Descending, 4)).unwrap();
        assert_eq!(
            cohort.records().column("Player"),
            Some(&Column::Str(vec![
                "P1".into(),
                "P2".into(),
                "P3".into(),
                "P0".into()
            ]))
        );
    }

    #[test]
    fn truncates_before_normalizing() {
        // Spread of the retained three (60..100), not the full pool (10..100).
        let records = with_scores(vec![100.0, 10.0, 60.0, 80.0]);
        let cohort = rank(&records, &profile(Orientation::Descending, 3)).unwrap();
        assert_eq!(cohort.len(), 3);
        let normalized = floats(&cohort, NORMALIZED_SCORE);
        assert_eq!(normalized, vec![100.0, 50.0, 0.0]);
    }

    #[test]
    fn truncation_is_bounded_by_input() {
        let records = with_scores(vec![1.0, 2.0]);
        let cohort = rank(&records, &profile(Orientation::Descending, 32)).unwrap();
        assert_eq!(cohort.len(), 2);
    }

    #[test]
    fn rank_one_normalizes_to_100() {
        let records = with_scores(vec![47.4, 70.8]);
        let cohort = rank(&records, &profile(Orientation::Descending, 2)).unwrap();
        let normalized = floats(&cohort, NORMALIZED_SCORE);
        assert_eq!(normalized, vec![100.0, 0.0]);
        assert!(normalized.iter().all(|&n| (0.0..=100.0).contains(&n)));
    }

    #[test]
    fn flat_cohort_normalizes_to_all_100() {
        let records = with_scores(vec![5.0, 5.0, 5.0]);
        let cohort = rank(&records, &profile(Orientation::Descending, 3)).unwrap();
        assert_eq!(
            floats(&cohort, NORMALIZED_SCORE),
            vec![100.0, 100.0, 100.0]
        );
    }

    #[test]
    fn ascending_orientation_ranks_lowest_first() {
        // Defensive profile: fewest yards allowed is rank 1 and still 100.
        let records = with_scores(vec![350.0, 120.0, 200.0]);
        let cohort = rank(&records, &profile(Orientation::Ascending, 3)).unwrap();
        assert_eq!(
            cohort.records().column("Player"),
            Some(&Column::Str(vec!["P1".into(), "P2".into(), "P0".into()]))
        );
        let normalized = floats(&cohort, NORMALIZED_SCORE);
        assert_eq!(normalized[0], 100.0);
        assert_eq!(normalized[2], 0.0);
    }

    #[test]
    fn missing_raw_score_is_an_error() {
        let mut rs = TypedRecordSet::new();
        rs.push_column("Player", Column::Str(vec!["A".into()]))
            .unwrap();
        assert!(matches!(
            rank(&rs, &profile(Orientation::Descending, 1)),
            Err(PipelineError::MissingColumn { .. })
        ));
    }

    #[test]
    fn zero_rows_is_empty_cohort() {
        let records = with_scores(vec![]);
        assert!(matches!(
            rank(&records, &profile(Orientation::Descending, 3)),
            Err(PipelineError::EmptyCohort { .. })
        ));
    }
}
