//! Cohort persistence: one CSV artifact per (position, year, week) key.

pub mod store;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::profile::Position;
use crate::rank::RankedCohort;

/// Identifies one persisted cohort artifact. Rerunning persist for the
/// same key fully replaces the prior artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkKey {
    pub position: Position,
    pub year: u16,
    pub week: Option<u8>,
}

impl SinkKey {
    pub fn season(position: Position, year: u16) -> Self {
        Self {
            position,
            year,
            week: None,
        }
    }

    pub fn weekly(position: Position, year: u16, week: u8) -> Self {
        Self {
            position,
            year,
            week: Some(week),
        }
    }

    /// `official_qb_2025.csv` under `career/`, or
    /// `official_qb_2025_week3.csv` under `weekly/`.
    pub fn artifact_path(&self, out_dir: &Path) -> PathBuf {
        let (folder, suffix) = match self.week {
            Some(week) => ("weekly", format!("{}_{}_week{}", self.position, self.year, week)),
            None => ("career", format!("{}_{}", self.position, self.year)),
        };
        out_dir.join(folder).join(format!("official_{suffix}.csv"))
    }
}

impl std::fmt::Display for SinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.week {
            Some(week) => write!(f, "{} {} week {}", self.position, self.year, week),
            None => write!(f, "{} {} season", self.position, self.year),
        }
    }
}

/// What a persist call wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistReceipt {
    pub path: PathBuf,
    pub rows: usize,
    pub written_at: DateTime<Utc>,
}

/// Write the cohort's records (original columns plus `raw_score`,
/// `normalized_score`, `rank`) to the key's artifact path, rank-ascending.
///
/// The only stage permitted to touch the filesystem. Writes to a `.tmp`
/// sibling and renames so a crashed run never leaves a half-written
/// artifact behind.
#[instrument(level = "info", skip(cohort, out_dir), fields(key = %key, rows = cohort.len()))]
pub fn persist(cohort: &RankedCohort, key: &SinkKey, out_dir: &Path) -> Result<PersistReceipt> {
    let final_path = key.artifact_path(out_dir);
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = final_path.with_extension("csv.tmp");

    let records = cohort.records();
    {
        let file = File::create(&tmp_path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        writer.write_record(records.column_names())?;
        for row in 0..records.num_rows() {
            writer.write_record(records.columns().map(|(_, col)| col.cell(row)))?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, &final_path)?;

    info!(path = %final_path.display(), "wrote cohort artifact");
    Ok(PersistReceipt {
        path: final_path,
        rows: records.num_rows(),
        written_at: Utc::now(),
    })
}
