//! Scans a sink directory for cohort artifacts already written, so a
//! season driver can skip keys it has done before.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::warn;

use crate::error::Result;
use crate::persist::SinkKey;
use crate::profile::Position;

/// Every `(key, path)` currently persisted under `out_dir`. Files that do
/// not follow the artifact naming are skipped with a warning rather than
/// failing the scan.
pub fn existing(out_dir: &Path) -> Result<Vec<(SinkKey, PathBuf)>> {
    let mut found = Vec::new();
    for folder in ["career", "weekly"] {
        let pattern = format!("{}/{}/official_*.csv", out_dir.display(), folder);
        for entry in glob(&pattern)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?
        {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    warn!("unreadable artifact entry: {e}");
                    continue;
                }
            };
            let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            match parse_artifact_name(name) {
                Some(key) => found.push((key, path)),
                None => warn!(name, "unrecognized artifact name"),
            }
        }
    }
    Ok(found)
}

/// `official_qb_2025.csv` or `official_dst_rushing_2025_week3.csv` back to
/// a `SinkKey`. Position codes may themselves contain underscores, so the
/// year is taken from the right.
fn parse_artifact_name(name: &str) -> Option<SinkKey> {
    let stem = name.strip_prefix("official_")?.strip_suffix(".csv")?;

    let (stem, week) = match stem.rfind("_week") {
        Some(at) => {
            let week: u8 = stem[at + "_week".len()..].parse().ok()?;
            (&stem[..at], Some(week))
        }
        None => (stem, None),
    };

    let at = stem.rfind('_')?;
    let year: u16 = stem[at + 1..].parse().ok()?;
    let position = Position::from_code(&stem[..at])?;
    Some(SinkKey {
        position,
        year,
        week,
    })
}
