//! Pipeline orchestration: one straight-line run per (position, year,
//! week), with bounded fan-out across keys.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, instrument};

use crate::error::{PipelineError, Result};
use crate::extract::extract;
use crate::fetch::TableSource;
use crate::normalize::normalize;
use crate::persist::{persist, PersistReceipt, SinkKey};
use crate::profile::{PositionProfile, ProfileCatalog};
use crate::rank::rank;
use crate::score::score;

/// Outcome of one key's run inside a multi-position batch.
#[derive(Debug)]
pub struct KeyOutcome {
    pub key: SinkKey,
    pub result: Result<PersistReceipt>,
}

/// Run the full pipeline for one key: fetch, extract, normalize, score,
/// rank, persist. The first failing stage short-circuits this key; there
/// is no other control flow.
#[instrument(level = "info", skip(source, profile, out_dir), fields(key = %key))]
pub fn run(
    source: &dyn TableSource,
    profile: &PositionProfile,
    key: &SinkKey,
    out_dir: &Path,
) -> Result<PersistReceipt> {
    let raw = source.fetch(key)?;
    let records = extract(&raw)?;
    let records = normalize(records, profile)?;
    let records = score(records, profile)?;
    let cohort = rank(&records, profile)?;
    persist(&cohort, key, out_dir)
}

/// Run many keys with at most `limit` in flight, one blocking task each.
///
/// Each key's failure is isolated: a kicker-page layout change must not
/// stop quarterback rankings from being produced. Every key gets an
/// outcome; the caller decides what partial success means.
pub async fn run_many(
    source: Arc<dyn TableSource>,
    catalog: Arc<ProfileCatalog>,
    keys: Vec<SinkKey>,
    out_dir: PathBuf,
    limit: usize,
) -> Vec<KeyOutcome> {
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut handles = Vec::with_capacity(keys.len());

    for key in keys {
        let source = Arc::clone(&source);
        let catalog = Arc::clone(&catalog);
        let out_dir = out_dir.clone();
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            // Semaphore is never closed, so acquire cannot fail.
            let _permit = semaphore.acquire().await.unwrap();
            let result = tokio::task::spawn_blocking(move || {
                let Some(profile) = catalog.get(key.position) else {
                    return KeyOutcome {
                        key,
                        result: Err(PipelineError::InvalidProfile {
                            position: key.position.code().to_string(),
                            reason: "no profile in catalog".into(),
                        }),
                    };
                };
                let result = run(source.as_ref(), profile, &key, &out_dir);
                KeyOutcome { key, result }
            })
            .await;
            match result {
                Ok(outcome) => outcome,
                Err(join_err) => KeyOutcome {
                    key,
                    result: Err(PipelineError::Fetch(format!("task panicked: {join_err}"))),
                },
            }
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(outcome) => {
                match &outcome.result {
                    Ok(receipt) => {
                        info!(key = %outcome.key, rows = receipt.rows, "cohort persisted")
                    }
                    Err(e) => error!(key = %outcome.key, "run failed: {e}"),
                }
                outcomes.push(outcome);
            }
            Err(join_err) => error!("task join failed: {join_err}"),
        }
    }
    outcomes
}
