use anyhow::{Context, Result};
use gridiron::{
    fetch::{HttpTableSource, TableSource},
    persist::{store, SinkKey},
    pipeline::run_many,
    profile::{Position, ProfileCatalog},
};
use std::{collections::HashSet, env, path::PathBuf, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Weeks in an NFL regular season.
const SEASON_WEEKS: u8 = 18;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gridiron=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let out_dir = PathBuf::from(
        env::var("GRIDIRON_OUT_DIR").unwrap_or_else(|_| "data/official_rankings".into()),
    );
    let year: u16 = env::var("GRIDIRON_YEAR")
        .unwrap_or_else(|_| "2025".into())
        .parse()
        .context("GRIDIRON_YEAR must be a year")?;
    let limit: usize = env::var("GRIDIRON_CONCURRENCY")
        .unwrap_or_else(|_| "3".into())
        .parse()
        .context("GRIDIRON_CONCURRENCY must be a number")?;
    let with_weeks = env::var("GRIDIRON_SEASON_ONLY").is_err();
    let skip_existing = env::var("GRIDIRON_SKIP_EXISTING").is_ok();

    let positions = match env::var("GRIDIRON_POSITIONS") {
        Ok(codes) => codes
            .split(',')
            .map(|code| {
                Position::from_code(code.trim())
                    .with_context(|| format!("unknown position code `{code}`"))
            })
            .collect::<Result<Vec<_>>>()?,
        Err(_) => Position::ALL.to_vec(),
    };

    let catalog = Arc::new(ProfileCatalog::standard().context("building position catalog")?);
    std::fs::create_dir_all(&out_dir)?;

    // ─── 3) build the key list ───────────────────────────────────────
    let done: HashSet<SinkKey> = if skip_existing {
        store::existing(&out_dir)
            .context("scanning existing artifacts")?
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    } else {
        HashSet::new()
    };

    let mut keys = Vec::new();
    for &position in &positions {
        keys.push(SinkKey::season(position, year));
        // Team-level pages (defense, return units) are season totals only.
        if with_weeks && !position.is_team_stats() {
            for week in 1..=SEASON_WEEKS {
                keys.push(SinkKey::weekly(position, year, week));
            }
        }
    }
    let before = keys.len();
    keys.retain(|key| !done.contains(key));
    if keys.len() < before {
        info!("{} keys already persisted; skipping", before - keys.len());
    }
    if keys.is_empty() {
        info!("nothing to do; exit");
        return Ok(());
    }
    info!("{} keys to rank", keys.len());

    // ─── 4) run the pipeline ─────────────────────────────────────────
    // blocking reqwest client must not be built on the async runtime
    let source: Arc<dyn TableSource> = Arc::new(
        tokio::task::spawn_blocking(HttpTableSource::new)
            .await
            .context("table source task")?
            .context("building table source")?,
    );
    let manifest_dir = out_dir.clone();
    let outcomes = run_many(source, catalog, keys, out_dir, limit).await;

    // ─── 5) report ───────────────────────────────────────────────────
    let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
    let failed = outcomes.len() - succeeded;
    write_manifest(&manifest_dir, &outcomes)?;
    info!(succeeded, failed, "run complete");
    if succeeded == 0 {
        error!("every key failed");
        anyhow::bail!("no cohorts were produced");
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct ManifestEntry {
    key: SinkKey,
    outcome: std::result::Result<gridiron::persist::PersistReceipt, String>,
}

/// One JSON record of what this run produced (and what it failed on),
/// written next to the artifacts.
fn write_manifest(out_dir: &std::path::Path, outcomes: &[gridiron::pipeline::KeyOutcome]) -> Result<()> {
    let entries: Vec<ManifestEntry> = outcomes
        .iter()
        .map(|o| ManifestEntry {
            key: o.key,
            outcome: o.result.as_ref().cloned().map_err(ToString::to_string),
        })
        .collect();
    let path = out_dir.join("run_manifest.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&entries)?)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote run manifest");
    Ok(())
}
