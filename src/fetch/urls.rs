//! Stats-page URL construction.

use url::Url;

use crate::error::{PipelineError, Result};
use crate::persist::SinkKey;
use crate::profile::Position;

const FANTASYPROS_BASE: &str = "https://www.fantasypros.com/nfl/stats/";
const NFL_TEAM_STATS_BASE: &str = "https://www.nfl.com/stats/team-stats/";

/// Page carrying the raw table for `key`. Offensive positions and kickers
/// come from the FantasyPros PPR stat pages (which support weekly ranges);
/// team-level variants come from the NFL.com team stats pages (season
/// totals only): defenses under `defense/`, return units under
/// `special-teams/`.
pub fn stats_url(key: &SinkKey) -> Result<Url> {
    if key.position.is_team_stats() {
        let (group, category) = match key.position {
            Position::DstRushing => ("defense", "rushing"),
            Position::DstReceiving => ("defense", "receiving"),
            Position::DstInterceptions => ("defense", "interceptions"),
            Position::DstFumbles => ("defense", "fumbles"),
            Position::DstTackles => ("defense", "tackles"),
            Position::KickoffReturns => ("special-teams", "kickoff-returns"),
            Position::PuntReturns => ("special-teams", "punt-returns"),
            _ => unreachable!("is_team_stats covers the team-level variants"),
        };
        let url = format!(
            "{NFL_TEAM_STATS_BASE}{group}/{category}/{}/reg/all",
            key.year
        );
        return Url::parse(&url).map_err(|e| PipelineError::fetch(e.to_string()));
    }

    let mut url = Url::parse(&format!("{FANTASYPROS_BASE}{}.php", key.position))
        .map_err(|e| PipelineError::fetch(e.to_string()))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("scoring", "PPR");
        match key.week {
            Some(week) => {
                query.append_pair("range", "week");
                query.append_pair("week", &week.to_string());
            }
            None => {
                query.append_pair("range", "full");
            }
        }
    }
    Ok(url)
}
