// Final adjusted score and candidate ranking.
//
// Adj_Score = (Z_Total + NeedBoost) * M_avail * M_injury * M_schedule * M_news
//             + B_recency + B_trending

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::category::{CategoryZScores, PuntSet};
use crate::config::Config;
use crate::names::NameIndex;
use crate::valuation::availability::{classify_availability, days_since, Availability};
use crate::valuation::injury::{InjuryAssessment, InjuryReport};
use crate::valuation::momentum::{
    hot_pickup, last_games, recency_boost, trending_boost, GameLog, HotPickup, OwnershipTrend,
};
use crate::valuation::needs::{need_boost, RosterProfile};
use crate::valuation::news::{news_signal, NewsSignal};
use crate::valuation::schedule::ScheduleOutlook;
use crate::valuation::zscore::{NormalizedPool, PlayerStatRecord};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Last-appearance dates plus the date they are measured against.
#[derive(Debug, Clone)]
pub struct ActivityData {
    pub as_of: NaiveDate,
    pub last_played: NameIndex<NaiveDate>,
}

impl ActivityData {
    /// Days since the player's last game; `None` when the player has no
    /// recorded appearance.
    pub fn days_for(&self, name: &str) -> Option<i64> {
        days_since(self.last_played.get(name).copied(), self.as_of)
    }
}

/// Optional side inputs for a scoring run. Anything left at its default
/// disables the signal that depends on it.
#[derive(Debug, Clone, Default)]
pub struct ScoringInputs {
    /// Players rostered anywhere in the league. `None` treats everyone in
    /// the pool as available.
    pub owned: Option<NameIndex<()>>,
    /// The user's roster; these players are never candidates.
    pub roster: Vec<String>,
    pub injuries: InjuryReport,
    pub schedule: Option<ScheduleOutlook>,
    pub activity: Option<ActivityData>,
    pub trending: Option<NameIndex<OwnershipTrend>>,
    pub game_logs: Option<NameIndex<Vec<GameLog>>>,
    /// Latest news blurb per player.
    pub news: Option<NameIndex<String>>,
}

impl ScoringInputs {
    fn is_unavailable(&self, name: &str, roster: &NameIndex<()>) -> bool {
        roster.contains(name) || self.owned.as_ref().is_some_and(|o| o.contains(name))
    }

    fn games_for(&self, name: &str) -> &[GameLog] {
        self.game_logs
            .as_ref()
            .and_then(|logs| logs.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One scored candidate with every intermediate value kept for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerValuation {
    pub name: String,
    pub team: String,
    pub zscores: CategoryZScores,
    pub z_total: f64,
    pub need_boost: f64,
    pub availability: Availability,
    pub injury: InjuryAssessment,
    pub schedule_multiplier: f64,
    /// Games this week, when a schedule was supplied.
    pub games_this_week: Option<u32>,
    pub news: NewsSignal,
    pub hot: Option<HotPickup>,
    pub trend: Option<OwnershipTrend>,
    pub is_trending: bool,
    pub recency_boost: f64,
    pub trending_boost: f64,
    /// Momentum boosts zeroed by the near-elimination rule.
    pub boosts_suppressed: bool,
    pub adj_score: f64,
}

impl PlayerValuation {
    pub fn is_hot(&self) -> bool {
        self.hot.as_ref().is_some_and(|h| h.is_hot)
    }

    /// Product of every multiplicative factor.
    pub fn multiplier(&self) -> f64 {
        self.availability.multiplier
            * self.injury.multiplier
            * self.schedule_multiplier
            * self.news.multiplier
    }
}

/// Descending Adj_Score, then descending Z_Total, then name.
pub fn compare_valuations(a: &PlayerValuation, b: &PlayerValuation) -> Ordering {
    b.adj_score
        .total_cmp(&a.adj_score)
        .then_with(|| b.z_total.total_cmp(&a.z_total))
        .then_with(|| a.name.cmp(&b.name))
}

// ---------------------------------------------------------------------------
// Roster context
// ---------------------------------------------------------------------------

/// Z-scores for the named roster players.
///
/// Players in the qualifying pool reuse their pool z-scores. Roster players
/// below the volume floors are standardized against the same pool. Names
/// with no stat row at all are skipped.
pub fn roster_zscores(
    names: &[String],
    records: &[PlayerStatRecord],
    pool: &NormalizedPool<'_>,
) -> Vec<(String, CategoryZScores)> {
    let mut by_name: Option<NameIndex<&PlayerStatRecord>> = None;
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if let Some(p) = pool.find(name) {
            out.push((p.record.name.clone(), p.zscores));
            continue;
        }
        let index = by_name.get_or_insert_with(|| {
            records.iter().map(|r| (r.name.as_str(), r)).collect()
        });
        match index.get(name) {
            Some(r) if r.line.is_finite() => {
                out.push((r.name.clone(), pool.stats.zscores(&r.line)));
            }
            _ => debug!("roster player '{}' has no stat row", name),
        }
    }
    out
}

/// Build the roster profile for the configured punt set, or `None` when
/// no roster player could be valued.
pub fn build_roster_profile(
    roster: &[(String, CategoryZScores)],
    config: &Config,
) -> Option<RosterProfile> {
    RosterProfile::build(
        roster.iter().map(|(_, z)| z),
        &config.league.punts,
        &config.scoring.needs,
    )
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn value_player(
    record: &PlayerStatRecord,
    zscores: CategoryZScores,
    pool: &NormalizedPool<'_>,
    inputs: &ScoringInputs,
    profile: Option<&RosterProfile>,
    config: &Config,
) -> Option<PlayerValuation> {
    let s = &config.scoring;
    let punts: &PuntSet = &config.league.punts;
    let name = record.name.as_str();

    let remaining = inputs
        .schedule
        .as_ref()
        .and_then(|sch| sch.remaining_games(&record.team));
    let injury = inputs.injuries.assess(name, remaining, &s.injury);
    if injury.is_excluded() {
        debug!("excluding '{}': {}", name, injury.label);
        return None;
    }

    let z_total = zscores.total(punts);
    let need = need_boost(profile, &zscores, &s.needs);

    let activity = inputs.activity.as_ref().map(|a| a.days_for(name));
    let availability = classify_availability(
        record,
        pool.max_games_played,
        activity,
        &s.availability,
    );

    let (schedule_multiplier, games_this_week) = match &inputs.schedule {
        Some(sch) => (
            sch.multiplier(&record.team, &s.schedule),
            sch.current_week(&record.team).map(|(g, _)| g),
        ),
        None => (1.0, None),
    };

    let games = inputs.games_for(name);
    let news = if s.news.enabled {
        let mut text = injury_context(inputs, name);
        if let Some(blurb) = inputs.news.as_ref().and_then(|n| n.get(name)) {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(blurb);
        }
        news_signal(&text, last_games(games, s.momentum.recent_games), &s.news)
    } else {
        NewsSignal::neutral()
    };

    let hot = hot_pickup(games, z_total, &pool.stats, punts, &s.momentum);
    let trend = inputs
        .trending
        .as_ref()
        .and_then(|t| t.get(name))
        .copied();
    let is_trending = trend.is_some_and(|t| t.is_trending(&s.momentum));

    let mut b_recency = hot.as_ref().map_or(0.0, |h| recency_boost(h.z_delta, &s.momentum));
    let mut b_trending = trend.map_or(0.0, |t| trending_boost(&t, &s.momentum));
    let boosts_suppressed = injury.is_near_elimination(&s.injury);
    if boosts_suppressed {
        b_recency = 0.0;
        b_trending = 0.0;
    }

    let adj_score = (z_total + need)
        * availability.multiplier
        * injury.multiplier
        * schedule_multiplier
        * news.multiplier
        + b_recency
        + b_trending;

    Some(PlayerValuation {
        name: record.name.clone(),
        team: record.team.clone(),
        zscores,
        z_total,
        need_boost: need,
        availability,
        injury,
        schedule_multiplier,
        games_this_week,
        news,
        hot,
        trend,
        is_trending,
        recency_boost: b_recency,
        trending_boost: b_trending,
        boosts_suppressed,
        adj_score,
    })
}

/// Injury blurb text for a player, scanned together with the news blurb.
fn injury_context(inputs: &ScoringInputs, name: &str) -> String {
    inputs.injuries.context_for(name).unwrap_or_default()
}

/// Score every available player in the pool and return the top `top_n`.
///
/// Hard-excluded players (injury multiplier 0) are removed before ranking.
/// Players on the user's roster or owned elsewhere are never candidates.
pub fn score_candidates(
    pool: &NormalizedPool<'_>,
    inputs: &ScoringInputs,
    profile: Option<&RosterProfile>,
    config: &Config,
    top_n: usize,
) -> Vec<PlayerValuation> {
    let roster: NameIndex<()> = inputs.roster.iter().map(|n| (n.as_str(), ())).collect();

    let mut scored: Vec<PlayerValuation> = pool
        .players
        .iter()
        .filter(|p| !inputs.is_unavailable(&p.record.name, &roster))
        .filter_map(|p| value_player(p.record, p.zscores, pool, inputs, profile, config))
        .collect();

    scored.sort_by(compare_valuations);
    let total = scored.len();
    scored.truncate(top_n);

    info!(
        "scored {} candidates from a pool of {}, keeping top {}",
        total,
        pool.len(),
        scored.len()
    );
    scored
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
