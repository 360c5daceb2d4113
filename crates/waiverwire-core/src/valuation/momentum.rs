// Recent-form (hot pickup) and ownership-trend boosts.

use chrono::NaiveDate;

use crate::category::{CategoryZScores, PuntSet};
use crate::config::MomentumConfig;
use crate::valuation::zscore::{CategoryPoolStats, StatLine};

// ---------------------------------------------------------------------------
// Game logs
// ---------------------------------------------------------------------------

/// Box-score totals for a single game.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameStatLine {
    pub fgm: f64,
    pub fga: f64,
    pub ftm: f64,
    pub fta: f64,
    pub fg3m: f64,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
}

/// One game from a player's log. Logs are ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLog {
    pub date: Option<NaiveDate>,
    pub started: bool,
    pub minutes: f64,
    pub stats: GameStatLine,
}

/// The last `n` games of a log (the whole log when shorter).
pub fn last_games(games: &[GameLog], n: usize) -> &[GameLog] {
    &games[games.len().saturating_sub(n)..]
}

/// Per-game averages over the given games. Shooting percentages come from
/// made/attempted totals, not an average of per-game percentages.
pub fn recent_averages(games: &[GameLog]) -> Option<StatLine> {
    if games.is_empty() {
        return None;
    }
    let mut t = GameStatLine::default();
    for g in games {
        let s = &g.stats;
        t.fgm += s.fgm;
        t.fga += s.fga;
        t.ftm += s.ftm;
        t.fta += s.fta;
        t.fg3m += s.fg3m;
        t.pts += s.pts;
        t.reb += s.reb;
        t.ast += s.ast;
        t.stl += s.stl;
        t.blk += s.blk;
        t.tov += s.tov;
    }
    let n = games.len() as f64;
    let pct = |made: f64, att: f64| if att > 0.0 { made / att } else { 0.0 };
    Some(StatLine {
        fg_pct: pct(t.fgm, t.fga),
        fga: t.fga / n,
        ft_pct: pct(t.ftm, t.fta),
        fta: t.fta / n,
        fg3m: t.fg3m / n,
        pts: t.pts / n,
        reb: t.reb / n,
        ast: t.ast / n,
        stl: t.stl / n,
        blk: t.blk / n,
        tov: t.tov / n,
    })
}

// ---------------------------------------------------------------------------
// Hot pickup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HotPickup {
    pub recent_zscores: CategoryZScores,
    pub recent_z_total: f64,
    pub z_delta: f64,
    pub is_hot: bool,
    pub games_used: usize,
}

/// Compare recent form to the season line.
///
/// Recent averages are standardized against the season pool's mean and
/// stdev, so the two totals are on the same scale.
pub fn hot_pickup(
    games: &[GameLog],
    season_z_total: f64,
    season_stats: &CategoryPoolStats,
    punts: &PuntSet,
    cfg: &MomentumConfig,
) -> Option<HotPickup> {
    let recent = last_games(games, cfg.recent_games);
    let line = recent_averages(recent)?;
    let recent_zscores = season_stats.zscores(&line);
    let recent_z_total = recent_zscores.total(punts);
    let z_delta = recent_z_total - season_z_total;
    Some(HotPickup {
        recent_zscores,
        recent_z_total,
        z_delta,
        is_hot: z_delta >= cfg.hot_threshold,
        games_used: recent.len(),
    })
}

/// Additive recency boost; slumps are never penalized.
pub fn recency_boost(z_delta: f64, cfg: &MomentumConfig) -> f64 {
    cfg.recency_weight * z_delta.max(0.0)
}

// ---------------------------------------------------------------------------
// Ownership trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnershipTrend {
    pub percent_owned: f64,
    /// Change in percent owned over the recent window.
    pub delta: f64,
}

impl OwnershipTrend {
    pub fn is_trending(&self, cfg: &MomentumConfig) -> bool {
        self.delta >= cfg.trending_min_delta
    }
}

/// Additive trending boost, scaled by the ownership jump and capped.
pub fn trending_boost(trend: &OwnershipTrend, cfg: &MomentumConfig) -> f64 {
    if !trend.is_trending(cfg) {
        return 0.0;
    }
    cfg.trending_weight * (trend.delta / 10.0).min(cfg.trending_cap)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
