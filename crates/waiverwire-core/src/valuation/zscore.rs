// Z-score calculation with attempt-weighted shooting percentages.

use crate::category::{Category, CategoryZScores};
use crate::config::PoolConfig;
use crate::names::NameIndex;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// Per-game values for the nine categories plus shooting volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatLine {
    pub fg_pct: f64,
    pub fga: f64,
    pub ft_pct: f64,
    pub fta: f64,
    pub fg3m: f64,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
}

impl StatLine {
    /// Raw per-game value for a category (the rate itself for FG%/FT%).
    pub fn raw(&self, cat: Category) -> f64 {
        match cat {
            Category::FgPct => self.fg_pct,
            Category::FtPct => self.ft_pct,
            Category::Fg3m => self.fg3m,
            Category::Pts => self.pts,
            Category::Reb => self.reb,
            Category::Ast => self.ast,
            Category::Stl => self.stl,
            Category::Blk => self.blk,
            Category::Tov => self.tov,
        }
    }

    /// Attempt volume paired with a percentage category.
    pub fn attempts(&self, cat: Category) -> Option<f64> {
        match cat {
            Category::FgPct => Some(self.fga),
            Category::FtPct => Some(self.fta),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.fg_pct,
            self.fga,
            self.ft_pct,
            self.fta,
            self.fg3m,
            self.pts,
            self.reb,
            self.ast,
            self.stl,
            self.blk,
            self.tov,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// One player's season snapshot for a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatRecord {
    pub name: String,
    pub team: String,
    /// `None` when the provider omitted it; treated as zero games.
    pub games_played: Option<u32>,
    pub minutes: f64,
    pub team_games_played: Option<u32>,
    pub line: StatLine,
}

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single statistical category across a player pool.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// is the full set of qualifying players rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats::default();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (a degenerate
/// category where every player is identical).
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Shooting impact: `attempts * (pct - mean_pct)`.
///
/// A high-volume shooter slightly above average moves a team's percentage
/// more than a low-volume shooter far above it.
pub fn pct_impact(attempts: f64, pct: f64, mean_pct: f64) -> f64 {
    attempts * (pct - mean_pct)
}

/// Per-category pool stats for one reference population.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryPoolStats {
    stats: [PoolStats; 9],
    pub mean_fg_pct: f64,
    pub mean_ft_pct: f64,
}

impl CategoryPoolStats {
    pub fn get(&self, cat: Category) -> PoolStats {
        self.stats[cat.index()]
    }

    /// Value that gets standardized: impact for percentages, raw otherwise.
    fn transformed(&self, line: &StatLine, cat: Category) -> f64 {
        match cat {
            Category::FgPct => pct_impact(line.fga, line.fg_pct, self.mean_fg_pct),
            Category::FtPct => pct_impact(line.fta, line.ft_pct, self.mean_ft_pct),
            other => line.raw(other),
        }
    }

    /// Z-scores for a stat line against this pool. Turnovers are inverted
    /// so fewer turnovers than average yields a positive z.
    pub fn zscores(&self, line: &StatLine) -> CategoryZScores {
        let mut z = CategoryZScores::zero();
        for cat in Category::ALL {
            let value = compute_zscore(self.transformed(line, cat), &self.get(cat));
            z.set(cat, if cat.lower_is_better() { -value } else { value });
        }
        z
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Compute per-category pool stats over a population of stat lines.
///
/// Steps:
/// 1. Average FG% and FT% across the pool.
/// 2. Turn each player's percentages into attempt-weighted impacts.
/// 3. Mean and population stdev for every category's transformed values.
pub fn compute_category_pool_stats(pool: &[&StatLine]) -> CategoryPoolStats {
    let mut out = CategoryPoolStats {
        mean_fg_pct: mean(pool.iter().map(|l| l.fg_pct)),
        mean_ft_pct: mean(pool.iter().map(|l| l.ft_pct)),
        ..CategoryPoolStats::default()
    };
    for cat in Category::ALL {
        let values: Vec<f64> = pool.iter().map(|l| out.transformed(l, cat)).collect();
        out.stats[cat.index()] = compute_pool_stats(&values);
    }
    out
}

// ---------------------------------------------------------------------------
// Pool filtering
// ---------------------------------------------------------------------------

/// Whether a record passes the minimum-volume filters.
pub fn qualifies(record: &PlayerStatRecord, pool: &PoolConfig) -> bool {
    record.games_played.unwrap_or(0) >= pool.min_games && record.minutes >= pool.min_minutes
}

/// Filter records to the qualifying reference population, dropping rows
/// with non-finite stats.
pub fn filter_pool<'a>(records: &'a [PlayerStatRecord], pool: &PoolConfig) -> Vec<&'a PlayerStatRecord> {
    records
        .iter()
        .filter(|r| {
            if !r.line.is_finite() || !r.minutes.is_finite() {
                warn!("skipping '{}': non-finite stat value", r.name);
                return false;
            }
            qualifies(r, pool)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Normalized pool
// ---------------------------------------------------------------------------

/// A qualifying player with per-category z-scores.
#[derive(Debug, Clone)]
pub struct NormalizedPlayer<'a> {
    pub record: &'a PlayerStatRecord,
    pub zscores: CategoryZScores,
}

/// The reference population after standardization.
#[derive(Debug, Clone)]
pub struct NormalizedPool<'a> {
    pub stats: CategoryPoolStats,
    pub players: Vec<NormalizedPlayer<'a>>,
    /// Highest games-played in the pool, the stand-in for a missing
    /// team-games-played value.
    pub max_games_played: u32,
    index: NameIndex<usize>,
}

impl<'a> NormalizedPool<'a> {
    pub fn find(&self, name: &str) -> Option<&NormalizedPlayer<'a>> {
        self.index.get(name).and_then(|i| self.players.get(*i))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Standardize every qualifying record against the qualifying population.
/// Records below the volume floors are excluded from both the reference
/// population and the output.
pub fn normalize_pool<'a>(records: &'a [PlayerStatRecord], pool_cfg: &PoolConfig) -> NormalizedPool<'a> {
    let pool = filter_pool(records, pool_cfg);
    let lines: Vec<&StatLine> = pool.iter().map(|r| &r.line).collect();
    let stats = compute_category_pool_stats(&lines);

    let players: Vec<NormalizedPlayer<'a>> = pool
        .iter()
        .map(|&r| NormalizedPlayer {
            record: r,
            zscores: stats.zscores(&r.line),
        })
        .collect();

    let max_games_played = pool
        .iter()
        .filter_map(|r| r.games_played)
        .max()
        .unwrap_or(0);

    let index = players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.record.name.as_str(), i))
        .collect();

    debug!(
        "normalized {} of {} players (max GP {})",
        players.len(),
        records.len(),
        max_games_played
    );

    NormalizedPool {
        stats,
        players,
        max_games_played,
        index,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
