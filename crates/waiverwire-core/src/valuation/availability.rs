// Durability and recent-activity multipliers.

use crate::config::AvailabilityConfig;
use crate::valuation::zscore::PlayerStatRecord;
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Season durability
// ---------------------------------------------------------------------------

/// Durability tier from the share of team games a player has appeared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTier {
    Healthy,
    Moderate,
    Risky,
    Fragile,
}

impl HealthTier {
    pub fn from_rate(rate: f64, cfg: &AvailabilityConfig) -> Self {
        if rate >= cfg.healthy_rate {
            HealthTier::Healthy
        } else if rate >= cfg.moderate_rate {
            HealthTier::Moderate
        } else if rate >= cfg.risky_rate {
            HealthTier::Risky
        } else {
            HealthTier::Fragile
        }
    }

    pub fn multiplier(self, cfg: &AvailabilityConfig) -> f64 {
        match self {
            HealthTier::Healthy => cfg.healthy_multiplier,
            HealthTier::Moderate => cfg.moderate_multiplier,
            HealthTier::Risky => cfg.risky_multiplier,
            HealthTier::Fragile => cfg.fragile_multiplier,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthTier::Healthy => "Healthy",
            HealthTier::Moderate => "Moderate",
            HealthTier::Risky => "Risky",
            HealthTier::Fragile => "Fragile",
        }
    }
}

/// `games_played / team_games`, clipped to [0, 1].
///
/// Missing games-played counts as zero. A missing team count falls back to
/// `fallback_team_games` (the most games anyone in the pool has played).
pub fn games_played_rate(
    games_played: Option<u32>,
    team_games: Option<u32>,
    fallback_team_games: u32,
) -> f64 {
    let gp = games_played.unwrap_or(0) as f64;
    let team = team_games.filter(|t| *t > 0).unwrap_or(fallback_team_games);
    if team == 0 {
        return 0.0;
    }
    (gp / team as f64).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Recent activity
// ---------------------------------------------------------------------------

/// Recency tier from days since the player's last appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTier {
    Active,
    Questionable,
    /// Long absence, or no record of a recent game.
    Inactive,
}

impl ActivityTier {
    pub fn from_days(days: Option<i64>, cfg: &AvailabilityConfig) -> Self {
        match days {
            Some(d) if d <= cfg.active_days => ActivityTier::Active,
            Some(d) if d <= cfg.questionable_days => ActivityTier::Questionable,
            _ => ActivityTier::Inactive,
        }
    }

    pub fn multiplier(self, cfg: &AvailabilityConfig) -> f64 {
        match self {
            ActivityTier::Active => cfg.active_multiplier,
            ActivityTier::Questionable => cfg.questionable_multiplier,
            ActivityTier::Inactive => cfg.inactive_multiplier,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityTier::Active => "Active",
            ActivityTier::Questionable => "Questionable",
            ActivityTier::Inactive => "Inactive",
        }
    }
}

/// Whole days between the last appearance and `as_of`. Future dates count
/// as zero days.
pub fn days_since(last_played: Option<NaiveDate>, as_of: NaiveDate) -> Option<i64> {
    last_played.map(|d| (as_of - d).num_days().max(0))
}

// ---------------------------------------------------------------------------
// Combined classification
// ---------------------------------------------------------------------------

/// Both availability signals and their product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Availability {
    pub games_rate: f64,
    pub health: HealthTier,
    /// `None` when the run has no activity data at all (multiplier 1.0).
    pub activity: Option<ActivityTier>,
    pub days_since_played: Option<i64>,
    pub multiplier: f64,
}

impl Availability {
    pub fn label(&self) -> String {
        match self.activity {
            Some(a) if a != ActivityTier::Active => {
                format!("{} / {}", self.health.label(), a.label())
            }
            _ => self.health.label().to_string(),
        }
    }
}

/// Classify a player's availability.
///
/// `activity` is `Some(days)` when the run supplied recent-activity data;
/// inside that, `None` days means the player has no known recent game and
/// lands in the harshest recency tier.
pub fn classify_availability(
    record: &PlayerStatRecord,
    fallback_team_games: u32,
    activity: Option<Option<i64>>,
    cfg: &AvailabilityConfig,
) -> Availability {
    let games_rate = games_played_rate(
        record.games_played,
        record.team_games_played,
        fallback_team_games,
    );
    let health = HealthTier::from_rate(games_rate, cfg);
    let activity_tier = activity.map(|days| ActivityTier::from_days(days, cfg));
    let recency_mult = activity_tier.map_or(1.0, |a| a.multiplier(cfg));

    Availability {
        games_rate,
        health,
        activity: activity_tier,
        days_since_played: activity.flatten(),
        multiplier: health.multiplier(cfg) * recency_mult,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::zscore::StatLine;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn record(gp: Option<u32>, team_gp: Option<u32>) -> PlayerStatRecord {
        PlayerStatRecord {
            name: "Test".into(),
            team: "TST".into(),
            games_played: gp,
            minutes: 25.0,
            team_games_played: team_gp,
            line: StatLine::default(),
        }
    }

    #[test]
    fn health_tier_boundaries() {
        let cfg = AvailabilityConfig::default();
        assert_eq!(HealthTier::from_rate(1.0, &cfg), HealthTier::Healthy);
        assert_eq!(HealthTier::from_rate(0.80, &cfg), HealthTier::Healthy);
        assert_eq!(HealthTier::from_rate(0.79, &cfg), HealthTier::Moderate);
        assert_eq!(HealthTier::from_rate(0.60, &cfg), HealthTier::Moderate);
        assert_eq!(HealthTier::from_rate(0.59, &cfg), HealthTier::Risky);
        assert_eq!(HealthTier::from_rate(0.40, &cfg), HealthTier::Risky);
        assert_eq!(HealthTier::from_rate(0.39, &cfg), HealthTier::Fragile);
        assert_eq!(HealthTier::from_rate(0.0, &cfg), HealthTier::Fragile);
    }

    #[test]
    fn activity_tier_boundaries() {
        let cfg = AvailabilityConfig::default();
        assert_eq!(ActivityTier::from_days(Some(0), &cfg), ActivityTier::Active);
        assert_eq!(ActivityTier::from_days(Some(3), &cfg), ActivityTier::Active);
        assert_eq!(ActivityTier::from_days(Some(4), &cfg), ActivityTier::Questionable);
        assert_eq!(ActivityTier::from_days(Some(10), &cfg), ActivityTier::Questionable);
        assert_eq!(ActivityTier::from_days(Some(11), &cfg), ActivityTier::Inactive);
        assert_eq!(ActivityTier::from_days(None, &cfg), ActivityTier::Inactive);
    }

    #[test]
    fn games_rate_uses_fallback_and_clips() {
        assert!(approx_eq(games_played_rate(Some(15), Some(20), 30), 0.75, 1e-12));
        assert!(approx_eq(games_played_rate(Some(15), None, 30), 0.5, 1e-12));
        assert!(approx_eq(games_played_rate(Some(15), Some(0), 30), 0.5, 1e-12));
        assert!(approx_eq(games_played_rate(Some(25), Some(20), 30), 1.0, 1e-12));
        assert_eq!(games_played_rate(Some(5), None, 0), 0.0);
    }

    #[test]
    fn missing_games_played_is_most_punitive() {
        let cfg = AvailabilityConfig::default();
        let a = classify_availability(&record(None, Some(30)), 30, None, &cfg);
        assert_eq!(a.health, HealthTier::Fragile);
        assert!(approx_eq(a.multiplier, 0.45, 1e-12));
    }

    #[test]
    fn no_activity_data_leaves_recency_neutral() {
        let cfg = AvailabilityConfig::default();
        let a = classify_availability(&record(Some(18), Some(30)), 30, None, &cfg);
        // 18/30 = 0.60 -> Moderate
        assert_eq!(a.health, HealthTier::Moderate);
        assert!(a.activity.is_none());
        assert!(approx_eq(a.multiplier, 0.85, 1e-12));
        assert_eq!(a.label(), "Moderate");
    }

    #[test]
    fn unknown_last_game_defaults_to_inactive() {
        let cfg = AvailabilityConfig::default();
        let a = classify_availability(&record(Some(30), Some(30)), 30, Some(None), &cfg);
        assert_eq!(a.activity, Some(ActivityTier::Inactive));
        assert!(approx_eq(a.multiplier, 0.30, 1e-12));
    }

    #[test]
    fn multipliers_compose() {
        let cfg = AvailabilityConfig::default();
        // 12/30 = 0.40 -> Risky (0.65); 6 days -> Questionable (0.75)
        let a = classify_availability(&record(Some(12), Some(30)), 30, Some(Some(6)), &cfg);
        assert!(approx_eq(a.multiplier, 0.65 * 0.75, 1e-12));
        assert_eq!(a.label(), "Risky / Questionable");
    }

    #[test]
    fn days_since_counts_whole_days() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let last = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        assert_eq!(days_since(Some(last), today), Some(4));
        assert_eq!(days_since(None, today), None);
        let future = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
        assert_eq!(days_since(Some(future), today), Some(0));
    }
}
