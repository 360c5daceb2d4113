// Upcoming-schedule density multiplier.

use std::collections::HashMap;

use crate::config::ScheduleConfig;

/// Game counts per team for one scoring week.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekSchedule {
    games: HashMap<String, u32>,
    /// League-wide average games per team this week.
    pub average: f64,
}

impl WeekSchedule {
    /// Build a week from per-team counts; the average is taken over the
    /// teams listed.
    pub fn from_games<S: AsRef<str>>(games: impl IntoIterator<Item = (S, u32)>) -> Self {
        let games: HashMap<String, u32> = games
            .into_iter()
            .map(|(team, n)| (team_key(team.as_ref()), n))
            .collect();
        let average = if games.is_empty() {
            0.0
        } else {
            games.values().map(|&n| n as f64).sum::<f64>() / games.len() as f64
        };
        WeekSchedule { games, average }
    }

    /// Override the computed average (e.g. with a provider-supplied value).
    pub fn with_average(mut self, average: f64) -> Self {
        self.average = average;
        self
    }

    /// Games for a team; a team missing from the week has none.
    pub fn games_for(&self, team: &str) -> u32 {
        self.games.get(&team_key(team)).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

fn team_key(team: &str) -> String {
    team.trim().to_uppercase()
}

/// The next few weeks of schedule plus remaining-season game counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleOutlook {
    /// Current week first.
    pub weeks: Vec<WeekSchedule>,
    remaining: HashMap<String, u32>,
}

impl ScheduleOutlook {
    pub fn new(weeks: Vec<WeekSchedule>) -> Self {
        ScheduleOutlook {
            weeks,
            remaining: HashMap::new(),
        }
    }

    pub fn with_remaining<S: AsRef<str>>(
        mut self,
        remaining: impl IntoIterator<Item = (S, u32)>,
    ) -> Self {
        self.remaining = remaining
            .into_iter()
            .map(|(team, n)| (team_key(team.as_ref()), n))
            .collect();
        self
    }

    /// Remaining regular-season games for a team, when known.
    pub fn remaining_games(&self, team: &str) -> Option<u32> {
        self.remaining.get(&team_key(team)).copied()
    }

    /// This week's games and league average, when there is a current week.
    pub fn current_week(&self, team: &str) -> Option<(u32, f64)> {
        self.weeks.first().map(|w| (w.games_for(team), w.average))
    }

    /// Schedule multiplier for a team over the configured horizon.
    pub fn multiplier(&self, team: &str, cfg: &ScheduleConfig) -> f64 {
        let (games, averages): (Vec<u32>, Vec<f64>) = self
            .weeks
            .iter()
            .map(|w| (w.games_for(team), w.average))
            .unzip();
        schedule_multiplier(&games, &averages, cfg)
    }
}

/// `1 + weight * weighted_delta`, where the per-week deltas from the league
/// average are combined with decay weights `decay^i` (current week heaviest).
///
/// Only the first `weeks_ahead` weeks count. No weeks means a neutral 1.0.
/// The result is clamped at zero.
pub fn schedule_multiplier(games: &[u32], averages: &[f64], cfg: &ScheduleConfig) -> f64 {
    let n = games.len().min(averages.len()).min(cfg.weeks_ahead);
    if n == 0 {
        return 1.0;
    }

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut w = 1.0;
    for i in 0..n {
        weighted += w * (games[i] as f64 - averages[i]);
        total_weight += w;
        w *= cfg.decay;
    }

    (1.0 + cfg.weight * weighted / total_weight).max(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
